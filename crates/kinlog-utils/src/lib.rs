//! kinlog-utils — helpers used next to the parsing pipeline.
//!
//! None of these are part of the record data flow. Callers use them to ship
//! parsed messages somewhere ([`upload`]), to respect service batch limits
//! ([`chunk`]), and to read optional settings ([`defaults`]).

pub mod chunk;
pub mod defaults;
pub mod upload;

pub use chunk::split;
pub use defaults::get_or_default;
pub use upload::{put_str_data, LocalDirStore, MemoryStore, ObjectStore, UploadError};
