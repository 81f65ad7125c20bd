//! kinlog — Kinesis log record parsing and PutRecords encoding.
//!
//! This crate re-exports the pipeline from `kinlog-core` and the upload,
//! chunking and lookup helpers from `kinlog-utils`, and hosts the
//! subcommands of the `kinlog` binary so integration tests can call them
//! directly.
//!
//! # Architecture
//!
//! ```text
//! Kinesis event ──► parse_records ──► messages ──► stdout | ObjectStore
//! lines ──► RecordEncoder ──► split ──► PutRecords batches
//! ```

pub mod commands;

pub use kinlog_core::*;
pub use kinlog_utils as utils;
