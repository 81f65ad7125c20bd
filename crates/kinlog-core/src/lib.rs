//! kinlog-core — Kinesis log record parsing and encoding.
//!
//! Two independent pipelines share one data model:
//!
//! ```text
//! KinesisEventRecord ──► decode ──► deaggregate ──► unwrap | classify ──► String   (parse_records)
//! String ──► RecordEncoder ──► PutRecordsEntry                        (encode_many)
//! ```
//!
//! Nothing here performs I/O or keeps state between calls; batches can be
//! processed concurrently without coordination.

pub mod aggregation;
pub mod classify;
pub mod cloudwatch;
pub mod config;
pub mod decode;
pub mod encoder;
pub mod error;
pub mod partition_key;
pub mod pipeline;
pub mod types;

pub use aggregation::{aggregate, deaggregate, UserRecord};
pub use classify::{classify, root_kind, RootKind, Verdict};
pub use encoder::{create_record, create_records, PutRecordsEntry, RecordEncoder};
pub use error::{DecodeError, ParseError};
pub use partition_key::{
    ContentHashKeys, KeyStrategy, PartitionKey, PartitionKeyGenerator, RandomKeys,
};
pub use pipeline::{parse_payload, parse_records, ParseStats, Payload, Records};
pub use types::{KinesisData, KinesisEvent, KinesisEventRecord};
