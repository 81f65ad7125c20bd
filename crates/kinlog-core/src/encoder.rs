//! Outbound encoding of text lines to `PutRecords` request entries.
//!
//! One line becomes one entry; order is preserved. Splitting entries into
//! service-sized batches is left to the caller.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use bytes::Bytes;
use serde::{Serialize, Serializer};

use crate::partition_key::{PartitionKey, PartitionKeyGenerator, RandomKeys};

/// One `PutRecords` request entry.
///
/// Serializes to the JSON the AWS CLI accepts, with `Data` as base64.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutRecordsEntry {
    #[serde(serialize_with = "serialize_base64")]
    pub data: Bytes,
    pub partition_key: PartitionKey,
}

fn serialize_base64<S: Serializer>(data: &Bytes, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&STANDARD.encode(data))
}

/// Builds [`PutRecordsEntry`] values with keys from `K`.
#[derive(Debug, Clone, Default)]
pub struct RecordEncoder<K = RandomKeys> {
    keys: K,
}

impl RecordEncoder<RandomKeys> {
    pub fn new() -> Self {
        Self { keys: RandomKeys }
    }
}

impl<K: PartitionKeyGenerator> RecordEncoder<K> {
    pub fn with_keys(keys: K) -> Self {
        Self { keys }
    }

    pub fn encode_one(&self, line: &str) -> PutRecordsEntry {
        let data = Bytes::copy_from_slice(line.as_bytes());
        let partition_key = self.keys.generate(&data);
        PutRecordsEntry {
            data,
            partition_key,
        }
    }

    pub fn encode_many<I>(&self, lines: I) -> Vec<PutRecordsEntry>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let entries: Vec<_> = lines
            .into_iter()
            .map(|line| self.encode_one(line.as_ref()))
            .collect();
        tracing::debug!(entries = entries.len(), "encoded outbound records");
        entries
    }
}

/// Encode one line with a random partition key.
pub fn create_record(line: &str) -> PutRecordsEntry {
    RecordEncoder::new().encode_one(line)
}

/// Encode lines with random partition keys, preserving order.
pub fn create_records<I>(lines: I) -> Vec<PutRecordsEntry>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    RecordEncoder::new().encode_many(lines)
}
