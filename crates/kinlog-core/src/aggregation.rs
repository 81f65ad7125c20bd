//! Kinesis Producer Library (KPL) record aggregation.
//!
//! The KPL packs many user records into one Kinesis record:
//!
//! ```text
//! ┌──────────────┬────────────────────────────┬──────────────────────────┐
//! │ F3 89 9A C2  │ AggregatedRecord protobuf  │ MD5(protobuf), 16 bytes  │
//! └──────────────┴────────────────────────────┴──────────────────────────┘
//! ```
//!
//! A record only counts as aggregated when the magic matches, the checksum
//! verifies and the protobuf decodes. Anything else is an ordinary payload
//! and is passed through untouched.

use md5::{Digest, Md5};
use prost::Message;

pub const KPL_MAGIC: [u8; 4] = [0xF3, 0x89, 0x9A, 0xC2];
const DIGEST_LEN: usize = 16;

// ---------------------------------------------------------------------------
// Wire messages (proto2)
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, Message)]
pub struct AggregatedRecord {
    #[prost(string, repeated, tag = "1")]
    pub partition_key_table: Vec<String>,
    #[prost(string, repeated, tag = "2")]
    pub explicit_hash_key_table: Vec<String>,
    #[prost(message, repeated, tag = "3")]
    pub records: Vec<Record>,
}

#[derive(Clone, PartialEq, Message)]
pub struct Record {
    #[prost(uint64, required, tag = "1")]
    pub partition_key_index: u64,
    #[prost(uint64, optional, tag = "2")]
    pub explicit_hash_key_index: Option<u64>,
    #[prost(bytes = "vec", required, tag = "3")]
    pub data: Vec<u8>,
    #[prost(message, repeated, tag = "4")]
    pub tags: Vec<Tag>,
}

#[derive(Clone, PartialEq, Message)]
pub struct Tag {
    #[prost(string, required, tag = "1")]
    pub key: String,
    #[prost(string, optional, tag = "2")]
    pub value: Option<String>,
}

// ---------------------------------------------------------------------------
// User records
// ---------------------------------------------------------------------------

/// One record as the producer submitted it, recovered from an aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// `None` when the index points outside the partition key table.
    pub partition_key: Option<String>,
    pub explicit_hash_key: Option<String>,
    pub data: Vec<u8>,
}

/// Expand an aggregated payload into its user records, in order.
///
/// Returns `None` for payloads that are not KPL aggregates.
pub fn deaggregate(bytes: &[u8]) -> Option<Vec<UserRecord>> {
    let body = bytes.strip_prefix(&KPL_MAGIC)?;
    if body.len() <= DIGEST_LEN {
        return None;
    }
    let (message, checksum) = body.split_at(body.len() - DIGEST_LEN);
    if Md5::digest(message).as_slice() != checksum {
        tracing::debug!("KPL magic without a matching checksum, treating as raw payload");
        return None;
    }
    let aggregated = match AggregatedRecord::decode(message) {
        Ok(aggregated) => aggregated,
        Err(err) => {
            tracing::debug!(error = %err, "KPL protobuf did not decode, treating as raw payload");
            return None;
        }
    };

    let lookup = |table: &[String], index: Option<u64>| {
        index
            .and_then(|i| usize::try_from(i).ok())
            .and_then(|i| table.get(i))
            .cloned()
    };
    let records: Vec<UserRecord> = aggregated
        .records
        .into_iter()
        .map(|record| UserRecord {
            partition_key: lookup(
                &aggregated.partition_key_table,
                Some(record.partition_key_index),
            ),
            explicit_hash_key: lookup(
                &aggregated.explicit_hash_key_table,
                record.explicit_hash_key_index,
            ),
            data: record.data,
        })
        .collect();
    tracing::trace!(user_records = records.len(), "deaggregated KPL record");
    Some(records)
}

/// Pack `(partition_key, data)` pairs into one aggregated payload.
///
/// Partition keys are deduplicated into the key table in first-seen order.
pub fn aggregate<'a, I>(records: I) -> Vec<u8>
where
    I: IntoIterator<Item = (&'a str, &'a [u8])>,
{
    let mut aggregated = AggregatedRecord::default();
    for (key, data) in records {
        let index = match aggregated.partition_key_table.iter().position(|k| k == key) {
            Some(index) => index,
            None => {
                aggregated.partition_key_table.push(key.to_string());
                aggregated.partition_key_table.len() - 1
            }
        };
        aggregated.records.push(Record {
            partition_key_index: index as u64,
            explicit_hash_key_index: None,
            data: data.to_vec(),
            tags: Vec::new(),
        });
    }

    let message = aggregated.encode_to_vec();
    let mut out = Vec::with_capacity(KPL_MAGIC.len() + message.len() + DIGEST_LEN);
    out.extend_from_slice(&KPL_MAGIC);
    out.extend_from_slice(&message);
    out.extend_from_slice(&Md5::digest(&message));
    out
}
