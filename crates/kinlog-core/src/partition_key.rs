//! Partition keys for outbound `PutRecords` entries.
//!
//! Kinesis hashes the partition key to pick a shard, so keys only need to be
//! well spread; they carry no meaning. The service requires 1 to 256 Unicode
//! characters, which [`PartitionKey`] enforces regardless of where the key
//! came from.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

pub const MAX_PARTITION_KEY_CHARS: usize = 256;

/// A partition key that satisfies the service's length limits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PartitionKey(String);

impl PartitionKey {
    /// Truncates to [`MAX_PARTITION_KEY_CHARS`] characters; an empty key
    /// becomes `"0"`.
    pub fn new(key: impl Into<String>) -> Self {
        let mut key = key.into();
        if key.is_empty() {
            key.push('0');
        }
        if let Some((byte_idx, _)) = key.char_indices().nth(MAX_PARTITION_KEY_CHARS) {
            key.truncate(byte_idx);
        }
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Length in characters, the unit the service limit is expressed in.
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PartitionKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Source of partition keys. `data` is the payload of the entry being
/// keyed; generators that don't need it ignore it.
pub trait PartitionKeyGenerator {
    fn generate(&self, data: &[u8]) -> PartitionKey;
}

/// Random UUIDv4 keys, 32 hex characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomKeys;

impl PartitionKeyGenerator for RandomKeys {
    fn generate(&self, _data: &[u8]) -> PartitionKey {
        PartitionKey::new(Uuid::new_v4().simple().to_string())
    }
}

/// SHA-256 of the payload, 64 hex characters. Identical lines always land on
/// the same shard.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentHashKeys;

impl PartitionKeyGenerator for ContentHashKeys {
    fn generate(&self, data: &[u8]) -> PartitionKey {
        PartitionKey::new(hex::encode(Sha256::digest(data)))
    }
}

impl<F> PartitionKeyGenerator for F
where
    F: Fn(&[u8]) -> String,
{
    fn generate(&self, data: &[u8]) -> PartitionKey {
        PartitionKey::new(self(data))
    }
}

/// Config-selectable generator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyStrategy {
    #[default]
    Random,
    Hash,
}

impl PartitionKeyGenerator for KeyStrategy {
    fn generate(&self, data: &[u8]) -> PartitionKey {
        match self {
            KeyStrategy::Random => RandomKeys.generate(data),
            KeyStrategy::Hash => ContentHashKeys.generate(data),
        }
    }
}
