//! Inbound data model for kinlog-core.
//!
//! These are the shapes a Lambda function receives when subscribed to a
//! Kinesis data stream: a [`KinesisEvent`] holding ordered
//! [`KinesisEventRecord`]s. Only `kinesis.data` is interpreted by the parsing
//! pipeline; everything else is carried through untouched.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A full Lambda invocation payload for a Kinesis event source mapping.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KinesisEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<KinesisEventRecord>,
}

/// One entry of the delivered batch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KinesisEventRecord {
    pub kinesis: KinesisData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_version: Option<String>,
    #[serde(rename = "eventID", default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoke_identity_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_region: Option<String>,
    #[serde(rename = "eventSourceARN", default, skip_serializing_if = "Option::is_none")]
    pub event_source_arn: Option<String>,
}

/// The `kinesis` object of a record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KinesisData {
    /// Base64-encoded record payload.
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kinesis_schema_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<String>,
    /// Seconds since the Unix epoch, with millisecond precision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approximate_arrival_timestamp: Option<f64>,
}

impl KinesisEventRecord {
    /// Build a record around an already base64-encoded payload.
    pub fn from_base64(data: impl Into<String>) -> Self {
        Self {
            kinesis: KinesisData {
                data: data.into(),
                ..KinesisData::default()
            },
            ..Self::default()
        }
    }

    pub fn data(&self) -> &str {
        &self.kinesis.data
    }

    pub fn sequence_number(&self) -> Option<&str> {
        self.kinesis.sequence_number.as_deref()
    }

    /// Arrival time as reported by Kinesis, if present and representable.
    pub fn approximate_arrival_time(&self) -> Option<DateTime<Utc>> {
        let ts = self.kinesis.approximate_arrival_timestamp?;
        if !ts.is_finite() {
            return None;
        }
        let millis = (ts * 1000.0).round() as i64;
        Utc.timestamp_millis_opt(millis).single()
    }
}
