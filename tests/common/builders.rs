//! Test builders: ergonomic constructors for Kinesis records and CloudWatch
//! Logs subscription envelopes.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use std::io::Write;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use flate2::write::GzEncoder;
use flate2::Compression;
use kinlog_core::{KinesisEvent, KinesisEventRecord};

// ---------------------------------------------------------------------------
// RecordBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`KinesisEventRecord`] fixtures.
///
/// # Example
///
/// ```rust
/// let record = RecordBuilder::text("plain text record sample")
///     .sequence_number("42")
///     .build();
/// ```
pub struct RecordBuilder {
    payload: Vec<u8>,
    sequence_number: String,
    partition_key: String,
}

impl RecordBuilder {
    pub fn bytes(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            payload: payload.into(),
            sequence_number: "00000000000000000000000000000000000000000000000".to_string(),
            partition_key: "0".to_string(),
        }
    }

    pub fn text(text: &str) -> Self {
        Self::bytes(text.as_bytes())
    }

    /// A gzip-compressed subscription envelope.
    pub fn envelope(envelope: EnvelopeBuilder) -> Self {
        Self::bytes(gzip(envelope.to_json().as_bytes()))
    }

    /// A KPL aggregate of `user_records`, each given as raw payload bytes.
    pub fn aggregated(user_records: &[Vec<u8>]) -> Self {
        Self::bytes(kinlog_core::aggregate(
            user_records.iter().map(|data| ("user-key", data.as_slice())),
        ))
    }

    pub fn sequence_number(mut self, sequence_number: impl Into<String>) -> Self {
        self.sequence_number = sequence_number.into();
        self
    }

    pub fn build(self) -> KinesisEventRecord {
        let json = serde_json::json!({
            "kinesis": {
                "kinesisSchemaVersion": "1.0",
                "partitionKey": self.partition_key,
                "sequenceNumber": self.sequence_number,
                "data": STANDARD.encode(&self.payload),
                "approximateArrivalTimestamp": 1592558220.0,
            },
            "eventSource": "aws:kinesis",
            "eventVersion": "1.0",
            "eventID": format!("shardId-000000000000:{}", self.sequence_number),
            "eventName": "aws:kinesis:record",
            "invokeIdentityArn": "arn:aws:iam::000000000000:role/service-role/foo",
            "awsRegion": "ap-northeast-1",
            "eventSourceARN": "arn:aws:kinesis:ap-northeast-1:000000000000:stream/bar",
        });
        serde_json::from_value(json).expect("builder must produce a valid record")
    }
}

/// One text record per line, in order.
pub fn records_from_text(lines: &[&str]) -> Vec<KinesisEventRecord> {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| RecordBuilder::text(line).sequence_number(i.to_string()).build())
        .collect()
}

/// Wrap records in a Lambda event.
pub fn event(records: Vec<KinesisEventRecord>) -> KinesisEvent {
    KinesisEvent { records }
}

// ---------------------------------------------------------------------------
// EnvelopeBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for CloudWatch Logs subscription envelopes.
///
/// # Example
///
/// ```rust
/// let envelope = EnvelopeBuilder::data().event("hello1").event("hello2");
/// let record = RecordBuilder::envelope(envelope).build();
/// ```
pub struct EnvelopeBuilder {
    message_type: Option<&'static str>,
    events: Option<Vec<String>>,
    log_group: String,
}

impl EnvelopeBuilder {
    pub fn data() -> Self {
        Self {
            message_type: Some("DATA_MESSAGE"),
            events: Some(Vec::new()),
            log_group: "/aws/lambda/foo".to_string(),
        }
    }

    /// A health-check ping as CloudWatch Logs sends it after a subscription
    /// filter is created.
    pub fn control() -> Self {
        Self {
            message_type: Some("CONTROL_MESSAGE"),
            events: Some(vec![
                "CWL CONTROL MESSAGE: Checking health of destination Kinesis stream.".to_string(),
            ]),
            log_group: String::new(),
        }
    }

    pub fn event(mut self, message: impl Into<String>) -> Self {
        self.events
            .get_or_insert_with(Vec::new)
            .push(message.into());
        self
    }

    pub fn events<S: AsRef<str>>(mut self, messages: &[S]) -> Self {
        for m in messages {
            self = self.event(m.as_ref());
        }
        self
    }

    pub fn without_message_type(mut self) -> Self {
        self.message_type = None;
        self
    }

    pub fn without_log_events(mut self) -> Self {
        self.events = None;
        self
    }

    pub fn to_json(&self) -> String {
        let mut obj = serde_json::Map::new();
        if let Some(message_type) = self.message_type {
            obj.insert("messageType".into(), message_type.into());
        }
        obj.insert("owner".into(), "000000000000".into());
        obj.insert("logGroup".into(), self.log_group.clone().into());
        obj.insert("logStream".into(), "2020/06/19/[$LATEST]0123456789abcdef".into());
        obj.insert("subscriptionFilters".into(), serde_json::json!(["to-kinesis"]));
        if let Some(events) = &self.events {
            let events: Vec<_> = events
                .iter()
                .enumerate()
                .map(|(i, message)| {
                    serde_json::json!({
                        "id": format!("3553040697347874869813520094538957{i:020}"),
                        "timestamp": 1_592_558_220_000i64 + i as i64,
                        "message": message,
                    })
                })
                .collect();
            obj.insert("logEvents".into(), events.into());
        }
        serde_json::Value::Object(obj).to_string()
    }
}

pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}
