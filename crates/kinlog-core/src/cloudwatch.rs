//! CloudWatch Logs subscription envelopes.
//!
//! A subscription filter forwarding to Kinesis writes one gzip-compressed JSON
//! document per record:
//!
//! ```text
//! {
//!   "messageType": "DATA_MESSAGE" | "CONTROL_MESSAGE",
//!   "owner": "...", "logGroup": "...", "logStream": "...",
//!   "subscriptionFilters": ["..."],
//!   "logEvents": [{"id": "...", "timestamp": 0, "message": "..."}]
//! }
//! ```
//!
//! Control messages are health-check pings and expand to nothing. Data
//! messages expand to their `logEvents[].message` values, in order, filtered
//! through the same root classifier as top-level records.

use serde::Deserialize;
use serde_json::Value;

use crate::classify::{classify, Verdict};
use crate::decode::gunzip;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    DataMessage,
    ControlMessage,
}

/// A subscription envelope. Only `messageType` and `logEvents[].message` are
/// read; the rest is kept as opaque JSON so an unexpected shape there never
/// costs the bundle its messages.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogsEnvelope {
    pub message_type: MessageType,
    #[serde(default)]
    pub log_events: Option<Vec<LogEvent>>,
    #[serde(default)]
    pub owner: Option<Value>,
    #[serde(default)]
    pub log_group: Option<Value>,
    #[serde(default)]
    pub log_stream: Option<Value>,
    #[serde(default)]
    pub subscription_filters: Option<Value>,
}

impl LogsEnvelope {
    pub fn log_group(&self) -> &str {
        text_field(&self.log_group)
    }

    pub fn log_stream(&self) -> &str {
        text_field(&self.log_stream)
    }
}

fn text_field(value: &Option<Value>) -> &str {
    value.as_ref().and_then(Value::as_str).unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LogEvent {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub timestamp: Option<Value>,
    pub message: String,
}

/// The outcome of unwrapping a gzip payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bundle {
    /// Surviving messages in `logEvents` order, plus how many were filtered.
    Data { messages: Vec<String>, dropped: usize },
    Control,
    /// Valid gzip whose content is not a usable envelope. Skipped.
    Malformed { reason: String },
}

impl Bundle {
    pub fn into_messages(self) -> Vec<String> {
        match self {
            Bundle::Data { messages, .. } => messages,
            Bundle::Control | Bundle::Malformed { .. } => Vec::new(),
        }
    }
}

/// Unwrap a decoded record payload.
///
/// Returns `None` when `bytes` is not gzip; the caller then classifies the
/// raw bytes as text instead.
pub fn try_unwrap(bytes: &[u8]) -> Option<Bundle> {
    let json = gunzip(bytes)?;
    Some(unwrap_envelope(&json))
}

/// Expand an already-decompressed envelope.
pub fn unwrap_envelope(json: &[u8]) -> Bundle {
    let mut envelope: LogsEnvelope = match serde_json::from_slice(json) {
        Ok(envelope) => envelope,
        Err(err) => {
            return Bundle::Malformed {
                reason: err.to_string(),
            }
        }
    };

    match envelope.message_type {
        MessageType::ControlMessage => {
            tracing::debug!(log_group = envelope.log_group(), "absorbed control message");
            Bundle::Control
        }
        MessageType::DataMessage => {
            let Some(events) = envelope.log_events.take() else {
                return Bundle::Malformed {
                    reason: "DATA_MESSAGE without logEvents".to_string(),
                };
            };
            let total = events.len();
            let messages: Vec<String> = events
                .into_iter()
                .map(|event| event.message)
                .filter(|message| classify(message) == Verdict::KeepAsIs)
                .collect();
            tracing::debug!(
                log_group = envelope.log_group(),
                log_stream = envelope.log_stream(),
                events = total,
                kept = messages.len(),
                "unwrapped data message"
            );
            Bundle::Data {
                dropped: total - messages.len(),
                messages,
            }
        }
    }
}
