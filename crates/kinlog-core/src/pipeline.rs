//! Record parsing pipeline. Turns a Kinesis batch into logical log messages.
//!
//! Each record goes through the same decision chain:
//!
//! ```text
//! base64 ──► KPL aggregate? ──yes──► one payload per user record ─┐
//!              │                                                   │
//!              no ◄────────────────────────────────────────────────┘
//!              ▼
//!            gzip? ──yes──► envelope ──► DATA_MESSAGE ──► classify each event
//!              │                  └─────► CONTROL_MESSAGE ──► nothing
//!              no
//!              └──► UTF-8 text ──► classify
//! ```
//!
//! User records inside an aggregate are not themselves checked for nested
//! aggregation.
//!
//! [`parse_records`] is lazy: records are decoded only as the consumer pulls
//! messages, and dropping the iterator early is always safe.

use std::borrow::Borrow;
use std::iter::{Fuse, FusedIterator};

use crate::aggregation::deaggregate;
use crate::classify::{root_kind, RootKind};
use crate::cloudwatch::{try_unwrap, Bundle};
use crate::decode::{decode_base64, decode_text};
use crate::error::{DecodeError, ParseError};
use crate::types::KinesisEventRecord;

// ---------------------------------------------------------------------------
// Single-record classification
// ---------------------------------------------------------------------------

/// What a single record's payload turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    PlainText(String),
    JsonObject(String),
    JsonNonObject(RootKind),
    DataMessageBundle { messages: Vec<String>, dropped: usize },
    ControlMessageBundle,
    MalformedBundle { reason: String },
    /// A KPL aggregate: one payload per user record, in order.
    Aggregated(Vec<Payload>),
}

impl Payload {
    /// Messages this payload contributes to the output, in order.
    pub fn into_messages(self) -> Vec<String> {
        match self {
            Payload::PlainText(text) | Payload::JsonObject(text) => vec![text],
            Payload::DataMessageBundle { messages, .. } => messages,
            Payload::Aggregated(parts) => parts
                .into_iter()
                .flat_map(Payload::into_messages)
                .collect(),
            Payload::JsonNonObject(_)
            | Payload::ControlMessageBundle
            | Payload::MalformedBundle { .. } => Vec::new(),
        }
    }
}

impl From<Bundle> for Payload {
    fn from(bundle: Bundle) -> Self {
        match bundle {
            Bundle::Data { messages, dropped } => Payload::DataMessageBundle { messages, dropped },
            Bundle::Control => Payload::ControlMessageBundle,
            Bundle::Malformed { reason } => Payload::MalformedBundle { reason },
        }
    }
}

/// Decode and classify one base64 `data` field.
///
/// A KPL aggregate fails as a whole when any of its user records fails.
pub fn parse_payload(data: &str) -> Result<Payload, DecodeError> {
    let bytes = decode_base64(data)?;
    match deaggregate(&bytes) {
        Some(user_records) => user_records
            .into_iter()
            .map(|record| classify_bytes(record.data))
            .collect::<Result<Vec<_>, _>>()
            .map(Payload::Aggregated),
        None => classify_bytes(bytes),
    }
}

fn classify_bytes(bytes: Vec<u8>) -> Result<Payload, DecodeError> {
    if let Some(bundle) = try_unwrap(&bytes) {
        return Ok(bundle.into());
    }
    let text = decode_text(bytes)?;
    Ok(match root_kind(&text) {
        RootKind::NotJson => Payload::PlainText(text),
        RootKind::Object => Payload::JsonObject(text),
        other => Payload::JsonNonObject(other),
    })
}

// ---------------------------------------------------------------------------
// Batch iterator
// ---------------------------------------------------------------------------

/// Counters describing what a [`Records`] iterator has seen so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub records: usize,
    pub messages: usize,
    /// Non-object JSON roots, top-level or inside a data message.
    pub dropped: usize,
    pub control_bundles: usize,
    pub malformed_bundles: usize,
    pub failed_records: usize,
    /// Records that were KPL aggregates, and the user records inside them.
    pub aggregated_records: usize,
    pub user_records: usize,
}

impl ParseStats {
    fn observe(&mut self, index: usize, payload: &Payload) {
        match payload {
            Payload::PlainText(_) | Payload::JsonObject(_) => {}
            Payload::JsonNonObject(kind) => {
                tracing::trace!(index, kind = ?kind, "dropped non-object JSON root");
                self.dropped += 1;
            }
            Payload::DataMessageBundle { dropped, .. } => self.dropped += dropped,
            Payload::ControlMessageBundle => self.control_bundles += 1,
            Payload::MalformedBundle { reason } => {
                tracing::warn!(index, reason = %reason, "skipping malformed CloudWatch Logs bundle");
                self.malformed_bundles += 1;
            }
            Payload::Aggregated(parts) => {
                self.aggregated_records += 1;
                self.user_records += parts.len();
                for part in parts {
                    self.observe(index, part);
                }
            }
        }
    }
}

/// Lazy, forward-only sequence of logical messages.
///
/// Yields `Err` at a record whose payload cannot be decoded. Calling `next`
/// again resumes with the following record, so the caller chooses between
/// skipping and aborting.
pub struct Records<I> {
    records: Fuse<I>,
    next_index: usize,
    pending: std::vec::IntoIter<String>,
    stats: ParseStats,
    span: tracing::Span,
    reported: bool,
}

/// Parse an ordered batch of records into logical messages.
///
/// Accepts owned records or references, so the same batch can be parsed more
/// than once by passing `&batch` or `batch.iter()`.
pub fn parse_records<I>(records: I) -> Records<I::IntoIter>
where
    I: IntoIterator,
    I::Item: Borrow<KinesisEventRecord>,
{
    Records {
        records: records.into_iter().fuse(),
        next_index: 0,
        pending: Vec::new().into_iter(),
        stats: ParseStats::default(),
        span: tracing::debug_span!("parse_records"),
        reported: false,
    }
}

impl<I> Records<I> {
    /// Run this iterator's logging inside `span` instead of the default
    /// per-call `parse_records` span.
    pub fn with_span(mut self, span: tracing::Span) -> Self {
        self.span = span;
        self
    }

    pub fn stats(&self) -> &ParseStats {
        &self.stats
    }
}

impl<I> Iterator for Records<I>
where
    I: Iterator,
    I::Item: Borrow<KinesisEventRecord>,
{
    type Item = Result<String, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        let span = self.span.clone();
        let _entered = span.enter();

        loop {
            if let Some(message) = self.pending.next() {
                self.stats.messages += 1;
                return Some(Ok(message));
            }

            let Some(item) = self.records.next() else {
                if !self.reported {
                    self.reported = true;
                    tracing::debug!(stats = ?self.stats, "batch parsed");
                }
                return None;
            };
            let record: &KinesisEventRecord = item.borrow();
            let index = self.next_index;
            self.next_index += 1;
            self.stats.records += 1;

            match parse_payload(record.data()) {
                Ok(payload) => {
                    self.stats.observe(index, &payload);
                    self.pending = payload.into_messages().into_iter();
                }
                Err(source) => {
                    self.stats.failed_records += 1;
                    return Some(Err(ParseError::Record {
                        index,
                        sequence_number: record.sequence_number().map(str::to_owned),
                        source,
                    }));
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // Any remaining record may expand to an unbounded number of messages.
        let pending = self.pending.len();
        match self.records.size_hint() {
            (_, Some(0)) => (pending, Some(pending)),
            _ => (pending, None),
        }
    }
}

impl<I> FusedIterator for Records<I>
where
    I: Iterator,
    I::Item: Borrow<KinesisEventRecord>,
{
}
