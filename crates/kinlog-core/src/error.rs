//! Error types for record decoding and parsing.
//!
//! Only failures that make a record unusable are errors. A payload that is not
//! gzip, not JSON, or a JSON scalar is an expected outcome and is handled by
//! the classifier instead.

use thiserror::Error;

/// A single record's payload could not be turned into bytes or text.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("record data is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("record data is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Error yielded by [`Records`](crate::pipeline::Records) at the offending
/// record. Iteration may continue past it.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to decode record #{index} (sequence number {}): {source}", .sequence_number.as_deref().unwrap_or("unknown"))]
    Record {
        index: usize,
        sequence_number: Option<String>,
        #[source]
        source: DecodeError,
    },
}

impl ParseError {
    /// Position of the failing record in the input batch.
    pub fn index(&self) -> usize {
        match self {
            ParseError::Record { index, .. } => *index,
        }
    }
}
