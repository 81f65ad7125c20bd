//! JSON root classification.
//!
//! A log line survives if it is either not JSON at all (plain text) or a JSON
//! object. Every other JSON root (string, number, bool, null, array) is
//! dropped. The line itself is never re-serialized: callers forward the
//! original `&str` untouched when the verdict is [`Verdict::KeepAsIs`].

use serde::de::IgnoredAny;

/// What the text parses to at its root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RootKind {
    NotJson,
    Object,
    Array,
    String,
    Number,
    Bool,
    Null,
}

/// Whether a line is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    KeepAsIs,
    Drop,
}

impl RootKind {
    pub fn verdict(self) -> Verdict {
        match self {
            RootKind::NotJson | RootKind::Object => Verdict::KeepAsIs,
            RootKind::Array
            | RootKind::String
            | RootKind::Number
            | RootKind::Bool
            | RootKind::Null => Verdict::Drop,
        }
    }
}

/// Determine the JSON root type of `text`.
///
/// The whole document is validated (trailing garbage makes it `NotJson`), but
/// nothing is materialised; the root type is read from the first significant
/// byte once validation succeeds.
pub fn root_kind(text: &str) -> RootKind {
    if serde_json::from_str::<IgnoredAny>(text).is_err() {
        return RootKind::NotJson;
    }
    // JSON insignificant whitespace is exactly these four bytes.
    let first = text
        .bytes()
        .find(|b| !matches!(b, b' ' | b'\t' | b'\n' | b'\r'));
    match first {
        Some(b'{') => RootKind::Object,
        Some(b'[') => RootKind::Array,
        Some(b'"') => RootKind::String,
        Some(b't' | b'f') => RootKind::Bool,
        Some(b'n') => RootKind::Null,
        Some(_) => RootKind::Number,
        // from_str rejects empty input, so this is unreachable in practice.
        None => RootKind::NotJson,
    }
}

/// Decide whether `text` should be emitted.
pub fn classify(text: &str) -> Verdict {
    root_kind(text).verdict()
}
