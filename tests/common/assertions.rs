//! Domain-specific assertion macros for kinlog harnesses.
//!
//! These wrap `pretty_assertions` and add context-rich failure messages that
//! make it clear *which* pipeline invariant was violated.

use kinlog_core::partition_key::MAX_PARTITION_KEY_CHARS;
use kinlog_core::PutRecordsEntry;

/// Collect a parse iterator, failing on the first record error, and compare
/// the messages with the expected list.
///
/// ```rust
/// assert_messages!(parse_records(&batch), ["hello1", "hello2"]);
/// ```
#[macro_export]
macro_rules! assert_messages {
    ($records:expr, [$($expected:expr),* $(,)?]) => {{
        let actual: Vec<String> = $records
            .map(|r| r.unwrap_or_else(|e| panic!("assert_messages! failed: record error: {e}")))
            .collect();
        let expected: Vec<String> = vec![$(String::from($expected)),*];
        pretty_assertions::assert_eq!(actual, expected, "assert_messages! failed");
    }};
    ($records:expr, $expected:expr) => {{
        let actual: Vec<String> = $records
            .map(|r| r.unwrap_or_else(|e| panic!("assert_messages! failed: record error: {e}")))
            .collect();
        let expected: Vec<String> = $expected.iter().map(|s| s.to_string()).collect();
        pretty_assertions::assert_eq!(actual, expected, "assert_messages! failed");
    }};
}

/// Assert an outbound entry carries exactly `line` and a valid partition key.
pub fn assert_entry_for(entry: &PutRecordsEntry, line: &str) {
    let data = std::str::from_utf8(&entry.data)
        .unwrap_or_else(|e| panic!("entry data is not UTF-8 ({e}) for line {line:?}"));
    pretty_assertions::assert_eq!(data, line, "entry data does not match its line");
    assert_partition_key(entry);
}

/// Assert the service's partition key limits hold.
pub fn assert_partition_key(entry: &PutRecordsEntry) {
    let len = entry.partition_key.char_len();
    assert!(
        (1..=MAX_PARTITION_KEY_CHARS).contains(&len),
        "partition key length {len} outside 1..={MAX_PARTITION_KEY_CHARS}: {:?}",
        entry.partition_key
    );
}
