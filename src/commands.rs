//! Implementations of the `kinlog` subcommands.
//!
//! Each command takes its input already opened and writes to a caller-owned
//! writer, so harnesses can drive them without spawning the binary.

use std::io::{BufRead, Read, Write};
use std::num::NonZeroUsize;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use kinlog_core::{
    parse_records, KeyStrategy, KinesisEvent, ParseStats, PutRecordsEntry, RecordEncoder,
};
use kinlog_utils::{put_str_data, split, ObjectStore};

/// Read a Lambda Kinesis event from `path`, or stdin when `path` is `None`
/// or `-`.
pub fn read_event(path: Option<&Path>) -> anyhow::Result<KinesisEvent> {
    let mut raw = String::new();
    match path {
        Some(p) if p != Path::new("-") => {
            raw = std::fs::read_to_string(p)
                .with_context(|| format!("reading event from {}", p.display()))?;
        }
        _ => {
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("reading event from stdin")?;
        }
    }
    serde_json::from_str(&raw).context("event is not a Kinesis event document")
}

/// Write every logical message of `event` to `out`, one per line.
///
/// Undecodable records abort the batch unless `skip_invalid` is set, in which
/// case they are logged and skipped.
pub fn parse<W: Write>(
    event: &KinesisEvent,
    skip_invalid: bool,
    out: &mut W,
) -> anyhow::Result<ParseStats> {
    let span = tracing::info_span!("parse", records = event.records.len());
    let mut records = parse_records(&event.records).with_span(span);

    for item in records.by_ref() {
        match item {
            Ok(message) => writeln!(out, "{message}")?,
            Err(err) if skip_invalid => {
                tracing::warn!(error = %err, "skipping undecodable record");
            }
            Err(err) => return Err(err).context("aborting batch"),
        }
    }

    let stats = *records.stats();
    tracing::info!(
        records = stats.records,
        messages = stats.messages,
        dropped = stats.dropped,
        failed = stats.failed_records,
        "parse finished"
    );
    Ok(stats)
}

#[derive(Serialize)]
struct PutRecordsBatch<'a> {
    #[serde(rename = "Records")]
    records: &'a [PutRecordsEntry],
}

/// Encode each input line as a `PutRecords` entry and write the entries as
/// JSON batches of at most `batch_size`, one batch per line.
///
/// Returns the number of entries written.
pub fn encode<R: BufRead, W: Write>(
    input: R,
    keys: KeyStrategy,
    batch_size: NonZeroUsize,
    out: &mut W,
) -> anyhow::Result<usize> {
    let lines = input
        .lines()
        .collect::<Result<Vec<_>, _>>()
        .context("reading input lines")?;
    let entries = RecordEncoder::with_keys(keys).encode_many(&lines);

    for batch in split(&entries, batch_size) {
        serde_json::to_writer(&mut *out, &PutRecordsBatch { records: batch })?;
        writeln!(out)?;
    }
    Ok(entries.len())
}

/// Parse `event` and upload its messages, newline-terminated, as one object.
pub fn archive<S: ObjectStore + ?Sized>(
    event: &KinesisEvent,
    skip_invalid: bool,
    store: &S,
    bucket: &str,
    key: &str,
    gzip: bool,
) -> anyhow::Result<ParseStats> {
    let mut body = Vec::new();
    let stats = parse(event, skip_invalid, &mut body)?;
    let body = String::from_utf8(body).context("parsed messages are not UTF-8")?;
    put_str_data(store, bucket, key, &body, gzip)
        .with_context(|| format!("uploading {bucket}/{key}"))?;
    Ok(stats)
}
