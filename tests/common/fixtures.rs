//! Static log corpora used across harnesses.
//!
//! Each corpus is a `&'static [&'static str]` of representative log lines.

/// Lines that are not JSON and must pass through untouched.
pub const CORPUS_PLAIN: &[&str] = &[
    "plain text record sample",
    "2024-01-15 10:00:00 INFO  Starting application version 2.4.1",
    "Jan 15 10:00:02 myhost sshd[12345]: Failed password for invalid user admin from 10.0.0.1 port 54321 ssh2",
    "START RequestId: 8f507cfc-example Version: $LATEST",
    "ts=2024-01-15T10:00:04Z level=info method=GET path=/healthz status=200 latency_ms=1",
    "{\"unterminated\": true",
    "",
];

/// JSON object lines, deliberately formatted in ways a re-serializer would
/// change (spacing, key order, escapes).
pub const CORPUS_JSON_OBJECTS: &[&str] = &[
    "{}",
    r#"{"a": 1}"#,
    r#"{"b":2,"a":1}"#,
    r#"{ "level" : "ERROR",  "msg":"Connection refused", "port":5432 }"#,
    r#"{"path":"\/api\/v1","unicode":"é"}"#,
    r#"{"nested":{"request":{"id":"abc"}},"list":[1,2,3]}"#,
];

/// JSON documents whose root is not an object.
pub const CORPUS_JSON_SCALARS: &[&str] = &["true", "false", "1", "-2.5", "null", r#""text""#, "[]", r#"[{"a":1}]"#];

/// 1 000 JSON log lines for throughput tests.
pub fn corpus_high_volume() -> Vec<String> {
    (0..1_000usize)
        .map(|i| {
            let level = match i % 10 {
                0 => "ERROR",
                1 | 2 => "WARN",
                _ => "INFO",
            };
            format!(
                r#"{{"ts":"2024-01-15T{:02}:{:02}:{:02}Z","level":"{}","message":"log line {}","seq":{}}}"#,
                i / 3600 % 24,
                i / 60 % 60,
                i % 60,
                level,
                i,
                i,
            )
        })
        .collect()
}

/// A complete Lambda event as delivered by a Kinesis event source mapping,
/// with one plain-text record (`"hello"`).
pub const LAMBDA_EVENT_JSON: &str = r#"{
  "Records": [
    {
      "kinesis": {
        "kinesisSchemaVersion": "1.0",
        "partitionKey": "1",
        "sequenceNumber": "49590338271490256608559692538361571095921575989136588898",
        "data": "aGVsbG8=",
        "approximateArrivalTimestamp": 1545084650.987
      },
      "eventSource": "aws:kinesis",
      "eventVersion": "1.0",
      "eventID": "shardId-000000000006:49590338271490256608559692538361571095921575989136588898",
      "eventName": "aws:kinesis:record",
      "invokeIdentityArn": "arn:aws:iam::123456789012:role/lambda-role",
      "awsRegion": "us-east-2",
      "eventSourceARN": "arn:aws:kinesis:us-east-2:123456789012:stream/lambda-stream"
    }
  ]
}"#;
