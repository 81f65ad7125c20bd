//! Outbound encoding benchmarks.
//!
//! # Groups
//!
//! | Group | What it measures |
//! |-------|-----------------|
//! | `partition_key` | Random vs. content-hash key generation |
//! | `encode_many` | Building `PutRecords` entries for a batch of lines |
//!
//! ```sh
//! cargo bench --bench encode_bench
//! ```

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use kinlog::{ContentHashKeys, PartitionKeyGenerator, RandomKeys, RecordEncoder};

fn partition_key_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("partition_key");
    group.throughput(Throughput::Elements(1));

    let payload = r#"{"ts":"2024-01-15T10:00:00Z","level":"INFO","message":"Server started","port":8080}"#;
    group.bench_function("random", |b| {
        b.iter(|| RandomKeys.generate(black_box(payload.as_bytes())))
    });
    group.bench_function("content_hash", |b| {
        b.iter(|| ContentHashKeys.generate(black_box(payload.as_bytes())))
    });
    group.finish();
}

fn encode_many_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_many");
    let encoder = RecordEncoder::new();

    for size in [10usize, 500] {
        let lines: Vec<String> = (0..size).map(|i| format!("log line {i}")).collect();
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("random_keys", size), &lines, |b, lines| {
            b.iter(|| encoder.encode_many(black_box(lines)))
        });
    }
    group.finish();
}

criterion_group!(benches, partition_key_bench, encode_many_bench);
criterion_main!(benches);
