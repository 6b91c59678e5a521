//! Benchmarks for per-record aggregation throughput
//!
//! These measure the cost of `observe` across field counts and value mixes,
//! and of byte-formatted snapshot rendering.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pipestat_core::{format_bytes, AggregationSession, EmitMode, SessionConfig};
use serde_json::{json, Value};

fn create_records(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            json!({
                "Name": format!("file-{}.bin", i),
                "Length": i * 1024,
                "Blocks": (i % 17).to_string(),
                "Mode": if i % 5 == 0 { json!("n/a") } else { json!(420) },
            })
        })
        .collect()
}

fn bench_observe(c: &mut Criterion) {
    let records = create_records(10_000);
    let mut group = c.benchmark_group("observe");

    for fields in [1usize, 3] {
        let names: Vec<&str> = ["Length", "Blocks", "Mode"][..fields].to_vec();
        group.bench_with_input(BenchmarkId::new("stats_only", fields), &names, |b, names| {
            b.iter(|| {
                let config = SessionConfig::new(names.iter().copied())
                    .emit_mode(EmitMode::StatsOnly);
                let mut session = AggregationSession::start(config).unwrap();
                for record in &records {
                    session.observe(black_box(record));
                }
                session.finish()
            })
        });
    }

    group.bench_function("live_snapshots_bytes", |b| {
        b.iter(|| {
            let config = SessionConfig::new(["Length"])
                .byte_format(true)
                .live_snapshots(true);
            let mut session = AggregationSession::start(config).unwrap();
            for record in records.iter().take(1_000) {
                black_box(session.observe(record).snapshot);
            }
        })
    });

    group.finish();
}

fn bench_format_bytes(c: &mut Criterion) {
    c.bench_function("format_bytes", |b| {
        b.iter(|| {
            for exp in 0..7 {
                black_box(format_bytes(black_box(1.5 * 1024f64.powi(exp))));
            }
        })
    });
}

criterion_group!(benches, bench_observe, bench_format_bytes);
criterion_main!(benches);
