//! Message formatting and coalescing benchmarks
//!
//! - Plain text and JSON formatting of scalar, burst and array records
//! - Merging a burst of puts into one open record
//!
//! Run with: cargo bench -p putlog-engine

use std::sync::Arc;

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use parking_lot::RwLock;
use putlog_core::{
    ArrayElements, ArrayValue, FieldId, FieldType, FieldValue, Metadata, PutEvent, PutTarget,
    Scalar, ScalarKind, DEFAULT_MAX_ARRAY_BYTES,
};
use putlog_engine::{BurstState, LoggerConfig, MessageFormatter, OutputFormat};

fn event(field_type: FieldType, old: FieldValue, new: FieldValue) -> PutEvent {
    let target = PutTarget::new(FieldId::from_raw(1), "BENCH:RECORD.VAL", field_type)
        .with_user("operator")
        .with_host("console1");
    PutEvent::assemble(&target, Some(old), Some(new), Utc::now(), DEFAULT_MAX_ARRAY_BYTES)
}

fn formatter(format: OutputFormat) -> MessageFormatter {
    let metadata = Arc::new(RwLock::new(Metadata::new()));
    metadata.write().set("facility", Some("bench")).unwrap();
    MessageFormatter::new(&LoggerConfig::default().with_format(format), metadata).unwrap()
}

fn burst(count: i64) -> BurstState {
    let field_type = FieldType::Scalar(ScalarKind::Float64);
    let mut state = BurstState::adopt(Box::new(event(
        field_type,
        Scalar::Float64(0.0).into(),
        Scalar::Float64(1.0).into(),
    )));
    for i in 1..count {
        state.merge(Box::new(event(
            field_type,
            Scalar::Float64(i as f64).into(),
            Scalar::Float64((i + 1) as f64 * 0.5).into(),
        )));
    }
    state
}

// ============================================================================
// Formatting Benchmarks
// ============================================================================

fn bench_formatting(c: &mut Criterion) {
    let mut group = c.benchmark_group("formatting");

    let scalar = BurstState::adopt(Box::new(event(
        FieldType::Scalar(ScalarKind::Float64),
        Scalar::Float64(12.5).into(),
        Scalar::Float64(0.1).into(),
    )));
    let summarized = burst(10);
    let values: Vec<f64> = (0..100).map(|i| i as f64 * 0.25).collect();
    let array = BurstState::adopt(Box::new(event(
        FieldType::Array(ScalarKind::Float64),
        ArrayValue::new(ArrayElements::Float64(values.clone())).into(),
        ArrayValue::new(ArrayElements::Float64(values)).into(),
    )));

    for format in [OutputFormat::Plain, OutputFormat::Json] {
        let formatter = formatter(format);
        let name = format!("{:?}", format).to_lowercase();

        group.bench_with_input(BenchmarkId::new("scalar", &name), &scalar, |b, state| {
            b.iter(|| formatter.format(black_box(&state.record())).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("burst", &name), &summarized, |b, state| {
            b.iter(|| formatter.format(black_box(&state.record())).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("array", &name), &array, |b, state| {
            b.iter(|| formatter.format(black_box(&state.record())).unwrap())
        });
    }

    group.finish();
}

// ============================================================================
// Coalescing Benchmarks
// ============================================================================

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");

    for size in [10, 100, 1000] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| burst(black_box(size)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_formatting, bench_merge);
criterion_main!(benches);
