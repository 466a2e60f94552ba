use criterion::{Criterion, criterion_group, criterion_main};
use serde_json::json;
use std::hint::black_box;
use std::sync::Arc;
use structured_logger::{Level, StructuredLogger, WriterSink, metadata};

fn logger(threshold: Level) -> StructuredLogger {
    StructuredLogger::new(Arc::new(WriterSink::new(std::io::sink())), threshold)
}

fn emit_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("emit");

    let unscoped = logger(Level::Info);
    group.bench_function("text_unscoped", |b| {
        b.iter(|| unscoped.info(black_box("request handled"), None, None))
    });

    let scoped = logger(Level::Info).with_context("Orders");
    group.bench_function("text_scoped_with_metadata", |b| {
        request_context::run_in_scope_sync("bench-request", || {
            b.iter(|| {
                scoped.info(
                    black_box("request handled"),
                    None,
                    Some(metadata(json!({"status": 200, "route": "/orders"}))),
                )
            })
        })
    });

    let filtered = logger(Level::Warn);
    group.bench_function("below_threshold", |b| {
        b.iter(|| filtered.debug(black_box("dropped"), None, None))
    });

    group.finish();
}

fn scope_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("scope");

    group.bench_function("get_correlation_id", |b| {
        request_context::run_in_scope_sync("bench-request", || {
            b.iter(|| black_box(request_context::correlation_id()))
        })
    });

    group.bench_function("get_without_scope", |b| {
        b.iter(|| black_box(request_context::correlation_id()))
    });

    group.finish();
}

criterion_group!(benches, emit_benchmark, scope_benchmark);
criterion_main!(benches);
