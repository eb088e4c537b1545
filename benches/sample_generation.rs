//! Metric engine benchmarks
//!
//! Dataset generation runs on every experiment creation and regeneration;
//! scoring and read-outs run on every dashboard render.
//!
//! Run with: cargo bench --bench sample_generation

use std::collections::BTreeMap;

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use osiris_core::metrics::{
    generate_sample_dataset_ending, key_metrics, multipotency_score, top_expressed_genes,
};
use osiris_core::recommend::respond;

fn end_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
}

/// Benchmark seeded dataset generation for typical lengths
fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_sample_dataset");

    for days in [7usize, 30, 365] {
        group.bench_with_input(BenchmarkId::from_parameter(days), &days, |b, &days| {
            b.iter(|| generate_sample_dataset_ending(black_box(days), Some(42), end_date()));
        });
    }

    group.finish();
}

/// Benchmark the per-render read-outs on a 30-day dataset
fn bench_read_outs(c: &mut Criterion) {
    let dataset = generate_sample_dataset_ending(30, Some(42), end_date()).unwrap();
    let latest = dataset.last().unwrap();

    c.bench_function("key_metrics_30d", |b| {
        b.iter(|| key_metrics(black_box(&dataset)));
    });
    c.bench_function("top_expressed_genes_10", |b| {
        b.iter(|| top_expressed_genes(black_box(latest), 10));
    });
    c.bench_function("respond_fallback", |b| {
        b.iter(|| respond(black_box("what should I change next week?"), latest));
    });
}

/// Benchmark multipotency scoring for growing marker panels
fn bench_multipotency(c: &mut Criterion) {
    let mut group = c.benchmark_group("multipotency_score");

    for markers in [3usize, 15, 100] {
        let panel: BTreeMap<String, f64> = (0..markers)
            .map(|i| (format!("marker_{i}"), (i % 50) as f64))
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(markers), &panel, |b, panel| {
            b.iter(|| multipotency_score(black_box(panel)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_generate, bench_read_outs, bench_multipotency);
criterion_main!(benches);
