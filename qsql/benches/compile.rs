//! Benchmarks for predicate compilation.
//!
//! Run with: cargo bench -p qsql

use criterion::{Criterion, criterion_group, criterion_main};
use qsql::{Compiler, QueryMap};
use std::hint::black_box;

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");
    let compiler = Compiler::new();

    let simple = QueryMap::new().scalar("city", "Paris");
    group.bench_function("implicit_eq", |b| {
        b.iter(|| compiler.compile(black_box(&simple)))
    });

    let full = QueryMap::new()
        .op("name", "like", "%Jones")
        .op("age", "tween", "18:30")
        .op("status", "in", "active:pending:review")
        .scalar("city", "Paris")
        .sort("-age:name");
    group.bench_function("full_predicate", |b| {
        b.iter(|| compiler.compile(black_box(&full)))
    });

    let wide_in = QueryMap::new().op(
        "id",
        "in",
        &(1..=50).map(|n| n.to_string()).collect::<Vec<_>>().join(":"),
    );
    group.bench_function("in_50_segments", |b| {
        b.iter(|| compiler.compile(black_box(&wide_in)))
    });

    group.finish();
}

fn bench_ingest(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingest");

    let json = r#"{"name": {"like": "%Jones"}, "age": {"tween": "18:30"}, "city": "Paris", "$sort": "-age"}"#;
    group.bench_function("from_json_str", |b| {
        b.iter(|| QueryMap::from_json_str(black_box(json)))
    });

    group.finish();
}

criterion_group!(benches, bench_compile, bench_ingest);
criterion_main!(benches);
