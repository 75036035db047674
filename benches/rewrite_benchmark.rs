//! Benchmark for recording many inline snapshots into one file.
//!
//! Every rewrite re-splits the whole file and consults the ledger, so cost
//! grows with both file length and the number of earlier recordings.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use kakikomi::recording::{RecordingLedger, RewriteContext, rewrite};
use std::hint::black_box;

/// Generate a test file with N empty inline assertions, three lines apart.
fn generate_source(num_assertions: usize) -> String {
    let mut source = String::with_capacity(num_assertions * 64);
    for i in 0..num_assertions {
        source.push_str(&format!(
            "func test{}() {{\n    check(value{}, \"\")\n}}\n",
            i, i
        ));
    }
    source
}

fn record_all(source: &str, num_assertions: usize) -> String {
    let mut ledger = RecordingLedger::new();
    let mut context = RewriteContext::new(source, "", "Bench.swift", 2);
    for i in 0..num_assertions {
        context = RewriteContext::new(
            context.source_code,
            "first line\nsecond line\nthird line",
            "Bench.swift",
            2 + i * 3,
        );
        if let Ok(next) = rewrite(&mut ledger, &context) {
            context = next;
        }
    }
    context.source_code
}

fn bench_record_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_all");
    for num_assertions in [10, 100, 500] {
        let source = generate_source(num_assertions);
        group.bench_with_input(
            BenchmarkId::from_parameter(num_assertions),
            &num_assertions,
            |b, &n| b.iter(|| record_all(black_box(&source), n)),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_record_all);
criterion_main!(benches);
