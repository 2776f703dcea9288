//! Benchmark for TransientFlexVector.
//!
//! Compares batch edits through a transient against the same edits made with
//! persistent operations and with a standard Vec.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use flexvec::persistent::{FlexVector, TransientFlexVector};
use std::hint::black_box;

// =============================================================================
// push_back Benchmarks
// =============================================================================

fn benchmark_transient_push_back(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("transient_push_back");

    for size in [1_000, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::new("TransientFlexVector", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut transient = TransientFlexVector::<i32>::new();
                for index in 0..size {
                    transient.push_back(black_box(index));
                }
                black_box(transient.persistent())
            });
        });

        group.bench_with_input(BenchmarkId::new("FlexVector", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut vector = FlexVector::<i32>::new();
                for index in 0..size {
                    vector = vector.push_back(black_box(index));
                }
                black_box(vector)
            });
        });

        group.bench_with_input(BenchmarkId::new("Vec", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut vector = Vec::new();
                for index in 0..size {
                    vector.push(black_box(index));
                }
                black_box(vector)
            });
        });
    }

    group.finish();
}

// =============================================================================
// Update Benchmarks
// =============================================================================

fn benchmark_transient_update(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("transient_update");

    for size in [1_000, 10_000, 100_000] {
        let vector: FlexVector<i32> = (0..size).collect();
        let length = vector.len();

        group.bench_with_input(BenchmarkId::new("TransientFlexVector", size), &size, |bencher, _| {
            bencher.iter(|| {
                let mut transient = vector.transient();
                for index in 0..length {
                    transient.update_with(index, |value| black_box(value + 1));
                }
                black_box(transient.persistent())
            });
        });

        group.bench_with_input(BenchmarkId::new("FlexVector", size), &size, |bencher, _| {
            bencher.iter(|| {
                let mut updated = vector.clone();
                for index in 0..length {
                    if let Some(next) = updated.update_with(index, |value| black_box(value + 1)) {
                        updated = next;
                    }
                }
                black_box(updated)
            });
        });
    }

    group.finish();
}

// =============================================================================
// push_front Benchmarks
// =============================================================================

fn benchmark_transient_push_front(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("transient_push_front");

    for size in [100, 1_000] {
        group.bench_with_input(BenchmarkId::new("TransientFlexVector", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut transient = TransientFlexVector::<i32>::new();
                for index in 0..size {
                    transient.push_front(black_box(index));
                }
                black_box(transient.persistent())
            });
        });

        group.bench_with_input(BenchmarkId::new("FlexVector", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut vector = FlexVector::<i32>::new();
                for index in 0..size {
                    vector = vector.push_front(black_box(index));
                }
                black_box(vector)
            });
        });
    }

    group.finish();
}

// =============================================================================
// Criterion Group and Main
// =============================================================================

criterion_group!(
    benches,
    benchmark_transient_push_back,
    benchmark_transient_update,
    benchmark_transient_push_front
);

criterion_main!(benches);
