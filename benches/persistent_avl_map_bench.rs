//! Benchmark for PersistentAvlMap vs standard BTreeMap.
//!
//! Compares the persistent map against Rust's standard BTreeMap for common
//! operations. BTreeMap is mutated in place, so the comparison shows the cost
//! of keeping every version alive.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use persistent_avl::persistent::PersistentAvlMap;
use std::collections::BTreeMap;
use std::hint::black_box;

const SIZES: [i32; 3] = [100, 1000, 10000];

fn persistent_map(size: i32) -> PersistentAvlMap<i32, i32> {
    (0..size).map(|index| (index, index * 2)).collect()
}

fn standard_map(size: i32) -> BTreeMap<i32, i32> {
    (0..size).map(|index| (index, index * 2)).collect()
}

// =============================================================================
// insert Benchmark
// =============================================================================

fn benchmark_insert(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("insert");

    for size in SIZES {
        group.bench_with_input(
            BenchmarkId::new("PersistentAvlMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut map = PersistentAvlMap::new();
                    for index in 0..size {
                        map = map.insert(black_box(index), black_box(index * 2));
                    }
                    black_box(map)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("BTreeMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut map = BTreeMap::new();
                    for index in 0..size {
                        map.insert(black_box(index), black_box(index * 2));
                    }
                    black_box(map)
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// get Benchmark
// =============================================================================

fn benchmark_get(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("get");

    for size in SIZES {
        let persistent = persistent_map(size);
        let standard = standard_map(size);

        group.bench_with_input(
            BenchmarkId::new("PersistentAvlMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut sum = 0;
                    for key in 0..size {
                        if let Some(&value) = persistent.get(&black_box(key)) {
                            sum += value;
                        }
                    }
                    black_box(sum)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("BTreeMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut sum = 0;
                    for key in 0..size {
                        if let Some(&value) = standard.get(&black_box(key)) {
                            sum += value;
                        }
                    }
                    black_box(sum)
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// remove Benchmark
// =============================================================================

fn benchmark_remove(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("remove");

    for size in SIZES {
        let persistent = persistent_map(size);
        let standard = standard_map(size);

        group.bench_with_input(
            BenchmarkId::new("PersistentAvlMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut map = persistent.clone();
                    for key in (0..size).step_by(2) {
                        map = map.remove(&black_box(key));
                    }
                    black_box(map)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("BTreeMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut map = standard.clone();
                    for key in (0..size).step_by(2) {
                        map.remove(&black_box(key));
                    }
                    black_box(map)
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// iteration Benchmark
// =============================================================================

fn benchmark_iteration(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("iteration");

    for size in SIZES {
        let persistent = persistent_map(size);
        let standard = standard_map(size);

        group.bench_with_input(
            BenchmarkId::new("PersistentAvlMap", size),
            &size,
            |bencher, _| {
                bencher.iter(|| {
                    let sum: i32 = persistent.values().sum();
                    black_box(sum)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("PersistentAvlMap_fold_right", size),
            &size,
            |bencher, _| {
                bencher.iter(|| {
                    let sum = persistent.fold_right(0, |(_, value), accumulator| accumulator + value);
                    black_box(sum)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("BTreeMap", size),
            &size,
            |bencher, _| {
                bencher.iter(|| {
                    let sum: i32 = standard.values().sum();
                    black_box(sum)
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// merge Benchmark
// =============================================================================

fn benchmark_merge(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("merge");

    for size in SIZES {
        let persistent_left = persistent_map(size);
        let persistent_right: PersistentAvlMap<i32, i32> =
            (size / 2..size + size / 2).map(|index| (index, -index)).collect();
        let standard_left = standard_map(size);
        let standard_right: BTreeMap<i32, i32> =
            (size / 2..size + size / 2).map(|index| (index, -index)).collect();

        group.bench_with_input(
            BenchmarkId::new("PersistentAvlMap", size),
            &size,
            |bencher, _| {
                bencher.iter(|| black_box(persistent_left.merge(black_box(&persistent_right))));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("BTreeMap", size),
            &size,
            |bencher, _| {
                bencher.iter(|| {
                    let mut merged = standard_left.clone();
                    merged.extend(standard_right.iter().map(|(&key, &value)| (key, value)));
                    black_box(merged)
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// equality Benchmark
// =============================================================================

fn benchmark_equality(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("equality");

    for size in SIZES {
        let ascending = persistent_map(size);
        let descending: PersistentAvlMap<i32, i32> =
            (0..size).rev().map(|index| (index, index * 2)).collect();
        let standard_first = standard_map(size);
        let standard_second = standard_map(size);

        group.bench_with_input(
            BenchmarkId::new("PersistentAvlMap", size),
            &size,
            |bencher, _| {
                bencher.iter(|| black_box(ascending.structural_eq(black_box(&descending))));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("BTreeMap", size),
            &size,
            |bencher, _| {
                bencher.iter(|| black_box(standard_first == *black_box(&standard_second)));
            },
        );
    }

    group.finish();
}

// =============================================================================
// min/max Benchmark
// =============================================================================

fn benchmark_min_max(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("min_max");

    for size in SIZES {
        let persistent = persistent_map(size);
        let standard = standard_map(size);

        group.bench_with_input(
            BenchmarkId::new("PersistentAvlMap", size),
            &size,
            |bencher, _| {
                bencher.iter(|| black_box((persistent.min(), persistent.max())));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("BTreeMap", size),
            &size,
            |bencher, _| {
                bencher.iter(|| {
                    black_box((standard.first_key_value(), standard.last_key_value()))
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_insert,
    benchmark_get,
    benchmark_remove,
    benchmark_iteration,
    benchmark_merge,
    benchmark_equality,
    benchmark_min_max
);

criterion_main!(benches);
