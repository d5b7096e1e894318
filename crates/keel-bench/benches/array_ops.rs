//! Criterion micro-benchmarks for the dynamic array engine.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use keel_alloc::{BumpAllocator, HeapAllocator};
use keel_array::{ArrayError, ArrayOptions, DynamicArray};
use keel_bench::{filled_array, shuffled};

/// Benchmark: append 10K elements, doubling the reserve whenever full.
fn bench_append_doubling(c: &mut Criterion) {
    let heap = HeapAllocator;
    let options = ArrayOptions::<u32, _>::new(&heap).unwrap();
    c.bench_function("append_doubling_10k", |b| {
        b.iter(|| {
            let mut array = DynamicArray::with_reserve(&options, 1).unwrap();
            for v in 0..10_000u32 {
                if let Err(ArrayError::NoReserve { reserved }) = array.append(&v) {
                    array.grow(reserved * 2).unwrap();
                    array.append(&v).unwrap();
                }
            }
            black_box(array.len());
        });
    });
}

/// Benchmark: merge sort of shuffled input at several sizes.
fn bench_sort(c: &mut Criterion) {
    let heap = HeapAllocator;
    let options = ArrayOptions::<u32, _>::new(&heap).unwrap();
    let mut group = c.benchmark_group("sort_heap");
    for n in [100u32, 1_000, 10_000] {
        let input = shuffled(n, 0x5eed);
        group.bench_with_input(BenchmarkId::from_parameter(n), &input, |b, input| {
            b.iter(|| {
                let mut array = filled_array(&options, input).unwrap();
                array.sort().unwrap();
                black_box(array.get(0).copied());
            });
        });
    }
    group.finish();
}

/// Benchmark: 1K-element sort with every buffer carved from an arena.
fn bench_sort_in_arena(c: &mut Criterion) {
    let mut backing = vec![0u8; 1024 * 1024];
    let mut arena = BumpAllocator::new(&mut backing).unwrap();
    let input = shuffled(1_000, 0x5eed);
    c.bench_function("sort_arena_1k", |b| {
        b.iter(|| {
            {
                let options = ArrayOptions::<u32, _>::new(&arena).unwrap();
                let mut array = filled_array(&options, &input).unwrap();
                array.sort().unwrap();
                black_box(array.len());
            }
            arena.reset();
        });
    });
}

/// Benchmark: linear vs binary search over 10K sorted elements.
fn bench_search(c: &mut Criterion) {
    let heap = HeapAllocator;
    let options = ArrayOptions::<u32, _>::new(&heap).unwrap();
    let values: Vec<u32> = (0..10_000).collect();
    let array = filled_array(&options, &values).unwrap();
    let keys = shuffled(10_000, 99);

    c.bench_function("linear_search_10k", |b| {
        let mut i = 0;
        b.iter(|| {
            let key = keys[i % keys.len()];
            i += 1;
            black_box(array.linear_search(None, &key));
        });
    });
    c.bench_function("binary_search_10k", |b| {
        let mut i = 0;
        b.iter(|| {
            let key = keys[i % keys.len()];
            i += 1;
            black_box(array.binary_search(&key));
        });
    });
}

criterion_group!(
    benches,
    bench_append_doubling,
    bench_sort,
    bench_sort_in_arena,
    bench_search
);
criterion_main!(benches);
