//! Criterion benchmarks for the tridiagonal solver, pool vs heap storage.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pricer_bench::{fresh_allocator, reference_system, SOLVE_SIZES};
use pricer_linalg::tridiagonal_solve_in;
use pricer_pool::HeapAllocator;

/// Benchmark: full solve including working and result allocation.
fn bench_tridiagonal_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("tridiagonal_solve");
    for n in SOLVE_SIZES {
        let system = reference_system(n);
        group.throughput(Throughput::Elements(n as u64));

        group.bench_with_input(BenchmarkId::new("pool", n), &system, |b, system| {
            let alloc = fresh_allocator().unwrap();
            let view = system.view();
            b.iter(|| {
                let x = tridiagonal_solve_in(black_box(&view), alloc.clone()).unwrap();
                black_box(x[0]);
            });
        });

        group.bench_with_input(BenchmarkId::new("heap", n), &system, |b, system| {
            let view = system.view();
            b.iter(|| {
                let x = tridiagonal_solve_in(black_box(&view), HeapAllocator::<f64>::new()).unwrap();
                black_box(x[0]);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_tridiagonal_solve);
criterion_main!(benches);
