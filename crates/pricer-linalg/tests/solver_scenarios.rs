//! Solver scenarios over pool-backed storage.

use std::rc::Rc;

use pricer_linalg::dvec::zeros_in;
use pricer_linalg::{
    dvec_allocator, tridiagonal_solve, tridiagonal_solve_in, LinalgError, DVEC_BLOCK_COUNT,
    DVEC_BLOCK_SIZE,
};
use pricer_pool::{AllocError, PoolRegistry};
use pricer_test_utils::{assert_close, diagonally_dominant, poisson};

#[test]
fn poisson_systems_solve_to_ones() {
    for n in [1, 2, 3, 10, 100, 500] {
        let system = poisson(n);
        let x = tridiagonal_solve(&system.view()).unwrap();
        assert_close(&x, &vec![1.0; n], 1e-9);
    }
}

#[test]
fn repeated_solves_do_not_leak_pool_blocks() {
    let alloc = dvec_allocator(Rc::new(PoolRegistry::new())).unwrap();
    let system = diagonally_dominant(1000, 3);
    let first = tridiagonal_solve_in(&system.view(), alloc.clone()).unwrap();
    let used = alloc.stats().unwrap().used_blocks;
    for _ in 0..50 {
        let again = tridiagonal_solve_in(&system.view(), alloc.clone()).unwrap();
        assert_eq!(again, first);
    }
    assert_eq!(alloc.stats().unwrap().used_blocks, used);
}

#[test]
fn largest_system_fills_the_pool_exactly() {
    // Working vector and result each take half the pool.
    let n = DVEC_BLOCK_SIZE * DVEC_BLOCK_COUNT / 8 / 2;
    let alloc = dvec_allocator(Rc::new(PoolRegistry::new())).unwrap();

    let fits = diagonally_dominant(n, 1);
    let x = tridiagonal_solve_in(&fits.view(), alloc.clone()).unwrap();
    assert_eq!(x.len(), n);
    assert_eq!(alloc.stats().unwrap().used_blocks, DVEC_BLOCK_COUNT / 2);
    drop(x);

    let too_big = diagonally_dominant(n + 1, 1);
    let err = tridiagonal_solve_in(&too_big.view(), alloc.clone()).unwrap_err();
    assert!(matches!(
        err,
        LinalgError::Allocation(AllocError::Exhausted { .. })
    ));
    assert_eq!(alloc.stats().unwrap().used_blocks, 0);
}

#[test]
fn live_vectors_reduce_solver_headroom() {
    let alloc = dvec_allocator(Rc::new(PoolRegistry::new())).unwrap();
    let doubles = DVEC_BLOCK_SIZE * DVEC_BLOCK_COUNT / 8;
    let _ballast = zeros_in(doubles - 16, &alloc).unwrap();

    // One block left: enough for neither working storage nor result of 32.
    let err = tridiagonal_solve_in(&poisson(32).view(), alloc.clone()).unwrap_err();
    assert!(matches!(err, LinalgError::Allocation(_)));

    let small = tridiagonal_solve_in(&poisson(1).view(), alloc).unwrap_err();
    // A single unknown still needs two blocks, one per vector.
    assert!(matches!(small, LinalgError::Allocation(_)));
}

#[cfg(not(miri))]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn dominant_systems_recover_their_solution(n in 1usize..400, seed in any::<u64>()) {
            let system = diagonally_dominant(n, seed);
            let view = system.view();
            let x = tridiagonal_solve(&view).unwrap();
            let expected: Vec<f64> = (0..n).map(|i| 1.0 + i as f64 / n as f64).collect();
            for (a, e) in x.iter().zip(&expected) {
                prop_assert!((a - e).abs() < 1e-10, "{} vs {}", a, e);
            }
            prop_assert!(view.max_residual(&x).unwrap() < 1e-10);
        }
    }
}
