//! Benchmark profiles for the pricer pool allocator and solvers.
//!
//! - [`SOLVE_SIZES`]: system dimensions used by the solver benchmarks
//! - [`reference_system`]: deterministic, well-conditioned system of a given size
//! - [`fragmented_pool`]: a `DVec` pool with every other run occupied

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::rc::Rc;

use pricer_linalg::{dvec_allocator, DVec, DVecAllocator};
use pricer_pool::{AllocError, PoolRegistry, PoolVec};
use pricer_test_utils::{diagonally_dominant, OwnedSystem};

/// Dimensions for solver benchmarks, from cache-resident to half the pool.
pub const SOLVE_SIZES: [usize; 4] = [64, 1_024, 16_384, 65_136];

/// Seed for every benchmark system, so runs are comparable.
pub const REFERENCE_SEED: u64 = 42;

/// A diagonally dominant system of dimension `n`.
pub fn reference_system(n: usize) -> OwnedSystem {
    diagonally_dominant(n, REFERENCE_SEED)
}

/// A `DVec` allocator on a fresh registry.
///
/// Benchmarks use their own registry so results do not depend on what
/// earlier benchmarks left in the thread's default pools.
pub fn fresh_allocator() -> Result<DVecAllocator, AllocError> {
    Ok(dvec_allocator(Rc::new(PoolRegistry::new()))?)
}

/// Fill `alloc`'s pool with runs of `run_len` doubles, then free every
/// other run. Returns the survivors, which keep the holes in place.
pub fn fragmented_pool(alloc: &DVecAllocator, run_len: usize) -> Result<Vec<DVec>, AllocError> {
    let mut runs = Vec::new();
    if run_len == 0 {
        return Ok(runs);
    }
    loop {
        match PoolVec::from_elem_in(0.0, run_len, alloc.clone()) {
            Ok(run) => runs.push(run),
            Err(AllocError::Exhausted { .. }) => break,
            Err(e) => return Err(e),
        }
    }
    Ok(runs
        .into_iter()
        .enumerate()
        .filter_map(|(i, run)| (i % 2 == 1).then_some(run))
        .collect())
}
