//! Pool-backed dense vectors of doubles.
//!
//! Every [`DVec`] on a thread draws from one pool of
//! [`DVEC_BLOCK_COUNT`] blocks of [`DVEC_BLOCK_SIZE`] bytes (just under
//! 1 MiB), aligned for the widest SIMD register the target enables.

use std::rc::Rc;

use pricer_pool::{AllocError, PoolAllocator, PoolConfig, PoolError, PoolRegistry, PoolVec};

use crate::simd::SIMD_ALIGNMENT;

/// Bytes per `DVec` pool block.
pub const DVEC_BLOCK_SIZE: usize = 128;

/// Blocks in a `DVec` pool.
pub const DVEC_BLOCK_COUNT: usize = 8142;

/// Pool identity shared by every `DVec`.
pub const DVEC_POOL: PoolConfig =
    PoolConfig::new(DVEC_BLOCK_SIZE, DVEC_BLOCK_COUNT, SIMD_ALIGNMENT);

const _: () = assert!(DVEC_BLOCK_SIZE % SIMD_ALIGNMENT == 0);

/// Allocator handle behind [`DVec`].
pub type DVecAllocator = PoolAllocator<f64>;

/// Contiguous, SIMD-aligned sequence of `f64` from the `DVec` pool.
pub type DVec = PoolVec<f64, DVecAllocator>;

/// A `DVec` allocator on `registry`.
pub fn dvec_allocator(registry: Rc<PoolRegistry>) -> Result<DVecAllocator, PoolError> {
    PoolAllocator::new(registry, DVEC_POOL)
}

/// A `DVec` allocator on the calling thread's default registry.
pub fn current_dvec_allocator() -> Result<DVecAllocator, PoolError> {
    dvec_allocator(PoolRegistry::current())
}

/// `len` zeros from `alloc`.
pub fn zeros_in(len: usize, alloc: &DVecAllocator) -> Result<DVec, AllocError> {
    DVec::from_elem_in(0.0, len, alloc.clone())
}

/// `len` zeros on the calling thread's default registry.
pub fn zeros(len: usize) -> Result<DVec, AllocError> {
    zeros_in(len, &current_dvec_allocator()?)
}

/// A copy of `values` on the calling thread's default registry.
pub fn from_slice(values: &[f64]) -> Result<DVec, AllocError> {
    DVec::from_slice_in(values, current_dvec_allocator()?)
}
