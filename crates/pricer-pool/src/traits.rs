//! The allocator interface consumed by pool-backed containers.

use std::ptr::NonNull;

use crate::error::AllocError;

/// An element-typed allocator: hands out storage for `n` values of
/// [`Value`](Self::Value) at a time.
///
/// This is the seam between containers such as [`PoolVec`](crate::PoolVec)
/// and the storage behind them. Exhaustion is reported as an `Err`, never
/// as a panic or a null pointer.
///
/// Zero-sized requests (`n == 0`, or a zero-sized `Value`) succeed with a
/// dangling, well-aligned pointer and must be deallocated with the same
/// `n`, which is then a no-op.
pub trait ElementAllocator: Clone {
    /// The element type this allocator is bound to.
    type Value;

    /// The same allocator family, bound to element type `U`.
    type Rebind<U>: ElementAllocator<Value = U>;

    /// Allocate uninitialised storage for `n` elements.
    fn allocate(&self, n: usize) -> Result<NonNull<Self::Value>, AllocError>;

    /// Release storage for `n` elements.
    ///
    /// # Safety
    ///
    /// `ptr` must come from [`allocate`](Self::allocate) on this allocator,
    /// or on one that compares equal to it, called with the same `n`, and
    /// must not have been deallocated already.
    unsafe fn deallocate(&self, ptr: NonNull<Self::Value>, n: usize);

    /// An allocator of the same family for element type `U`.
    ///
    /// The result must satisfy `U`'s alignment.
    fn rebind<U>(&self) -> Result<Self::Rebind<U>, AllocError>;
}
