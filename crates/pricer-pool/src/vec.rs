//! Growable contiguous sequences over an [`ElementAllocator`].
//!
//! [`PoolVec`] is the container the pools exist for. It behaves like a
//! minimal `Vec` whose storage comes from its allocator, and every
//! operation that may allocate is fallible: exhaustion of a fixed pool is
//! an ordinary error, not a panic.
//!
//! Pools have no in-place resize, so growth allocates a new run, moves the
//! elements and returns the old run. When the doubled capacity cannot be
//! found, growth retries with the exact capacity needed.

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::ptr::{self, NonNull};

use crate::error::AllocError;
use crate::traits::ElementAllocator;

/// Smallest non-zero capacity chosen by amortised growth.
const MIN_NON_ZERO_CAP: usize = 4;

/// A contiguous growable sequence whose storage comes from `A`.
///
/// Thread-safety follows the allocator: backed by a
/// [`PoolAllocator`](crate::PoolAllocator) the vector is `!Send`, so it is
/// always dropped on the thread whose pool it came from.
pub struct PoolVec<T, A: ElementAllocator<Value = T>> {
    ptr: NonNull<T>,
    len: usize,
    cap: usize,
    alloc: A,
    _owns: PhantomData<T>,
}

// SAFETY: PoolVec uniquely owns its elements and storage, like Vec. Sending
// or sharing it is sound whenever the elements and the allocator allow it.
unsafe impl<T: Send, A: ElementAllocator<Value = T> + Send> Send for PoolVec<T, A> {}
// SAFETY: see above; &PoolVec only hands out &T and &A.
unsafe impl<T: Sync, A: ElementAllocator<Value = T> + Sync> Sync for PoolVec<T, A> {}

impl<T, A: ElementAllocator<Value = T>> PoolVec<T, A> {
    const IS_ZST: bool = std::mem::size_of::<T>() == 0;

    /// An empty vector. Does not allocate.
    pub fn new_in(alloc: A) -> Self {
        Self {
            ptr: NonNull::dangling(),
            len: 0,
            cap: if Self::IS_ZST { usize::MAX } else { 0 },
            alloc,
            _owns: PhantomData,
        }
    }

    /// An empty vector with room for exactly `capacity` elements.
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Result<Self, AllocError> {
        let mut vec = Self::new_in(alloc);
        vec.try_reserve_exact(capacity)?;
        Ok(vec)
    }

    /// A vector of `n` clones of `value`, allocated exactly.
    pub fn from_elem_in(value: T, n: usize, alloc: A) -> Result<Self, AllocError>
    where
        T: Clone,
    {
        let mut vec = Self::with_capacity_in(n, alloc)?;
        for _ in 0..n {
            // SAFETY: capacity for n elements was reserved above.
            unsafe { vec.push_unchecked(value.clone()) };
        }
        Ok(vec)
    }

    /// A vector holding clones of `values`, allocated exactly.
    pub fn from_slice_in(values: &[T], alloc: A) -> Result<Self, AllocError>
    where
        T: Clone,
    {
        let mut vec = Self::with_capacity_in(values.len(), alloc)?;
        vec.try_extend_from_slice(values)?;
        Ok(vec)
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the vector holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of elements the current storage can hold.
    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// The allocator backing this vector.
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Raw pointer to the first element.
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    /// Mutable raw pointer to the first element.
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// The elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: the first len slots are initialised; ptr is non-null and
        // aligned even when dangling.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// The elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as in as_slice, and &mut self guarantees uniqueness.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Append `value`, growing the storage if needed.
    ///
    /// On error the vector is unchanged and `value` is dropped.
    pub fn try_push(&mut self, value: T) -> Result<(), AllocError> {
        if self.len == self.cap {
            self.grow(1)?;
        }
        // SAFETY: len < cap after the check or growth above.
        unsafe { self.push_unchecked(value) };
        Ok(())
    }

    /// Append clones of `values`, growing the storage if needed.
    pub fn try_extend_from_slice(&mut self, values: &[T]) -> Result<(), AllocError>
    where
        T: Clone,
    {
        self.try_reserve(values.len())?;
        for value in values {
            // SAFETY: capacity for values.len() more elements was reserved.
            unsafe { self.push_unchecked(value.clone()) };
        }
        Ok(())
    }

    /// Remove and return the last element.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: slot `len` was initialised and is now outside the live range.
        Some(unsafe { self.ptr.add(self.len).read() })
    }

    /// Drop every element past `len`. No effect if `len >= self.len()`.
    ///
    /// Storage is kept; pools only reclaim it when the vector is dropped.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        let tail_len = self.len - len;
        // SAFETY: len < self.len <= cap, so the offset is in bounds.
        let tail = unsafe { self.ptr.add(len) };
        // Shrink first so a panicking destructor cannot cause a double drop.
        self.len = len;
        // SAFETY: the tail slots were initialised and are no longer live.
        unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(tail.as_ptr(), tail_len)) };
    }

    /// Drop every element, keeping the storage.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Ensure room for `additional` more elements, with amortised growth.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), AllocError> {
        if self.cap - self.len >= additional {
            return Ok(());
        }
        self.grow(additional)
    }

    /// Ensure room for exactly `additional` more elements.
    pub fn try_reserve_exact(&mut self, additional: usize) -> Result<(), AllocError> {
        if self.cap - self.len >= additional {
            return Ok(());
        }
        let required = self.required(additional)?;
        self.reallocate(required)
    }

    /// A copy of this vector, allocated exactly, from a clone of its allocator.
    pub fn try_clone(&self) -> Result<Self, AllocError>
    where
        T: Clone,
    {
        Self::from_slice_in(self.as_slice(), self.alloc.clone())
    }

    /// # Safety
    ///
    /// `self.len < self.cap`.
    unsafe fn push_unchecked(&mut self, value: T) {
        debug_assert!(self.len < self.cap);
        // SAFETY: len < cap, so the slot is in bounds and uninitialised.
        unsafe { self.ptr.add(self.len).write(value) };
        self.len += 1;
    }

    fn required(&self, additional: usize) -> Result<usize, AllocError> {
        self.len
            .checked_add(additional)
            .ok_or(AllocError::CapacityOverflow {
                elements: usize::MAX,
                element_size: std::mem::size_of::<T>(),
            })
    }

    fn grow(&mut self, additional: usize) -> Result<(), AllocError> {
        let required = self.required(additional)?;
        let amortised = self
            .cap
            .saturating_mul(2)
            .max(required)
            .max(MIN_NON_ZERO_CAP);
        match self.reallocate(amortised) {
            Err(AllocError::Exhausted { .. }) if amortised > required => {
                self.reallocate(required)
            }
            other => other,
        }
    }

    /// Move the elements into fresh storage for `new_cap` elements.
    fn reallocate(&mut self, new_cap: usize) -> Result<(), AllocError> {
        debug_assert!(!Self::IS_ZST && new_cap >= self.len);
        let new_ptr = self.alloc.allocate(new_cap)?;
        // SAFETY: both regions hold at least len elements and belong to
        // distinct live allocations.
        unsafe { ptr::copy_nonoverlapping(self.ptr.as_ptr(), new_ptr.as_ptr(), self.len) };
        if self.cap != 0 {
            // SAFETY: ptr came from allocate(cap) on this allocator and its
            // elements have been moved out bitwise.
            unsafe { self.alloc.deallocate(self.ptr, self.cap) };
        }
        self.ptr = new_ptr;
        self.cap = new_cap;
        Ok(())
    }
}

impl<T, A: ElementAllocator<Value = T>> Drop for PoolVec<T, A> {
    fn drop(&mut self) {
        // SAFETY: the first len slots are initialised and dropped once here.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.ptr.as_ptr(), self.len));
        }
        if self.cap != 0 && !Self::IS_ZST {
            // SAFETY: ptr came from allocate(cap) on this allocator.
            unsafe { self.alloc.deallocate(self.ptr, self.cap) };
        }
    }
}

impl<T, A: ElementAllocator<Value = T>> Deref for PoolVec<T, A> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: ElementAllocator<Value = T>> DerefMut for PoolVec<T, A> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, A: ElementAllocator<Value = T>> AsRef<[T]> for PoolVec<T, A> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<'a, T, A: ElementAllocator<Value = T>> IntoIterator for &'a PoolVec<T, A> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T, A: ElementAllocator<Value = T>> IntoIterator for &'a mut PoolVec<T, A> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}

impl<T: fmt::Debug, A: ElementAllocator<Value = T>> fmt::Debug for PoolVec<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T, U, A, B> PartialEq<PoolVec<U, B>> for PoolVec<T, A>
where
    T: PartialEq<U>,
    A: ElementAllocator<Value = T>,
    B: ElementAllocator<Value = U>,
{
    fn eq(&self, other: &PoolVec<U, B>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T, U, A> PartialEq<[U]> for PoolVec<T, A>
where
    T: PartialEq<U>,
    A: ElementAllocator<Value = T>,
{
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T, U, A, const N: usize> PartialEq<[U; N]> for PoolVec<T, A>
where
    T: PartialEq<U>,
    A: ElementAllocator<Value = T>,
{
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}
