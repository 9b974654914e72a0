//! General-purpose heap allocator behind the [`ElementAllocator`] interface.
//!
//! Pools never fall back to the heap on their own. Callers whose data may
//! outgrow a pool's fixed capacity choose [`HeapAllocator`] explicitly.

use std::alloc::{self, Layout};
use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::error::{AllocError, PoolError};
use crate::traits::ElementAllocator;

/// Allocates `T`s from the global allocator at a chosen alignment.
pub struct HeapAllocator<T> {
    alignment: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> HeapAllocator<T> {
    /// A heap allocator at `T`'s natural alignment.
    pub fn new() -> Self {
        Self {
            alignment: std::mem::align_of::<T>(),
            _marker: PhantomData,
        }
    }

    /// A heap allocator at `alignment`, raised to `T`'s natural alignment if
    /// lower.
    ///
    /// # Errors
    ///
    /// Returns `Err(PoolError::InvalidConfig)` if `alignment` is not a power
    /// of two.
    pub fn with_alignment(alignment: usize) -> Result<Self, PoolError> {
        if !alignment.is_power_of_two() {
            return Err(PoolError::InvalidConfig {
                reason: format!("alignment {alignment} is not a power of two"),
            });
        }
        Ok(Self {
            alignment: alignment.max(std::mem::align_of::<T>()),
            _marker: PhantomData,
        })
    }

    /// Alignment of every allocation in bytes.
    pub fn alignment(&self) -> usize {
        self.alignment
    }

    fn layout(&self, n: usize) -> Result<Layout, AllocError> {
        let size = std::mem::size_of::<T>();
        let overflow = AllocError::CapacityOverflow {
            elements: n,
            element_size: size,
        };
        let bytes = n.checked_mul(size).ok_or_else(|| overflow.clone())?;
        Layout::from_size_align(bytes, self.alignment).map_err(|_| overflow)
    }
}

impl<T> Default for HeapAllocator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for HeapAllocator<T> {
    fn clone(&self) -> Self {
        Self {
            alignment: self.alignment,
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for HeapAllocator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeapAllocator")
            .field("element", &std::any::type_name::<T>())
            .field("alignment", &self.alignment)
            .finish()
    }
}

impl<T> ElementAllocator for HeapAllocator<T> {
    type Value = T;
    type Rebind<U> = HeapAllocator<U>;

    fn allocate(&self, n: usize) -> Result<NonNull<T>, AllocError> {
        let layout = self.layout(n)?;
        if layout.size() == 0 {
            return Ok(NonNull::dangling());
        }
        // SAFETY: layout has non-zero size.
        let ptr = unsafe { alloc::alloc(layout) };
        NonNull::new(ptr.cast::<T>()).ok_or(AllocError::OutOfMemory {
            bytes: layout.size(),
        })
    }

    unsafe fn deallocate(&self, ptr: NonNull<T>, n: usize) {
        let Ok(layout) = self.layout(n) else {
            return;
        };
        if layout.size() == 0 {
            return;
        }
        // SAFETY: the caller guarantees ptr came from allocate(n) on an
        // allocator with this alignment, so it was allocated with `layout`.
        unsafe { alloc::dealloc(ptr.as_ptr().cast(), layout) };
    }

    fn rebind<U>(&self) -> Result<Self::Rebind<U>, AllocError> {
        Ok(HeapAllocator::<U>::with_alignment(self.alignment)?)
    }
}
