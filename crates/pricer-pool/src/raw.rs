//! Aligned raw storage backing a pool.
//!
//! The only place the arena is acquired from and returned to the system
//! allocator. Each `unsafe` block carries a `// SAFETY:` comment.

use std::alloc::{self, Layout};
use std::ptr::NonNull;

use crate::error::PoolError;

/// A fixed, aligned byte region. Never resized; released on drop.
pub(crate) struct Arena {
    base: NonNull<u8>,
    layout: Layout,
}

impl Arena {
    /// Acquire `layout.size()` bytes aligned to `layout.align()`.
    ///
    /// `layout` must have a non-zero size (guaranteed by
    /// `PoolConfig::validate`).
    pub(crate) fn new(layout: Layout) -> Result<Self, PoolError> {
        debug_assert!(layout.size() > 0);
        // SAFETY: layout has non-zero size.
        let ptr = unsafe { alloc::alloc(layout) };
        let base = NonNull::new(ptr).ok_or(PoolError::ArenaUnavailable {
            bytes: layout.size(),
            alignment: layout.align(),
        })?;
        Ok(Self { base, layout })
    }

    pub(crate) fn base(&self) -> NonNull<u8> {
        self.base
    }

    pub(crate) fn len(&self) -> usize {
        self.layout.size()
    }

    /// Pointer to the byte at `offset` from the base.
    pub(crate) fn at(&self, offset: usize) -> NonNull<u8> {
        assert!(offset < self.len(), "offset {offset} outside arena");
        // SAFETY: offset is inside the allocation, so the result stays in
        // bounds of the same object and is non-null.
        unsafe { self.base.add(offset) }
    }

    /// Byte offset of `ptr` from the base. Meaningless for foreign pointers.
    pub(crate) fn offset_of(&self, ptr: NonNull<u8>) -> usize {
        (ptr.as_ptr() as usize).wrapping_sub(self.base.as_ptr() as usize)
    }

    /// Whether `ptr` points inside this arena.
    pub(crate) fn contains(&self, ptr: NonNull<u8>) -> bool {
        self.offset_of(ptr) < self.len()
    }
}

impl Drop for Arena {
    fn drop(&mut self) {
        // SAFETY: base was returned by alloc::alloc with exactly this layout
        // and is released only here.
        unsafe { alloc::dealloc(self.base.as_ptr(), self.layout) };
    }
}
