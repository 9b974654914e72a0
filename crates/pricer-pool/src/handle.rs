//! Element-typed allocator handles.
//!
//! A [`PoolAllocator<T>`] is the facade containers talk to. It carries no
//! allocation state of its own: it converts element counts to bytes and
//! routes each request to the pool its registry holds for its config.

use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;
use std::rc::Rc;

use crate::config::{ElementLayout, PoolConfig};
use crate::error::{AllocError, PoolError};
use crate::pool::PoolStats;
use crate::registry::PoolRegistry;
use crate::traits::ElementAllocator;

/// A handle that allocates `T`s from a registry's pool.
///
/// Cloning is cheap (an `Rc` bump). Two handles compare equal, and may free
/// each other's allocations, iff they share a registry and a config; the
/// element type does not take part in the comparison.
///
/// Handles hold an `Rc`, so they are `!Send`: an allocation can only be
/// returned on the thread whose registry produced it.
pub struct PoolAllocator<T> {
    registry: Rc<PoolRegistry>,
    config: PoolConfig,
    _marker: PhantomData<fn() -> T>,
}

impl<T> PoolAllocator<T> {
    /// Create a handle for `config` on `registry`.
    ///
    /// No pool is built yet; that happens on the first allocation.
    ///
    /// # Errors
    ///
    /// Returns `Err(PoolError::InvalidConfig)` if `config` fails validation
    /// or its alignment is below `align_of::<T>()`.
    pub fn new(registry: Rc<PoolRegistry>, config: PoolConfig) -> Result<Self, PoolError> {
        config.validate()?;
        let align = std::mem::align_of::<T>();
        if config.alignment < align {
            return Err(PoolError::InvalidConfig {
                reason: format!(
                    "alignment {} is below the element alignment {align}",
                    config.alignment
                ),
            });
        }
        Ok(Self {
            registry,
            config,
            _marker: PhantomData,
        })
    }

    /// Create a handle for `config` on the calling thread's default registry.
    pub fn for_current_thread(config: PoolConfig) -> Result<Self, PoolError> {
        Self::new(PoolRegistry::current(), config)
    }

    /// The pool configuration this handle resolves to.
    pub fn config(&self) -> PoolConfig {
        self.config
    }

    /// The registry this handle routes through.
    pub fn registry(&self) -> &Rc<PoolRegistry> {
        &self.registry
    }

    /// Allocate uninitialised storage for `n` values of `T`.
    ///
    /// Requests of zero bytes return a dangling pointer without touching
    /// the pool.
    ///
    /// # Errors
    ///
    /// - `AllocError::CapacityOverflow` if `n × size_of::<T>()` overflows.
    /// - `AllocError::Pool` if the pool did not exist and could not be built.
    /// - `AllocError::Exhausted` if the pool has no free run long enough.
    pub fn allocate(&self, n: usize) -> Result<NonNull<T>, AllocError> {
        let bytes = byte_len::<T>(n)?;
        if bytes == 0 {
            return Ok(NonNull::dangling());
        }
        let ptr = self.registry.with_pool(self.config, |pool| {
            pool.allocate(bytes).ok_or_else(|| AllocError::Exhausted {
                requested_blocks: pool.config().blocks_for(bytes),
                free_blocks: pool.free_blocks(),
            })
        })??;
        Ok(ptr.cast())
    }

    /// Return storage for `n` values of `T`.
    ///
    /// # Safety
    ///
    /// `ptr` must have been returned by `allocate(n)` on this handle or on
    /// one equal to it, and must not have been deallocated already.
    pub unsafe fn deallocate(&self, ptr: NonNull<T>, n: usize) {
        let bytes = n.saturating_mul(std::mem::size_of::<T>());
        if bytes == 0 {
            return;
        }
        // SAFETY: forwarded caller contract; equal handles share the pool.
        unsafe { self.registry.deallocate(self.config, ptr.cast(), bytes) };
    }

    /// A handle for element type `U` on the same registry.
    ///
    /// Keeps block size and count, raising the alignment to `U`'s if it is
    /// stricter. See [`PoolConfig::retyped`].
    ///
    /// # Errors
    ///
    /// Returns `Err(PoolError::InvalidConfig)` if the raised alignment no
    /// longer divides the block size.
    pub fn rebind<U>(&self) -> Result<PoolAllocator<U>, PoolError> {
        self.retype(ElementLayout::of::<U>())
    }

    /// A handle for an element described by `element`, on the same registry.
    ///
    /// The explicit form of [`rebind`](Self::rebind): `U` must have the
    /// layout `element` describes, or at least no stricter alignment.
    pub fn retype<U>(&self, element: ElementLayout) -> Result<PoolAllocator<U>, PoolError> {
        PoolAllocator::new(Rc::clone(&self.registry), self.config.retyped(element))
    }

    /// Occupancy of this handle's pool, if it has been created.
    pub fn stats(&self) -> Option<PoolStats> {
        self.registry.pool_stats(&self.config)
    }
}

fn byte_len<T>(n: usize) -> Result<usize, AllocError> {
    let size = std::mem::size_of::<T>();
    n.checked_mul(size).ok_or(AllocError::CapacityOverflow {
        elements: n,
        element_size: size,
    })
}

impl<T> Clone for PoolAllocator<T> {
    fn clone(&self) -> Self {
        Self {
            registry: Rc::clone(&self.registry),
            config: self.config,
            _marker: PhantomData,
        }
    }
}

impl<T, U> PartialEq<PoolAllocator<U>> for PoolAllocator<T> {
    fn eq(&self, other: &PoolAllocator<U>) -> bool {
        Rc::ptr_eq(&self.registry, &other.registry) && self.config == other.config
    }
}

impl<T> Eq for PoolAllocator<T> {}

impl<T> fmt::Debug for PoolAllocator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolAllocator")
            .field("element", &std::any::type_name::<T>())
            .field("config", &self.config)
            .field("registry", &Rc::as_ptr(&self.registry))
            .finish()
    }
}

impl<T> ElementAllocator for PoolAllocator<T> {
    type Value = T;
    type Rebind<U> = PoolAllocator<U>;

    fn allocate(&self, n: usize) -> Result<NonNull<T>, AllocError> {
        PoolAllocator::allocate(self, n)
    }

    unsafe fn deallocate(&self, ptr: NonNull<T>, n: usize) {
        // SAFETY: forwarded caller contract.
        unsafe { PoolAllocator::deallocate(self, ptr, n) }
    }

    fn rebind<U>(&self) -> Result<Self::Rebind<U>, AllocError> {
        Ok(PoolAllocator::<T>::rebind::<U>(self)?)
    }
}
