//! Per-thread pool ownership and lazy construction.
//!
//! A [`PoolRegistry`] owns at most one [`Pool`] per [`PoolConfig`]. Pools
//! are created on the first request for their config and live until the
//! registry is dropped. The registry is `!Send` and `!Sync`: it and every
//! pool inside it belong to the thread that created it.
//!
//! [`PoolRegistry::current`] returns the calling thread's default registry,
//! which is dropped (releasing all of its pools) when the thread exits and
//! the last handle referring to it is gone.

use std::cell::RefCell;
use std::fmt;
use std::ptr::NonNull;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::config::PoolConfig;
use crate::error::PoolError;
use crate::pool::{Pool, PoolStats};

thread_local! {
    static CURRENT: Rc<PoolRegistry> = Rc::new(PoolRegistry::new());
}

/// Owner of one thread's pools, keyed by configuration.
///
/// Iteration order (for [`stats`](Self::stats)) is pool creation order.
pub struct PoolRegistry {
    pools: RefCell<IndexMap<PoolConfig, Pool>>,
}

impl PoolRegistry {
    /// Create an empty registry. No pool exists until first use.
    pub fn new() -> Self {
        Self {
            pools: RefCell::new(IndexMap::new()),
        }
    }

    /// The calling thread's default registry.
    pub fn current() -> Rc<Self> {
        CURRENT.with(Rc::clone)
    }

    /// Run `f` against the pool for `config`, creating the pool if needed.
    ///
    /// # Errors
    ///
    /// Returns the `PoolError` from [`Pool::new`] if the pool did not exist
    /// and could not be built. A failed build leaves the registry unchanged,
    /// so a later call retries construction.
    ///
    /// # Panics
    ///
    /// Panics if `f` touches this registry again: a nested registry call, or
    /// dropping a pool-backed container or handle allocation that returns
    /// storage to this registry.
    pub fn with_pool<R>(
        &self,
        config: PoolConfig,
        f: impl FnOnce(&mut Pool) -> R,
    ) -> Result<R, PoolError> {
        let mut pools = self.pools.borrow_mut();
        let pool = match pools.entry(config) {
            indexmap::map::Entry::Occupied(entry) => entry.into_mut(),
            indexmap::map::Entry::Vacant(entry) => entry.insert(Pool::new(config)?),
        };
        Ok(f(pool))
    }

    /// Allocate `bytes` bytes from the pool for `config`.
    ///
    /// The outer `Result` is the fatal tier (pool construction); the inner
    /// `Option` is the soft tier (no contiguous run).
    pub fn allocate(
        &self,
        config: PoolConfig,
        bytes: usize,
    ) -> Result<Option<NonNull<u8>>, PoolError> {
        self.with_pool(config, |pool| pool.allocate(bytes))
    }

    /// Return an allocation to the pool for `config`.
    ///
    /// # Safety
    ///
    /// `ptr` and `bytes` must satisfy the contract of [`Pool::deallocate`]
    /// for the pool this registry holds for `config`.
    pub unsafe fn deallocate(&self, config: PoolConfig, ptr: NonNull<u8>, bytes: usize) {
        let mut pools = self.pools.borrow_mut();
        match pools.get_mut(&config) {
            // SAFETY: forwarded caller contract.
            Some(pool) => unsafe { pool.deallocate(ptr, bytes) },
            None => debug_assert!(false, "deallocate on a config with no pool"),
        }
    }

    /// Whether a pool for `config` has been created.
    pub fn is_active(&self, config: &PoolConfig) -> bool {
        self.pools.borrow().contains_key(config)
    }

    /// Number of pools created so far.
    pub fn pool_count(&self) -> usize {
        self.pools.borrow().len()
    }

    /// Occupancy of the pool for `config`, without creating it.
    pub fn pool_stats(&self, config: &PoolConfig) -> Option<PoolStats> {
        self.pools.borrow().get(config).map(Pool::stats)
    }

    /// Occupancy of every pool, in creation order.
    pub fn stats(&self) -> Vec<(PoolConfig, PoolStats)> {
        self.pools
            .borrow()
            .iter()
            .map(|(config, pool)| (*config, pool.stats()))
            .collect()
    }
}

impl Default for PoolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PoolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolRegistry")
            .field("pools", &self.pool_count())
            .finish()
    }
}

impl Drop for PoolRegistry {
    fn drop(&mut self) {
        let pools = self.pools.get_mut();
        if !pools.is_empty() {
            tracing::debug!(pools = pools.len(), "releasing pool registry");
        }
    }
}
