//! The block pool: one aligned arena plus its occupancy ledger.
//!
//! A [`Pool`] hands out runs of contiguous blocks by first-fit search over
//! the ledger. It never grows, never falls back to another allocator, and
//! never compacts: a small long-lived allocation placed early can block a
//! later large request even when enough blocks are free in total.

use std::fmt;
use std::ptr::NonNull;

use crate::config::PoolConfig;
use crate::error::PoolError;
use crate::ledger::Ledger;
use crate::raw::Arena;

/// Point-in-time occupancy figures for one pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolStats {
    /// Block size in bytes.
    pub block_size: usize,
    /// Total number of blocks.
    pub block_count: usize,
    /// Blocks currently in use.
    pub used_blocks: usize,
    /// Blocks currently free.
    pub free_blocks: usize,
    /// Longest run of free blocks; the largest request that can succeed.
    pub largest_free_run: usize,
}

/// A fixed-capacity, bitmap-tracked block allocator.
///
/// Owns exactly one arena of `block_size × block_count` bytes aligned to
/// `alignment`, and one ledger bit per block. Both are acquired in
/// [`Pool::new`] and released together on drop.
pub struct Pool {
    config: PoolConfig,
    arena: Arena,
    ledger: Ledger,
}

impl Pool {
    /// Build a pool for `config`.
    ///
    /// # Errors
    ///
    /// - `PoolError::InvalidConfig` if `config` fails validation.
    /// - `PoolError::ArenaUnavailable` if the arena cannot be allocated.
    /// - `PoolError::LedgerUnavailable` if the ledger cannot be allocated;
    ///   the already-acquired arena is released first.
    pub fn new(config: PoolConfig) -> Result<Self, PoolError> {
        config.validate()?;
        let arena = Arena::new(config.arena_layout()?)?;
        // On failure `arena` is dropped here, returning its memory.
        let ledger = Ledger::new(config.block_count)?;
        tracing::debug!(
            block_size = config.block_size,
            block_count = config.block_count,
            alignment = config.alignment,
            arena_bytes = arena.len(),
            "created block pool"
        );
        Ok(Self {
            config,
            arena,
            ledger,
        })
    }

    /// The configuration this pool was built with.
    pub fn config(&self) -> PoolConfig {
        self.config
    }

    /// Allocate `ceil(bytes / block_size)` contiguous blocks.
    ///
    /// Returns the address of the first block of the first free run that is
    /// long enough, after marking the run in use. Returns `None` if no such
    /// run exists, or if `bytes` is zero (a zero-block request never
    /// matches). The returned pointer is aligned to `config().alignment`.
    pub fn allocate(&mut self, bytes: usize) -> Option<NonNull<u8>> {
        let blocks = self.config.blocks_for(bytes);
        let Some(index) = self.ledger.find_run(blocks) else {
            tracing::trace!(
                bytes,
                blocks,
                free_blocks = self.ledger.free_count(),
                "block pool has no contiguous run"
            );
            return None;
        };
        self.ledger.set_range(index, blocks);
        Some(self.arena.at(index * self.config.block_size))
    }

    /// Return the blocks of an allocation of `bytes` bytes starting at `ptr`.
    ///
    /// Clears exactly `ceil(bytes / block_size)` ledger bits starting at the
    /// block `ptr` points to. Foreign pointers and double frees are only
    /// caught by debug assertions.
    ///
    /// # Safety
    ///
    /// - `ptr` must have been returned by [`allocate`](Self::allocate) on
    ///   this pool and not yet deallocated.
    /// - `bytes` must equal the size passed to that `allocate` call (any
    ///   value rounding up to the same block count is equivalent).
    /// - No reference into the allocation may be used afterwards.
    pub unsafe fn deallocate(&mut self, ptr: NonNull<u8>, bytes: usize) {
        debug_assert!(self.arena.contains(ptr), "pointer not from this pool");
        let index = self.arena.offset_of(ptr) / self.config.block_size;
        let blocks = self.config.blocks_for(bytes);
        debug_assert!(
            self.ledger.all_set(index, blocks),
            "deallocating blocks that are not in use"
        );
        self.ledger.clear_range(index, blocks);
    }

    /// Index of the block `ptr` points into, if it lies inside the arena.
    pub fn block_index(&self, ptr: NonNull<u8>) -> Option<usize> {
        self.arena
            .contains(ptr)
            .then(|| self.arena.offset_of(ptr) / self.config.block_size)
    }

    /// Whether `ptr` lies inside this pool's arena.
    pub fn owns(&self, ptr: NonNull<u8>) -> bool {
        self.arena.contains(ptr)
    }

    /// Whether block `index` is currently in use.
    ///
    /// # Panics
    ///
    /// Panics if `index >= block_count`.
    pub fn is_block_in_use(&self, index: usize) -> bool {
        assert!(index < self.ledger.len(), "block {index} out of range");
        self.ledger.is_set(index)
    }

    /// Number of free blocks.
    pub fn free_blocks(&self) -> usize {
        self.ledger.free_count()
    }

    /// Number of blocks in use.
    pub fn used_blocks(&self) -> usize {
        self.ledger.used_count()
    }

    /// Raw ledger bytes (bit `i` of the pool is bit `i % 8` of byte `i / 8`).
    pub fn ledger(&self) -> &[u8] {
        self.ledger.as_bytes()
    }

    /// Base address of the arena.
    pub fn arena_base(&self) -> NonNull<u8> {
        self.arena.base()
    }

    /// Current occupancy figures.
    pub fn stats(&self) -> PoolStats {
        let used_blocks = self.ledger.used_count();
        PoolStats {
            block_size: self.config.block_size,
            block_count: self.config.block_count,
            used_blocks,
            free_blocks: self.config.block_count - used_blocks,
            largest_free_run: self.ledger.largest_free_run(),
        }
    }
}

impl fmt::Debug for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("config", &self.config)
            .field("arena_base", &self.arena.base())
            .field("used_blocks", &self.ledger.used_count())
            .finish()
    }
}

impl Drop for Pool {
    fn drop(&mut self) {
        tracing::debug!(
            block_size = self.config.block_size,
            block_count = self.config.block_count,
            alignment = self.config.alignment,
            leaked_blocks = self.ledger.used_count(),
            "destroying block pool"
        );
    }
}
