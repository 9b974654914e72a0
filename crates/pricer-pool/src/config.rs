//! Pool configuration parameters.

use std::alloc::Layout;

use crate::error::PoolError;

/// Size and alignment of one element type, as seen by a pool.
///
/// Used when a handle is retyped for a different element type: the new
/// handle's pool must satisfy the new type's alignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ElementLayout {
    size: usize,
    align: usize,
}

impl ElementLayout {
    /// The layout of `T`.
    pub const fn of<T>() -> Self {
        Self {
            size: std::mem::size_of::<T>(),
            align: std::mem::align_of::<T>(),
        }
    }

    /// An explicit size/alignment pair.
    ///
    /// Returns `Err(PoolError::InvalidConfig)` if `align` is not a power
    /// of two.
    pub fn new(size: usize, align: usize) -> Result<Self, PoolError> {
        if !align.is_power_of_two() {
            return Err(PoolError::InvalidConfig {
                reason: format!("element alignment {align} is not a power of two"),
            });
        }
        Ok(Self { size, align })
    }

    /// Element size in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Element alignment in bytes.
    pub fn align(&self) -> usize {
        self.align
    }
}

/// Configuration of one block pool.
///
/// The triple `(block_size, block_count, alignment)` is the pool identity:
/// within a [`PoolRegistry`](crate::PoolRegistry) every distinct config
/// resolves to exactly one [`Pool`](crate::Pool), and two handles with the
/// same config and registry may free each other's allocations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PoolConfig {
    /// Size of one block in bytes. The unit of allocation.
    ///
    /// Must be a non-zero multiple of `alignment`.
    pub block_size: usize,

    /// Number of blocks in the arena. Fixed for the pool's lifetime.
    pub block_count: usize,

    /// Alignment of the arena base in bytes. Must be a power of two.
    ///
    /// Because `block_size` is a multiple of it, every block start is
    /// aligned to this value too.
    pub alignment: usize,
}

impl PoolConfig {
    /// Create a config from its three parts. Call [`validate`](Self::validate)
    /// (or let [`Pool::new`](crate::Pool::new) do it) before use.
    pub const fn new(block_size: usize, block_count: usize, alignment: usize) -> Self {
        Self {
            block_size,
            block_count,
            alignment,
        }
    }

    /// Create a config whose alignment is the natural alignment of `T`.
    pub const fn for_type<T>(block_size: usize, block_count: usize) -> Self {
        Self::new(block_size, block_count, std::mem::align_of::<T>())
    }

    /// Check the config for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns `Err(PoolError::InvalidConfig)` if:
    /// - `block_size`, `block_count` or `alignment` is zero
    /// - `alignment` is not a power of two
    /// - `block_size` is not a multiple of `alignment`
    /// - the arena size overflows or exceeds `isize::MAX`
    pub fn validate(&self) -> Result<(), PoolError> {
        if self.block_size == 0 {
            return Err(invalid("block_size must be non-zero"));
        }
        if self.block_count == 0 {
            return Err(invalid("block_count must be non-zero"));
        }
        if !self.alignment.is_power_of_two() {
            return Err(PoolError::InvalidConfig {
                reason: format!("alignment {} is not a power of two", self.alignment),
            });
        }
        if self.block_size % self.alignment != 0 {
            return Err(PoolError::InvalidConfig {
                reason: format!(
                    "block_size {} is not a multiple of alignment {}",
                    self.block_size, self.alignment
                ),
            });
        }
        self.arena_layout().map(|_| ())
    }

    /// Layout of the arena: `block_size × block_count` bytes at `alignment`.
    pub fn arena_layout(&self) -> Result<Layout, PoolError> {
        let bytes = self
            .block_size
            .checked_mul(self.block_count)
            .ok_or_else(|| PoolError::InvalidConfig {
                reason: format!(
                    "arena size overflows: {} blocks of {} bytes",
                    self.block_count, self.block_size
                ),
            })?;
        Layout::from_size_align(bytes, self.alignment).map_err(|e| PoolError::InvalidConfig {
            reason: format!("arena layout of {bytes} bytes: {e}"),
        })
    }

    /// Arena size in bytes (saturating; validated configs never saturate).
    pub fn arena_bytes(&self) -> usize {
        self.block_size.saturating_mul(self.block_count)
    }

    /// Ledger size in bytes: one bit per block, rounded up.
    pub fn ledger_bytes(&self) -> usize {
        self.block_count.div_ceil(8)
    }

    /// Number of blocks needed to hold `bytes` bytes.
    pub fn blocks_for(&self, bytes: usize) -> usize {
        bytes.div_ceil(self.block_size)
    }

    /// The config a handle for a different element type resolves to.
    ///
    /// Block size and count are kept; alignment becomes
    /// `max(self.alignment, element.align())`. The result may fail
    /// [`validate`](Self::validate) if the new alignment no longer divides
    /// `block_size`.
    pub fn retyped(&self, element: ElementLayout) -> Self {
        Self {
            alignment: self.alignment.max(element.align()),
            ..*self
        }
    }
}

fn invalid(reason: &str) -> PoolError {
    PoolError::InvalidConfig {
        reason: reason.to_string(),
    }
}
