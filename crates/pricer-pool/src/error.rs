//! Pool-specific error types.

use std::error::Error;
use std::fmt;

/// Fatal errors raised while building a pool.
///
/// These only occur the first time a configuration is used on a registry:
/// the config is rejected, or the system cannot supply the arena or the
/// ledger. Nothing is retried.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PoolError {
    /// The pool configuration is internally inconsistent.
    InvalidConfig {
        /// Human-readable description of the problem.
        reason: String,
    },
    /// The aligned arena could not be allocated.
    ArenaUnavailable {
        /// Arena size in bytes.
        bytes: usize,
        /// Requested arena alignment in bytes.
        alignment: usize,
    },
    /// The occupancy ledger could not be allocated.
    LedgerUnavailable {
        /// Ledger size in bytes.
        bytes: usize,
    },
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig { reason } => write!(f, "invalid pool config: {reason}"),
            Self::ArenaUnavailable { bytes, alignment } => {
                write!(
                    f,
                    "failed to allocate pool arena: {bytes} bytes aligned to {alignment}"
                )
            }
            Self::LedgerUnavailable { bytes } => {
                write!(f, "failed to allocate pool ledger: {bytes} bytes")
            }
        }
    }
}

impl Error for PoolError {}

/// Errors returned by element allocators and pool-backed containers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// No contiguous run of free blocks is long enough.
    ///
    /// This is the soft failure: the pool is healthy, just full or too
    /// fragmented. Freeing live allocations may make the request succeed.
    Exhausted {
        /// Blocks the request needed.
        requested_blocks: usize,
        /// Free blocks in the pool at the time of the request (not
        /// necessarily contiguous).
        free_blocks: usize,
    },
    /// `elements × element_size` does not fit in `usize`.
    CapacityOverflow {
        /// Number of elements requested.
        elements: usize,
        /// Size of one element in bytes.
        element_size: usize,
    },
    /// The general-purpose heap refused the request.
    OutOfMemory {
        /// Number of bytes requested.
        bytes: usize,
    },
    /// The pool backing this allocator could not be built.
    Pool(PoolError),
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted {
                requested_blocks,
                free_blocks,
            } => {
                write!(
                    f,
                    "pool exhausted: no run of {requested_blocks} contiguous blocks ({free_blocks} free)"
                )
            }
            Self::CapacityOverflow {
                elements,
                element_size,
            } => {
                write!(
                    f,
                    "capacity overflow: {elements} elements of {element_size} bytes"
                )
            }
            Self::OutOfMemory { bytes } => write!(f, "out of memory: requested {bytes} bytes"),
            Self::Pool(err) => write!(f, "pool unavailable: {err}"),
        }
    }
}

impl Error for AllocError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Pool(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PoolError> for AllocError {
    fn from(err: PoolError) -> Self {
        Self::Pool(err)
    }
}
