//! Fixed-capacity, block-granular pool allocation for numeric sequences.
//!
//! Provides a bitmap-tracked block pool with SIMD-friendly alignment,
//! a per-thread registry that owns one pool per configuration, and an
//! element-typed allocator handle that generic containers route through.
//! Arena acquisition lives in `raw.rs` and element storage management in
//! `vec.rs`; elsewhere `unsafe` only marks deallocation entry points whose
//! preconditions the caller upholds.
//!
//! # Architecture
//!
//! ```text
//! PoolRegistry (one per thread, Rc-shared, !Send)
//! └── IndexMap<PoolConfig, Pool> (created lazily on first allocation)
//!     └── Pool
//!         ├── Arena  (block_size × block_count bytes, aligned)
//!         └── Ledger (one bit per block, 0 = free, 1 = in use)
//!
//! PoolAllocator<T> (handle) ──routes──▶ PoolRegistry ──▶ Pool
//! PoolVec<T, A: ElementAllocator> ──allocates through──▶ A
//! ```
//!
//! # Failure tiers
//!
//! - **Fatal:** a pool cannot acquire its arena or ledger
//!   ([`PoolError`]). Only happens the first time a configuration is used.
//! - **Soft:** no contiguous run of free blocks is large enough.
//!   [`Pool::allocate`] returns `None`; handles and containers surface it
//!   as [`AllocError::Exhausted`].
//! - **Unchecked:** deallocating a foreign pointer, a wrong element count,
//!   or the same pointer twice. These are `unsafe` preconditions.
//!
//! # Thread partitioning
//!
//! Registries, handles and [`PoolVec`] are `!Send` and `!Sync`. Each thread
//! allocates from its own pools, so no locking is needed and a pointer
//! can never be freed on a thread other than the one that allocated it.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod config;
pub mod error;
pub mod handle;
pub mod heap;
mod ledger;
pub mod pool;
mod raw;
pub mod registry;
pub mod traits;
pub mod vec;

// Public re-exports for the primary API surface.
pub use config::{ElementLayout, PoolConfig};
pub use error::{AllocError, PoolError};
pub use handle::PoolAllocator;
pub use heap::HeapAllocator;
pub use pool::{Pool, PoolStats};
pub use registry::PoolRegistry;
pub use traits::ElementAllocator;
pub use vec::PoolVec;
