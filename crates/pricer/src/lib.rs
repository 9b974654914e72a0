//! Pricer: pool-allocated numeric vectors and tridiagonal solvers.
//!
//! Bundles the block-pool allocator (`pricer-pool`) and the solvers that
//! run on pool-backed vectors (`pricer-linalg`) under one name. Pricing
//! code usually only needs the [`prelude`].
//!
//! # Quick start
//!
//! ```rust
//! use pricer::prelude::*;
//!
//! // Solve the 3-point Laplacian; the exact solution is all ones.
//! let system = TridiagonalSystem::new(
//!     &[0.0, -1.0, -1.0],
//!     &[2.0, 2.0, 2.0],
//!     &[-1.0, -1.0, 0.0],
//!     &[1.0, 0.0, 1.0],
//! )
//! .unwrap();
//! let x: DVec = tridiagonal_solve(&system).unwrap();
//! assert!(x.iter().all(|v| (v - 1.0).abs() < 1e-12));
//!
//! // Storage came from this thread's DVec pool.
//! let stats = x.allocator().stats().unwrap();
//! assert_eq!(stats.used_blocks, 1);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`pool`] | `pricer-pool` | Block pools, per-thread registry, allocator handles, `PoolVec` |
//! | [`linalg`] | `pricer-linalg` | `DVec`, SIMD alignment table, tridiagonal solver |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Block-pool allocation (`pricer-pool`).
///
/// Most users only need [`pool::PoolVec`] and [`pool::PoolAllocator`];
/// both are also in the [`prelude`].
pub use pricer_pool as pool;

/// Dense vectors and linear solvers (`pricer-linalg`).
///
/// [`linalg::DVec`] is the pool-backed working vector,
/// [`linalg::tridiagonal_solve`] its main consumer.
pub use pricer_linalg as linalg;

/// Common imports for typical pricer usage.
///
/// ```rust
/// use pricer::prelude::*;
/// ```
pub mod prelude {
    // Pool
    pub use pricer_pool::{
        ElementAllocator, HeapAllocator, PoolAllocator, PoolConfig, PoolRegistry, PoolStats,
        PoolVec,
    };

    // Linear algebra
    pub use pricer_linalg::{tridiagonal_solve, tridiagonal_solve_in, DVec, TridiagonalSystem};

    // Errors
    pub use pricer_linalg::LinalgError;
    pub use pricer_pool::{AllocError, PoolError};
}
