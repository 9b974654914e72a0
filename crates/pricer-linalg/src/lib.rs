//! Pool-backed dense vectors and tridiagonal solvers.
//!
//! [`DVec`] is the working vector type: `f64`s in a fixed per-thread pool,
//! aligned for the target's widest SIMD register. [`tridiagonal_solve`]
//! is its main consumer.
//!
//! ```
//! use pricer_linalg::{tridiagonal_solve, TridiagonalSystem};
//!
//! let system = TridiagonalSystem::new(
//!     &[0.0, -1.0, -1.0],
//!     &[2.0, 2.0, 2.0],
//!     &[-1.0, -1.0, 0.0],
//!     &[1.0, 0.0, 1.0],
//! )
//! .unwrap();
//! let x = tridiagonal_solve(&system).unwrap();
//! assert!(x.iter().all(|v| (v - 1.0).abs() < 1e-12));
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod dvec;
pub mod error;
pub mod simd;
pub mod tridiagonal;

pub use dvec::{
    current_dvec_allocator, dvec_allocator, DVec, DVecAllocator, DVEC_BLOCK_COUNT,
    DVEC_BLOCK_SIZE, DVEC_POOL,
};
pub use error::LinalgError;
pub use simd::{SIMD_ALIGNMENT, SIMD_LANES};
pub use tridiagonal::{tridiagonal_solve, tridiagonal_solve_in, TridiagonalSystem};
