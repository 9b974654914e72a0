//! Test fixtures shared by the pricer crates.
//!
//! Provides [`OwnedSystem`], a tridiagonal system that owns its bands, and
//! builders for systems with known or well-conditioned solutions. Shared by
//! integration tests and benchmarks.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{assert_close, diagonally_dominant, poisson, with_known_solution, OwnedSystem};
