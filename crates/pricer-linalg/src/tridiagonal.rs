//! Direct solution of tridiagonal systems (Thomas algorithm).
//!
//! Row `i` of the system reads
//! `lower[i]·x[i-1] + diag[i]·x[i] + upper[i]·x[i+1] = rhs[i]`;
//! `lower[0]` and `upper[n-1]` are ignored.
//!
//! The solver performs no pivoting. A zero pivot is not reported: it shows
//! up as `inf` or `NaN` in the solution, and diagonally dominant systems
//! never produce one.

use pricer_pool::{ElementAllocator, PoolVec};

use crate::dvec::{current_dvec_allocator, DVec};
use crate::error::LinalgError;

/// Borrowed view of a tridiagonal system and its right-hand side.
#[derive(Clone, Copy, Debug)]
pub struct TridiagonalSystem<'a> {
    lower: &'a [f64],
    diag: &'a [f64],
    upper: &'a [f64],
    rhs: &'a [f64],
}

impl<'a> TridiagonalSystem<'a> {
    /// Build a view, checking every input has the diagonal's length.
    ///
    /// # Errors
    ///
    /// `LinalgError::EmptySystem` if `diag` is empty, and
    /// `LinalgError::LengthMismatch` naming the first input whose length
    /// differs from `diag.len()`.
    pub fn new(
        lower: &'a [f64],
        diag: &'a [f64],
        upper: &'a [f64],
        rhs: &'a [f64],
    ) -> Result<Self, LinalgError> {
        let n = diag.len();
        if n == 0 {
            return Err(LinalgError::EmptySystem);
        }
        for (input, band) in [("lower", lower), ("upper", upper), ("rhs", rhs)] {
            if band.len() != n {
                return Err(LinalgError::LengthMismatch {
                    input,
                    expected: n,
                    actual: band.len(),
                });
            }
        }
        Ok(Self {
            lower,
            diag,
            upper,
            rhs,
        })
    }

    /// Number of unknowns (always at least one).
    pub fn dimension(&self) -> usize {
        self.diag.len()
    }

    /// Sub-diagonal; element 0 is ignored.
    pub fn lower(&self) -> &'a [f64] {
        self.lower
    }

    /// Main diagonal.
    pub fn diag(&self) -> &'a [f64] {
        self.diag
    }

    /// Super-diagonal; the last element is ignored.
    pub fn upper(&self) -> &'a [f64] {
        self.upper
    }

    /// Right-hand side.
    pub fn rhs(&self) -> &'a [f64] {
        self.rhs
    }

    /// Row `i` of the matrix applied to `x`.
    fn row_dot(&self, i: usize, x: &[f64]) -> f64 {
        let mut acc = self.diag[i] * x[i];
        if i > 0 {
            acc += self.lower[i] * x[i - 1];
        }
        if i + 1 < x.len() {
            acc += self.upper[i] * x[i + 1];
        }
        acc
    }

    /// The matrix applied to `x`, allocated from `alloc`.
    pub fn apply_in<A>(&self, x: &[f64], alloc: A) -> Result<PoolVec<f64, A>, LinalgError>
    where
        A: ElementAllocator<Value = f64>,
    {
        self.check_unknowns(x)?;
        let mut out = PoolVec::with_capacity_in(x.len(), alloc)?;
        for i in 0..x.len() {
            out.try_push(self.row_dot(i, x))?;
        }
        Ok(out)
    }

    /// Largest absolute row residual `|(A·x)[i] − rhs[i]|`.
    ///
    /// `NaN` anywhere makes the result `NaN`.
    pub fn max_residual(&self, x: &[f64]) -> Result<f64, LinalgError> {
        self.check_unknowns(x)?;
        Ok((0..x.len())
            .map(|i| (self.row_dot(i, x) - self.rhs[i]).abs())
            .fold(0.0, |worst, r| {
                if r > worst || r.is_nan() {
                    r
                } else {
                    worst
                }
            }))
    }

    fn check_unknowns(&self, x: &[f64]) -> Result<(), LinalgError> {
        if x.len() != self.dimension() {
            return Err(LinalgError::LengthMismatch {
                input: "x",
                expected: self.dimension(),
                actual: x.len(),
            });
        }
        Ok(())
    }
}

/// Solve `system`, drawing working and result storage from `alloc`.
///
/// Uses one working vector besides the result; both have the system's
/// dimension.
///
/// # Errors
///
/// `LinalgError::Allocation` if `alloc` cannot supply the storage.
pub fn tridiagonal_solve_in<A>(
    system: &TridiagonalSystem<'_>,
    alloc: A,
) -> Result<PoolVec<f64, A>, LinalgError>
where
    A: ElementAllocator<Value = f64>,
{
    let n = system.dimension();
    let (lower, diag, upper, rhs) = (system.lower, system.diag, system.upper, system.rhs);
    tracing::trace!(n, "tridiagonal solve");

    let mut modified_upper = PoolVec::from_elem_in(0.0, n, alloc.clone())?;
    // Holds the modified right-hand side, then the solution in place.
    let mut x = PoolVec::from_elem_in(0.0, n, alloc)?;

    // Forward elimination.
    modified_upper[0] = upper[0] / diag[0];
    x[0] = rhs[0] / diag[0];
    for i in 1..n {
        let pivot = diag[i] - lower[i] * modified_upper[i - 1];
        modified_upper[i] = upper[i] / pivot;
        x[i] = (rhs[i] - lower[i] * x[i - 1]) / pivot;
    }

    // Back substitution.
    for i in (0..n - 1).rev() {
        let next = x[i + 1];
        x[i] -= modified_upper[i] * next;
    }
    Ok(x)
}

/// Solve `system` into a [`DVec`] on the calling thread's default registry.
pub fn tridiagonal_solve(system: &TridiagonalSystem<'_>) -> Result<DVec, LinalgError> {
    let alloc = current_dvec_allocator().map_err(pricer_pool::AllocError::from)?;
    tridiagonal_solve_in(system, alloc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricer_pool::{AllocError, HeapAllocator, PoolAllocator, PoolConfig, PoolRegistry};
    use std::rc::Rc;

    const EPS: f64 = 1e-12;

    #[test]
    fn solves_the_three_point_laplacian() {
        let lower = [0.0, -1.0, -1.0];
        let diag = [2.0, 2.0, 2.0];
        let upper = [-1.0, -1.0, 0.0];
        let rhs = [1.0, 0.0, 1.0];
        let system = TridiagonalSystem::new(&lower, &diag, &upper, &rhs).unwrap();

        let x = tridiagonal_solve(&system).unwrap();
        assert_eq!(x.len(), 3);
        for xi in x.iter() {
            assert!((xi - 1.0).abs() < EPS, "got {xi}");
        }
    }

    #[test]
    fn single_unknown_is_a_division() {
        let system = TridiagonalSystem::new(&[7.0], &[4.0], &[9.0], &[3.0]).unwrap();
        let x = tridiagonal_solve(&system).unwrap();
        assert_eq!(x, [0.75]);
    }

    #[test]
    fn ignored_band_ends_do_not_matter() {
        let diag = [2.0, 2.0, 2.0];
        let rhs = [1.0, 0.0, 1.0];
        let a = TridiagonalSystem::new(&[0.0, -1.0, -1.0], &diag, &[-1.0, -1.0, 0.0], &rhs)
            .unwrap();
        let b = TridiagonalSystem::new(&[99.0, -1.0, -1.0], &diag, &[-1.0, -1.0, -42.0], &rhs)
            .unwrap();
        assert_eq!(
            tridiagonal_solve(&a).unwrap(),
            tridiagonal_solve(&b).unwrap()
        );
    }

    #[test]
    fn zero_pivot_yields_non_finite_values() {
        let system =
            TridiagonalSystem::new(&[0.0, 1.0], &[1.0, 1.0], &[1.0, 0.0], &[1.0, 1.0]).unwrap();
        let x = tridiagonal_solve(&system).unwrap();
        assert!(x.iter().any(|v| !v.is_finite()));
    }

    #[test]
    fn zero_leading_diagonal_is_not_an_error() {
        let system = TridiagonalSystem::new(&[0.0], &[0.0], &[0.0], &[1.0]).unwrap();
        let x = tridiagonal_solve(&system).unwrap();
        assert!(x[0].is_infinite());
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let err = TridiagonalSystem::new(&[0.0, 1.0], &[1.0, 1.0], &[1.0], &[1.0, 1.0])
            .unwrap_err();
        assert_eq!(
            err,
            LinalgError::LengthMismatch {
                input: "upper",
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn empty_system_is_rejected() {
        let err = TridiagonalSystem::new(&[], &[], &[], &[]).unwrap_err();
        assert_eq!(err, LinalgError::EmptySystem);
    }

    #[test]
    fn solve_releases_its_working_storage() {
        let registry = Rc::new(PoolRegistry::new());
        let alloc = PoolAllocator::<f64>::new(registry, PoolConfig::new(64, 8, 16)).unwrap();
        let system = TridiagonalSystem::new(&[0.0; 8], &[2.0; 8], &[0.0; 8], &[4.0; 8]).unwrap();

        let x = tridiagonal_solve_in(&system, alloc.clone()).unwrap();
        assert_eq!(x, [2.0; 8]);
        // Only the result's single block is still live.
        assert_eq!(alloc.stats().unwrap().used_blocks, 1);
    }

    #[test]
    fn exhausted_pool_is_reported() {
        let registry = Rc::new(PoolRegistry::new());
        let alloc = PoolAllocator::<f64>::new(registry, PoolConfig::new(64, 1, 16)).unwrap();
        let system = TridiagonalSystem::new(&[0.0; 4], &[1.0; 4], &[0.0; 4], &[1.0; 4]).unwrap();

        let err = tridiagonal_solve_in(&system, alloc).unwrap_err();
        assert!(matches!(
            err,
            LinalgError::Allocation(AllocError::Exhausted { .. })
        ));
    }

    #[test]
    fn heap_backed_solve_matches_pool_backed() {
        let lower = [0.0, 1.0, -0.5, 0.25];
        let diag = [4.0, 5.0, 6.0, 7.0];
        let upper = [1.0, 0.5, -1.0, 0.0];
        let rhs = [1.0, 2.0, 3.0, 4.0];
        let system = TridiagonalSystem::new(&lower, &diag, &upper, &rhs).unwrap();

        let pooled = tridiagonal_solve(&system).unwrap();
        let heap = tridiagonal_solve_in(&system, HeapAllocator::<f64>::new()).unwrap();
        assert_eq!(pooled, heap);
        assert!(system.max_residual(&heap).unwrap() < EPS);
    }

    #[test]
    fn apply_inverts_solve() {
        let lower = [0.0, -1.0, -1.0];
        let diag = [2.0, 2.0, 2.0];
        let upper = [-1.0, -1.0, 0.0];
        let rhs = [1.0, 0.0, 1.0];
        let system = TridiagonalSystem::new(&lower, &diag, &upper, &rhs).unwrap();

        let ax = system.apply_in(&[1.0, 1.0, 1.0], HeapAllocator::<f64>::new()).unwrap();
        assert_eq!(ax, rhs);
    }

    #[test]
    fn residual_checks_the_unknown_count() {
        let system = TridiagonalSystem::new(&[0.0], &[1.0], &[0.0], &[1.0]).unwrap();
        assert!(matches!(
            system.max_residual(&[1.0, 2.0]),
            Err(LinalgError::LengthMismatch { input: "x", .. })
        ));
        assert!(system.max_residual(&[f64::NAN]).unwrap().is_nan());
    }
}
