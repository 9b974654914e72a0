//! Reusable tridiagonal system fixtures.
//!
//! - [`poisson`]: the 1-D Laplacian `[-1, 2, -1]` whose solution is all ones.
//! - [`with_known_solution`]: any bands, right-hand side derived from `x`.
//! - [`diagonally_dominant`]: deterministic, strictly dominant bands.

use pricer_linalg::TridiagonalSystem;

/// A tridiagonal system that owns its bands.
#[derive(Clone, Debug, PartialEq)]
pub struct OwnedSystem {
    pub lower: Vec<f64>,
    pub diag: Vec<f64>,
    pub upper: Vec<f64>,
    pub rhs: Vec<f64>,
}

impl OwnedSystem {
    /// Borrow as a solver view.
    ///
    /// # Panics
    ///
    /// Panics if the bands are empty or of unequal length.
    pub fn view(&self) -> TridiagonalSystem<'_> {
        TridiagonalSystem::new(&self.lower, &self.diag, &self.upper, &self.rhs)
            .expect("fixture bands must be non-empty and equal length")
    }

    pub fn dimension(&self) -> usize {
        self.diag.len()
    }
}

/// `n × n` discrete Laplacian with right-hand side chosen so the solution
/// is all ones.
pub fn poisson(n: usize) -> OwnedSystem {
    let ones = vec![1.0; n];
    with_known_solution(vec![-1.0; n], vec![2.0; n], vec![-1.0; n], &ones)
}

/// A system with the given bands whose exact solution is `x`.
///
/// `lower[0]` and `upper[n-1]` are zeroed.
pub fn with_known_solution(
    mut lower: Vec<f64>,
    diag: Vec<f64>,
    mut upper: Vec<f64>,
    x: &[f64],
) -> OwnedSystem {
    let n = diag.len();
    assert!(
        lower.len() == n && upper.len() == n && x.len() == n,
        "bands and solution must share a length"
    );
    if n > 0 {
        lower[0] = 0.0;
        upper[n - 1] = 0.0;
    }
    let rhs = (0..n)
        .map(|i| {
            let mut acc = diag[i] * x[i];
            if i > 0 {
                acc += lower[i] * x[i - 1];
            }
            if i + 1 < n {
                acc += upper[i] * x[i + 1];
            }
            acc
        })
        .collect();
    OwnedSystem {
        lower,
        diag,
        upper,
        rhs,
    }
}

/// A strictly diagonally dominant system of dimension `n`.
///
/// Values are a deterministic function of `seed`, so repeated calls build
/// identical systems. The exact solution is `x[i] = 1 + i / n`.
pub fn diagonally_dominant(n: usize, seed: u64) -> OwnedSystem {
    let phase = seed as f64 * 0.618_033_988_749_895;
    let wave = |i: usize, k: f64| ((i as f64 + phase) * k).sin();

    let lower: Vec<f64> = (0..n).map(|i| wave(i, 1.3)).collect();
    let upper: Vec<f64> = (0..n).map(|i| wave(i, 0.7)).collect();
    let diag = (0..n)
        .map(|i| 2.5 + lower[i].abs() + upper[i].abs() + wave(i, 2.1).abs())
        .collect();
    let x: Vec<f64> = (0..n).map(|i| 1.0 + i as f64 / n as f64).collect();
    with_known_solution(lower, diag, upper, &x)
}

/// Assert `actual` and `expected` agree element-wise within `tol`.
#[track_caller]
pub fn assert_close(actual: &[f64], expected: &[f64], tol: f64) {
    assert_eq!(actual.len(), expected.len(), "length mismatch");
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!(
            (a - e).abs() <= tol,
            "element {i}: {a} differs from {e} by more than {tol}"
        );
    }
}
