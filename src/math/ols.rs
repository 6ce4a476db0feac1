//! Linear least squares.
//!
//! The Guinier fit and the starting point of the Porod fit are both small,
//! tall linear problems:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! Implementation choices:
//! - We solve through SVD rather than the normal equations so that nearly
//!   collinear columns (e.g. `q²` and `1` over a narrow Guinier window) do not
//!   lose half the available precision.
//! - Nalgebra's `QR::solve` is intended for square systems and will panic for
//!   non-square matrices, so SVD is also the simplest robust option.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Singular values are compared against `eps * max(shape) * σ_max`, the same
    // cut-off LAPACK's gelsd uses by default; retry looser if that fails.
    let sigma_max = svd.singular_values.max();
    let base = f64::EPSILON * x.nrows().max(x.ncols()) as f64 * sigma_max;
    for &scale in &[1.0, 1e2, 1e4] {
        if let Ok(beta) = svd.solve(y, base * scale) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Fit `y ≈ Σ_j β_j · columns[j]` given the design columns.
///
/// Returns `None` for empty/mismatched input or a singular system.
pub fn fit_columns(columns: &[Vec<f64>], y: &[f64]) -> Option<Vec<f64>> {
    let n = y.len();
    if n == 0 || columns.is_empty() || columns.iter().any(|c| c.len() != n) {
        return None;
    }
    let x = DMatrix::from_fn(n, columns.len(), |i, j| columns[j][i]);
    let rhs = DVector::from_column_slice(y);
    solve_least_squares(&x, &rhs).map(|beta| beta.iter().copied().collect())
}
