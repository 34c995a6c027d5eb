//! Unconstrained least squares.
//!
//! The NNLS solver repeatedly solves small unconstrained problems restricted to
//! its passive set. Those go through the Gram matrix and Cholesky first; this
//! SVD route is the fallback for when candidate locations sit so close together
//! that the Gram matrix stops being numerically positive definite.
//!
//! (Nalgebra's `QR::solve` is intended for square systems and will panic for
//! non-square matrices, hence SVD for the tall case.)

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Nearly collinear basis columns are routine here (jittered copies of the
    // same location), so loosen the rank cutoff step by step.
    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn least_squares_handles_duplicated_column() {
        // Two identical columns: minimum-norm solution splits the coefficient.
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 1.0, 2.0, 2.0, 3.0, 3.0]);
        let y = DVector::from_row_slice(&[2.0, 4.0, 6.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        let fitted = &x * &beta;
        assert!((fitted - y).norm() < 1e-8);
    }
}
