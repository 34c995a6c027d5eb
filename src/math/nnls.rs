//! Nonnegative least squares.
//!
//! ```text
//! minimize ‖A x - b‖²  subject to  x ≥ 0
//! ```
//!
//! The default solver is the Lawson–Hanson active-set method. Columns move from
//! the active set (pinned at zero) into the passive set (free) one at a time,
//! picking the column with the largest positive gradient. Whenever the
//! unconstrained solve on the passive set goes non-positive, we step back to the
//! boundary and release the columns that hit zero.
//!
//! The passive-set solves go through the Gram matrix `AᵀA`, which is only
//! `k × k` (k = number of candidate locations, a few dozen at most), rather than
//! through `A` itself (`n × k`, n = number of audiences).

use std::cmp::Ordering;

use nalgebra::{DMatrix, DVector};
use tracing::debug;

use crate::math::solve_least_squares;

/// Default iteration cap (outer plus inner iterations).
pub const DEFAULT_NNLS_MAX_ITER: usize = 1000;

/// Result of an NNLS solve.
#[derive(Debug, Clone)]
pub struct NnlsSolution {
    /// Nonnegative coefficients, one per column of `A`.
    pub x: DVector<f64>,
    /// `‖A x - b‖`.
    pub residual_norm: f64,
    pub iterations: usize,
    /// `false` when the iteration cap stopped the solver early. `x` is still
    /// feasible, just not necessarily optimal.
    pub converged: bool,
}

/// A nonnegative least-squares capability.
///
/// The adaptive fitter only depends on this contract, so any conforming solver
/// can be substituted for the built-in one.
pub trait NnlsSolver {
    fn solve(&self, a: &DMatrix<f64>, b: &DVector<f64>) -> NnlsSolution;
}

/// Lawson–Hanson active-set NNLS.
#[derive(Debug, Clone, Copy)]
pub struct LawsonHanson {
    pub max_iter: usize,
}

impl Default for LawsonHanson {
    fn default() -> Self {
        Self {
            max_iter: DEFAULT_NNLS_MAX_ITER,
        }
    }
}

impl LawsonHanson {
    pub fn new(max_iter: usize) -> Self {
        Self { max_iter }
    }
}

impl NnlsSolver for LawsonHanson {
    fn solve(&self, a: &DMatrix<f64>, b: &DVector<f64>) -> NnlsSolution {
        let (n, k) = a.shape();
        let mut x = DVector::<f64>::zeros(k);

        if k == 0 {
            return NnlsSolution {
                x,
                residual_norm: b.norm(),
                iterations: 0,
                converged: true,
            };
        }

        let gram = a.tr_mul(a);
        let atb = a.tr_mul(b);

        // Gradient tolerance, scaled like LINPACK/SciPy.
        let col_norm1 = a
            .column_iter()
            .map(|c| c.iter().map(|v| v.abs()).sum::<f64>())
            .fold(0.0_f64, f64::max);
        let tol = 10.0 * f64::EPSILON * col_norm1 * n.max(k) as f64;

        let mut passive = vec![false; k];
        // Columns whose last admission produced a non-positive coefficient. They
        // are skipped until `x` changes, otherwise the solver cycles on them.
        let mut blocked = vec![false; k];
        let mut iterations = 0usize;
        let mut converged = false;

        'outer: loop {
            let w = &atb - &gram * &x;

            let entering = (0..k)
                .filter(|&j| !passive[j] && !blocked[j])
                .max_by(|&i, &j| w[i].partial_cmp(&w[j]).unwrap_or(Ordering::Equal))
                .filter(|&j| w[j] > tol);
            let Some(j) = entering else {
                converged = true;
                break;
            };

            if iterations >= self.max_iter {
                break;
            }
            iterations += 1;
            passive[j] = true;

            let mut first_solve = true;
            loop {
                let idx: Vec<usize> = (0..k).filter(|&i| passive[i]).collect();
                let Some(z) = solve_passive(a, b, &gram, &atb, &idx) else {
                    passive[j] = false;
                    break 'outer;
                };

                if z.iter().all(|&v| v > 0.0) {
                    for (pos, &i) in idx.iter().enumerate() {
                        x[i] = z[pos];
                    }
                    blocked.iter_mut().for_each(|bl| *bl = false);
                    break;
                }

                let j_pos = idx.iter().position(|&i| i == j);
                if first_solve && j_pos.is_some_and(|p| z[p] <= 0.0) {
                    // Admitting `j` did not help; x is unchanged.
                    passive[j] = false;
                    blocked[j] = true;
                    break;
                }
                first_solve = false;

                if iterations >= self.max_iter {
                    break 'outer;
                }
                iterations += 1;

                // Move from x towards z until the first passive coefficient hits zero.
                let mut alpha = f64::INFINITY;
                let mut blocking = idx[0];
                for (pos, &i) in idx.iter().enumerate() {
                    if z[pos] <= 0.0 {
                        let denom = x[i] - z[pos];
                        let ratio = if denom > 0.0 { x[i] / denom } else { 0.0 };
                        if ratio < alpha {
                            alpha = ratio;
                            blocking = i;
                        }
                    }
                }
                let alpha = alpha.clamp(0.0, 1.0);
                for (pos, &i) in idx.iter().enumerate() {
                    x[i] += alpha * (z[pos] - x[i]);
                }
                x[blocking] = 0.0;
                for &i in &idx {
                    if x[i] <= 0.0 {
                        x[i] = 0.0;
                        passive[i] = false;
                    }
                }
            }
        }

        if !converged {
            debug!(iterations, max_iter = self.max_iter, "nnls stopped at iteration cap");
        }

        let residual_norm = (a * &x - b).norm();
        NnlsSolution {
            x,
            residual_norm,
            iterations,
            converged,
        }
    }
}

/// Unconstrained least squares restricted to the columns in `idx`.
fn solve_passive(
    a: &DMatrix<f64>,
    b: &DVector<f64>,
    gram: &DMatrix<f64>,
    atb: &DVector<f64>,
    idx: &[usize],
) -> Option<DVector<f64>> {
    let g = gram.select_rows(idx).select_columns(idx);
    let c = atb.select_rows(idx);

    if let Some(chol) = g.cholesky() {
        let z = chol.solve(&c);
        if z.iter().all(|v| v.is_finite()) {
            return Some(z);
        }
    }

    let a_p = a.select_columns(idx);
    solve_least_squares(&a_p, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn recovers_interior_solution() {
        let a = DMatrix::from_row_slice(4, 2, &[1.0, 0.0, 0.0, 1.0, 1.0, 1.0, 2.0, 1.0]);
        let truth = DVector::from_row_slice(&[0.5, 2.0]);
        let b = &a * &truth;

        let sol = LawsonHanson::default().solve(&a, &b);
        assert!(sol.converged);
        assert_abs_diff_eq!(sol.x[0], 0.5, epsilon = 1e-10);
        assert_abs_diff_eq!(sol.x[1], 2.0, epsilon = 1e-10);
        assert!(sol.residual_norm < 1e-10);
    }

    #[test]
    fn clamps_negative_coefficient_to_zero() {
        // Unconstrained solution is [1, -1]; the constrained optimum drops column 1.
        let a = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
        let b = DVector::from_row_slice(&[1.0, -1.0, 0.0]);

        let sol = LawsonHanson::default().solve(&a, &b);
        assert!(sol.converged);
        assert!(sol.x.iter().all(|&v| v >= 0.0));
        assert_eq!(sol.x[1], 0.0);
        // With column 1 fixed at zero: minimize (x-1)² + x² -> x = 0.5.
        assert_abs_diff_eq!(sol.x[0], 0.5, epsilon = 1e-10);
    }

    #[test]
    fn non_positive_target_gives_zero_solution() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 0.5, 0.5, 1.0]);
        let b = DVector::from_row_slice(&[-1.0, -2.0]);

        let sol = LawsonHanson::default().solve(&a, &b);
        assert!(sol.converged);
        assert!(sol.x.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn empty_problem_is_trivially_converged() {
        let a = DMatrix::<f64>::zeros(3, 0);
        let b = DVector::from_row_slice(&[1.0, 2.0, 2.0]);

        let sol = LawsonHanson::default().solve(&a, &b);
        assert!(sol.converged);
        assert_eq!(sol.x.len(), 0);
        assert_abs_diff_eq!(sol.residual_norm, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn iteration_cap_returns_feasible_iterate() {
        let a = DMatrix::from_row_slice(4, 3, &[
            1.0, 0.2, 0.1, //
            0.3, 1.0, 0.4, //
            0.2, 0.1, 1.0, //
            1.0, 1.0, 1.0,
        ]);
        let b = DVector::from_row_slice(&[1.0, 2.0, 3.0, 4.0]);

        let sol = LawsonHanson::new(1).solve(&a, &b);
        assert!(!sol.converged);
        assert_eq!(sol.iterations, 1);
        assert!(sol.x.iter().all(|&v| v >= 0.0));
    }
}
