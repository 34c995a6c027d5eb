//! Mixture weights for a fixed set of locations.

use nalgebra::{DMatrix, DVector};

use crate::error::{MixtureError, MixtureResult};
use crate::math::{LawsonHanson, NnlsSolution, NnlsSolver, reach_basis};

/// Fit nonnegative weights for `locations` using the default NNLS solver.
///
/// Hitting the solver's iteration cap is not an error: the best weights found
/// so far are returned.
pub fn fit_weights(
    locations: &DMatrix<f64>,
    signal: &DMatrix<f64>,
    target: &DVector<f64>,
) -> MixtureResult<Vec<f64>> {
    fit_weights_with(&LawsonHanson::default(), locations, signal, target)
}

/// Fit nonnegative weights for `locations` with a caller-chosen solver.
pub fn fit_weights_with<S: NnlsSolver + ?Sized>(
    solver: &S,
    locations: &DMatrix<f64>,
    signal: &DMatrix<f64>,
    target: &DVector<f64>,
) -> MixtureResult<Vec<f64>> {
    validate_problem(signal, target)?;
    if locations.ncols() != signal.ncols() {
        return Err(MixtureError::shape(
            "location columns",
            signal.ncols(),
            locations.ncols(),
        ));
    }
    Ok(solve_weights(solver, locations, signal, target).x.iter().copied().collect())
}

/// Shape checks shared by every fitting entry point.
pub(crate) fn validate_problem(signal: &DMatrix<f64>, target: &DVector<f64>) -> MixtureResult<()> {
    if signal.nrows() == 0 || signal.ncols() == 0 {
        return Err(MixtureError::EmptySignal);
    }
    if target.len() != signal.nrows() {
        return Err(MixtureError::shape("target length", signal.nrows(), target.len()));
    }
    Ok(())
}

/// Unchecked solve; callers have already validated shapes.
pub(crate) fn solve_weights<S: NnlsSolver + ?Sized>(
    solver: &S,
    locations: &DMatrix<f64>,
    signal: &DMatrix<f64>,
    target: &DVector<f64>,
) -> NnlsSolution {
    // NNLS wants one column per location: transpose the k × n basis.
    let design = reach_basis(signal, locations).transpose();
    solver.solve(&design, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::uniform_signal;
    use crate::models::evaluate;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn fit_weights_recovers_known_mixture() {
        let mut rng = StdRng::seed_from_u64(7);
        let signal = uniform_signal(1000, 2, &mut rng);
        let locations = DMatrix::from_row_slice(2, 2, &[1.5, 0.5, 0.5, 1.5]);
        let truth = [0.2, 0.8];
        let target = evaluate(&truth, &locations, &signal).unwrap();

        let fitted = fit_weights(&locations, &signal, &target).unwrap();
        assert_eq!(fitted.len(), 2);
        assert_abs_diff_eq!(fitted[0], 0.2, epsilon = 0.01);
        assert_abs_diff_eq!(fitted[1], 0.8, epsilon = 0.01);
    }

    #[test]
    fn fit_weights_rejects_misaligned_target() {
        let signal = DMatrix::from_element(5, 2, 0.5);
        let target = DVector::from_element(4, 0.1);
        let locations = DMatrix::from_element(1, 2, 1.0);
        let err = fit_weights(&locations, &signal, &target).unwrap_err();
        assert!(matches!(
            err,
            MixtureError::ShapeMismatch { expected: 5, found: 4, .. }
        ));
    }

    #[test]
    fn fit_weights_rejects_empty_signal() {
        let signal = DMatrix::<f64>::zeros(0, 2);
        let target = DVector::<f64>::zeros(0);
        let locations = DMatrix::from_element(1, 2, 1.0);
        assert_eq!(
            fit_weights(&locations, &signal, &target).unwrap_err(),
            MixtureError::EmptySignal
        );
    }

    #[test]
    fn capped_solver_still_returns_nonnegative_weights() {
        let mut rng = StdRng::seed_from_u64(11);
        let signal = uniform_signal(200, 2, &mut rng);
        let locations = DMatrix::from_row_slice(3, 2, &[1.5, 0.5, 0.5, 1.5, 0.8, 1.2]);
        let target = evaluate(&[0.2, 0.3, 0.5], &locations, &signal).unwrap();

        let fitted = fit_weights_with(&LawsonHanson::new(1), &locations, &signal, &target).unwrap();
        assert_eq!(fitted.len(), 3);
        assert!(fitted.iter().all(|&w| w >= 0.0));
    }
}
