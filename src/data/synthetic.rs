//! Seeded synthetic reach problems.
//!
//! Audiences get identifier counts drawn uniformly from `[0, 1)` per identifier
//! type; the target is the reach a known "truth" mixture predicts for them. The
//! CLI and the tests both use this to get a problem with a known answer.

use nalgebra::{DMatrix, DVector};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::domain::RunConfig;
use crate::error::AppError;
use crate::models::DiracMixture;

#[derive(Debug, Clone)]
pub struct SyntheticProblem {
    pub signal: DMatrix<f64>,
    pub target: DVector<f64>,
    pub truth: DiracMixture,
}

/// `rows × dims` signal with entries uniform in `[0, 1)`.
pub fn uniform_signal<R: Rng + ?Sized>(rows: usize, dims: usize, rng: &mut R) -> DMatrix<f64> {
    // Row-major draw order: audience i consumes draws i*dims..(i+1)*dims.
    let values: Vec<f64> = (0..rows * dims).map(|_| rng.gen_range(0.0..1.0)).collect();
    DMatrix::from_row_slice(rows, dims, &values)
}

/// Build the truth mixture from the run's locations/weights.
pub fn truth_mixture(config: &RunConfig) -> Result<DiracMixture, AppError> {
    let Some(first) = config.truth_locations.first() else {
        return Err(AppError::new(2, "At least one --location is required."));
    };
    let dims = first.len();
    if dims == 0 {
        return Err(AppError::new(2, "Locations must have at least one coordinate."));
    }
    if let Some(bad) = config.truth_locations.iter().find(|l| l.len() != dims) {
        return Err(AppError::new(
            2,
            format!(
                "All locations must have {dims} coordinates; got {}.",
                bad.len()
            ),
        ));
    }

    let flat: Vec<f64> = config.truth_locations.iter().flatten().copied().collect();
    let locations = DMatrix::from_row_slice(config.truth_locations.len(), dims, &flat);
    Ok(DiracMixture::new(config.truth_weights.clone(), locations)?)
}

/// Generate the signal and target for a run.
pub fn generate_problem(config: &RunConfig) -> Result<SyntheticProblem, AppError> {
    if config.rows == 0 {
        return Err(AppError::new(2, "Row count must be > 0."));
    }
    let truth = truth_mixture(config)?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let signal = uniform_signal(config.rows, truth.dim(), &mut rng);
    let target = truth.evaluate(&signal)?;

    Ok(SyntheticProblem {
        signal,
        target,
        truth,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_signal_is_in_unit_box() {
        let mut rng = StdRng::seed_from_u64(1);
        let s = uniform_signal(200, 3, &mut rng);
        assert_eq!(s.shape(), (200, 3));
        assert!(s.iter().all(|&v| (0.0..1.0).contains(&v)));
    }

    #[test]
    fn generate_problem_is_seeded() {
        let config = RunConfig::default();
        let a = generate_problem(&config).unwrap();
        let b = generate_problem(&config).unwrap();
        assert_eq!(a.signal, b.signal);
        assert_eq!(a.target, b.target);
        assert_eq!(a.target.len(), config.rows);
    }

    #[test]
    fn ragged_locations_are_rejected() {
        let config = RunConfig {
            truth_locations: vec![vec![1.0, 1.0], vec![1.0]],
            truth_weights: vec![0.5, 0.5],
            ..RunConfig::default()
        };
        let err = generate_problem(&config).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn weight_count_must_match_locations() {
        let config = RunConfig {
            truth_weights: vec![1.0],
            ..RunConfig::default()
        };
        let err = generate_problem(&config).unwrap_err();
        assert!(err.to_string().contains("shape mismatch"), "{err}");
    }
}
