//! Adaptive Dirac Mixture fitting.
//!
//! Starting from a single all-ones location, each step:
//!
//! - samples new candidate locations around the current weighted ones
//! - refits the weights of *all* locations jointly (NNLS)
//! - drops every location whose weight came back zero
//!
//! The loop runs for exactly `max_steps` steps; there is no convergence exit.
//! Each step produces a fresh `DiracMixture` snapshot from the previous one plus
//! the new candidates, so nothing is mutated across step boundaries.

use nalgebra::{DMatrix, DVector};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::error::{MixtureError, MixtureResult};
use crate::fit::observer::IterationObserver;
use crate::fit::sampler::sample_candidates;
use crate::fit::weights::{solve_weights, validate_problem};
use crate::math::{DEFAULT_NNLS_MAX_ITER, LawsonHanson, NnlsSolver};
use crate::models::DiracMixture;

/// Options for `adaptive_fit`.
#[derive(Debug, Clone, PartialEq)]
pub struct AdaptiveFitConfig {
    /// Candidates proposed per step (before rejection).
    pub new_centers_at_each_step: usize,
    /// Standard deviation of the Gaussian jitter around existing locations.
    pub new_centers_sigma: f64,
    /// Number of steps to run.
    pub max_steps: usize,
    /// Starting locations (`k₀ × m`), each with weight `1/k₀`.
    ///
    /// `None` means a single all-ones location.
    pub initial_locations: Option<DMatrix<f64>>,
    /// Seed for the sampler's RNG (used by `adaptive_fit` only).
    pub seed: u64,
    /// Iteration cap handed to the default NNLS solver.
    pub solver_max_iter: usize,
}

impl Default for AdaptiveFitConfig {
    fn default() -> Self {
        Self {
            new_centers_at_each_step: 10,
            new_centers_sigma: 0.01,
            max_steps: 1000,
            initial_locations: None,
            seed: 0,
            solver_max_iter: DEFAULT_NNLS_MAX_ITER,
        }
    }
}

impl AdaptiveFitConfig {
    pub fn validate(&self) -> MixtureResult<()> {
        if self.new_centers_at_each_step == 0 {
            return Err(MixtureError::InvalidConfig(
                "new_centers_at_each_step must be > 0".to_string(),
            ));
        }
        if !(self.new_centers_sigma.is_finite() && self.new_centers_sigma > 0.0) {
            return Err(MixtureError::InvalidConfig(format!(
                "new_centers_sigma must be finite and > 0, got {}",
                self.new_centers_sigma
            )));
        }
        if self.max_steps == 0 {
            return Err(MixtureError::InvalidConfig("max_steps must be > 0".to_string()));
        }
        if self.solver_max_iter == 0 {
            return Err(MixtureError::InvalidConfig(
                "solver_max_iter must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Starting mixture for a signal with `dim` identifier types.
    pub fn initial_mixture(&self, dim: usize) -> MixtureResult<DiracMixture> {
        let locations = match &self.initial_locations {
            Some(l) => l.clone(),
            None => DMatrix::from_element(1, dim, 1.0),
        };
        if locations.ncols() != dim {
            return Err(MixtureError::shape(
                "initial location columns",
                dim,
                locations.ncols(),
            ));
        }
        if locations.nrows() == 0 {
            return Err(MixtureError::InvalidConfig(
                "initial_locations must have at least one row".to_string(),
            ));
        }
        if let Some(i) = locations
            .row_iter()
            .position(|row| row.iter().any(|v| !v.is_finite()) || row.sum() <= 0.0)
        {
            return Err(MixtureError::InvalidConfig(format!(
                "initial location {i} must be finite with a positive coordinate sum"
            )));
        }

        let k = locations.nrows();
        DiracMixture::new(vec![1.0 / k as f64; k], locations)
    }
}

/// Fit an adaptive Dirac mixture with the default solver and a seeded RNG.
pub fn adaptive_fit(
    signal: &DMatrix<f64>,
    target: &DVector<f64>,
    config: &AdaptiveFitConfig,
    observer: Option<&mut dyn IterationObserver>,
) -> MixtureResult<DiracMixture> {
    let solver = LawsonHanson::new(config.solver_max_iter);
    let mut rng = StdRng::seed_from_u64(config.seed);
    adaptive_fit_with(signal, target, config, &solver, &mut rng, observer)
}

/// Fit an adaptive Dirac mixture with a caller-supplied solver and RNG.
///
/// `config.seed` and `config.solver_max_iter` are ignored here.
pub fn adaptive_fit_with<S, R>(
    signal: &DMatrix<f64>,
    target: &DVector<f64>,
    config: &AdaptiveFitConfig,
    solver: &S,
    rng: &mut R,
    mut observer: Option<&mut dyn IterationObserver>,
) -> MixtureResult<DiracMixture>
where
    S: NnlsSolver + ?Sized,
    R: Rng + ?Sized,
{
    validate_problem(signal, target)?;
    config.validate()?;

    let mut mixture = config.initial_mixture(signal.ncols())?;
    let mut capped_steps = 0usize;

    for step in 0..config.max_steps {
        let candidates = sample_candidates(
            mixture.locations(),
            mixture.weights(),
            config.new_centers_at_each_step,
            config.new_centers_sigma,
            rng,
        )?;
        let pool = stack_rows(mixture.locations(), &candidates);

        let solution = solve_weights(solver, &pool, signal, target);
        if !solution.converged {
            capped_steps += 1;
        }
        mixture = prune(&pool, solution.x.as_slice())?;

        debug!(
            step,
            accepted = candidates.nrows(),
            components = mixture.len(),
            residual = solution.residual_norm,
            converged = solution.converged,
            "adaptive step"
        );

        if let Some(obs) = observer.as_deref_mut() {
            obs.on_step(step, mixture.weights(), mixture.locations());
        }
    }

    if capped_steps > 0 {
        warn!(
            capped_steps,
            max_steps = config.max_steps,
            "weight solve hit its iteration cap; weights are best effort"
        );
    }

    Ok(mixture)
}

/// `top` followed by `bottom`.
fn stack_rows(top: &DMatrix<f64>, bottom: &DMatrix<f64>) -> DMatrix<f64> {
    let (k, m) = top.shape();
    let mut out = DMatrix::zeros(k + bottom.nrows(), m);
    out.rows_mut(0, k).copy_from(top);
    out.rows_mut(k, bottom.nrows()).copy_from(bottom);
    out
}

/// Keep locations with strictly positive weight.
fn prune(pool: &DMatrix<f64>, weights: &[f64]) -> MixtureResult<DiracMixture> {
    if weights.len() != pool.nrows() {
        return Err(MixtureError::shape("solver output", pool.nrows(), weights.len()));
    }
    let keep: Vec<usize> = weights
        .iter()
        .enumerate()
        .filter(|(_, w)| w.is_finite() && **w > 0.0)
        .map(|(i, _)| i)
        .collect();

    let kept_weights = keep.iter().map(|&i| weights[i]).collect();
    let kept_locations = pool.select_rows(&keep);
    DiracMixture::new(kept_weights, kept_locations)
}
