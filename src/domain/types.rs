//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory while a fit runs
//! - printed as terminal tables
//! - exported to CSV/JSON

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::fit::AdaptiveFitConfig;
use crate::math::DEFAULT_NNLS_MAX_ITER;
use crate::models::DiracMixture;

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Number of synthetic audiences (signal rows).
    pub rows: usize,
    /// Seed for both the synthetic problem and the sampler.
    pub seed: u64,

    /// Locations of the mixture that generates the target.
    pub truth_locations: Vec<Vec<f64>>,
    /// Weights of the mixture that generates the target.
    pub truth_weights: Vec<f64>,

    pub new_centers_at_each_step: usize,
    pub new_centers_sigma: f64,
    pub max_steps: usize,
    pub solver_max_iter: usize,

    /// Record the trajectory every N steps (0 disables recording).
    pub trace_every: usize,
    pub export_trajectory: Option<PathBuf>,
    /// Print a JSON summary instead of the text report.
    pub json: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        let fit = AdaptiveFitConfig::default();
        Self {
            rows: 1000,
            seed: 42,
            truth_locations: vec![vec![1.5, 0.5], vec![0.5, 1.5], vec![0.8, 1.2]],
            truth_weights: vec![0.2, 0.3, 0.5],
            new_centers_at_each_step: fit.new_centers_at_each_step,
            new_centers_sigma: fit.new_centers_sigma,
            max_steps: fit.max_steps,
            solver_max_iter: DEFAULT_NNLS_MAX_ITER,
            trace_every: 0,
            export_trajectory: None,
            json: false,
        }
    }
}

impl RunConfig {
    /// Fitter options for this run.
    pub fn fit_config(&self) -> AdaptiveFitConfig {
        AdaptiveFitConfig {
            new_centers_at_each_step: self.new_centers_at_each_step,
            new_centers_sigma: self.new_centers_sigma,
            max_steps: self.max_steps,
            initial_locations: None,
            seed: self.seed,
            solver_max_iter: self.solver_max_iter,
        }
    }
}

/// One recorded point of the fit trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: usize,
    /// Locations surviving the prune.
    pub components: usize,
    pub weight_sum: f64,
    /// Euclidean distance between predicted and observed reach.
    pub residual_norm: f64,
}

/// Machine-readable outcome of a fit run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitSummary {
    pub rows: usize,
    pub dims: usize,
    pub steps: usize,
    pub seed: u64,
    /// Euclidean distance between fitted predictions and the target.
    pub distance: f64,
    pub weights: Vec<f64>,
    pub locations: Vec<Vec<f64>>,
    pub trajectory: Vec<StepRecord>,
}

impl FitSummary {
    pub fn new(
        config: &RunConfig,
        mixture: &DiracMixture,
        distance: f64,
        trajectory: Vec<StepRecord>,
    ) -> Self {
        Self {
            rows: config.rows,
            dims: mixture.dim(),
            steps: config.max_steps,
            seed: config.seed,
            distance,
            weights: mixture.weights().to_vec(),
            locations: mixture
                .locations()
                .row_iter()
                .map(|r| r.iter().copied().collect())
                .collect(),
            trajectory,
        }
    }
}
