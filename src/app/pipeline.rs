//! Shared fit pipeline logic used by the CLI subcommands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! synthetic problem -> fit -> distance to target (-> trajectory)
//!
//! The CLI can then focus on presentation (text vs JSON, exports).

use tracing::info;

use crate::data::{SyntheticProblem, generate_problem};
use crate::domain::{RunConfig, StepRecord};
use crate::error::AppError;
use crate::fit::{IterationObserver, adaptive_fit, fit_weights_with};
use crate::math::LawsonHanson;
use crate::models::{DiracMixture, evaluate};
use crate::report::TrajectoryRecorder;

/// All computed outputs of a single `adm fit` run.
#[derive(Debug, Clone)]
pub struct FitRun {
    pub problem: SyntheticProblem,
    pub fitted: DiracMixture,
    /// Euclidean distance between fitted predictions and the target.
    pub distance: f64,
    pub trajectory: Vec<StepRecord>,
}

/// All computed outputs of a single `adm weights` run.
#[derive(Debug, Clone)]
pub struct WeightsRun {
    pub problem: SyntheticProblem,
    pub recovered: Vec<f64>,
    pub distance: f64,
}

/// Generate the synthetic problem and run the adaptive fit on it.
pub fn run_fit(config: &RunConfig) -> Result<FitRun, AppError> {
    let problem = generate_problem(config)?;
    let fit_config = config.fit_config();
    info!(
        rows = config.rows,
        dims = problem.truth.dim(),
        steps = fit_config.max_steps,
        seed = fit_config.seed,
        "starting adaptive fit"
    );

    let mut recorder = TrajectoryRecorder::new(&problem.signal, &problem.target, config.trace_every);
    let observer: Option<&mut dyn IterationObserver> = if config.trace_every > 0 {
        Some(&mut recorder)
    } else {
        None
    };
    let fitted = adaptive_fit(&problem.signal, &problem.target, &fit_config, observer)?;
    let trajectory = recorder.into_records();

    let distance = (fitted.evaluate(&problem.signal)? - &problem.target).norm();
    info!(components = fitted.len(), distance, "adaptive fit finished");

    Ok(FitRun {
        problem,
        fitted,
        distance,
        trajectory,
    })
}

/// Generate the synthetic problem and solve the weights of its true locations.
pub fn run_weights(config: &RunConfig) -> Result<WeightsRun, AppError> {
    let problem = generate_problem(config)?;
    let solver = LawsonHanson::new(config.solver_max_iter);

    let recovered = fit_weights_with(
        &solver,
        problem.truth.locations(),
        &problem.signal,
        &problem.target,
    )?;
    let prediction = evaluate(&recovered, problem.truth.locations(), &problem.signal)?;
    let distance = (prediction - &problem.target).norm();
    info!(components = recovered.len(), distance, "fixed-location weights solved");

    Ok(WeightsRun {
        problem,
        recovered,
        distance,
    })
}
