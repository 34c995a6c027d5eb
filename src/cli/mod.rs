//! Command-line parsing for the adaptive Dirac mixture fitter.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the modeling/math code.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "adm", version, about = "Adaptive Dirac Mixture reach-curve fitter")]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error). Falls back to `ADM_LOG`, then `warn`.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit an adaptive Dirac mixture to a synthetic reach curve and report how close it gets.
    Fit(FitArgs),
    /// Solve only the nonnegative weights for the true locations of a synthetic reach curve.
    Weights(ProblemArgs),
}

/// A Dirac delta location given as comma-separated coordinates, e.g. `1.5,0.5`.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationArg(pub Vec<f64>);

impl FromStr for LocationArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let coords = s
            .split(',')
            .map(|part| {
                let part = part.trim();
                part.parse::<f64>()
                    .map_err(|_| format!("invalid coordinate '{part}' in location '{s}'"))
            })
            .collect::<Result<Vec<f64>, String>>()?;
        if coords.iter().any(|v| !v.is_finite()) {
            return Err(format!("location '{s}' has non-finite coordinates"));
        }
        Ok(Self(coords))
    }
}

/// Options describing the synthetic problem.
#[derive(Debug, Args, Clone)]
pub struct ProblemArgs {
    /// Number of synthetic audiences (signal rows).
    #[arg(short = 'n', long, default_value_t = 1000)]
    pub rows: usize,

    /// A location of the mixture generating the target (repeatable).
    ///
    /// Defaults to `1.5,0.5`, `0.5,1.5` and `0.8,1.2`.
    #[arg(long = "location", value_name = "X,Y,..")]
    pub locations: Vec<LocationArg>,

    /// Weights of the generating mixture, one per location (comma separated or repeated).
    ///
    /// Defaults to `0.2,0.3,0.5` for the default locations, uniform otherwise.
    #[arg(long = "weight", value_delimiter = ',')]
    pub weights: Vec<f64>,

    /// Random seed for the synthetic signal and the candidate sampler.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Iteration cap for the nonnegative least squares solver.
    #[arg(long, default_value_t = 1000)]
    pub solver_max_iter: usize,
}

/// Options for the adaptive fit.
#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    #[command(flatten)]
    pub problem: ProblemArgs,

    /// Candidate locations proposed per step.
    #[arg(long, default_value_t = 10)]
    pub new_centers: usize,

    /// Standard deviation of the jitter applied to resampled locations.
    #[arg(long, default_value_t = 0.01)]
    pub sigma: f64,

    /// Number of sample / refit / prune steps.
    #[arg(long, default_value_t = 1000)]
    pub max_steps: usize,

    /// Record the fit trajectory every N steps (0 disables).
    #[arg(long, default_value_t = 0)]
    pub trace_every: usize,

    /// Export the recorded trajectory to CSV.
    #[arg(long = "export-trajectory", value_name = "CSV")]
    pub export_trajectory: Option<PathBuf>,

    /// Print a JSON summary instead of the text report.
    #[arg(long)]
    pub json: bool,
}
