//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - installs the tracing subscriber
//! - generates the synthetic problem and runs the fit
//! - prints reports
//! - writes optional exports

use clap::Parser;
use tracing_subscriber::filter::LevelFilter;

use crate::cli::{Command, FitArgs, ProblemArgs};
use crate::domain::{FitSummary, RunConfig};
use crate::error::AppError;

pub mod pipeline;

/// Environment variable consulted when `--log-level` is absent.
pub const LOG_ENV: &str = "ADM_LOG";

/// Entry point for the `adm` binary.
pub fn run() -> Result<(), AppError> {
    // A missing .env is the normal case.
    dotenvy::dotenv().ok();

    let cli = crate::cli::Cli::parse();
    init_logging(cli.log_level.as_deref());

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Weights(args) => handle_weights(args),
    }
}

fn init_logging(level: Option<&str>) {
    let level = level
        .map(str::to_string)
        .or_else(|| std::env::var(LOG_ENV).ok());
    let filter = level
        .as_deref()
        .and_then(|l| l.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::WARN);

    // Logs go to stderr so `--json` output stays machine-readable.
    tracing_subscriber::fmt()
        .with_max_level(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = run_config_from_fit_args(&args)?;
    let run = pipeline::run_fit(&config)?;

    if config.json {
        let summary = FitSummary::new(&config, &run.fitted, run.distance, run.trajectory.clone());
        println!("{}", crate::io::summary_json(&summary)?);
    } else {
        println!(
            "{}",
            crate::report::format_fit_summary(&config, &run.problem.truth, &run.fitted, run.distance)
        );
        let trajectory = crate::report::format_trajectory(&run.trajectory);
        if !trajectory.is_empty() {
            println!("{trajectory}");
        }
    }

    if let Some(path) = &config.export_trajectory {
        crate::io::write_trajectory_csv(path, &run.trajectory)?;
    }

    Ok(())
}

fn handle_weights(args: ProblemArgs) -> Result<(), AppError> {
    let config = run_config_from_problem_args(&args)?;
    let run = pipeline::run_weights(&config)?;

    println!(
        "{}",
        crate::report::format_weight_recovery(&run.problem.truth, &run.recovered, run.distance)
    );
    Ok(())
}

/// Map problem flags onto a `RunConfig`, filling in the default truth mixture.
pub fn run_config_from_problem_args(args: &ProblemArgs) -> Result<RunConfig, AppError> {
    let defaults = RunConfig::default();

    let (truth_locations, truth_weights) = if args.locations.is_empty() {
        let weights = if args.weights.is_empty() {
            defaults.truth_weights.clone()
        } else {
            args.weights.clone()
        };
        (defaults.truth_locations.clone(), weights)
    } else {
        let locations: Vec<Vec<f64>> = args.locations.iter().map(|l| l.0.clone()).collect();
        let weights = if args.weights.is_empty() {
            vec![1.0 / locations.len() as f64; locations.len()]
        } else {
            args.weights.clone()
        };
        (locations, weights)
    };

    if truth_weights.len() != truth_locations.len() {
        return Err(AppError::new(
            2,
            format!(
                "Got {} weights for {} locations.",
                truth_weights.len(),
                truth_locations.len()
            ),
        ));
    }

    Ok(RunConfig {
        rows: args.rows,
        seed: args.seed,
        truth_locations,
        truth_weights,
        solver_max_iter: args.solver_max_iter,
        ..defaults
    })
}

/// Map `adm fit` flags onto a `RunConfig`.
pub fn run_config_from_fit_args(args: &FitArgs) -> Result<RunConfig, AppError> {
    let base = run_config_from_problem_args(&args.problem)?;
    Ok(RunConfig {
        new_centers_at_each_step: args.new_centers,
        new_centers_sigma: args.sigma,
        max_steps: args.max_steps,
        trace_every: args.trace_every,
        export_trajectory: args.export_trajectory.clone(),
        json: args.json,
        ..base
    })
}
