//! `dirac-mixture` library crate.
//!
//! Fits a sparse, nonnegative mixture of Dirac deltas to an observed reach
//! curve (Adaptive Dirac Mixture). The binary (`adm`) is a thin wrapper around
//! this library so that:
//!
//! - core logic is testable without spawning processes
//! - the fitter can be embedded by callers that bring their own signal/target

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod report;

pub use error::{AppError, MixtureError, MixtureResult};
pub use fit::{AdaptiveFitConfig, IterationObserver, adaptive_fit, adaptive_fit_with, fit_weights};
pub use models::{DiracMixture, evaluate};
