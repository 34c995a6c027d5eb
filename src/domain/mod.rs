//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the run configuration derived from CLI flags (`RunConfig`)
//! - trajectory records and the run summary (`StepRecord`, `FitSummary`)

pub mod types;

pub use types::*;
