//! Output helpers.
//!
//! - trajectory CSV export and JSON summaries (`export`)

pub mod export;

pub use export::*;
