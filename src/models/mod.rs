//! Reach model implementations.
//!
//! The mixture is an immutable snapshot: the fitter builds its weights and
//! locations, then hands them over for evaluation.

pub mod mixture;

pub use mixture::*;
