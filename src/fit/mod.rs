//! Mixture fitting.
//!
//! Responsibilities:
//!
//! - fit nonnegative weights for fixed locations (`weights`)
//! - propose new candidate locations (`sampler`)
//! - run the adaptive sample / refit / prune loop (`adaptive`)

pub mod adaptive;
pub mod observer;
pub mod sampler;
pub mod weights;

pub use adaptive::*;
pub use observer::*;
pub use sampler::*;
pub use weights::*;
