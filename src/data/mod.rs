//! Problem sources for the binary and the tests.

pub mod synthetic;

pub use synthetic::*;
