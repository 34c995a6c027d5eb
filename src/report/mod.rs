//! Reporting utilities: trajectory recording and formatted terminal output.

pub mod format;
pub mod trajectory;

pub use format::*;
pub use trajectory::*;
