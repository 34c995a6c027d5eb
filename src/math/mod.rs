//! Numerical building blocks: the reach basis and (nonnegative) least squares.

pub mod basis;
pub mod nnls;
pub mod ols;

pub use basis::*;
pub use nnls::*;
pub use ols::*;
