//! Error types.
//!
//! - `MixtureError` is what the library (basis, solver, sampler, fitter, model)
//!   returns. Shape and configuration problems are caught eagerly at the API
//!   boundary; numerical imperfection never surfaces here.
//! - `AppError` is what the binary deals in: a message plus a process exit code.

use thiserror::Error;

/// Convenient `Result` alias for library-level operations.
pub type MixtureResult<T> = Result<T, MixtureError>;

/// Errors raised by the fitting library.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MixtureError {
    /// Two inputs disagree on a dimension (rows, columns or lengths).
    #[error("shape mismatch for {what}: expected {expected}, found {found}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// Weights are negative or non-finite.
    #[error("invalid weights: {0}")]
    InvalidWeights(String),

    /// A fit configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The signal has no rows or no columns.
    #[error("signal must have at least one row and one column")]
    EmptySignal,
}

impl MixtureError {
    pub(crate) fn shape(what: &'static str, expected: usize, found: usize) -> Self {
        Self::ShapeMismatch {
            what,
            expected,
            found,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<MixtureError> for AppError {
    fn from(err: MixtureError) -> Self {
        // Every library error is an input problem: numerical trouble is absorbed.
        Self::new(2, err.to_string())
    }
}
