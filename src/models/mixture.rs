//! Dirac mixture reach model.
//!
//! A mixture is `k` nonnegative weights paired with `k` locations (rows of a
//! `k × m` matrix). Applied to a signal (`n × m`), it predicts
//!
//! - `reach_j = Σ_i weights_i · (1 - exp(-⟨locations_i, signal_j⟩))`
//!
//! The same evaluation serves two purposes: generating targets from a known
//! mixture and predicting with a fitted one.

use std::fmt;

use nalgebra::{DMatrix, DVector};

use crate::error::{MixtureError, MixtureResult};
use crate::math::reach_basis;

/// Weighted set of Dirac delta locations.
///
/// Invariant: `weights.len() == locations.nrows()` and every weight is finite
/// and nonnegative. `k == 0` is valid (an unfitted model).
#[derive(Debug, Clone, PartialEq)]
pub struct DiracMixture {
    weights: Vec<f64>,
    locations: DMatrix<f64>,
}

impl DiracMixture {
    pub fn new(weights: Vec<f64>, locations: DMatrix<f64>) -> MixtureResult<Self> {
        if weights.len() != locations.nrows() {
            return Err(MixtureError::shape(
                "mixture weights",
                locations.nrows(),
                weights.len(),
            ));
        }
        validate_weights(&weights)?;
        Ok(Self { weights, locations })
    }

    /// A mixture with no components over `dim` identifier types.
    pub fn empty(dim: usize) -> Self {
        Self {
            weights: Vec::new(),
            locations: DMatrix::zeros(0, dim),
        }
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn locations(&self) -> &DMatrix<f64> {
        &self.locations
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Number of identifier types each location spans.
    pub fn dim(&self) -> usize {
        self.locations.ncols()
    }

    /// Predicted reach for every row of `signal`.
    pub fn evaluate(&self, signal: &DMatrix<f64>) -> MixtureResult<DVector<f64>> {
        evaluate(&self.weights, &self.locations, signal)
    }

    pub fn into_parts(self) -> (Vec<f64>, DMatrix<f64>) {
        (self.weights, self.locations)
    }
}

impl fmt::Display for DiracMixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "<empty mixture>");
        }
        for (i, (w, row)) in self.weights.iter().zip(self.locations.row_iter()).enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            let coords: Vec<String> = row.iter().map(|v| format!("{v:.3}")).collect();
            write!(f, "{w:.3} * Delta([{}])", coords.join(", "))?;
        }
        Ok(())
    }
}

/// Predicted reach `weights · basis(signal, locations)`.
///
/// Fails with `ShapeMismatch` when the weights don't line up with the location
/// rows, or the locations and signal disagree on the number of identifier types.
pub fn evaluate(
    weights: &[f64],
    locations: &DMatrix<f64>,
    signal: &DMatrix<f64>,
) -> MixtureResult<DVector<f64>> {
    if weights.len() != locations.nrows() {
        return Err(MixtureError::shape(
            "mixture weights",
            locations.nrows(),
            weights.len(),
        ));
    }
    if locations.ncols() != signal.ncols() {
        return Err(MixtureError::shape(
            "location columns",
            signal.ncols(),
            locations.ncols(),
        ));
    }

    let basis = reach_basis(signal, locations);
    let w = DVector::from_column_slice(weights);
    Ok(basis.tr_mul(&w))
}

pub(crate) fn validate_weights(weights: &[f64]) -> MixtureResult<()> {
    if let Some((i, w)) = weights
        .iter()
        .enumerate()
        .find(|(_, w)| !w.is_finite() || **w < 0.0)
    {
        return Err(MixtureError::InvalidWeights(format!(
            "weight {i} is {w}; weights must be finite and nonnegative"
        )));
    }
    Ok(())
}
