//! Read-only progress hook for the adaptive fitter.

use nalgebra::DMatrix;

/// Receives the mixture state after each adaptive step.
///
/// Observers only see shared references, so they cannot influence the fit.
/// There is no way to request an early stop.
pub trait IterationObserver {
    fn on_step(&mut self, step: usize, weights: &[f64], locations: &DMatrix<f64>);
}

impl<F> IterationObserver for F
where
    F: FnMut(usize, &[f64], &DMatrix<f64>),
{
    fn on_step(&mut self, step: usize, weights: &[f64], locations: &DMatrix<f64>) {
        self(step, weights, locations)
    }
}
