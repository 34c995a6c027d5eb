//! Trajectory recording for adaptive fits.

use nalgebra::{DMatrix, DVector};
use tracing::{debug, info};

use crate::domain::StepRecord;
use crate::fit::IterationObserver;
use crate::models::evaluate;

/// Observer that samples the fit trajectory every `every` steps.
///
/// The final step of a run is only recorded if it falls on the sampling grid;
/// callers wanting the end state should evaluate the returned mixture.
#[derive(Debug)]
pub struct TrajectoryRecorder<'a> {
    signal: &'a DMatrix<f64>,
    target: &'a DVector<f64>,
    every: usize,
    records: Vec<StepRecord>,
}

impl<'a> TrajectoryRecorder<'a> {
    /// `every == 0` records nothing.
    pub fn new(signal: &'a DMatrix<f64>, target: &'a DVector<f64>, every: usize) -> Self {
        Self {
            signal,
            target,
            every,
            records: Vec::new(),
        }
    }

    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<StepRecord> {
        self.records
    }
}

impl IterationObserver for TrajectoryRecorder<'_> {
    fn on_step(&mut self, step: usize, weights: &[f64], locations: &DMatrix<f64>) {
        if self.every == 0 || (step + 1) % self.every != 0 {
            return;
        }

        let residual_norm = match evaluate(weights, locations, self.signal) {
            Ok(pred) => (pred - self.target).norm(),
            Err(e) => {
                debug!(step, error = %e, "skipping trajectory record");
                return;
            }
        };
        let record = StepRecord {
            step,
            components: weights.len(),
            weight_sum: weights.iter().sum(),
            residual_norm,
        };
        info!(
            step,
            components = record.components,
            residual = record.residual_norm,
            "fit progress"
        );
        self.records.push(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::{AdaptiveFitConfig, adaptive_fit};

    #[test]
    fn records_every_nth_step() {
        let signal = DMatrix::from_fn(40, 2, |i, j| ((i + 2 * j) % 7) as f64 / 7.0 + 0.05);
        let locations = DMatrix::from_row_slice(1, 2, &[1.2, 0.8]);
        let target = evaluate(&[0.6], &locations, &signal).unwrap();

        let mut recorder = TrajectoryRecorder::new(&signal, &target, 5);
        let config = AdaptiveFitConfig {
            max_steps: 20,
            ..AdaptiveFitConfig::default()
        };
        adaptive_fit(&signal, &target, &config, Some(&mut recorder)).unwrap();

        let steps: Vec<usize> = recorder.records().iter().map(|r| r.step).collect();
        assert_eq!(steps, vec![4, 9, 14, 19]);
        for r in recorder.records() {
            assert!(r.components > 0);
            assert!(r.residual_norm.is_finite());
        }
    }

    #[test]
    fn zero_interval_records_nothing() {
        let signal = DMatrix::from_element(3, 1, 0.5);
        let target = DVector::from_element(3, 0.2);
        let mut recorder = TrajectoryRecorder::new(&signal, &target, 0);
        recorder.on_step(0, &[1.0], &DMatrix::from_element(1, 1, 1.0));
        assert!(recorder.into_records().is_empty());
    }
}
