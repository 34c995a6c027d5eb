//! Candidate location sampler.
//!
//! New candidates are drawn from a Gaussian mixture centred on the current
//! locations:
//!
//! 1. resample current locations with probability proportional to their weight
//! 2. add isotropic `N(0, σ²)` noise to every coordinate
//! 3. keep only candidates inside the valid region (`min > 0` and `sum > 0`)
//!
//! Exploration therefore concentrates around the components that already carry
//! weight. Fewer than `count` candidates (possibly none) may come back.

use nalgebra::{DMatrix, RowDVector};
use rand::Rng;
use rand::distributions::{Distribution, WeightedError, WeightedIndex};
use rand_distr::Normal;

use crate::error::{MixtureError, MixtureResult};

/// Whether a location can be read as an exposure-rate vector.
pub fn is_valid_location<'a>(coords: impl IntoIterator<Item = &'a f64>) -> bool {
    let mut min = f64::INFINITY;
    let mut sum = 0.0;
    let mut any = false;
    for &v in coords {
        min = min.min(v);
        sum += v;
        any = true;
    }
    any && min > 0.0 && sum > 0.0
}

/// Sample up to `count` jittered copies of `locations`, weighted by `weights`.
///
/// An empty mixture, or one whose weights are all zero, yields no candidates.
pub fn sample_candidates<R: Rng + ?Sized>(
    locations: &DMatrix<f64>,
    weights: &[f64],
    count: usize,
    sigma: f64,
    rng: &mut R,
) -> MixtureResult<DMatrix<f64>> {
    let dim = locations.ncols();
    if weights.len() != locations.nrows() {
        return Err(MixtureError::shape(
            "sampler weights",
            locations.nrows(),
            weights.len(),
        ));
    }
    if !(sigma.is_finite() && sigma > 0.0) {
        return Err(MixtureError::InvalidConfig(format!(
            "sampling sigma must be finite and > 0, got {sigma}"
        )));
    }

    let picker = match WeightedIndex::new(weights) {
        Ok(p) => p,
        Err(WeightedError::NoItem | WeightedError::AllWeightsZero) => {
            return Ok(DMatrix::zeros(0, dim));
        }
        Err(e) => return Err(MixtureError::InvalidWeights(e.to_string())),
    };
    let noise = Normal::new(0.0, sigma)
        .map_err(|e| MixtureError::InvalidConfig(format!("noise distribution: {e}")))?;

    let mut accepted: Vec<RowDVector<f64>> = Vec::with_capacity(count);
    for _ in 0..count {
        let source = picker.sample(rng);
        let mut candidate = locations.row(source).clone_owned();
        for v in candidate.iter_mut() {
            *v += noise.sample(rng);
        }
        if is_valid_location(candidate.iter()) {
            accepted.push(candidate);
        }
    }

    if accepted.is_empty() {
        return Ok(DMatrix::zeros(0, dim));
    }
    Ok(DMatrix::from_rows(&accepted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn samples_stay_in_valid_region() {
        let mut rng = StdRng::seed_from_u64(3);
        // Close to the boundary with large jitter, so plenty get rejected.
        let locations = DMatrix::from_row_slice(2, 3, &[0.05, 0.1, 0.2, 1.0, 0.02, 0.5]);
        let out = sample_candidates(&locations, &[0.5, 0.5], 500, 0.1, &mut rng).unwrap();

        assert!(out.nrows() < 500, "expected some rejections");
        assert_eq!(out.ncols(), 3);
        for row in out.row_iter() {
            assert!(row.iter().all(|&v| v > 0.0));
            assert!(row.sum() > 0.0);
        }
    }

    #[test]
    fn samples_follow_weights() {
        let mut rng = StdRng::seed_from_u64(5);
        let locations = DMatrix::from_row_slice(2, 1, &[1.0, 10.0]);
        let out = sample_candidates(&locations, &[0.0, 2.0], 100, 0.01, &mut rng).unwrap();

        assert_eq!(out.nrows(), 100);
        assert!(out.iter().all(|&v| (v - 10.0).abs() < 0.1));
    }

    #[test]
    fn empty_or_zero_weight_mixture_yields_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        let none = sample_candidates(&DMatrix::zeros(0, 2), &[], 10, 0.01, &mut rng).unwrap();
        assert_eq!(none.shape(), (0, 2));

        let locations = DMatrix::from_element(2, 2, 1.0);
        let zero = sample_candidates(&locations, &[0.0, 0.0], 10, 0.01, &mut rng).unwrap();
        assert_eq!(zero.shape(), (0, 2));
    }

    #[test]
    fn rejects_bad_sigma_and_weights() {
        let mut rng = StdRng::seed_from_u64(1);
        let locations = DMatrix::from_element(1, 2, 1.0);
        assert!(matches!(
            sample_candidates(&locations, &[1.0], 10, 0.0, &mut rng),
            Err(MixtureError::InvalidConfig(_))
        ));
        assert!(matches!(
            sample_candidates(&locations, &[-1.0], 10, 0.1, &mut rng),
            Err(MixtureError::InvalidWeights(_))
        ));
        assert!(matches!(
            sample_candidates(&locations, &[1.0, 1.0], 10, 0.1, &mut rng),
            Err(MixtureError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn same_seed_same_candidates() {
        let locations = DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 0.5, 1.5]);
        let a = sample_candidates(&locations, &[0.3, 0.7], 20, 0.05, &mut StdRng::seed_from_u64(9)).unwrap();
        let b = sample_candidates(&locations, &[0.3, 0.7], 20, 0.05, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn validity_check() {
        assert!(is_valid_location(&[0.1, 2.0]));
        assert!(!is_valid_location(&[0.0, 2.0]));
        assert!(!is_valid_location(&[-0.1, 2.0]));
        assert!(!is_valid_location(&[]));
    }
}
