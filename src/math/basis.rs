//! Reach basis for Dirac delta locations.
//!
//! A location `d` (an exposure-rate vector over identifier types) reaches an
//! audience with identifier counts `s` with probability
//!
//! - `r(d, s) = 1 - exp(-⟨d, s⟩)`
//!
//! i.e. the coverage of a Poisson exposure process with rate `⟨d, s⟩`.
//!
//! Numerical notes:
//! - For small `⟨d, s⟩`, `1 - exp(-x)` suffers from catastrophic cancellation,
//!   so we evaluate `-expm1(-x)` instead.
//! - Negative dot products are not rejected here; they produce negative entries.
//!   The candidate sampler keeps locations inside the valid region upstream.

use nalgebra::DMatrix;
use rayon::prelude::*;

/// Partial reach of a single location on a single audience.
pub fn partial_reach(dot: f64) -> f64 {
    -(-dot).exp_m1()
}

/// Build the `k × n` basis matrix for `k` locations and `n` signal rows.
///
/// Entry `(i, j)` is the reach of location `i` on audience `j`. Shapes are not
/// validated here; callers check that both matrices share a column count.
pub fn reach_basis(signal: &DMatrix<f64>, locations: &DMatrix<f64>) -> DMatrix<f64> {
    let mut out = locations * signal.transpose();
    out.as_mut_slice()
        .par_iter_mut()
        .for_each(|v| *v = partial_reach(*v));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn basis_entries_match_closed_form() {
        let signal = DMatrix::from_row_slice(2, 2, &[0.5, 0.25, 1.0, 0.0]);
        let locations = DMatrix::from_row_slice(1, 2, &[1.5, 0.5]);
        let b = reach_basis(&signal, &locations);

        assert_eq!(b.shape(), (1, 2));
        assert_relative_eq!(b[(0, 0)], 1.0 - (-(0.75 + 0.125_f64)).exp(), epsilon = 1e-12);
        assert_relative_eq!(b[(0, 1)], 1.0 - (-1.5_f64).exp(), epsilon = 1e-12);
    }

    #[test]
    fn basis_is_precise_for_tiny_exposure() {
        let x = 1e-12;
        let v = partial_reach(x);
        assert!((v / x - 1.0).abs() < 1e-9, "expected ~x for tiny x, got {v}");
    }

    #[test]
    fn zero_location_reaches_nobody() {
        let signal = DMatrix::from_element(3, 2, 0.7);
        let locations = DMatrix::zeros(1, 2);
        let b = reach_basis(&signal, &locations);
        assert!(b.iter().all(|&v| v == 0.0));
    }

    proptest! {
        #[test]
        fn basis_range_is_unit_interval(
            signal in proptest::collection::vec(0.0f64..2.0, 6),
            location in proptest::collection::vec(0.0f64..3.0, 2),
        ) {
            let signal = DMatrix::from_row_slice(3, 2, &signal);
            let locations = DMatrix::from_row_slice(1, 2, &location);
            let b = reach_basis(&signal, &locations);
            for &v in b.iter() {
                prop_assert!((0.0..1.0).contains(&v), "entry {} outside [0, 1)", v);
            }
        }
    }
}
