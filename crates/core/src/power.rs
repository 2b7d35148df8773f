//! Power spectra and their evaluation on a wavenumber grid.
//!
//! The monopole (k = 0) needs care: power-law spectra usually diverge there,
//! yet its amplitude sets the spatial mean of the field, which must be zero.
//! Evaluation therefore substitutes `|k| = 1` at the monopole, evaluates, and
//! then forces the power there back to exactly zero.

use crate::field::Field;

/// An isotropic power spectrum: expected squared Fourier amplitude as a
/// function of wavenumber magnitude.
///
/// Implementations must be pure. Any `Fn(f64) -> f64 + Send + Sync` closure is
/// a spectrum. Negative return values are not rejected; they surface as NaN
/// amplitudes downstream.
pub trait PowerSpectrum: Send + Sync {
    /// Power at wavenumber magnitude `k >= 0`.
    fn power(&self, k: f64) -> f64;
}

impl<F> PowerSpectrum for F
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    fn power(&self, k: f64) -> f64 {
        self(k)
    }
}

/// Evaluates `pk` on `magnitudes`, keeping the monopole stable and zero.
pub fn power_array<F>(magnitudes: &Field, monopole: &[usize], pk: F) -> Field
where
    F: Fn(f64) -> f64,
{
    magnitudes
        .clone()
        .with_value_at(monopole, 1.0)
        .map(|&k| pk(k))
        .with_value_at(monopole, 0.0)
}

/// Square root of a power array, with the monopole amplitude forced to zero.
///
/// The monopole is set to one before the square root so the operation never
/// sees whatever value a caller left there.
pub fn amplitude_array(power: &Field, monopole: &[usize]) -> Field {
    power
        .clone()
        .with_value_at(monopole, 1.0)
        .map(|p| p.sqrt())
        .with_value_at(monopole, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn magnitudes() -> Field {
        Field::from_fn(5, 2, |idx| {
            let kx = idx[0] as f64 - 2.0;
            let ky = idx[1] as f64 - 2.0;
            (kx * kx + ky * ky).sqrt()
        })
        .unwrap()
    }

    #[test]
    fn closures_are_spectra() {
        let pk = |k: f64| 2.0 * k;
        assert_eq!(pk.power(3.0), 6.0);
    }

    #[test]
    fn boxed_spectrum_dispatches() {
        let pk: Box<dyn PowerSpectrum> = Box::new(|k: f64| k * k);
        assert_eq!(pk.power(3.0), 9.0);
    }

    #[test]
    fn monopole_is_exactly_zero_for_divergent_spectrum() {
        let power = power_array(&magnitudes(), &[2, 2], |k| 1.0 / k);
        assert_eq!(*power.get(&[2, 2]), 0.0);
        assert!(power.all_finite());
    }

    #[test]
    fn monopole_is_evaluated_at_unit_wavenumber() {
        use std::cell::RefCell;
        let seen = RefCell::new(Vec::new());
        power_array(&magnitudes(), &[2, 2], |k| {
            seen.borrow_mut().push(k);
            k
        });
        assert!(!seen.borrow().contains(&0.0), "spectrum was called at k = 0");
    }

    #[test]
    fn other_cells_follow_spectrum() {
        let power = power_array(&magnitudes(), &[2, 2], |k| k.powi(-2));
        assert!((power.get(&[2, 3]) - 1.0).abs() < 1e-15);
        assert!((power.get(&[0, 2]) - 0.25).abs() < 1e-15);
    }

    #[test]
    fn amplitude_zeroes_monopole_and_takes_root() {
        let power = Field::filled(3, 2, 4.0).unwrap();
        let amp = amplitude_array(&power, &[1, 1]);
        assert_eq!(*amp.get(&[1, 1]), 0.0);
        assert_eq!(*amp.get(&[0, 0]), 2.0);
    }

    #[test]
    fn amplitude_ignores_negative_monopole() {
        let power = Field::filled(3, 1, 1.0).unwrap().with_value_at(&[1], -5.0);
        let amp = amplitude_array(&power, &[1]);
        assert_eq!(*amp.get(&[1]), 0.0);
    }

    #[test]
    fn negative_power_becomes_nan_amplitude() {
        let power = Field::filled(3, 1, -1.0).unwrap();
        let amp = amplitude_array(&power, &[1]);
        assert!(amp.get(&[0]).is_nan());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn monopole_is_zero_for_any_power_law(index in -4.0_f64..4.0, amp in 0.01_f64..100.0) {
                let power = power_array(&magnitudes(), &[2, 2], |k| amp * k.powf(-index));
                prop_assert_eq!(*power.get(&[2, 2]), 0.0);
            }
        }
    }
}
