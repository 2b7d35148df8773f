//! Forward and inverse d-dimensional Fourier transforms under an `(a, b)`
//! convention.
//!
//! Both transforms discretise the continuous pair documented in
//! [`crate::convention`] on the samples of a [`FrequencyGrid`]:
//!
//! ```text
//! forward: F[m] = C_f dx^d · exp(-i b k_m·x0) · shift(DFT f)[m]
//! inverse: f[j] = C_i |dk|^d · IDFT(unshift(F · exp(+i b k·x0)))[j]
//! ```
//!
//! `shift` moves the zero frequency to index `N / 2` on every axis, `x0` is
//! the grid's left edge and `IDFT` is unnormalised. Because
//! `b · dk · dx · N = 2π`, the two are exact inverses for any convention.

use crate::error::PowerBoxError;
use crate::field::{ComplexField, Field};
use crate::grid::FrequencyGrid;
use num_complex::Complex64;
use rustfft::{FftDirection, FftPlanner};

/// Transforms a real-space field to Fourier space.
pub fn forward(field: &ComplexField, grid: &FrequencyGrid) -> Result<ComplexField, PowerBoxError> {
    grid.check_field(field)?;
    let side = grid.side();
    let dim = grid.dim();

    let mut data = field.data().to_vec();
    transform_axes(&mut data, side, dim, FftDirection::Forward);
    let data = roll(&data, side, dim, side - side / 2);

    let scale = grid.convention().forward_norm(dim) * grid.x_cell_volume();
    let data = apply_phases(data, side, &grid.phase_factors(-1.0), scale);
    Field::from_data(side, dim, data)
}

/// Transforms a Fourier-space field back to real space.
pub fn inverse(field: &ComplexField, grid: &FrequencyGrid) -> Result<ComplexField, PowerBoxError> {
    grid.check_field(field)?;
    let side = grid.side();
    let dim = grid.dim();

    let data = apply_phases(field.data().to_vec(), side, &grid.phase_factors(1.0), 1.0);
    let mut data = roll(&data, side, dim, side / 2);
    transform_axes(&mut data, side, dim, FftDirection::Inverse);

    let scale = grid.convention().inverse_norm(dim) * grid.k_cell_volume();
    data.iter_mut().for_each(|z| *z *= scale);
    Field::from_data(side, dim, data)
}

/// Forward transform of a real field.
pub fn forward_real(field: &Field, grid: &FrequencyGrid) -> Result<ComplexField, PowerBoxError> {
    forward(&field.to_complex(), grid)
}

/// In-place unnormalised 1D FFT along every axis of a row-major hypercube.
fn transform_axes(data: &mut [Complex64], side: usize, dim: usize, direction: FftDirection) {
    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft(side, direction);
    let mut scratch = vec![Complex64::default(); fft.get_inplace_scratch_len()];
    let mut lane = vec![Complex64::default(); side];

    let mut stride = data.len();
    for _ in 0..dim {
        stride /= side;
        let block = stride * side;
        for start in (0..data.len()).step_by(block) {
            for offset in 0..stride {
                let base = start + offset;
                for (j, slot) in lane.iter_mut().enumerate() {
                    *slot = data[base + j * stride];
                }
                fft.process_with_scratch(&mut lane, &mut scratch);
                for (j, value) in lane.iter().enumerate() {
                    data[base + j * stride] = *value;
                }
            }
        }
    }
}

/// Cyclic shift on every axis: `out[i] = data[(i + offset) mod side]`.
///
/// `offset = side - side / 2` is an fftshift, `offset = side / 2` its inverse.
fn roll(data: &[Complex64], side: usize, dim: usize, offset: usize) -> Vec<Complex64> {
    let mut out = vec![Complex64::default(); data.len()];
    let mut idx = vec![0usize; dim];
    for slot in out.iter_mut() {
        let source = idx
            .iter()
            .fold(0, |acc, &i| acc * side + (i + offset) % side);
        *slot = data[source];
        for axis in idx.iter_mut().rev() {
            *axis += 1;
            if *axis < side {
                break;
            }
            *axis = 0;
        }
    }
    out
}

/// Multiplies each cell by the product of its per-axis phase factors and `scale`.
fn apply_phases(
    mut data: Vec<Complex64>,
    side: usize,
    phases: &[Vec<Complex64>],
    scale: f64,
) -> Vec<Complex64> {
    let dim = phases.len();
    let mut idx = vec![0usize; dim];
    for value in data.iter_mut() {
        let phase = idx
            .iter()
            .zip(phases)
            .fold(Complex64::new(scale, 0.0), |acc, (&i, axis)| acc * axis[i]);
        *value *= phase;
        for axis in idx.iter_mut().rev() {
            *axis += 1;
            if *axis < side {
                break;
            }
            *axis = 0;
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convention::FourierConvention;
    use crate::grid::BoxGeometry;
    use crate::prng::Xorshift64;
    use rand::Rng;

    fn grid(side: usize, dim: usize, length: f64, convention: FourierConvention) -> FrequencyGrid {
        let geometry = BoxGeometry::new(side, dim, length).unwrap();
        FrequencyGrid::new(&geometry, convention).unwrap()
    }

    fn random_field(side: usize, dim: usize, seed: u64) -> ComplexField {
        let mut rng = Xorshift64::new(seed);
        Field::from_fn(side, dim, |_| {
            Complex64::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0))
        })
        .unwrap()
    }

    fn max_abs_diff(a: &ComplexField, b: &ComplexField) -> f64 {
        a.data()
            .iter()
            .zip(b.data())
            .map(|(x, y)| (x - y).norm())
            .fold(0.0, f64::max)
    }

    #[test]
    fn roll_and_unroll_are_inverse() {
        let data: Vec<Complex64> = (0..25).map(|i| Complex64::new(i as f64, 0.0)).collect();
        let shifted = roll(&data, 5, 2, 5 - 5 / 2);
        assert_eq!(roll(&shifted, 5, 2, 5 / 2), data);
    }

    #[test]
    fn roll_moves_zero_frequency_to_centre() {
        let data: Vec<Complex64> = (0..4).map(|i| Complex64::new(i as f64, 0.0)).collect();
        let shifted: Vec<f64> = roll(&data, 4, 1, 2).iter().map(|z| z.re).collect();
        assert_eq!(shifted, vec![2.0, 3.0, 0.0, 1.0]);
    }

    #[test]
    fn delta_at_origin_has_flat_spectrum() {
        // For even N the sample at index N/2 sits exactly at x = 0.
        let g = grid(8, 2, 1.0, FourierConvention::cosmology());
        let delta = Field::from_fn(8, 2, |idx| {
            if idx == [4_usize, 4].as_slice() {
                Complex64::new(1.0, 0.0)
            } else {
                Complex64::default()
            }
        })
        .unwrap();
        let ft = forward(&delta, &g).unwrap();
        let expected = g.convention().forward_norm(2) * g.x_cell_volume();
        for z in ft.data() {
            assert!((z.re - expected).abs() < 1e-12, "re = {}", z.re);
            assert!(z.im.abs() < 1e-12, "im = {}", z.im);
        }
    }

    #[test]
    fn constant_field_concentrates_at_monopole() {
        let g = grid(6, 2, 2.0, FourierConvention::numerical());
        let ones = Field::filled(6, 2, 1.0).unwrap();
        let ft = forward_real(&ones, &g).unwrap();
        let monopole = ft.get(&[3, 3]);
        // ∫ 1 d^2x over a 2×2 box.
        assert!((monopole.norm() - 4.0).abs() < 1e-12);
        for (flat, z) in ft.data().iter().enumerate() {
            if flat != ft.flat_index(&[3, 3]) {
                assert!(z.norm() < 1e-12, "leakage {z} at {flat}");
            }
        }
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        let g = grid(8, 2, 1.0, FourierConvention::cosmology());
        let wrong = random_field(9, 2, 1);
        assert!(matches!(
            forward(&wrong, &g),
            Err(PowerBoxError::ShapeMismatch { .. })
        ));
        assert!(inverse(&wrong, &g).is_err());
    }

    #[test]
    fn round_trip_with_shifted_left_edge() {
        let g = grid(6, 2, 3.0, FourierConvention::cosmology())
            .with_left_edge(vec![0.0, 0.7])
            .unwrap();
        let x = random_field(6, 2, 77);
        let back = inverse(&forward(&x, &g).unwrap(), &g).unwrap();
        assert!(max_abs_diff(&x, &back) < 1e-10);
    }

    #[test]
    fn hermitian_input_inverts_to_real_output() {
        let g = grid(7, 2, 1.0, FourierConvention::cosmology());
        let x = random_field(7, 2, 3).re();
        let ft = forward_real(&x, &g).unwrap();
        let back = inverse(&ft, &g).unwrap();
        assert!(back.max_abs_im() < 1e-10);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            #[test]
            fn inverse_undoes_forward(
                side in 2_usize..10,
                dim in 1_usize..4,
                length in 0.1_f64..100.0,
                a in -1.0_f64..2.0,
                b in prop_oneof![0.5_f64..10.0, -10.0_f64..-0.5],
                seed: u64,
            ) {
                let convention = FourierConvention::new(a, b).unwrap();
                let g = grid(side, dim, length, convention);
                let x = random_field(side, dim, seed);
                let back = inverse(&forward(&x, &g).unwrap(), &g).unwrap();
                prop_assert!(max_abs_diff(&x, &back) < 1e-10, "diff {}", max_abs_diff(&x, &back));
            }

            #[test]
            fn forward_undoes_inverse(
                side in 2_usize..10,
                dim in 1_usize..3,
                length in 0.1_f64..10.0,
                seed: u64,
            ) {
                let g = grid(side, dim, length, FourierConvention::cosmology());
                let k = random_field(side, dim, seed);
                let back = forward(&inverse(&k, &g).unwrap(), &g).unwrap();
                prop_assert!(max_abs_diff(&k, &back) < 1e-10);
            }
        }
    }
}
