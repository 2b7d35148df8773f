//! Hermitian-symmetric Gaussian draws in Fourier space.
//!
//! A complex array `F` with `F[idx] == conj(F[reverse(idx)])` on every axis
//! inverse-transforms to a purely real field. The draw symmetrises two
//! independent random arrays:
//!
//! ```text
//! mag' = (mag + reverse(mag)) / √2       mag ~ N(0, 1)
//! pha' = (pha - reverse(pha)) / 2 + π    pha ~ U[0, 2π)
//! F    = mag' · exp(i pha')
//! ```
//!
//! `mag'` is again standard normal, so the amplitude statistics survive the
//! symmetrisation.

use crate::error::PowerBoxError;
use crate::field::{ComplexField, Field};
use crate::grid::BoxGeometry;
use crate::prng::{DrawSite, RandomSource};
use num_complex::Complex64;
use rand::distributions::{Distribution, Uniform};
use rand_distr::StandardNormal;
use std::f64::consts::{PI, SQRT_2, TAU};

/// Combines magnitude and phase arrays into an exactly Hermitian complex array.
///
/// Each mirror pair is computed once and written as exact conjugates; the
/// self-mirrored centre of an odd-sided array is real.
pub fn make_hermitian(mag: &Field, pha: &Field) -> Result<ComplexField, PowerBoxError> {
    mag.check_same_shape(pha)?;
    let len = mag.len();
    let m = mag.data();
    let p = pha.data();
    let mut out = vec![Complex64::default(); len];

    for i in 0..len {
        let r = mag.reversed_flat(i);
        if r < i {
            continue;
        }
        let modulus = (m[i] + m[r]) / SQRT_2;
        if r == i {
            // exp(iπ) = -1
            out[i] = Complex64::new(-modulus, 0.0);
        } else {
            let z = Complex64::from_polar(modulus, (p[i] - p[r]) / 2.0 + PI);
            out[i] = z;
            out[r] = z.conj();
        }
    }
    Field::from_data(mag.side(), mag.dim(), out)
}

/// Draws a Hermitian array on the geometry's helper grid, cropped to the
/// logical side when that is even.
///
/// Magnitudes come from the [`DrawSite::Magnitude`] stream and phases from
/// [`DrawSite::Phase`], one value per helper-grid cell in row-major order.
pub fn gauss_hermitian(
    geometry: &BoxGeometry,
    rng: &mut RandomSource,
) -> Result<ComplexField, PowerBoxError> {
    let n = geometry.helper_side();
    let dim = geometry.dim();

    let mag: Field = Field::from_fn(n, dim, |_| {
        StandardNormal.sample(rng.stream(DrawSite::Magnitude))
    })?;
    let phase_dist = Uniform::new(0.0, TAU);
    let pha: Field = Field::from_fn(n, dim, |_| phase_dist.sample(rng.stream(DrawSite::Phase)))?;

    let field = make_hermitian(&mag, &pha)?;
    if geometry.is_even() {
        field.crop_last()
    } else {
        Ok(field)
    }
}
