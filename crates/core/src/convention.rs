//! The `(a, b)` Fourier convention.
//!
//! The continuous transform pair is
//!
//! ```text
//! F(k) = sqrt(|b| / (2π)^(1-a))^d ∫ f(x) exp(-i b k·x) d^d x
//! f(x) = sqrt(|b| / (2π)^(1+a))^d ∫ F(k) exp(+i b k·x) d^d k
//! ```
//!
//! `(a, b) = (1, 1)` is the cosmological convention (angular wavenumbers);
//! `(0, 2π)` is the ordinary-frequency convention used by numerical FFT
//! libraries.

use crate::error::PowerBoxError;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Normalisation and kernel parameters of a Fourier transform pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FourierConvention {
    /// Splits the `2π` normalisation between forward and inverse transforms.
    pub a: f64,
    /// Scales the kernel exponent, `exp(±i b k x)`.
    pub b: f64,
}

impl Default for FourierConvention {
    fn default() -> Self {
        Self::cosmology()
    }
}

impl FourierConvention {
    /// Creates a validated convention.
    pub fn new(a: f64, b: f64) -> Result<Self, PowerBoxError> {
        let convention = Self { a, b };
        convention.validate()?;
        Ok(convention)
    }

    /// `(1, 1)`: angular wavenumbers, all `2π` on the inverse transform.
    pub const fn cosmology() -> Self {
        Self { a: 1.0, b: 1.0 }
    }

    /// `(0, 2π)`: ordinary frequencies, unit-normalised kernel.
    pub const fn numerical() -> Self {
        Self { a: 0.0, b: TAU }
    }

    /// Fails unless `a` is finite and `b` is finite and non-zero.
    pub fn validate(&self) -> Result<(), PowerBoxError> {
        if !self.a.is_finite() || !self.b.is_finite() || self.b == 0.0 {
            return Err(PowerBoxError::InvalidConvention {
                a: self.a,
                b: self.b,
            });
        }
        Ok(())
    }

    /// Extent of the frequency axis for a real-space cell size `dx`:
    /// `Lk = 2π / (dx · b)`.
    pub fn k_extent(&self, dx: f64) -> f64 {
        TAU / (dx * self.b)
    }

    /// Prefactor of the forward transform in `dim` dimensions.
    pub fn forward_norm(&self, dim: usize) -> f64 {
        (self.b.abs() / TAU.powf(1.0 - self.a)).sqrt().powf(dim as f64)
    }

    /// Prefactor of the inverse transform in `dim` dimensions.
    pub fn inverse_norm(&self, dim: usize) -> f64 {
        (self.b.abs() / TAU.powf(1.0 + self.a)).sqrt().powf(dim as f64)
    }

    /// `n` centred sample frequencies for spacing `d`: zero sits at index
    /// `n / 2`, negative frequencies before it.
    ///
    /// Values are `(j - n/2) / (n d) · 2π / b`, i.e. the shifted FFT frequencies
    /// rescaled to this convention.
    pub fn fftfreq(&self, n: usize, d: f64) -> Vec<f64> {
        let centre = (n / 2) as f64;
        let scale = TAU / (self.b * n as f64 * d);
        (0..n).map(|j| (j as f64 - centre) * scale).collect()
    }
}
