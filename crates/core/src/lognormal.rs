//! The log-normal transform.
//!
//! A log-normal field `δ = exp(g - σ²/2) - 1` has correlation
//! `ξ_δ = exp(ξ_g) - 1`. To realise a target power `P`, the Gaussian `g` is
//! drawn with the power whose correlation is `ln(1 + ξ_δ)`:
//!
//! ```text
//! ξ_δ  = V · Re(inverse(P))
//! ξ_g  = ln(1 + ξ_δ)
//! P_g  = |forward(ξ_g)|
//! ```
//!
//! Where `ξ_δ <= -1` the logarithm is NaN; the target spectrum has no
//! log-normal realisation there and the NaN propagates.

use crate::dft::{forward_real, inverse};
use crate::error::PowerBoxError;
use crate::field::Field;
use crate::grid::FrequencyGrid;

/// Power placed at the monopole of the Gaussian power, kept positive so its
/// square root stays finite.
pub const GAUSSIAN_MONOPOLE_POWER: f64 = 1e-12;

/// Real-space correlation function of a power array.
pub fn correlation_array(
    power: &Field,
    grid: &FrequencyGrid,
    volume: f64,
) -> Result<Field, PowerBoxError> {
    let xi = inverse(&power.to_complex(), grid)?;
    Ok(xi.re().map(|&v| volume * v))
}

/// Correlation a Gaussian field needs so that its exponential has `correlation`.
pub fn gaussian_correlation_array(correlation: &Field) -> Field {
    correlation.map(|&xi| xi.ln_1p())
}

/// Power spectrum of a Gaussian correlation, monopole pinned to
/// [`GAUSSIAN_MONOPOLE_POWER`].
pub fn gaussian_power_array(
    gaussian_correlation: &Field,
    grid: &FrequencyGrid,
    monopole: &[usize],
) -> Result<Field, PowerBoxError> {
    let power = forward_real(gaussian_correlation, grid)?.abs();
    Ok(power.with_value_at(monopole, GAUSSIAN_MONOPOLE_POWER))
}

/// Exponentiates a zero-mean Gaussian field into an over-density:
/// `exp(g - Var(g)/2) - 1`, with the population variance of `g`.
///
/// The result is bounded below by `-1`; there is no upper clip.
pub fn exponentiate(gaussian: &Field) -> Field {
    let half_var = gaussian.variance() / 2.0;
    gaussian.map(|&g| (g - half_var).exp_m1())
}
