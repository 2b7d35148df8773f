//! Parametric power spectrum models.

use powerbox_core::error::PowerBoxError;
use powerbox_core::params::param_f64;
use serde_json::{json, Value};

pub const DEFAULT_AMPLITUDE: f64 = 1.0;
pub const DEFAULT_INDEX: f64 = 2.0;
pub const DEFAULT_PEAK_K0: f64 = 10.0;
pub const DEFAULT_PEAK_WIDTH: f64 = 2.0;

fn check_finite(name: &str, value: f64) -> Result<f64, PowerBoxError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PowerBoxError::InvalidParameter {
            name: name.to_string(),
            value,
        })
    }
}

/// `P(k) = A k^-n`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerLaw {
    pub amplitude: f64,
    pub index: f64,
}

impl Default for PowerLaw {
    fn default() -> Self {
        Self {
            amplitude: DEFAULT_AMPLITUDE,
            index: DEFAULT_INDEX,
        }
    }
}

impl PowerLaw {
    pub fn from_json(params: &Value) -> Result<Self, PowerBoxError> {
        Ok(Self {
            amplitude: check_finite(
                "amplitude",
                param_f64(params, "amplitude", DEFAULT_AMPLITUDE)?,
            )?,
            index: check_finite("index", param_f64(params, "index", DEFAULT_INDEX)?)?,
        })
    }

    pub fn power(&self, k: f64) -> f64 {
        self.amplitude * k.powf(-self.index)
    }

    pub fn params(&self) -> Value {
        json!({ "amplitude": self.amplitude, "index": self.index })
    }

    pub fn param_schema() -> Value {
        json!({
            "amplitude": {
                "type": "number",
                "default": DEFAULT_AMPLITUDE,
                "description": "Power at k = 1"
            },
            "index": {
                "type": "number",
                "default": DEFAULT_INDEX,
                "description": "Spectral index n in P = A k^-n"
            }
        })
    }
}

/// Scale-free `P(k) = A`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct White {
    pub amplitude: f64,
}

impl Default for White {
    fn default() -> Self {
        Self {
            amplitude: DEFAULT_AMPLITUDE,
        }
    }
}

impl White {
    pub fn from_json(params: &Value) -> Result<Self, PowerBoxError> {
        Ok(Self {
            amplitude: check_finite(
                "amplitude",
                param_f64(params, "amplitude", DEFAULT_AMPLITUDE)?,
            )?,
        })
    }

    pub fn power(&self, _k: f64) -> f64 {
        self.amplitude
    }

    pub fn params(&self) -> Value {
        json!({ "amplitude": self.amplitude })
    }

    pub fn param_schema() -> Value {
        json!({
            "amplitude": {
                "type": "number",
                "default": DEFAULT_AMPLITUDE,
                "description": "Power at every wavenumber"
            }
        })
    }
}

/// A bump of power around `k0`: `P(k) = A exp(-(k - k0)² / (2 w²))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianPeak {
    pub amplitude: f64,
    pub k0: f64,
    pub width: f64,
}

impl Default for GaussianPeak {
    fn default() -> Self {
        Self {
            amplitude: DEFAULT_AMPLITUDE,
            k0: DEFAULT_PEAK_K0,
            width: DEFAULT_PEAK_WIDTH,
        }
    }
}

impl GaussianPeak {
    /// Fails unless `width` is positive.
    pub fn from_json(params: &Value) -> Result<Self, PowerBoxError> {
        let width = param_f64(params, "width", DEFAULT_PEAK_WIDTH)?;
        if !(width.is_finite() && width > 0.0) {
            return Err(PowerBoxError::InvalidParameter {
                name: "width".to_string(),
                value: width,
            });
        }
        Ok(Self {
            amplitude: check_finite(
                "amplitude",
                param_f64(params, "amplitude", DEFAULT_AMPLITUDE)?,
            )?,
            k0: check_finite("k0", param_f64(params, "k0", DEFAULT_PEAK_K0)?)?,
            width,
        })
    }

    pub fn power(&self, k: f64) -> f64 {
        let z = (k - self.k0) / self.width;
        self.amplitude * (-0.5 * z * z).exp()
    }

    pub fn params(&self) -> Value {
        json!({ "amplitude": self.amplitude, "k0": self.k0, "width": self.width })
    }

    pub fn param_schema() -> Value {
        json!({
            "amplitude": {
                "type": "number",
                "default": DEFAULT_AMPLITUDE,
                "description": "Power at the peak"
            },
            "k0": {
                "type": "number",
                "default": DEFAULT_PEAK_K0,
                "description": "Wavenumber of the peak"
            },
            "width": {
                "type": "number",
                "default": DEFAULT_PEAK_WIDTH,
                "min": 0.0,
                "description": "Standard deviation of the peak in k"
            }
        })
    }
}
