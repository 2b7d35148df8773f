//! Construction options for a [`PowerBox`](crate::PowerBox).

use crate::convention::FourierConvention;
use crate::error::PowerBoxError;
use crate::grid::BoxGeometry;
use crate::params::{param_bool, param_f64, param_usize};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Cells per side used when a configuration omits `n`.
pub const DEFAULT_SIDE: usize = 64;

/// Everything needed to lay out a box, except the spectrum itself.
///
/// Missing keys take the defaults below when deserialised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxConfig {
    /// Cells per side (`N`).
    pub n: usize,
    /// Number of dimensions (`d`), default 2.
    pub dim: usize,
    /// Physical side length (`L`), default 1.
    pub box_length: f64,
    /// Clip Gaussian over-densities to `>= -1`.
    pub ensure_physical: bool,
    /// Fourier convention normalisation parameter, default 1.
    pub a: f64,
    /// Fourier convention kernel parameter, default 1.
    pub b: f64,
    /// Divide the spectrum by the box volume before use, default true.
    pub vol_normalised_power: bool,
}

impl Default for BoxConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SIDE)
    }
}

impl BoxConfig {
    /// Default options for an `n`-cell-per-side box.
    pub fn new(n: usize) -> Self {
        Self {
            n,
            dim: 2,
            box_length: 1.0,
            ensure_physical: false,
            a: 1.0,
            b: 1.0,
            vol_normalised_power: true,
        }
    }

    pub fn with_dim(mut self, dim: usize) -> Self {
        self.dim = dim;
        self
    }

    pub fn with_box_length(mut self, box_length: f64) -> Self {
        self.box_length = box_length;
        self
    }

    pub fn with_convention(mut self, a: f64, b: f64) -> Self {
        self.a = a;
        self.b = b;
        self
    }

    pub fn with_ensure_physical(mut self, ensure_physical: bool) -> Self {
        self.ensure_physical = ensure_physical;
        self
    }

    pub fn with_vol_normalised_power(mut self, vol_normalised_power: bool) -> Self {
        self.vol_normalised_power = vol_normalised_power;
        self
    }

    /// Checks geometry and convention without building anything.
    pub fn validate(&self) -> Result<(), PowerBoxError> {
        self.geometry()?;
        self.convention()?;
        Ok(())
    }

    /// The validated box geometry.
    pub fn geometry(&self) -> Result<BoxGeometry, PowerBoxError> {
        BoxGeometry::new(self.n, self.dim, self.box_length)
    }

    /// The validated Fourier convention.
    pub fn convention(&self) -> Result<FourierConvention, PowerBoxError> {
        FourierConvention::new(self.a, self.b)
    }

    /// Reads a configuration from a loose JSON object.
    ///
    /// Missing keys take their defaults; a key of the wrong type is an error.
    /// The result is not validated.
    pub fn from_json(params: &Value) -> Result<Self, PowerBoxError> {
        let d = Self::default();
        Ok(Self {
            n: param_usize(params, "n", d.n)?,
            dim: param_usize(params, "dim", d.dim)?,
            box_length: param_f64(params, "box_length", d.box_length)?,
            ensure_physical: param_bool(params, "ensure_physical", d.ensure_physical)?,
            a: param_f64(params, "a", d.a)?,
            b: param_f64(params, "b", d.b)?,
            vol_normalised_power: param_bool(
                params,
                "vol_normalised_power",
                d.vol_normalised_power,
            )?,
        })
    }
}
