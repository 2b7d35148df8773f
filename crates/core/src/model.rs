//! One-point distributions a box can realise.
//!
//! A [`FieldModel`] decides two things: which power the Hermitian Gaussian
//! draw is scaled by, and how the inverse-transformed Gaussian becomes the
//! output over-density. [`FieldKind`] is the closed set of models, selectable
//! by name.

use crate::dft::inverse;
use crate::error::PowerBoxError;
use crate::field::{ComplexField, Field};
use crate::lognormal;
use crate::power::amplitude_array;
use crate::powerbox::PowerBox;
use serde::{Deserialize, Serialize};

/// Names accepted by [`FieldKind::from_name`], canonical spelling first.
const MODEL_NAMES: &[&str] = &["gaussian", "lognormal"];

/// Strategy for turning a box's spectrum into a realised field.
pub trait FieldModel {
    /// Canonical model name.
    fn name(&self) -> &'static str;

    /// Power array the Gaussian draw is scaled by.
    fn power_transform(&self, pb: &PowerBox) -> Result<Field, PowerBoxError>;

    /// Fourier amplitude multiplied into the Hermitian draw.
    ///
    /// Defaults to the square root of [`power_transform`](Self::power_transform)
    /// with the monopole forced to zero.
    fn amplitude(&self, pb: &PowerBox) -> Result<Field, PowerBoxError> {
        let power = self.power_transform(pb)?;
        Ok(amplitude_array(&power, &pb.monopole_index()))
    }

    /// Real-space over-density from a Fourier-space Gaussian realisation.
    fn field_from_gaussian(
        &self,
        pb: &PowerBox,
        delta_k: &ComplexField,
    ) -> Result<Field, PowerBoxError>;
}

/// Zero-mean Gaussian over-density.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Gaussian;

impl FieldModel for Gaussian {
    fn name(&self) -> &'static str {
        "gaussian"
    }

    fn power_transform(&self, pb: &PowerBox) -> Result<Field, PowerBoxError> {
        Ok(pb.power_array())
    }

    fn field_from_gaussian(
        &self,
        pb: &PowerBox,
        delta_k: &ComplexField,
    ) -> Result<Field, PowerBoxError> {
        let volume = pb.volume();
        let delta_x = inverse(delta_k, pb.grid())?.re().map(|&v| volume * v);
        if pb.config().ensure_physical {
            Ok(delta_x.clip_below(-1.0))
        } else {
            Ok(delta_x)
        }
    }
}

/// Log-normal over-density with the box's spectrum as its power.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogNormal;

impl FieldModel for LogNormal {
    fn name(&self) -> &'static str {
        "lognormal"
    }

    fn power_transform(&self, pb: &PowerBox) -> Result<Field, PowerBoxError> {
        pb.gaussian_power_array()
    }

    /// Plain square root: the monopole keeps the small pinned power.
    fn amplitude(&self, pb: &PowerBox) -> Result<Field, PowerBoxError> {
        Ok(self.power_transform(pb)?.map(|p| p.sqrt()))
    }

    fn field_from_gaussian(
        &self,
        pb: &PowerBox,
        delta_k: &ComplexField,
    ) -> Result<Field, PowerBoxError> {
        let scale = pb.volume().sqrt();
        let gaussian = inverse(delta_k, pb.grid())?.re().map(|&v| scale * v);
        Ok(lognormal::exponentiate(&gaussian))
    }
}

/// Name-selectable field model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Gaussian,
    LogNormal,
}

impl FieldKind {
    /// Looks up a model by name. `log-normal` is accepted as an alias.
    pub fn from_name(name: &str) -> Result<Self, PowerBoxError> {
        match name {
            "gaussian" => Ok(Self::Gaussian),
            "lognormal" | "log-normal" => Ok(Self::LogNormal),
            _ => Err(PowerBoxError::UnknownModel(name.to_string())),
        }
    }

    fn model(&self) -> &'static dyn FieldModel {
        match self {
            Self::Gaussian => &Gaussian,
            Self::LogNormal => &LogNormal,
        }
    }
}

impl FieldModel for FieldKind {
    fn name(&self) -> &'static str {
        self.model().name()
    }

    fn power_transform(&self, pb: &PowerBox) -> Result<Field, PowerBoxError> {
        self.model().power_transform(pb)
    }

    fn amplitude(&self, pb: &PowerBox) -> Result<Field, PowerBoxError> {
        self.model().amplitude(pb)
    }

    fn field_from_gaussian(
        &self,
        pb: &PowerBox,
        delta_k: &ComplexField,
    ) -> Result<Field, PowerBoxError> {
        self.model().field_from_gaussian(pb, delta_k)
    }
}

/// Canonical names of all field models.
pub fn list_models() -> &'static [&'static str] {
    MODEL_NAMES
}
