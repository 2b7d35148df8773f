#![deny(unsafe_code)]
//! Spectrum registry: maps spectrum names to models and builds boxes from
//! recipes.
//!
//! Sits between `powerbox-core` (which defines the `PowerSpectrum` trait and
//! `PowerBox`) and the CLI, so name-based dispatch lives in one place.

pub mod models;

use models::{GaussianPeak, PowerLaw, White};
use powerbox_core::error::PowerBoxError;
use powerbox_core::{PowerBox, Recipe};
use serde_json::Value;

/// All available spectrum names.
const SPECTRUM_NAMES: &[&str] = &["power-law", "white", "gaussian-peak"];

/// Enumeration of the named spectrum models.
///
/// Use [`SpectrumKind::from_name`] for string-based construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpectrumKind {
    PowerLaw(PowerLaw),
    White(White),
    GaussianPeak(GaussianPeak),
}

impl SpectrumKind {
    /// Constructs a spectrum by name from JSON parameters.
    ///
    /// Returns `PowerBoxError::UnknownSpectrum` if the name is not recognized.
    pub fn from_name(name: &str, params: &Value) -> Result<Self, PowerBoxError> {
        match name {
            "power-law" => Ok(SpectrumKind::PowerLaw(PowerLaw::from_json(params)?)),
            "white" => Ok(SpectrumKind::White(White::from_json(params)?)),
            "gaussian-peak" => Ok(SpectrumKind::GaussianPeak(GaussianPeak::from_json(params)?)),
            _ => Err(PowerBoxError::UnknownSpectrum(name.to_string())),
        }
    }

    /// Returns a slice of all recognized spectrum names.
    pub fn list_spectra() -> &'static [&'static str] {
        SPECTRUM_NAMES
    }

    pub fn name(&self) -> &'static str {
        match self {
            SpectrumKind::PowerLaw(_) => "power-law",
            SpectrumKind::White(_) => "white",
            SpectrumKind::GaussianPeak(_) => "gaussian-peak",
        }
    }

    /// Power at wavenumber magnitude `k`.
    pub fn power(&self, k: f64) -> f64 {
        match self {
            SpectrumKind::PowerLaw(s) => s.power(k),
            SpectrumKind::White(s) => s.power(k),
            SpectrumKind::GaussianPeak(s) => s.power(k),
        }
    }

    /// Current parameter values.
    pub fn params(&self) -> Value {
        match self {
            SpectrumKind::PowerLaw(s) => s.params(),
            SpectrumKind::White(s) => s.params(),
            SpectrumKind::GaussianPeak(s) => s.params(),
        }
    }

    /// Parameter schema (type, default, description per key).
    pub fn param_schema(&self) -> Value {
        match self {
            SpectrumKind::PowerLaw(_) => PowerLaw::param_schema(),
            SpectrumKind::White(_) => White::param_schema(),
            SpectrumKind::GaussianPeak(_) => GaussianPeak::param_schema(),
        }
    }

    /// The spectrum as a closure a [`PowerBox`] can own.
    pub fn into_fn(self) -> impl Fn(f64) -> f64 + Send + Sync + 'static {
        move |k| self.power(k)
    }
}

/// Builds the box a recipe describes, validating every part of it.
pub fn build_box(recipe: &Recipe) -> Result<PowerBox, PowerBoxError> {
    recipe.validate()?;
    let spectrum = SpectrumKind::from_name(&recipe.spectrum, &recipe.spectrum_params)?;
    PowerBox::new(recipe.config.clone(), spectrum.into_fn(), recipe.field_kind()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use powerbox_core::{BoxConfig, FieldKind, PowerSpectrum};
    use serde_json::json;

    #[test]
    fn every_listed_name_constructs() {
        for name in SpectrumKind::list_spectra() {
            let s = SpectrumKind::from_name(name, &json!({})).unwrap();
            assert_eq!(s.name(), *name);
        }
    }

    #[test]
    fn from_name_unknown_returns_error() {
        let result = SpectrumKind::from_name("pink", &json!({}));
        assert!(matches!(result, Err(PowerBoxError::UnknownSpectrum(_))));
    }

    #[test]
    fn delegation_params_and_schema() {
        let s = SpectrumKind::from_name("power-law", &json!({"index": 1.5})).unwrap();
        assert_eq!(s.params()["index"], 1.5);
        assert!(s.param_schema().get("amplitude").is_some());
    }

    #[test]
    fn closure_matches_power() {
        let s = SpectrumKind::from_name("gaussian-peak", &json!({})).unwrap();
        let f = s.into_fn();
        assert_eq!(f.power(9.0), s.power(9.0));
    }

    #[test]
    fn build_box_uses_recipe_model() {
        let mut recipe = Recipe::new("power-law", BoxConfig::new(8), 1);
        recipe.model = "log-normal".into();
        let pb = build_box(&recipe).unwrap();
        assert_eq!(pb.model(), FieldKind::LogNormal);
    }

    #[test]
    fn build_box_rejects_unknown_spectrum() {
        let recipe = Recipe::new("pink", BoxConfig::new(8), 1);
        assert!(matches!(
            build_box(&recipe),
            Err(PowerBoxError::UnknownSpectrum(_))
        ));
    }

    #[test]
    fn determinism_same_recipe() {
        let recipe = Recipe::new("power-law", BoxConfig::new(12), 99);
        let a = build_box(&recipe)
            .unwrap()
            .delta_x(&mut recipe.random_source())
            .unwrap();
        let b = build_box(&recipe)
            .unwrap()
            .delta_x(&mut recipe.random_source())
            .unwrap();
        assert!(a
            .data()
            .iter()
            .zip(b.data().iter())
            .all(|(va, vb)| va.to_bits() == vb.to_bits()));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn power_law_is_non_negative_for_positive_amplitude(
                amplitude in 0.0_f64..100.0,
                index in -3.0_f64..3.0,
                k in 0.01_f64..1000.0,
            ) {
                let s = SpectrumKind::from_name(
                    "power-law",
                    &json!({"amplitude": amplitude, "index": index}),
                ).unwrap();
                prop_assert!(s.power(k) >= 0.0);
            }
        }
    }
}
