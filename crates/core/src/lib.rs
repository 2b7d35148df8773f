#![deny(unsafe_code)]
//! Core of the powerbox field synthesiser.
//!
//! Realises Gaussian and log-normal random fields on a d-dimensional grid with
//! a prescribed isotropic power spectrum, and Poisson-samples tracer
//! catalogues from them. Provides the `(a, b)` Fourier convention and
//! transforms, the Hermitian draw, the `PowerBox` driver, `FieldModel`
//! strategies, the `Xorshift64`/`RandomSource` randomness, `BoxConfig`,
//! `Recipe`, and parameter helpers.

pub mod config;
pub mod convention;
pub mod dft;
pub mod error;
pub mod field;
pub mod grid;
pub mod hermitian;
pub mod lognormal;
pub mod model;
pub mod params;
pub mod power;
pub mod powerbox;
pub mod prng;
pub mod recipe;
pub mod sample;
pub mod tools;

pub use config::BoxConfig;
pub use convention::FourierConvention;
pub use error::PowerBoxError;
pub use field::{ComplexField, Field};
pub use grid::{BoxGeometry, FrequencyGrid};
pub use model::{list_models, FieldKind, FieldModel, Gaussian, LogNormal};
pub use power::PowerSpectrum;
pub use powerbox::PowerBox;
pub use prng::{DrawSite, RandomSource, Xorshift64};
pub use recipe::Recipe;
pub use sample::{SampleOptions, TracerCatalogue};
pub use tools::{angular_average, get_power, PowerEstimate};
