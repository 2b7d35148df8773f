//! Error types for the powerbox core.

use thiserror::Error;

/// Errors produced while configuring a box or realising a field from it.
#[derive(Debug, Error)]
pub enum PowerBoxError {
    /// The grid side count was too small to hold a field.
    #[error("invalid grid side {0}: must be at least 2")]
    InvalidSide(usize),

    /// The number of dimensions was zero.
    #[error("invalid dimension {0}: must be at least 1")]
    InvalidDimension(usize),

    /// The physical side length was not a positive finite number.
    #[error("invalid box length {0}: must be positive and finite")]
    InvalidBoxLength(f64),

    /// The Fourier convention `(a, b)` cannot define a transform pair.
    #[error("invalid Fourier convention (a = {a}, b = {b}): a must be finite, b finite and non-zero")]
    InvalidConvention { a: f64, b: f64 },

    /// `side^dim` does not fit in `usize`.
    #[error("grid of side {side} in {dim} dimensions overflows usize")]
    ShapeOverflow { side: usize, dim: usize },

    /// A flat data buffer did not match the requested shape.
    #[error("length mismatch: expected {expected} values, got {got}")]
    LengthMismatch { expected: usize, got: usize },

    /// Two grids had incompatible shapes for an element-wise operation or transform.
    #[error("shape mismatch: ({lhs_side},)^{lhs_dim} vs ({rhs_side},)^{rhs_dim}")]
    ShapeMismatch {
        lhs_side: usize,
        lhs_dim: usize,
        rhs_side: usize,
        rhs_dim: usize,
    },

    /// A supplied frequency grid was built for a different box or convention.
    #[error("frequency grid does not match the box: {0}")]
    GridMismatch(String),

    /// A tracer mean density was negative or non-finite.
    #[error("invalid mean density {0}: must be non-negative and finite")]
    InvalidMeanDensity(f64),

    /// A Poisson intensity was negative or non-finite, which happens when the
    /// over-density field drops below -1.
    #[error("invalid Poisson intensity {value} in cell {cell}: field is unphysical (< -1) there")]
    InvalidIntensity { cell: usize, value: f64 },

    /// A binned estimate was requested with zero bins.
    #[error("bin count must be at least 1")]
    InvalidBinCount,

    /// A configuration key existed but had the wrong JSON type.
    #[error("parameter type mismatch for '{name}': expected {expected}, got {got}")]
    ParamTypeMismatch {
        name: String,
        expected: String,
        got: String,
    },

    /// A model parameter had the right type but an unusable value.
    #[error("invalid value {value} for parameter '{name}'")]
    InvalidParameter { name: String, value: f64 },

    /// A spectrum name was not recognised by the registry.
    #[error("unknown power spectrum: {0}")]
    UnknownSpectrum(String),

    /// A field model name was not recognised.
    #[error("unknown field model: {0}")]
    UnknownModel(String),

    /// Reading or writing an artefact failed.
    #[error("I/O error: {0}")]
    Io(String),
}
