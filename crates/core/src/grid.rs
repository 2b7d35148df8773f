//! Box geometry and the frequency grid derived from it.
//!
//! [`BoxGeometry`] holds the validated real-space layout: `N` cells of width
//! `dx = L / N` along each of `d` axes. Hermitian working arrays need a true
//! centre to mirror around, so an even `N` works on an odd helper side
//! `n = N + 1` and crops back afterwards.
//!
//! [`FrequencyGrid`] holds everything the transforms need for that layout
//! under a given [`FourierConvention`]: per-axis wavenumbers in centred
//! order, per-axis real-space sample positions, and the left edge that sets
//! the phase origin.

use crate::convention::FourierConvention;
use crate::error::PowerBoxError;
use crate::field::{cell_count, Field};
use num_complex::Complex64;

/// Validated real-space layout of a box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxGeometry {
    side: usize,
    dim: usize,
    box_length: f64,
}

impl BoxGeometry {
    /// Creates a geometry of `side` cells per axis over `dim` axes of length `box_length`.
    ///
    /// Fails fast for `side < 2`, `dim == 0`, a non-positive or non-finite
    /// length, or a helper grid whose cell count overflows `usize`.
    pub fn new(side: usize, dim: usize, box_length: f64) -> Result<Self, PowerBoxError> {
        if side < 2 {
            return Err(PowerBoxError::InvalidSide(side));
        }
        if dim == 0 {
            return Err(PowerBoxError::InvalidDimension(dim));
        }
        if !(box_length.is_finite() && box_length > 0.0) {
            return Err(PowerBoxError::InvalidBoxLength(box_length));
        }
        let geometry = Self {
            side,
            dim,
            box_length,
        };
        cell_count(geometry.helper_side(), dim)?;
        Ok(geometry)
    }

    /// Cells per axis of the output field (`N`).
    pub fn side(&self) -> usize {
        self.side
    }

    /// Number of axes (`d`).
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Physical side length (`L`).
    pub fn box_length(&self) -> f64 {
        self.box_length
    }

    /// Whether `N` is even.
    pub fn is_even(&self) -> bool {
        self.side % 2 == 0
    }

    /// Odd side of the Hermitian working arrays: `N + 1` if even, else `N`.
    pub fn helper_side(&self) -> usize {
        if self.is_even() {
            self.side + 1
        } else {
            self.side
        }
    }

    /// Cell width `L / N`.
    pub fn dx(&self) -> f64 {
        self.box_length / self.side as f64
    }

    /// Box volume `L^d`.
    pub fn volume(&self) -> f64 {
        self.box_length.powf(self.dim as f64)
    }

    /// Cell volume `dx^d`.
    pub fn cell_volume(&self) -> f64 {
        self.dx().powf(self.dim as f64)
    }

    /// The monopole (k = 0) multi-index, `(n / 2,)^d`.
    ///
    /// The helper side is odd, so this is the self-mirrored centre of the
    /// working array and, since `n / 2 == N / 2`, also the zero-frequency
    /// index of the cropped output grid.
    pub fn monopole_index(&self) -> Vec<usize> {
        vec![self.helper_side() / 2; self.dim]
    }

    /// Cell coordinates along a side, centred on the origin: `-L/2 + j dx`.
    pub fn coordinates(&self) -> Vec<f64> {
        let dx = self.dx();
        let left = -self.box_length / 2.0;
        (0..self.side).map(|j| left + j as f64 * dx).collect()
    }
}

/// Per-axis frequencies, positions and phase origin for one box and convention.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyGrid {
    side: usize,
    dim: usize,
    convention: FourierConvention,
    dx: f64,
    dk: f64,
    frequencies: Vec<Vec<f64>>,
    positions: Vec<Vec<f64>>,
    left_edge: Vec<f64>,
}

impl FrequencyGrid {
    /// Builds the grid for `geometry` under `convention`, with the phase
    /// origin at the box centre (left edge `-L/2` on every axis).
    pub fn new(
        geometry: &BoxGeometry,
        convention: FourierConvention,
    ) -> Result<Self, PowerBoxError> {
        convention.validate()?;
        let side = geometry.side();
        let dim = geometry.dim();
        let dx = geometry.dx();
        let dk = convention.k_extent(dx) / side as f64;
        let axis_freqs = convention.fftfreq(side, dx);
        let axis_positions = geometry.coordinates();
        Ok(Self {
            side,
            dim,
            convention,
            dx,
            dk,
            frequencies: vec![axis_freqs; dim],
            positions: vec![axis_positions; dim],
            left_edge: vec![-geometry.box_length() / 2.0; dim],
        })
    }

    /// Moves the phase origin so that sample `j` on axis `i` sits at
    /// `left_edge[i] + j dx`.
    pub fn with_left_edge(mut self, left_edge: Vec<f64>) -> Result<Self, PowerBoxError> {
        if left_edge.len() != self.dim {
            return Err(PowerBoxError::LengthMismatch {
                expected: self.dim,
                got: left_edge.len(),
            });
        }
        let dx = self.dx;
        self.positions = left_edge
            .iter()
            .map(|&edge| (0..self.side).map(|j| edge + j as f64 * dx).collect())
            .collect();
        self.left_edge = left_edge;
        Ok(self)
    }

    /// Cells per axis.
    pub fn side(&self) -> usize {
        self.side
    }

    /// Number of axes.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// The convention the frequencies were built under.
    pub fn convention(&self) -> FourierConvention {
        self.convention
    }

    /// Real-space cell width.
    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Wavenumber spacing `2π / (L b)`; negative when `b` is.
    pub fn dk(&self) -> f64 {
        self.dk
    }

    /// Per-axis wavenumbers in centred order.
    pub fn frequencies(&self) -> &[Vec<f64>] {
        &self.frequencies
    }

    /// Per-axis real-space sample positions.
    pub fn positions(&self) -> &[Vec<f64>] {
        &self.positions
    }

    /// Per-axis phase origin.
    pub fn left_edge(&self) -> &[f64] {
        &self.left_edge
    }

    /// Real-space cell volume `dx^d`.
    pub fn x_cell_volume(&self) -> f64 {
        self.dx.powf(self.dim as f64)
    }

    /// Fourier-space cell volume `|dk|^d`.
    pub fn k_cell_volume(&self) -> f64 {
        self.dk.abs().powf(self.dim as f64)
    }

    /// Wavenumber magnitude `|k|` at every grid point.
    pub fn k(&self) -> Result<Field, PowerBoxError> {
        magnitude_grid(&self.frequencies, self.side)
    }

    /// Distance from the origin at every grid point.
    pub fn r(&self) -> Result<Field, PowerBoxError> {
        magnitude_grid(&self.positions, self.side)
    }

    /// Per-axis phase factors `exp(sign · i b k x0)`.
    pub(crate) fn phase_factors(&self, sign: f64) -> Vec<Vec<Complex64>> {
        let b = self.convention.b;
        self.frequencies
            .iter()
            .zip(self.left_edge.iter())
            .map(|(freqs, &edge)| {
                freqs
                    .iter()
                    .map(|&k| Complex64::from_polar(1.0, sign * b * k * edge))
                    .collect()
            })
            .collect()
    }

    /// Fails unless `field` has this grid's shape.
    pub fn check_field<T>(&self, field: &Field<T>) -> Result<(), PowerBoxError> {
        field.check_shape(self.side, self.dim)
    }
}

/// Euclidean norm over per-axis components at every grid point.
fn magnitude_grid(axes: &[Vec<f64>], side: usize) -> Result<Field, PowerBoxError> {
    Field::from_fn(side, axes.len(), |idx| {
        idx.iter()
            .zip(axes)
            .map(|(&i, axis)| axis[i] * axis[i])
            .sum::<f64>()
            .sqrt()
    })
}
