//! Discrete tracer catalogues drawn from a continuous over-density.
//!
//! Each cell receives `Poisson(λ)` tracers with `λ = (δ + 1) · dx^d · n̄`,
//! placed at the cell coordinate and optionally jittered uniformly within
//! the cell.

use crate::error::PowerBoxError;
use crate::field::Field;
use crate::grid::BoxGeometry;
use crate::prng::{DrawSite, RandomSource};
use rand::distributions::{Distribution, Uniform};
use rand_distr::Poisson;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Placement options for [`discretize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleOptions {
    /// Jitter each tracer uniformly within its cell instead of placing it on
    /// the cell coordinate.
    pub randomise_in_cell: bool,
    /// Shift coordinates by `L/2` so the box spans `[0, L)` rather than
    /// `[-L/2, L/2)`.
    pub min_at_zero: bool,
    /// Keep the catalogue on the box after sampling.
    pub store_pos: bool,
}

impl Default for SampleOptions {
    fn default() -> Self {
        Self {
            randomise_in_cell: true,
            min_at_zero: false,
            store_pos: false,
        }
    }
}

/// Tracer positions plus the per-cell counts they were drawn from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TracerCatalogue {
    dim: usize,
    positions: Vec<f64>,
    counts: Field<u64>,
}

impl TracerCatalogue {
    /// Number of tracers.
    pub fn len(&self) -> usize {
        self.positions.len() / self.dim
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Coordinates of tracer `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.len()`.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.positions[i * self.dim..(i + 1) * self.dim]
    }

    /// Iterates over tracer coordinates.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.positions.chunks_exact(self.dim)
    }

    /// Flat `(len, dim)` row-major coordinates.
    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    /// Tracers drawn per cell.
    pub fn counts(&self) -> &Field<u64> {
        &self.counts
    }
}

/// Poisson intensity per cell, `(δ + 1) · cell_volume · nbar`.
///
/// Fails for a negative or non-finite `nbar`, and for any cell whose
/// intensity is negative or non-finite (an over-density below `-1`).
pub fn tracer_intensity(
    delta_x: &Field,
    cell_volume: f64,
    nbar: f64,
) -> Result<Field, PowerBoxError> {
    if !(nbar.is_finite() && nbar >= 0.0) {
        return Err(PowerBoxError::InvalidMeanDensity(nbar));
    }
    let intensity = delta_x.map(|&d| (d + 1.0) * cell_volume * nbar);
    if let Some((cell, &value)) = intensity
        .data()
        .iter()
        .enumerate()
        .find(|(_, v)| !(v.is_finite() && **v >= 0.0))
    {
        return Err(PowerBoxError::InvalidIntensity { cell, value });
    }
    Ok(intensity)
}

/// One Poisson count per cell from the [`DrawSite::Counts`] stream.
///
/// Zero intensity yields zero without consuming a draw.
pub fn sample_counts(
    intensity: &Field,
    rng: &mut RandomSource,
) -> Result<Field<u64>, PowerBoxError> {
    let stream = rng.stream(DrawSite::Counts);
    let mut counts = Vec::with_capacity(intensity.len());
    for (cell, &lambda) in intensity.data().iter().enumerate() {
        if lambda == 0.0 {
            counts.push(0);
            continue;
        }
        let dist = Poisson::new(lambda)
            .map_err(|_| PowerBoxError::InvalidIntensity { cell, value: lambda })?;
        let draw: f64 = dist.sample(stream);
        counts.push(draw as u64);
    }
    Field::from_data(intensity.side(), intensity.dim(), counts)
}

/// Draws a tracer catalogue from an over-density field laid out on `geometry`.
pub fn discretize(
    delta_x: &Field,
    geometry: &BoxGeometry,
    nbar: f64,
    options: SampleOptions,
    rng: &mut RandomSource,
) -> Result<TracerCatalogue, PowerBoxError> {
    delta_x.check_shape(geometry.side(), geometry.dim())?;
    let dim = geometry.dim();
    let intensity = tracer_intensity(delta_x, geometry.cell_volume(), nbar)?;
    let counts = sample_counts(&intensity, rng)?;

    let coords = geometry.coordinates();
    let mut positions = Vec::new();
    for (idx, &count) in counts.iter_indexed() {
        for _ in 0..count {
            positions.extend(idx.iter().map(|&i| coords[i]));
        }
    }

    if options.randomise_in_cell {
        let jitter = Uniform::new(0.0, geometry.dx());
        let stream = rng.stream(DrawSite::Jitter);
        for p in positions.iter_mut() {
            *p += jitter.sample(stream);
        }
    }
    if options.min_at_zero {
        let shift = geometry.box_length() / 2.0;
        positions.iter_mut().for_each(|p| *p += shift);
    }

    debug!(
        tracers = positions.len() / dim,
        nbar,
        randomise_in_cell = options.randomise_in_cell,
        "drew tracer catalogue"
    );
    Ok(TracerCatalogue {
        dim,
        positions,
        counts,
    })
}
