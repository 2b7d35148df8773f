//! The [`PowerBox`]: a configured box that realises random fields with a
//! given power spectrum.

use crate::config::BoxConfig;
use crate::dft::inverse;
use crate::error::PowerBoxError;
use crate::field::{ComplexField, Field};
use crate::grid::{BoxGeometry, FrequencyGrid};
use crate::hermitian;
use crate::lognormal;
use crate::model::{FieldKind, FieldModel};
use crate::power::{self, PowerSpectrum};
use crate::prng::RandomSource;
use crate::sample::{self, SampleOptions, TracerCatalogue};
use std::fmt;
use tracing::{debug, warn};

/// A box of `N^d` cells that realises fields with a fixed isotropic spectrum.
///
/// Geometry, frequency grid and wavenumber magnitudes are computed once at
/// construction. Every realisation draws fresh randomness from the
/// [`RandomSource`] it is given and returns a new array; the box itself only
/// changes when a tracer catalogue is stored.
pub struct PowerBox {
    config: BoxConfig,
    geometry: BoxGeometry,
    grid: FrequencyGrid,
    k: Field,
    spectrum: Box<dyn PowerSpectrum>,
    model: FieldKind,
    tracer_positions: Option<TracerCatalogue>,
}

impl fmt::Debug for PowerBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PowerBox")
            .field("config", &self.config)
            .field("model", &self.model)
            .field("tracers", &self.tracer_positions.as_ref().map(|t| t.len()))
            .finish_non_exhaustive()
    }
}

impl PowerBox {
    /// Builds a box, failing fast on an invalid configuration.
    pub fn new<P>(config: BoxConfig, spectrum: P, model: FieldKind) -> Result<Self, PowerBoxError>
    where
        P: PowerSpectrum + 'static,
    {
        let geometry = config.geometry()?;
        let grid = FrequencyGrid::new(&geometry, config.convention()?)?;
        Self::assemble(config, geometry, grid, Box::new(spectrum), model)
    }

    /// Gaussian box.
    pub fn gaussian<P>(config: BoxConfig, spectrum: P) -> Result<Self, PowerBoxError>
    where
        P: PowerSpectrum + 'static,
    {
        Self::new(config, spectrum, FieldKind::Gaussian)
    }

    /// Log-normal box.
    pub fn log_normal<P>(config: BoxConfig, spectrum: P) -> Result<Self, PowerBoxError>
    where
        P: PowerSpectrum + 'static,
    {
        Self::new(config, spectrum, FieldKind::LogNormal)
    }

    /// Builds a box around a precomputed frequency grid.
    ///
    /// The grid must have the configured side, dimension, cell width and
    /// convention. Only its left edge may differ from the one `new` builds.
    pub fn with_frequency_grid<P>(
        config: BoxConfig,
        spectrum: P,
        model: FieldKind,
        grid: FrequencyGrid,
    ) -> Result<Self, PowerBoxError>
    where
        P: PowerSpectrum + 'static,
    {
        let geometry = config.geometry()?;
        if grid.side() != geometry.side() || grid.dim() != geometry.dim() {
            return Err(PowerBoxError::ShapeMismatch {
                lhs_side: grid.side(),
                lhs_dim: grid.dim(),
                rhs_side: geometry.side(),
                rhs_dim: geometry.dim(),
            });
        }
        if grid.dx() != geometry.dx() {
            return Err(PowerBoxError::GridMismatch(format!(
                "cell width {} vs {}",
                grid.dx(),
                geometry.dx()
            )));
        }
        let convention = config.convention()?;
        if grid.convention() != convention {
            return Err(PowerBoxError::GridMismatch(format!(
                "convention (a = {}, b = {}) vs (a = {}, b = {})",
                grid.convention().a,
                grid.convention().b,
                convention.a,
                convention.b
            )));
        }
        Self::assemble(config, geometry, grid, Box::new(spectrum), model)
    }

    fn assemble(
        config: BoxConfig,
        geometry: BoxGeometry,
        grid: FrequencyGrid,
        spectrum: Box<dyn PowerSpectrum>,
        model: FieldKind,
    ) -> Result<Self, PowerBoxError> {
        let k = grid.k()?;
        debug!(
            n = geometry.side(),
            dim = geometry.dim(),
            box_length = geometry.box_length(),
            model = model.name(),
            "built power box"
        );
        Ok(Self {
            config,
            geometry,
            grid,
            k,
            spectrum,
            model,
            tracer_positions: None,
        })
    }

    pub fn config(&self) -> &BoxConfig {
        &self.config
    }

    pub fn geometry(&self) -> &BoxGeometry {
        &self.geometry
    }

    pub fn grid(&self) -> &FrequencyGrid {
        &self.grid
    }

    pub fn model(&self) -> FieldKind {
        self.model
    }

    /// Box volume `L^d`.
    pub fn volume(&self) -> f64 {
        self.geometry.volume()
    }

    /// Index of the zero-wavenumber cell.
    pub fn monopole_index(&self) -> Vec<usize> {
        self.geometry.monopole_index()
    }

    /// Wavenumber magnitude at every grid point.
    pub fn k(&self) -> &Field {
        &self.k
    }

    /// Wavenumbers along one side.
    pub fn kvec(&self) -> &[f64] {
        &self.grid.frequencies()[0]
    }

    /// Per-axis wavenumbers.
    pub fn frequencies(&self) -> &[Vec<f64>] {
        self.grid.frequencies()
    }

    /// Cell coordinates along one side, `-L/2 + j dx`.
    pub fn x(&self) -> Vec<f64> {
        self.geometry.coordinates()
    }

    /// Distance from the origin at every grid point.
    pub fn r(&self) -> Result<Field, PowerBoxError> {
        self.grid.r()
    }

    /// The spectrum as the box uses it: divided by the volume when
    /// `vol_normalised_power` is set.
    pub fn pk(&self, k: f64) -> f64 {
        let p = self.spectrum.power(k);
        if self.config.vol_normalised_power {
            p / self.volume()
        } else {
            p
        }
    }

    /// [`pk`](Self::pk) on the magnitude grid, zero at the monopole.
    pub fn power_array(&self) -> Field {
        power::power_array(&self.k, &self.monopole_index(), |k| self.pk(k))
    }

    /// A fresh unit-variance Hermitian draw of output shape.
    pub fn gauss_hermitian(&self, rng: &mut RandomSource) -> Result<ComplexField, PowerBoxError> {
        hermitian::gauss_hermitian(&self.geometry, rng)
    }

    /// A realisation of the Fourier coefficients of the Gaussian field that
    /// underlies this box's model.
    pub fn delta_k(&self, rng: &mut RandomSource) -> Result<ComplexField, PowerBoxError> {
        let amplitude = self.model.amplitude(self)?;
        let draw = self.gauss_hermitian(rng)?;
        draw.zip_map(&amplitude, |z, &a| z * a)
    }

    /// A real-space over-density realisation.
    pub fn delta_x(&self, rng: &mut RandomSource) -> Result<Field, PowerBoxError> {
        let delta_k = self.delta_k(rng)?;
        let delta_x = self.model.field_from_gaussian(self, &delta_k)?;
        if !delta_x.all_finite() {
            warn!(
                model = self.model.name(),
                "realisation contains non-finite values; check the spectrum is non-negative"
            );
        }
        debug!(
            mean = delta_x.mean(),
            variance = delta_x.variance(),
            "realised field"
        );
        Ok(delta_x)
    }

    /// Correlation function of [`power_array`](Self::power_array).
    pub fn correlation_array(&self) -> Result<Field, PowerBoxError> {
        lognormal::correlation_array(&self.power_array(), &self.grid, self.volume())
    }

    /// Correlation a Gaussian field needs to log-normally map onto this
    /// box's spectrum.
    pub fn gaussian_correlation_array(&self) -> Result<Field, PowerBoxError> {
        Ok(lognormal::gaussian_correlation_array(
            &self.correlation_array()?,
        ))
    }

    /// Power of the Gaussian field behind a log-normal realisation.
    pub fn gaussian_power_array(&self) -> Result<Field, PowerBoxError> {
        lognormal::gaussian_power_array(
            &self.gaussian_correlation_array()?,
            &self.grid,
            &self.monopole_index(),
        )
    }

    /// Realises a field and Poisson-samples a tracer catalogue from it with
    /// mean density `nbar` per unit volume.
    pub fn create_discrete_sample(
        &mut self,
        nbar: f64,
        options: SampleOptions,
        rng: &mut RandomSource,
    ) -> Result<TracerCatalogue, PowerBoxError> {
        let delta_x = self.delta_x(rng)?;
        let catalogue = sample::discretize(&delta_x, &self.geometry, nbar, options, rng)?;
        if options.store_pos {
            self.tracer_positions = Some(catalogue.clone());
        }
        Ok(catalogue)
    }

    /// The last catalogue sampled with `store_pos` set.
    pub fn tracer_positions(&self) -> Option<&TracerCatalogue> {
        self.tracer_positions.as_ref()
    }

    /// Inverse transform on this box's grid.
    pub fn inverse(&self, field: &ComplexField) -> Result<ComplexField, PowerBoxError> {
        inverse(field, &self.grid)
    }
}
