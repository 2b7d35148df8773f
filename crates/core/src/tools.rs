//! Binned estimates of realised fields.

use crate::dft::forward_real;
use crate::error::PowerBoxError;
use crate::field::Field;
use crate::grid::FrequencyGrid;
use serde::{Deserialize, Serialize};

/// Values averaged into linear bins of a coordinate.
///
/// Only non-empty bins are reported, in increasing order of `k`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerEstimate {
    /// Bin centres.
    pub k: Vec<f64>,
    /// Mean value per bin.
    pub power: Vec<f64>,
    /// Cells per bin.
    pub counts: Vec<usize>,
}

impl PowerEstimate {
    pub fn len(&self) -> usize {
        self.k.len()
    }

    pub fn is_empty(&self) -> bool {
        self.k.is_empty()
    }
}

/// Averages `field` in `bins` equal-width bins of `coords` spanning its
/// finite range. Cells whose coordinate is not finite are skipped.
pub fn angular_average(
    field: &Field,
    coords: &Field,
    bins: usize,
) -> Result<PowerEstimate, PowerBoxError> {
    if bins == 0 {
        return Err(PowerBoxError::InvalidBinCount);
    }
    field.check_same_shape(coords)?;

    let (lo, hi) = coords
        .data()
        .iter()
        .filter(|c| c.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &c| {
            (lo.min(c), hi.max(c))
        });
    if lo > hi {
        return Ok(PowerEstimate {
            k: Vec::new(),
            power: Vec::new(),
            counts: Vec::new(),
        });
    }
    let width = (hi - lo) / bins as f64;

    let mut sums = vec![0.0; bins];
    let mut counts = vec![0usize; bins];
    for (&value, &c) in field.data().iter().zip(coords.data()) {
        if !c.is_finite() {
            continue;
        }
        let bin = if width > 0.0 {
            (((c - lo) / width) as usize).min(bins - 1)
        } else {
            0
        };
        sums[bin] += value;
        counts[bin] += 1;
    }

    let mut estimate = PowerEstimate {
        k: Vec::new(),
        power: Vec::new(),
        counts: Vec::new(),
    };
    for (i, (&sum, &count)) in sums.iter().zip(&counts).enumerate() {
        if count == 0 {
            continue;
        }
        estimate.k.push(lo + (i as f64 + 0.5) * width);
        estimate.power.push(sum / count as f64);
        estimate.counts.push(count);
    }
    Ok(estimate)
}

/// Estimates the isotropic power spectrum of a real field:
/// `|forward(delta_x)|² / V` averaged in `bins` linear bins of `|k|`.
pub fn get_power(
    delta_x: &Field,
    grid: &FrequencyGrid,
    bins: usize,
) -> Result<PowerEstimate, PowerBoxError> {
    let volume = (grid.dx() * grid.side() as f64).powf(grid.dim() as f64);
    let ft = forward_real(delta_x, grid)?;
    let power = ft.map(|z| z.norm_sqr() / volume);
    angular_average(&power, &grid.k()?, bins)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convention::FourierConvention;
    use crate::grid::BoxGeometry;

    #[test]
    fn zero_bins_is_an_error() {
        let f = Field::filled(3, 1, 1.0).unwrap();
        assert!(matches!(
            angular_average(&f, &f, 0),
            Err(PowerBoxError::InvalidBinCount)
        ));
    }

    #[test]
    fn averages_by_coordinate() {
        let values = Field::from_data(4, 1, vec![1.0, 3.0, 10.0, 20.0]).unwrap();
        let coords = Field::from_data(4, 1, vec![0.0, 0.5, 3.5, 4.0]).unwrap();
        let est = angular_average(&values, &coords, 2).unwrap();
        assert_eq!(est.counts, vec![2, 2]);
        assert_eq!(est.power, vec![2.0, 15.0]);
        assert_eq!(est.k, vec![1.0, 3.0]);
    }

    #[test]
    fn empty_bins_are_skipped() {
        let values = Field::from_data(2, 1, vec![1.0, 2.0]).unwrap();
        let coords = Field::from_data(2, 1, vec![0.0, 10.0]).unwrap();
        let est = angular_average(&values, &coords, 5).unwrap();
        assert_eq!(est.len(), 2);
        assert_eq!(est.counts, vec![1, 1]);
    }

    #[test]
    fn constant_coordinate_uses_single_bin() {
        let values = Field::from_data(2, 1, vec![1.0, 3.0]).unwrap();
        let coords = Field::filled(2, 1, 5.0).unwrap();
        let est = angular_average(&values, &coords, 4).unwrap();
        assert_eq!(est.power, vec![2.0]);
        assert_eq!(est.k, vec![5.0]);
    }

    #[test]
    fn mismatched_shapes_are_rejected() {
        let a = Field::filled(3, 1, 0.0).unwrap();
        let b = Field::filled(4, 1, 0.0).unwrap();
        assert!(angular_average(&a, &b, 2).is_err());
    }

    #[test]
    fn power_of_zero_field_is_zero() {
        let geometry = BoxGeometry::new(6, 2, 3.0).unwrap();
        let grid = FrequencyGrid::new(&geometry, FourierConvention::cosmology()).unwrap();
        let est = get_power(&Field::filled(6, 2, 0.0).unwrap(), &grid, 4).unwrap();
        assert!(est.power.iter().all(|&p| p == 0.0));
        assert_eq!(est.counts.iter().sum::<usize>(), 36);
    }

    #[test]
    fn bin_centres_are_within_k_range() {
        let geometry = BoxGeometry::new(7, 2, 1.0).unwrap();
        let grid = FrequencyGrid::new(&geometry, FourierConvention::cosmology()).unwrap();
        let field = Field::from_fn(7, 2, |idx| (idx[0] as f64).sin()).unwrap();
        let est = get_power(&field, &grid, 5).unwrap();
        let k_max = grid.k().unwrap().max();
        assert!(est.k.iter().all(|&k| k > 0.0 && k < k_max));
    }
}
