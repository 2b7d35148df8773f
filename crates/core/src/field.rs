//! Dense hypercubic grids of values.
//!
//! A [`Field`] stores `side^dim` values in row-major order (last axis varies
//! fastest). Real fields (`Field<f64>`) carry densities, powers and wavenumber
//! magnitudes; complex fields ([`ComplexField`]) carry Fourier coefficients.
//!
//! Reversing every axis of a row-major hypercube maps flat index `i` to
//! `len - 1 - i`, which is what the Hermitian machinery relies on.

use crate::error::PowerBoxError;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Complex-valued grid of Fourier coefficients.
pub type ComplexField = Field<Complex64>;

/// A `(side,)^dim` grid stored in row-major order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field<T = f64> {
    side: usize,
    dim: usize,
    data: Vec<T>,
}

/// Number of cells in a `(side,)^dim` grid.
///
/// Returns an error for a zero side or dimension, or if the count overflows.
pub fn cell_count(side: usize, dim: usize) -> Result<usize, PowerBoxError> {
    if side == 0 {
        return Err(PowerBoxError::InvalidSide(side));
    }
    if dim == 0 {
        return Err(PowerBoxError::InvalidDimension(dim));
    }
    let exp = u32::try_from(dim).map_err(|_| PowerBoxError::ShapeOverflow { side, dim })?;
    side.checked_pow(exp)
        .ok_or(PowerBoxError::ShapeOverflow { side, dim })
}

impl<T> Field<T> {
    /// Builds a field from a row-major buffer, validating its length.
    pub fn from_data(side: usize, dim: usize, data: Vec<T>) -> Result<Self, PowerBoxError> {
        let expected = cell_count(side, dim)?;
        if data.len() != expected {
            return Err(PowerBoxError::LengthMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self { side, dim, data })
    }

    /// Builds a field by evaluating `f` at every multi-index in row-major order.
    pub fn from_fn<F>(side: usize, dim: usize, mut f: F) -> Result<Self, PowerBoxError>
    where
        F: FnMut(&[usize]) -> T,
    {
        let len = cell_count(side, dim)?;
        let mut idx = vec![0usize; dim];
        let mut data = Vec::with_capacity(len);
        for _ in 0..len {
            data.push(f(&idx));
            advance(&mut idx, side);
        }
        Ok(Self { side, dim, data })
    }

    /// Cells along each axis.
    pub fn side(&self) -> usize {
        self.side
    }

    /// Number of axes.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false for a constructed field; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The shape as an explicit per-axis list.
    pub fn shape(&self) -> Vec<usize> {
        vec![self.side; self.dim]
    }

    /// Read-only access to the row-major data.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Consumes the field, returning its row-major data.
    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// Flat row-major offset of a multi-index.
    ///
    /// # Panics
    ///
    /// Panics if `idx` has the wrong rank or any component is out of range.
    pub fn flat_index(&self, idx: &[usize]) -> usize {
        assert_eq!(idx.len(), self.dim, "index rank mismatch");
        idx.iter().fold(0, |acc, &i| {
            assert!(i < self.side, "index {i} out of range for side {}", self.side);
            acc * self.side + i
        })
    }

    /// Multi-index of a flat row-major offset.
    pub fn multi_index(&self, flat: usize) -> Vec<usize> {
        let mut idx = vec![0usize; self.dim];
        let mut rest = flat;
        for slot in idx.iter_mut().rev() {
            *slot = rest % self.side;
            rest /= self.side;
        }
        idx
    }

    /// Flat offset of the mirror of `flat` with every axis reversed.
    pub fn reversed_flat(&self, flat: usize) -> usize {
        self.data.len() - 1 - flat
    }

    /// Value at a multi-index.
    pub fn get(&self, idx: &[usize]) -> &T {
        &self.data[self.flat_index(idx)]
    }

    /// Returns a copy of this field with the value at `idx` replaced.
    ///
    /// Consumes `self` so masking chains read as a pipeline of pure updates.
    pub fn with_value_at(mut self, idx: &[usize], value: T) -> Self {
        let flat = self.flat_index(idx);
        self.data[flat] = value;
        self
    }

    /// Applies `f` to every value.
    pub fn map<U, F>(&self, f: F) -> Field<U>
    where
        F: FnMut(&T) -> U,
    {
        Field {
            side: self.side,
            dim: self.dim,
            data: self.data.iter().map(f).collect(),
        }
    }

    /// Element-wise combination of two fields of identical shape.
    pub fn zip_map<U, V, F>(&self, other: &Field<U>, mut f: F) -> Result<Field<V>, PowerBoxError>
    where
        F: FnMut(&T, &U) -> V,
    {
        self.check_same_shape(other)?;
        Ok(Field {
            side: self.side,
            dim: self.dim,
            data: self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(a, b)| f(a, b))
                .collect(),
        })
    }

    /// Fails with [`PowerBoxError::ShapeMismatch`] unless `other` has this shape.
    pub fn check_same_shape<U>(&self, other: &Field<U>) -> Result<(), PowerBoxError> {
        self.check_shape(other.side, other.dim)
    }

    /// Fails with [`PowerBoxError::ShapeMismatch`] unless this field is `(side,)^dim`.
    pub fn check_shape(&self, side: usize, dim: usize) -> Result<(), PowerBoxError> {
        if self.side != side || self.dim != dim {
            return Err(PowerBoxError::ShapeMismatch {
                lhs_side: self.side,
                lhs_dim: self.dim,
                rhs_side: side,
                rhs_dim: dim,
            });
        }
        Ok(())
    }

    /// Iterates over all cells yielding `(multi_index, value)` in row-major order.
    pub fn iter_indexed(&self) -> impl Iterator<Item = (Vec<usize>, &T)> + '_ {
        self.data
            .iter()
            .enumerate()
            .map(|(flat, v)| (self.multi_index(flat), v))
    }
}

impl<T: Clone> Field<T> {
    /// Creates a field with every cell set to `value`.
    pub fn filled(side: usize, dim: usize, value: T) -> Result<Self, PowerBoxError> {
        let len = cell_count(side, dim)?;
        Ok(Self {
            side,
            dim,
            data: vec![value; len],
        })
    }

    /// Drops the last slice along every axis, shrinking the side by one.
    ///
    /// Used to bring odd-sized Hermitian working arrays back to an even
    /// logical size.
    pub fn crop_last(&self) -> Result<Self, PowerBoxError> {
        let side = self.side.saturating_sub(1);
        Field::from_fn(side, self.dim, |idx| self.get(idx).clone())
    }
}

impl Field<f64> {
    /// Arithmetic mean of all cells.
    pub fn mean(&self) -> f64 {
        self.data.iter().sum::<f64>() / self.data.len() as f64
    }

    /// Population variance (divides by `len`, not `len - 1`).
    pub fn variance(&self) -> f64 {
        let mean = self.mean();
        self.data.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / self.data.len() as f64
    }

    /// Smallest value; NaN cells are ignored unless every cell is NaN.
    pub fn min(&self) -> f64 {
        self.data.iter().copied().fold(f64::NAN, f64::min)
    }

    /// Largest value; NaN cells are ignored unless every cell is NaN.
    pub fn max(&self) -> f64 {
        self.data.iter().copied().fold(f64::NAN, f64::max)
    }

    /// Returns a copy with every value below `floor` raised to it.
    pub fn clip_below(&self, floor: f64) -> Field {
        self.map(|&v| if v < floor { floor } else { v })
    }

    /// Lifts a real field into the complex plane.
    pub fn to_complex(&self) -> ComplexField {
        self.map(|&v| Complex64::new(v, 0.0))
    }

    /// True when no cell is NaN or infinite.
    pub fn all_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }
}

impl ComplexField {
    /// Real part of every cell.
    pub fn re(&self) -> Field {
        self.map(|z| z.re)
    }

    /// Imaginary part of every cell.
    pub fn im(&self) -> Field {
        self.map(|z| z.im)
    }

    /// Modulus of every cell.
    pub fn abs(&self) -> Field {
        self.map(|z| z.norm())
    }

    /// Largest absolute imaginary component.
    pub fn max_abs_im(&self) -> f64 {
        self.data.iter().map(|z| z.im.abs()).fold(0.0, f64::max)
    }
}

/// Row-major odometer increment.
fn advance(idx: &mut [usize], side: usize) {
    for slot in idx.iter_mut().rev() {
        *slot += 1;
        if *slot < side {
            return;
        }
        *slot = 0;
    }
}
