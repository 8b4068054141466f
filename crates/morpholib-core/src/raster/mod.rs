//! Raster2D - Planar grid of scalar samples
//!
//! `Raster2D<T>` is a 2D array of samples stored row-major with no padding.
//! The cell at (x, y) is at index `y * width + x`. Engines never mutate an
//! input raster; they allocate and return a new raster of the same extent.
//!
//! See [`Raster3D`] for the volumetric counterpart.
//!
//! # Examples
//!
//! ```
//! use morpholib_core::Raster2D;
//!
//! let mut raster = Raster2D::<u8>::new(10, 8).unwrap();
//! raster.set(3, 4, 255).unwrap();
//! assert_eq!(raster.get(3, 4).unwrap(), 255);
//! assert_eq!(raster.count_foreground(), 1);
//! ```

mod volume;

pub use volume::Raster3D;

use crate::error::{Error, Result};
use crate::extent::Extent;
use crate::sample::Sample;

/// Planar raster of samples
#[derive(Debug, Clone, PartialEq)]
pub struct Raster2D<T> {
    extent: Extent,
    data: Vec<T>,
}

impl<T: Sample> Raster2D<T> {
    /// Create a new raster with all cells set to zero
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        Self::new_with_value(width, height, T::zero())
    }

    /// Create a new raster with all cells set to `value`
    pub fn new_with_value(width: usize, height: usize, value: T) -> Result<Self> {
        let extent = Extent::new_2d(width, height)?;
        Ok(Self {
            extent,
            data: vec![value; extent.len()],
        })
    }

    /// Create a raster from row-major data
    ///
    /// # Errors
    ///
    /// Returns an error if a dimension is zero or the data length doesn't
    /// match `width * height`.
    pub fn from_data(width: usize, height: usize, data: Vec<T>) -> Result<Self> {
        let extent = Extent::new_2d(width, height)?;
        if data.len() != extent.len() {
            return Err(Error::InvalidParameter(format!(
                "data length {} doesn't match {}x{} = {}",
                data.len(),
                width,
                height,
                extent.len()
            )));
        }
        Ok(Self { extent, data })
    }

    /// Create a raster from rows of equal length
    pub fn from_rows(rows: &[&[T]]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        if rows.iter().any(|r| r.len() != width) {
            return Err(Error::InvalidParameter(
                "all rows must have the same length".to_string(),
            ));
        }
        let data = rows.iter().flat_map(|r| r.iter().copied()).collect();
        Self::from_data(width, height, data)
    }

    /// Create a raster with the same extent, filled with `value`
    pub fn like<U: Sample>(other: &Raster2D<U>, value: T) -> Self {
        Self {
            extent: other.extent,
            data: vec![value; other.extent.len()],
        }
    }

    /// Wrap a flat buffer whose length is already known to match `extent`
    pub(crate) fn from_parts(extent: Extent, data: Vec<T>) -> Self {
        debug_assert_eq!(extent.len(), data.len());
        Self { extent, data }
    }

    /// Build a planar raster from an extent with `depth == 1` and a buffer
    ///
    /// # Errors
    ///
    /// Returns an error if the extent is not planar or the buffer length
    /// disagrees with it.
    pub fn from_extent(extent: Extent, data: Vec<T>) -> Result<Self> {
        if !extent.is_planar() {
            return Err(Error::InvalidParameter(format!(
                "extent depth {} is not planar",
                extent.depth
            )));
        }
        Self::from_data(extent.width, extent.height, data)
    }

    /// Get the raster width
    #[inline]
    pub fn width(&self) -> usize {
        self.extent.width
    }

    /// Get the raster height
    #[inline]
    pub fn height(&self) -> usize {
        self.extent.height
    }

    /// Get the dimensions as (width, height)
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.extent.width, self.extent.height)
    }

    /// Get the spatial extent (depth is 1)
    #[inline]
    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// Get the sample at (x, y)
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if coordinates are out of range.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Result<T> {
        if x >= self.extent.width || y >= self.extent.height {
            return Err(Error::IndexOutOfBounds {
                index: y * self.extent.width + x,
                len: self.data.len(),
            });
        }
        Ok(self.data[y * self.extent.width + x])
    }

    /// Set the sample at (x, y)
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if coordinates are out of range.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) -> Result<()> {
        if x >= self.extent.width || y >= self.extent.height {
            return Err(Error::IndexOutOfBounds {
                index: y * self.extent.width + x,
                len: self.data.len(),
            });
        }
        let idx = y * self.extent.width + x;
        self.data[idx] = value;
        Ok(())
    }

    /// Get the sample at (x, y), panicking if out of range
    #[inline]
    pub fn at(&self, x: usize, y: usize) -> T {
        self.data[y * self.extent.width + x]
    }

    /// Get a row as a slice
    pub fn row(&self, y: usize) -> Option<&[T]> {
        if y >= self.extent.height {
            return None;
        }
        let start = y * self.extent.width;
        Some(&self.data[start..start + self.extent.width])
    }

    /// Raw samples in row-major order
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable raw samples in row-major order
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the raster, returning its samples
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Apply `f` to every sample, producing a raster of a new type
    pub fn map<U: Sample>(&self, f: impl Fn(T) -> U) -> Raster2D<U> {
        Raster2D::from_parts(self.extent, self.data.iter().map(|&v| f(v)).collect())
    }

    /// Number of foreground (non-zero) cells
    pub fn count_foreground(&self) -> usize {
        self.data.iter().filter(|v| v.is_foreground()).count()
    }

    /// Minimum and maximum sample values
    pub fn min_max(&self) -> (T, T) {
        min_max(&self.data)
    }
}

/// Minimum and maximum of a non-empty slice (ignores incomparable values)
pub(crate) fn min_max<T: Sample>(data: &[T]) -> (T, T) {
    let mut lo = data[0];
    let mut hi = data[0];
    for &v in &data[1..] {
        if v < lo {
            lo = v;
        }
        if v > hi {
            hi = v;
        }
    }
    (lo, hi)
}
