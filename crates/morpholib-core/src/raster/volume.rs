//! Raster3D - Volumetric grid of scalar samples
//!
//! Samples are stored plane-major: the voxel at (x, y, z) is at index
//! `(z * height + y) * width + x`.

use super::{Raster2D, min_max};
use crate::error::{Error, Result};
use crate::extent::Extent;
use crate::sample::Sample;

/// Volumetric raster of samples
#[derive(Debug, Clone, PartialEq)]
pub struct Raster3D<T> {
    extent: Extent,
    data: Vec<T>,
}

impl<T: Sample> Raster3D<T> {
    /// Create a new raster with all voxels set to zero
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if any axis is 0.
    pub fn new(width: usize, height: usize, depth: usize) -> Result<Self> {
        Self::new_with_value(width, height, depth, T::zero())
    }

    /// Create a new raster with all voxels set to `value`
    pub fn new_with_value(width: usize, height: usize, depth: usize, value: T) -> Result<Self> {
        let extent = Extent::new_3d(width, height, depth)?;
        Ok(Self {
            extent,
            data: vec![value; extent.len()],
        })
    }

    /// Create a raster from plane-major data
    pub fn from_data(width: usize, height: usize, depth: usize, data: Vec<T>) -> Result<Self> {
        let extent = Extent::new_3d(width, height, depth)?;
        if data.len() != extent.len() {
            return Err(Error::InvalidParameter(format!(
                "data length {} doesn't match {}x{}x{} = {}",
                data.len(),
                width,
                height,
                depth,
                extent.len()
            )));
        }
        Ok(Self { extent, data })
    }

    /// Build a volume from an extent and a matching buffer
    pub fn from_extent(extent: Extent, data: Vec<T>) -> Result<Self> {
        Self::from_data(extent.width, extent.height, extent.depth, data)
    }

    /// Stack planar rasters of equal size along z
    pub fn from_slices(slices: &[Raster2D<T>]) -> Result<Self> {
        let first = slices.first().ok_or_else(|| {
            Error::InvalidParameter("at least one slice is required".to_string())
        })?;
        let (width, height) = first.dimensions();
        let mut data = Vec::with_capacity(width * height * slices.len());
        for slice in slices {
            first.extent().check_same(&slice.extent())?;
            data.extend_from_slice(slice.as_slice());
        }
        Self::from_data(width, height, slices.len(), data)
    }

    /// Create a volume with the same extent, filled with `value`
    pub fn like<U: Sample>(other: &Raster3D<U>, value: T) -> Self {
        Self {
            extent: other.extent,
            data: vec![value; other.extent.len()],
        }
    }

    /// Get the volume width
    #[inline]
    pub fn width(&self) -> usize {
        self.extent.width
    }

    /// Get the volume height
    #[inline]
    pub fn height(&self) -> usize {
        self.extent.height
    }

    /// Get the number of planes
    #[inline]
    pub fn depth(&self) -> usize {
        self.extent.depth
    }

    /// Get the spatial extent
    #[inline]
    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// Get the sample at (x, y, z)
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if coordinates are out of range.
    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> Result<T> {
        if x >= self.extent.width || y >= self.extent.height || z >= self.extent.depth {
            return Err(Error::IndexOutOfBounds {
                index: self.extent.index(x, y, z),
                len: self.data.len(),
            });
        }
        Ok(self.data[self.extent.index(x, y, z)])
    }

    /// Set the sample at (x, y, z)
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, value: T) -> Result<()> {
        if x >= self.extent.width || y >= self.extent.height || z >= self.extent.depth {
            return Err(Error::IndexOutOfBounds {
                index: self.extent.index(x, y, z),
                len: self.data.len(),
            });
        }
        let idx = self.extent.index(x, y, z);
        self.data[idx] = value;
        Ok(())
    }

    /// Get the sample at (x, y, z), panicking if out of range
    #[inline]
    pub fn at(&self, x: usize, y: usize, z: usize) -> T {
        self.data[self.extent.index(x, y, z)]
    }

    /// Samples of one z-plane
    pub fn plane(&self, z: usize) -> Option<&[T]> {
        if z >= self.extent.depth {
            return None;
        }
        let len = self.extent.plane_len();
        Some(&self.data[z * len..(z + 1) * len])
    }

    /// Copy one z-plane out as a planar raster
    pub fn slice(&self, z: usize) -> Result<Raster2D<T>> {
        let plane = self.plane(z).ok_or(Error::IndexOutOfBounds {
            index: z,
            len: self.extent.depth,
        })?;
        Raster2D::from_data(self.extent.width, self.extent.height, plane.to_vec())
    }

    /// Raw samples in plane-major order
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable raw samples in plane-major order
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the volume, returning its samples
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Apply `f` to every voxel, producing a volume of a new type
    pub fn map<U: Sample>(&self, f: impl Fn(T) -> U) -> Raster3D<U> {
        Raster3D {
            extent: self.extent,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Number of foreground (non-zero) voxels
    pub fn count_foreground(&self) -> usize {
        self.data.iter().filter(|v| v.is_foreground()).count()
    }

    /// Minimum and maximum sample values
    pub fn min_max(&self) -> (T, T) {
        min_max(&self.data)
    }
}
