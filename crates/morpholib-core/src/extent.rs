//! Spatial extent shared by 2D and 3D rasters
//!
//! A 2D raster has `depth == 1`. Engines are written once against
//! [`Extent`] and flat sample slices; x varies fastest, then y, then z.

use crate::error::{Error, Result};

/// Size of a raster along each axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Extent {
    /// Number of columns
    pub width: usize,
    /// Number of rows
    pub height: usize,
    /// Number of planes (1 for 2D rasters)
    pub depth: usize,
}

impl Extent {
    /// Create a 2D extent
    pub fn new_2d(width: usize, height: usize) -> Result<Self> {
        Self::new_3d(width, height, 1)
    }

    /// Create a 3D extent
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if any axis is zero.
    pub fn new_3d(width: usize, height: usize, depth: usize) -> Result<Self> {
        if width == 0 || height == 0 || depth == 0 {
            return Err(Error::InvalidDimension {
                width,
                height,
                depth,
            });
        }
        Ok(Self {
            width,
            height,
            depth,
        })
    }

    /// Total number of cells
    #[inline]
    pub fn len(&self) -> usize {
        self.width * self.height * self.depth
    }

    /// Always false; a valid extent has at least one cell
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of cells in one z-plane
    #[inline]
    pub fn plane_len(&self) -> usize {
        self.width * self.height
    }

    /// Whether this extent describes a single plane
    #[inline]
    pub fn is_planar(&self) -> bool {
        self.depth == 1
    }

    /// Dimensions as a `(width, height, depth)` tuple
    #[inline]
    pub fn as_tuple(&self) -> (usize, usize, usize) {
        (self.width, self.height, self.depth)
    }

    /// Linear index of `(x, y, z)`; the caller guarantees containment
    #[inline]
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        (z * self.height + y) * self.width + x
    }

    /// Coordinates of a linear index
    #[inline]
    pub fn coords(&self, index: usize) -> (usize, usize, usize) {
        let plane = self.plane_len();
        let z = index / plane;
        let rem = index % plane;
        (rem % self.width, rem / self.width, z)
    }

    /// Whether signed coordinates fall inside the extent
    #[inline]
    pub fn contains(&self, x: isize, y: isize, z: isize) -> bool {
        x >= 0
            && y >= 0
            && z >= 0
            && (x as usize) < self.width
            && (y as usize) < self.height
            && (z as usize) < self.depth
    }

    /// Linear index of the cell at `cell` shifted by `shift`, or `None` if
    /// the shifted cell lies outside the extent.
    #[inline]
    pub fn shifted_index(
        &self,
        (x, y, z): (usize, usize, usize),
        (dx, dy, dz): (isize, isize, isize),
    ) -> Option<usize> {
        let nx = x as isize + dx;
        let ny = y as isize + dy;
        let nz = z as isize + dz;
        self.contains(nx, ny, nz)
            .then(|| self.index(nx as usize, ny as usize, nz as usize))
    }

    /// Fail with [`Error::DimensionMismatch`] unless `other` equals `self`
    pub fn check_same(&self, other: &Extent) -> Result<()> {
        if self != other {
            return Err(Error::DimensionMismatch {
                expected: self.as_tuple(),
                actual: other.as_tuple(),
            });
        }
        Ok(())
    }
}
