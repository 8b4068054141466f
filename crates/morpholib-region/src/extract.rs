//! Sorted cell extraction
//!
//! The watershed floods cells in ascending relief order. This module
//! collects the in-scope cells (inside the optional mask and inside the
//! level range) and sorts them by value. The sort is stable, so cells of
//! equal value keep raster scan order.
//!
//! Volumetric rasters are extracted one z-slice per rayon task and the
//! per-slice lists are concatenated in slice order before sorting, so the
//! result does not depend on the thread count.
//!
//! # Examples
//!
//! ```
//! use morpholib_core::Raster2D;
//! use morpholib_region::extract_sorted_cells_2d;
//!
//! let relief = Raster2D::<u8>::from_rows(&[&[5, 1, 9], &[1, 7, 3]]).unwrap();
//! let cells = extract_sorted_cells_2d::<u8, u8>(&relief, None, 0, 7).unwrap();
//!
//! let values: Vec<u8> = cells.iter().map(|c| c.value).collect();
//! assert_eq!(values, vec![1, 1, 3, 5, 7]);
//! assert_eq!((cells[0].x, cells[0].y), (1, 0));
//! assert_eq!((cells[1].x, cells[1].y), (0, 1));
//! ```

use crate::error::{RegionError, RegionResult};
use morpholib_core::{Extent, Raster2D, Raster3D, Sample};
use rayon::prelude::*;
use std::cmp::Ordering;

/// A planar cell and its relief value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRecord<T> {
    /// Column
    pub x: usize,
    /// Row
    pub y: usize,
    /// Relief value
    pub value: T,
}

/// A volumetric cell and its relief value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoxelRecord<T> {
    /// Column
    pub x: usize,
    /// Row
    pub y: usize,
    /// Slice
    pub z: usize,
    /// Relief value
    pub value: T,
}

/// Inclusive range of relief values taking part in the flood
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LevelRange {
    lo: f64,
    hi: f64,
}

impl LevelRange {
    /// Unbounded ends default to the full range
    pub(crate) fn new(h_min: Option<f64>, h_max: Option<f64>) -> RegionResult<Self> {
        let lo = h_min.unwrap_or(f64::NEG_INFINITY);
        let hi = h_max.unwrap_or(f64::INFINITY);
        if lo.is_nan() || hi.is_nan() || lo > hi {
            return Err(RegionError::InvalidParameters(format!(
                "invalid level range [{}, {}]",
                lo, hi
            )));
        }
        Ok(Self { lo, hi })
    }

    #[inline]
    fn contains(&self, value: f64) -> bool {
        value >= self.lo && value <= self.hi
    }
}

/// Check an auxiliary raster's extent against the relief
pub(crate) fn check_extent(what: &'static str, relief: Extent, other: Extent) -> RegionResult<()> {
    if relief != other {
        return Err(RegionError::DimensionMismatch {
            what,
            expected: relief.as_tuple(),
            actual: other.as_tuple(),
        });
    }
    Ok(())
}

fn extract_plane<T: Sample, M: Sample>(
    relief: &[T],
    mask: Option<&[M]>,
    extent: Extent,
    z: usize,
    range: LevelRange,
) -> Vec<usize> {
    let start = z * extent.plane_len();
    (start..start + extent.plane_len())
        .filter(|&i| mask.is_none_or(|m| m[i].is_foreground()))
        .filter(|&i| range.contains(relief[i].to_f64_lossy()))
        .collect()
}

/// Linear indices of in-scope cells in scan order
pub(crate) fn in_scope_indices<T: Sample, M: Sample>(
    relief: &[T],
    mask: Option<&[M]>,
    extent: Extent,
    range: LevelRange,
) -> Vec<usize> {
    if extent.is_planar() {
        extract_plane(relief, mask, extent, 0, range)
    } else {
        let slices: Vec<Vec<usize>> = (0..extent.depth)
            .into_par_iter()
            .map(|z| extract_plane(relief, mask, extent, z, range))
            .collect();
        slices.concat()
    }
}

/// Linear indices of in-scope cells, sorted by ascending relief value
fn sorted_indices<T: Sample, M: Sample>(
    relief: &[T],
    mask: Option<&[M]>,
    extent: Extent,
    range: LevelRange,
) -> Vec<usize> {
    let mut cells = in_scope_indices(relief, mask, extent, range);
    sort_by_relief(&mut cells, relief);
    cells
}

/// Stable sort of linear indices by relief value
pub(crate) fn sort_by_relief<T: Sample>(cells: &mut [usize], relief: &[T]) {
    let by_value =
        |&a: &usize, &b: &usize| relief[a].partial_cmp(&relief[b]).unwrap_or(Ordering::Equal);
    if cells.len() > 1 << 16 {
        cells.par_sort_by(by_value);
    } else {
        cells.sort_by(by_value);
    }
}

fn level_range_for<T: Sample>(h_min: T, h_max: T) -> RegionResult<LevelRange> {
    LevelRange::new(Some(h_min.to_f64_lossy()), Some(h_max.to_f64_lossy()))
}

/// Cells of a planar relief with values in `[h_min, h_max]`, sorted by
/// ascending value
///
/// Cells where `mask` is zero are skipped.
///
/// # Errors
///
/// Returns [`RegionError::DimensionMismatch`] if `mask` has a different
/// extent, and [`RegionError::InvalidParameters`] if `h_min > h_max`.
pub fn extract_sorted_cells_2d<T: Sample, M: Sample>(
    raster: &Raster2D<T>,
    mask: Option<&Raster2D<M>>,
    h_min: T,
    h_max: T,
) -> RegionResult<Vec<PixelRecord<T>>> {
    let extent = raster.extent();
    if let Some(m) = mask {
        check_extent("mask", extent, m.extent())?;
    }
    let range = level_range_for(h_min, h_max)?;
    let relief = raster.as_slice();
    let cells = sorted_indices(relief, mask.map(|m| m.as_slice()), extent, range);
    Ok(cells
        .into_iter()
        .map(|i| {
            let (x, y, _) = extent.coords(i);
            PixelRecord {
                x,
                y,
                value: relief[i],
            }
        })
        .collect())
}

/// Cells of a volumetric relief with values in `[h_min, h_max]`, sorted by
/// ascending value
pub fn extract_sorted_cells_3d<T: Sample, M: Sample>(
    raster: &Raster3D<T>,
    mask: Option<&Raster3D<M>>,
    h_min: T,
    h_max: T,
) -> RegionResult<Vec<VoxelRecord<T>>> {
    let extent = raster.extent();
    if let Some(m) = mask {
        check_extent("mask", extent, m.extent())?;
    }
    let range = level_range_for(h_min, h_max)?;
    let relief = raster.as_slice();
    let cells = sorted_indices(relief, mask.map(|m| m.as_slice()), extent, range);
    Ok(cells
        .into_iter()
        .map(|i| {
            let (x, y, z) = extent.coords(i);
            VoxelRecord {
                x,
                y,
                z,
                value: relief[i],
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_range() {
        assert!(LevelRange::new(Some(3.0), Some(2.0)).is_err());
        assert!(LevelRange::new(Some(f64::NAN), None).is_err());
        let r = LevelRange::new(None, Some(5.0)).unwrap();
        assert!(r.contains(-1e9));
        assert!(r.contains(5.0));
        assert!(!r.contains(5.5));
    }

    #[test]
    fn test_extract_with_mask_and_range() {
        let relief = Raster2D::<u8>::from_rows(&[&[4, 2, 8], &[6, 2, 0]]).unwrap();
        let mask = Raster2D::<u8>::from_rows(&[&[1, 1, 1], &[0, 1, 1]]).unwrap();
        let cells = extract_sorted_cells_2d(&relief, Some(&mask), 1, 6).unwrap();
        let coords: Vec<(usize, usize)> = cells.iter().map(|c| (c.x, c.y)).collect();
        assert_eq!(coords, vec![(1, 0), (1, 1), (0, 0)]);
    }

    #[test]
    fn test_extract_rejects_mismatched_mask() {
        let relief = Raster2D::<u8>::new(3, 3).unwrap();
        let mask = Raster2D::<u8>::new(3, 2).unwrap();
        let err = extract_sorted_cells_2d(&relief, Some(&mask), 0, 255).unwrap_err();
        assert!(matches!(err, RegionError::DimensionMismatch { what: "mask", .. }));
    }

    #[test]
    fn test_extract_3d_slice_order() {
        // equal values: slice order, then scan order
        let volume = Raster3D::<f32>::new_with_value(2, 2, 3, 1.0).unwrap();
        let cells = extract_sorted_cells_3d::<f32, u8>(&volume, None, 0.0, 1.0).unwrap();
        assert_eq!(cells.len(), 12);
        for (i, c) in cells.iter().enumerate() {
            assert_eq!(volume.extent().index(c.x, c.y, c.z), i);
        }
    }

    #[test]
    fn test_extract_3d_sorted() {
        let data: Vec<u16> = (0..27).map(|i| ((i * 7) % 27) as u16).collect();
        let volume = Raster3D::from_data(3, 3, 3, data).unwrap();
        let cells = extract_sorted_cells_3d::<u16, u8>(&volume, None, 0, 26).unwrap();
        assert!(cells.windows(2).all(|w| w[0].value <= w[1].value));
        assert_eq!(cells[0].value, 0);
        assert_eq!(cells[26].value, 26);
    }
}
