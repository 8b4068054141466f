//! Chamfer distance maps of planar and volumetric rasters
//!
//! Background cells (value 0) map to 0. Every foreground cell maps to the
//! weighted length of the shortest mask path to a cell of a different
//! label, so label rasters measure each region to its own boundary.
//! Foreground cells that no such path reaches keep
//! [`DistanceWeight::INFINITE`].
//!
//! # Examples
//!
//! ```
//! use morpholib_core::Raster2D;
//! use morpholib_distance::{ChamferPreset2D, DistanceTransformOptions, distance_map_2d_u16};
//!
//! let mut input = Raster2D::<u8>::new_with_value(5, 5, 1).unwrap();
//! input.set(2, 2, 0).unwrap();
//!
//! let mask = ChamferPreset2D::Chessboard.mask();
//! let options = DistanceTransformOptions::default().with_normalize(false);
//! let map = distance_map_2d_u16(&input, &mask, &options).unwrap();
//!
//! assert_eq!(map.raster.at(2, 2), 0);
//! assert_eq!(map.raster.at(1, 1), 1);
//! assert_eq!(map.raster.at(0, 4), 2);
//! assert_eq!(map.max_distance, 2);
//! ```

use crate::engine::propagate;
use crate::error::DistanceResult;
use crate::mask::ChamferMask;
use crate::mask2d::ChamferMask2D;
use crate::mask3d::ChamferMask3D;
use crate::weight::DistanceWeight;
use morpholib_core::{CancelToken, Monitor, ProgressObserver, Raster2D, Raster3D, Sample};
use std::sync::Arc;

/// Options for the chamfer distance transform
#[derive(Debug, Clone)]
pub struct DistanceTransformOptions {
    /// Divide distances by the mask's normalization weight
    pub normalize: bool,
    /// Progress observer and cancellation token
    pub monitor: Monitor,
}

impl Default for DistanceTransformOptions {
    fn default() -> Self {
        Self {
            normalize: true,
            monitor: Monitor::new(),
        }
    }
}

impl DistanceTransformOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether distances are normalized
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Attach a progress observer
    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.monitor = self.monitor.with_observer(observer);
        self
    }

    /// Attach a cancellation token
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.monitor = self.monitor.with_cancel_token(token);
        self
    }
}

/// A distance raster and the largest finite distance among its
/// foreground cells
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMap<R, W> {
    /// Distance raster, same extent as the input
    pub raster: R,
    /// Largest finite foreground distance, 0 if there is none
    pub max_distance: W,
}

/// Planar distance map
pub type DistanceMap2D<W> = DistanceMap<Raster2D<W>, W>;

/// Volumetric distance map
pub type DistanceMap3D<W> = DistanceMap<Raster3D<W>, W>;

/// Chamfer distance map of a planar binary or label raster
///
/// `W` selects the accumulator: `u16` uses the mask's integer weights,
/// `f32` its float weights.
pub fn chamfer_distance_map_2d<W: DistanceWeight, T: Sample>(
    input: &Raster2D<T>,
    mask: &ChamferMask2D,
    options: &DistanceTransformOptions,
) -> DistanceResult<DistanceMap2D<W>> {
    let extent = input.extent();
    let out = propagate::<T, W, _>(
        input.as_slice(),
        extent,
        mask,
        options.normalize,
        &options.monitor,
    )?;
    Ok(DistanceMap {
        raster: Raster2D::from_extent(extent, out.distances)?,
        max_distance: out.max_distance,
    })
}

/// Chamfer distance map of a volumetric binary or label raster
pub fn chamfer_distance_map_3d<W: DistanceWeight, T: Sample>(
    input: &Raster3D<T>,
    mask: &ChamferMask3D,
    options: &DistanceTransformOptions,
) -> DistanceResult<DistanceMap3D<W>> {
    let extent = input.extent();
    let out = propagate::<T, W, _>(
        input.as_slice(),
        extent,
        mask,
        options.normalize,
        &options.monitor,
    )?;
    Ok(DistanceMap {
        raster: Raster3D::from_extent(extent, out.distances)?,
        max_distance: out.max_distance,
    })
}

/// 16-bit planar distance map
pub fn distance_map_2d_u16<T: Sample>(
    input: &Raster2D<T>,
    mask: &ChamferMask2D,
    options: &DistanceTransformOptions,
) -> DistanceResult<DistanceMap2D<u16>> {
    chamfer_distance_map_2d::<u16, T>(input, mask, options)
}

/// Float planar distance map
pub fn distance_map_2d_f32<T: Sample>(
    input: &Raster2D<T>,
    mask: &ChamferMask2D,
    options: &DistanceTransformOptions,
) -> DistanceResult<DistanceMap2D<f32>> {
    chamfer_distance_map_2d::<f32, T>(input, mask, options)
}

/// 16-bit volumetric distance map
pub fn distance_map_3d_u16<T: Sample>(
    input: &Raster3D<T>,
    mask: &ChamferMask3D,
    options: &DistanceTransformOptions,
) -> DistanceResult<DistanceMap3D<u16>> {
    chamfer_distance_map_3d::<u16, T>(input, mask, options)
}

/// Float volumetric distance map
pub fn distance_map_3d_f32<T: Sample>(
    input: &Raster3D<T>,
    mask: &ChamferMask3D,
    options: &DistanceTransformOptions,
) -> DistanceResult<DistanceMap3D<f32>> {
    chamfer_distance_map_3d::<f32, T>(input, mask, options)
}

/// Whether a distance value is the "unreached" sentinel
pub fn is_unreached<W: DistanceWeight>(value: W) -> bool {
    !value.is_finite_distance()
}
