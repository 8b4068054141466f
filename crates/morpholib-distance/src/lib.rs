//! morpholib-distance - Chamfer distance transforms
//!
//! This crate provides:
//!
//! - **Chamfer masks** - Planar (up to 5×5) and volumetric (up to 5×5×5)
//!   weighted neighborhoods, with the usual named presets
//! - **Distance maps** - Two-pass chamfer propagation over binary and
//!   label rasters, accumulating in `u16` or `f32`
//!
//! # Examples
//!
//! ```
//! use morpholib_core::Raster3D;
//! use morpholib_distance::{ChamferPreset3D, DistanceTransformOptions, distance_map_3d_f32};
//!
//! let mut volume = Raster3D::<u8>::new_with_value(4, 4, 4, 1).unwrap();
//! volume.set(0, 0, 0, 0).unwrap();
//!
//! let mask = ChamferPreset3D::Borgefors.mask();
//! let map = distance_map_3d_f32(&volume, &mask, &DistanceTransformOptions::default()).unwrap();
//! assert_eq!(map.raster.at(1, 0, 0), 1.0);
//! ```

mod engine;
pub mod error;
pub mod mask;
pub mod mask2d;
pub mod mask3d;
pub mod transform;
pub mod weight;

pub use morpholib_core;

pub use error::{DistanceError, DistanceResult};
pub use mask::{ChamferMask, WeightedOffset};
pub use mask2d::{ChamferMask2D, ChamferPreset2D};
pub use mask3d::{ChamferMask3D, ChamferPreset3D};
pub use transform::{
    DistanceMap, DistanceMap2D, DistanceMap3D, DistanceTransformOptions, chamfer_distance_map_2d,
    chamfer_distance_map_3d, distance_map_2d_f32, distance_map_2d_u16, distance_map_3d_f32,
    distance_map_3d_u16, is_unreached,
};
pub use weight::DistanceWeight;
