//! Morpholib - Mathematical morphology on planar and volumetric rasters
//!
//! # Overview
//!
//! - Rasters, extents and neighborhoods shared by every operation
//! - Chamfer masks and the two-pass chamfer distance transform
//! - Vincent–Soille watershed segmentation, unseeded or marker-controlled
//!
//! # Example
//!
//! ```
//! use morpholib::distance::{ChamferPreset2D, DistanceTransformOptions, distance_map_2d_u16};
//! use morpholib::region::{WatershedOptions, watershed_2d};
//! use morpholib::Raster2D;
//!
//! // two objects separated by one background column
//! let binary = Raster2D::<u8>::from_rows(&[
//!     &[1, 1, 1, 0, 1, 1, 1],
//!     &[1, 1, 1, 0, 1, 1, 1],
//!     &[1, 1, 1, 0, 1, 1, 1],
//! ])
//! .unwrap();
//!
//! let mask = ChamferPreset2D::Chessboard.mask();
//! let map = distance_map_2d_u16(&binary, &mask, &DistanceTransformOptions::new()).unwrap();
//! assert_eq!(map.raster.at(0, 1), 3);
//!
//! // flood the inverted distance map
//! let relief = map.raster.map(|d| map.max_distance - d);
//! let labels = watershed_2d(&relief, None, Some(&binary), &WatershedOptions::new()).unwrap();
//! assert_eq!(labels.at(3, 1), 0);
//! assert_ne!(labels.at(0, 1), labels.at(6, 1));
//! ```

// Re-export core types (primary data structures used everywhere)
pub use morpholib_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use morpholib_distance as distance;
pub use morpholib_region as region;
