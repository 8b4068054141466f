//! morpholib-region - Watershed segmentation for morpholib
//!
//! This crate provides:
//!
//! - **Sorted cell extraction** - In-scope cells ordered by relief value,
//!   extracted slice-parallel for volumes
//! - **Watershed segmentation** - Vincent–Soille flooding of planar and
//!   volumetric reliefs, unseeded or from marker labels, with an optional
//!   region-of-interest mask and optional watershed lines
//! - **Segmentation pipelines** - Marker-controlled segmentation, mosaic
//!   images and hierarchical segmentation over caller-supplied labeling and
//!   gradient operators
//!
//! # Examples
//!
//! ```
//! use morpholib_core::Raster2D;
//! use morpholib_region::{MeanIntensity, WatershedOptions, mosaic_2d, watershed_2d};
//!
//! let relief = Raster2D::<u8>::from_rows(&[
//!     &[0, 3, 8, 4, 1],
//!     &[1, 4, 9, 5, 2],
//! ])
//! .unwrap();
//!
//! let options = WatershedOptions::new().with_watershed_lines(false);
//! let labels = watershed_2d::<u8, u8>(&relief, None, None, &options).unwrap();
//! assert!(labels.as_slice().iter().all(|&l| l > 0));
//!
//! let mosaic = mosaic_2d(&relief, &labels, &MeanIntensity).unwrap();
//! assert_eq!(mosaic.width(), 5);
//! ```

pub mod error;
pub mod extract;
pub mod segment;
pub mod watershed;

// Re-export core types
pub use morpholib_core;

// Re-export error types
pub use error::{RegionError, RegionResult};

// Re-export extraction types and functions
pub use extract::{PixelRecord, VoxelRecord, extract_sorted_cells_2d, extract_sorted_cells_3d};

// Re-export watershed types and functions
pub use watershed::{
    LABEL_BACKGROUND, LABEL_WATERSHED, WatershedOptions, watershed_2d, watershed_3d,
};

// Re-export segmentation types and functions
pub use segment::{
    ComponentLabeling2D, ComponentLabeling3D, GradientOperator2D, GradientOperator3D,
    GridAdjacency, MeanIntensity, RegionAdjacency, RegionStatistics,
    hierarchical_segmentation_2d, hierarchical_segmentation_3d, marker_controlled_segmentation_2d,
    marker_controlled_segmentation_3d, mosaic_2d, mosaic_3d, region_means,
};
