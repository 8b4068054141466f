//! Morpholib Core - Basic data structures for raster morphology
//!
//! This crate provides the data structures shared by the distance
//! transform and watershed engines:
//!
//! - [`Raster2D`] / [`Raster3D`] - Planar and volumetric sample grids
//! - [`Extent`] - Shape of a raster, with linear indexing helpers
//! - [`Sample`] - Bound for the 8/16/32-bit integer and 32-bit float samples
//! - [`Neighborhood2D`] / [`Neighborhood3D`] - 4/8 and 6/26 connectivity
//! - [`ProgressObserver`] / [`CancelToken`] - Coarse progress hooks and
//!   cooperative cancellation

pub mod error;
pub mod extent;
pub mod neighborhood;
pub mod progress;
pub mod raster;
pub mod sample;

pub use error::{Error, Result};
pub use extent::Extent;
pub use neighborhood::{
    Connectivity, Connectivity2D, Connectivity3D, Neighborhood2D, Neighborhood3D, offsets_for,
};
pub use progress::{CancelToken, Monitor, Phase, ProgressObserver};
pub use raster::{Raster2D, Raster3D};
pub use sample::Sample;
