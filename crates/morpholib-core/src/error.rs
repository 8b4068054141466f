//! Error types for morpholib-core
//!
//! Provides a unified error type for raster construction, raster access,
//! neighborhood configuration and cooperative cancellation. The engine
//! crates wrap this type in their own error enums.

use thiserror::Error;

/// Morpholib core error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Invalid raster dimensions (zero-sized axis)
    #[error("invalid raster dimensions: {width}x{height}x{depth}")]
    InvalidDimension {
        width: usize,
        height: usize,
        depth: usize,
    },

    /// Raster extents disagree
    #[error("dimension mismatch: expected {}x{}x{}, got {}x{}x{}", .expected.0, .expected.1, .expected.2, .actual.0, .actual.1, .actual.2)]
    DimensionMismatch {
        expected: (usize, usize, usize),
        actual: (usize, usize, usize),
    },

    /// Index out of bounds
    #[error("index out of bounds: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Connectivity value not legal for the dimensionality
    #[error("invalid connectivity {value} for {dims}D neighborhood")]
    InvalidConnectivity { value: u32, dims: u32 },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The computation was cancelled through a [`crate::CancelToken`]
    #[error("operation cancelled")]
    Cancelled,
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;
