//! Error types for morpholib-region

use thiserror::Error;

/// Errors that can occur during watershed and region operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegionError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] morpholib_core::Error),

    /// An auxiliary raster does not match the relief raster
    #[error("{what} extent {}x{}x{} does not match relief extent {}x{}x{}", .actual.0, .actual.1, .actual.2, .expected.0, .expected.1, .expected.2)]
    DimensionMismatch {
        what: &'static str,
        expected: (usize, usize, usize),
        actual: (usize, usize, usize),
    },

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for region operations
pub type RegionResult<T> = Result<T, RegionError>;
