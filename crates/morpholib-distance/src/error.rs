//! Error types for morpholib-distance

use thiserror::Error;

/// Errors that can occur while building chamfer masks or computing
/// distance maps
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DistanceError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] morpholib_core::Error),

    /// Weight array with an unsupported length or a non-positive weight
    #[error("invalid chamfer weights for {dims}D mask: {reason}")]
    InvalidWeights { dims: u32, reason: String },
}

/// Result type for distance transform operations
pub type DistanceResult<T> = Result<T, DistanceError>;
