//! Error types for the test framework

use thiserror::Error;

/// Errors that can occur during regression testing
#[derive(Debug, Error)]
pub enum TestError {
    /// Failed to create directory
    #[error("failed to create directory '{path}': {message}")]
    DirectoryCreate { path: String, message: String },

    /// Failed to write a raster dump
    #[error("failed to write raster dump '{path}': {message}")]
    DumpWrite { path: String, message: String },

    /// Value comparison failed
    #[error(
        "value comparison failed at index {index}: expected {expected}, got {actual}, delta {delta}"
    )]
    ValueMismatch {
        index: usize,
        expected: f64,
        actual: f64,
        delta: f64,
    },

    /// Raster comparison failed
    #[error("raster comparison failed at index {index}: {reason}")]
    RasterMismatch { index: usize, reason: String },
}

/// Result type for test operations
pub type TestResult<T> = Result<T, TestError>;
