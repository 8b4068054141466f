//! morpholib-test - Regression test framework for morpholib
//!
//! Regression tests live in `crates/*/tests/*_reg.rs`. Each one creates a
//! [`RegParams`], runs a sequence of numbered comparisons and asserts on
//! [`RegParams::cleanup`]. Two modes are supported:
//!
//! - **Compare**: Compare computed values and rasters (default)
//! - **Display**: Also dump every compared raster as text under
//!   `target/regout`
//!
//! # Usage
//!
//! ```ignore
//! use morpholib_test::RegParams;
//!
//! let mut rp = RegParams::new("watershed");
//! rp.compare_values(2.0, basins as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "compare" or "display"

mod error;
mod params;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegRaster, RegTestMode};

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // morpholib-test is at crates/morpholib-test, so go up two directories
    format!("{}/../..", manifest_dir)
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/target/regout", workspace_root())
}
