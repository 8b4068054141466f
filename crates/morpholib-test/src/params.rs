//! Regression test parameters and operations

use crate::error::{TestError, TestResult};
use crate::regout_dir;
use morpholib_core::{Extent, Raster2D, Raster3D, Sample};
use std::fmt::Write as _;
use std::fs;

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Compare computed values with the expected ones (default)
    #[default]
    Compare,
    /// Compare, and also dump compared rasters as text
    Display,
}

impl RegTestMode {
    /// Parse mode from the `REGTEST_MODE` environment variable
    pub fn from_env() -> Self {
        match std::env::var("REGTEST_MODE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// A raster the harness can compare cell by cell
pub trait RegRaster {
    /// Cell type
    type Cell: Sample;
    /// Shape of the raster
    fn reg_extent(&self) -> Extent;
    /// Cells in linear order
    fn reg_cells(&self) -> &[Self::Cell];
}

impl<T: Sample> RegRaster for Raster2D<T> {
    type Cell = T;

    fn reg_extent(&self) -> Extent {
        self.extent()
    }

    fn reg_cells(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: Sample> RegRaster for Raster3D<T> {
    type Cell = T;

    fn reg_extent(&self) -> Extent {
        self.extent()
    }

    fn reg_cells(&self) -> &[T] {
        self.as_slice()
    }
}

/// Regression test parameters
///
/// This structure tracks the state of a regression test, including
/// the test name, current index, mode, and success status.
pub struct RegParams {
    /// Name of the test (e.g., "watershed")
    pub test_name: String,
    /// Current test index (incremented before each test)
    index: usize,
    /// Test mode (compare or display)
    pub mode: RegTestMode,
    /// Recorded failures
    failures: Vec<TestError>,
}

impl RegParams {
    /// Create new regression test parameters
    ///
    /// The mode is taken from the `REGTEST_MODE` environment variable.
    pub fn new(test_name: &str) -> Self {
        let mode = RegTestMode::from_env();

        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");
        eprintln!("Mode: {:?}", mode);

        Self {
            test_name: test_name.to_string(),
            index: 0,
            mode,
            failures: Vec::new(),
        }
    }

    /// Get the current test index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Check if in display mode
    pub fn display(&self) -> bool {
        self.mode == RegTestMode::Display
    }

    fn fail(&mut self, error: TestError) {
        eprintln!("Failure in {}_reg: {}", self.test_name, error);
        self.failures.push(error);
    }

    /// Compare two floating-point values
    ///
    /// Returns `true` if the values match within `delta`.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        if diff > delta {
            self.fail(TestError::ValueMismatch {
                index: self.index,
                expected,
                actual,
                delta,
            });
            false
        } else {
            true
        }
    }

    /// Compare two rasters for exact equality
    ///
    /// In display mode both rasters are also dumped to the regout
    /// directory.
    pub fn compare_rasters<R: RegRaster>(&mut self, expected: &R, actual: &R) -> bool {
        self.index += 1;

        if self.display() {
            let index = self.index;
            for (tag, raster) in [("expected", expected), ("actual", actual)] {
                if let Err(e) = self.dump(&format!("{index:02}.{tag}"), raster) {
                    eprintln!("{}", e);
                }
            }
        }

        let (ee, ae) = (expected.reg_extent(), actual.reg_extent());
        if ee != ae {
            self.fail(TestError::RasterMismatch {
                index: self.index,
                reason: format!("extent {:?} vs {:?}", ee.as_tuple(), ae.as_tuple()),
            });
            return false;
        }

        let mismatch = expected
            .reg_cells()
            .iter()
            .zip(actual.reg_cells())
            .position(|(e, a)| e != a);
        if let Some(pos) = mismatch {
            let (x, y, z) = ee.coords(pos);
            self.fail(TestError::RasterMismatch {
                index: self.index,
                reason: format!(
                    "cell ({x}, {y}, {z}): expected {:?}, got {:?}",
                    expected.reg_cells()[pos],
                    actual.reg_cells()[pos]
                ),
            });
            return false;
        }

        true
    }

    /// Write a raster as whitespace-separated text, one row per line and
    /// a blank line between planes
    pub fn dump<R: RegRaster>(&self, name: &str, raster: &R) -> TestResult<String> {
        let dir = regout_dir();
        fs::create_dir_all(&dir).map_err(|e| TestError::DirectoryCreate {
            path: dir.clone(),
            message: e.to_string(),
        })?;

        let extent = raster.reg_extent();
        let mut text = String::new();
        for (i, v) in raster.reg_cells().iter().enumerate() {
            let (x, y, _) = extent.coords(i);
            if x == 0 && y == 0 && i > 0 {
                text.push('\n');
            }
            let _ = write!(text, "{:?}", v);
            text.push(if x + 1 == extent.width { '\n' } else { ' ' });
        }

        let path = format!("{}/{}.{}.txt", dir, self.test_name, name);
        fs::write(&path, text).map_err(|e| TestError::DumpWrite {
            path: path.clone(),
            message: e.to_string(),
        })?;
        eprintln!("Wrote: {}", path);
        Ok(path)
    }

    /// Clean up and report results
    ///
    /// Returns `true` if all tests passed.
    pub fn cleanup(self) -> bool {
        if self.failures.is_empty() {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.failures.is_empty()
    }

    /// Check if all tests have passed so far
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Get list of failures
    pub fn failures(&self) -> &[TestError] {
        &self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_env() {
        let mode = RegTestMode::from_env();
        assert!(matches!(mode, RegTestMode::Compare | RegTestMode::Display));
    }

    #[test]
    fn test_compare_values_success() {
        let mut rp = RegParams::new("test");
        assert!(rp.compare_values(100.0, 100.0, 0.0));
        assert!(rp.compare_values(100.0, 100.5, 1.0));
        assert!(rp.is_success());
        assert_eq!(rp.index(), 2);
    }

    #[test]
    fn test_compare_values_failure() {
        let mut rp = RegParams::new("test");
        assert!(!rp.compare_values(100.0, 200.0, 0.0));
        assert!(!rp.is_success());
        assert!(matches!(
            rp.failures()[0],
            TestError::ValueMismatch { index: 1, .. }
        ));
    }

    #[test]
    fn test_compare_rasters() {
        let mut rp = RegParams::new("test");
        let a = Raster2D::<u8>::from_rows(&[&[1, 2], &[3, 4]]).unwrap();
        let b = Raster2D::<u8>::from_rows(&[&[1, 2], &[3, 5]]).unwrap();
        assert!(rp.compare_rasters(&a, &a.clone()));
        assert!(!rp.compare_rasters(&a, &b));
        assert!(matches!(
            &rp.failures()[0],
            TestError::RasterMismatch { index: 2, reason } if reason.contains("(1, 1, 0)")
        ));
    }

    #[test]
    fn test_compare_rasters_extent_mismatch() {
        let mut rp = RegParams::new("test");
        let a = Raster3D::<i32>::new(2, 2, 2).unwrap();
        let b = Raster3D::<i32>::new(2, 2, 1).unwrap();
        assert!(!rp.compare_rasters(&a, &b));
    }
}
