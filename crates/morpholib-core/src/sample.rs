//! Scalar sample types stored in rasters
//!
//! Rasters hold 8, 16 or 32-bit integer samples, or 32-bit floats.
//! [`Sample`] is the bound shared by every engine in the workspace.

use num_traits::{Bounded, NumCast, ToPrimitive, Zero};
use std::fmt::Debug;

/// A scalar raster sample
///
/// Zero is the background value for binary and label rasters; any other
/// value is foreground.
pub trait Sample:
    Copy + PartialOrd + Debug + Send + Sync + Zero + Bounded + ToPrimitive + NumCast + 'static
{
    /// Whether the sample is foreground (non-zero)
    #[inline]
    fn is_foreground(self) -> bool {
        !self.is_zero()
    }

    /// Lossy conversion to `f64` for statistics and calibration
    #[inline]
    fn to_f64_lossy(self) -> f64 {
        self.to_f64().unwrap_or(0.0)
    }
}

impl Sample for u8 {}
impl Sample for u16 {}
impl Sample for u32 {}
impl Sample for i32 {}
impl Sample for f32 {}
