//! Accumulator types for chamfer distances
//!
//! Distances accumulate either in 16-bit integers, where the mask's integer
//! weights are used, or in 32-bit floats, where its float weights are used.
//! Both reserve their maximum value as "infinite".

use crate::mask::{ChamferMask, WeightedOffset};
use morpholib_core::Sample;

/// Numeric type a distance map accumulates in
pub trait DistanceWeight: Sample {
    /// Value of a foreground cell not (yet) reached from any background cell
    const INFINITE: Self;

    /// The weight this type reads from a mask offset
    fn from_offset(offset: &WeightedOffset) -> Self;

    /// Normalization weight this type reads from a mask
    fn normalization<M: ChamferMask + ?Sized>(mask: &M) -> Self;

    /// `self + weight`, saturating at [`Self::INFINITE`]
    fn accumulate(self, weight: Self) -> Self;

    /// `self / norm`; integer types round to nearest
    fn normalize(self, norm: Self) -> Self;

    /// Whether the value is finite
    #[inline]
    fn is_finite_distance(self) -> bool {
        self != Self::INFINITE
    }
}

impl DistanceWeight for u16 {
    const INFINITE: Self = u16::MAX;

    #[inline]
    fn from_offset(offset: &WeightedOffset) -> Self {
        offset.weight
    }

    fn normalization<M: ChamferMask + ?Sized>(mask: &M) -> Self {
        mask.normalization_weight()
    }

    #[inline]
    fn accumulate(self, weight: Self) -> Self {
        self.saturating_add(weight)
    }

    #[inline]
    fn normalize(self, norm: Self) -> Self {
        if norm <= 1 {
            return self;
        }
        let norm = u32::from(norm);
        ((u32::from(self) + norm / 2) / norm) as u16
    }
}

impl DistanceWeight for f32 {
    const INFINITE: Self = f32::MAX;

    #[inline]
    fn from_offset(offset: &WeightedOffset) -> Self {
        offset.float_weight
    }

    fn normalization<M: ChamferMask + ?Sized>(mask: &M) -> Self {
        mask.float_normalization_weight()
    }

    #[inline]
    fn accumulate(self, weight: Self) -> Self {
        if self == Self::INFINITE {
            Self::INFINITE
        } else {
            (self + weight).min(Self::INFINITE)
        }
    }

    #[inline]
    fn normalize(self, norm: Self) -> Self {
        self / norm
    }
}
