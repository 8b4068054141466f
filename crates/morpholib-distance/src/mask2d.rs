//! Planar chamfer masks
//!
//! A planar mask has up to three weight tiers:
//!
//! | tier | base shift | neighbors          |
//! |------|------------|--------------------|
//! | a    | (1, 0)     | orthogonal         |
//! | b    | (1, 1)     | diagonal           |
//! | c    | (2, 1)     | knight move (5×5)  |
//!
//! # Examples
//!
//! ```
//! use morpholib_distance::{ChamferMask, ChamferMask2D, ChamferPreset2D};
//!
//! let mask = ChamferPreset2D::Borgefors.mask();
//! assert_eq!(mask.weights(), &[3, 4]);
//! assert_eq!(mask.forward_offsets().len(), 4);
//! assert_eq!(mask.normalization_weight(), 3);
//!
//! // five weights is not a planar mask
//! assert!(ChamferMask2D::from_weights(&[1, 2, 3, 4, 5]).is_err());
//! ```

use crate::error::DistanceResult;
use crate::mask::{ChamferMask, MaskTiers, WeightedOffset};

const BASES_2D: [(isize, isize, isize); 3] = [(1, 0, 0), (1, 1, 0), (2, 1, 0)];

/// Planar chamfer mask
#[derive(Debug, Clone, PartialEq)]
pub struct ChamferMask2D {
    tiers: MaskTiers,
    name: Option<String>,
}

impl ChamferMask2D {
    /// Create a mask from integer weights; float weights equal the integers
    ///
    /// # Errors
    ///
    /// Returns [`crate::DistanceError::InvalidWeights`] unless 1 to 3
    /// positive weights are given.
    pub fn from_weights(weights: &[u16]) -> DistanceResult<Self> {
        let floats: Vec<f32> = weights.iter().map(|&w| w as f32).collect();
        Self::from_weights_with_floats(weights, floats.as_slice())
    }

    /// Create a mask from float weights; integer weights are rounded, and
    /// never below 1
    pub fn from_float_weights(weights: &[f32]) -> DistanceResult<Self> {
        let ints: Vec<u16> = weights
            .iter()
            .map(|&w| w.round().clamp(1.0, u16::MAX as f32) as u16)
            .collect();
        Self::from_weights_with_floats(&ints, weights)
    }

    /// Create a mask from paired integer and float weights
    pub fn from_weights_with_floats(
        weights: &[u16],
        float_weights: &[f32],
    ) -> DistanceResult<Self> {
        let tiers =
            MaskTiers::build(2, &BASES_2D, weights.to_vec(), float_weights.to_vec())?.into_planar();
        Ok(Self { tiers, name: None })
    }

    /// Attach a display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Integer weights, one per tier
    pub fn weights(&self) -> &[u16] {
        &self.tiers.weights
    }

    /// Float weights, one per tier
    pub fn float_weights(&self) -> &[f32] {
        &self.tiers.float_weights
    }

    /// Half-width of the mask footprint (1 for 3×3, 2 for 5×5)
    pub fn radius(&self) -> usize {
        self.tiers
            .forward
            .iter()
            .map(|o| o.dx.unsigned_abs().max(o.dy.unsigned_abs()))
            .max()
            .unwrap_or(0)
    }
}

impl ChamferMask for ChamferMask2D {
    fn forward_offsets(&self) -> &[WeightedOffset] {
        &self.tiers.forward
    }

    fn backward_offsets(&self) -> &[WeightedOffset] {
        &self.tiers.backward
    }

    fn normalization_weight(&self) -> u16 {
        self.tiers.weights[0]
    }

    fn float_normalization_weight(&self) -> f32 {
        self.tiers.float_weights[0]
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Named planar weighting schemes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChamferPreset2D {
    /// Chessboard distance, weights (1, 1)
    Chessboard,
    /// City-block distance, weights (1, 2)
    CityBlock,
    /// Quasi-Euclidean, weights (10, 14) or (1, √2)
    QuasiEuclidean,
    /// Borgefors, weights (3, 4)
    Borgefors,
    /// Weights (2, 3)
    Weights23,
    /// Weights (5, 7)
    Weights57,
    /// Chess-knight, weights (5, 7, 11)
    ChessKnight,
}

impl ChamferPreset2D {
    /// All planar presets
    pub const ALL: [ChamferPreset2D; 7] = [
        Self::Chessboard,
        Self::CityBlock,
        Self::QuasiEuclidean,
        Self::Borgefors,
        Self::Weights23,
        Self::Weights57,
        Self::ChessKnight,
    ];

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            Self::Chessboard => "Chessboard (1,1)",
            Self::CityBlock => "City-Block (1,2)",
            Self::QuasiEuclidean => "Quasi-Euclidean (1,1.41)",
            Self::Borgefors => "Borgefors (3,4)",
            Self::Weights23 => "Weights (2,3)",
            Self::Weights57 => "Weights (5,7)",
            Self::ChessKnight => "Chessknight (5,7,11)",
        }
    }

    fn weights(self) -> (&'static [u16], Option<&'static [f32]>) {
        const QUASI_EUCLIDEAN_FLOATS: [f32; 2] = [1.0, std::f32::consts::SQRT_2];
        let ints: &'static [u16] = match self {
            Self::Chessboard => &[1, 1],
            Self::CityBlock => &[1, 2],
            Self::QuasiEuclidean => &[10, 14],
            Self::Borgefors => &[3, 4],
            Self::Weights23 => &[2, 3],
            Self::Weights57 => &[5, 7],
            Self::ChessKnight => &[5, 7, 11],
        };
        let floats: Option<&'static [f32]> = match self {
            Self::QuasiEuclidean => Some(&QUASI_EUCLIDEAN_FLOATS),
            _ => None,
        };
        (ints, floats)
    }

    /// Build the mask for this preset
    pub fn mask(self) -> ChamferMask2D {
        let (ints, floats) = self.weights();
        let floats: Vec<f32> = match floats {
            Some(f) => f.to_vec(),
            None => ints.iter().map(|&w| w as f32).collect(),
        };
        let tiers = MaskTiers::assemble(&BASES_2D, ints.to_vec(), floats).into_planar();
        ChamferMask2D {
            tiers,
            name: Some(self.name().to_string()),
        }
    }
}
