//! Volumetric chamfer masks
//!
//! A volumetric mask has up to six weight tiers:
//!
//! | tier | base shift | neighbors                 |
//! |------|------------|---------------------------|
//! | a    | (1, 0, 0)  | face                      |
//! | b    | (1, 1, 0)  | edge                      |
//! | c    | (1, 1, 1)  | corner                    |
//! | d    | (2, 1, 0)  | planar knight move (5×5×5) |
//! | e    | (2, 1, 1)  | knight move off-plane     |
//! | f    | (2, 2, 1)  | extended diagonal         |

use crate::error::DistanceResult;
use crate::mask::{ChamferMask, MaskTiers, WeightedOffset};

const BASES_3D: [(isize, isize, isize); 6] = [
    (1, 0, 0),
    (1, 1, 0),
    (1, 1, 1),
    (2, 1, 0),
    (2, 1, 1),
    (2, 2, 1),
];

/// Volumetric chamfer mask
#[derive(Debug, Clone, PartialEq)]
pub struct ChamferMask3D {
    tiers: MaskTiers,
    name: Option<String>,
}

impl ChamferMask3D {
    /// Create a mask from integer weights; float weights equal the integers
    ///
    /// # Errors
    ///
    /// Returns [`crate::DistanceError::InvalidWeights`] unless 1 to 6
    /// positive weights are given.
    pub fn from_weights(weights: &[u16]) -> DistanceResult<Self> {
        let floats: Vec<f32> = weights.iter().map(|&w| w as f32).collect();
        Self::from_weights_with_floats(weights, &floats)
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
        let tiers = MaskTiers::build(3, &BASES_3D, weights.to_vec(), float_weights.to_vec())?;
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
}

impl ChamferMask for ChamferMask3D {
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

/// Named volumetric weighting schemes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChamferPreset3D {
    /// Chessboard distance, weights (1, 1, 1)
    Chessboard,
    /// City-block distance, weights (1, 2, 3)
    CityBlock,
    /// Quasi-Euclidean, weights (10, 14, 17) or (1, √2, √3)
    QuasiEuclidean,
    /// Borgefors, weights (3, 4, 5)
    Borgefors,
    /// Svensson and Borgefors, weights (3, 4, 5, 7)
    Svensson,
    /// Weights (10, 14, 17, 22)
    Weights10_14_17_22,
    /// Weights (10, 14, 17, 22, 34, 30)
    Weights10_14_17_22_34_30,
}

impl ChamferPreset3D {
    /// All volumetric presets
    pub const ALL: [ChamferPreset3D; 7] = [
        Self::Chessboard,
        Self::CityBlock,
        Self::QuasiEuclidean,
        Self::Borgefors,
        Self::Svensson,
        Self::Weights10_14_17_22,
        Self::Weights10_14_17_22_34_30,
    ];

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            Self::Chessboard => "Chessboard (1,1,1)",
            Self::CityBlock => "City-Block (1,2,3)",
            Self::QuasiEuclidean => "Quasi-Euclidean (1,1.41,1.73)",
            Self::Borgefors => "Borgefors (3,4,5)",
            Self::Svensson => "Svensson <3,4,5,7>",
            Self::Weights10_14_17_22 => "Weights <10,14,17,22>",
            Self::Weights10_14_17_22_34_30 => "Weights <10,14,17,22,34,30>",
        }
    }

    fn weights(self) -> (&'static [u16], Option<&'static [f32]>) {
        const QUASI_EUCLIDEAN_FLOATS: [f32; 3] = [1.0, std::f32::consts::SQRT_2, 1.732_050_8];
        let ints: &'static [u16] = match self {
            Self::Chessboard => &[1, 1, 1],
            Self::CityBlock => &[1, 2, 3],
            Self::QuasiEuclidean => &[10, 14, 17],
            Self::Borgefors => &[3, 4, 5],
            Self::Svensson => &[3, 4, 5, 7],
            Self::Weights10_14_17_22 => &[10, 14, 17, 22],
            Self::Weights10_14_17_22_34_30 => &[10, 14, 17, 22, 34, 30],
        };
        let floats: Option<&'static [f32]> = match self {
            Self::QuasiEuclidean => Some(&QUASI_EUCLIDEAN_FLOATS),
            _ => None,
        };
        (ints, floats)
    }

    /// Build the mask for this preset
    pub fn mask(self) -> ChamferMask3D {
        let (ints, floats) = self.weights();
        let floats: Vec<f32> = match floats {
            Some(f) => f.to_vec(),
            None => ints.iter().map(|&w| w as f32).collect(),
        };
        ChamferMask3D {
            tiers: MaskTiers::assemble(&BASES_3D, ints.to_vec(), floats),
            name: Some(self.name().to_string()),
        }
    }
}
