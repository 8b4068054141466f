//! Chamfer mask machinery shared by the 2D and 3D masks
//!
//! A chamfer mask is a set of weight tiers. Each tier is a base shift such
//! as (1, 0) or (2, 1, 1); the tier's offsets are every sign and axis
//! permutation of that shift. The forward offset set holds the offsets that
//! precede the origin in raster scan order, and the backward set is its
//! point reflection.

use crate::error::{DistanceError, DistanceResult};

/// A neighbor shift paired with its integer and float weights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedOffset {
    /// Shift along x
    pub dx: isize,
    /// Shift along y
    pub dy: isize,
    /// Shift along z (0 for planar masks)
    pub dz: isize,
    /// Integer weight
    pub weight: u16,
    /// Float weight
    pub float_weight: f32,
}

impl WeightedOffset {
    /// The point-reflected offset with the same weights
    pub fn reflect(&self) -> Self {
        Self {
            dx: -self.dx,
            dy: -self.dy,
            dz: -self.dz,
            ..*self
        }
    }

    /// Whether the offset precedes the origin in increasing scan order
    pub fn precedes_origin(&self) -> bool {
        self.dz < 0 || (self.dz == 0 && (self.dy < 0 || (self.dy == 0 && self.dx < 0)))
    }
}

/// Common interface of planar and volumetric chamfer masks
pub trait ChamferMask {
    /// Offsets visited while scanning in increasing coordinate order
    fn forward_offsets(&self) -> &[WeightedOffset];

    /// Offsets visited while scanning in decreasing coordinate order
    fn backward_offsets(&self) -> &[WeightedOffset];

    /// Integer weight of the orthogonal tier
    fn normalization_weight(&self) -> u16;

    /// Float weight of the orthogonal tier
    fn float_normalization_weight(&self) -> f32;

    /// Name of the mask, if any
    fn name(&self) -> Option<&str>;
}

/// Weight tiers and the derived offset sets
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MaskTiers {
    pub(crate) weights: Vec<u16>,
    pub(crate) float_weights: Vec<f32>,
    pub(crate) forward: Vec<WeightedOffset>,
    pub(crate) backward: Vec<WeightedOffset>,
}

impl MaskTiers {
    /// Build tiers from paired weights and base shifts
    ///
    /// `bases` holds one base shift per supported tier; only the first
    /// `weights.len()` are used.
    pub(crate) fn build(
        dims: u32,
        bases: &[(isize, isize, isize)],
        weights: Vec<u16>,
        float_weights: Vec<f32>,
    ) -> DistanceResult<Self> {
        if weights.is_empty() || weights.len() > bases.len() {
            return Err(DistanceError::InvalidWeights {
                dims,
                reason: format!(
                    "expected between 1 and {} weights, got {}",
                    bases.len(),
                    weights.len()
                ),
            });
        }
        if float_weights.len() != weights.len() {
            return Err(DistanceError::InvalidWeights {
                dims,
                reason: format!(
                    "{} integer weights but {} float weights",
                    weights.len(),
                    float_weights.len()
                ),
            });
        }
        if let Some(pos) = float_weights
            .iter()
            .position(|&w| !w.is_finite() || w <= 0.0)
        {
            return Err(DistanceError::InvalidWeights {
                dims,
                reason: format!("float weight {} is not a positive number", pos),
            });
        }
        if let Some(pos) = weights.iter().position(|&w| w == 0) {
            return Err(DistanceError::InvalidWeights {
                dims,
                reason: format!("integer weight {} is zero", pos),
            });
        }

        Ok(Self::assemble(bases, weights, float_weights))
    }

    /// Derive the offset sets from weights already known to be valid
    pub(crate) fn assemble(
        bases: &[(isize, isize, isize)],
        weights: Vec<u16>,
        float_weights: Vec<f32>,
    ) -> Self {
        let mut forward = Vec::new();
        for ((&base, &weight), &float_weight) in
            bases.iter().zip(weights.iter()).zip(float_weights.iter())
        {
            for (dx, dy, dz) in shift_variants(base) {
                let offset = WeightedOffset {
                    dx,
                    dy,
                    dz,
                    weight,
                    float_weight,
                };
                if offset.precedes_origin() {
                    forward.push(offset);
                }
            }
        }
        forward.sort_by_key(|o| (o.dz, o.dy, o.dx));
        let backward = forward.iter().map(WeightedOffset::reflect).collect();

        Self {
            weights,
            float_weights,
            forward,
            backward,
        }
    }

    /// Drop every offset that leaves the z = 0 plane
    pub(crate) fn into_planar(mut self) -> Self {
        self.forward.retain(|o| o.dz == 0);
        self.backward.retain(|o| o.dz == 0);
        self
    }
}

/// Every distinct sign and axis permutation of a shift
fn shift_variants(base: (isize, isize, isize)) -> Vec<(isize, isize, isize)> {
    let (a, b, c) = base;
    let perms = [
        (a, b, c),
        (a, c, b),
        (b, a, c),
        (b, c, a),
        (c, a, b),
        (c, b, a),
    ];
    let mut out = Vec::new();
    for (x, y, z) in perms {
        for sx in [1, -1] {
            for sy in [1, -1] {
                for sz in [1, -1] {
                    let v = (x * sx, y * sy, z * sz);
                    if !out.contains(&v) {
                        out.push(v);
                    }
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_variant_counts() {
        assert_eq!(shift_variants((1, 0, 0)).len(), 6);
        assert_eq!(shift_variants((1, 1, 0)).len(), 12);
        assert_eq!(shift_variants((1, 1, 1)).len(), 8);
        assert_eq!(shift_variants((2, 1, 0)).len(), 24);
        assert_eq!(shift_variants((2, 1, 1)).len(), 24);
        assert_eq!(shift_variants((2, 2, 1)).len(), 24);
    }

    #[test]
    fn test_precedes_origin() {
        let o = |dx, dy, dz| WeightedOffset {
            dx,
            dy,
            dz,
            weight: 1,
            float_weight: 1.0,
        };
        assert!(o(-1, 0, 0).precedes_origin());
        assert!(o(1, -1, 0).precedes_origin());
        assert!(o(1, 1, -1).precedes_origin());
        assert!(!o(1, 0, 0).precedes_origin());
        assert!(!o(-1, 1, 0).precedes_origin());
        assert!(!o(0, 0, 0).precedes_origin());
    }

    #[test]
    fn test_build_rejects_zero_weight() {
        let bases = [(1, 0, 0), (1, 1, 0)];
        let err = MaskTiers::build(3, &bases, vec![1, 0], vec![1.0, 1.0]).unwrap_err();
        assert!(matches!(err, DistanceError::InvalidWeights { dims: 3, .. }));
    }

    #[test]
    fn test_build_rejects_too_many_weights() {
        let bases = [(1, 0, 0)];
        assert!(MaskTiers::build(2, &bases, vec![1, 2], vec![1.0, 2.0]).is_err());
        assert!(MaskTiers::build(2, &bases, vec![], vec![]).is_err());
    }
}
