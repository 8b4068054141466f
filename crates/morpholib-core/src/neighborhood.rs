//! Grid neighborhoods
//!
//! A neighborhood enumerates the 4/8 (2D) or 6/26 (3D) neighbors of a cell.
//! The iterators are bounds-agnostic: they may yield coordinates outside a
//! raster, and the caller checks them against an [`Extent`].
//!
//! # Examples
//!
//! ```
//! use morpholib_core::Neighborhood2D;
//!
//! let n = Neighborhood2D::new(4).unwrap();
//! let around: Vec<_> = n.neighbors(0, 0).collect();
//! assert_eq!(around.len(), 4);
//! assert!(around.contains(&(-1, 0)));
//!
//! // 6 is a 3D-only connectivity
//! assert!(Neighborhood2D::new(6).is_err());
//! ```

use crate::error::{Error, Result};
use crate::extent::Extent;

const OFFSETS_4: [(isize, isize); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];

const OFFSETS_8: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

const OFFSETS_6: [(isize, isize, isize); 6] = [
    (0, 0, -1),
    (0, -1, 0),
    (-1, 0, 0),
    (1, 0, 0),
    (0, 1, 0),
    (0, 0, 1),
];

/// Planar connectivity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Connectivity2D {
    /// 4-way connectivity (up, down, left, right)
    #[default]
    Four,
    /// 8-way connectivity (includes diagonals)
    Eight,
}

impl Connectivity2D {
    /// Parse a connectivity value (4 or 8)
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConnectivity`] for any other value.
    pub fn from_value(value: u32) -> Result<Self> {
        match value {
            4 => Ok(Self::Four),
            8 => Ok(Self::Eight),
            _ => Err(Error::InvalidConnectivity { value, dims: 2 }),
        }
    }

    /// Numeric connectivity value
    pub fn value(self) -> u32 {
        match self {
            Self::Four => 4,
            Self::Eight => 8,
        }
    }
}

impl TryFrom<u32> for Connectivity2D {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        Self::from_value(value)
    }
}

/// Volumetric connectivity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Connectivity3D {
    /// 6-way connectivity (face neighbors)
    #[default]
    Six,
    /// 26-way connectivity (face, edge and corner neighbors)
    TwentySix,
}

impl Connectivity3D {
    /// Parse a connectivity value (6 or 26)
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConnectivity`] for any other value.
    pub fn from_value(value: u32) -> Result<Self> {
        match value {
            6 => Ok(Self::Six),
            26 => Ok(Self::TwentySix),
            _ => Err(Error::InvalidConnectivity { value, dims: 3 }),
        }
    }

    /// Numeric connectivity value
    pub fn value(self) -> u32 {
        match self {
            Self::Six => 6,
            Self::TwentySix => 26,
        }
    }
}

impl TryFrom<u32> for Connectivity3D {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        Self::from_value(value)
    }
}

/// Connectivity of either dimensionality
///
/// Option structs hold this and check it against the raster being processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connectivity {
    /// Planar connectivity
    Planar(Connectivity2D),
    /// Volumetric connectivity
    Volumetric(Connectivity3D),
}

impl Connectivity {
    /// Parse any of 4, 8, 6 or 26
    pub fn from_value(value: u32) -> Result<Self> {
        match value {
            4 | 8 => Connectivity2D::from_value(value).map(Self::Planar),
            6 | 26 => Connectivity3D::from_value(value).map(Self::Volumetric),
            _ => Err(Error::InvalidConnectivity { value, dims: 0 }),
        }
    }

    /// Numeric connectivity value
    pub fn value(self) -> u32 {
        match self {
            Self::Planar(c) => c.value(),
            Self::Volumetric(c) => c.value(),
        }
    }

    /// Planar connectivity, or an error if this is a 3D value
    pub fn planar(self) -> Result<Connectivity2D> {
        match self {
            Self::Planar(c) => Ok(c),
            Self::Volumetric(c) => Err(Error::InvalidConnectivity {
                value: c.value(),
                dims: 2,
            }),
        }
    }

    /// Volumetric connectivity, or an error if this is a 2D value
    pub fn volumetric(self) -> Result<Connectivity3D> {
        match self {
            Self::Volumetric(c) => Ok(c),
            Self::Planar(c) => Err(Error::InvalidConnectivity {
                value: c.value(),
                dims: 3,
            }),
        }
    }
}

impl From<Connectivity2D> for Connectivity {
    fn from(c: Connectivity2D) -> Self {
        Self::Planar(c)
    }
}

impl From<Connectivity3D> for Connectivity {
    fn from(c: Connectivity3D) -> Self {
        Self::Volumetric(c)
    }
}

/// Planar neighborhood
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighborhood2D {
    connectivity: Connectivity2D,
}

impl Neighborhood2D {
    /// Create a neighborhood from a connectivity value (4 or 8)
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConnectivity`] for any other value.
    pub fn new(connectivity: u32) -> Result<Self> {
        Connectivity2D::from_value(connectivity).map(Self::from_connectivity)
    }

    /// Create a neighborhood from a parsed connectivity
    pub fn from_connectivity(connectivity: Connectivity2D) -> Self {
        Self { connectivity }
    }

    /// The connectivity of this neighborhood
    pub fn connectivity(&self) -> Connectivity2D {
        self.connectivity
    }

    /// Relative shifts of the neighbors
    pub fn offsets(&self) -> &'static [(isize, isize)] {
        match self.connectivity {
            Connectivity2D::Four => &OFFSETS_4,
            Connectivity2D::Eight => &OFFSETS_8,
        }
    }

    /// Neighbor coordinates of `(x, y)`, not bounds-checked
    pub fn neighbors(&self, x: isize, y: isize) -> impl Iterator<Item = (isize, isize)> + use<> {
        self.offsets().iter().map(move |&(dx, dy)| (x + dx, y + dy))
    }

    /// Neighbor coordinates tagged with validity against `extent`
    pub fn neighbors_in(
        &self,
        extent: Extent,
        x: isize,
        y: isize,
    ) -> impl Iterator<Item = ((isize, isize), bool)> + use<> {
        self.neighbors(x, y)
            .map(move |(nx, ny)| ((nx, ny), extent.contains(nx, ny, 0)))
    }

    /// Shifts as 3D offsets with `dz == 0`
    pub fn offsets_3d(&self) -> Vec<(isize, isize, isize)> {
        self.offsets().iter().map(|&(dx, dy)| (dx, dy, 0)).collect()
    }
}

/// Volumetric neighborhood
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Neighborhood3D {
    connectivity: Connectivity3D,
    offsets: Vec<(isize, isize, isize)>,
}

impl Neighborhood3D {
    /// Create a neighborhood from a connectivity value (6 or 26)
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConnectivity`] for any other value.
    pub fn new(connectivity: u32) -> Result<Self> {
        Connectivity3D::from_value(connectivity).map(Self::from_connectivity)
    }

    /// Create a neighborhood from a parsed connectivity
    pub fn from_connectivity(connectivity: Connectivity3D) -> Self {
        let offsets = match connectivity {
            Connectivity3D::Six => OFFSETS_6.to_vec(),
            Connectivity3D::TwentySix => {
                let mut v = Vec::with_capacity(26);
                for dz in -1..=1 {
                    for dy in -1..=1 {
                        for dx in -1..=1 {
                            if (dx, dy, dz) != (0, 0, 0) {
                                v.push((dx, dy, dz));
                            }
                        }
                    }
                }
                v
            }
        };
        Self {
            connectivity,
            offsets,
        }
    }

    /// The connectivity of this neighborhood
    pub fn connectivity(&self) -> Connectivity3D {
        self.connectivity
    }

    /// Relative shifts of the neighbors
    pub fn offsets(&self) -> &[(isize, isize, isize)] {
        &self.offsets
    }

    /// Neighbor coordinates of `(x, y, z)`, not bounds-checked
    pub fn neighbors(
        &self,
        x: isize,
        y: isize,
        z: isize,
    ) -> impl Iterator<Item = (isize, isize, isize)> + '_ {
        self.offsets
            .iter()
            .map(move |&(dx, dy, dz)| (x + dx, y + dy, z + dz))
    }

    /// Neighbor coordinates tagged with validity against `extent`
    pub fn neighbors_in(
        &self,
        extent: Extent,
        x: isize,
        y: isize,
        z: isize,
    ) -> impl Iterator<Item = ((isize, isize, isize), bool)> + '_ {
        self.neighbors(x, y, z)
            .map(move |(nx, ny, nz)| ((nx, ny, nz), extent.contains(nx, ny, nz)))
    }
}

/// Neighbor shifts for a connectivity of either dimensionality
pub fn offsets_for(connectivity: Connectivity) -> Vec<(isize, isize, isize)> {
    match connectivity {
        Connectivity::Planar(c) => Neighborhood2D::from_connectivity(c).offsets_3d(),
        Connectivity::Volumetric(c) => Neighborhood3D::from_connectivity(c).offsets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connectivity_values() {
        assert_eq!(Connectivity2D::from_value(4).unwrap(), Connectivity2D::Four);
        assert_eq!(Connectivity2D::try_from(8).unwrap(), Connectivity2D::Eight);
        assert_eq!(
            Connectivity3D::from_value(26).unwrap(),
            Connectivity3D::TwentySix
        );
        assert!(Connectivity3D::from_value(8).is_err());
        assert!(Connectivity::from_value(5).is_err());
    }

    #[test]
    fn test_planar_rejects_3d_value() {
        let err = Neighborhood2D::new(6).unwrap_err();
        assert_eq!(err, Error::InvalidConnectivity { value: 6, dims: 2 });
        let c = Connectivity::from_value(26).unwrap();
        assert!(c.planar().is_err());
        assert!(c.volumetric().is_ok());
    }

    #[test]
    fn test_neighbor_counts() {
        assert_eq!(Neighborhood2D::new(4).unwrap().neighbors(3, 3).count(), 4);
        assert_eq!(Neighborhood2D::new(8).unwrap().neighbors(3, 3).count(), 8);
        assert_eq!(Neighborhood3D::new(6).unwrap().neighbors(1, 1, 1).count(), 6);
        assert_eq!(
            Neighborhood3D::new(26).unwrap().neighbors(1, 1, 1).count(),
            26
        );
    }

    #[test]
    fn test_neighbors_are_bounds_agnostic() {
        let extent = Extent::new_2d(2, 2).unwrap();
        let n = Neighborhood2D::new(8).unwrap();
        let tagged: Vec<_> = n.neighbors_in(extent, 0, 0).collect();
        assert_eq!(tagged.len(), 8);
        assert_eq!(tagged.iter().filter(|(_, valid)| *valid).count(), 3);
    }

    #[test]
    fn test_26_neighborhood_is_symmetric() {
        let n = Neighborhood3D::new(26).unwrap();
        for &(dx, dy, dz) in n.offsets() {
            assert!(n.offsets().contains(&(-dx, -dy, -dz)));
        }
    }
}
