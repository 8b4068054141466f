//! Segmentation pipelines built on the watershed
//!
//! Component labeling and gradient computation are supplied by the caller
//! through [`ComponentLabeling2D`] / [`ComponentLabeling3D`] and
//! [`GradientOperator2D`] / [`GradientOperator3D`]. Region statistics go
//! through [`RegionStatistics`], with [`MeanIntensity`] as the default, and
//! basin adjacency through [`RegionAdjacency`], with [`GridAdjacency`] as
//! the default.

use crate::error::{RegionError, RegionResult};
use crate::extract::check_extent;
use crate::watershed::{LABEL_WATERSHED, WatershedOptions, watershed_2d, watershed_3d};
use log::debug;
use morpholib_core::{Connectivity, Extent, Raster2D, Raster3D, Sample, offsets_for};
use std::collections::{BTreeSet, HashMap};

/// Labels the connected components of a planar binary raster with
/// consecutive positive integers; background stays 0
pub trait ComponentLabeling2D {
    /// Label the non-zero cells of `binary`
    fn label(&self, binary: &Raster2D<u8>) -> RegionResult<Raster2D<i32>>;
}

/// Volumetric counterpart of [`ComponentLabeling2D`]
pub trait ComponentLabeling3D {
    /// Label the non-zero cells of `binary`
    fn label(&self, binary: &Raster3D<u8>) -> RegionResult<Raster3D<i32>>;
}

/// Derives a relief from a planar grayscale raster
pub trait GradientOperator2D<T: Sample> {
    /// Relief sample type
    type Output: Sample;

    /// Compute the relief of `image`
    fn gradient(&self, image: &Raster2D<T>) -> RegionResult<Raster2D<Self::Output>>;
}

/// Derives a relief from a volumetric grayscale raster
pub trait GradientOperator3D<T: Sample> {
    /// Relief sample type
    type Output: Sample;

    /// Compute the relief of `image`
    fn gradient(&self, image: &Raster3D<T>) -> RegionResult<Raster3D<Self::Output>>;
}

/// Per-label statistics of a value raster
pub trait RegionStatistics {
    /// Mean value of each positive label
    ///
    /// `labels` and `values` are the same raster in linear order.
    fn means<T: Sample>(&self, labels: &[i32], values: &[T]) -> HashMap<i32, f64>;
}

/// Plain arithmetic mean per label
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanIntensity;

impl RegionStatistics for MeanIntensity {
    fn means<T: Sample>(&self, labels: &[i32], values: &[T]) -> HashMap<i32, f64> {
        region_means(labels, values)
    }
}

/// Mean value of each positive label
pub fn region_means<T: Sample>(labels: &[i32], values: &[T]) -> HashMap<i32, f64> {
    let mut sums: HashMap<i32, (f64, usize)> = HashMap::new();
    for (&l, &v) in labels.iter().zip(values) {
        if l > 0 {
            let entry = sums.entry(l).or_insert((0.0, 0));
            entry.0 += v.to_f64_lossy();
            entry.1 += 1;
        }
    }
    sums.into_iter()
        .map(|(l, (sum, n))| (l, sum / n as f64))
        .collect()
}

/// Pairs of basins that touch
pub trait RegionAdjacency {
    /// Adjacent label pairs `(a, b)` with `0 < a < b`, each listed once
    ///
    /// `labels` is a raster of `extent` in linear order.
    fn adjacent_pairs(&self, labels: &[i32], extent: Extent) -> Vec<(i32, i32)>;
}

/// Adjacency over the cell grid
///
/// Two basins are adjacent when a cell of one neighbors a cell of the
/// other, or when both neighbor the same watershed cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridAdjacency {
    connectivity: Connectivity,
}

impl GridAdjacency {
    /// Adjacency under `connectivity`
    pub fn new(connectivity: Connectivity) -> Self {
        Self { connectivity }
    }
}

impl RegionAdjacency for GridAdjacency {
    fn adjacent_pairs(&self, labels: &[i32], extent: Extent) -> Vec<(i32, i32)> {
        let offsets = offsets_for(self.connectivity);
        let mut pairs = BTreeSet::new();
        let mut around = Vec::with_capacity(offsets.len());
        for (i, &l) in labels.iter().enumerate() {
            if l <= 0 && l != LABEL_WATERSHED {
                continue;
            }
            let cell = extent.coords(i);
            around.clear();
            around.extend(
                offsets
                    .iter()
                    .filter_map(|&shift| extent.shifted_index(cell, shift))
                    .map(|n| labels[n])
                    .filter(|&n| n > 0),
            );
            if l > 0 {
                pairs.extend(
                    around
                        .iter()
                        .filter(|&&n| n != l)
                        .map(|&n| (l.min(n), l.max(n))),
                );
            } else {
                for (k, &a) in around.iter().enumerate() {
                    for &b in &around[k + 1..] {
                        if a != b {
                            pairs.insert((a.min(b), a.max(b)));
                        }
                    }
                }
            }
        }
        pairs.into_iter().collect()
    }
}

/// Merge adjacent basins whose means differ by at most `max_difference`
///
/// Pairs are joined in ascending order of mean difference (single linkage
/// over the initial means). Merged regions are renumbered `1..=M` in order
/// of their smallest original label; background and watershed cells are
/// left alone. Returns the number of regions.
fn merge_basins(
    labels: &mut [i32],
    pairs: &[(i32, i32)],
    means: &HashMap<i32, f64>,
    max_difference: f64,
) -> usize {
    let max_label = labels.iter().copied().max().unwrap_or(0).max(0) as usize;
    let mut parent: Vec<usize> = (0..=max_label).collect();

    fn root(parent: &mut [usize], mut id: usize) -> usize {
        while parent[id] != id {
            parent[id] = parent[parent[id]];
            id = parent[id];
        }
        id
    }

    let mut candidates: Vec<(f64, i32, i32)> = pairs
        .iter()
        .filter(|&&(a, b)| a > 0 && b > 0 && a.max(b) as usize <= max_label)
        .filter_map(|&(a, b)| {
            let (ma, mb) = (means.get(&a)?, means.get(&b)?);
            let diff = (ma - mb).abs();
            (diff <= max_difference).then_some((diff, a, b))
        })
        .collect();
    candidates.sort_by(|x, y| x.0.total_cmp(&y.0).then((x.1, x.2).cmp(&(y.1, y.2))));

    for (diff, a, b) in candidates {
        let (ra, rb) = (root(&mut parent, a as usize), root(&mut parent, b as usize));
        if ra != rb {
            // the smaller label stays the representative
            parent[ra.max(rb)] = ra.min(rb);
            debug!("hierarchy: merge {} and {} (difference {:.3})", a, b, diff);
        }
    }

    let mut present = vec![false; max_label + 1];
    for &l in labels.iter().filter(|&&l| l > 0) {
        present[l as usize] = true;
    }
    let mut renumber = vec![0i32; max_label + 1];
    let mut next = 0;
    for l in (1..=max_label).filter(|&l| present[l]) {
        let r = root(&mut parent, l);
        if renumber[r] == 0 {
            next += 1;
            renumber[r] = next;
        }
    }
    for l in labels.iter_mut().filter(|l| **l > 0) {
        *l = renumber[root(&mut parent, *l as usize)];
    }
    next as usize
}

fn check_max_difference(max_difference: f64) -> RegionResult<()> {
    if max_difference.is_nan() || max_difference < 0.0 {
        return Err(RegionError::InvalidParameters(format!(
            "invalid merge threshold {}",
            max_difference
        )));
    }
    Ok(())
}

fn paint(labels: &[i32], means: &HashMap<i32, f64>) -> Vec<f32> {
    labels
        .iter()
        .map(|l| means.get(l).map_or(0.0, |&m| m as f32))
        .collect()
}

/// Paint every basin of `labels` with the mean of `image` over that basin
///
/// Background and watershed cells are 0.
pub fn mosaic_2d<T: Sample, S: RegionStatistics>(
    image: &Raster2D<T>,
    labels: &Raster2D<i32>,
    stats: &S,
) -> RegionResult<Raster2D<f32>> {
    check_extent("label", image.extent(), labels.extent())?;
    let means = stats.means(labels.as_slice(), image.as_slice());
    debug!("mosaic: {} regions", means.len());
    Ok(Raster2D::from_extent(
        image.extent(),
        paint(labels.as_slice(), &means),
    )?)
}

/// Volumetric counterpart of [`mosaic_2d`]
pub fn mosaic_3d<T: Sample, S: RegionStatistics>(
    image: &Raster3D<T>,
    labels: &Raster3D<i32>,
    stats: &S,
) -> RegionResult<Raster3D<f32>> {
    check_extent("label", image.extent(), labels.extent())?;
    let means = stats.means(labels.as_slice(), image.as_slice());
    debug!("mosaic: {} regions", means.len());
    Ok(Raster3D::from_extent(
        image.extent(),
        paint(labels.as_slice(), &means),
    )?)
}

/// Marker-controlled watershed of a planar grayscale image
///
/// The relief is the gradient of `image`; the seeds are the labelled
/// components of `markers`.
pub fn marker_controlled_segmentation_2d<T, L, G>(
    image: &Raster2D<T>,
    markers: &Raster2D<u8>,
    labeler: &L,
    gradient: &G,
    options: &WatershedOptions,
) -> RegionResult<Raster2D<i32>>
where
    T: Sample,
    L: ComponentLabeling2D,
    G: GradientOperator2D<T>,
{
    check_extent("marker", image.extent(), markers.extent())?;
    let relief = gradient.gradient(image)?;
    check_extent("gradient", image.extent(), relief.extent())?;
    let seeds = labeler.label(markers)?;
    check_extent("seed", image.extent(), seeds.extent())?;
    watershed_2d::<G::Output, u8>(&relief, Some(&seeds), None, options)
}

/// Marker-controlled watershed of a volumetric grayscale image
pub fn marker_controlled_segmentation_3d<T, L, G>(
    image: &Raster3D<T>,
    markers: &Raster3D<u8>,
    labeler: &L,
    gradient: &G,
    options: &WatershedOptions,
) -> RegionResult<Raster3D<i32>>
where
    T: Sample,
    L: ComponentLabeling3D,
    G: GradientOperator3D<T>,
{
    check_extent("marker", image.extent(), markers.extent())?;
    let relief = gradient.gradient(image)?;
    check_extent("gradient", image.extent(), relief.extent())?;
    let seeds = labeler.label(markers)?;
    check_extent("seed", image.extent(), seeds.extent())?;
    watershed_3d::<G::Output, u8>(&relief, Some(&seeds), None, options)
}

/// Hierarchical segmentation of a planar grayscale image
///
/// Floods the gradient of `image` without seeds, then merges adjacent
/// basins whose mean intensities over `image` differ by at most
/// `max_difference`, closest pairs first.
///
/// # Errors
///
/// Returns an error if `max_difference` is negative or NaN, if the gradient
/// differs in extent from `image`, or if the watershed fails.
pub fn hierarchical_segmentation_2d<T, G, A, S>(
    image: &Raster2D<T>,
    gradient: &G,
    adjacency: &A,
    stats: &S,
    max_difference: f64,
    options: &WatershedOptions,
) -> RegionResult<Raster2D<i32>>
where
    T: Sample,
    G: GradientOperator2D<T>,
    A: RegionAdjacency,
    S: RegionStatistics,
{
    check_max_difference(max_difference)?;
    let relief = gradient.gradient(image)?;
    check_extent("gradient", image.extent(), relief.extent())?;
    let mut labels = watershed_2d::<G::Output, u8>(&relief, None, None, options)?;
    let means = stats.means(labels.as_slice(), image.as_slice());
    let pairs = adjacency.adjacent_pairs(labels.as_slice(), labels.extent());
    let regions = merge_basins(labels.as_mut_slice(), &pairs, &means, max_difference);
    debug!("hierarchy: {} basins, {} regions", means.len(), regions);
    Ok(labels)
}

/// Volumetric counterpart of [`hierarchical_segmentation_2d`]
pub fn hierarchical_segmentation_3d<T, G, A, S>(
    image: &Raster3D<T>,
    gradient: &G,
    adjacency: &A,
    stats: &S,
    max_difference: f64,
    options: &WatershedOptions,
) -> RegionResult<Raster3D<i32>>
where
    T: Sample,
    G: GradientOperator3D<T>,
    A: RegionAdjacency,
    S: RegionStatistics,
{
    check_max_difference(max_difference)?;
    let relief = gradient.gradient(image)?;
    check_extent("gradient", image.extent(), relief.extent())?;
    let mut labels = watershed_3d::<G::Output, u8>(&relief, None, None, options)?;
    let means = stats.means(labels.as_slice(), image.as_slice());
    let pairs = adjacency.adjacent_pairs(labels.as_slice(), labels.extent());
    let regions = merge_basins(labels.as_mut_slice(), &pairs, &means, max_difference);
    debug!("hierarchy: {} basins, {} regions", means.len(), regions);
    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use morpholib_core::Connectivity2D;

    #[test]
    fn test_region_means() {
        let labels = [1, 1, 2, 0, LABEL_WATERSHED, 2];
        let values = [2u8, 4, 10, 99, 99, 20];
        let means = region_means(&labels, &values);
        assert_eq!(means.len(), 2);
        assert_eq!(means[&1], 3.0);
        assert_eq!(means[&2], 15.0);
    }

    #[test]
    fn test_mosaic_paints_means() {
        let image = Raster2D::<u8>::from_rows(&[&[2, 4, 50], &[10, 20, 30]]).unwrap();
        let labels = Raster2D::<i32>::from_rows(&[&[1, 1, -1], &[2, 2, 0]]).unwrap();
        let out = mosaic_2d(&image, &labels, &MeanIntensity).unwrap();
        assert_eq!(out.as_slice(), &[3.0, 3.0, 0.0, 15.0, 15.0, 0.0]);
    }

    #[test]
    fn test_mosaic_rejects_mismatch() {
        let image = Raster3D::<u8>::new(2, 2, 2).unwrap();
        let labels = Raster3D::<i32>::new(2, 2, 1).unwrap();
        let err = mosaic_3d(&image, &labels, &MeanIntensity).unwrap_err();
        assert!(matches!(err, RegionError::DimensionMismatch { what: "label", .. }));
    }

    #[test]
    fn test_grid_adjacency_across_lines() {
        let labels = [1, 1, -1, 2, 0, 3, 3, 3, 0, 0];
        let extent = Extent::new_2d(5, 2).unwrap();
        let four = GridAdjacency::new(Connectivity::Planar(Connectivity2D::Four));
        // 1-3 touch directly, 1-2 and 2-3 only through the line cell
        assert_eq!(four.adjacent_pairs(&labels, extent), vec![(1, 2), (1, 3), (2, 3)]);

        let labels = [1, 0, 2, 0, 0, 0];
        let extent = Extent::new_2d(3, 2).unwrap();
        assert!(four.adjacent_pairs(&labels, extent).is_empty());
    }

    #[test]
    fn test_merge_basins_closest_first() {
        // 1 - 2 - 3 in a chain, means 10, 12, 30
        let mut labels = vec![1, 1, -1, 2, 2, -1, 3, 0];
        let means = HashMap::from([(1, 10.0), (2, 12.0), (3, 30.0)]);
        let pairs = [(1, 2), (2, 3)];
        let regions = merge_basins(&mut labels, &pairs, &means, 5.0);
        assert_eq!(regions, 2);
        assert_eq!(labels, vec![1, 1, -1, 1, 1, -1, 2, 0]);

        let mut labels = vec![1, 2, 3];
        assert_eq!(merge_basins(&mut labels, &pairs, &means, 100.0), 1);
        assert_eq!(labels, vec![1, 1, 1]);

        let mut labels = vec![3, 2, 1];
        assert_eq!(merge_basins(&mut labels, &pairs, &means, 0.0), 3);
        assert_eq!(labels, vec![3, 2, 1]);
    }

    #[test]
    fn test_hierarchy_rejects_bad_threshold() {
        struct Identity;
        impl GradientOperator2D<u8> for Identity {
            type Output = u8;
            fn gradient(&self, image: &Raster2D<u8>) -> RegionResult<Raster2D<u8>> {
                Ok(image.clone())
            }
        }
        let image = Raster2D::<u8>::new(3, 3).unwrap();
        let adjacency = GridAdjacency::new(Connectivity::Planar(Connectivity2D::Eight));
        for bad in [-1.0, f64::NAN] {
            let err = hierarchical_segmentation_2d(
                &image,
                &Identity,
                &adjacency,
                &MeanIntensity,
                bad,
                &WatershedOptions::new(),
            )
            .unwrap_err();
            assert!(matches!(err, RegionError::InvalidParameters(_)));
        }
    }
}
