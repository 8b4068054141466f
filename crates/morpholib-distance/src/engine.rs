//! Two-pass chamfer propagation over a flat raster
//!
//! The engine is written once over an [`Extent`] and flat slices. Planar
//! rasters use depth 1 and masks whose offsets all have `dz == 0`.
//!
//! Each pass writes into the distance buffer in place, so a cell sees the
//! values already updated earlier in the same pass. One forward and one
//! backward scan are therefore sufficient.

use crate::error::DistanceResult;
use crate::mask::{ChamferMask, WeightedOffset};
use crate::weight::DistanceWeight;
use log::{debug, trace};
use morpholib_core::{Extent, Monitor, Phase, Sample};

/// Mask offset resolved to the accumulator type
#[derive(Debug, Clone, Copy)]
struct Step<W> {
    dx: isize,
    dy: isize,
    dz: isize,
    weight: W,
}

fn resolve<W: DistanceWeight>(offsets: &[WeightedOffset]) -> Vec<Step<W>> {
    offsets
        .iter()
        .map(|o| Step {
            dx: o.dx,
            dy: o.dy,
            dz: o.dz,
            weight: W::from_offset(o),
        })
        .collect()
}

/// Output of one engine run
pub(crate) struct Propagated<W> {
    pub(crate) distances: Vec<W>,
    pub(crate) max_distance: W,
}

/// Compute the chamfer distance of every foreground cell of `labels`
pub(crate) fn propagate<T, W, M>(
    labels: &[T],
    extent: Extent,
    mask: &M,
    normalize: bool,
    monitor: &Monitor,
) -> DistanceResult<Propagated<W>>
where
    T: Sample,
    W: DistanceWeight,
    M: ChamferMask + ?Sized,
{
    debug!(
        "chamfer distance: {}x{}x{}, mask {}, normalize {}",
        extent.width,
        extent.height,
        extent.depth,
        mask.name().unwrap_or("custom"),
        normalize
    );

    monitor.begin(Phase::Initialize)?;
    let mut distances: Vec<W> = labels
        .iter()
        .map(|&v| if v.is_foreground() { W::INFINITE } else { W::zero() })
        .collect();
    monitor.end(Phase::Initialize);

    let forward = resolve::<W>(mask.forward_offsets());
    let backward = resolve::<W>(mask.backward_offsets());

    pass(labels, &mut distances, extent, &forward, Phase::ForwardPass, monitor)?;
    pass(labels, &mut distances, extent, &backward, Phase::BackwardPass, monitor)?;

    if normalize {
        monitor.begin(Phase::Normalize)?;
        let norm = W::normalization(mask);
        for (d, &v) in distances.iter_mut().zip(labels) {
            if v.is_foreground() && d.is_finite_distance() {
                *d = d.normalize(norm);
            }
        }
        monitor.end(Phase::Normalize);
    }

    let max_distance = labels
        .iter()
        .zip(&distances)
        .filter(|&(&v, d)| v.is_foreground() && d.is_finite_distance())
        .map(|(_, &d)| d)
        .fold(W::zero(), |acc, d| if d > acc { d } else { acc });
    debug!("chamfer distance: max distance {:?}", max_distance);

    Ok(Propagated {
        distances,
        max_distance,
    })
}

/// One directional scan; forward passes use `Phase::ForwardPass`
fn pass<T: Sample, W: DistanceWeight>(
    labels: &[T],
    distances: &mut [W],
    extent: Extent,
    steps: &[Step<W>],
    phase: Phase,
    monitor: &Monitor,
) -> DistanceResult<()> {
    monitor.begin(phase)?;
    let rows = extent.height * extent.depth;
    let ascending = phase != Phase::BackwardPass;

    for row in 0..rows {
        monitor.check_cancelled()?;
        let r = if ascending { row } else { rows - 1 - row };
        let z = r / extent.height;
        let y = r % extent.height;
        for col in 0..extent.width {
            let x = if ascending { col } else { extent.width - 1 - col };
            let idx = extent.index(x, y, z);
            let label = labels[idx];
            if !label.is_foreground() {
                continue;
            }

            let mut best = distances[idx];
            for step in steps {
                let Some(n) = extent.shifted_index((x, y, z), (step.dx, step.dy, step.dz)) else {
                    continue;
                };
                let candidate = if labels[n] != label {
                    step.weight
                } else {
                    distances[n].accumulate(step.weight)
                };
                if candidate < best {
                    best = candidate;
                }
            }
            distances[idx] = best;
        }
        monitor.progress(phase, row + 1, rows);
    }

    trace!("chamfer distance: {} done over {} scanlines", phase, rows);
    monitor.end(phase);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask2d::ChamferPreset2D;

    fn single_background(width: usize, height: usize, bx: usize, by: usize) -> Vec<u8> {
        let mut v = vec![1u8; width * height];
        v[by * width + bx] = 0;
        v
    }

    #[test]
    fn test_chessboard_is_chebyshev() {
        let extent = Extent::new_2d(7, 5).unwrap();
        let labels = single_background(7, 5, 2, 1);
        let mask = ChamferPreset2D::Chessboard.mask();
        let out: Propagated<u16> =
            propagate(&labels, extent, &mask, false, &Monitor::new()).unwrap();
        for y in 0..5 {
            for x in 0..7 {
                let expected = (x as i32 - 2).abs().max((y as i32 - 1).abs()) as u16;
                assert_eq!(out.distances[y * 7 + x], expected, "({x}, {y})");
            }
        }
        assert_eq!(out.max_distance, 4);
    }

    #[test]
    fn test_all_foreground_stays_infinite() {
        let extent = Extent::new_2d(3, 3).unwrap();
        let labels = vec![5u8; 9];
        let mask = ChamferPreset2D::Borgefors.mask();
        let out: Propagated<u16> =
            propagate(&labels, extent, &mask, true, &Monitor::new()).unwrap();
        assert!(out.distances.iter().all(|&d| d == u16::INFINITE));
        assert_eq!(out.max_distance, 0);
    }

    #[test]
    fn test_distinct_labels_touch_at_distance_one_weight() {
        // two labelled regions side by side, no background at all
        let extent = Extent::new_2d(4, 1).unwrap();
        let labels = vec![1u8, 1, 2, 2];
        let mask = ChamferPreset2D::Borgefors.mask();
        let out: Propagated<u16> =
            propagate(&labels, extent, &mask, false, &Monitor::new()).unwrap();
        assert_eq!(out.distances, vec![6, 3, 3, 6]);
    }
}
