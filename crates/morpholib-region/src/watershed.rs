//! Watershed segmentation
//!
//! Vincent–Soille immersion simulation. The relief is flooded one
//! intensity level at a time, in ascending order. At each level the cells
//! adjacent to an existing basin are grown breadth-first from a FIFO queue,
//! cells where two basins meet become watershed cells, and any cells left
//! untouched start new basins.
//!
//! With a seed raster, positive seed values are basin labels fixed before
//! flooding starts and no new basins are created. Level cells no basin
//! reaches yet stay pending and join the flood front as soon as a basin
//! grows next to them, at whatever later level that happens; cells never
//! reached remain [`LABEL_BACKGROUND`].
//!
//! Output labels:
//!
//! | value | meaning                                    |
//! |-------|--------------------------------------------|
//! | 0     | outside the mask or level range, unreached |
//! | -1    | watershed line                             |
//! | 1..K  | catchment basins, in order of discovery    |
//!
//! # Examples
//!
//! ```
//! use morpholib_core::Raster2D;
//! use morpholib_region::{LABEL_WATERSHED, WatershedOptions, watershed_2d};
//!
//! // two valleys separated by a ridge in column 2
//! let relief = Raster2D::<u8>::from_rows(&[
//!     &[1, 2, 9, 2, 1],
//!     &[0, 2, 9, 2, 0],
//!     &[1, 2, 9, 2, 1],
//! ])
//! .unwrap();
//!
//! let options = WatershedOptions::default()
//!     .with_connectivity(4)
//!     .with_watershed_lines(true);
//! let labels = watershed_2d::<u8, u8>(&relief, None, None, &options).unwrap();
//! assert_eq!(labels.at(0, 1), 1);
//! assert_eq!(labels.at(4, 1), 2);
//! assert_eq!(labels.at(2, 1), LABEL_WATERSHED);
//! ```

use crate::error::RegionResult;
use crate::extract::{LevelRange, check_extent, in_scope_indices, sort_by_relief};
use log::{Level, log, trace};
use morpholib_core::{
    CancelToken, Connectivity, Connectivity2D, Connectivity3D, Extent, Monitor, Phase,
    ProgressObserver, Raster2D, Raster3D, Sample, offsets_for,
};
use std::cmp::Ordering;
use std::collections::VecDeque;
use std::sync::Arc;

/// Label of cells outside the flooded region
pub const LABEL_BACKGROUND: i32 = 0;

/// Label of watershed-line cells
pub const LABEL_WATERSHED: i32 = -1;

// working states; basins are > 0
const INIT: i32 = -1;
const MASK: i32 = -2;
const INQUEUE: i32 = -3;
const WSHED: i32 = -4;

/// Options for watershed segmentation
#[derive(Debug, Clone)]
pub struct WatershedOptions {
    /// Connectivity value; `None` means 8 in 2D and 26 in 3D
    pub connectivity: Option<u32>,
    /// Keep watershed lines; when false they are merged into basins
    pub compute_lines: bool,
    /// Log phase boundaries at info level instead of debug
    pub verbose: bool,
    /// Lowest relief value flooded (inclusive)
    pub h_min: Option<f64>,
    /// Highest relief value flooded (inclusive)
    pub h_max: Option<f64>,
    /// Progress observer and cancellation token
    pub monitor: Monitor,
}

impl Default for WatershedOptions {
    fn default() -> Self {
        Self {
            connectivity: None,
            compute_lines: true,
            verbose: false,
            h_min: None,
            h_max: None,
            monitor: Monitor::new(),
        }
    }
}

impl WatershedOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the connectivity (4 or 8 in 2D, 6 or 26 in 3D)
    ///
    /// The value is checked against the raster when the watershed runs.
    pub fn with_connectivity(mut self, connectivity: u32) -> Self {
        self.connectivity = Some(connectivity);
        self
    }

    /// Set whether watershed lines are kept
    pub fn with_watershed_lines(mut self, compute_lines: bool) -> Self {
        self.compute_lines = compute_lines;
        self
    }

    /// Set verbose logging
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Restrict flooding to relief values in `[h_min, h_max]`
    pub fn with_level_range(mut self, h_min: f64, h_max: f64) -> Self {
        self.h_min = Some(h_min);
        self.h_max = Some(h_max);
        self
    }

    /// Attach a progress observer
    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.monitor = self.monitor.with_observer(observer);
        self
    }

    /// Attach a cancellation token
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.monitor = self.monitor.with_cancel_token(token);
        self
    }

    fn planar_connectivity(&self) -> RegionResult<Connectivity> {
        let c = match self.connectivity {
            Some(v) => Connectivity2D::from_value(v)?,
            None => Connectivity2D::Eight,
        };
        Ok(c.into())
    }

    fn volumetric_connectivity(&self) -> RegionResult<Connectivity> {
        let c = match self.connectivity {
            Some(v) => Connectivity3D::from_value(v)?,
            None => Connectivity3D::TwentySix,
        };
        Ok(c.into())
    }

    fn level(&self) -> Level {
        if self.verbose { Level::Info } else { Level::Debug }
    }
}

/// Cell adjacency over a flat raster
struct Grid {
    extent: Extent,
    offsets: Vec<(isize, isize, isize)>,
}

impl Grid {
    #[inline]
    fn neighbors(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        let cell = self.extent.coords(index);
        let extent = self.extent;
        self.offsets
            .iter()
            .filter_map(move |&shift| extent.shifted_index(cell, shift))
    }
}

/// Flood state owned by one watershed call
struct Flood<'a, T> {
    grid: Grid,
    relief: &'a [T],
    labels: Vec<i32>,
    queue: VecDeque<usize>,
    next_label: i32,
}

impl<'a, T: Sample> Flood<'a, T> {
    fn new(relief: &'a [T], grid: Grid) -> Self {
        Self {
            labels: vec![INIT; relief.len()],
            grid,
            relief,
            queue: VecDeque::new(),
            next_label: 1,
        }
    }

    /// Pre-label seed cells; returns the number of seeded cells
    fn seed<M: Sample>(&mut self, seeds: &[i32], mask: Option<&[M]>) -> usize {
        let mut count = 0;
        for (i, &s) in seeds.iter().enumerate() {
            if s > 0 && mask.is_none_or(|m| m[i].is_foreground()) {
                self.labels[i] = s;
                self.next_label = self.next_label.max(s.saturating_add(1));
                count += 1;
            }
        }
        count
    }

    /// Mark the level batch and queue cells touching a basin or a line
    fn enter_level(&mut self, batch: &[usize]) {
        for &p in batch {
            if self.labels[p] == INIT {
                self.labels[p] = MASK;
            }
        }
        for &p in batch {
            if self.labels[p] != MASK {
                continue;
            }
            let touches = self
                .grid
                .neighbors(p)
                .any(|q| self.labels[q] > 0 || self.labels[q] == WSHED);
            if touches {
                self.labels[p] = INQUEUE;
                self.queue.push_back(p);
            }
        }
    }

    /// Breadth-first resolution of the queued cells
    fn resolve_queue(&mut self) {
        while let Some(p) = self.queue.pop_front() {
            let mut flag = false;
            for q in self.grid.neighbors(p) {
                let lq = self.labels[q];
                let lp = self.labels[p];
                if lq > 0 {
                    if lp == INQUEUE || (lp == WSHED && flag) {
                        self.labels[p] = lq;
                    } else if lp > 0 && lp != lq {
                        self.labels[p] = WSHED;
                        flag = false;
                    }
                } else if lq == WSHED {
                    if lp == INQUEUE {
                        self.labels[p] = WSHED;
                        flag = true;
                    }
                } else if lq == MASK {
                    self.labels[q] = INQUEUE;
                    self.queue.push_back(q);
                }
            }
            if self.labels[p] == INQUEUE {
                self.labels[p] = WSHED;
            }
        }
    }

    /// Turn every connected run of untouched level cells into a new basin;
    /// returns the number of basins created
    fn new_minima(&mut self, batch: &[usize]) -> usize {
        let mut created = 0;
        for &p in batch {
            if self.labels[p] != MASK {
                continue;
            }
            let label = self.next_label;
            self.next_label += 1;
            created += 1;
            self.labels[p] = label;
            self.queue.push_back(p);
            while let Some(c) = self.queue.pop_front() {
                for q in self.grid.neighbors(c) {
                    if self.labels[q] == MASK {
                        self.labels[q] = label;
                        self.queue.push_back(q);
                    }
                }
            }
        }
        created
    }

    /// Merge watershed cells into the neighbor basin of lowest relief;
    /// returns the number of cells left as watershed
    fn merge_lines(&mut self, monitor: &Monitor) -> RegionResult<usize> {
        let relief = self.relief;
        let mut pending: Vec<usize> = (0..self.labels.len())
            .filter(|&i| self.labels[i] == WSHED)
            .collect();
        sort_by_relief(&mut pending, relief);

        while !pending.is_empty() {
            monitor.check_cancelled()?;
            let before = pending.len();
            let mut rest = Vec::new();
            for p in pending {
                let best = self
                    .grid
                    .neighbors(p)
                    .filter(|&q| self.labels[q] > 0)
                    .min_by(|&a, &b| {
                        relief[a]
                            .partial_cmp(&relief[b])
                            .unwrap_or(Ordering::Equal)
                            .then(self.labels[a].cmp(&self.labels[b]))
                    });
                match best {
                    Some(q) => self.labels[p] = self.labels[q],
                    None => rest.push(p),
                }
            }
            if rest.len() == before {
                return Ok(rest.len());
            }
            pending = rest;
        }
        Ok(0)
    }

    fn into_labels(self) -> Vec<i32> {
        self.labels
            .into_iter()
            .map(|l| match l {
                l if l > 0 => l,
                WSHED => LABEL_WATERSHED,
                _ => LABEL_BACKGROUND,
            })
            .collect()
    }
}

/// Run the flood over a flat raster
fn flood<T: Sample, M: Sample>(
    relief: &[T],
    extent: Extent,
    seeds: Option<&[i32]>,
    mask: Option<&[M]>,
    connectivity: Connectivity,
    options: &WatershedOptions,
) -> RegionResult<Vec<i32>> {
    let level = options.level();
    let monitor = &options.monitor;
    let range = LevelRange::new(options.h_min, options.h_max)?;
    log!(
        level,
        "watershed: {}x{}x{}, connectivity {}, seeded {}, masked {}, lines {}",
        extent.width,
        extent.height,
        extent.depth,
        connectivity.value(),
        seeds.is_some(),
        mask.is_some(),
        options.compute_lines
    );

    monitor.begin(Phase::Extraction)?;
    let mut cells = in_scope_indices(relief, mask, extent, range);
    monitor.end(Phase::Extraction);
    monitor.begin(Phase::Sort)?;
    sort_by_relief(&mut cells, relief);
    monitor.end(Phase::Sort);
    log!(level, "watershed: {} cells sorted", cells.len());

    let grid = Grid {
        extent,
        offsets: offsets_for(connectivity),
    };
    let mut state = Flood::new(relief, grid);
    if let Some(seeds) = seeds {
        let seeded = state.seed(seeds, mask);
        log!(level, "watershed: {} seed cells", seeded);
    }

    monitor.begin(Phase::Flood)?;
    let total = cells.len();
    let mut levels = 0usize;
    let mut start = 0;
    while start < total {
        monitor.check_cancelled()?;
        let h = relief[cells[start]];
        let mut end = start + 1;
        while end < total && relief[cells[end]] == h {
            end += 1;
        }

        let batch = &cells[start..end];
        state.enter_level(batch);
        state.resolve_queue();
        // seeded floods leave unreached cells as MASK; resolve_queue picks
        // them up when a neighbor is popped at a later level
        if seeds.is_none() {
            let created = state.new_minima(batch);
            if created > 0 {
                trace!("watershed: level {:?}, {} new basins", h, created);
            }
        }

        levels += 1;
        start = end;
        monitor.progress(Phase::Flood, end, total);
    }
    monitor.end(Phase::Flood);
    if seeds.is_some() {
        let unreached = state.labels.iter().filter(|&&l| l == MASK).count();
        if unreached > 0 {
            log!(level, "watershed: {} cells unreached by any seed", unreached);
        }
    }
    log!(
        level,
        "watershed: {} levels, {} basin labels",
        levels,
        state.next_label - 1
    );

    if !options.compute_lines {
        monitor.begin(Phase::MergeLines)?;
        let left = state.merge_lines(monitor)?;
        monitor.end(Phase::MergeLines);
        if left > 0 {
            log!(level, "watershed: {} isolated line cells kept", left);
        }
    }

    Ok(state.into_labels())
}

/// Watershed of a planar relief
///
/// # Arguments
///
/// * `relief` - Relief to flood
/// * `seeds` - Optional marker labels; positive values seed basins
/// * `mask` - Optional region of interest; zero cells are not flooded
/// * `options` - Connectivity, line handling, level range and hooks
///
/// # Errors
///
/// Returns an error if the connectivity is not 4 or 8, if `seeds` or
/// `mask` differ in extent from `relief`, if the level range is empty, or
/// if the computation is cancelled.
pub fn watershed_2d<T: Sample, M: Sample>(
    relief: &Raster2D<T>,
    seeds: Option<&Raster2D<i32>>,
    mask: Option<&Raster2D<M>>,
    options: &WatershedOptions,
) -> RegionResult<Raster2D<i32>> {
    let connectivity = options.planar_connectivity()?;
    let extent = relief.extent();
    if let Some(s) = seeds {
        check_extent("seed", extent, s.extent())?;
    }
    if let Some(m) = mask {
        check_extent("mask", extent, m.extent())?;
    }
    let labels = flood(
        relief.as_slice(),
        extent,
        seeds.map(|s| s.as_slice()),
        mask.map(|m| m.as_slice()),
        connectivity,
        options,
    )?;
    Ok(Raster2D::from_extent(extent, labels)?)
}

/// Watershed of a volumetric relief
///
/// Same as [`watershed_2d`] with 6 or 26 connectivity.
pub fn watershed_3d<T: Sample, M: Sample>(
    relief: &Raster3D<T>,
    seeds: Option<&Raster3D<i32>>,
    mask: Option<&Raster3D<M>>,
    options: &WatershedOptions,
) -> RegionResult<Raster3D<i32>> {
    let connectivity = options.volumetric_connectivity()?;
    let extent = relief.extent();
    if let Some(s) = seeds {
        check_extent("seed", extent, s.extent())?;
    }
    if let Some(m) = mask {
        check_extent("mask", extent, m.extent())?;
    }
    let labels = flood(
        relief.as_slice(),
        extent,
        seeds.map(|s| s.as_slice()),
        mask.map(|m| m.as_slice()),
        connectivity,
        options,
    )?;
    Ok(Raster3D::from_extent(extent, labels)?)
}
