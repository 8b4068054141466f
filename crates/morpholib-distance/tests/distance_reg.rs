//! Chamfer distance transform regression test
//!
//! Covers:
//! 1. Single background cell: chessboard gives Chebyshev, city-block gives
//!    Manhattan distance (2D and 3D)
//! 2. The 5x5 reference scenario
//! 3. Normalization against the raw map for every preset
//! 4. Monotonicity along rays leaving the background cell
//! 5. Label rasters measured to their own boundary
//! 6. Progress reporting and cancellation during a pass
//!
//! Run with:
//! ```
//! cargo test -p morpholib-distance --test distance_reg
//! ```

use morpholib_core::{CancelToken, Error, Phase, ProgressObserver, Raster2D, Raster3D};
use morpholib_distance::{
    ChamferMask, ChamferMask2D, ChamferPreset2D, ChamferPreset3D, DistanceError,
    DistanceTransformOptions, distance_map_2d_f32, distance_map_2d_u16, distance_map_3d_u16,
};
use morpholib_test::RegParams;
use std::sync::{Arc, Mutex};

fn raw() -> DistanceTransformOptions {
    DistanceTransformOptions::new().with_normalize(false)
}

/// All-foreground raster with one background cell
fn single_background(w: usize, h: usize, bx: usize, by: usize) -> Raster2D<u8> {
    let mut r = Raster2D::new_with_value(w, h, 255u8).unwrap();
    r.set(bx, by, 0).unwrap();
    r
}

#[test]
fn distance_chebyshev_manhattan() {
    let mut rp = RegParams::new("distance_metrics");

    let (w, h, bx, by) = (9usize, 7usize, 3usize, 4usize);
    let input = single_background(w, h, bx, by);

    let chess = distance_map_2d_u16(&input, &ChamferPreset2D::Chessboard.mask(), &raw()).unwrap();
    let city = distance_map_2d_u16(&input, &ChamferPreset2D::CityBlock.mask(), &raw()).unwrap();

    let mut cheb = Raster2D::<u16>::new(w, h).unwrap();
    let mut manh = Raster2D::<u16>::new(w, h).unwrap();
    for y in 0..h {
        for x in 0..w {
            let dx = (x as i64 - bx as i64).unsigned_abs();
            let dy = (y as i64 - by as i64).unsigned_abs();
            cheb.set(x, y, dx.max(dy) as u16).unwrap();
            manh.set(x, y, (dx + dy) as u16).unwrap();
        }
    }
    rp.compare_rasters(&cheb, &chess.raster);
    rp.compare_rasters(&manh, &city.raster);
    rp.compare_values(5.0, chess.max_distance as f64, 0.0);
    rp.compare_values(9.0, city.max_distance as f64, 0.0);

    // 3D, 5x5x5 with the background voxel off-center
    let (bx, by, bz) = (1usize, 2usize, 3usize);
    let mut volume = Raster3D::new_with_value(5, 5, 5, 1u8).unwrap();
    volume.set(bx, by, bz, 0).unwrap();
    let chess3 =
        distance_map_3d_u16(&volume, &ChamferPreset3D::Chessboard.mask(), &raw()).unwrap();
    let city3 = distance_map_3d_u16(&volume, &ChamferPreset3D::CityBlock.mask(), &raw()).unwrap();
    let mut cheb3 = Raster3D::<u16>::new(5, 5, 5).unwrap();
    let mut manh3 = Raster3D::<u16>::new(5, 5, 5).unwrap();
    for z in 0..5 {
        for y in 0..5 {
            for x in 0..5 {
                let d = [
                    (x as i64 - bx as i64).unsigned_abs(),
                    (y as i64 - by as i64).unsigned_abs(),
                    (z as i64 - bz as i64).unsigned_abs(),
                ];
                let max = d.iter().copied().max().unwrap_or(0);
                cheb3.set(x, y, z, max as u16).unwrap();
                manh3.set(x, y, z, d.iter().sum::<u64>() as u16).unwrap();
            }
        }
    }
    rp.compare_rasters(&cheb3, &chess3.raster);
    rp.compare_rasters(&manh3, &city3.raster);

    assert!(rp.cleanup(), "distance metrics regression test failed");
}

#[test]
fn distance_five_by_five_scenario() {
    let mut rp = RegParams::new("distance_5x5");

    let input = single_background(5, 5, 2, 2);
    let map = distance_map_2d_u16(&input, &ChamferPreset2D::Chessboard.mask(), &raw()).unwrap();

    let expected = Raster2D::<u16>::from_rows(&[
        &[2, 2, 2, 2, 2],
        &[2, 1, 1, 1, 2],
        &[2, 1, 0, 1, 2],
        &[2, 1, 1, 1, 2],
        &[2, 2, 2, 2, 2],
    ])
    .unwrap();
    rp.compare_rasters(&expected, &map.raster);
    rp.compare_values(2.0, map.max_distance as f64, 0.0);

    assert!(rp.cleanup(), "5x5 distance scenario failed");
}

#[test]
fn distance_normalization() {
    let mut rp = RegParams::new("distance_normalize");

    // two background cells so that several paths compete
    let mut input = single_background(15, 11, 2, 3);
    input.set(11, 8, 0).unwrap();

    for preset in ChamferPreset2D::ALL {
        let mask = preset.mask();
        eprintln!("  {}", preset.name());

        let raw_u16 = distance_map_2d_u16(&input, &mask, &raw()).unwrap();
        let norm_u16 =
            distance_map_2d_u16(&input, &mask, &DistanceTransformOptions::default()).unwrap();
        let n = mask.normalization_weight() as f64;
        let mut worst = 0.0f64;
        for (&r, &v) in raw_u16.raster.as_slice().iter().zip(norm_u16.raster.as_slice()) {
            worst = worst.max((r as f64 / n - v as f64).abs());
        }
        rp.compare_values(0.0, worst, 0.5);

        let raw_f32 = distance_map_2d_f32(&input, &mask, &raw()).unwrap();
        let norm_f32 =
            distance_map_2d_f32(&input, &mask, &DistanceTransformOptions::default()).unwrap();
        let nf = mask.float_normalization_weight();
        let mut worst = 0.0f32;
        for (&r, &v) in raw_f32.raster.as_slice().iter().zip(norm_f32.raster.as_slice()) {
            worst = worst.max((r / nf - v).abs());
        }
        rp.compare_values(0.0, worst as f64, 1e-5);
    }

    assert!(rp.cleanup(), "distance normalization regression test failed");
}

#[test]
fn distance_monotonic_along_rays() {
    let mut rp = RegParams::new("distance_monotonic");

    let (w, h, cx, cy) = (21usize, 21usize, 10isize, 10isize);
    let input = single_background(w, h, cx as usize, cy as usize);
    let directions = [
        (1, 0),
        (-1, 0),
        (0, 1),
        (0, -1),
        (1, 1),
        (1, -1),
        (-1, 1),
        (-1, -1),
    ];

    for preset in ChamferPreset2D::ALL {
        let map = distance_map_2d_f32(&input, &preset.mask(), &raw()).unwrap();
        let mut violations = 0;
        for (dx, dy) in directions {
            let mut prev = 0.0f32;
            for k in 1..=10isize {
                let v = map.raster.at((cx + k * dx) as usize, (cy + k * dy) as usize);
                if v <= prev {
                    violations += 1;
                }
                prev = v;
            }
        }
        eprintln!("  {}: {} violations", preset.name(), violations);
        rp.compare_values(0.0, violations as f64, 0.0);
    }

    assert!(rp.cleanup(), "distance monotonicity regression test failed");
}

#[test]
fn distance_label_raster() {
    let mut rp = RegParams::new("distance_labels");

    // background frame around two abutting regions
    let input = Raster2D::<u16>::from_rows(&[
        &[0, 0, 0, 0, 0, 0, 0, 0],
        &[0, 1, 1, 1, 2, 2, 2, 0],
        &[0, 1, 1, 1, 2, 2, 2, 0],
        &[0, 1, 1, 1, 2, 2, 2, 0],
        &[0, 0, 0, 0, 0, 0, 0, 0],
    ])
    .unwrap();
    let map = distance_map_2d_u16(&input, &ChamferPreset2D::CityBlock.mask(), &raw()).unwrap();
    let expected = Raster2D::<u16>::from_rows(&[
        &[0, 0, 0, 0, 0, 0, 0, 0],
        &[0, 1, 1, 1, 1, 1, 1, 0],
        &[0, 1, 2, 1, 1, 2, 1, 0],
        &[0, 1, 1, 1, 1, 1, 1, 0],
        &[0, 0, 0, 0, 0, 0, 0, 0],
    ])
    .unwrap();
    rp.compare_rasters(&expected, &map.raster);

    // the same shape as a single region: the seam disappears
    let merged = input.map(|v| if v > 0 { 1u16 } else { 0 });
    let map = distance_map_2d_u16(&merged, &ChamferPreset2D::CityBlock.mask(), &raw()).unwrap();
    rp.compare_values(2.0, map.raster.at(3, 2) as f64, 0.0);
    rp.compare_values(2.0, map.raster.at(4, 2) as f64, 0.0);

    assert!(rp.cleanup(), "label raster distance regression test failed");
}

#[test]
fn distance_custom_weights() {
    let mut rp = RegParams::new("distance_custom");

    let input = single_background(7, 7, 0, 0);
    let mask = ChamferMask2D::from_weights(&[5, 7, 11]).unwrap();
    let map = distance_map_2d_u16(&input, &mask, &raw()).unwrap();
    rp.compare_values(5.0, map.raster.at(1, 0) as f64, 0.0);
    rp.compare_values(7.0, map.raster.at(1, 1) as f64, 0.0);
    rp.compare_values(11.0, map.raster.at(2, 1) as f64, 0.0);
    rp.compare_values(14.0, map.raster.at(2, 2) as f64, 0.0);

    let err = ChamferMask2D::from_weights(&[1, 2, 3, 4]).unwrap_err();
    rp.compare_values(
        1.0,
        if matches!(err, DistanceError::InvalidWeights { dims: 2, .. }) {
            1.0
        } else {
            0.0
        },
        0.0,
    );

    assert!(rp.cleanup(), "custom weight regression test failed");
}

/// Records phases and cancels once a given number of forward scanlines
/// are done
struct CancelAfter {
    token: CancelToken,
    rows: usize,
    phases: Mutex<Vec<Phase>>,
}

impl ProgressObserver for CancelAfter {
    fn phase_started(&self, phase: Phase) {
        self.phases.lock().unwrap().push(phase);
    }

    fn progress(&self, phase: Phase, done: usize, _total: usize) {
        if phase == Phase::ForwardPass && done == self.rows {
            self.token.cancel();
        }
    }
}

#[test]
fn distance_progress_and_cancellation() {
    let mut rp = RegParams::new("distance_cancel");
    let input = single_background(16, 16, 8, 8);
    let mask = ChamferPreset2D::Borgefors.mask();

    // never cancels: every phase is reported in order
    let observer = Arc::new(CancelAfter {
        token: CancelToken::new(),
        rows: usize::MAX,
        phases: Mutex::new(Vec::new()),
    });
    let options = DistanceTransformOptions::new().with_observer(observer.clone());
    rp.compare_values(
        1.0,
        if distance_map_2d_u16(&input, &mask, &options).is_ok() {
            1.0
        } else {
            0.0
        },
        0.0,
    );
    let phases = observer.phases.lock().unwrap().clone();
    rp.compare_values(
        1.0,
        if phases
            == vec![
                Phase::Initialize,
                Phase::ForwardPass,
                Phase::BackwardPass,
                Phase::Normalize,
            ] {
            1.0
        } else {
            0.0
        },
        0.0,
    );

    // cancelled after three scanlines of the forward pass
    let token = CancelToken::new();
    let observer = Arc::new(CancelAfter {
        token: token.clone(),
        rows: 3,
        phases: Mutex::new(Vec::new()),
    });
    let options = DistanceTransformOptions::new()
        .with_observer(observer.clone())
        .with_cancel_token(token);
    let result = distance_map_2d_u16(&input, &mask, &options);
    rp.compare_values(
        1.0,
        if result == Err(DistanceError::Core(Error::Cancelled)) {
            1.0
        } else {
            0.0
        },
        0.0,
    );
    let phases = observer.phases.lock().unwrap().clone();
    rp.compare_values(
        1.0,
        if !phases.contains(&Phase::BackwardPass) {
            1.0
        } else {
            0.0
        },
        0.0,
    );

    assert!(rp.cleanup(), "distance cancellation regression test failed");
}
