use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use morpholib_core::{Raster2D, Raster3D};
use morpholib_distance::{
    ChamferPreset2D, ChamferPreset3D, DistanceTransformOptions, distance_map_2d_f32,
    distance_map_2d_u16, distance_map_3d_u16,
};

fn sparse_background_2d(width: usize, height: usize) -> Raster2D<u8> {
    let mut data = vec![1u8; width * height];
    for i in 0..width.min(height) {
        if i % 10 == 0 {
            data[i * width + i] = 0;
        }
    }
    Raster2D::from_data(width, height, data).unwrap()
}

fn bench_distance_2d(c: &mut Criterion) {
    let mut group = c.benchmark_group("ChamferDistance2D");
    let options = DistanceTransformOptions::default();

    for (width, height) in [(256, 256), (512, 512), (1024, 1024)].iter() {
        group.throughput(Throughput::Elements((*width * *height) as u64));
        let parameter_string = format!("{width}x{height}");
        let input = sparse_background_2d(*width, *height);

        for preset in [ChamferPreset2D::Borgefors, ChamferPreset2D::ChessKnight] {
            let mask = preset.mask();
            group.bench_with_input(
                BenchmarkId::new(format!("u16 {}", preset.name()), &parameter_string),
                &input,
                |b, i| b.iter(|| std::hint::black_box(distance_map_2d_u16(i, &mask, &options))),
            );
        }

        let mask = ChamferPreset2D::QuasiEuclidean.mask();
        group.bench_with_input(
            BenchmarkId::new("f32 quasi-euclidean", &parameter_string),
            &input,
            |b, i| b.iter(|| std::hint::black_box(distance_map_2d_f32(i, &mask, &options))),
        );
    }

    group.finish();
}

fn bench_distance_3d(c: &mut Criterion) {
    let mut group = c.benchmark_group("ChamferDistance3D");
    let options = DistanceTransformOptions::default();

    for size in [32usize, 64].iter() {
        group.throughput(Throughput::Elements((size * size * size) as u64));
        let mut input = Raster3D::new_with_value(*size, *size, *size, 1u8).unwrap();
        input.set(size / 2, size / 2, size / 2, 0).unwrap();

        for preset in [ChamferPreset3D::Borgefors, ChamferPreset3D::Weights10_14_17_22_34_30] {
            let mask = preset.mask();
            group.bench_with_input(
                BenchmarkId::new(preset.name(), size),
                &input,
                |b, i| b.iter(|| std::hint::black_box(distance_map_3d_u16(i, &mask, &options))),
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_distance_2d, bench_distance_3d);
criterion_main!(benches);
