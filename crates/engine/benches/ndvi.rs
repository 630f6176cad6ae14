//! Benchmarks for NDVI computation and classification

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use verdant_core::{GeoTransform, Raster};
use verdant_engine::{classify, ndvi, ClassScheme, NdviParams, Sensor};

fn create_band(size: usize, base: f64) -> Raster<f64> {
    let mut r = Raster::new(size, size);
    r.set_transform(GeoTransform::new(0.0, size as f64, 1.0, -1.0));
    for row in 0..size {
        for col in 0..size {
            let v = base + ((row * 7 + col * 13) % 2000) as f64;
            r.set(row, col, v).unwrap();
        }
    }
    r
}

fn bench_ndvi(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine/ndvi");
    let params = NdviParams::for_sensor(Sensor::Sentinel2);
    for size in [256, 512, 1024, 2048] {
        let red = create_band(size, 400.0);
        let nir = create_band(size, 1500.0);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| ndvi(black_box(&red), black_box(&nir), black_box(&params)).unwrap())
        });
    }
    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine/classify");
    let params = NdviParams::for_sensor(Sensor::Sentinel2);
    let scheme = ClassScheme::five_class();
    for size in [256, 512, 1024, 2048] {
        let red = create_band(size, 400.0);
        let nir = create_band(size, 1500.0);
        let result = ndvi(&red, &nir, &params).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| classify(black_box(&result), black_box(&scheme)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_ndvi, bench_classify);
criterion_main!(benches);
