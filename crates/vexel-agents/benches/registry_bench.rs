use std::{hint::black_box, io::Cursor};

use criterion::{criterion_group, criterion_main, Criterion};
use image::{ImageFormat, Rgba, RgbaImage};
use vexel_agents::LoaderRegistry;
use vexel_core::{LoaderSettings, SourceData};
use vexel_telemetry::MetricsRegistry;

fn png_bytes() -> Vec<u8> {
    let img = RgbaImage::from_pixel(64, 64, Rgba([12, 34, 56, 255]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

fn bench_registry(c: &mut Criterion) {
    let metrics = MetricsRegistry::new();
    let registry = LoaderRegistry::with_default_loaders(LoaderSettings::default(), &metrics).unwrap();
    let bytes = png_bytes();
    let raw = vec![0u8; 64 * 64 * 4];

    // Keeps the entry alive so every iteration below is a cache hit.
    let _resident = registry
        .load_data(SourceData::Copied(&bytes), "png", "")
        .unwrap();

    let mut group = c.benchmark_group("Loader Registry");

    group.bench_function("Data hit (hash + share)", |b| {
        b.iter(|| {
            let handle = registry
                .load_data(SourceData::Copied(black_box(&bytes)), "png", "")
                .unwrap();
            black_box(handle.sharing());
        });
    });

    group.bench_function("Raw miss (open + destroy)", |b| {
        b.iter(|| {
            let handle = registry.load_raw(black_box(raw.as_slice()), 64, 64, false).unwrap();
            black_box(handle.id());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_registry);
criterion_main!(benches);
