//! Benchmarks for the Folio rendering pipeline.
//!
//! Run with: cargo bench -p folio-core

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use folio_core::render::encode::{normalize_rgb, resample_and_encode};
use folio_core::render::{DocumentRenderer, PageSize};
use folio_core::{Orientation, PageFormat, Quality, RenderConfig};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

fn sample_jpeg(width: u32, height: u32) -> Vec<u8> {
    let mut img = RgbImage::new(width, height);
    for (x, y, px) in img.enumerate_pixels_mut() {
        *px = Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8]);
    }
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buffer, ImageFormat::Jpeg)
        .unwrap();
    buffer.into_inner()
}

fn benchmark_fit(c: &mut Criterion) {
    let page = PageSize::new(PageFormat::A4, Orientation::Portrait);

    c.bench_function("fit_to_page", |b| {
        b.iter(|| page.fit(black_box(4032), black_box(3024)))
    });
}

fn benchmark_resample(c: &mut Criterion) {
    let img = normalize_rgb(DynamicImage::new_rgb8(1024, 768));
    let mut group = c.benchmark_group("resample_and_encode");
    group.sample_size(10);

    for quality in [Quality::High, Quality::Standard] {
        group.bench_function(quality.as_str(), |b| {
            b.iter(|| resample_and_encode(black_box(&img), 718, 538, quality))
        });
    }
    group.finish();
}

fn benchmark_render(c: &mut Criterion) {
    let images = vec![sample_jpeg(800, 600), sample_jpeg(600, 800)];
    let renderer = DocumentRenderer::default();
    let config = RenderConfig::builder().quality(Quality::Standard).build();

    let mut group = c.benchmark_group("render");
    group.sample_size(10);
    group.bench_function("two_pages_a4", |b| {
        b.iter(|| renderer.render(black_box(&images), &config))
    });
    group.finish();
}

criterion_group!(benches, benchmark_fit, benchmark_resample, benchmark_render);
criterion_main!(benches);
