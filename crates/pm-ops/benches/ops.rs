// benches/ops.rs -- Per-operation benchmarks on a synthetic 512×384 scene.
//
//   cargo bench -p pm-ops

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use pm_core::{Image, Pixel, SamplingMethod};
use pm_ops::{convolve, dither, point, resample};

/// Gradient background with a few flat rectangles, so filters see both
/// smooth areas and hard edges.
fn make_scene(w: u32, h: u32) -> Image {
    let mut img = Image::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let base = (x * 200 / w + y * 55 / h) as u8;
            img.set_pixel(x, y, Pixel::rgba(base, 255 - base, base / 2, 255));
        }
    }
    for rect in 0..6u32 {
        let rx = (40 + rect * 70) % w;
        let ry = (30 + (rect % 3) * 100) % h;
        let bright = 180 + rect as u8 * 10;
        for y in ry..(ry + 50).min(h) {
            for x in rx..(rx + 60).min(w) {
                img.set_pixel(x, y, Pixel::rgb(bright, bright / 2, 40));
            }
        }
    }
    img
}

fn bench_point(c: &mut Criterion) {
    let img = make_scene(512, 384);

    let mut group = c.benchmark_group("point");
    group.bench_function("contrast_512x384", |b| {
        b.iter(|| {
            let mut frame = img.clone();
            point::change_contrast(&mut frame, black_box(1.5));
            frame
        });
    });
    group.bench_function("quantize_3bit_512x384", |b| {
        b.iter(|| {
            let mut frame = img.clone();
            point::quantize(&mut frame, black_box(3));
            frame
        });
    });
    group.finish();
}

fn bench_dither(c: &mut Criterion) {
    let img = make_scene(512, 384);

    let mut group = c.benchmark_group("dither");
    group.bench_function("ordered_1bit_512x384", |b| {
        b.iter(|| {
            let mut frame = img.clone();
            dither::ordered_dither(&mut frame, black_box(1));
            frame
        });
    });
    group.bench_function("floyd_steinberg_1bit_512x384", |b| {
        b.iter(|| {
            let mut frame = img.clone();
            dither::floyd_steinberg_dither(&mut frame, black_box(1));
            frame
        });
    });
    group.finish();
}

fn bench_blur(c: &mut Criterion) {
    let img = make_scene(512, 384);

    let mut group = c.benchmark_group("blur");
    for sigma in [1u32, 2, 4] {
        group.bench_with_input(BenchmarkId::from_parameter(sigma), &sigma, |b, &s| {
            b.iter(|| {
                let mut frame = img.clone();
                convolve::blur(&mut frame, s);
                frame
            });
        });
    }
    group.bench_function("edge_detect_512x384", |b| {
        b.iter(|| {
            let mut frame = img.clone();
            convolve::edge_detect(&mut frame);
            frame
        });
    });
    group.finish();
}

fn bench_resample(c: &mut Criterion) {
    let mut img = make_scene(512, 384);

    let mut group = c.benchmark_group("resample");
    for method in [
        SamplingMethod::Point,
        SamplingMethod::Bilinear,
        SamplingMethod::Gaussian,
    ] {
        img.set_sampling_method(method);
        group.bench_with_input(BenchmarkId::new("scale_x1.5", method), &img, |b, src| {
            b.iter(|| resample::scale(src, black_box(1.5), black_box(1.5)));
        });
    }
    img.set_sampling_method(SamplingMethod::Point);
    group.bench_function("rotate_30deg_point", |b| {
        b.iter(|| resample::rotate(&img, black_box(30f64.to_radians())));
    });
    group.finish();
}

criterion_group!(benches, bench_point, bench_dither, bench_blur, bench_resample);
criterion_main!(benches);
