//! Benchmarks for cvdmap operations.
//!
//! Run with: `cargo bench`

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use cvdmap::{get_cvd, get_rgb_jab, iter_make_linear, lightness_bounds, make_linear};
use cvdmap_color::{ColorSpace, CvdType, Severity, convert, simulate};
use cvdmap_core::N_SAMPLES;

/// Benchmark colormap conversions between spaces.
fn bench_convert(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert");
    group.throughput(Throughput::Elements(N_SAMPLES as u64));

    let (rgb, jab) = get_rgb_jab("viridis", true).unwrap();
    let jab = jab.unwrap();

    group.bench_function("srgb1_to_cam02ucs", |b| {
        b.iter(|| convert(black_box(rgb.as_array()), ColorSpace::Srgb1, ColorSpace::Cam02Ucs))
    });
    group.bench_function("cam02ucs_to_srgb1", |b| {
        b.iter(|| convert(black_box(&jab), ColorSpace::Cam02Ucs, ColorSpace::Srgb1))
    });
    group.bench_function("cvd_to_cam02ucs", |b| {
        let cvd = ColorSpace::cvd(CvdType::Deuteranomaly, Severity::FULL);
        b.iter(|| convert(black_box(rgb.as_array()), cvd, ColorSpace::Cam02Ucs))
    });

    group.finish();
}

/// Benchmark CVD simulation at several severities.
fn bench_simulate(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulate");
    group.throughput(Throughput::Elements(N_SAMPLES as u64));

    let (rgb, _) = get_rgb_jab("jet", false).unwrap();
    for severity in [0u32, 50, 100] {
        let s = Severity::new(severity).unwrap();
        group.bench_with_input(BenchmarkId::new("deuteranomaly", severity), &s, |b, &s| {
            b.iter(|| simulate(black_box(rgb.as_array()), CvdType::Deuteranomaly, s))
        });
    }

    group.finish();
}

/// Benchmark the correction steps on a CVD-simulated map.
fn bench_correct(c: &mut Criterion) {
    let cvd = get_cvd("viridis", CvdType::Deuteranomaly, Severity::FULL).unwrap();
    let jab = get_rgb_jab(cvd, true).unwrap().1.unwrap();

    c.bench_function("make_linear", |b| b.iter(|| make_linear(black_box(&jab))));
    c.bench_function("lightness_bounds", |b| b.iter(|| lightness_bounds(black_box(&jab))));

    let mut group = c.benchmark_group("iter_make_linear");
    for iterations in [1usize, 2, 4] {
        group.bench_with_input(
            BenchmarkId::from_parameter(iterations),
            &iterations,
            |b, &n| b.iter(|| iter_make_linear(black_box(&jab), n)),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_convert, bench_simulate, bench_correct);
criterion_main!(benches);
