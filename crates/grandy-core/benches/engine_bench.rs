//! Criterion benchmarks for grandy-core engines
//!
//! Run with: cargo bench -p grandy-core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use grandy_core::{
    GendyOscillator, GendyParams, GrainEcho, GrainEchoParams, Stitcher, StitcherParams,
};

const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];

fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("GendyOscillator");

    let variants = [
        ("GrainOn", true),
        ("GrainOff", false),
    ];

    for (name, grain_on) in &variants {
        for &block_size in BLOCK_SIZES {
            let mut osc = GendyOscillator::new(1);
            let params = GendyParams {
                grain_on: *grain_on,
                ..GendyParams::default()
            };

            group.bench_with_input(
                BenchmarkId::new(*name, block_size),
                &block_size,
                |b, &size| {
                    b.iter(|| {
                        let mut sum = 0.0f32;
                        for _ in 0..size {
                            sum += osc.advance(&params);
                        }
                        black_box(sum)
                    })
                },
            );
        }
    }

    group.finish();
}

fn bench_stitcher(c: &mut Criterion) {
    let mut group = c.benchmark_group("Stitcher");

    for &block_size in BLOCK_SIZES {
        let mut stitcher = Stitcher::new(1);
        let params = StitcherParams::default();

        group.bench_with_input(
            BenchmarkId::new("Advance", block_size),
            &block_size,
            |b, &size| {
                b.iter(|| {
                    let mut sum = 0.0f32;
                    for _ in 0..size {
                        sum += stitcher.advance(&params);
                    }
                    black_box(sum)
                })
            },
        );
    }

    group.finish();
}

fn bench_grain_echo(c: &mut Criterion) {
    let mut group = c.benchmark_group("GrainEcho");

    for &block_size in BLOCK_SIZES {
        let params = GrainEchoParams::default();
        let mut echo = GrainEcho::new(1);
        echo.begin_record(&params);
        while echo.is_recording() {
            echo.advance(0.5, &params);
        }

        group.bench_with_input(
            BenchmarkId::new("Playback", block_size),
            &block_size,
            |b, &size| {
                b.iter(|| {
                    let mut sum = 0.0f32;
                    for _ in 0..size {
                        sum += echo.advance(0.0, &params);
                    }
                    black_box(sum)
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_oscillator, bench_stitcher, bench_grain_echo);
criterion_main!(benches);
