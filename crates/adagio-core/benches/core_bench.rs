//! Criterion benchmarks for adagio-core DSP primitives
//!
//! Run with: cargo bench -p adagio-core
#![allow(missing_docs)]

use adagio_core::{Biquad, DelayLine, OnePole, SmoothedValue, lowpass_coefficients};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 256, 1024];

fn generate_test_signal(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5
        })
        .collect()
}

fn bench_biquad(c: &mut Criterion) {
    let mut group = c.benchmark_group("Biquad");

    let (b0, b1, b2, a0, a1, a2) = lowpass_coefficients(1000.0, 0.707, SAMPLE_RATE);

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);

        group.bench_with_input(
            BenchmarkId::new("process", block_size),
            &block_size,
            |b, _| {
                let mut biquad = Biquad::new();
                biquad.set_coefficients(b0, b1, b2, a0, a1, a2);
                b.iter(|| {
                    for &sample in &input {
                        black_box(biquad.process(black_box(sample)));
                    }
                });
            },
        );
    }

    // Coefficient calculation cost
    group.bench_function("coefficient_calc", |b| {
        b.iter(|| {
            black_box(lowpass_coefficients(
                black_box(1000.0),
                black_box(0.707),
                black_box(SAMPLE_RATE),
            ))
        });
    });

    group.finish();
}

fn bench_delay_line(c: &mut Criterion) {
    let mut group = c.benchmark_group("DelayLine");

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);

        group.bench_with_input(
            BenchmarkId::new("read_write", block_size),
            &block_size,
            |b, _| {
                let mut delay = DelayLine::from_time(SAMPLE_RATE, 0.5);
                b.iter(|| {
                    for &sample in &input {
                        black_box(delay.read_write(black_box(sample), 13230.0));
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_smoothing(c: &mut Criterion) {
    let mut group = c.benchmark_group("Smoothing");

    group.bench_function("smoothed_value_advance", |b| {
        let mut param = SmoothedValue::new(0.0, SAMPLE_RATE, 10.0);
        param.set_target(1.0);
        b.iter(|| black_box(param.advance()));
    });

    group.bench_function("one_pole_process", |b| {
        let mut lp = OnePole::new(SAMPLE_RATE, 4000.0);
        b.iter(|| black_box(lp.process(black_box(0.5))));
    });

    group.finish();
}

criterion_group!(benches, bench_biquad, bench_delay_line, bench_smoothing);
criterion_main!(benches);
