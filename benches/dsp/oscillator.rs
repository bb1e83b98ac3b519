//! Benchmarks for oscillator waveform generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use soundscape_dsp::dsp::oscillator::OscillatorBlock;

use crate::BLOCK_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Sine - uses sin() transcendental function
        let mut osc = OscillatorBlock::sine();
        group.bench_with_input(BenchmarkId::new("sine", size), &size, |b, _| {
            b.iter(|| {
                osc.render(black_box(&mut buffer), black_box(60.0), black_box(48_000.0));
            })
        });

        // Triangle - absolute value
        let mut osc = OscillatorBlock::triangle();
        group.bench_with_input(BenchmarkId::new("triangle", size), &size, |b, _| {
            b.iter(|| {
                osc.render(black_box(&mut buffer), black_box(120.0), black_box(48_000.0));
            })
        });
    }

    group.finish();
}
