//! Benchmarks for state-variable filter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use soundscape_dsp::dsp::filter::SVFilter;
use soundscape_dsp::graph::node::RenderCtx;

use crate::BLOCK_SIZES;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");
    let ctx = RenderCtx::new(48_000.0);

    for &size in BLOCK_SIZES {
        // Generate a test signal (sawtooth-like ramp)
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        // Lowpass filter (thunder, ocean, lofi)
        let mut filter = SVFilter::lowpass(200.0);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("lowpass", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                filter.render(black_box(&mut buffer), black_box(&ctx));
            })
        });

        // Highpass filter (rain)
        let mut filter = SVFilter::highpass(4_000.0);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("highpass", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                filter.render(black_box(&mut buffer), black_box(&ctx));
            })
        });

        // Bandpass filter (forest, birds)
        let mut filter = SVFilter::bandpass(2_000.0, 0.5);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("bandpass", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                filter.render(black_box(&mut buffer), black_box(&ctx));
            })
        });
    }

    group.finish();
}
