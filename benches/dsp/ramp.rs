//! Benchmarks for gain ramps.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use soundscape_dsp::dsp::ramp::GainRamp;

use crate::BLOCK_SIZES;

pub fn bench_ramp(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/ramp");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Ramp always in flight: retarget every iteration
        let mut ramp = GainRamp::new(0.0);
        let mut target = 1.0;
        group.bench_with_input(BenchmarkId::new("ramping", size), &size, |b, _| {
            b.iter(|| {
                target = 1.0 - target;
                ramp.ramp_to(target, 0.2, 48_000.0);
                ramp.render(black_box(&mut buffer));
            })
        });

        // Settled ramp: the steady-state cost of a playing voice
        let mut ramp = GainRamp::new(0.7);
        group.bench_with_input(BenchmarkId::new("settled", size), &size, |b, _| {
            b.iter(|| {
                ramp.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
