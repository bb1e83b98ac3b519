//! Benchmarks for noise buffer generation.
//!
//! Generation runs on the control thread when a voice is built, so the number
//! that matters is the cost of one full loop, not one block.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use soundscape_dsp::dsp::noise::{NoiseColor, NoiseGenerator};

pub fn bench_noise(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/noise");
    group.sample_size(20);

    for color in [NoiseColor::White, NoiseColor::Pink, NoiseColor::Brown] {
        let mut generator = NoiseGenerator::new(1);
        let name = format!("{color:?}").to_lowercase();
        group.bench_with_input(BenchmarkId::new(name, "4s_stereo"), &color, |b, &color| {
            b.iter(|| black_box(generator.generate(color, 4.0, 48_000.0, 2)))
        });
    }

    group.finish();
}
