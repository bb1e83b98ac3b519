//! Benchmarks for complete recipe voices.
//!
//! One benchmark per sound id: source, filter chain and gain, stereo.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use soundscape_dsp::{
    dsp::noise::NoiseGenerator, graph::node::RenderCtx, voices, EngineConfig, SoundId,
};

use crate::BLOCK_SIZES;

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");
    let ctx = RenderCtx::new(48_000.0);
    let config = EngineConfig::default().with_loop_seconds(1.0);
    let mut noise = NoiseGenerator::new(7);

    for &size in BLOCK_SIZES {
        let mut left = vec![0.0f32; size];
        let mut right = vec![0.0f32; size];

        for id in SoundId::ALL {
            let mut voice = voices::build_voice(id, 1, &config, 48_000.0, &mut noise);
            voice.start(0.5);

            group.bench_with_input(BenchmarkId::new(id.as_str(), size), &size, |b, _| {
                b.iter(|| {
                    voice.mix_into(black_box(&mut left), black_box(&mut right), &ctx);
                })
            });
        }
    }

    group.finish();
}
