//! Benchmarks for the mixer with several voices installed.
//!
//! Models what a user actually runs: a preset's two or three sounds, and the
//! worst case of every sound at once.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use soundscape_dsp::{
    dsp::noise::NoiseGenerator,
    synth::{
        message::{queues, MixerCommand},
        MasterBus, Mixer,
    },
    voices, EngineConfig, SoundId,
};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

fn mixer_with(ids: &[SoundId]) -> Mixer {
    let config = EngineConfig::default().with_loop_seconds(1.0);
    let mut noise = NoiseGenerator::new(3);
    let (mut control, render) = queues(64);
    let mut mixer = Mixer::new(SAMPLE_RATE, 2, render, MasterBus::new(0.8, 0.01));

    for (generation, &id) in ids.iter().enumerate() {
        let mut voice = voices::build_voice(id, generation as u64, &config, SAMPLE_RATE, &mut noise);
        voice.start(0.5);
        let _ = control.commands.push(MixerCommand::Install(Box::new(voice)));
    }

    // Drain the install commands before timing
    let mut warmup = vec![0.0f32; 256];
    mixer.render(&mut warmup);
    mixer
}

pub fn bench_mix(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/mix");

    for &size in BLOCK_SIZES {
        // Interleaved stereo
        let mut buffer = vec![0.0f32; size * 2];

        // === PRESET: rainy cafe ===
        let mut preset = mixer_with(&[SoundId::RainLight, SoundId::Cafe]);
        group.bench_with_input(BenchmarkId::new("2_voices", size), &size, |b, _| {
            b.iter(|| preset.render(black_box(&mut buffer)))
        });

        // === FULL: every sound at once ===
        let mut full = mixer_with(&SoundId::ALL);
        group.bench_with_input(BenchmarkId::new("12_voices", size), &size, |b, _| {
            b.iter(|| full.render(black_box(&mut buffer)))
        });
    }

    group.finish();
}
