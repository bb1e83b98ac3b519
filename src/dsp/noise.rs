use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Noise Colors
============

All three colors start from the same uniform white source and differ only in
the shaping filter applied afterwards.

  White   flat spectrum. Every sample is independent.
  Pink    -3 dB/octave (1/f). Equal energy per octave, the "natural" hiss of
          rain and wind.
  Brown   -6 dB/octave (1/f²). A leaky random walk, the low rumble of surf
          and thunder.

Pink: Paul Kellet's Refined Filter
----------------------------------

Seven one-pole accumulators with hand-tuned decay/gain pairs approximate a
1/f slope to within ±0.05 dB above ~9 Hz:

    b0 = 0.99886·b0 + w·0.0555179
    b1 = 0.99332·b1 + w·0.0750759
    b2 = 0.96900·b2 + w·0.1538520
    b3 = 0.86650·b3 + w·0.3104856
    b4 = 0.55000·b4 + w·0.5329522
    b5 = -0.7616·b5 - w·0.0168980
    pink = (b0 + b1 + b2 + b3 + b4 + b5 + b6 + w·0.5362) · 0.11
    b6 = w·0.115926

b6 is assigned after it is read: it is a one-sample delay tap, part of the
recurrence. The 0.11 factor brings the summed gain back to roughly unit RMS.

Brown: Leaky Integrator
-----------------------

    b = (b + k·w) / (1 + k),  k = 0.02
    brown = b · 3.5

The leak keeps the walk from drifting into DC. Integration throws away most of
the energy, hence the 3.5 make-up gain.

Looping
-------

Buffers are played in a loop. Joining the last sample to the first would put a
step into the waveform (an audible tick every few seconds, worst on brown noise
which is otherwise smooth). We generate `crossfade` extra samples past the end
and blend them into the head with an equal-power curve, so that the sample
after the last one is a natural continuation of the walk.

White noise skips the blend. Its samples carry no memory, so the wrap is no
different from any other step, and summing two independent samples would lift
the head above the 0.5 peak.
*/

pub const PINK_SCALE: f32 = 0.11;
pub const BROWN_LEAK: f32 = 0.02;
pub const BROWN_GAIN: f32 = 3.5;
pub const WHITE_GAIN: f32 = 0.5;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoiseColor {
    White,
    Pink,
    Brown,
}

/// Per-channel shaping filter state.
#[derive(Debug, Clone)]
pub struct NoiseShaper {
    color: NoiseColor,
    b: [f32; 7],
}

impl NoiseShaper {
    pub fn new(color: NoiseColor) -> Self {
        Self { color, b: [0.0; 7] }
    }

    /// Shape one uniform white sample in [-1, 1].
    #[inline]
    pub fn next_sample(&mut self, white: f32) -> f32 {
        match self.color {
            NoiseColor::White => white * WHITE_GAIN,
            NoiseColor::Pink => {
                let b = &mut self.b;
                b[0] = 0.99886 * b[0] + white * 0.0555179;
                b[1] = 0.99332 * b[1] + white * 0.0750759;
                b[2] = 0.96900 * b[2] + white * 0.1538520;
                b[3] = 0.86650 * b[3] + white * 0.3104856;
                b[4] = 0.55000 * b[4] + white * 0.5329522;
                b[5] = -0.7616 * b[5] - white * 0.0168980;
                let pink = b[0] + b[1] + b[2] + b[3] + b[4] + b[5] + b[6] + white * 0.5362;
                b[6] = white * 0.115926;
                pink * PINK_SCALE
            }
            NoiseColor::Brown => {
                let b = &mut self.b[0];
                *b = (*b + BROWN_LEAK * white) / (1.0 + BROWN_LEAK);
                *b * BROWN_GAIN
            }
        }
    }
}

/// A planar, loop-ready block of generated noise.
#[derive(Debug, Clone)]
pub struct NoiseBuffer {
    channels: Vec<Arc<[f32]>>,
}

impl NoiseBuffer {
    pub fn channel(&self, index: usize) -> Option<Arc<[f32]>> {
        self.channels.get(index).cloned()
    }

    pub fn channels(&self) -> &[Arc<[f32]>] {
        &self.channels
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Frames per channel.
    pub fn len(&self) -> usize {
        self.channels.first().map_or(0, |c| c.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Generates loopable noise buffers from a seeded PCG stream.
pub struct NoiseGenerator {
    rng: Pcg32,
    crossfade_seconds: f32,
}

impl NoiseGenerator {
    pub const DEFAULT_CROSSFADE: f32 = 0.05;

    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            crossfade_seconds: Self::DEFAULT_CROSSFADE,
        }
    }

    pub fn with_crossfade(mut self, seconds: f32) -> Self {
        self.crossfade_seconds = seconds.max(0.0);
        self
    }

    /// Uniform sample in [-1, 1).
    #[inline]
    pub fn white(&mut self) -> f32 {
        self.rng.random_range(-1.0f32..1.0)
    }

    /// Fill `channels` independent channels of `duration_seconds` of noise.
    ///
    /// Each channel gets a fresh shaper and its own stretch of the random
    /// stream, so stereo channels are decorrelated rather than duplicated.
    pub fn generate(
        &mut self,
        color: NoiseColor,
        duration_seconds: f32,
        sample_rate: f32,
        channels: usize,
    ) -> NoiseBuffer {
        let frames = (duration_seconds.max(0.0) * sample_rate).round() as usize;
        // White samples are independent, so any wrap is already seamless
        let crossfade = match color {
            NoiseColor::White => 0,
            NoiseColor::Pink | NoiseColor::Brown => {
                ((self.crossfade_seconds * sample_rate).round() as usize).min(frames / 2)
            }
        };

        let channels: Vec<Arc<[f32]>> = (0..channels)
            .map(|_| {
                let mut shaper = NoiseShaper::new(color);
                let mut raw = Vec::with_capacity(frames + crossfade);
                for _ in 0..frames + crossfade {
                    let white = self.white();
                    raw.push(shaper.next_sample(white));
                }
                splice_loop(&mut raw, frames, crossfade);
                Arc::from(raw)
            })
            .collect();

        NoiseBuffer { channels }
    }
}

/// Blend the `crossfade` samples past `frames` into the head, then truncate.
///
/// At the head the overrun dominates (weight 1 at index 0), so playback wraps
/// from `raw[frames - 1]` into what is effectively `raw[frames]`.
fn splice_loop(raw: &mut Vec<f32>, frames: usize, crossfade: usize) {
    for i in 0..crossfade {
        let t = i as f32 / crossfade as f32;
        let fade_in = (t * FRAC_PI_2).sin();
        let fade_out = (t * FRAC_PI_2).cos();
        raw[i] = raw[i] * fade_in + raw[frames + i] * fade_out;
    }
    raw.truncate(frames);
    for sample in raw.iter_mut() {
        *sample = sample.clamp(-1.0, 1.0);
    }
}
