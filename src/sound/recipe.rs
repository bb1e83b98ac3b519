use crate::{
    dsp::{
        filter::{FilterType, BUTTERWORTH_Q},
        noise::NoiseColor,
        oscillator::OscillatorWaveform,
    },
    sound::SoundId,
};

/*
Synthesis Recipes
=================

Each ambient sound is a fixed topology: one source, zero or more filter
stages in series, and at most one slow LFO moving a stage's cutoff.

  rain-light   white ──► HP 4k ──► LP 8k
  rain-heavy   white ──► HP 2k ──► LP 12k
  thunder      brown ──► LP 200
  forest       pink  ──► BP 2k (Q 0.5)
  ocean        brown ──► LP 400 ◄── LFO 0.1 Hz, ±200 Hz
  birds        white ──► HP 3k ──► BP 5k (Q 2)
  fire         brown ──► LP 1k ──► HP 100
  cafe         pink  ──► LP 3k ──► HP 200
  lofi         sine 60 + triangle 120 (+7 ct) ──► LP 400
  *-noise      raw color

The table is plain data; `voices::build_voice` turns any recipe into a graph.
*/

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscSpec {
    pub waveform: OscillatorWaveform,
    pub frequency: f32,
    pub detune_cents: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SourceKind {
    Noise(NoiseColor),
    /// Oscillators summed with equal weight.
    Oscillators(&'static [OscSpec]),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterStage {
    pub kind: FilterType,
    pub cutoff_hz: f32,
    pub q: f32,
}

impl FilterStage {
    pub const fn lowpass(cutoff_hz: f32) -> Self {
        Self {
            kind: FilterType::LowPass,
            cutoff_hz,
            q: BUTTERWORTH_Q,
        }
    }

    pub const fn highpass(cutoff_hz: f32) -> Self {
        Self {
            kind: FilterType::HighPass,
            cutoff_hz,
            q: BUTTERWORTH_Q,
        }
    }

    pub const fn bandpass(center_hz: f32, q: f32) -> Self {
        Self {
            kind: FilterType::BandPass,
            cutoff_hz: center_hz,
            q,
        }
    }
}

/// Sine LFO on the cutoff of `stages[stage]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutoffLfo {
    pub stage: usize,
    pub rate_hz: f32,
    pub depth_hz: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthesisRecipe {
    pub source: SourceKind,
    pub stages: &'static [FilterStage],
    pub modulation: Option<CutoffLfo>,
    pub looped: bool,
}

impl SynthesisRecipe {
    const fn noise(color: NoiseColor, stages: &'static [FilterStage]) -> Self {
        Self {
            source: SourceKind::Noise(color),
            stages,
            modulation: None,
            looped: true,
        }
    }

    const fn with_lfo(mut self, lfo: CutoffLfo) -> Self {
        self.modulation = Some(lfo);
        self
    }

    pub fn noise_color(&self) -> Option<NoiseColor> {
        match self.source {
            SourceKind::Noise(color) => Some(color),
            SourceKind::Oscillators(_) => None,
        }
    }
}

static RAIN_LIGHT: SynthesisRecipe = SynthesisRecipe::noise(
    NoiseColor::White,
    &[FilterStage::highpass(4_000.0), FilterStage::lowpass(8_000.0)],
);

static RAIN_HEAVY: SynthesisRecipe = SynthesisRecipe::noise(
    NoiseColor::White,
    &[FilterStage::highpass(2_000.0), FilterStage::lowpass(12_000.0)],
);

static THUNDER: SynthesisRecipe =
    SynthesisRecipe::noise(NoiseColor::Brown, &[FilterStage::lowpass(200.0)]);

static FOREST: SynthesisRecipe =
    SynthesisRecipe::noise(NoiseColor::Pink, &[FilterStage::bandpass(2_000.0, 0.5)]);

static OCEAN: SynthesisRecipe =
    SynthesisRecipe::noise(NoiseColor::Brown, &[FilterStage::lowpass(400.0)]).with_lfo(
        CutoffLfo {
            stage: 0,
            rate_hz: 0.1,
            depth_hz: 200.0,
        },
    );

static BIRDS: SynthesisRecipe = SynthesisRecipe::noise(
    NoiseColor::White,
    &[FilterStage::highpass(3_000.0), FilterStage::bandpass(5_000.0, 2.0)],
);

static FIRE: SynthesisRecipe = SynthesisRecipe::noise(
    NoiseColor::Brown,
    &[FilterStage::lowpass(1_000.0), FilterStage::highpass(100.0)],
);

static CAFE: SynthesisRecipe = SynthesisRecipe::noise(
    NoiseColor::Pink,
    &[FilterStage::lowpass(3_000.0), FilterStage::highpass(200.0)],
);

static LOFI: SynthesisRecipe = SynthesisRecipe {
    source: SourceKind::Oscillators(&[
        OscSpec {
            waveform: OscillatorWaveform::Sine,
            frequency: 60.0,
            detune_cents: 0.0,
        },
        OscSpec {
            waveform: OscillatorWaveform::Triangle,
            frequency: 120.0,
            detune_cents: 7.0,
        },
    ]),
    stages: &[FilterStage::lowpass(400.0)],
    modulation: None,
    looped: true,
};

static WHITE_NOISE: SynthesisRecipe = SynthesisRecipe::noise(NoiseColor::White, &[]);
static PINK_NOISE: SynthesisRecipe = SynthesisRecipe::noise(NoiseColor::Pink, &[]);
static BROWN_NOISE: SynthesisRecipe = SynthesisRecipe::noise(NoiseColor::Brown, &[]);

impl SoundId {
    pub fn recipe(self) -> &'static SynthesisRecipe {
        match self {
            SoundId::RainLight => &RAIN_LIGHT,
            SoundId::RainHeavy => &RAIN_HEAVY,
            SoundId::Thunder => &THUNDER,
            SoundId::Forest => &FOREST,
            SoundId::Ocean => &OCEAN,
            SoundId::Birds => &BIRDS,
            SoundId::Fire => &FIRE,
            SoundId::Cafe => &CAFE,
            SoundId::Lofi => &LOFI,
            SoundId::WhiteNoise => &WHITE_NOISE,
            SoundId::PinkNoise => &PINK_NOISE,
            SoundId::BrownNoise => &BROWN_NOISE,
        }
    }
}
