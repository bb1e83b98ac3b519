use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OscillatorWaveform {
    Sine,
    Triangle,
}

/// Phase-accumulating oscillator. Phase is kept in [0, 1).
pub struct OscillatorBlock {
    waveform: OscillatorWaveform,
    phase: f32,
}

impl OscillatorBlock {
    pub fn new(waveform: OscillatorWaveform) -> Self {
        Self {
            waveform,
            phase: 0.0,
        }
    }

    pub fn sine() -> Self {
        Self::new(OscillatorWaveform::Sine)
    }

    pub fn triangle() -> Self {
        Self::new(OscillatorWaveform::Triangle)
    }

    #[inline]
    fn shape(&self, phase: f32) -> f32 {
        match self.waveform {
            OscillatorWaveform::Sine => (TAU * phase).sin(),
            // 0 → 0, 0.25 → 1, 0.75 → -1
            OscillatorWaveform::Triangle => 1.0 - 4.0 * ((phase + 0.25).rem_euclid(1.0) - 0.5).abs(),
        }
    }

    pub fn render(&mut self, destination: &mut [f32], frequency: f32, sample_rate: f32) {
        let increment = frequency / sample_rate;
        for sample in destination.iter_mut() {
            *sample = self.shape(self.phase);
            self.phase = (self.phase + increment).rem_euclid(1.0);
        }
    }
}
