use crate::dsp::oscillator::{OscillatorBlock, OscillatorWaveform};
use crate::graph::node::{GraphNode, RenderCtx};

/*
Audio Oscillator
================

Noise carries almost every ambient sound, but the lo-fi pad is tonal: a low
sine and a triangle an octave up, slightly detuned so the pair beats slowly
against itself instead of sounding like a test tone.

Waveforms:

  Sine      single partial, the "hum" under the pad
  Triangle  odd harmonics falling off as 1/n², soft and round

Frequencies are fixed per node; ambient voices never track a note.

Detune is in cents (100 cents = 1 semitone):

    frequency × 2^(cents / 1200)

At 120 Hz, +7 cents is ≈ 120.49 Hz, i.e. a beat against a pure 120 Hz
partial roughly every two seconds.

Example usage:
  let pad = OscNode::sine(60.0)
      .mix(OscNode::triangle(120.0).with_detune(7.0), 0.5)
      .through(FilterNode::lowpass(400.0));
*/

pub struct OscNode {
    osc: OscillatorBlock,
    frequency: f32,
    /// Detune in cents. 100 cents = 1 semitone.
    detune_cents: f32,
}

impl OscNode {
    pub fn new(waveform: OscillatorWaveform, frequency: f32) -> Self {
        Self {
            osc: OscillatorBlock::new(waveform),
            frequency,
            detune_cents: 0.0,
        }
    }

    pub fn sine(frequency: f32) -> Self {
        Self::new(OscillatorWaveform::Sine, frequency)
    }

    pub fn triangle(frequency: f32) -> Self {
        Self::new(OscillatorWaveform::Triangle, frequency)
    }

    /// Set detune in cents (100 cents = 1 semitone).
    pub fn with_detune(mut self, cents: f32) -> Self {
        self.detune_cents = cents;
        self
    }

    /// Frequency actually rendered, detune applied.
    pub fn effective_frequency(&self) -> f32 {
        if self.detune_cents != 0.0 {
            self.frequency * 2.0_f32.powf(self.detune_cents / 1200.0)
        } else {
            self.frequency
        }
    }
}

impl GraphNode for OscNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let frequency = self.effective_frequency();
        self.osc.render(out, frequency, ctx.sample_rate);
    }
}
