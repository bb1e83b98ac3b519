use crate::{
    dsp::filter::{FilterType, SVFilter, BUTTERWORTH_Q},
    graph::node::{GraphNode, Modulatable, RenderCtx},
};

/*
State-Variable Filter (SVF)
===========================

Ambient voices are "subtractive": start from broadband noise and carve away
what the sound should not have.

  Rain     high-pass removes the rumble, low-pass tames the fizz
  Thunder  low-pass at 200 Hz leaves only the roll
  Forest   wide band-pass around 2 kHz: leaves and air
  Birds    high-pass then a narrow band-pass around 5 kHz: chirp register

Parameters:

  Cutoff (Hz)  corner (low/high-pass) or center (band-pass) frequency.
  Q            sharpness. 0.707 is flat for low/high-pass; for band-pass Q is
               center / bandwidth, so Q 0.5 is a broad hump, Q 2 a narrow peak.

The band-pass output is normalized to unity gain at the center frequency, so
swapping Q changes the width of the band without changing its loudness.

The SVF is a topology-preserving (TPT) design: stable for any cutoff and Q,
and safe to retune every block, which is what the ocean LFO does.
*/

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterParam {
    Cutoff,
}

pub struct FilterNode {
    filter: SVFilter,
    base_cutoff: f32,
}

impl FilterNode {
    pub fn new(filter_type: FilterType, cutoff_hz: f32, q: f32) -> Self {
        FilterNode {
            filter: SVFilter::new(filter_type, cutoff_hz, q),
            base_cutoff: cutoff_hz,
        }
    }

    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::LowPass, cutoff_hz, BUTTERWORTH_Q)
    }

    pub fn highpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::HighPass, cutoff_hz, BUTTERWORTH_Q)
    }

    pub fn bandpass(center_hz: f32, q: f32) -> Self {
        Self::new(FilterType::BandPass, center_hz, q)
    }

    /// Cutoff the filter is currently rendering with (modulation applied).
    pub fn current_cutoff(&self) -> f32 {
        self.filter.cutoff_hz
    }
}

impl Modulatable for FilterNode {
    type Param = FilterParam;

    fn get_param(&self, param: Self::Param) -> f32 {
        match param {
            FilterParam::Cutoff => self.base_cutoff,
        }
    }

    fn apply_modulation(&mut self, param: Self::Param, base: f32, modulation: f32) {
        let final_value = base + modulation;
        match param {
            FilterParam::Cutoff => {
                self.base_cutoff = base;
                self.filter.set_cutoff(final_value.clamp(20.0, 20_000.0));
            }
        }
    }
}

impl GraphNode for FilterNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.filter.render(out, ctx);
    }
}
