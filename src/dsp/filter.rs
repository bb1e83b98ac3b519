use std::f32::consts::{FRAC_1_SQRT_2, TAU};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::graph::node::RenderCtx;

/*
| type      | passes          | rejects      | ambient use                     |
| --------- | --------------- | ------------ | ------------------------------- |
| low-pass  | below cutoff    | above cutoff | thunder rumble, ocean, lo-fi    |
| high-pass | above cutoff    | below cutoff | rain hiss, clearing mud         |
| band-pass | around center   | both sides   | forest air, bird chirp region   |
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    LowPass,
    HighPass,
    BandPass,
}

pub struct FilterOutputs {
    pub lowpass: f32,
    pub bandpass: f32,
    pub highpass: f32,
}

/// Q of a maximally flat (Butterworth) second-order response.
pub const BUTTERWORTH_Q: f32 = FRAC_1_SQRT_2;

/// Cutoffs are kept below this fraction of the sample rate; the TPT warp
/// `tan(π·fc/fs)` diverges at Nyquist.
const MAX_CUTOFF_RATIO: f32 = 0.49;

pub struct SVFilter {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory

    pub cutoff_hz: f32,
    pub q: f32,
    filter_type: FilterType,
}

impl SVFilter {
    pub fn new(filter_type: FilterType, cutoff_hz: f32, q: f32) -> Self {
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            cutoff_hz,
            q: q.max(0.01),
            filter_type,
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

    #[inline]
    fn compute_g(&self, ctx: &RenderCtx) -> f32 {
        let cutoff = self
            .cutoff_hz
            .clamp(1.0, ctx.sample_rate * MAX_CUTOFF_RATIO);
        (TAU * cutoff / (2.0 * ctx.sample_rate)).tan()
    }

    pub fn next_sample(&mut self, sample: f32, k: f32, g: f32) -> FilterOutputs {
        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        FilterOutputs {
            lowpass: v2,
            // k·v1 peaks at unity at the center frequency
            bandpass: k * v1,
            highpass: sample - k * v1 - v2,
        }
    }

    pub fn render(&mut self, buffer: &mut [f32], ctx: &RenderCtx) {
        let g = self.compute_g(ctx);
        let k = 1.0 / self.q;

        for sample in buffer.iter_mut() {
            let outputs = self.next_sample(*sample, k, g);

            *sample = match self.filter_type {
                FilterType::LowPass => outputs.lowpass,
                FilterType::HighPass => outputs.highpass,
                FilterType::BandPass => outputs.bandpass,
            }
        }
    }

    pub fn set_cutoff(&mut self, cutoff: f32) {
        self.cutoff_hz = cutoff;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node::GraphNode;
    use crate::graph::oscillator::OscNode;

    const SAMPLE_RATE: f32 = 48_000.0;

    fn peak_after_transient(buffer: &[f32]) -> f32 {
        let skip = buffer.len().min(256);
        buffer
            .get(skip..)
            .unwrap_or(buffer)
            .iter()
            .fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }

    fn sine_through(filter: &mut SVFilter, freq: f32, len: usize) -> f32 {
        let ctx = RenderCtx::new(SAMPLE_RATE);
        let mut osc = OscNode::sine(freq);
        let mut buffer = vec![0.0f32; len];
        osc.render_block(&mut buffer, &ctx);
        filter.render(&mut buffer, &ctx);
        peak_after_transient(&buffer)
    }

    #[test]
    fn test_lowpass_basic() {
        let mut filter = SVFilter::lowpass(500.0);
        let mut buffer = vec![1.0; 512];
        let ctx = RenderCtx::new(SAMPLE_RATE);

        filter.render(&mut buffer, &ctx);

        assert!(buffer[511] > 0.99, "DC should pass, got {}", buffer[511]);
    }

    #[test]
    fn test_highpass_basic() {
        let mut filter = SVFilter::highpass(500.0);
        let mut buffer = vec![1.0; 512];
        let ctx = RenderCtx::new(SAMPLE_RATE);

        filter.render(&mut buffer, &ctx);

        assert!(buffer[511].abs() < 0.001, "DC should be rejected, got {}", buffer[511]);
    }

    #[test]
    fn test_lowpass_filters_high_freq() {
        let mut filter = SVFilter::lowpass(500.0);
        let peak = sine_through(&mut filter, 5_000.0, 1024);

        // ~40 dB down a decade above cutoff
        assert!(peak < 0.05, "Expected high freq attenuation, got peak: {}", peak);
    }

    #[test]
    fn test_highpass_filters_low_freq() {
        let mut filter = SVFilter::highpass(4_000.0);
        let low = sine_through(&mut filter, 200.0, 4096);
        let mut filter = SVFilter::highpass(4_000.0);
        let high = sine_through(&mut filter, 10_000.0, 4096);

        assert!(low < 0.01, "200 Hz should be removed, got {low}");
        assert!(high > 0.8, "10 kHz should pass, got {high}");
    }

    #[test]
    fn test_bandpass_is_unity_at_center() {
        for q in [0.5, 2.0] {
            let mut filter = SVFilter::bandpass(2_000.0, q);
            let center = sine_through(&mut filter, 2_000.0, 4096);
            let mut filter = SVFilter::bandpass(2_000.0, q);
            let off = sine_through(&mut filter, 200.0, 4096);

            assert!((center - 1.0).abs() < 0.05, "Q {q}: center gain {center}");
            assert!(off < center * 0.5, "Q {q}: off-center {off} vs center {center}");
        }
    }

    #[test]
    fn test_higher_q_narrows_bandpass() {
        let mut wide = SVFilter::bandpass(5_000.0, 0.5);
        let mut narrow = SVFilter::bandpass(5_000.0, 2.0);

        let wide_off = sine_through(&mut wide, 2_500.0, 4096);
        let narrow_off = sine_through(&mut narrow, 2_500.0, 4096);

        assert!(narrow_off < wide_off, "narrow={narrow_off}, wide={wide_off}");
    }

    #[test]
    fn test_set_cutoff_affects_filtering() {
        let mut filter = SVFilter::lowpass(200.0);
        let peak_low_cutoff = sine_through(&mut filter, 1_000.0, 1024);

        let mut filter = SVFilter::lowpass(200.0);
        filter.set_cutoff(5_000.0);
        let peak_high_cutoff = sine_through(&mut filter, 1_000.0, 1024);

        assert!(
            peak_high_cutoff > peak_low_cutoff * 2.0,
            "High cutoff should pass more signal: high={}, low={}",
            peak_high_cutoff,
            peak_low_cutoff
        );
    }

    #[test]
    fn test_cutoff_above_nyquist_stays_stable() {
        let mut filter = SVFilter::lowpass(12_000.0);
        let ctx = RenderCtx::new(16_000.0);
        let mut buffer: Vec<f32> = (0..1024).map(|i| if i % 2 == 0 { 0.5 } else { -0.5 }).collect();

        filter.render(&mut buffer, &ctx);

        assert!(buffer.iter().all(|s| s.is_finite() && s.abs() < 4.0));
    }
}
