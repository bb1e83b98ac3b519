use crate::{
    dsp::oscillator::OscillatorBlock,
    graph::node::{GraphNode, RenderCtx},
};

/*
LFO (Low Frequency Oscillator)
==============================

An oscillator running far below hearing, used to move a parameter rather
than to make sound. The ocean voice sweeps its low-pass cutoff with a 0.1 Hz
sine: one slow swell every ten seconds.

  // Ocean swell: cutoff sweeps 200 Hz - 600 Hz over 10 s
  let swell = FilterNode::lowpass(400.0)
      .modulate(LfoNode::sine(0.1), FilterParam::Cutoff, 200.0);

Output is bipolar, [-1.0, +1.0].
*/

pub struct LfoNode {
    osc: OscillatorBlock,
    frequency: f32,
}

impl LfoNode {
    pub fn sine(frequency: f32) -> Self {
        Self {
            osc: OscillatorBlock::sine(),
            frequency,
        }
    }
}

impl GraphNode for LfoNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.osc.render(out, self.frequency, ctx.sample_rate);
    }
}
