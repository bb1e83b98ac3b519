use crate::{
    dsp::modulate::block_average,
    graph::node::{GraphNode, Modulatable, RenderCtx},
    MAX_BLOCK_SIZE,
};

/*
Modulate Node
=============

Connects an LFO (or any signal) to a parameter on another node:

    modulated_value = base_value + (LFO × depth)

  // Ocean: cutoff swings 200 Hz - 600 Hz
  let swell = FilterNode::lowpass(400.0)
      .modulate(LfoNode::sine(0.1), FilterParam::Cutoff, 200.0);

The modulator is rendered into a scratch buffer allocated at construction, so
rendering never allocates. Blocks longer than `MAX_BLOCK_SIZE` are processed
in slices.

See `dsp/modulate.rs` for the block-rate averaging rationale.
*/

pub struct Modulate<S, L>
where
    S: GraphNode + Modulatable,
    L: GraphNode,
{
    source: S,            // The node being modulated (e.g., FilterNode)
    lfo: L,               // The modulation source (e.g., LfoNode)
    param: S::Param,      // Which parameter to modulate (e.g., FilterParam::Cutoff)
    depth: f32,           // Modulation amount (scales LFO output)
    lfo_buffer: Vec<f32>, // Temp buffer for LFO output
}

impl<S, L> Modulate<S, L>
where
    S: GraphNode + Modulatable,
    L: GraphNode,
{
    pub fn new(source: S, lfo: L, param: S::Param, depth: f32) -> Self {
        Self {
            source,
            lfo,
            param,
            depth,
            lfo_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S, L> GraphNode for Modulate<S, L>
where
    S: GraphNode + Modulatable,
    L: GraphNode,
{
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            let len = chunk.len();

            // Render LFO to temp buffer (values in [-1.0, +1.0])
            self.lfo.render_block(&mut self.lfo_buffer[..len], ctx);
            let lfo_avg = block_average(&self.lfo_buffer[..len]);

            let base_value = self.source.get_param(self.param);
            let modulation = lfo_avg * self.depth;
            self.source.apply_modulation(self.param, base_value, modulation);

            self.source.render_block(chunk, ctx);
        }
    }

    fn is_active(&self) -> bool {
        self.source.is_active()
    }
}
