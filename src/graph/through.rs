use crate::graph::node::{GraphNode, RenderCtx};

/*
Serial Signal Chain (Through)
=============================

Through connects two nodes in series, passing the output of the first (source)
into the second (effect, processed in place):

  Through: [Source] ──→ [Effect] ──→ output

Every filter topology in the recipe table is a chain of Throughs:

  // Light rain: white noise → HP 4 kHz → LP 8 kHz
  let rain = NoiseNode::looped(white)
      .through(FilterNode::highpass(4_000.0))
      .through(FilterNode::lowpass(8_000.0));

Through vs Mix:
  - Through: serial processing (source → effect → output)
  - Mix:     parallel blending (a + b)
*/

pub struct Through<S, F> {
    source: S,
    filter: F,
}

impl<S, F> Through<S, F> {
    pub fn new(source: S, filter: F) -> Self {
        Self { source, filter }
    }
}

impl<S: GraphNode, F: GraphNode> GraphNode for Through<S, F> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.source.render_block(out, ctx);
        self.filter.render_block(out, ctx);
    }

    fn is_active(&self) -> bool {
        self.source.is_active()
    }
}
