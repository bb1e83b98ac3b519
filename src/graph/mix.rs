use crate::{
    graph::node::{GraphNode, RenderCtx},
    MAX_BLOCK_SIZE,
};

/*
Parallel Signal Mixing
======================

Combines two signals with a linear crossfade:

    output = (A × (1 - balance)) + (B × balance)

  balance = 0.0 → 100% A
  balance = 0.5 → 50% A, 50% B
  balance = 1.0 → 100% B

Linear weights keep the sum of two full-scale sources within [-1, 1], which
matters for the lo-fi pad where both oscillators peak together.

To mix N sources equally, chain with balance 1/2, 1/3, 1/4, ...:

    a.mix(b, 1/2)        → a/2 + b/2
     .mix(c, 1/3)        → a/3 + b/3 + c/3

Example usage:
  let pad = OscNode::sine(60.0).mix(OscNode::triangle(120.0), 0.5);
*/

pub struct Mix<A, B> {
    pub source_a: A,
    pub source_b: B,
    pub balance: f32, // 0.0 = all A, 1.0 = all B, 0.5 = equal mix
    temp_buffer: Vec<f32>,
}

impl<A, B> Mix<A, B> {
    pub fn new(source_a: A, source_b: B, balance: f32) -> Self {
        Mix {
            source_a,
            source_b,
            balance: balance.clamp(0.0, 1.0),
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }
}

impl<S: GraphNode, M: GraphNode> GraphNode for Mix<S, M> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let weight_a = 1.0 - self.balance;
        let weight_b = self.balance;

        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            self.source_a.render_block(chunk, ctx);

            let frames = &mut self.temp_buffer[..chunk.len()];
            frames.fill(0.0);
            self.source_b.render_block(frames, ctx);

            for (o, b) in chunk.iter_mut().zip(frames.iter()) {
                *o = (*o * weight_a) + (*b * weight_b);
            }
        }
    }

    fn is_active(&self) -> bool {
        self.source_a.is_active() || self.source_b.is_active()
    }
}
