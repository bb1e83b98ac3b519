use std::sync::Arc;

use crate::graph::node::{GraphNode, RenderCtx};

/*
Buffered Noise Source
=====================

Plays one channel of a pre-generated `NoiseBuffer`. The buffer is shared
(`Arc<[f32]>`), so building a voice never copies samples and the render thread
only reads.

  looped = true    wraps to the start at the end of the buffer. The buffer's
                   head is crossfaded with its overrun at generation time, so
                   the wrap is seamless.
  looped = false   plays once, then renders silence and reports inactive.

Example usage:
  let buffer = NoiseGenerator::new(seed).generate(NoiseColor::Pink, 4.0, 48_000.0, 2);
  let left = NoiseNode::looped(buffer.channel(0).unwrap())
      .through(FilterNode::bandpass(2000.0, 0.5));
*/

pub struct NoiseNode {
    samples: Arc<[f32]>,
    position: usize,
    looped: bool,
}

impl NoiseNode {
    pub fn new(samples: Arc<[f32]>, looped: bool) -> Self {
        Self {
            samples,
            position: 0,
            looped,
        }
    }

    pub fn looped(samples: Arc<[f32]>) -> Self {
        Self::new(samples, true)
    }

    pub fn one_shot(samples: Arc<[f32]>) -> Self {
        Self::new(samples, false)
    }
}

impl GraphNode for NoiseNode {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        let len = self.samples.len();
        if len == 0 {
            out.fill(0.0);
            return;
        }

        let mut written = 0;
        while written < out.len() {
            if self.position >= len {
                if !self.looped {
                    out[written..].fill(0.0);
                    return;
                }
                self.position = 0;
            }

            let n = (out.len() - written).min(len - self.position);
            out[written..written + n]
                .copy_from_slice(&self.samples[self.position..self.position + n]);
            self.position += n;
            written += n;
        }
    }

    fn is_active(&self) -> bool {
        self.looped || self.position < self.samples.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> RenderCtx {
        RenderCtx::new(48_000.0)
    }

    fn ramp(len: usize) -> Arc<[f32]> {
        (0..len).map(|i| i as f32).collect::<Vec<_>>().into()
    }

    #[test]
    fn looped_source_wraps() {
        let mut node = NoiseNode::looped(ramp(5));
        let mut buffer = vec![0.0; 12];
        node.render_block(&mut buffer, &ctx());

        assert_eq!(
            buffer,
            vec![0.0, 1.0, 2.0, 3.0, 4.0, 0.0, 1.0, 2.0, 3.0, 4.0, 0.0, 1.0]
        );
        assert!(node.is_active());
    }

    #[test]
    fn wrap_survives_block_boundaries() {
        let mut node = NoiseNode::looped(ramp(3));
        let mut a = vec![0.0; 2];
        let mut b = vec![0.0; 2];
        node.render_block(&mut a, &ctx());
        node.render_block(&mut b, &ctx());

        assert_eq!(a, vec![0.0, 1.0]);
        assert_eq!(b, vec![2.0, 0.0]);
    }

    #[test]
    fn one_shot_goes_silent() {
        let mut node = NoiseNode::one_shot(ramp(3));
        let mut buffer = vec![9.0; 5];
        node.render_block(&mut buffer, &ctx());

        assert_eq!(buffer, vec![0.0, 1.0, 2.0, 0.0, 0.0]);
        assert!(!node.is_active());
    }

    #[test]
    fn empty_buffer_renders_silence() {
        let mut node = NoiseNode::looped(Arc::from(Vec::<f32>::new()));
        let mut buffer = vec![1.0; 8];
        node.render_block(&mut buffer, &ctx());
        assert!(buffer.iter().all(|&s| s == 0.0));
    }
}
