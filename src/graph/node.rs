/// Context passed to graph nodes during rendering.
///
/// Ambient voices have no pitch or velocity: every oscillator and filter in a
/// recipe carries its own fixed frequencies, so the only shared fact is the
/// output sample rate.
#[derive(Debug, Clone, Copy)]
pub struct RenderCtx {
    pub sample_rate: f32,
}

impl RenderCtx {
    pub fn new(sample_rate: f32) -> Self {
        Self { sample_rate }
    }
}

/// Trait for nodes that support parameter modulation
pub trait Modulatable: Send {
    type Param: Copy + Send;

    fn get_param(&self, param: Self::Param) -> f32;

    fn apply_modulation(&mut self, param: Self::Param, base: f32, modulation: f32);
}

/// Core trait for audio processing graph nodes.
///
/// `render_block` runs on the render thread: implementations must not
/// allocate, lock or block.
pub trait GraphNode: Send {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx);

    /// Check if this node is still producing sound
    ///
    /// A non-looping source reports false once it has played out.
    fn is_active(&self) -> bool {
        true
    }
}

/// Allow boxed graph nodes to be used as graph nodes (for dynamic dispatch)
impl GraphNode for Box<dyn GraphNode> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        (**self).render_block(out, ctx)
    }

    fn is_active(&self) -> bool {
        (**self).is_active()
    }
}
