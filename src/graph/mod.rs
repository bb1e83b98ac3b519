//! Composable building blocks for constructing ambient voice graphs.
//!
//! Graph nodes wrap the low-level DSP primitives with block-based rendering
//! and parameter modulation. The `extensions` module adds fluent helpers so
//! recipes read as a chain: `source.through(filter).through(filter)`.

/// Fluent combinators (`.through()`, `.mix()`, `.modulate()`).
pub mod extensions;
/// Topology-preserving filter node with low/high/band-pass responses.
pub mod filter;
/// Low frequency oscillators for parameter modulation.
pub mod lfo;
/// Linear mixing for parallel graphs.
pub mod mix;
/// Connect modulation sources to node parameters.
pub mod modulate;
/// Core traits shared by all graph nodes.
pub mod node;
/// Looping playback of generated noise buffers.
pub mod noise;
/// Fixed-frequency tonal oscillators.
pub mod oscillator;
/// Serial chaining of two nodes (source → effect).
pub mod through;

pub use node::{GraphNode, RenderCtx};
