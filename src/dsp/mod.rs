//! Low-level DSP primitives used by the higher level graph nodes.
//!
//! These components are allocation-free once constructed and realtime-safe,
//! so they can live directly inside voices on the render thread. Noise buffer
//! generation is the exception: it allocates and runs on the control thread
//! before a voice is handed to the mixer.

/// State-variable filter implementation with multiple responses.
pub mod filter;
/// Block-rate modulation math.
pub mod modulate;
/// White, pink and brown noise generation.
pub mod noise;
/// Audio and control-rate oscillator waveforms.
pub mod oscillator;
/// Sample-counted linear gain ramps (fades, volume changes).
pub mod ramp;

pub use noise::NoiseColor;
pub use ramp::GainRamp;
