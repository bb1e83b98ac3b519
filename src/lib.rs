pub mod dsp;
pub mod engine; // Output context lifecycle and the public facade
pub mod graph; // Composable audio graph nodes
pub mod presets;
pub mod sound; // Sound ids and their synthesis recipes
pub mod synth; // Voice lifecycle and the master bus
pub mod voices; // Recipe → graph builder

pub use engine::{Engine, EngineConfig, EngineError};
pub use sound::SoundId;

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;

/// Clamp a requested volume into `[0, 1]`. NaN is treated as silence.
#[inline]
pub fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}
