//! Real-world scenario benchmarks.
//!
//! These render complete recipe voices and a mixer carrying several of them,
//! the way the engine does on the audio thread.

mod mix;
mod voices;

pub use mix::bench_mix;
pub use voices::bench_voices;
