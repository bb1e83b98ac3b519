use crate::{engine::error::EngineResult, synth::Mixer};

/*
Output Contexts
===============

An output context is the engine's single handle on the audio device. It is
created lazily, on the first `play`, because some platforms only grant
continuous audio after a user gesture and the engine may be built before one.

    create_context()        start(mixer)        resume()
  ─────────────────► Suspended ─────────► Suspended ─────► Running
                          ▲                                 │
                          └──────────── suspend() ──────────┘
                     close() from any state ──► Closed

`start` hands the mixer to the render side exactly once. A context that comes
up suspended is resumed by the engine before it relies on it.
*/

/// Device shape the mixer renders for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputSpec {
    pub sample_rate: u32,
    pub channels: u16,
}

impl OutputSpec {
    pub const fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
        }
    }
}

impl Default for OutputSpec {
    fn default() -> Self {
        Self::new(48_000, 2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    Suspended,
    Running,
    Closed,
}

/// Creates output contexts. Called again after a failed or closed context.
pub trait OutputBackend: Send {
    fn create_context(&mut self) -> EngineResult<Box<dyn OutputContext>>;
}

pub trait OutputContext: Send {
    fn spec(&self) -> OutputSpec;

    fn state(&self) -> ContextState;

    /// Move the mixer onto the render side.
    fn start(&mut self, mixer: Mixer) -> EngineResult<()>;

    fn resume(&mut self) -> EngineResult<()>;

    fn suspend(&mut self) -> EngineResult<()>;

    /// Release the device. Drops the mixer and every voice it holds.
    fn close(&mut self);
}
