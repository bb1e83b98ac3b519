use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{
    engine::{
        error::{EngineError, EngineResult},
        output::{ContextState, OutputBackend, OutputContext, OutputSpec},
    },
    synth::Mixer,
};

/// Device-less backend. The paired [`OfflineHandle`] pulls audio on demand,
/// so tests and headless hosts can render the exact mix a device would play.
///
/// ```ignore
/// let (backend, handle) = OfflineBackend::new(OutputSpec::new(16_000, 2));
/// let engine = Engine::with_backend(EngineConfig::default(), Box::new(backend));
/// engine.play(SoundId::Ocean, 0.7);
/// let samples = handle.render(1_024);
/// ```
pub struct OfflineBackend {
    shared: Arc<Mutex<OfflineShared>>,
}

/// Pulls rendered audio out of the current offline context.
#[derive(Clone)]
pub struct OfflineHandle {
    shared: Arc<Mutex<OfflineShared>>,
}

struct OfflineShared {
    spec: OutputSpec,
    available: bool,
    state: ContextState,
    mixer: Option<Mixer>,
    contexts_created: usize,
}

struct OfflineContext {
    shared: Arc<Mutex<OfflineShared>>,
    spec: OutputSpec,
}

fn lock(shared: &Mutex<OfflineShared>) -> MutexGuard<'_, OfflineShared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

impl OfflineBackend {
    pub fn new(spec: OutputSpec) -> (Self, OfflineHandle) {
        Self::build(spec, true)
    }

    /// A backend whose device is missing until `OfflineHandle::set_available`.
    pub fn unavailable(spec: OutputSpec) -> (Self, OfflineHandle) {
        Self::build(spec, false)
    }

    fn build(spec: OutputSpec, available: bool) -> (Self, OfflineHandle) {
        let shared = Arc::new(Mutex::new(OfflineShared {
            spec,
            available,
            state: ContextState::Closed,
            mixer: None,
            contexts_created: 0,
        }));

        (
            Self {
                shared: Arc::clone(&shared),
            },
            OfflineHandle { shared },
        )
    }
}

impl OutputBackend for OfflineBackend {
    fn create_context(&mut self) -> EngineResult<Box<dyn OutputContext>> {
        let mut shared = lock(&self.shared);
        if !shared.available {
            return Err(EngineError::NoOutputDevice);
        }

        shared.contexts_created += 1;
        shared.state = ContextState::Suspended;
        shared.mixer = None;

        Ok(Box::new(OfflineContext {
            shared: Arc::clone(&self.shared),
            spec: shared.spec,
        }))
    }
}

impl OutputContext for OfflineContext {
    fn spec(&self) -> OutputSpec {
        self.spec
    }

    fn state(&self) -> ContextState {
        lock(&self.shared).state
    }

    fn start(&mut self, mixer: Mixer) -> EngineResult<()> {
        let mut shared = lock(&self.shared);
        if shared.state == ContextState::Closed {
            return Err(EngineError::ContextClosed);
        }
        shared.mixer = Some(mixer);
        Ok(())
    }

    fn resume(&mut self) -> EngineResult<()> {
        let mut shared = lock(&self.shared);
        match shared.state {
            ContextState::Closed => Err(EngineError::ContextClosed),
            _ if !shared.available => Err(EngineError::StreamPlay("device unavailable".into())),
            _ => {
                shared.state = ContextState::Running;
                Ok(())
            }
        }
    }

    fn suspend(&mut self) -> EngineResult<()> {
        let mut shared = lock(&self.shared);
        match shared.state {
            ContextState::Closed => Err(EngineError::ContextClosed),
            _ => {
                shared.state = ContextState::Suspended;
                Ok(())
            }
        }
    }

    fn close(&mut self) {
        let mixer = {
            let mut shared = lock(&self.shared);
            shared.state = ContextState::Closed;
            shared.mixer.take()
        };
        drop(mixer);
    }
}

impl OfflineHandle {
    /// Render `frames` interleaved frames. Silence unless the context is running.
    pub fn render(&self, frames: usize) -> Vec<f32> {
        let mut shared = lock(&self.shared);
        let channels = shared.spec.channels.max(1) as usize;
        let mut out = vec![0.0; frames * channels];

        if shared.state == ContextState::Running {
            if let Some(mixer) = shared.mixer.as_mut() {
                mixer.render(&mut out);
            }
        }
        out
    }

    /// Render `seconds` of audio.
    pub fn render_seconds(&self, seconds: f32) -> Vec<f32> {
        let frames = (seconds.max(0.0) * self.spec().sample_rate as f32).round() as usize;
        self.render(frames)
    }

    pub fn spec(&self) -> OutputSpec {
        lock(&self.shared).spec
    }

    pub fn state(&self) -> ContextState {
        lock(&self.shared).state
    }

    pub fn contexts_created(&self) -> usize {
        lock(&self.shared).contexts_created
    }

    /// Simulate the device appearing or disappearing.
    pub fn set_available(&self, available: bool) {
        lock(&self.shared).available = available;
    }

    /// Simulate losing the device: the context reports `Closed`.
    pub fn close(&self) {
        let mixer = {
            let mut shared = lock(&self.shared);
            shared.state = ContextState::Closed;
            shared.mixer.take()
        };
        drop(mixer);
    }

    /// Voices currently held by the render side.
    pub fn active_voices(&self) -> usize {
        lock(&self.shared)
            .mixer
            .as_ref()
            .map_or(0, Mixer::active_voices)
    }
}
