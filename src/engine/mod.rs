//! The public face of the soundscape engine.
//!
//! `Engine` owns the voice registry and the one output context. Every control
//! call runs on the caller's thread, updates the registry and pushes a command
//! onto the mixer's queue; none of them waits for audio.
//!
//! # Example
//!
//! ```ignore
//! use soundscape_dsp::{Engine, EngineConfig, SoundId};
//!
//! let engine = Engine::new(EngineConfig::default());
//! engine.play(SoundId::RainLight, 0.6);
//! engine.play(SoundId::Thunder, 0.3);
//! engine.set_master_volume(0.8);
//! // ...
//! engine.stop_all();
//! ```

pub mod config;
#[cfg(feature = "cpal")]
pub mod cpal_backend;
pub mod error;
pub mod offline;
pub mod output;

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

pub use config::EngineConfig;
#[cfg(feature = "cpal")]
pub use cpal_backend::CpalBackend;
pub use error::{EngineError, EngineResult};
pub use offline::{OfflineBackend, OfflineHandle};
pub use output::{ContextState, OutputBackend, OutputContext, OutputSpec};

use crate::{
    clamp_volume,
    dsp::noise::NoiseGenerator,
    presets::{Preset, SoundMix},
    sound::SoundId,
    synth::{
        message::{queues, ControlQueues, MixerCommand, MixerEvent},
        MasterBus, Mixer, VoiceState,
    },
    voices,
};

/*
Registry and Generations
========================

The registry mirrors what the mixer holds, one entry per SoundId:

    play(id)      insert { generation: n, Starting }   → Install(voice n)
    mixer event   Playing { id, n }                    → Starting → Playing
    stop(id)      FadingOut                            → FadeOut
    mixer event   Retired(voice n)                     → remove, if still n

A retirement only removes the entry whose generation it carries. A voice that
was replaced by a newer `play` retires with the old generation and leaves the
new entry alone, so a late fade-out can never stop the sound that replaced it.

Events are drained at the top of every call, so state reads are never more
than one render callback behind.
*/

#[derive(Debug, Clone, Copy)]
struct VoiceEntry {
    generation: u64,
    state: VoiceState,
    volume: f32,
}

struct MixerLink {
    queues: ControlQueues,
    spec: OutputSpec,
}

struct EngineInner {
    backend: Box<dyn OutputBackend>,
    context: Option<Box<dyn OutputContext>>,
    link: Option<MixerLink>,
    voices: HashMap<SoundId, VoiceEntry>,
    master_volume: f32,
    next_generation: u64,
    noise: NoiseGenerator,
}

pub struct Engine {
    config: EngineConfig,
    inner: Mutex<EngineInner>,
}

impl Engine {
    /// Engine on the default audio device. The device is not opened until
    /// the first `play`.
    #[cfg(feature = "cpal")]
    pub fn new(config: EngineConfig) -> Self {
        Self::with_backend(config, Box::new(CpalBackend::new()))
    }

    pub fn with_backend(config: EngineConfig, backend: Box<dyn OutputBackend>) -> Self {
        let config = config.sanitized();
        let seed = config.seed.unwrap_or_else(rand::random);
        let noise = NoiseGenerator::new(seed).with_crossfade(config.loop_crossfade);

        Self {
            inner: Mutex::new(EngineInner {
                backend,
                context: None,
                link: None,
                voices: HashMap::new(),
                master_volume: config.master_volume,
                next_generation: 1,
                noise,
            }),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Start `id` at `volume`, replacing any voice already playing it.
    ///
    /// Opens or resumes the output context if needed. If that fails the call
    /// does nothing and the sound is not registered.
    pub fn play(&self, id: SoundId, volume: f32) {
        let mut inner = self.lock();
        inner.poll();
        inner.play(&self.config, id, volume);
    }

    /// Re-level a playing sound. Ignored while it is fading out.
    pub fn set_volume(&self, id: SoundId, volume: f32) {
        let mut inner = self.lock();
        inner.poll();
        inner.set_volume(id, volume);
    }

    /// Fade `id` out. The voice is released once the fade reaches silence.
    pub fn stop(&self, id: SoundId) {
        let mut inner = self.lock();
        inner.poll();
        inner.stop(id);
    }

    pub fn stop_all(&self) {
        let mut inner = self.lock();
        inner.poll();
        inner.stop_all();
    }

    pub fn set_master_volume(&self, volume: f32) {
        let mut inner = self.lock();
        inner.poll();
        inner.set_master_volume(volume);
    }

    /// True while `id` is starting or playing. A fading voice is not playing.
    pub fn is_playing(&self, id: SoundId) -> bool {
        let mut inner = self.lock();
        inner.poll();
        inner
            .voices
            .get(&id)
            .is_some_and(|entry| entry.state.is_playing())
    }

    /// Last volume requested for `id`, if it has a voice.
    pub fn volume(&self, id: SoundId) -> Option<f32> {
        let mut inner = self.lock();
        inner.poll();
        inner.voices.get(&id).map(|entry| entry.volume)
    }

    pub fn voice_state(&self, id: SoundId) -> Option<VoiceState> {
        let mut inner = self.lock();
        inner.poll();
        inner.voices.get(&id).map(|entry| entry.state)
    }

    /// Sounds that are starting or playing, in catalog order.
    pub fn active_sounds(&self) -> Vec<SoundId> {
        let mut inner = self.lock();
        inner.poll();
        let mut ids: Vec<_> = inner
            .voices
            .iter()
            .filter(|(_, entry)| entry.state.is_playing())
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        ids
    }

    pub fn master_volume(&self) -> f32 {
        self.lock().master_volume
    }

    /// `None` until the first context has been created.
    pub fn context_state(&self) -> Option<ContextState> {
        self.lock().context.as_ref().map(|context| context.state())
    }

    /// Drain mixer events into the registry. Every other call does this too;
    /// hosts that only read state on a timer can call it directly.
    pub fn poll(&self) {
        self.lock().poll();
    }

    /// Bring the engine in line with a desired mix.
    ///
    /// Sounds already playing are re-levelled in place, missing ones are
    /// started and the rest are faded out. A sound stored at volume 0 counts
    /// as off. Master volume is set as-is; it is never folded into the voice
    /// volumes.
    pub fn apply_mix(&self, mix: &SoundMix) {
        let mut inner = self.lock();
        inner.poll();

        let audible = |id| mix.volume(id).is_some_and(|volume| volume > 0.0);

        let playing: Vec<SoundId> = inner
            .voices
            .iter()
            .filter(|(_, entry)| entry.state.is_playing())
            .map(|(id, _)| *id)
            .collect();
        for id in playing {
            if !audible(id) {
                inner.stop(id);
            }
        }

        for (id, volume) in mix.sounds().filter(|&(_, volume)| volume > 0.0) {
            let playing = inner
                .voices
                .get(&id)
                .is_some_and(|entry| entry.state.is_playing());
            if playing {
                inner.set_volume(id, volume);
            } else {
                inner.play(&self.config, id, volume);
            }
        }

        inner.set_master_volume(mix.master_volume());
    }

    /// Fade out everything and start the preset's sounds.
    pub fn apply_preset(&self, preset: &Preset) {
        let mut inner = self.lock();
        inner.poll();
        log::info!("Applying preset {}", preset.id);

        inner.stop_all();
        for &(id, volume) in preset.sounds {
            inner.play(&self.config, id, volume);
        }
    }

    pub fn suspend(&self) -> EngineResult<()> {
        let mut inner = self.lock();
        match inner.context.as_mut() {
            Some(context) => context.suspend(),
            None => Ok(()),
        }
    }

    /// Resume the output context, creating it if it does not exist yet.
    pub fn resume(&self) -> EngineResult<()> {
        let mut inner = self.lock();
        inner.poll();
        inner.ensure_context(&self.config).map(|_| ())
    }

    /// Stop every voice immediately and release the output device.
    pub fn shutdown(&self) {
        self.lock().teardown();
    }

    fn lock(&self) -> MutexGuard<'_, EngineInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.inner
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .teardown();
    }
}

impl EngineInner {
    fn play(&mut self, config: &EngineConfig, id: SoundId, volume: f32) {
        let spec = match self.ensure_context(config) {
            Ok(spec) => spec,
            Err(e) => {
                log::warn!("Cannot play {}: {}", id, e);
                return;
            }
        };

        let volume = clamp_volume(volume);
        let generation = self.next_generation;
        self.next_generation += 1;

        let mut voice = voices::build_voice(
            id,
            generation,
            config,
            spec.sample_rate as f32,
            &mut self.noise,
        );
        voice.start(volume);

        if self.send(MixerCommand::Install(Box::new(voice))) {
            log::debug!("Playing {} at {:.2} (voice {})", id, volume, generation);
            self.voices.insert(
                id,
                VoiceEntry {
                    generation,
                    state: VoiceState::Starting,
                    volume,
                },
            );
        }
    }

    fn set_volume(&mut self, id: SoundId, volume: f32) {
        let volume = clamp_volume(volume);
        let accepts = self
            .voices
            .get(&id)
            .is_some_and(|entry| entry.state.is_playing());
        if !accepts || !self.send(MixerCommand::SetVolume { id, volume }) {
            return;
        }
        if let Some(entry) = self.voices.get_mut(&id) {
            entry.volume = volume;
        }
    }

    fn stop(&mut self, id: SoundId) {
        let stoppable = self
            .voices
            .get(&id)
            .is_some_and(|entry| entry.state.is_playing());
        if !stoppable || !self.send(MixerCommand::FadeOut { id }) {
            return;
        }
        if let Some(entry) = self.voices.get_mut(&id) {
            log::debug!("Fading out {} (voice {})", id, entry.generation);
            entry.state = VoiceState::FadingOut;
        }
    }

    fn stop_all(&mut self) {
        let ids: Vec<SoundId> = self.voices.keys().copied().collect();
        for id in ids {
            self.stop(id);
        }
    }

    fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = clamp_volume(volume);
        if self.link.is_some() {
            self.send(MixerCommand::SetMasterVolume(self.master_volume));
        }
    }

    fn send(&mut self, command: MixerCommand) -> bool {
        let Some(link) = self.link.as_mut() else {
            return false;
        };
        match link.queues.commands.push(command) {
            Ok(()) => true,
            Err(_) => {
                log::warn!("Mixer command queue full; dropping command");
                false
            }
        }
    }

    fn poll(&mut self) {
        if self
            .context
            .as_ref()
            .is_some_and(|context| context.state() == ContextState::Closed)
        {
            log::warn!("Audio context closed; releasing all voices");
            self.teardown();
            return;
        }

        let Some(link) = self.link.as_mut() else {
            return;
        };

        while let Ok(event) = link.queues.events.pop() {
            match event {
                MixerEvent::Playing { id, generation } => {
                    if let Some(entry) = self.voices.get_mut(&id) {
                        if entry.generation == generation && entry.state == VoiceState::Starting {
                            entry.state = VoiceState::Playing;
                        }
                    }
                }
                MixerEvent::Retired(voice) => {
                    let id = voice.id();
                    if self
                        .voices
                        .get(&id)
                        .is_some_and(|entry| entry.generation == voice.generation())
                    {
                        log::debug!("Released {} (voice {})", id, voice.generation());
                        self.voices.remove(&id);
                    }
                }
            }
        }
    }

    /// Open (or reopen) the output context and make sure it is running.
    fn ensure_context(&mut self, config: &EngineConfig) -> EngineResult<OutputSpec> {
        if self
            .context
            .as_ref()
            .is_some_and(|context| context.state() == ContextState::Closed)
        {
            self.teardown();
        }

        if self.context.is_none() {
            self.open_context(config)?;
        }

        let (Some(context), Some(link)) = (self.context.as_mut(), self.link.as_ref()) else {
            return Err(EngineError::ContextClosed);
        };

        if context.state() == ContextState::Suspended {
            context.resume()?;
            log::info!("Audio context resumed");
        }

        Ok(link.spec)
    }

    fn open_context(&mut self, config: &EngineConfig) -> EngineResult<()> {
        let mut context = self.backend.create_context()?;
        let spec = context.spec();

        let (control, render) = queues(config.command_capacity);
        let master = MasterBus::new(self.master_volume, config.master_ramp);
        let mixer = Mixer::new(
            spec.sample_rate as f32,
            spec.channels as usize,
            render,
            master,
        );
        context.start(mixer)?;

        log::info!(
            "Audio context created: {} Hz, {} channels",
            spec.sample_rate,
            spec.channels
        );

        self.context = Some(context);
        self.link = Some(MixerLink {
            queues: control,
            spec,
        });
        Ok(())
    }

    fn teardown(&mut self) {
        let ids: Vec<SoundId> = self.voices.keys().copied().collect();
        for id in ids {
            self.send(MixerCommand::Kill { id });
        }

        if let Some(mut context) = self.context.take() {
            context.close();
            log::info!("Audio context closed");
        }
        // Retired voices still queued are freed with the link
        self.link = None;
        self.voices.clear();
    }
}
