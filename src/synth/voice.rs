use crate::{
    clamp_volume,
    dsp::ramp::GainRamp,
    graph::node::{GraphNode, RenderCtx},
    sound::SoundId,
    MAX_BLOCK_SIZE,
};

/// Every voice renders stereo; the mixer folds it onto the device layout.
pub const VOICE_CHANNELS: usize = 2;

/*
Voice Lifecycle
===============

    play ──► Starting ──(attack ramp done)──► Playing
                │                                │
                └──────────── stop ──────────────┤
                                                 ▼
                                            FadingOut ──(gain hits 0)──► Stopped
    force stop (replace / kill) ─────────────────────────────────────────► Stopped

The gain ramp is the only clock. Nothing sleeps or schedules callbacks: the
mixer renders the ramp and the state advances when the ramp lands. The source
keeps running until the fade-out is complete, so it is never cut while still
audible.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VoiceState {
    Starting,
    Playing,
    FadingOut,
    Stopped,
}

impl VoiceState {
    /// Starting and Playing are audible and controllable.
    pub fn is_playing(self) -> bool {
        matches!(self, VoiceState::Starting | VoiceState::Playing)
    }
}

/// Ramp lengths, in seconds, applied to a voice's gain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fades {
    pub fade_in: f32,
    pub fade_out: f32,
    pub volume_ramp: f32,
}

pub struct Voice {
    id: SoundId,
    generation: u64,
    channels: Vec<Box<dyn GraphNode>>,
    gain: GainRamp,
    current_volume: f32,
    state: VoiceState,
    sample_rate: f32,
    fades: Fades,
    scratch: Vec<f32>,
    gain_buffer: Vec<f32>,
}

impl Voice {
    /// A silent voice. Call `start` to begin the attack.
    pub fn new(
        id: SoundId,
        generation: u64,
        channels: Vec<Box<dyn GraphNode>>,
        sample_rate: f32,
        fades: Fades,
    ) -> Self {
        Self {
            id,
            generation,
            channels,
            gain: GainRamp::new(0.0),
            current_volume: 0.0,
            state: VoiceState::Starting,
            sample_rate,
            fades,
            scratch: vec![0.0; MAX_BLOCK_SIZE],
            gain_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    pub fn start(&mut self, volume: f32) {
        self.current_volume = clamp_volume(volume);
        self.state = VoiceState::Starting;
        self.gain.set(0.0);
        self.gain
            .ramp_to(self.current_volume, self.fades.fade_in, self.sample_rate);
    }

    /// Returns false when the voice no longer accepts volume changes.
    pub fn set_volume(&mut self, volume: f32) -> bool {
        if !self.state.is_playing() {
            return false;
        }
        self.current_volume = clamp_volume(volume);
        self.gain
            .ramp_to(self.current_volume, self.fades.volume_ramp, self.sample_rate);
        true
    }

    pub fn fade_out(&mut self) {
        if !self.state.is_playing() {
            return;
        }
        self.state = VoiceState::FadingOut;
        self.gain.ramp_to(0.0, self.fades.fade_out, self.sample_rate);
    }

    /// Skip the fade and go straight to `Stopped`.
    pub fn stop_now(&mut self) {
        self.state = VoiceState::Stopped;
        self.gain.set(0.0);
    }

    /// Add this voice's output to `left` and `right`.
    ///
    /// Both slices must have the same length, at most `MAX_BLOCK_SIZE`.
    /// Returns true when the block moved the voice to a new state.
    pub fn mix_into(&mut self, left: &mut [f32], right: &mut [f32], ctx: &RenderCtx) -> bool {
        if self.state == VoiceState::Stopped {
            return false;
        }

        let frames = left.len().min(right.len()).min(MAX_BLOCK_SIZE);
        let gain = &mut self.gain_buffer[..frames];
        self.gain.render(gain);

        for (graph, out) in self.channels.iter_mut().zip([left, right]) {
            let scratch = &mut self.scratch[..frames];
            graph.render_block(scratch, ctx);
            for ((o, s), g) in out.iter_mut().zip(scratch.iter()).zip(gain.iter()) {
                *o += s * g;
            }
        }

        self.advance()
    }

    fn advance(&mut self) -> bool {
        let next = match self.state {
            VoiceState::Starting if !self.gain.is_ramping() => VoiceState::Playing,
            VoiceState::FadingOut if !self.gain.is_ramping() => VoiceState::Stopped,
            _ if !self.channels.iter().any(|graph| graph.is_active()) => VoiceState::Stopped,
            state => state,
        };

        let changed = next != self.state;
        self.state = next;
        changed
    }

    pub fn id(&self) -> SoundId {
        self.id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    /// Last requested volume, clamped. Independent of master volume.
    pub fn current_volume(&self) -> f32 {
        self.current_volume
    }

    /// Gain applied to the most recent sample.
    pub fn gain(&self) -> f32 {
        self.gain.value()
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }
}
