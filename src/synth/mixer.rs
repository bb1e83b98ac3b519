use rtrb::Producer;

use crate::{
    clamp_volume,
    dsp::ramp::GainRamp,
    graph::node::RenderCtx,
    sound::SoundId,
    synth::{
        message::{MixerCommand, MixerEvent, RenderQueues},
        voice::{Voice, VoiceState},
    },
    MAX_BLOCK_SIZE,
};

/*
Mixer and Master Bus
====================

The mixer runs on the audio thread and owns every live voice:

  control thread                       render thread
  ──────────────                       ─────────────
  Engine ──MixerCommand──► [rtrb] ──► Mixer
                                        │ slot[id] ─► voice L/R ─┐
                                        │ slot[id] ─► voice L/R ─┼─► bus L/R ─► master gain ─► device
                                        │ ...                    ┘
  Engine ◄──MixerEvent──── [rtrb] ◄─────┘  (Playing, Retired)

There is one slot per SoundId, so two voices for the same sound can never be
in the mix together: installing into an occupied slot force-stops the previous
occupant first.

Effective loudness is voice gain × master gain, multiplied per sample here.
Neither value is ever folded into the other, so master volume changes cost one
ramp regardless of how many voices are playing.

Nothing in `render` allocates, locks or blocks. Finished voices are pushed back
to the control thread, which drops them.
*/

pub struct MasterBus {
    gain: GainRamp,
    ramp_seconds: f32,
}

impl MasterBus {
    pub fn new(volume: f32, ramp_seconds: f32) -> Self {
        Self {
            gain: GainRamp::new(clamp_volume(volume)),
            ramp_seconds,
        }
    }

    pub fn set_volume(&mut self, volume: f32, sample_rate: f32) {
        self.gain
            .ramp_to(clamp_volume(volume), self.ramp_seconds, sample_rate);
    }

    pub fn render(&mut self, out: &mut [f32]) {
        self.gain.render(out);
    }
}

pub struct Mixer {
    sample_rate: f32,
    channels: usize,
    queues: RenderQueues,
    slots: [Option<Box<Voice>>; SoundId::COUNT],
    bus: [Vec<f32>; 2],
    master: MasterBus,
    master_buffer: Vec<f32>,
}

impl Mixer {
    pub fn new(sample_rate: f32, channels: usize, queues: RenderQueues, master: MasterBus) -> Self {
        Self {
            sample_rate,
            channels: channels.max(1),
            queues,
            slots: std::array::from_fn(|_| None),
            bus: [vec![0.0; MAX_BLOCK_SIZE], vec![0.0; MAX_BLOCK_SIZE]],
            master,
            master_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    /// Number of voices currently in the mix (any state but `Stopped`).
    pub fn active_voices(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Render interleaved frames for the device, `channels` samples per frame.
    pub fn render(&mut self, out: &mut [f32]) {
        self.process_commands();

        let channels = self.channels;
        for chunk in out.chunks_mut(MAX_BLOCK_SIZE * channels) {
            let frames = chunk.len() / channels;
            self.render_bus(frames);

            let [left, right] = &self.bus;
            for (frame, (l, r)) in chunk
                .chunks_exact_mut(channels)
                .zip(left[..frames].iter().zip(&right[..frames]))
            {
                if channels == 1 {
                    frame[0] = (l + r) * 0.5;
                } else {
                    for (c, sample) in frame.iter_mut().enumerate() {
                        *sample = if c % 2 == 0 { *l } else { *r };
                    }
                }
            }
            chunk[frames * channels..].fill(0.0);
        }
    }

    fn process_commands(&mut self) {
        while let Ok(command) = self.queues.commands.pop() {
            match command {
                MixerCommand::Install(voice) => {
                    let slot = &mut self.slots[voice.id().index()];
                    if let Some(mut previous) = slot.replace(voice) {
                        previous.stop_now();
                        retire(&mut self.queues.events, previous);
                    }
                }
                MixerCommand::SetVolume { id, volume } => {
                    if let Some(voice) = self.slots[id.index()].as_mut() {
                        voice.set_volume(volume);
                    }
                }
                MixerCommand::FadeOut { id } => {
                    if let Some(voice) = self.slots[id.index()].as_mut() {
                        voice.fade_out();
                    }
                }
                MixerCommand::Kill { id } => {
                    if let Some(mut voice) = self.slots[id.index()].take() {
                        voice.stop_now();
                        retire(&mut self.queues.events, voice);
                    }
                }
                MixerCommand::SetMasterVolume(volume) => {
                    self.master.set_volume(volume, self.sample_rate);
                }
            }
        }
    }

    fn render_bus(&mut self, frames: usize) {
        let ctx = RenderCtx::new(self.sample_rate);
        let [left, right] = &mut self.bus;
        let left = &mut left[..frames];
        let right = &mut right[..frames];
        left.fill(0.0);
        right.fill(0.0);

        for slot in self.slots.iter_mut() {
            let Some(voice) = slot.as_mut() else {
                continue;
            };

            if !voice.mix_into(left, right, &ctx) {
                continue;
            }

            match voice.state() {
                VoiceState::Playing => {
                    let event = MixerEvent::Playing {
                        id: voice.id(),
                        generation: voice.generation(),
                    };
                    // A lost notification only delays the registry update
                    let _ = self.queues.events.push(event);
                }
                VoiceState::Stopped => {
                    if let Some(voice) = slot.take() {
                        retire(&mut self.queues.events, voice);
                    }
                }
                VoiceState::Starting | VoiceState::FadingOut => {}
            }
        }

        let master = &mut self.master_buffer[..frames];
        self.master.render(master);
        for ((l, r), g) in left.iter_mut().zip(right.iter_mut()).zip(master.iter()) {
            *l *= g;
            *r *= g;
        }
    }
}

fn retire(events: &mut Producer<MixerEvent>, voice: Box<Voice>) {
    // A full queue hands the voice back and it is freed here. Only happens
    // once the control side has stopped polling.
    let _ = events.push(MixerEvent::Retired(voice));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        graph::GraphNode,
        synth::{
            message::{queues, ControlQueues},
            voice::Fades,
        },
    };

    const SAMPLE_RATE: f32 = 1_000.0;

    struct Dc(f32);

    impl GraphNode for Dc {
        fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
            out.fill(self.0);
        }
    }

    fn dc_voice(id: SoundId, generation: u64, left: f32, right: f32, volume: f32) -> Box<Voice> {
        let channels: Vec<Box<dyn GraphNode>> = vec![Box::new(Dc(left)), Box::new(Dc(right))];
        let fades = Fades {
            fade_in: 0.0,
            fade_out: 0.1,
            volume_ramp: 0.0,
        };
        let mut voice = Voice::new(id, generation, channels, SAMPLE_RATE, fades);
        voice.start(volume);
        Box::new(voice)
    }

    fn mixer(channels: usize) -> (Mixer, ControlQueues) {
        let (control, render) = queues(64);
        let master = MasterBus::new(1.0, 0.0);
        (Mixer::new(SAMPLE_RATE, channels, render, master), control)
    }

    fn send(control: &mut ControlQueues, command: MixerCommand) {
        assert!(control.commands.push(command).is_ok());
    }

    fn drain(control: &mut ControlQueues) -> Vec<MixerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = control.events.pop() {
            events.push(event);
        }
        events
    }

    #[test]
    fn output_is_voice_volume_times_master() {
        let (mut mixer, mut control) = mixer(2);
        send(&mut control, MixerCommand::Install(dc_voice(SoundId::Fire, 1, 1.0, 1.0, 0.5)));
        send(&mut control, MixerCommand::SetMasterVolume(0.8));

        let mut out = vec![0.0; 16];
        mixer.render(&mut out);
        assert!(out.iter().all(|&s| (s - 0.4).abs() < 1e-6));
    }

    #[test]
    fn master_zero_silences_and_restores_exactly() {
        let (mut mixer, mut control) = mixer(2);
        send(&mut control, MixerCommand::Install(dc_voice(SoundId::Fire, 1, 1.0, 1.0, 0.6)));

        let mut before = vec![0.0; 8];
        mixer.render(&mut before);

        send(&mut control, MixerCommand::SetMasterVolume(0.0));
        let mut muted = vec![0.0; 8];
        mixer.render(&mut muted);
        assert!(muted.iter().all(|&s| s == 0.0));

        send(&mut control, MixerCommand::SetMasterVolume(1.0));
        let mut after = vec![0.0; 8];
        mixer.render(&mut after);
        assert_eq!(before, after);
    }

    #[test]
    fn install_replaces_and_retires_previous_voice() {
        let (mut mixer, mut control) = mixer(2);
        send(&mut control, MixerCommand::Install(dc_voice(SoundId::WhiteNoise, 1, 1.0, 1.0, 0.5)));
        send(&mut control, MixerCommand::Install(dc_voice(SoundId::WhiteNoise, 2, 1.0, 1.0, 0.9)));

        let mut out = vec![0.0; 4];
        mixer.render(&mut out);

        assert_eq!(mixer.active_voices(), 1);
        // One voice at 0.9, not a sum
        assert!(out.iter().all(|&s| (s - 0.9).abs() < 1e-6));

        let retired: Vec<_> = drain(&mut control)
            .into_iter()
            .filter_map(|event| match event {
                MixerEvent::Retired(voice) => Some(voice),
                MixerEvent::Playing { .. } => None,
            })
            .collect();
        assert_eq!(retired.len(), 1);
        assert_eq!(retired[0].generation(), 1);
        assert_eq!(retired[0].state(), VoiceState::Stopped);
    }

    #[test]
    fn fade_out_retires_after_release() {
        let (mut mixer, mut control) = mixer(2);
        send(&mut control, MixerCommand::Install(dc_voice(SoundId::Ocean, 3, 1.0, 1.0, 1.0)));
        let mut out = vec![0.0; 20];
        mixer.render(&mut out);
        drain(&mut control);

        send(&mut control, MixerCommand::FadeOut { id: SoundId::Ocean });
        // 100 ms release at 1 kHz = 100 frames = 200 interleaved samples
        let mut out = vec![0.0; 180];
        mixer.render(&mut out);
        assert_eq!(mixer.active_voices(), 1);
        assert!(drain(&mut control).is_empty());

        let mut out = vec![0.0; 40];
        mixer.render(&mut out);
        assert_eq!(mixer.active_voices(), 0);
        assert!(matches!(
            drain(&mut control).as_slice(),
            [MixerEvent::Retired(voice)] if voice.generation() == 3
        ));
    }

    #[test]
    fn reports_playing_once_attack_completes() {
        let (mut mixer, mut control) = mixer(2);
        send(&mut control, MixerCommand::Install(dc_voice(SoundId::Birds, 7, 1.0, 1.0, 1.0)));
        let mut out = vec![0.0; 4];
        mixer.render(&mut out);

        assert!(matches!(
            drain(&mut control).as_slice(),
            [MixerEvent::Playing { id: SoundId::Birds, generation: 7 }]
        ));
    }

    #[test]
    fn mono_device_gets_downmix() {
        let (mut mixer, mut control) = mixer(1);
        send(&mut control, MixerCommand::Install(dc_voice(SoundId::Cafe, 1, 1.0, 0.0, 1.0)));
        let mut out = vec![0.0; 8];
        mixer.render(&mut out);
        assert!(out.iter().all(|&s| (s - 0.5).abs() < 1e-6));
    }

    #[test]
    fn surround_device_repeats_left_right() {
        let (mut mixer, mut control) = mixer(4);
        send(&mut control, MixerCommand::Install(dc_voice(SoundId::Cafe, 1, 1.0, 0.25, 1.0)));
        let mut out = vec![0.0; 8];
        mixer.render(&mut out);
        assert_eq!(out, vec![1.0, 0.25, 1.0, 0.25, 1.0, 0.25, 1.0, 0.25]);
    }

    #[test]
    fn large_buffers_are_rendered_in_blocks() {
        let (mut mixer, mut control) = mixer(2);
        send(&mut control, MixerCommand::Install(dc_voice(SoundId::Fire, 1, 1.0, 1.0, 1.0)));
        let mut out = vec![0.0; MAX_BLOCK_SIZE * 2 * 3 + 6];
        mixer.render(&mut out);
        assert!(out.iter().all(|&s| s == 1.0));
    }

    #[test]
    fn kill_on_empty_slot_is_a_no_op() {
        let (mut mixer, mut control) = mixer(2);
        send(&mut control, MixerCommand::Kill { id: SoundId::Thunder });
        send(&mut control, MixerCommand::FadeOut { id: SoundId::Thunder });
        let mut out = vec![1.0; 4];
        mixer.render(&mut out);
        assert!(out.iter().all(|&s| s == 0.0));
        assert!(drain(&mut control).is_empty());
    }
}
