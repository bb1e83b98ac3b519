use rtrb::{Consumer, Producer, RingBuffer};

use crate::{sound::SoundId, synth::voice::Voice};

/// Control thread → render thread.
pub enum MixerCommand {
    /// Install a built voice, force-stopping whatever holds its slot.
    Install(Box<Voice>),
    SetVolume { id: SoundId, volume: f32 },
    FadeOut { id: SoundId },
    /// Stop without a fade.
    Kill { id: SoundId },
    SetMasterVolume(f32),
}

/// Render thread → control thread.
pub enum MixerEvent {
    /// The attack ramp finished.
    Playing { id: SoundId, generation: u64 },
    /// The voice reached `Stopped` and left the mix. The receiver drops it.
    Retired(Box<Voice>),
}

/// Command producer and event consumer held by the engine.
pub struct ControlQueues {
    pub commands: Producer<MixerCommand>,
    pub events: Consumer<MixerEvent>,
}

/// Command consumer and event producer owned by the mixer.
pub struct RenderQueues {
    pub commands: Consumer<MixerCommand>,
    pub events: Producer<MixerEvent>,
}

/// Allocate both queues. The event queue is sized so every command plus one
/// retirement per slot can be in flight at once.
pub fn queues(capacity: usize) -> (ControlQueues, RenderQueues) {
    let (command_tx, command_rx) = RingBuffer::new(capacity);
    let (event_tx, event_rx) = RingBuffer::new(capacity * 2 + SoundId::COUNT);

    (
        ControlQueues {
            commands: command_tx,
            events: event_rx,
        },
        RenderQueues {
            commands: command_rx,
            events: event_tx,
        },
    )
}
