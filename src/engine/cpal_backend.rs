//! CPAL output backend
//!
//! `cpal::Stream` is not `Send` on every host, so each context owns a
//! dedicated output thread that builds, plays, pauses and drops the stream.
//! The engine talks to it over a small command channel; only context
//! lifecycle calls cross it, never audio.
//!
//! ```text
//! ┌──────────────┐  StreamCommand   ┌──────────────────┐
//! │    Engine    │────(mpsc)───────►│  output thread   │ owns cpal::Stream
//! │ CpalContext  │◄───(mpsc)────────│                  │
//! └──────────────┘  EngineResult    └────────┬─────────┘
//!                                            │ data callback
//!                                            ▼
//!                                   ┌──────────────────┐
//!                                   │  Mixer::render   │ real-time thread
//!                                   └──────────────────┘
//! ```

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Receiver, Sender},
        Arc,
    },
    thread::{self, JoinHandle},
};

use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    FromSample, SampleFormat, SizedSample, Stream, StreamConfig, StreamError,
};

use crate::{
    engine::{
        error::{EngineError, EngineResult},
        output::{ContextState, OutputBackend, OutputContext, OutputSpec},
    },
    synth::Mixer,
    MAX_BLOCK_SIZE,
};

/// Default host, default output device, default output config.
#[derive(Debug, Default)]
pub struct CpalBackend;

impl CpalBackend {
    pub fn new() -> Self {
        Self
    }
}

enum StreamCommand {
    Start(Mixer),
    Play,
    Pause,
    Close,
}

struct CpalContext {
    commands: Sender<StreamCommand>,
    replies: Receiver<EngineResult<()>>,
    thread: Option<JoinHandle<()>>,
    spec: OutputSpec,
    state: ContextState,
    /// Set from the stream's error callback when the device goes away.
    device_lost: Arc<AtomicBool>,
}

impl OutputBackend for CpalBackend {
    fn create_context(&mut self) -> EngineResult<Box<dyn OutputContext>> {
        let (command_tx, command_rx) = mpsc::channel();
        let (reply_tx, reply_rx) = mpsc::channel();
        let (spec_tx, spec_rx) = mpsc::channel();
        let device_lost = Arc::new(AtomicBool::new(false));

        let lost = Arc::clone(&device_lost);
        let thread = thread::Builder::new()
            .name("soundscape-output".into())
            .spawn(move || output_thread(command_rx, reply_tx, spec_tx, lost))
            .map_err(|e| EngineError::OutputThread(e.to_string()))?;

        let spec = spec_rx
            .recv()
            .map_err(|_| EngineError::OutputThread("output thread exited".into()))??;

        Ok(Box::new(CpalContext {
            commands: command_tx,
            replies: reply_rx,
            thread: Some(thread),
            spec,
            state: ContextState::Suspended,
            device_lost,
        }))
    }
}

impl CpalContext {
    fn request(&mut self, command: StreamCommand) -> EngineResult<()> {
        if self.state == ContextState::Closed {
            return Err(EngineError::ContextClosed);
        }

        let lost = || EngineError::OutputThread("output thread exited".into());
        self.commands.send(command).map_err(|_| lost())?;
        match self.replies.recv() {
            Ok(result) => result,
            Err(_) => {
                self.state = ContextState::Closed;
                Err(lost())
            }
        }
    }
}

impl OutputContext for CpalContext {
    fn spec(&self) -> OutputSpec {
        self.spec
    }

    fn state(&self) -> ContextState {
        if self.device_lost.load(Ordering::Acquire) {
            ContextState::Closed
        } else {
            self.state
        }
    }

    fn start(&mut self, mixer: Mixer) -> EngineResult<()> {
        self.request(StreamCommand::Start(mixer))?;
        self.state = ContextState::Running;
        Ok(())
    }

    fn resume(&mut self) -> EngineResult<()> {
        self.request(StreamCommand::Play)?;
        self.state = ContextState::Running;
        Ok(())
    }

    fn suspend(&mut self) -> EngineResult<()> {
        self.request(StreamCommand::Pause)?;
        self.state = ContextState::Suspended;
        Ok(())
    }

    fn close(&mut self) {
        if self.state != ContextState::Closed {
            let _ = self.commands.send(StreamCommand::Close);
            self.state = ContextState::Closed;
        }
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::warn!("Audio output thread panicked");
            }
        }
    }
}

impl Drop for CpalContext {
    fn drop(&mut self) {
        self.close();
    }
}

fn output_thread(
    commands: Receiver<StreamCommand>,
    replies: Sender<EngineResult<()>>,
    spec_tx: Sender<EngineResult<OutputSpec>>,
    device_lost: Arc<AtomicBool>,
) {
    let host = cpal::default_host();
    let device = match host.default_output_device() {
        Some(device) => device,
        None => {
            let _ = spec_tx.send(Err(EngineError::NoOutputDevice));
            return;
        }
    };

    let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());
    log::info!("Using audio device: {}", device_name);

    let supported = match device.default_output_config() {
        Ok(config) => config,
        Err(e) => {
            let _ = spec_tx.send(Err(EngineError::DeviceConfig(e.to_string())));
            return;
        }
    };

    let sample_format = supported.sample_format();
    let config: StreamConfig = supported.config();
    let spec = OutputSpec::new(config.sample_rate.0, config.channels);
    log::info!(
        "Audio config: {} channels, {}Hz, {:?}",
        spec.channels,
        spec.sample_rate,
        sample_format
    );

    if spec_tx.send(Ok(spec)).is_err() {
        return;
    }

    let mut stream: Option<Stream> = None;
    while let Ok(command) = commands.recv() {
        let result = match command {
            StreamCommand::Start(mixer) => {
                let lost = Arc::clone(&device_lost);
                build_stream(&device, &config, sample_format, mixer, lost).and_then(|built| {
                    built
                        .play()
                        .map_err(|e| EngineError::StreamPlay(e.to_string()))?;
                    log::info!("Audio stream started");
                    stream = Some(built);
                    Ok(())
                })
            }
            StreamCommand::Play => match stream.as_ref() {
                Some(stream) => stream
                    .play()
                    .map_err(|e| EngineError::StreamPlay(e.to_string())),
                None => Err(EngineError::StreamPlay("stream not started".into())),
            },
            StreamCommand::Pause => match stream.as_ref() {
                Some(stream) => stream
                    .pause()
                    .map_err(|e| EngineError::StreamPause(e.to_string())),
                None => Ok(()),
            },
            StreamCommand::Close => break,
        };

        if replies.send(result).is_err() {
            break;
        }
    }

    drop(stream);
    log::info!("Audio stream closed");
}

fn build_stream(
    device: &cpal::Device,
    config: &StreamConfig,
    sample_format: SampleFormat,
    mixer: Mixer,
    device_lost: Arc<AtomicBool>,
) -> EngineResult<Stream> {
    match sample_format {
        SampleFormat::F32 => build_typed_stream::<f32>(device, config, mixer, device_lost),
        SampleFormat::I16 => build_typed_stream::<i16>(device, config, mixer, device_lost),
        SampleFormat::U16 => build_typed_stream::<u16>(device, config, mixer, device_lost),
        other => Err(EngineError::UnsupportedFormat(format!("{other:?}"))),
    }
}

fn build_typed_stream<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    mut mixer: Mixer,
    device_lost: Arc<AtomicBool>,
) -> EngineResult<Stream>
where
    T: SizedSample + FromSample<f32>,
{
    // Whole frames, so every chunk handed to the mixer is frame-aligned
    let mut scratch = vec![0.0f32; MAX_BLOCK_SIZE * config.channels.max(1) as usize];

    device
        .build_output_stream(
            config,
            move |data: &mut [T], _| {
                for chunk in data.chunks_mut(scratch.len()) {
                    let block = &mut scratch[..chunk.len()];
                    mixer.render(block);
                    for (out, &sample) in chunk.iter_mut().zip(block.iter()) {
                        *out = T::from_sample(sample);
                    }
                }
            },
            move |err| handle_stream_error(&err, &device_lost),
            None,
        )
        .map_err(|e| EngineError::StreamBuild(e.to_string()))
}

/// Log a stream error. A vanished device marks the context closed so the
/// engine tears it down and opens a fresh one on the next `play`.
fn handle_stream_error(err: &StreamError, device_lost: &AtomicBool) {
    log::error!("Audio stream error: {}", err);
    if matches!(err, StreamError::DeviceNotAvailable) {
        device_lost.store(true, Ordering::Release);
    }
}
