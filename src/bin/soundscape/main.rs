//! soundscape - play ambient sounds on the default output device
//!
//! Run with:
//!   cargo run --features cpal -- rainy-cafe 60
//!   cargo run --features cpal -- ocean=0.7 thunder=0.3 30
//!
//! Arguments are a preset id or any number of `sound=volume` pairs, optionally
//! followed by a duration in seconds (default 30). Set `RUST_LOG=debug` to
//! watch voices start and retire.

use std::{thread, time::Duration};

use color_eyre::eyre::{bail, eyre, WrapErr};
use soundscape_dsp::{presets, Engine, EngineConfig, SoundId};

const DEFAULT_SECONDS: f32 = 30.0;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut sounds: Vec<(SoundId, f32)> = Vec::new();
    let mut seconds = DEFAULT_SECONDS;

    for arg in std::env::args().skip(1) {
        if let Some(preset) = presets::find(&arg) {
            sounds.extend_from_slice(preset.sounds);
        } else if let Some((id, volume)) = arg.split_once('=') {
            let id: SoundId = id.parse()?;
            let volume: f32 = volume
                .parse()
                .wrap_err_with(|| format!("invalid volume for {id}"))?;
            sounds.push((id, volume));
        } else if let Ok(value) = arg.parse::<f32>() {
            seconds = value;
        } else {
            bail!("expected a preset, `sound=volume` or seconds, got {arg:?}");
        }
    }

    if sounds.is_empty() {
        println!("=== soundscape ===");
        println!("Presets:");
        for preset in &presets::PRESETS {
            println!("  {:<16} {}", preset.id, preset.name);
        }
        println!("Sounds:");
        for id in SoundId::ALL {
            println!("  {:<16} {}", id.as_str(), id.name());
        }
        return Ok(());
    }

    let engine = Engine::new(EngineConfig::default());
    for (id, volume) in sounds {
        engine.play(id, volume);
        if !engine.is_playing(id) {
            return Err(eyre!("could not start {id}; is an output device available?"));
        }
        println!("  {:<16} {:.2}", id.name(), volume);
    }

    println!("Playing for {seconds} s... Press Ctrl+C to stop");
    thread::sleep(play_duration(seconds)?);

    engine.stop_all();
    // Let the fade-out finish before the device goes away
    thread::sleep(Duration::from_secs_f32(engine.config().fade_out + 0.05));
    engine.shutdown();

    Ok(())
}

/// Reject durations `Duration` cannot hold (`inf`, absurdly large).
fn play_duration(seconds: f32) -> color_eyre::Result<Duration> {
    match Duration::try_from_secs_f32(seconds.max(0.0)) {
        Ok(duration) => Ok(duration),
        Err(_) => bail!("cannot play for {seconds} s"),
    }
}
