#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{clamp_volume, synth::voice::Fades};

/// Engine tuning. Every duration is in seconds.
///
/// With the `serde` feature any field may be omitted and takes its default,
/// so a host can persist only what the user changed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Attack ramp applied by `play`.
    pub fade_in: f32,
    /// Release ramp applied by `stop`.
    pub fade_out: f32,
    /// Ramp applied by `set_volume`.
    pub volume_ramp: f32,
    /// Ramp applied by `set_master_volume`.
    pub master_ramp: f32,
    /// Length of each generated noise loop.
    pub loop_seconds: f32,
    /// Crossfade folded into the loop head.
    pub loop_crossfade: f32,
    /// Capacity of the control → render command queue.
    pub command_capacity: usize,
    /// Noise RNG seed. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Master volume before any `set_master_volume` call.
    pub master_volume: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fade_in: 0.05,
            fade_out: 0.2,
            volume_ramp: 0.02,
            master_ramp: 0.01,
            loop_seconds: 4.0,
            loop_crossfade: 0.05,
            command_capacity: 256,
            seed: None,
            master_volume: 1.0,
        }
    }
}

impl EngineConfig {
    pub fn with_fade_in(mut self, seconds: f32) -> Self {
        self.fade_in = seconds;
        self
    }

    pub fn with_fade_out(mut self, seconds: f32) -> Self {
        self.fade_out = seconds;
        self
    }

    pub fn with_volume_ramp(mut self, seconds: f32) -> Self {
        self.volume_ramp = seconds;
        self
    }

    pub fn with_master_ramp(mut self, seconds: f32) -> Self {
        self.master_ramp = seconds;
        self
    }

    pub fn with_loop_seconds(mut self, seconds: f32) -> Self {
        self.loop_seconds = seconds;
        self
    }

    pub fn with_loop_crossfade(mut self, seconds: f32) -> Self {
        self.loop_crossfade = seconds;
        self
    }

    pub fn with_command_capacity(mut self, capacity: usize) -> Self {
        self.command_capacity = capacity;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_master_volume(mut self, volume: f32) -> Self {
        self.master_volume = volume;
        self
    }

    /// Clamp every field into a usable range. NaN durations become 0.
    pub fn sanitized(mut self) -> Self {
        let seconds = |value: f32, max: f32| {
            if value.is_nan() {
                0.0
            } else {
                value.clamp(0.0, max)
            }
        };

        self.fade_in = seconds(self.fade_in, 10.0);
        self.fade_out = seconds(self.fade_out, 10.0);
        self.volume_ramp = seconds(self.volume_ramp, 10.0);
        self.master_ramp = seconds(self.master_ramp, 10.0);
        self.loop_seconds = seconds(self.loop_seconds, 30.0).max(0.5);
        self.loop_crossfade = seconds(self.loop_crossfade, self.loop_seconds / 2.0);
        self.command_capacity = self.command_capacity.max(16);
        self.master_volume = clamp_volume(self.master_volume);
        self
    }

    pub fn fades(&self) -> Fades {
        Fades {
            fade_in: self.fade_in,
            fade_out: self.fade_out,
            volume_ramp: self.volume_ramp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitized_clamps_out_of_range_values() {
        let config = EngineConfig::default()
            .with_fade_in(-1.0)
            .with_fade_out(f32::NAN)
            .with_loop_seconds(0.0)
            .with_loop_crossfade(5.0)
            .with_command_capacity(0)
            .with_master_volume(3.0)
            .sanitized();

        assert_eq!(config.fade_in, 0.0);
        assert_eq!(config.fade_out, 0.0);
        assert_eq!(config.loop_seconds, 0.5);
        assert_eq!(config.loop_crossfade, 0.25);
        assert_eq!(config.command_capacity, 16);
        assert_eq!(config.master_volume, 1.0);
    }

    #[test]
    fn defaults_survive_sanitizing() {
        assert_eq!(EngineConfig::default().sanitized(), EngineConfig::default());
    }
}
