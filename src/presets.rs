//! Built-in sound mixes and the desired-mix shape hosts persist.
//!
//! A [`Preset`] is static catalog data. A [`SoundMix`] is what a settings
//! store keeps: the sounds the user wants and at what volume, plus the
//! master volume. `Engine::apply_mix` reconciles the engine against one.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{clamp_volume, sound::SoundId};

/// Volume a sound gets when toggled on without one.
pub const DEFAULT_SOUND_VOLUME: f32 = 0.5;
/// Master volume of a fresh mix.
pub const DEFAULT_MASTER_VOLUME: f32 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preset {
    pub id: &'static str,
    pub name: &'static str,
    pub sounds: &'static [(SoundId, f32)],
}

pub static PRESETS: [Preset; 6] = [
    Preset {
        id: "rainy-cafe",
        name: "Rainy Café",
        sounds: &[(SoundId::RainLight, 0.6), (SoundId::Cafe, 0.4)],
    },
    Preset {
        id: "forest-retreat",
        name: "Forest Retreat",
        sounds: &[(SoundId::Forest, 0.7), (SoundId::Birds, 0.4)],
    },
    Preset {
        id: "cozy-fire",
        name: "Cozy Fire",
        sounds: &[(SoundId::Fire, 0.6), (SoundId::RainLight, 0.3)],
    },
    Preset {
        id: "ocean-breeze",
        name: "Ocean Breeze",
        sounds: &[(SoundId::Ocean, 0.7)],
    },
    Preset {
        id: "deep-focus",
        name: "Deep Focus",
        sounds: &[(SoundId::BrownNoise, 0.5)],
    },
    Preset {
        id: "lofi-rain",
        name: "Lo-Fi & Rain",
        sounds: &[(SoundId::Lofi, 0.5), (SoundId::RainLight, 0.3)],
    },
];

pub fn find(id: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|preset| preset.id == id)
}

/// Desired sounds and volumes. Volumes are clamped on the way in.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SoundMix {
    sounds: BTreeMap<SoundId, f32>,
    master_volume: f32,
}

impl Default for SoundMix {
    fn default() -> Self {
        Self {
            sounds: BTreeMap::new(),
            master_volume: DEFAULT_MASTER_VOLUME,
        }
    }
}

impl SoundMix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_preset(preset: &Preset, master_volume: f32) -> Self {
        let mut mix = Self::new().with_master_volume(master_volume);
        for &(id, volume) in preset.sounds {
            mix.set_volume(id, volume);
        }
        mix
    }

    pub fn with_sound(mut self, id: SoundId, volume: f32) -> Self {
        self.set_volume(id, volume);
        self
    }

    pub fn with_master_volume(mut self, volume: f32) -> Self {
        self.set_master_volume(volume);
        self
    }

    pub fn set_volume(&mut self, id: SoundId, volume: f32) {
        self.sounds.insert(id, clamp_volume(volume));
    }

    pub fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = clamp_volume(volume);
    }

    /// Remove `id` if present, otherwise add it at the default volume.
    pub fn toggle(&mut self, id: SoundId) {
        if self.sounds.remove(&id).is_none() {
            self.sounds.insert(id, DEFAULT_SOUND_VOLUME);
        }
    }

    pub fn remove(&mut self, id: SoundId) {
        self.sounds.remove(&id);
    }

    pub fn clear(&mut self) {
        self.sounds.clear();
    }

    pub fn contains(&self, id: SoundId) -> bool {
        self.sounds.contains_key(&id)
    }

    pub fn volume(&self, id: SoundId) -> Option<f32> {
        self.sounds.get(&id).copied()
    }

    /// Sounds in catalog order.
    pub fn sounds(&self) -> impl Iterator<Item = (SoundId, f32)> + '_ {
        self.sounds.iter().map(|(id, volume)| (*id, *volume))
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }
}
