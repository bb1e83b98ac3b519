//! The closed catalog of ambient sounds.
//!
//! Every sound the engine can play is a `SoundId`. Each id maps to exactly one
//! static `SynthesisRecipe` (see [`recipe`]), so there is no dynamic lookup
//! and nothing to fail at runtime.

pub mod recipe;

use std::{fmt, str::FromStr};

use thiserror::Error;

pub use recipe::{CutoffLfo, FilterStage, OscSpec, SourceKind, SynthesisRecipe};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum SoundId {
    RainLight,
    RainHeavy,
    Thunder,
    Forest,
    Ocean,
    Birds,
    Fire,
    Cafe,
    Lofi,
    WhiteNoise,
    PinkNoise,
    BrownNoise,
}

impl SoundId {
    pub const COUNT: usize = 12;

    pub const ALL: [SoundId; SoundId::COUNT] = [
        SoundId::RainLight,
        SoundId::RainHeavy,
        SoundId::Thunder,
        SoundId::Forest,
        SoundId::Ocean,
        SoundId::Birds,
        SoundId::Fire,
        SoundId::Cafe,
        SoundId::Lofi,
        SoundId::WhiteNoise,
        SoundId::PinkNoise,
        SoundId::BrownNoise,
    ];

    /// Dense index into `ALL`, used for the mixer's fixed slot table.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Stable string id, e.g. `"rain-light"`.
    pub const fn as_str(self) -> &'static str {
        match self {
            SoundId::RainLight => "rain-light",
            SoundId::RainHeavy => "rain-heavy",
            SoundId::Thunder => "thunder",
            SoundId::Forest => "forest",
            SoundId::Ocean => "ocean",
            SoundId::Birds => "birds",
            SoundId::Fire => "fire",
            SoundId::Cafe => "cafe",
            SoundId::Lofi => "lofi",
            SoundId::WhiteNoise => "white-noise",
            SoundId::PinkNoise => "pink-noise",
            SoundId::BrownNoise => "brown-noise",
        }
    }

    /// Human-readable name.
    pub const fn name(self) -> &'static str {
        match self {
            SoundId::RainLight => "Light Rain",
            SoundId::RainHeavy => "Heavy Rain",
            SoundId::Thunder => "Thunder",
            SoundId::Forest => "Forest",
            SoundId::Ocean => "Ocean Waves",
            SoundId::Birds => "Birds",
            SoundId::Fire => "Fireplace",
            SoundId::Cafe => "Coffee Shop",
            SoundId::Lofi => "Lo-fi Pad",
            SoundId::WhiteNoise => "White Noise",
            SoundId::PinkNoise => "Pink Noise",
            SoundId::BrownNoise => "Brown Noise",
        }
    }

    pub const fn category(self) -> SoundCategory {
        match self {
            SoundId::RainLight | SoundId::RainHeavy | SoundId::Thunder => SoundCategory::Rain,
            SoundId::Forest | SoundId::Ocean | SoundId::Birds => SoundCategory::Nature,
            SoundId::Fire | SoundId::Cafe | SoundId::Lofi => SoundCategory::Ambient,
            SoundId::WhiteNoise | SoundId::PinkNoise | SoundId::BrownNoise => {
                SoundCategory::Noise
            }
        }
    }
}

impl fmt::Display for SoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sound id: {0:?}")]
pub struct UnknownSound(pub String);

impl FromStr for SoundId {
    type Err = UnknownSound;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SoundId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownSound(s.to_string()))
    }
}

/// Grouping used by hosts to lay out the sound picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum SoundCategory {
    Rain,
    Nature,
    Ambient,
    Noise,
}

impl SoundCategory {
    pub fn sounds(self) -> impl Iterator<Item = SoundId> {
        SoundId::ALL
            .into_iter()
            .filter(move |id| id.category() == self)
    }
}
