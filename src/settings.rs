//! Game settings and preferences
//!
//! Persisted as individual string keys so the landing page and the game
//! share them. Missing or malformed values fall back to defaults.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, StorageError};

/// Difficulty level; controls how many attackers hunt the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Strict parse of a stored value (case-insensitive, `normal` is `Medium`)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "normal" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Lenient parse: anything unrecognised is `Easy`
    pub fn parse(s: &str) -> Self {
        Self::from_str(s).unwrap_or_default()
    }

    /// Number of attackers for a session at this difficulty
    pub fn attacker_count(&self) -> usize {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }
}

/// Sound on/off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SoundSetting {
    #[default]
    On,
    Off,
}

impl SoundSetting {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundSetting::On => "on",
            SoundSetting::Off => "off",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "on" => Some(SoundSetting::On),
            "off" => Some(SoundSetting::Off),
            _ => None,
        }
    }

    pub fn enabled(&self) -> bool {
        *self == SoundSetting::On
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Settings {
    pub difficulty: Difficulty,
    pub sound: SoundSetting,
}

impl Settings {
    /// Storage keys
    pub const DIFFICULTY_KEY: &'static str = "arrowSurvival:difficulty";
    pub const SOUND_KEY: &'static str = "arrowSurvival:sound";

    /// Read settings, falling back per key on missing or bad values
    pub fn load(store: &impl KeyValueStore) -> Self {
        let difficulty = match store.get(Self::DIFFICULTY_KEY) {
            Ok(Some(raw)) => Difficulty::from_str(&raw).unwrap_or_else(|| {
                log::warn!("Unknown difficulty {raw:?}, using default");
                Difficulty::default()
            }),
            Ok(None) => Difficulty::default(),
            Err(e) => {
                log::warn!("Could not read difficulty ({e}), using default");
                Difficulty::default()
            }
        };

        let sound = match store.get(Self::SOUND_KEY) {
            Ok(Some(raw)) => SoundSetting::from_str(&raw).unwrap_or_else(|| {
                log::warn!("Unknown sound setting {raw:?}, using default");
                SoundSetting::default()
            }),
            Ok(None) => SoundSetting::default(),
            Err(e) => {
                log::warn!("Could not read sound setting ({e}), using default");
                SoundSetting::default()
            }
        };

        log::info!(
            "Settings: difficulty={} sound={}",
            difficulty.as_str(),
            sound.as_str()
        );
        Self { difficulty, sound }
    }

    /// Write both keys
    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<(), StorageError> {
        store.set(Self::DIFFICULTY_KEY, self.difficulty.as_str())?;
        store.set(Self::SOUND_KEY, self.sound.as_str())?;
        log::info!("Settings saved");
        Ok(())
    }
}
