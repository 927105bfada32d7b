//! Game settings and preferences
//!
//! Persisted separately from progression, under their own storage key.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::persistence::{self, PersistError, Storage};
use crate::tuning::Tuning;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown quality preset {0:?} (expected low, medium or high)")]
pub struct ParsePresetError(String);

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    /// Particle pool capacity for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 150,
            QualityPreset::Medium => 400,
            QualityPreset::High => 800,
        }
    }
}

impl FromStr for QualityPreset {
    type Err = ParsePresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(QualityPreset::Low),
            "medium" | "med" => Ok(QualityPreset::Medium),
            "high" => Ok(QualityPreset::High),
            _ => Err(ParsePresetError(s.to_string())),
        }
    }
}

impl fmt::Display for QualityPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Camera shake on kills, level-ups and game over
    pub screen_shake: bool,
    /// Particle effects (hits, blood, level-up bursts)
    pub particles: bool,
    /// Floating damage numbers
    pub floating_text: bool,

    // === HUD ===
    pub show_fps: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Mute when the window loses focus
    pub mute_on_blur: bool,

    // === Accessibility ===
    /// Reduced motion (no camera shake)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            screen_shake: true,
            particles: true,
            floating_text: true,

            show_fps: false,

            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            mute_on_blur: true,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "immuno_survivor_settings";

    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective particle pool capacity
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Balance sheet with the cosmetic toggles of these settings applied
    pub fn tuned(&self, tuning: &Tuning) -> Tuning {
        let mut tuned = *tuning;
        tuned.screen_shake = self.effective_screen_shake();
        tuned.pools.particles = self.max_particles();
        if !self.floating_text {
            tuned.pools.floating_texts = 0;
        }
        tuned
    }

    /// Load settings, falling back to defaults when missing or unreadable
    pub fn load(storage: &dyn Storage) -> Self {
        persistence::load_or_default(storage, Self::STORAGE_KEY)
    }

    pub fn save(&self, storage: &mut dyn Storage) -> Result<(), PersistError> {
        persistence::save_json(storage, Self::STORAGE_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}
