use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{MoodSettings, Result};

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    pub thresholds: Thresholds,
    pub defaults: MoodSettings,
    pub limits: Limits,
}

impl DiscoveryConfig {
    /// Reads a JSON configuration file. Missing sections keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path.as_ref())?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Heuristic cut-offs used by the mood filter and the track classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Maximum per-axis distance for a track to count as close to the
    /// mood-map cursor. Comparison is strict.
    pub mood_radius: f64,
    pub low: f64,
    pub mid: f64,
    pub high: f64,
    /// Beats per minute above which a track is tagged for running.
    pub running_tempo: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            mood_radius: 0.3,
            low: 0.3,
            mid: 0.5,
            high: 0.7,
            running_tempo: 120.0,
        }
    }
}

/// Caps applied by the list views.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub mood_results: usize,
    pub genre_tracks: usize,
    pub user_genres: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            mood_results: 8,
            genre_tracks: 4,
            user_genres: 8,
        }
    }
}
