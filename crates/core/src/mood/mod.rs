use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{MoodDiscoveryError, Result, Track};

/// Listening period used by the time-of-day suitability rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    #[default]
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    pub const ALL: [TimeOfDay; 4] = [
        TimeOfDay::Morning,
        TimeOfDay::Afternoon,
        TimeOfDay::Evening,
        TimeOfDay::Night,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Afternoon => "afternoon",
            TimeOfDay::Evening => "evening",
            TimeOfDay::Night => "night",
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Matches labels case-insensitively. Surrounding whitespace is not
/// stripped, so `" night "` is an unknown label.
impl FromStr for TimeOfDay {
    type Err = MoodDiscoveryError;

    fn from_str(s: &str) -> Result<Self> {
        TimeOfDay::ALL
            .into_iter()
            .find(|period| period.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| MoodDiscoveryError::msg(format!("unknown time of day `{s}`")))
    }
}

/// Current mood-map cursor together with the selected listening period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoodSettings {
    pub energy: f64,
    pub mood: f64,
    pub time_of_day: TimeOfDay,
}

impl Default for MoodSettings {
    fn default() -> Self {
        Self {
            energy: 0.5,
            mood: 0.5,
            time_of_day: TimeOfDay::Afternoon,
        }
    }
}

impl MoodSettings {
    /// Merges `update` over the current values. Unset fields are kept and
    /// nothing is range-checked.
    pub fn merge(&mut self, update: MoodSettingsUpdate) {
        if let Some(energy) = update.energy {
            self.energy = energy;
        }
        if let Some(mood) = update.mood {
            self.mood = mood;
        }
        if let Some(time_of_day) = update.time_of_day {
            self.time_of_day = time_of_day;
        }
    }

    pub fn point(&self) -> MoodPoint {
        MoodPoint {
            energy: self.energy,
            mood: self.mood,
        }
    }
}

/// Partial [`MoodSettings`] change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MoodSettingsUpdate {
    pub energy: Option<f64>,
    pub mood: Option<f64>,
    pub time_of_day: Option<TimeOfDay>,
}

impl MoodSettingsUpdate {
    pub fn energy(mut self, energy: f64) -> Self {
        self.energy = Some(energy);
        self
    }

    pub fn mood(mut self, mood: f64) -> Self {
        self.mood = Some(mood);
        self
    }

    pub fn time_of_day(mut self, time_of_day: TimeOfDay) -> Self {
        self.time_of_day = Some(time_of_day);
        self
    }
}

impl From<MoodPoint> for MoodSettingsUpdate {
    fn from(point: MoodPoint) -> Self {
        Self::default().energy(point.energy).mood(point.mood)
    }
}

/// Coordinate on the energy × mood plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoodPoint {
    pub energy: f64,
    pub mood: f64,
}

impl MoodPoint {
    pub fn new(energy: f64, mood: f64) -> Self {
        Self { energy, mood }
    }

    /// Maps a click at `(x, y)` on a `width` × `height` surface whose origin
    /// is the top-left corner. Energy grows to the right, mood grows upwards.
    pub fn from_surface(x: f64, y: f64, width: f64, height: f64) -> Result<Self> {
        if !(width > 0.0 && height > 0.0) {
            return Err(MoodDiscoveryError::InvalidInput(
                "mood map surface must have a positive size",
            ));
        }

        Ok(Self {
            energy: (x / width).clamp(0.0, 1.0),
            mood: (1.0 - y / height).clamp(0.0, 1.0),
        })
    }

    /// Both axes must be strictly closer than `radius`.
    pub fn is_near(&self, track: &Track, radius: f64) -> bool {
        (track.energy - self.energy).abs() < radius && (track.mood - self.mood).abs() < radius
    }
}

/// Tracks close to `target`, in catalog order.
pub fn filter_by_mood<'a>(tracks: &'a [Track], target: MoodPoint, radius: f64) -> Vec<&'a Track> {
    let matches: Vec<&Track> = tracks
        .iter()
        .filter(|track| target.is_near(track, radius))
        .collect();

    tracing::debug!(
        energy = target.energy,
        mood = target.mood,
        radius,
        matches = matches.len(),
        "filtered tracks by mood"
    );

    matches
}
