//! Derived descriptions of a single track: listening tags, a short mood
//! sentence and the periods of the day the track suits.
//!
//! Every function here is total. A missing feature reading simply fails the
//! rule that needs it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Thresholds, TimeOfDay, Track};

const MIN_TAGS: usize = 3;
const FALLBACK_TAGS: [MoodTag; 2] = [MoodTag::Chilling, MoodTag::Background];

/// Activity a track is a good fit for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoodTag {
    Relaxation,
    Workout,
    Reflection,
    Uplifting,
    Dancing,
    Focus,
    Study,
    Running,
    Chilling,
    Background,
}

impl MoodTag {
    pub fn as_str(self) -> &'static str {
        match self {
            MoodTag::Relaxation => "Relaxation",
            MoodTag::Workout => "Workout",
            MoodTag::Reflection => "Reflection",
            MoodTag::Uplifting => "Uplifting",
            MoodTag::Dancing => "Dancing",
            MoodTag::Focus => "Focus",
            MoodTag::Study => "Study",
            MoodTag::Running => "Running",
            MoodTag::Chilling => "Chilling",
            MoodTag::Background => "Background",
        }
    }
}

impl fmt::Display for MoodTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rule set parameterised by the configured [`Thresholds`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Classifier {
    thresholds: Thresholds,
}

impl Classifier {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Applies each primary rule in order, then pads with fallbacks while
    /// fewer than three tags were collected.
    pub fn tags(&self, track: &Track) -> Vec<MoodTag> {
        let t = &self.thresholds;
        let features = &track.features;
        let above = |value: Option<f64>, limit: f64| value.is_some_and(|v| v > limit);

        let rules = [
            (track.energy < t.low, MoodTag::Relaxation),
            (track.energy > t.high, MoodTag::Workout),
            (track.mood < t.low, MoodTag::Reflection),
            (track.mood > t.high, MoodTag::Uplifting),
            (above(features.danceability, t.high), MoodTag::Dancing),
            (above(features.acousticness, t.high), MoodTag::Focus),
            (above(features.instrumentalness, t.high), MoodTag::Study),
            (above(features.tempo, t.running_tempo), MoodTag::Running),
        ];

        let mut tags: Vec<MoodTag> = rules
            .into_iter()
            .filter_map(|(matched, tag)| matched.then_some(tag))
            .collect();

        for fallback in FALLBACK_TAGS {
            if tags.len() >= MIN_TAGS {
                break;
            }
            if !tags.contains(&fallback) {
                tags.push(fallback);
            }
        }

        tags
    }

    /// One or more sentences summarising the track's character.
    pub fn describe(&self, track: &Track) -> String {
        let t = &self.thresholds;
        let intensity = if track.energy < t.mid {
            "relaxed"
        } else {
            "energetic"
        };
        let tone = if track.mood < t.low {
            "dark"
        } else if track.mood > t.high {
            "very uplifting"
        } else {
            "balanced"
        };

        let mut description = format!("This {intensity} track has a {tone} emotional tone.");
        if track.features.acousticness.is_some_and(|v| v > t.high) {
            description.push_str(" It features organic acoustic elements.");
        }
        if track.features.danceability.is_some_and(|v| v > t.high) {
            description.push_str(" Has a strong groove that makes you want to move.");
        }
        description
    }
}

/// Fixed per-period rules for when a track is worth putting on.
pub fn is_good_time(track: &Track, time_of_day: TimeOfDay) -> bool {
    let (energy, mood) = (track.energy, track.mood);
    match time_of_day {
        TimeOfDay::Morning => energy > 0.5 && mood > 0.6,
        TimeOfDay::Afternoon => energy > 0.4 && mood > 0.4,
        TimeOfDay::Evening => energy < 0.6 && mood > 0.3,
        TimeOfDay::Night => energy < 0.5,
    }
}

/// Label based variant of [`is_good_time`]. Unrecognised labels are always
/// suitable.
pub fn is_good_time_label(track: &Track, label: &str) -> bool {
    label
        .parse::<TimeOfDay>()
        .map(|period| is_good_time(track, period))
        .unwrap_or(true)
}

/// Formats seconds as `m:ss`.
pub fn format_duration(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

fn percent(value: f64) -> u32 {
    (value * 100.0).round().clamp(0.0, 100.0) as u32
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureReading {
    pub name: &'static str,
    pub value: f64,
}

impl fmt::Display for FeatureReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name == "tempo" {
            write!(f, "{}: {:.0} BPM", self.name, self.value)
        } else {
            write!(f, "{}: {}%", self.name, percent(self.value))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Suitability {
    pub time_of_day: TimeOfDay,
    pub suitable: bool,
}

/// Everything the deep-dive view shows about a track.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackProfile {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub duration: String,
    pub energy_percent: u32,
    pub mood_percent: u32,
    pub features: Vec<FeatureReading>,
    pub description: String,
    pub tags: Vec<MoodTag>,
    pub listening: Vec<Suitability>,
}

impl TrackProfile {
    pub fn build(classifier: &Classifier, track: &Track) -> Self {
        Self {
            id: track.id.clone(),
            title: track.title.clone(),
            artist: track.artist.clone(),
            album: track.album.clone(),
            duration: format_duration(track.duration),
            energy_percent: percent(track.energy),
            mood_percent: percent(track.mood),
            features: track
                .features
                .readings()
                .into_iter()
                .map(|(name, value)| FeatureReading { name, value })
                .collect(),
            description: classifier.describe(track),
            tags: classifier.tags(track),
            listening: TimeOfDay::ALL
                .into_iter()
                .map(|time_of_day| Suitability {
                    time_of_day,
                    suitable: is_good_time(track, time_of_day),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog::tests::track, TrackFeatures};

    fn featured(energy: f64, mood: f64, features: TrackFeatures) -> Track {
        Track {
            features,
            ..track("t", energy, mood)
        }
    }

    fn calm_features() -> TrackFeatures {
        TrackFeatures {
            danceability: Some(0.1),
            tempo: Some(90.0),
            valence: None,
            acousticness: Some(0.1),
            instrumentalness: Some(0.1),
        }
    }

    #[test]
    fn low_energy_dark_track_gets_one_fallback() {
        let tags = Classifier::default().tags(&featured(0.2, 0.2, calm_features()));
        assert_eq!(
            tags,
            vec![MoodTag::Relaxation, MoodTag::Reflection, MoodTag::Chilling]
        );
    }

    #[test]
    fn neutral_track_gets_both_fallbacks() {
        let tags = Classifier::default().tags(&featured(0.5, 0.5, calm_features()));
        assert_eq!(tags, vec![MoodTag::Chilling, MoodTag::Background]);
    }

    #[test]
    fn missing_features_never_match() {
        let tags = Classifier::default().tags(&featured(0.5, 0.5, TrackFeatures::default()));
        assert_eq!(tags, vec![MoodTag::Chilling, MoodTag::Background]);
    }

    #[test]
    fn rules_accumulate_without_fallbacks() {
        let features = TrackFeatures {
            danceability: Some(0.9),
            tempo: Some(128.0),
            valence: Some(0.8),
            acousticness: Some(0.05),
            instrumentalness: Some(0.8),
        };
        let tags = Classifier::default().tags(&featured(0.9, 0.8, features));
        assert_eq!(
            tags,
            vec![
                MoodTag::Workout,
                MoodTag::Uplifting,
                MoodTag::Dancing,
                MoodTag::Study,
                MoodTag::Running,
            ]
        );
    }

    #[test]
    fn tempo_rule_is_strict() {
        let features = TrackFeatures {
            tempo: Some(120.0),
            ..TrackFeatures::default()
        };
        let tags = Classifier::default().tags(&featured(0.5, 0.5, features));
        assert!(!tags.contains(&MoodTag::Running));
    }

    #[test]
    fn custom_thresholds_shift_rules() {
        let classifier = Classifier::new(Thresholds {
            running_tempo: 80.0,
            ..Thresholds::default()
        });
        let tags = classifier.tags(&featured(0.5, 0.5, calm_features()));
        assert_eq!(
            tags,
            vec![MoodTag::Running, MoodTag::Chilling, MoodTag::Background]
        );
    }

    #[test]
    fn describes_tone_and_extras() {
        let classifier = Classifier::default();
        assert_eq!(
            classifier.describe(&featured(0.2, 0.2, calm_features())),
            "This relaxed track has a dark emotional tone."
        );

        let features = TrackFeatures {
            danceability: Some(0.8),
            acousticness: Some(0.9),
            ..TrackFeatures::default()
        };
        assert_eq!(
            classifier.describe(&featured(0.8, 0.9, features)),
            "This energetic track has a very uplifting emotional tone. \
             It features organic acoustic elements. \
             Has a strong groove that makes you want to move."
        );
        assert_eq!(
            classifier.describe(&featured(0.5, 0.5, TrackFeatures::default())),
            "This energetic track has a balanced emotional tone."
        );
    }

    #[test]
    fn high_energy_uplifting_suits_daytime_only() {
        let t = track("t", 0.8, 0.8);
        assert!(is_good_time(&t, TimeOfDay::Morning));
        assert!(is_good_time(&t, TimeOfDay::Afternoon));
        assert!(!is_good_time(&t, TimeOfDay::Evening));
        assert!(!is_good_time(&t, TimeOfDay::Night));
    }

    #[test]
    fn unknown_period_label_is_suitable() {
        let t = track("t", 0.9, 0.1);
        assert!(is_good_time_label(&t, "brunch"));
        assert!(!is_good_time_label(&t, "Night"));
        assert!(is_good_time_label(&t, " night "));
    }

    #[test]
    fn formats_durations() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(65), "1:05");
        assert_eq!(format_duration(600), "10:00");
    }

    #[test]
    fn profile_collects_every_view() {
        let profile = TrackProfile::build(&Classifier::default(), &featured(0.2, 0.2, calm_features()));
        assert_eq!(profile.duration, "3:20");
        assert_eq!(profile.energy_percent, 20);
        assert_eq!(profile.features.len(), 4);
        assert_eq!(profile.features[1].to_string(), "tempo: 90 BPM");
        assert_eq!(profile.listening.len(), 4);
        assert!(profile
            .listening
            .iter()
            .any(|s| s.time_of_day == TimeOfDay::Night && s.suitable));
        assert_eq!(profile.tags.len(), 3);
    }
}
