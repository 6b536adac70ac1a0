//! Core library for the Mood Discovery application.
//!
//! The crate models a small music-discovery engine: a validated in-memory
//! catalog, a shared selection store and the pure heuristics that sit on top
//! of them (mood-map filtering, genre relations and track classification).
//! Each module owns one concern and the command line front end in the
//! application crate drives them together.

pub mod catalog;
pub mod classify;
pub mod config;
pub mod error;
pub mod genre;
pub mod mood;
pub mod store;

pub use catalog::{Catalog, Track, TrackFeatures};
pub use classify::{
    format_duration, is_good_time, is_good_time_label, Classifier, FeatureReading, MoodTag,
    Suitability, TrackProfile,
};
pub use config::{DiscoveryConfig, Limits, Thresholds};
pub use error::{MoodDiscoveryError, Result};
pub use genre::{GenreMap, GenreSelection};
pub use mood::{filter_by_mood, MoodPoint, MoodSettings, MoodSettingsUpdate, TimeOfDay};
pub use store::{DiscoveryStore, NowPlaying, StoreHandle};
