use std::sync::{Arc, Mutex, MutexGuard};

use crate::{
    filter_by_mood, Catalog, Classifier, DiscoveryConfig, MoodDiscoveryError, MoodSettings,
    MoodSettingsUpdate, Result, Track,
};

/// Mutable part of the store: what is selected, whether it plays and where
/// the mood-map cursor sits.
#[derive(Debug, Clone, Default)]
struct DiscoveryState {
    current_track: Option<Track>,
    is_playing: bool,
    mood_settings: MoodSettings,
}

/// Snapshot of the mini player shown while a track is selected.
#[derive(Debug, Clone, PartialEq)]
pub struct NowPlaying {
    pub track: Track,
    pub is_playing: bool,
}

/// Owns the catalog and the shared selection state. Consumers never look the
/// store up implicitly; they receive a [`StoreHandle`] from [`DiscoveryStore::handle`].
#[derive(Debug)]
pub struct DiscoveryStore {
    catalog: Arc<Catalog>,
    config: DiscoveryConfig,
    state: Arc<Mutex<DiscoveryState>>,
}

impl DiscoveryStore {
    pub fn new(catalog: Catalog, config: DiscoveryConfig) -> Self {
        let state = DiscoveryState {
            mood_settings: config.defaults,
            ..Default::default()
        };

        Self {
            catalog: Arc::new(catalog),
            config,
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Returns a cloneable view over this store. Every handle observes the
    /// same state.
    pub fn handle(&self) -> StoreHandle {
        StoreHandle {
            catalog: self.catalog.clone(),
            classifier: Classifier::new(self.config.thresholds),
            config: self.config.clone(),
            state: self.state.clone(),
        }
    }
}

/// Shared view over a [`DiscoveryStore`]. Updates through one handle are
/// visible to all others immediately; the last write wins.
#[derive(Clone)]
pub struct StoreHandle {
    catalog: Arc<Catalog>,
    classifier: Classifier,
    config: DiscoveryConfig,
    state: Arc<Mutex<DiscoveryState>>,
}

impl StoreHandle {
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn tracks(&self) -> &[Track] {
        self.catalog.tracks()
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    pub fn current_track(&self) -> Result<Option<Track>> {
        Ok(self.lock()?.current_track.clone())
    }

    pub fn is_playing(&self) -> Result<bool> {
        Ok(self.lock()?.is_playing)
    }

    pub fn mood_settings(&self) -> Result<MoodSettings> {
        Ok(self.lock()?.mood_settings)
    }

    /// `None` clears the selection.
    pub fn set_current_track(&self, track: Option<Track>) -> Result<()> {
        let mut state = self.lock()?;
        tracing::debug!(
            track = track.as_ref().map(|t| t.id.as_str()),
            "setting current track"
        );
        state.current_track = track;
        Ok(())
    }

    pub fn set_playing(&self, is_playing: bool) -> Result<()> {
        self.lock()?.is_playing = is_playing;
        Ok(())
    }

    /// Merges a partial update over the current settings. Values are stored
    /// as given.
    pub fn update_mood_settings(&self, update: MoodSettingsUpdate) -> Result<MoodSettings> {
        let mut state = self.lock()?;
        state.mood_settings.merge(update);
        tracing::debug!(settings = ?state.mood_settings, "updated mood settings");
        Ok(state.mood_settings)
    }

    /// Selects a track for the detail view without touching playback.
    pub fn open_deep_dive(&self, track: &Track) -> Result<()> {
        self.set_current_track(Some(track.clone()))
    }

    /// Selects `track` and marks it as playing.
    pub fn play_track(&self, track: &Track) -> Result<()> {
        let mut state = self.lock()?;
        state.current_track = Some(track.clone());
        state.is_playing = true;
        Ok(())
    }

    /// Play button on a track card: pauses or resumes the current track,
    /// otherwise switches to `track` and starts it. Returns the new playing
    /// flag.
    pub fn toggle_track(&self, track: &Track) -> Result<bool> {
        let mut state = self.lock()?;
        let is_current = state
            .current_track
            .as_ref()
            .is_some_and(|current| current.id == track.id);

        if is_current {
            state.is_playing = !state.is_playing;
        } else {
            state.current_track = Some(track.clone());
            state.is_playing = true;
        }

        Ok(state.is_playing)
    }

    /// Current track and playing flag, or `None` when nothing is selected.
    pub fn now_playing(&self) -> Result<Option<NowPlaying>> {
        let state = self.lock()?;
        Ok(state.current_track.clone().map(|track| NowPlaying {
            track,
            is_playing: state.is_playing,
        }))
    }

    /// Tracks near the current mood-map cursor, in catalog order.
    pub fn mood_matches(&self) -> Result<Vec<&Track>> {
        let target = self.mood_settings()?.point();
        Ok(filter_by_mood(
            self.catalog.tracks(),
            target,
            self.config.thresholds.mood_radius,
        ))
    }

    fn lock(&self) -> Result<MutexGuard<'_, DiscoveryState>> {
        self.state
            .lock()
            .map_err(|_| MoodDiscoveryError::msg("discovery state has been poisoned"))
    }
}

impl std::fmt::Debug for StoreHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreHandle")
            .field("tracks", &self.catalog.len())
            .finish()
    }
}
