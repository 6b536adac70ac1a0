use std::{collections::HashSet, fs, io::Read, path::Path};

use serde::{Deserialize, Serialize};

use crate::{GenreMap, MoodDiscoveryError, Result};

const SAMPLE_CATALOG: &str = include_str!("sample_catalog.json");

/// Auxiliary per-track attributes used for tag derivation. Every reading is
/// optional; an absent feature never satisfies a rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackFeatures {
    pub danceability: Option<f64>,
    /// Beats per minute.
    pub tempo: Option<f64>,
    pub valence: Option<f64>,
    pub acousticness: Option<f64>,
    pub instrumentalness: Option<f64>,
}

impl TrackFeatures {
    /// Present readings in display order, as `(name, value)` pairs.
    pub fn readings(&self) -> Vec<(&'static str, f64)> {
        [
            ("danceability", self.danceability),
            ("tempo", self.tempo),
            ("valence", self.valence),
            ("acousticness", self.acousticness),
            ("instrumentalness", self.instrumentalness),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect()
    }
}

/// Immutable sample record describing a single song.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    /// Length in seconds.
    pub duration: u32,
    #[serde(default)]
    pub cover_url: Option<String>,
    pub energy: f64,
    pub mood: f64,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub features: TrackFeatures,
}

impl Track {
    fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(MoodDiscoveryError::invalid_track(
                self.title.clone(),
                "missing identifier",
            ));
        }

        check_unit(&self.id, "energy", Some(self.energy))?;
        check_unit(&self.id, "mood", Some(self.mood))?;
        check_unit(&self.id, "danceability", self.features.danceability)?;
        check_unit(&self.id, "valence", self.features.valence)?;
        check_unit(&self.id, "acousticness", self.features.acousticness)?;
        check_unit(&self.id, "instrumentalness", self.features.instrumentalness)?;

        if let Some(tempo) = self.features.tempo {
            if !tempo.is_finite() || tempo <= 0.0 {
                return Err(MoodDiscoveryError::invalid_track(
                    self.id.clone(),
                    format!("tempo must be a positive BPM value, got {tempo}"),
                ));
            }
        }

        Ok(())
    }
}

fn check_unit(id: &str, field: &str, value: Option<f64>) -> Result<()> {
    match value {
        Some(v) if !(0.0..=1.0).contains(&v) => Err(MoodDiscoveryError::invalid_track(
            id,
            format!("{field} must lie in [0, 1], got {v}"),
        )),
        _ => Ok(()),
    }
}

/// Document shape before validation. Turned into a [`Catalog`] only via
/// [`Catalog::new`].
#[derive(Deserialize)]
struct RawCatalog {
    tracks: Vec<Track>,
    #[serde(default)]
    genre_map: GenreMap,
}

impl TryFrom<RawCatalog> for Catalog {
    type Error = MoodDiscoveryError;

    fn try_from(raw: RawCatalog) -> Result<Self> {
        Catalog::new(raw.tracks, raw.genre_map)
    }
}

/// Track list plus the genre adjacency table. Loaded once and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCatalog")]
pub struct Catalog {
    tracks: Vec<Track>,
    genre_map: GenreMap,
}

impl Catalog {
    /// Builds a catalog after validating every record.
    pub fn new(tracks: Vec<Track>, genre_map: GenreMap) -> Result<Self> {
        let mut seen = HashSet::with_capacity(tracks.len());
        for track in &tracks {
            if let Err(err) = track.validate() {
                tracing::warn!(id = %track.id, %err, "rejecting catalog");
                return Err(err);
            }
            if !seen.insert(track.id.as_str()) {
                return Err(MoodDiscoveryError::invalid_track(
                    track.id.clone(),
                    "duplicate identifier",
                ));
            }
        }

        Ok(Self { tracks, genre_map })
    }

    /// The catalog bundled with the crate.
    pub fn sample() -> Result<Self> {
        Self::from_json(SAMPLE_CATALOG)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let parsed: RawCatalog = serde_json::from_str(raw)?;
        Self::try_from(parsed)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let parsed: RawCatalog = serde_json::from_reader(reader)?;
        Self::try_from(parsed)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = fs::File::open(path)?;
        let catalog = Self::from_reader(std::io::BufReader::new(file))?;
        tracing::info!(?path, tracks = catalog.len(), "loaded catalog");
        Ok(catalog)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn genre_map(&self) -> &GenreMap {
        &self.genre_map
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn track(&self, id: &str) -> Option<&Track> {
        self.tracks.iter().find(|track| track.id == id)
    }

    /// Unique genres in first-seen order, capped at `limit`.
    pub fn user_genres(&self, limit: usize) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.tracks
            .iter()
            .flat_map(|track| track.genres.iter())
            .map(String::as_str)
            .filter(|genre| seen.insert(*genre))
            .take(limit)
            .collect()
    }

    /// Tracks tagged with `genre`, in catalog order, capped at `limit`.
    pub fn tracks_in_genre(&self, genre: &str, limit: usize) -> Vec<&Track> {
        if genre.is_empty() {
            return Vec::new();
        }

        self.tracks
            .iter()
            .filter(|track| track.genres.iter().any(|g| g == genre))
            .take(limit)
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn track(id: &str, energy: f64, mood: f64) -> Track {
        Track {
            id: id.to_string(),
            title: format!("Title {id}"),
            artist: "Artist".to_string(),
            album: "Album".to_string(),
            duration: 200,
            cover_url: None,
            energy,
            mood,
            genres: Vec::new(),
            features: TrackFeatures::default(),
        }
    }

    fn with_genres(mut track: Track, genres: &[&str]) -> Track {
        track.genres = genres.iter().map(|g| g.to_string()).collect();
        track
    }

    #[test]
    fn sample_catalog_loads() {
        let catalog = Catalog::sample().unwrap();
        assert!(!catalog.is_empty());
        assert!(!catalog.genre_map().is_empty());
    }

    #[test]
    fn rejects_out_of_range_energy() {
        let err = Catalog::new(vec![track("a", 1.2, 0.5)], GenreMap::default()).unwrap_err();
        assert!(matches!(err, MoodDiscoveryError::InvalidTrack { ref id, .. } if id == "a"));
    }

    #[test]
    fn rejects_non_positive_tempo() {
        let mut bad = track("a", 0.5, 0.5);
        bad.features.tempo = Some(0.0);
        assert!(Catalog::new(vec![bad], GenreMap::default()).is_err());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let tracks = vec![track("a", 0.5, 0.5), track("a", 0.1, 0.1)];
        let err = Catalog::new(tracks, GenreMap::default()).unwrap_err();
        assert!(format!("{err}").contains("duplicate"));
    }

    #[test]
    fn missing_features_deserialize_as_absent() {
        let raw = r#"{
            "tracks": [{
                "id": "x", "title": "X", "artist": "A", "album": "B",
                "duration": 61, "energy": 0.4, "mood": 0.6,
                "features": { "tempo": 98.0 }
            }]
        }"#;
        let catalog = Catalog::from_json(raw).unwrap();
        let features = &catalog.tracks()[0].features;
        assert_eq!(features.tempo, Some(98.0));
        assert_eq!(features.danceability, None);
        assert_eq!(features.readings(), vec![("tempo", 98.0)]);
    }

    const OUT_OF_RANGE: &str = r#"{
        "tracks": [
            { "id": "a", "title": "A", "artist": "X", "album": "Y",
              "duration": 10, "energy": 7.5, "mood": 0.5 }
        ]
    }"#;

    #[test]
    fn plain_deserialize_still_validates() {
        assert!(serde_json::from_str::<Catalog>(OUT_OF_RANGE).is_err());

        let duplicated = r#"{
            "tracks": [
                { "id": "a", "title": "A", "artist": "X", "album": "Y",
                  "duration": 10, "energy": 0.5, "mood": 0.5 },
                { "id": "a", "title": "B", "artist": "X", "album": "Y",
                  "duration": 10, "energy": 0.2, "mood": 0.2 }
            ]
        }"#;
        let err = serde_json::from_str::<Catalog>(duplicated).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn from_json_reports_invalid_track() {
        let err = Catalog::from_json(OUT_OF_RANGE).unwrap_err();
        assert!(matches!(err, MoodDiscoveryError::InvalidTrack { ref id, .. } if id == "a"));
    }

    #[test]
    fn reads_catalog_from_reader() {
        let catalog = Catalog::from_reader(std::io::Cursor::new(SAMPLE_CATALOG)).unwrap();
        assert_eq!(catalog, Catalog::sample().unwrap());

        let err = Catalog::from_reader(std::io::Cursor::new("{ \"tracks\": [")).unwrap_err();
        assert!(matches!(err, MoodDiscoveryError::Json(_)));
    }

    #[test]
    fn loading_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("mood-discovery-no-such-catalog.json");
        let err = Catalog::load(&path).unwrap_err();
        assert!(matches!(err, MoodDiscoveryError::Io(_)));
    }

    #[test]
    fn loads_catalog_from_file() {
        let path = std::env::temp_dir().join(format!(
            "mood-discovery-catalog-{}.json",
            std::process::id()
        ));
        fs::write(&path, SAMPLE_CATALOG).unwrap();
        let loaded = Catalog::load(&path);
        let _ = fs::remove_file(&path);

        assert_eq!(loaded.unwrap().len(), 10);
    }

    #[test]
    fn user_genres_are_unique_and_capped() {
        let catalog = Catalog::new(
            vec![
                with_genres(track("a", 0.5, 0.5), &["Indie", "Rock"]),
                with_genres(track("b", 0.5, 0.5), &["Rock", "Jazz"]),
                with_genres(track("c", 0.5, 0.5), &["Soul"]),
            ],
            GenreMap::default(),
        )
        .unwrap();

        assert_eq!(catalog.user_genres(8), vec!["Indie", "Rock", "Jazz", "Soul"]);
        assert_eq!(catalog.user_genres(2), vec!["Indie", "Rock"]);
    }

    #[test]
    fn genre_tracks_keep_catalog_order() {
        let catalog = Catalog::new(
            vec![
                with_genres(track("a", 0.5, 0.5), &["Rock"]),
                with_genres(track("b", 0.5, 0.5), &["Jazz"]),
                with_genres(track("c", 0.5, 0.5), &["Rock"]),
            ],
            GenreMap::default(),
        )
        .unwrap();

        let ids: Vec<_> = catalog
            .tracks_in_genre("Rock", 4)
            .into_iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert!(catalog.tracks_in_genre("", 4).is_empty());
        assert_eq!(catalog.tracks_in_genre("Rock", 1).len(), 1);
    }
}
