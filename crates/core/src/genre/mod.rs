use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Static adjacency table from a genre to the genres listeners of it tend to
/// enjoy as well.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenreMap {
    related: BTreeMap<String, Vec<String>>,
}

impl GenreMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<I, S>(&mut self, genre: impl Into<String>, related: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.related
            .insert(genre.into(), related.into_iter().map(Into::into).collect());
    }

    /// Related genres in table order. Unknown genres yield an empty slice.
    pub fn related(&self, genre: &str) -> &[String] {
        self.related.get(genre).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.related.len()
    }

    pub fn is_empty(&self) -> bool {
        self.related.is_empty()
    }
}

/// Chip selection state of the genre browser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenreSelection {
    active: Option<String>,
}

impl GenreSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selecting the active genre again clears the selection.
    pub fn toggle(&mut self, genre: &str) {
        if self.active.as_deref() == Some(genre) {
            self.active = None;
        } else {
            self.active = Some(genre.to_string());
        }
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Related genres for the active chip, empty when nothing is selected.
    pub fn related<'a>(&self, map: &'a GenreMap) -> &'a [String] {
        match self.active.as_deref() {
            Some(genre) => map.related(genre),
            None => &[],
        }
    }
}
