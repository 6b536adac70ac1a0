/// Result alias that carries the custom [`MoodDiscoveryError`] type.
pub type Result<T> = std::result::Result<T, MoodDiscoveryError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum MoodDiscoveryError {
    /// Free-form failure, mostly raised by the command line front end when a
    /// lookup by id comes back empty.
    #[error("{0}")]
    Message(String),
    /// A caller supplied arguments outside the accepted domain.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// A catalog record failed validation while loading.
    #[error("track `{id}` rejected: {reason}")]
    InvalidTrack { id: String, reason: String },
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Malformed catalog or configuration document.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl MoodDiscoveryError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }

    pub(crate) fn invalid_track(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTrack {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

impl From<&str> for MoodDiscoveryError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for MoodDiscoveryError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_track_names_the_record() {
        let err = MoodDiscoveryError::invalid_track("t-9", "energy out of range");
        assert_eq!(format!("{err}"), "track `t-9` rejected: energy out of range");
    }

    #[test]
    fn converts_from_strings() {
        let err: MoodDiscoveryError = "boom".into();
        assert!(matches!(err, MoodDiscoveryError::Message(ref m) if m == "boom"));
    }
}
