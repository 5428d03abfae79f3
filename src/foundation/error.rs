/// Convenience result type used across beatblock.
pub type BlockingResult<T> = Result<T, BlockingError>;

/// Top-level error taxonomy for construction and editing APIs.
///
/// Per-frame queries never return these; they degrade to the nearest valid anchor instead.
#[derive(thiserror::Error, Debug)]
pub enum BlockingError {
    /// Invalid user-provided data (beat grid, groups, snapshot contents).
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while editing or mapping the beat-group timeline.
    #[error("timeline error: {0}")]
    Timeline(String),

    /// Errors while editing formations or performer keyframes.
    #[error("formation error: {0}")]
    Formation(String),

    /// Errors when serializing or deserializing snapshots.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BlockingError {
    /// Build a [`BlockingError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`BlockingError::Timeline`] value.
    pub fn timeline(msg: impl Into<String>) -> Self {
        Self::Timeline(msg.into())
    }

    /// Build a [`BlockingError::Formation`] value.
    pub fn formation(msg: impl Into<String>) -> Self {
        Self::Formation(msg.into())
    }

    /// Build a [`BlockingError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for BlockingError {
    fn from(err: serde_json::Error) -> Self {
        Self::serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
