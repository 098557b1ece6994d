/// Convenience result type used across the tracker effect.
pub type TrackerResult<T> = Result<T, TrackerError>;

/// Top-level error taxonomy used by effect APIs.
#[derive(thiserror::Error, Debug)]
pub enum TrackerError {
    /// Invalid caller-provided values (frame rates, scale factors, curve points).
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while validating or sampling animation curves.
    #[error("animation error: {0}")]
    Animation(String),

    /// The tracking file could not be read or decoded.
    #[error("tracking data error: {0}")]
    TrackingData(String),

    /// Malformed configuration document (bad structure or value types).
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Errors when serializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TrackerError {
    /// Build a [`TrackerError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TrackerError::Animation`] value.
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`TrackerError::TrackingData`] value.
    pub fn tracking_data(msg: impl Into<String>) -> Self {
        Self::TrackingData(msg.into())
    }

    /// Build a [`TrackerError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`TrackerError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
