/// Crate-wide result alias.
pub type AmbilightResult<T> = Result<T, AmbilightError>;

/// Errors produced by the extraction pipeline.
///
/// `Validation` and `Source` are fatal and surface before any frame is processed. `Frame` errors
/// are per-frame: workers catch them, log them and drop the offending frame.
#[derive(thiserror::Error, Debug)]
pub enum AmbilightError {
    /// Invalid configuration or enum string.
    #[error("validation error: {0}")]
    Validation(String),

    /// Input video missing, unreadable or undecodable.
    #[error("source error: {0}")]
    Source(String),

    /// A single frame could not be processed.
    #[error("frame error: {0}")]
    Frame(String),

    /// Writing an output file or preview stream failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// JSON (de)serialization failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else, with its source chain preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AmbilightError {
    /// Build a [`AmbilightError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`AmbilightError::Source`].
    pub fn source(msg: impl Into<String>) -> Self {
        Self::Source(msg.into())
    }

    /// Build a [`AmbilightError::Frame`].
    pub fn frame(msg: impl Into<String>) -> Self {
        Self::Frame(msg.into())
    }

    /// Build a [`AmbilightError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`AmbilightError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
