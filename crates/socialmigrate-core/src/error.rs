use thiserror::Error;

/// Configuration errors raised while reading the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Validation errors for domain values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid date \"{value}\": {reason}")]
    InvalidDate { value: String, reason: String },

    #[error("date range start {start} is after end {end}")]
    InvertedDateRange { start: String, end: String },
}

/// The credential was rejected or the identity could not be resolved.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("authentication failed: {message}")]
pub struct AuthError {
    pub message: String,
}

impl AuthError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The candidate post fetch failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("failed to fetch posts: {message}")]
pub struct SourceFetchError {
    pub message: String,
}

impl SourceFetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Publishing a single item failed. `message` is the upstream message when
/// one was available.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct SinkError {
    pub message: String,
}

impl SinkError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors from a relevance classifier backend.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("classifier API key is not configured")]
    MissingApiKey,

    #[error("classifier transport error: {0}")]
    Transport(String),

    #[error("classifier returned status {0}")]
    Status(u16),

    #[error("classifier response had no payload")]
    EmptyResponse,

    #[error("malformed classifier response: {0}")]
    Malformed(String),
}
