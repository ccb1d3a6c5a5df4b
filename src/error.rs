//! Error types for the card pipeline

use thiserror::Error;

/// Result type alias for card operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while extracting a profile or rendering its card
#[derive(Error, Debug)]
pub enum Error {
    /// Upstream unreachable, timed out, or answered with a non-success status
    #[error("Failed to fetch profile: {0}")]
    FetchError(String),

    /// The profile page has no usable structure (missing or empty title)
    #[error("Failed to parse profile page: {0}")]
    ParseError(String),

    /// A single badge icon could not be fetched or decoded
    #[error("Failed to load badge icon: {0}")]
    IconLoadError(String),

    /// Failed to encode the composed card
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Invalid configuration or request parameter
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Filesystem error from an icon store
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

impl Error {
    /// Whether this error should abort the request rather than degrade a single badge.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::IconLoadError(_))
    }
}
