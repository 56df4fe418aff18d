//! Structured error types for gridview.
//!
//! The frame hot path has no recoverable errors — it operates on in-memory,
//! internally consistent state. This type covers the host-facing surface:
//! theme loading, configuration, and paint-surface failures.

/// All errors that can occur at the gridview host boundary.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// Theme resolution failure (unknown role, malformed palette entry).
    #[error("Theme resolution failed: {0}")]
    Theme(String),

    /// Invalid engine configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The paint surface rejected a drawing operation.
    #[error("Paint surface error: {0}")]
    Surface(String),

    /// Catch-all for string errors at the host boundary.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

impl From<String> for GridError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for GridError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}
