//! Error handling types and utilities.

use std::path::PathBuf;

/// A specialized Result type for application-level code.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods in the command-line harness.
pub type Result<T> = anyhow::Result<T>;

/// Errors returned by a search request.
///
/// None of these leave the index in a different state than before the call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// The result limit must be at least 1.
    #[error("invalid result limit {0}: must be at least 1")]
    InvalidLimit(usize),
    /// No index has been loaded (or it was torn down).
    #[error("search index is not initialized")]
    NotInitialized,
}

/// Error returned when loading the generator's record payload fails.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The payload file could not be read.
    #[error("failed to read search payload at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The payload is not valid JSON (after stripping any JS assignment).
    #[error("failed to parse search payload: {0}")]
    Parse(#[from] serde_json::Error),
    /// The payload is JSON but not a record array or `{"docs": [...]}` object.
    #[error("unrecognized search payload: {0}")]
    Shape(String),
}

/// Error returned when a search configuration is unusable.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The configuration file is not valid TOML for [`crate::SearchConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value is outside its allowed range.
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}
