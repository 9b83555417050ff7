//! Error types and handling for radiocat-core operations.
//!
//! Most failures inside a catalog run are recovered locally: a playlist that
//! cannot be fetched is skipped, a malformed playlist block is ignored, and a
//! stream that does not answer is dropped. The errors in this module are the ones
//! that escape to callers, mainly storage and configuration problems plus the
//! per-source fetch errors recorded in a run report.
//!
//! ## Error Categories
//!
//! - **I/O Errors**: File system operations, disk access
//! - **Network Errors**: HTTP requests, connectivity issues
//! - **Storage Errors**: Catalog reads and writes
//! - **Configuration Errors**: Invalid settings or config files
//!
//! ## Recovery Hints
//!
//! ```rust
//! use radiocat_core::Error;
//!
//! let err = Error::Timeout("playlist fetch".to_string());
//! assert!(err.is_recoverable());
//! assert_eq!(err.category(), "timeout");
//! ```

use thiserror::Error;

/// The main error type for radiocat-core operations.
///
/// Errors keep their source chain, so `Debug` output includes the underlying
/// `std::io::Error` or `reqwest::Error` when there is one.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    ///
    /// Covers reading and writing catalog files and creating the output directory.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Network operation failed.
    ///
    /// Covers playlist downloads. Connection and timeout errors are typically
    /// recoverable, while malformed URL errors are permanent.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered, but not with the status we need.
    #[error("Unexpected HTTP status {status} from '{url}'")]
    UnexpectedStatus {
        /// URL that was requested.
        url: String,
        /// Status code returned by the server.
        status: u16,
    },

    /// Storage operation failed.
    ///
    /// ## Common Causes
    ///
    /// - Unwritable output directory
    /// - Corrupted catalog file
    /// - Invalid category name
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration is invalid or inaccessible.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource was not found.
    ///
    /// Used for missing playlists (HTTP 404) and unknown categories.
    #[error("Not found: {0}")]
    NotFound(String),

    /// URL is malformed or uses an unsupported scheme.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Operation timed out.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl Error {
    /// Check if the error might be recoverable through retry logic.
    ///
    /// Returns `true` for network timeouts, connection failures, server-side
    /// (5xx) statuses and interrupted I/O. A catalog run never retries on its
    /// own; this hint is for callers that schedule the next run.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_timeout() || e.is_connect(),
            Self::UnexpectedStatus { status, .. } => *status >= 500,
            Self::Timeout(_) => true,
            Self::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted
            ),
            _ => false,
        }
    }

    /// Get the error category as a string identifier.
    ///
    /// Useful for grouping failures in log output and run summaries.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Network(_) | Self::UnexpectedStatus { .. } => "network",
            Self::Storage(_) => "storage",
            Self::Config(_) => "config",
            Self::NotFound(_) => "not_found",
            Self::InvalidUrl(_) => "invalid_url",
            Self::Timeout(_) => "timeout",
            Self::Serialization(_) => "serialization",
        }
    }
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
