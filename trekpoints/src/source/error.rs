//! Error types for dataset retrieval.
//!
//! These never escape [`SourceReader`](super::SourceReader); they are logged
//! and turned into an empty dataset.

use thiserror::Error;

/// Reasons a single retrieval attempt failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SourceError {
    /// The request could not be sent or the body could not be read.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// No answer within the per-source timeout.
    #[error("request to {url} timed out after {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u64 },

    /// Origin and path do not form a valid URL.
    #[error("invalid URL for {path} against origin {origin}: {reason}")]
    InvalidUrl {
        origin: String,
        path: String,
        reason: String,
    },

    /// Local file could not be read.
    #[error("failed to read {path}: {reason}")]
    Io { path: String, reason: String },

    /// Body was not valid JSON.
    #[error("invalid JSON from {location}: {reason}")]
    Json { location: String, reason: String },
}
