//! Error taxonomy shared across the NRT crates

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the workspace
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the ingestion, persistence, and query operations.
///
/// Each variant maps to one recovery story at the CLI boundary:
/// `IndexNotFound` is user-correctable (run `ingest` first), everything
/// else is reported as a single human-readable failure for the operation
/// that triggered it. None of these leave the on-disk index inconsistent.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("embedding provider error: {0}")]
    Embedding(String),

    #[error("failed to persist index: {0}")]
    Persistence(String),

    #[error("no index found at {}; process some URLs first", .0.display())]
    IndexNotFound(PathBuf),

    #[error("retrieval failed: {0}")]
    Retrieval(String),

    #[error("answer generation failed: {0}")]
    Generation(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for failures the user can fix themselves without operator
    /// attention (currently only a missing index).
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, Error::IndexNotFound(_))
    }
}
