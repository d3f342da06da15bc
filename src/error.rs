//! # Errors
//!
//! Error kinds raised while validating repositories and retrieving commits.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the commit pipeline.
#[derive(Error, Debug)]
pub enum DigestError {
    /// The candidate path does not exist on disk.
    #[error("Repository path '{}' does not exist", .0.display())]
    PathNotFound(PathBuf),

    /// The path exists but carries no git metadata.
    #[error("'{}' is not a git repository", .0.display())]
    NotARepository(PathBuf),

    /// The underlying git read failed (corrupt repository, missing objects, ...).
    #[error("Failed to read commits from '{}': {source}", .path.display())]
    RetrievalFailure {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    /// A `since`/`until` expression could not be resolved to a point in time.
    #[error("Could not understand date expression '{0}'")]
    InvalidDate(String),

    /// A commit carried a timestamp outside the representable range.
    #[error("Commit {hash} has an invalid timestamp ({seconds})")]
    InvalidTimestamp { hash: String, seconds: i64 },

    /// A blocking task running git work panicked or was cancelled.
    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl DigestError {
    pub(crate) fn retrieval(path: impl Into<PathBuf>, source: git2::Error) -> Self {
        DigestError::RetrievalFailure {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = DigestError> = std::result::Result<T, E>;
