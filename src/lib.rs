//! # git-digest
//!
//! `git-digest` collects commit history from one or more git repositories,
//! filters and groups it, and turns it into text for a language model to
//! summarize.
//!
//! ## Features
//!
//! - Select commits by count, by the last N days, or by a since/until range
//! - Merge several repositories into one newest-first timeline
//! - Skip repositories that fail without losing the others
//! - Filter by author with partial, case-insensitive matching
//! - Group commits by author identity
//! - Summarize through any OpenAI-compatible chat endpoint
//!
//! ## Example
//!
//! ```no_run
//! use git_digest::{aggregate_commits, filter_by_authors, CommitQuery};
//!
//! let query = CommitQuery {
//!     days: Some(14),
//!     ..Default::default()
//! };
//! let aggregate = aggregate_commits(&["../api", "../web"], &query)?;
//! let filtered = filter_by_authors(aggregate.commits, &["alice".to_string()]);
//! println!("{} commits by alice", filtered.commits.len());
//! # Ok::<(), git_digest::DigestError>(())
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod summary;
pub mod types;
pub mod utils;

// Re-export main types for convenience
pub use analysis::{
    aggregate_commits, aggregate_commits_async, filter_by_authors, group_by_author, retrieve_commits,
    validate_repositories,
};
pub use error::{DigestError, Result};
pub use types::{Aggregate, AuthorGroups, Commit, CommitQuery, FilteredCommits, Selection};
