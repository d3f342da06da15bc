//! # Common Types
//!
//! This module contains the common types used throughout the crate for
//! representing commits, selection criteria and the results of aggregating,
//! filtering and grouping them.

use chrono::{DateTime, Duration, Local, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::analysis::dates::{parse_date_expr, parse_until_expr};
use crate::error::Result;

/// Author name used when a commit carries none.
pub const UNKNOWN_AUTHOR: &str = "Unknown";
/// Author email used when a commit carries none.
pub const UNKNOWN_EMAIL: &str = "unknown@example.com";
/// Window used when no selection criteria are given.
pub const DEFAULT_DAYS: u32 = 7;

/// Build the identity key shared by author filtering and grouping.
///
/// Both components derive identity through this one function so they can
/// never disagree about who wrote a commit.
pub fn author_key(author: &str, email: &str) -> String {
    format!("{} <{}>", author, email)
}

/// A single commit read from a repository.
///
/// Commits are created by the retriever and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commit {
    /// Full commit id (hex)
    pub hash: String,
    /// Author display name, or [`UNKNOWN_AUTHOR`]
    pub author: String,
    /// Author email, or [`UNKNOWN_EMAIL`]
    pub email: String,
    /// Committer timestamp
    pub date: DateTime<Utc>,
    /// Trimmed commit message
    pub message: String,
    /// Paths touched by the commit (full tree for root commits)
    pub files_changed: Vec<String>,
    /// Final path component of the repository the commit came from
    pub repo_name: String,
}

impl Commit {
    /// The `"{author} <{email}>"` identity key.
    pub fn author_key(&self) -> String {
        author_key(&self.author, &self.email)
    }

    /// First eight characters of the hash.
    pub fn short_hash(&self) -> &str {
        self.hash.get(..8).unwrap_or(&self.hash)
    }
}

/// Raw selection parameters, as supplied by the caller.
///
/// Precedence when several are set: `count` > `days` > `since`/`until` >
/// the default window of [`DEFAULT_DAYS`] days.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitQuery {
    /// Lower bound expression, e.g. `2024-01-01`, `1 week ago`, `yesterday`
    pub since: Option<String>,
    /// Upper bound expression, e.g. `2024-01-31`, `today`
    pub until: Option<String>,
    /// Recency window in days
    pub days: Option<u32>,
    /// Maximum number of most recent commits
    pub count: Option<usize>,
}

impl CommitQuery {
    /// Resolve the query into exactly one selection mode, relative to `now`.
    pub fn resolve(&self, now: DateTime<Local>) -> Result<Selection> {
        if let Some(count) = self.count.filter(|&c| c > 0) {
            return Ok(Selection::Count(count));
        }
        if let Some(days) = self.days {
            return Ok(Selection::Days(days));
        }
        if self.since.is_some() || self.until.is_some() {
            let since = self
                .since
                .as_deref()
                .map(|expr| parse_date_expr(expr, now))
                .transpose()?;
            let until = self
                .until
                .as_deref()
                .map(|expr| parse_until_expr(expr, now))
                .transpose()?;
            return Ok(Selection::Range {
                since: since.map(|dt| dt.with_timezone(&Utc)),
                until: until.map(|dt| dt.with_timezone(&Utc)),
            });
        }
        Ok(Selection::Days(DEFAULT_DAYS))
    }
}

/// A resolved selection mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// The `n` most recent commits, regardless of date
    Count(usize),
    /// Commits from the last `d` days
    Days(u32),
    /// Commits within an optional lower and upper bound (both inclusive)
    Range {
        since: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    },
}

impl Selection {
    /// Date bounds implied by this selection, evaluated against `now`.
    pub fn bounds(&self, now: DateTime<Utc>) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        match *self {
            Selection::Count(_) => (None, None),
            Selection::Days(days) => {
                // Windows reaching past the representable range start at the earliest instant
                let since = Duration::try_days(i64::from(days))
                    .and_then(|window| now.checked_sub_signed(window))
                    .unwrap_or(DateTime::<Utc>::MIN_UTC);
                (Some(since), None)
            }
            Selection::Range { since, until } => (since, until),
        }
    }

    /// Commit cap, if any.
    pub fn limit(&self) -> Option<usize> {
        match *self {
            Selection::Count(n) => Some(n),
            _ => None,
        }
    }
}

/// How retrieval went for one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoOutcome {
    /// Retrieval succeeded with this many commits
    Retrieved(usize),
    /// Retrieval failed; the repository was skipped
    Failed(String),
}

/// Per-repository bookkeeping from an aggregation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoStats {
    /// Short repository name
    pub name: String,
    /// Path as given by the caller
    pub path: PathBuf,
    /// What happened when retrieving from it
    pub outcome: RepoOutcome,
}

/// The merged, newest-first commit stream of several repositories.
#[derive(Debug, Clone, Default)]
pub struct Aggregate {
    /// Commits from every successful repository, sorted by date descending
    pub commits: Vec<Commit>,
    /// One entry per input repository, in input order
    pub repos: Vec<RepoStats>,
}

impl Aggregate {
    /// `(name, count)` for every repository that was read successfully.
    pub fn commit_counts(&self) -> Vec<(&str, usize)> {
        self.repos
            .iter()
            .filter_map(|stats| match stats.outcome {
                RepoOutcome::Retrieved(count) => Some((stats.name.as_str(), count)),
                RepoOutcome::Failed(_) => None,
            })
            .collect()
    }

    /// Repositories that were skipped because retrieval failed.
    pub fn failures(&self) -> impl Iterator<Item = &RepoStats> {
        self.repos
            .iter()
            .filter(|stats| matches!(stats.outcome, RepoOutcome::Failed(_)))
    }
}

/// Result of narrowing commits down to a set of author filters.
#[derive(Debug, Clone, Default)]
pub struct FilteredCommits {
    /// Commits matching at least one filter, in input order
    pub commits: Vec<Commit>,
    /// Each original filter string mapped to the identities it matched.
    /// Overlapping filters each record the same identity, so every one of
    /// them counts as matched.
    pub matches: IndexMap<String, BTreeSet<String>>,
}

impl FilteredCommits {
    /// Filters that matched something, with their distinct author counts.
    pub fn matched_filters(&self) -> Vec<(&str, usize)> {
        self.matches
            .iter()
            .filter(|(_, authors)| !authors.is_empty())
            .map(|(filter, authors)| (filter.as_str(), authors.len()))
            .collect()
    }

    /// Filters that matched nothing.
    pub fn unmatched_filters(&self) -> Vec<&str> {
        self.matches
            .iter()
            .filter(|(_, authors)| authors.is_empty())
            .map(|(filter, _)| filter.as_str())
            .collect()
    }
}

/// Commits bucketed by author identity key, in order of first appearance.
pub type AuthorGroups = IndexMap<String, Vec<Commit>>;

/// Why a run ended up with nothing to summarize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    /// A count bound was in effect
    CountBound,
    /// A date bound (days, range or default window) was in effect
    DateBound,
    /// Commits existed but none survived author filtering
    AuthorFilter,
}

impl EmptyReason {
    /// Pick the reason for an empty result.
    pub fn for_selection(selection: &Selection, author_filtered: bool) -> Self {
        if author_filtered {
            EmptyReason::AuthorFilter
        } else if matches!(selection, Selection::Count(_)) {
            EmptyReason::CountBound
        } else {
            EmptyReason::DateBound
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            EmptyReason::CountBound => "No commits found in any repository.",
            EmptyReason::DateBound => "No commits found in the specified date range.",
            EmptyReason::AuthorFilter => "No commits found matching the specified author filters.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_count_takes_precedence() {
        let query = CommitQuery {
            since: Some("2020-01-01".to_string()),
            until: Some("2020-02-01".to_string()),
            days: Some(3),
            count: Some(5),
        };
        assert_eq!(query.resolve(now()).unwrap(), Selection::Count(5));
    }

    #[test]
    fn test_days_beats_range() {
        let query = CommitQuery {
            since: Some("yesterday".to_string()),
            days: Some(3),
            ..Default::default()
        };
        assert_eq!(query.resolve(now()).unwrap(), Selection::Days(3));
    }

    #[test]
    fn test_zero_count_falls_through() {
        let query = CommitQuery {
            count: Some(0),
            days: Some(2),
            ..Default::default()
        };
        assert_eq!(query.resolve(now()).unwrap(), Selection::Days(2));
    }

    #[test]
    fn test_default_window() {
        let selection = CommitQuery::default().resolve(now()).unwrap();
        assert_eq!(selection, Selection::Days(DEFAULT_DAYS));
    }

    #[test]
    fn test_range_with_one_bound() {
        let query = CommitQuery {
            until: Some("2024-06-01".to_string()),
            ..Default::default()
        };
        match query.resolve(now()).unwrap() {
            Selection::Range { since, until } => {
                assert!(since.is_none());
                let expected = Local.with_ymd_and_hms(2024, 6, 1, 23, 59, 59).unwrap();
                assert_eq!(until, Some(expected.with_timezone(&Utc)));
            }
            other => panic!("expected range, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_range_expression() {
        let query = CommitQuery {
            since: Some("the day after forever".to_string()),
            ..Default::default()
        };
        assert!(query.resolve(now()).is_err());
    }

    #[test]
    fn test_days_bounds() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap();
        let (since, until) = Selection::Days(10).bounds(now);
        assert_eq!(since, Some(Utc.with_ymd_and_hms(2024, 6, 5, 0, 0, 0).unwrap()));
        assert!(until.is_none());
        assert_eq!(Selection::Count(3).bounds(now), (None, None));
    }

    #[test]
    fn test_days_bounds_saturate() {
        let (since, until) = Selection::Days(u32::MAX).bounds(Utc::now());
        assert_eq!(since, Some(DateTime::<Utc>::MIN_UTC));
        assert!(until.is_none());
    }

    #[test]
    fn test_author_key_format() {
        assert_eq!(author_key("Alice Smith", "alice@x.com"), "Alice Smith <alice@x.com>");
    }

    #[test]
    fn test_empty_reason_messages() {
        assert_eq!(
            EmptyReason::for_selection(&Selection::Count(3), false),
            EmptyReason::CountBound
        );
        assert_eq!(
            EmptyReason::for_selection(&Selection::Days(7), false),
            EmptyReason::DateBound
        );
        assert_eq!(
            EmptyReason::for_selection(&Selection::Count(3), true),
            EmptyReason::AuthorFilter
        );
        assert_eq!(
            EmptyReason::DateBound.message(),
            "No commits found in the specified date range."
        );
    }
}
