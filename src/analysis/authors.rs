use indexmap::IndexMap;
use std::collections::BTreeSet;

use crate::types::{AuthorGroups, Commit, FilteredCommits};

/// Keep commits whose author identity contains any of `filters`.
///
/// Matching is a case-insensitive substring test against
/// `"{author} <{email}>"`. A commit matching several filters is kept once,
/// and its identity is recorded under every filter it matched. Filters that
/// match nothing map to an empty set. An empty filter list keeps everything.
pub fn filter_by_authors(commits: Vec<Commit>, filters: &[String]) -> FilteredCommits {
    if filters.is_empty() {
        return FilteredCommits {
            commits,
            matches: IndexMap::new(),
        };
    }

    let mut matches: IndexMap<String, BTreeSet<String>> = IndexMap::new();
    for filter in filters {
        matches.entry(filter.clone()).or_default();
    }
    let lowered: Vec<(&String, String)> = filters.iter().map(|f| (f, f.to_lowercase())).collect();

    let mut kept = Vec::new();
    for commit in commits {
        let key = commit.author_key();
        let key_lower = key.to_lowercase();

        let mut matched = false;
        for (original, needle) in &lowered {
            if key_lower.contains(needle.as_str()) {
                matched = true;
                if let Some(authors) = matches.get_mut(*original) {
                    authors.insert(key.clone());
                }
            }
        }

        if matched {
            kept.push(commit);
        }
    }

    FilteredCommits {
        commits: kept,
        matches,
    }
}

/// Bucket commits by author identity.
///
/// Groups appear in order of each author's first commit, and each bucket
/// keeps the relative order of the input.
pub fn group_by_author(commits: &[Commit]) -> AuthorGroups {
    let mut groups = AuthorGroups::new();
    for commit in commits {
        groups
            .entry(commit.author_key())
            .or_default()
            .push(commit.clone());
    }
    groups
}
