use chrono::{Local, Utc};
use std::path::{Path, PathBuf};
use tokio::task::spawn_blocking;
use tracing::{debug, error, info};

use crate::analysis::git::get_commits;
use crate::error::Result;
use crate::types::{Aggregate, CommitQuery, RepoOutcome, RepoStats, Selection};
use crate::utils::paths::repo_name_from_path;

/// Gather commits from every repository into one newest-first stream.
///
/// The query is resolved once and applied uniformly to every repository.
/// A repository that fails to read is logged and skipped; the others are
/// still processed. Only an unresolvable date expression fails the call.
pub fn aggregate_commits<P: AsRef<Path>>(paths: &[P], query: &CommitQuery) -> Result<Aggregate> {
    let selection = query.resolve(Local::now())?;
    Ok(aggregate_with_selection(paths, &selection))
}

/// Same as [`aggregate_commits`], on a blocking task.
///
/// git2 operations are blocking, so the whole sequential pass runs off the
/// async executor. Repositories are still read one at a time.
pub async fn aggregate_commits_async(paths: Vec<PathBuf>, query: CommitQuery) -> Result<Aggregate> {
    spawn_blocking(move || aggregate_commits(&paths, &query)).await?
}

/// Aggregate under an already resolved selection.
pub fn aggregate_with_selection<P: AsRef<Path>>(paths: &[P], selection: &Selection) -> Aggregate {
    let now = Utc::now();
    let mut commits = Vec::new();
    let mut repos = Vec::with_capacity(paths.len());

    for path in paths {
        let path = path.as_ref();
        let name = repo_name_from_path(path);
        debug!("Processing repository: {}", path.display());

        let outcome = match get_commits(path, selection, now) {
            Ok(repo_commits) => {
                let count = repo_commits.len();
                commits.extend(repo_commits);
                RepoOutcome::Retrieved(count)
            }
            Err(e) => {
                error!("Failed to process repository '{}': {}", path.display(), e);
                RepoOutcome::Failed(e.to_string())
            }
        };

        repos.push(RepoStats {
            name,
            path: path.to_path_buf(),
            outcome,
        });
    }

    // Stable: equal dates keep repository input order
    commits.sort_by(|a, b| b.date.cmp(&a.date));

    let aggregate = Aggregate { commits, repos };
    let stats: Vec<String> = aggregate
        .commit_counts()
        .iter()
        .map(|(name, count)| format!("{}: {} commits", name, count))
        .collect();
    if !stats.is_empty() {
        info!("Repository statistics: {}", stats.join(", "));
    }

    aggregate
}
