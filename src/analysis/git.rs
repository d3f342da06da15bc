use chrono::{DateTime, Utc};
use git2::{DiffFindOptions, Repository, Sort, TreeWalkMode, TreeWalkResult};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{DigestError, Result};
use crate::types::{Commit, CommitQuery, Selection, UNKNOWN_AUTHOR, UNKNOWN_EMAIL};
use crate::utils::paths::repo_name_from_path;

/// Consecutive commits older than `since` seen before the walk stops.
const SINCE_SLOP: usize = 5;

/// Check that every candidate path is an existing git repository.
///
/// Invalid paths never abort the batch: each one produces one error message
/// and the remaining paths are still checked.
pub fn validate_repositories<P: AsRef<Path>>(paths: &[P]) -> (Vec<PathBuf>, Vec<String>) {
    let mut valid_paths = Vec::new();
    let mut error_messages = Vec::new();

    for path in paths {
        match validate_repository(path.as_ref()) {
            Ok(()) => valid_paths.push(path.as_ref().to_path_buf()),
            Err(e) => error_messages.push(e.to_string()),
        }
    }

    (valid_paths, error_messages)
}

/// Validate a single candidate path.
pub fn validate_repository(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(DigestError::PathNotFound(path.to_path_buf()));
    }
    if !has_git_metadata(path) {
        return Err(DigestError::NotARepository(path.to_path_buf()));
    }
    Ok(())
}

fn has_git_metadata(path: &Path) -> bool {
    // Working tree, or a bare repository
    path.join(".git").exists() || (path.join("HEAD").is_file() && path.join("objects").is_dir())
}

/// Retrieve commits from one repository, resolving the query against the
/// local clock.
pub fn retrieve_commits(repo_path: &Path, query: &CommitQuery) -> Result<Vec<Commit>> {
    let selection = query.resolve(chrono::Local::now())?;
    get_commits(repo_path, &selection, Utc::now())
}

/// Retrieve commits from one repository under an already resolved selection.
///
/// Commits come back newest first (commit-time order). Every commit is tagged
/// with the repository's short name.
pub fn get_commits(
    repo_path: &Path,
    selection: &Selection,
    now: DateTime<Utc>,
) -> Result<Vec<Commit>> {
    let repo_name = repo_name_from_path(repo_path);
    debug!("Getting commits from {} ({:?})", repo_name, selection);

    let repo = Repository::open(repo_path).map_err(|e| DigestError::retrieval(repo_path, e))?;
    collect_commits(&repo, &repo_name, selection, now).map_err(|e| match e {
        CollectError::Git(source) => DigestError::retrieval(repo_path, source),
        CollectError::Digest(e) => e,
    })
}

enum CollectError {
    Git(git2::Error),
    Digest(DigestError),
}

impl From<git2::Error> for CollectError {
    fn from(e: git2::Error) -> Self {
        CollectError::Git(e)
    }
}

fn collect_commits(
    repo: &Repository,
    repo_name: &str,
    selection: &Selection,
    now: DateTime<Utc>,
) -> std::result::Result<Vec<Commit>, CollectError> {
    // An unborn HEAD has no history to walk
    if repo.is_empty()? {
        return Ok(Vec::new());
    }

    let (since, until) = selection.bounds(now);
    let limit = selection.limit();

    let mut revwalk = repo.revwalk()?;
    revwalk.set_sorting(Sort::TIME)?;
    revwalk.push_head()?;

    let mut commits = Vec::new();
    let mut older_run = 0;
    for oid in revwalk {
        if limit.is_some_and(|n| commits.len() >= n) {
            break;
        }

        let commit = repo.find_commit(oid?)?;
        let seconds = commit.time().seconds();
        let date = DateTime::<Utc>::from_timestamp(seconds, 0).ok_or_else(|| {
            CollectError::Digest(DigestError::InvalidTimestamp {
                hash: commit.id().to_string(),
                seconds,
            })
        })?;

        if since.is_some_and(|bound| date < bound) {
            // Time order is approximate under clock skew
            older_run += 1;
            if older_run >= SINCE_SLOP {
                break;
            }
            continue;
        }
        older_run = 0;

        if until.is_some_and(|bound| date > bound) {
            continue;
        }

        commits.push(build_commit(repo, &commit, date, repo_name)?);
    }

    debug!("Retrieved {} commits from {}", commits.len(), repo_name);
    Ok(commits)
}

fn build_commit(
    repo: &Repository,
    commit: &git2::Commit,
    date: DateTime<Utc>,
    repo_name: &str,
) -> std::result::Result<Commit, git2::Error> {
    let signature = commit.author();
    let author = signature
        .name()
        .filter(|name| !name.is_empty())
        .unwrap_or(UNKNOWN_AUTHOR)
        .to_string();
    let email = signature
        .email()
        .filter(|email| !email.is_empty())
        .unwrap_or(UNKNOWN_EMAIL)
        .to_string();

    let message = match commit.message() {
        Some(message) => message.trim().to_string(),
        None => String::from_utf8_lossy(commit.message_bytes()).trim().to_string(),
    };

    Ok(Commit {
        hash: commit.id().to_string(),
        author,
        email,
        date,
        message,
        files_changed: files_changed(repo, commit)?,
        repo_name: repo_name.to_string(),
    })
}

/// Paths touched by a commit.
///
/// Against the first parent this is the before and after path of every
/// changed entry (the after path only when it differs). A root commit
/// reports every file in its tree.
pub(crate) fn files_changed(
    repo: &Repository,
    commit: &git2::Commit,
) -> std::result::Result<Vec<String>, git2::Error> {
    let tree = commit.tree()?;
    let mut files = Vec::new();

    if commit.parent_count() == 0 {
        tree.walk(TreeWalkMode::PreOrder, |dir, entry| {
            if entry.kind() == Some(git2::ObjectType::Blob) {
                if let Some(name) = entry.name() {
                    files.push(format!("{}{}", dir, name));
                }
            }
            TreeWalkResult::Ok
        })?;
        return Ok(files);
    }

    let parent_tree = commit.parent(0)?.tree()?;
    let mut diff = repo.diff_tree_to_tree(Some(&parent_tree), Some(&tree), None)?;
    let mut find_opts = DiffFindOptions::new();
    find_opts.renames(true);
    diff.find_similar(Some(&mut find_opts))?;

    for delta in diff.deltas() {
        let old_path = delta.old_file().path().map(|p| p.to_string_lossy().into_owned());
        let new_path = delta.new_file().path().map(|p| p.to_string_lossy().into_owned());

        if let Some(old) = old_path.as_ref().filter(|p| !p.is_empty()) {
            files.push(old.clone());
        }
        if let Some(new) = new_path.filter(|p| !p.is_empty()) {
            if old_path.as_ref() != Some(&new) {
                files.push(new);
            }
        }
    }

    Ok(files)
}
