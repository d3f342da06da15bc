use chrono::Local;

use crate::types::Commit;

/// Text used in place of a digest when there is nothing to describe.
pub const NO_COMMITS_TEXT: &str = "No commits found in the specified date range.";

const COMMIT_SEPARATOR: &str = "\n---\n";

/// Render commits as the plain-text block handed to the language model.
pub fn format_commits_for_llm(commits: &[Commit]) -> String {
    if commits.is_empty() {
        return NO_COMMITS_TEXT.to_string();
    }

    commits
        .iter()
        .map(format_commit)
        .collect::<Vec<_>>()
        .join(COMMIT_SEPARATOR)
}

fn format_commit(commit: &Commit) -> String {
    let files = if commit.files_changed.is_empty() {
        "No files changed".to_string()
    } else {
        commit.files_changed.join(", ")
    };

    format!(
        "Commit: {} ({})\nAuthor: {}\nDate: {}\nMessage: {}\nFiles: {}\n",
        commit.short_hash(),
        commit.repo_name,
        commit.author_key(),
        commit.date.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S"),
        commit.message,
        files,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn commit(hash: &str, files: &[&str]) -> Commit {
        Commit {
            hash: hash.to_string(),
            author: "Alice".to_string(),
            email: "alice@x.com".to_string(),
            date: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
            message: "Fix login redirect".to_string(),
            files_changed: files.iter().map(|f| f.to_string()).collect(),
            repo_name: "web".to_string(),
        }
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(format_commits_for_llm(&[]), NO_COMMITS_TEXT);
    }

    #[test]
    fn test_single_commit_block() {
        let c = commit("0123456789abcdef0123456789abcdef01234567", &["src/auth.rs", "README.md"]);
        let text = format_commits_for_llm(&[c.clone()]);
        let expected_date = c.date.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S");
        assert_eq!(
            text,
            format!(
                "Commit: 01234567 (web)\nAuthor: Alice <alice@x.com>\nDate: {}\nMessage: Fix login redirect\nFiles: src/auth.rs, README.md\n",
                expected_date
            )
        );
    }

    #[test]
    fn test_separator_and_no_files() {
        let text = format_commits_for_llm(&[commit("aaaaaaaaaa", &[]), commit("bbbbbbbbbb", &["x"])]);
        let blocks: Vec<&str> = text.split("\n---\n").collect();
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].contains("Files: No files changed"));
        assert!(blocks[1].starts_with("Commit: bbbbbbbb (web)"));
    }
}
