//! Prompt construction for chronological and per-author summaries.

use std::collections::BTreeSet;

use crate::types::Commit;

/// Prompt for one overview of commits from one or more repositories.
pub fn digest_prompt(commits_text: &str, repo_names: &[String]) -> String {
    let (repo_context, multi_repo_instruction) = if repo_names.len() > 1 {
        (
            format!(
                "from {} repositories: {}",
                repo_names.len(),
                repo_names.join(", ")
            ),
            "\n\nLook for related work across repositories and identify:\n\
             1. Major features or initiatives that span multiple repositories\n\
             2. Coordinated changes and how they work together\n\
             3. Cross-repository dependencies and integration work\n\
             4. Overall development themes and architectural decisions",
        )
    } else {
        (
            format!(
                "from repository: {}",
                repo_names.first().map(String::as_str).unwrap_or("unknown")
            ),
            "",
        )
    };

    format!(
        "Analyze the following git commits {repo_context}.\n\n\
         Provide a clear, human-readable development summary that focuses on:\n\
         - Key changes, features added, and bugs fixed\n\
         - Overall development progress and milestones\n\
         - Important architectural or design decisions{multi_repo_instruction}\n\n\
         Git commits:\n{commits_text}\n\nSummary:"
    )
}

/// Prompt summarizing one author's commits.
pub fn author_prompt(author: &str, commits: &[Commit], commits_text: &str) -> String {
    let repos: BTreeSet<&str> = commits
        .iter()
        .map(|c| c.repo_name.as_str())
        .filter(|name| !name.is_empty())
        .collect();

    let multi_repo_context = if repos.len() > 1 {
        format!(
            "\nThis author worked across {} repositories: {}.\n\
             Look for related work across repositories and explain how their changes work together.\n\
             Identify cross-repository coordination and the bigger picture of their contributions.",
            repos.len(),
            repos.into_iter().collect::<Vec<_>>().join(", ")
        )
    } else {
        String::new()
    };

    format!(
        "Provide a comprehensive summary of contributions made by {author}.\n\n\
         Focus on the key changes, features, and improvements they implemented.\n\
         Be specific about what they accomplished and the impact of their work.{multi_repo_context}\n\n\
         Commits by {author}:\n{commits_text}\n\nSummary for {author}:"
    )
}
