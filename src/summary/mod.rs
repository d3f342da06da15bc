//! Turning commit digests into summaries with a language model.
//!
//! The model call sits behind [`TextGenerator`], so the summary flow can run
//! against [`LlmClient`] in production and a scripted generator in tests.
//!
//! # Environment Variables
//!
//! - `OPENAI_API_KEY`: Required for the `openai` provider
//! - `COHERE_API_KEY`: Required for the `cohere` provider
//! - `ANTHROPIC_API_KEY`: Required for the `anthropic` provider

mod client;
pub mod format;
pub mod prompts;

pub use client::{LlmClient, LlmConfig, Provider};
pub use format::format_commits_for_llm;

use thiserror::Error;
use tracing::{debug, error};

use crate::types::AuthorGroups;

/// Errors that can occur while generating a summary
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Missing API key: {env_var} environment variable not set")]
    MissingApiKey { env_var: String },

    #[error("API request failed: {0}")]
    Request(String),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse API response: {0}")]
    Parse(String),
}

pub type LlmResult<T> = Result<T, LlmError>;

/// Anything that can turn a prompt into text.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> LlmResult<String>;
}

/// One chronological summary of the formatted commits.
pub fn summarize<G: TextGenerator>(
    commits_text: &str,
    repo_names: &[String],
    generator: &G,
) -> LlmResult<String> {
    let prompt = prompts::digest_prompt(commits_text, repo_names);
    debug!("Requesting digest summary for {} repositories", repo_names.len());
    generator.generate(&prompt).map(|text| text.trim().to_string())
}

/// One summary section per author, in group order.
///
/// A failure for one author is logged and rendered in that author's section;
/// the remaining authors are still summarized.
pub fn summarize_by_author<G: TextGenerator>(groups: &AuthorGroups, generator: &G) -> String {
    let mut sections = Vec::with_capacity(groups.len());

    for (author, commits) in groups {
        debug!("Generating summary for {} ({} commits)", author, commits.len());
        let commits_text = format_commits_for_llm(commits);
        let prompt = prompts::author_prompt(author, commits, &commits_text);

        let commit_word = if commits.len() == 1 { "commit" } else { "commits" };
        let body = match generator.generate(&prompt) {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                error!("Error generating summary for {}: {}", author, e);
                "Error generating summary for this author.".to_string()
            }
        };

        sections.push(format!(
            "## {} ({} {})\n\n{}",
            author,
            commits.len(),
            commit_word,
            body
        ));
    }

    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::group_by_author;
    use crate::types::Commit;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    /// Replies with canned text and remembers every prompt.
    struct Scripted {
        prompts: RefCell<Vec<String>>,
        fail_on: Option<&'static str>,
    }

    impl Scripted {
        fn new() -> Self {
            Self {
                prompts: RefCell::new(Vec::new()),
                fail_on: None,
            }
        }
    }

    impl TextGenerator for Scripted {
        fn generate(&self, prompt: &str) -> LlmResult<String> {
            self.prompts.borrow_mut().push(prompt.to_string());
            if self.fail_on.is_some_and(|needle| prompt.contains(needle)) {
                return Err(LlmError::Api {
                    status: 500,
                    message: "boom".to_string(),
                });
            }
            Ok(format!("  summary #{}  \n", self.prompts.borrow().len()))
        }
    }

    fn commit(author: &str, email: &str) -> Commit {
        Commit {
            hash: "0123456789".to_string(),
            author: author.to_string(),
            email: email.to_string(),
            date: Utc::now(),
            message: "Work".to_string(),
            files_changed: vec!["a.rs".to_string()],
            repo_name: "api".to_string(),
        }
    }

    #[test]
    fn test_summarize_trims_output() {
        let generator = Scripted::new();
        let summary = summarize("TEXT", &["api".to_string()], &generator).unwrap();
        assert_eq!(summary, "summary #1");
        assert!(generator.prompts.borrow()[0].contains("Git commits:\nTEXT"));
    }

    #[test]
    fn test_summarize_by_author_sections() {
        let commits = vec![
            commit("Alice", "alice@x.com"),
            commit("Bob", "bob@x.com"),
            commit("Alice", "alice@x.com"),
        ];
        let groups = group_by_author(&commits);
        let generator = Scripted::new();

        let output = summarize_by_author(&groups, &generator);
        assert_eq!(
            output,
            "## Alice <alice@x.com> (2 commits)\n\nsummary #1\n\n## Bob <bob@x.com> (1 commit)\n\nsummary #2"
        );
    }

    #[test]
    fn test_author_failure_does_not_stop_others() {
        let commits = vec![commit("Alice", "alice@x.com"), commit("Bob", "bob@x.com")];
        let groups = group_by_author(&commits);
        let generator = Scripted {
            prompts: RefCell::new(Vec::new()),
            fail_on: Some("made by Alice"),
        };

        let output = summarize_by_author(&groups, &generator);
        assert!(output.contains("## Alice <alice@x.com> (1 commit)\n\nError generating summary for this author."));
        assert!(output.contains("## Bob <bob@x.com> (1 commit)\n\nsummary #2"));
    }
}
