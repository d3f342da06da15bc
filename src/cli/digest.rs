use anyhow::{bail, Context, Result};
use chrono::Local;
use tokio::task::spawn_blocking;
use tracing::{debug, error, info, warn};

use super::{Cli, OutputFormat};
use crate::analysis::{aggregate_with_selection, filter_by_authors, group_by_author, validate_repositories};
use crate::config::DigestConfig;
use crate::summary::{self, format_commits_for_llm, LlmClient, TextGenerator};
use crate::types::{Commit, EmptyReason};
use crate::utils::{parse_author_filters, repo_name_from_path};

/// Commits that survived selection and filtering, ready to render.
#[derive(Debug, Clone)]
pub struct Selected {
    pub commits: Vec<Commit>,
    pub repo_names: Vec<String>,
    /// Whether author filters were applied
    pub filtered: bool,
}

/// Run the whole pipeline and print the result.
pub async fn run(cli: Cli) -> Result<()> {
    let selected = match select_commits(&cli).await? {
        Some(selected) => selected,
        None => return Ok(()),
    };

    let output = match cli.format {
        OutputFormat::Json => render_json(&selected, cli.by_author)?,
        OutputFormat::Prompt => render_prompt(&selected, cli.by_author),
        OutputFormat::Summary => {
            let config = DigestConfig::load();
            let llm_config = config.llm_config(cli.provider, cli.model.clone());
            let api_key = config.api_key(llm_config.provider);
            let client = LlmClient::from_config(llm_config, api_key)?;
            info!("Summarizing with {} ({})", client.provider(), client.model());

            let by_author = cli.by_author;
            spawn_blocking(move || render_summary(&selected, by_author, &client))
                .await
                .context("Summary task failed")??
        }
    };

    println!("{}", output);
    Ok(())
}

/// Validate, aggregate and filter. `None` means there is nothing to
/// summarize; the reason has already been logged.
pub async fn select_commits(cli: &Cli) -> Result<Option<Selected>> {
    let authors = parse_author_filters(&cli.authors);
    debug!(
        "Command arguments: repo_paths={:?}, query={:?}, by_author={}, authors={:?}",
        cli.repo_paths,
        cli.query(),
        cli.by_author,
        authors
    );

    let (valid_repos, error_messages) = validate_repositories(&cli.repo_paths);
    for message in &error_messages {
        error!("{}", message);
    }
    if valid_repos.is_empty() {
        bail!("No valid repositories found");
    }

    let repo_names: Vec<String> = valid_repos.iter().map(|p| repo_name_from_path(p)).collect();
    if repo_names.len() > 1 {
        info!(
            "Analyzing {} repositories: {}",
            repo_names.len(),
            repo_names.join(", ")
        );
    } else {
        info!("Analyzing repository: {}", repo_names[0]);
    }

    let selection = cli.query().resolve(Local::now())?;
    let aggregate = spawn_blocking(move || aggregate_with_selection(&valid_repos, &selection))
        .await
        .context("Failed to aggregate commits")?;

    if aggregate.commits.is_empty() {
        warn!("{}", EmptyReason::for_selection(&selection, false).message());
        return Ok(None);
    }

    let total = aggregate.commits.len();
    let commits = if authors.is_empty() {
        aggregate.commits
    } else {
        debug!("Filtering commits by authors: {}", authors.join(", "));
        let filtered = filter_by_authors(aggregate.commits, &authors);

        let matched: Vec<String> = filtered
            .matched_filters()
            .iter()
            .map(|(filter, count)| format!("{} ({} unique authors)", filter, count))
            .collect();
        if !matched.is_empty() {
            info!("Author filter matches: {}", matched.join(", "));
        }
        let unmatched = filtered.unmatched_filters();
        if !unmatched.is_empty() {
            warn!("No commits found for author filters: {}", unmatched.join(", "));
        }
        info!("Filtered to {} commits from {} total", filtered.commits.len(), total);

        filtered.commits
    };

    if commits.is_empty() {
        warn!("{}", EmptyReason::for_selection(&selection, !authors.is_empty()).message());
        return Ok(None);
    }

    info!(
        "Found {} commits across {} repositories",
        commits.len(),
        repo_names.len()
    );

    Ok(Some(Selected {
        commits,
        repo_names,
        filtered: !authors.is_empty(),
    }))
}

/// The text that would be sent to the model.
pub fn render_prompt(selected: &Selected, by_author: bool) -> String {
    if !by_author {
        return format_commits_for_llm(&selected.commits);
    }

    group_by_author(&selected.commits)
        .iter()
        .map(|(author, commits)| format!("## {}\n\n{}", author, format_commits_for_llm(commits)))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Selected commits as pretty JSON, keyed by author when grouping.
pub fn render_json(selected: &Selected, by_author: bool) -> Result<String> {
    let json = if by_author {
        serde_json::to_string_pretty(&group_by_author(&selected.commits))?
    } else {
        serde_json::to_string_pretty(&selected.commits)?
    };
    Ok(json)
}

/// Summarize through `generator` and frame the result in a banner.
pub fn render_summary<G: TextGenerator>(selected: &Selected, by_author: bool, generator: &G) -> Result<String> {
    if by_author {
        debug!("Grouping commits by author");
        let groups = group_by_author(&selected.commits);
        info!("Found {} unique authors", groups.len());

        let body = summary::summarize_by_author(&groups, generator);
        return Ok(banner(&summary_header(true, selected), &body, 60));
    }

    debug!("Formatting commits for LLM processing");
    let commits_text = format_commits_for_llm(&selected.commits);
    let body = summary::summarize(&commits_text, &selected.repo_names, generator)
        .context("Failed to generate summary")?;
    Ok(banner(&summary_header(false, selected), &body, 50))
}

fn summary_header(by_author: bool, selected: &Selected) -> String {
    let mut header = if by_author {
        "GIT DIGEST SUMMARY - BY AUTHOR".to_string()
    } else if selected.repo_names.len() > 1 {
        format!("GIT DIGEST SUMMARY - {} REPOSITORIES", selected.repo_names.len())
    } else {
        "GIT DIGEST SUMMARY".to_string()
    };
    if selected.filtered {
        header.push_str(" (FILTERED)");
    }
    header
}

fn banner(header: &str, body: &str, width: usize) -> String {
    let rule = "=".repeat(width);
    format!("\n{rule}\n{header}\n{rule}\n{body}\n{rule}")
}
