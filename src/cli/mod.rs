//! CLI argument model and logging setup

mod digest;

pub use digest::{render_json, render_prompt, render_summary, run, select_commits, Selected};

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::summary::Provider;
use crate::types::CommitQuery;

/// Parse and validate a commit count (must be at least 1)
fn parse_count(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("count must be at least 1".to_string())
    } else {
        Ok(n)
    }
}

/// What to print once commits are selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Summarize with the configured LLM provider
    #[default]
    Summary,
    /// Print the formatted commit text without calling any provider
    Prompt,
    /// Print the selected commits as JSON
    Json,
}

/// git-digest - summarize recent git history with an LLM
#[derive(Parser, Debug)]
#[command(name = "git-digest")]
#[command(
    version,
    about = "Generate a human-readable summary of recent git commits",
    after_help = "\
Examples:
  git-digest .                                  Last 7 days of the current repository
  git-digest api web --days 14                  Two weeks across two repositories
  git-digest . --since '2024-01-01' --until '2024-01-31'
  git-digest . --count 20 --by-author           Last 20 commits, one summary per author
  git-digest . --authors 'alice,bob'            Only commits by matching authors
  git-digest . --format prompt                  Show the text that would be sent to the LLM"
)]
pub struct Cli {
    /// Paths to git repositories to analyze
    #[arg(required = true)]
    pub repo_paths: Vec<PathBuf>,

    /// Start date (e.g., '2024-01-01', '1 week ago', 'yesterday')
    #[arg(long, short = 's')]
    pub since: Option<String>,

    /// End date (e.g., '2024-01-31', 'today')
    #[arg(long, short = 'u')]
    pub until: Option<String>,

    /// Get commits from the last N days (overrides since/until)
    #[arg(long, short = 'd')]
    pub days: Option<u32>,

    /// Get the last N commits (overrides since/until/days)
    #[arg(long, short = 'c', value_parser = parse_count)]
    pub count: Option<usize>,

    /// Filter commits by author (partial, case-insensitive). Accepts comma-separated
    /// values or repeated flags: --authors 'Alice,Bob' or --authors Alice --authors Bob
    #[arg(long)]
    pub authors: Vec<String>,

    /// Group summary by author instead of chronological overview
    #[arg(long)]
    pub by_author: bool,

    /// LLM provider to use
    #[arg(long, value_enum)]
    pub provider: Option<Provider>,

    /// Model name (defaults to the provider's default model)
    #[arg(long)]
    pub model: Option<String>,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Summary)]
    pub format: OutputFormat,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Selection parameters carried by the arguments.
    pub fn query(&self) -> CommitQuery {
        CommitQuery {
            since: self.since.clone(),
            until: self.until.clone(),
            days: self.days,
            count: self.count,
        }
    }
}

/// Initialize logging on stderr. `RUST_LOG` wins over `--debug`.
pub fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
