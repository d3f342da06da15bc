//! git-digest command line entry point
//!
//! Collects commits from one or more repositories and prints a summary.

use clap::Parser;
use tokio::runtime::Runtime;

use git_digest::cli::{self, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli::init_logging(cli.debug);

    // Initialize the Tokio runtime
    let rt = Runtime::new()?;
    rt.block_on(cli::run(cli))
}
