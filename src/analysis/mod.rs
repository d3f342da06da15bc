mod aggregate;
mod authors;
pub mod dates;
pub mod git;


pub use aggregate::{aggregate_commits, aggregate_commits_async, aggregate_with_selection};
pub use authors::{filter_by_authors, group_by_author};
pub use git::{get_commits, retrieve_commits, validate_repositories, validate_repository};
