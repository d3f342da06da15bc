pub mod args;
pub mod paths;

pub use args::parse_author_filters;
pub use paths::repo_name_from_path;
