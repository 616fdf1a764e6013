pub mod git;

pub use git::{get_current_repo, parse_github_url, parse_repo_slug};
