pub mod auth;
pub mod browser;
pub mod github;
pub mod search;
pub mod settings;

pub use auth::{token_from_redirect, AuthFlow, GhCliAuth, WebAuthFlow};
pub use browser::{default_opener, Browser, BrowserError, SystemBrowser};
pub use github::{get_github_token, triage_candidates, GithubClient, IssueFetcher};
pub use search::filter_labels;
pub use settings::{get_settings_path, SettingsStore, SqliteSettingsStore};
