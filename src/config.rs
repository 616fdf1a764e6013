use anyhow::Result;
use std::path::PathBuf;

use crate::services::browser::default_opener;
use crate::services::settings::get_settings_path;
use crate::utils::{get_current_repo, parse_repo_slug};

pub const DEFAULT_OWNER: &str = "backstage";
pub const DEFAULT_REPO: &str = "backstage";

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub repo: Option<String>,
    pub login_url: Option<String>,
    pub browser: Option<String>,
    pub new_window_flag: Option<String>,
    pub settings_file: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub owner: String,
    pub repo: String,
    /// Base URL of the sign-in service; `gh auth token` is used without it.
    pub login_url: Option<String>,
    pub opener: Vec<String>,
    pub new_window_flag: Option<String>,
    pub settings_path: PathBuf,
    pub log_path: PathBuf,
}

impl Config {
    pub fn resolve(overrides: ConfigOverrides) -> Result<Self> {
        let (owner, repo) = match overrides.repo.as_deref() {
            Some(slug) => parse_repo_slug(slug)
                .ok_or_else(|| anyhow::anyhow!("Invalid repository '{}', expected owner/name", slug))?,
            None => get_current_repo()
                .unwrap_or_else(|| (DEFAULT_OWNER.to_string(), DEFAULT_REPO.to_string())),
        };

        let settings_path = match overrides.settings_file {
            Some(path) => path,
            None => get_settings_path()
                .ok_or_else(|| anyhow::anyhow!("Could not determine settings path"))?,
        };

        let log_path = match overrides.log_file {
            Some(path) => path,
            None => settings_path
                .parent()
                .map(|dir| dir.join("ghtabs.log"))
                .unwrap_or_else(|| PathBuf::from("ghtabs.log")),
        };

        let opener = overrides
            .browser
            .as_deref()
            .map(|cmd| cmd.split_whitespace().map(str::to_string).collect::<Vec<_>>())
            .filter(|cmd| !cmd.is_empty())
            .unwrap_or_else(default_opener);

        Ok(Self {
            owner,
            repo,
            login_url: overrides
                .login_url
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty()),
            opener,
            new_window_flag: overrides.new_window_flag.filter(|flag| !flag.is_empty()),
            settings_path,
            log_path,
        })
    }

    pub fn repo_display(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overrides() -> ConfigOverrides {
        ConfigOverrides {
            repo: Some("octo/widgets".to_string()),
            settings_file: Some(PathBuf::from("/tmp/ghtabs-test/settings.db")),
            ..ConfigOverrides::default()
        }
    }

    #[test]
    fn explicit_values_win() {
        let config = Config::resolve(ConfigOverrides {
            browser: Some("firefox --private-window".to_string()),
            new_window_flag: Some("--new-window".to_string()),
            login_url: Some(" https://login.example.com ".to_string()),
            ..overrides()
        })
        .expect("config");

        assert_eq!(config.repo_display(), "octo/widgets");
        assert_eq!(config.opener, vec!["firefox", "--private-window"]);
        assert_eq!(config.new_window_flag.as_deref(), Some("--new-window"));
        assert_eq!(config.login_url.as_deref(), Some("https://login.example.com"));
        assert_eq!(config.log_path, PathBuf::from("/tmp/ghtabs-test/ghtabs.log"));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = Config::resolve(ConfigOverrides {
            browser: Some("  ".to_string()),
            login_url: Some(String::new()),
            new_window_flag: Some(String::new()),
            ..overrides()
        })
        .expect("config");

        assert_eq!(config.opener, default_opener());
        assert_eq!(config.login_url, None);
        assert_eq!(config.new_window_flag, None);
    }

    #[test]
    fn malformed_repo_is_rejected() {
        let result = Config::resolve(ConfigOverrides {
            repo: Some("just-a-name".to_string()),
            ..overrides()
        });
        assert!(result.is_err());
    }
}
