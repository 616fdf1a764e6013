use thiserror::Error;

use crate::services::browser::BrowserError;

#[derive(Debug, Error)]
pub enum TriageError {
    #[error("No issues found")]
    NoIssuesFound,

    #[error("Failed to authenticate: {0}")]
    AuthenticationFailed(String),

    #[error(transparent)]
    BrowserOperationFailed(#[from] BrowserError),

    #[error("GitHub request failed: {0}")]
    Github(#[from] octocrab::Error),

    #[error("settings storage failed: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid since timestamp: {0}")]
    InvalidTimestamp(String),
}
