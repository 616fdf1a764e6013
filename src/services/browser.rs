use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

use crate::data::{GroupId, GroupUpdate, TabId, WindowId};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("browser {operation} failed: {message}")]
pub struct BrowserError {
    pub operation: &'static str,
    pub message: String,
}

impl BrowserError {
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

/// Window, tab and tab-group operations the tab opener relies on.
///
/// Every call is awaited before the next one is issued; implementations do
/// not need to handle concurrent calls for the same window.
#[async_trait]
pub trait Browser: Send + Sync {
    /// Opens a new window. `None` means the browser gave no usable handle.
    async fn create_window(&self) -> Result<Option<WindowId>, BrowserError>;

    async fn create_tab(&self, window: WindowId, url: &str) -> Result<TabId, BrowserError>;

    /// Creates a new tab group in `window` holding exactly `tabs`.
    async fn create_group(&self, window: WindowId, tabs: &[TabId])
        -> Result<GroupId, BrowserError>;

    /// Sets the membership of an existing group to `tabs`.
    async fn add_to_group(&self, group: GroupId, tabs: &[TabId]) -> Result<GroupId, BrowserError>;

    async fn update_group(&self, group: GroupId, update: &GroupUpdate) -> Result<(), BrowserError>;

    async fn focus_window(&self, window: WindowId) -> Result<(), BrowserError>;
}

pub fn default_opener() -> Vec<String> {
    if cfg!(target_os = "macos") {
        vec!["open".to_string()]
    } else {
        vec!["xdg-open".to_string()]
    }
}

/// Opens tabs through the operating system's URL opener.
///
/// The opener cannot group tabs, so groups only exist in memory here and
/// show up in the log.
pub struct SystemBrowser {
    command: Vec<String>,
    new_window_flag: Option<String>,
    next_id: AtomicI64,
    fresh_windows: Mutex<Vec<WindowId>>,
    groups: Mutex<HashMap<GroupId, Vec<TabId>>>,
}

impl SystemBrowser {
    pub fn new(command: Vec<String>, new_window_flag: Option<String>) -> Self {
        let command = if command.is_empty() {
            default_opener()
        } else {
            command
        };

        Self {
            command,
            new_window_flag,
            next_id: AtomicI64::new(1),
            fresh_windows: Mutex::new(Vec::new()),
            groups: Mutex::new(HashMap::new()),
        }
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Whether this is the first tab of `window`; consumes the marker.
    fn take_fresh(&self, window: WindowId) -> bool {
        let Ok(mut fresh) = self.fresh_windows.lock() else {
            return false;
        };
        match fresh.iter().position(|w| *w == window) {
            Some(idx) => {
                fresh.remove(idx);
                true
            }
            None => false,
        }
    }

    async fn open_url(&self, url: &str, new_window: bool) -> Result<(), BrowserError> {
        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| BrowserError::new("create tab", "no opener command configured"))?;

        let mut command = Command::new(program);
        command.args(args);
        if new_window {
            if let Some(flag) = &self.new_window_flag {
                command.arg(flag);
            }
        }
        command.arg(url);

        let status = command
            .status()
            .await
            .map_err(|e| BrowserError::new("create tab", format!("{}: {}", program, e)))?;

        if !status.success() {
            return Err(BrowserError::new(
                "create tab",
                format!("{} exited with {}", program, status),
            ));
        }

        Ok(())
    }

    fn set_members(&self, group: GroupId, tabs: &[TabId]) -> Result<(), BrowserError> {
        let mut groups = self
            .groups
            .lock()
            .map_err(|_| BrowserError::new("group tabs", "group registry poisoned"))?;
        groups.insert(group, tabs.to_vec());
        Ok(())
    }
}

#[async_trait]
impl Browser for SystemBrowser {
    async fn create_window(&self) -> Result<Option<WindowId>, BrowserError> {
        let window = WindowId(self.next_id());
        self.fresh_windows
            .lock()
            .map_err(|_| BrowserError::new("create window", "window registry poisoned"))?
            .push(window);
        debug!(%window, "window reserved");
        Ok(Some(window))
    }

    async fn create_tab(&self, window: WindowId, url: &str) -> Result<TabId, BrowserError> {
        let new_window = self.take_fresh(window);
        self.open_url(url, new_window).await?;
        let tab = TabId(self.next_id());
        debug!(%window, %tab, url, "tab opened");
        Ok(tab)
    }

    async fn create_group(
        &self,
        window: WindowId,
        tabs: &[TabId],
    ) -> Result<GroupId, BrowserError> {
        let group = GroupId(self.next_id());
        self.set_members(group, tabs)?;
        debug!(%window, %group, tabs = tabs.len(), "group created");
        Ok(group)
    }

    async fn add_to_group(&self, group: GroupId, tabs: &[TabId]) -> Result<GroupId, BrowserError> {
        self.set_members(group, tabs)?;
        debug!(%group, tabs = tabs.len(), "group extended");
        Ok(group)
    }

    async fn update_group(&self, group: GroupId, update: &GroupUpdate) -> Result<(), BrowserError> {
        info!(%group, title = %update.title, collapsed = update.collapsed, "group updated");
        Ok(())
    }

    async fn focus_window(&self, window: WindowId) -> Result<(), BrowserError> {
        debug!(%window, "focus requested");
        Ok(())
    }
}
