#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;

use ghtabs::data::{GroupId, GroupUpdate, IssueQueryParams, SettingsRecord, TabId, WindowId};
use ghtabs::services::{Browser, BrowserError, IssueFetcher, SettingsStore};
use ghtabs::{Issue, TriageError};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateWindow,
    CreateTab { window: WindowId, url: String },
    CreateGroup { window: WindowId, tabs: Vec<TabId> },
    AddToGroup { group: GroupId, tabs: Vec<TabId> },
    UpdateGroup { group: GroupId, update: GroupUpdate },
    Focus(WindowId),
}

/// Browser that hands out sequential ids and records every call.
pub struct RecordingBrowser {
    calls: Mutex<Vec<Call>>,
    next_id: AtomicI64,
    window: Option<WindowId>,
    tabs_opened: AtomicUsize,
    fail_on_tab: Option<usize>,
    group_ops: AtomicUsize,
    fail_on_group: Option<usize>,
}

impl RecordingBrowser {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(100),
            window: Some(WindowId(1)),
            tabs_opened: AtomicUsize::new(0),
            fail_on_tab: None,
            group_ops: AtomicUsize::new(0),
            fail_on_group: None,
        }
    }

    /// `create_window` answers without a handle.
    pub fn without_window() -> Self {
        Self {
            window: None,
            ..Self::new()
        }
    }

    /// The tab at zero-based position `n` fails to open.
    pub fn failing_on_tab(n: usize) -> Self {
        Self {
            fail_on_tab: Some(n),
            ..Self::new()
        }
    }

    /// The group operation (create, extend or update) at zero-based
    /// position `n` fails.
    pub fn failing_on_group(n: usize) -> Self {
        Self {
            fail_on_group: Some(n),
            ..Self::new()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn tab_urls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::CreateTab { url, .. } => Some(url),
                _ => None,
            })
            .collect()
    }

    pub fn group_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| {
                matches!(
                    call,
                    Call::CreateGroup { .. } | Call::AddToGroup { .. } | Call::UpdateGroup { .. }
                )
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn check_group_op(&self, operation: &'static str) -> Result<(), BrowserError> {
        let n = self.group_ops.fetch_add(1, Ordering::SeqCst);
        if self.fail_on_group == Some(n) {
            return Err(BrowserError::new(operation, "group rejected"));
        }
        Ok(())
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

#[async_trait]
impl Browser for RecordingBrowser {
    async fn create_window(&self) -> Result<Option<WindowId>, BrowserError> {
        self.record(Call::CreateWindow);
        Ok(self.window)
    }

    async fn create_tab(&self, window: WindowId, url: &str) -> Result<TabId, BrowserError> {
        let n = self.tabs_opened.fetch_add(1, Ordering::SeqCst);
        if self.fail_on_tab == Some(n) {
            return Err(BrowserError::new("create tab", "tab crashed"));
        }
        self.record(Call::CreateTab {
            window,
            url: url.to_string(),
        });
        Ok(TabId(self.next_id()))
    }

    async fn create_group(
        &self,
        window: WindowId,
        tabs: &[TabId],
    ) -> Result<GroupId, BrowserError> {
        self.check_group_op("create group")?;
        self.record(Call::CreateGroup {
            window,
            tabs: tabs.to_vec(),
        });
        Ok(GroupId(self.next_id()))
    }

    async fn add_to_group(&self, group: GroupId, tabs: &[TabId]) -> Result<GroupId, BrowserError> {
        self.check_group_op("add to group")?;
        self.record(Call::AddToGroup {
            group,
            tabs: tabs.to_vec(),
        });
        Ok(group)
    }

    async fn update_group(&self, group: GroupId, update: &GroupUpdate) -> Result<(), BrowserError> {
        self.check_group_op("update group")?;
        self.record(Call::UpdateGroup {
            group,
            update: update.clone(),
        });
        Ok(())
    }

    async fn focus_window(&self, window: WindowId) -> Result<(), BrowserError> {
        self.record(Call::Focus(window));
        Ok(())
    }
}

/// Fetcher returning a fixed list and remembering what it was asked for.
pub struct StubFetcher {
    issues: Vec<Issue>,
    requests: Mutex<Vec<IssueQueryParams>>,
}

impl StubFetcher {
    pub fn new(issues: Vec<Issue>) -> Self {
        Self {
            issues,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<IssueQueryParams> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl IssueFetcher for StubFetcher {
    async fn fetch_issues(&self, params: &IssueQueryParams) -> Result<Vec<Issue>, TriageError> {
        self.requests.lock().unwrap().push(params.clone());
        Ok(self.issues.clone())
    }
}

#[derive(Default)]
pub struct MemorySettings {
    record: Mutex<Option<SettingsRecord>>,
}

impl MemorySettings {
    pub fn saved(&self) -> Option<SettingsRecord> {
        self.record.lock().unwrap().clone()
    }
}

impl SettingsStore for MemorySettings {
    fn save(&self, record: &SettingsRecord) -> Result<(), TriageError> {
        *self.record.lock().unwrap() = Some(record.clone());
        Ok(())
    }

    fn load(&self) -> Result<Option<SettingsRecord>, TriageError> {
        Ok(self.saved())
    }

    fn clear(&self) -> Result<(), TriageError> {
        *self.record.lock().unwrap() = None;
        Ok(())
    }
}

pub fn issue(id: u64, labels: &[&str]) -> Issue {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "number": id,
        "title": format!("Issue {}", id),
        "html_url": issue_url(id),
        "labels": labels
            .iter()
            .map(|name| serde_json::json!({ "name": name }))
            .collect::<Vec<_>>(),
    }))
    .expect("issue json")
}

pub fn issue_url(id: u64) -> String {
    format!("https://github.com/backstage/backstage/issues/{}", id)
}
