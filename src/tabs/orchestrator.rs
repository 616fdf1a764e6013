use std::fmt;
use tracing::{info, warn};

use crate::data::{GroupName, Issue, IssueQueryParams, Query, WindowId};
use crate::error::TriageError;
use crate::services::browser::Browser;
use crate::services::github::IssueFetcher;
use crate::services::settings::SettingsStore;

use super::engine::{GroupState, TabGroupEngine};

/// Steps of a load, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Persist,
    Fetch,
    OpenWindow,
    OpenTabs,
    Focus,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Persist => "persist",
            Stage::Fetch => "fetch",
            Stage::OpenWindow => "open-window",
            Stage::OpenTabs => "open-tabs",
            Stage::Focus => "focus",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    pub window: WindowId,
    pub tabs: usize,
    pub groups: Vec<(GroupName, GroupState)>,
}

impl LoadSummary {
    /// One-line account of what was opened, e.g.
    /// `Opened 3 tabs in 2 groups: area:core, Other`.
    pub fn describe(&self) -> String {
        let tabs = if self.tabs == 1 { "tab" } else { "tabs" };
        if self.groups.is_empty() {
            return format!("Opened {} {}", self.tabs, tabs);
        }

        let names: Vec<&str> = self.groups.iter().map(|(name, _)| name.as_str()).collect();
        let groups = if names.len() == 1 { "group" } else { "groups" };
        format!(
            "Opened {} {} in {} {}: {}",
            self.tabs,
            tabs,
            names.len(),
            groups,
            names.join(", ")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Opened(LoadSummary),
    /// The browser returned no window handle. Nothing was opened and no
    /// error is reported for this case.
    WindowUnavailable,
}

/// Runs one load: save the query, fetch issues, open them in a new window,
/// focus it.
pub struct WindowOrchestrator<'a> {
    fetcher: &'a dyn IssueFetcher,
    browser: &'a dyn Browser,
    settings: Option<&'a dyn SettingsStore>,
}

impl<'a> WindowOrchestrator<'a> {
    pub fn new(fetcher: &'a dyn IssueFetcher, browser: &'a dyn Browser) -> Self {
        Self {
            fetcher,
            browser,
            settings: None,
        }
    }

    pub fn with_settings(mut self, settings: &'a dyn SettingsStore) -> Self {
        self.settings = Some(settings);
        self
    }

    pub async fn run(&self, query: &Query) -> Result<LoadOutcome, TriageError> {
        let params = self.persist(query)?;
        let issues = self.fetch(&params).await?;

        let Some(window) = self.open_window().await? else {
            warn!(stage = %Stage::OpenWindow, "browser returned no window; load abandoned");
            return Ok(LoadOutcome::WindowUnavailable);
        };

        let engine = self.open_tabs(window, &issues, query.group).await?;
        self.focus(window).await?;

        let summary = LoadSummary {
            window,
            tabs: issues.len(),
            groups: engine.into_groups(),
        };
        info!(%window, tabs = summary.tabs, groups = summary.groups.len(), "load finished");
        Ok(LoadOutcome::Opened(summary))
    }

    fn persist(&self, query: &Query) -> Result<IssueQueryParams, TriageError> {
        if let Some(settings) = self.settings {
            info!(stage = %Stage::Persist, "saving query");
            settings.save(&query.to_record())?;
        }
        Ok(query.to_params())
    }

    async fn fetch(&self, params: &IssueQueryParams) -> Result<Vec<Issue>, TriageError> {
        info!(stage = %Stage::Fetch, "fetching issues");
        let issues = self.fetcher.fetch_issues(params).await?;
        if issues.is_empty() {
            return Err(TriageError::NoIssuesFound);
        }
        Ok(issues)
    }

    async fn open_window(&self) -> Result<Option<WindowId>, TriageError> {
        info!(stage = %Stage::OpenWindow, "opening window");
        Ok(self.browser.create_window().await?)
    }

    /// One issue at a time: each group lookup must see the previous
    /// issue's group.
    async fn open_tabs(
        &self,
        window: WindowId,
        issues: &[Issue],
        grouping: bool,
    ) -> Result<TabGroupEngine, TriageError> {
        info!(stage = %Stage::OpenTabs, count = issues.len(), grouping, "opening tabs");
        let mut engine = TabGroupEngine::new();
        for issue in issues {
            engine.assign(self.browser, issue, window, grouping).await?;
        }
        Ok(engine)
    }

    async fn focus(&self, window: WindowId) -> Result<(), TriageError> {
        info!(stage = %Stage::Focus, %window, "focusing window");
        Ok(self.browser.focus_window(window).await?)
    }
}
