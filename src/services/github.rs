use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use octocrab::{Octocrab, Page};
use serde::Serialize;
use std::collections::HashSet;
use std::process::Command;
use tracing::{debug, info};

use crate::data::{Issue, IssueQueryParams, Label};
use crate::error::TriageError;

const ISSUES_PER_PAGE: u8 = 10;
const LABELS_PER_PAGE: u8 = 100;

/// Source of the issues to open.
#[async_trait]
pub trait IssueFetcher: Send + Sync {
    /// Issues in the tracker's order, de-duplicated, pull requests filtered.
    async fn fetch_issues(&self, params: &IssueQueryParams) -> Result<Vec<Issue>, TriageError>;
}

pub fn get_github_token() -> Result<String, TriageError> {
    let output = Command::new("gh").args(["auth", "token"]).output()?;

    if !output.status.success() {
        return Err(TriageError::AuthenticationFailed(
            "Failed to get GitHub token. Run 'gh auth login' first.".to_string(),
        ));
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        return Err(TriageError::AuthenticationFailed(
            "gh returned an empty token".to_string(),
        ));
    }

    Ok(token)
}

#[derive(Serialize)]
struct ListIssuesParams {
    since: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    labels: Option<String>,
    per_page: u8,
}

#[derive(Serialize)]
struct ListLabelsParams {
    per_page: u8,
}

/// Authenticated client for one repository. Built once per sign-in and
/// handed to whoever needs it.
#[derive(Clone)]
pub struct GithubClient {
    octocrab: Octocrab,
    owner: String,
    repo: String,
}

impl GithubClient {
    pub fn from_token(token: String, owner: &str, repo: &str) -> Result<Self, TriageError> {
        let octocrab = Octocrab::builder().personal_token(token).build()?;
        Ok(Self {
            octocrab,
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    pub fn repo_display(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    pub async fn current_user(&self) -> Result<String, TriageError> {
        let user = self.octocrab.current().user().await?;
        Ok(user.login)
    }

    pub async fn list_labels(&self) -> Result<Vec<Label>, TriageError> {
        let route = format!("/repos/{}/{}/labels", self.owner, self.repo);
        let params = ListLabelsParams {
            per_page: LABELS_PER_PAGE,
        };
        let first: Page<Label> = self.octocrab.get(route, Some(&params)).await?;
        self.collect_pages(first).await
    }

    pub async fn list_issues(&self, params: &IssueQueryParams) -> Result<Vec<Issue>, TriageError> {
        let since = params
            .window_start(Utc::now())?
            .to_rfc3339_opts(SecondsFormat::Secs, true);
        let labels = params.label_list().join(",");
        let labels = (!labels.is_empty()).then_some(labels);

        info!(repo = %self.repo_display(), %since, labels = labels.as_deref().unwrap_or(""), "listing issues");

        let route = format!("/repos/{}/{}/issues", self.owner, self.repo);
        let request = ListIssuesParams {
            since,
            labels,
            per_page: ISSUES_PER_PAGE,
        };
        let first: Page<Issue> = self.octocrab.get(route, Some(&request)).await?;
        let issues = self.collect_pages(first).await?;

        let issues = triage_candidates(issues);
        debug!(count = issues.len(), "issues after filtering");
        Ok(issues)
    }

    /// Follows `next` links and concatenates pages in order.
    async fn collect_pages<T>(&self, first: Page<T>) -> Result<Vec<T>, TriageError>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut items = Vec::new();
        let mut page = first;

        loop {
            let next = page.next.clone();
            items.extend(page.items);

            match self.octocrab.get_page::<T>(&next).await? {
                Some(next_page) => page = next_page,
                None => break,
            }
        }

        Ok(items)
    }
}

#[async_trait]
impl IssueFetcher for GithubClient {
    async fn fetch_issues(&self, params: &IssueQueryParams) -> Result<Vec<Issue>, TriageError> {
        self.list_issues(params).await
    }
}

/// Drops repeated issue ids (first occurrence wins) and pull requests that
/// are not up for discussion. Order is preserved.
pub fn triage_candidates(issues: Vec<Issue>) -> Vec<Issue> {
    let mut seen = HashSet::new();
    issues
        .into_iter()
        .filter(|issue| seen.insert(issue.id))
        .filter(Issue::is_triage_candidate)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issues(json: serde_json::Value) -> Vec<Issue> {
        serde_json::from_value(json).expect("issues")
    }

    #[test]
    fn candidates_keep_order_and_drop_duplicates() {
        let fetched = issues(serde_json::json!([
            {"id": 3, "html_url": "https://github.com/o/r/issues/3"},
            {"id": 1, "html_url": "https://github.com/o/r/issues/1"},
            {"id": 3, "html_url": "https://github.com/o/r/issues/3"},
            {"id": 2, "html_url": "https://github.com/o/r/issues/2"}
        ]));

        let ids: Vec<u64> = triage_candidates(fetched).iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn candidates_filter_pull_requests_without_discussion_label() {
        let fetched = issues(serde_json::json!([
            {"id": 1, "html_url": "u1", "labels": [{"name": "bug"}]},
            {"id": 2, "html_url": "u2", "labels": [{"name": "bug"}], "pull_request": {"url": "p"}},
            {"id": 3, "html_url": "u3", "labels": ["needs discussion"], "pull_request": {"url": "p"}},
            {"id": 4, "html_url": "u4", "labels": [], "pull_request": null}
        ]));

        let ids: Vec<u64> = triage_candidates(fetched).iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 3, 4]);
    }

    #[test]
    fn list_params_omit_empty_labels() {
        let params = ListIssuesParams {
            since: "2024-01-01T00:00:00Z".to_string(),
            labels: None,
            per_page: ISSUES_PER_PAGE,
        };
        let value = serde_json::to_value(&params).expect("json");
        assert_eq!(
            value,
            serde_json::json!({"since": "2024-01-01T00:00:00Z", "per_page": 10})
        );
    }
}
