use serde::Deserialize;

use super::types::{GroupName, AREA_PREFIX, NEEDS_DISCUSSION_LABEL};

/// An issue as returned by the issues endpoint. Pull requests come back from
/// the same endpoint and are recognised by the `pull_request` key.
#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub id: u64,
    #[serde(default)]
    pub number: u64,
    #[serde(default)]
    pub title: String,
    pub html_url: String,
    #[serde(default)]
    pub labels: Vec<IssueLabel>,
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
}

/// Labels are either bare names or label objects.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum IssueLabel {
    Name(String),
    Object {
        #[serde(default)]
        name: Option<String>,
    },
}

impl IssueLabel {
    pub fn name(&self) -> Option<&str> {
        match self {
            IssueLabel::Name(name) => Some(name),
            IssueLabel::Object { name } => name.as_deref(),
        }
    }
}

impl Issue {
    pub fn label_names(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().filter_map(IssueLabel::name)
    }

    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }

    pub fn has_label(&self, name: &str) -> bool {
        self.label_names().any(|label| label == name)
    }

    /// Pull requests only make the cut when they are up for discussion.
    pub fn is_triage_candidate(&self) -> bool {
        !self.is_pull_request() || self.has_label(NEEDS_DISCUSSION_LABEL)
    }

    /// First `area:` label in label order, else `Other`.
    pub fn group_name(&self) -> GroupName {
        self.label_names()
            .find(|label| label.starts_with(AREA_PREFIX))
            .map(GroupName::new)
            .unwrap_or_else(GroupName::other)
    }
}

/// A repository label offered by the label picker.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Label {
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub description: Option<String>,
}
