//! Assigns issues to tabs and tabs to named tab groups.
//!
//! A group is created through the browser the first time its name comes up
//! during a load and extended by id after that. The name-to-group map lives
//! for one load only.

use std::collections::HashMap;
use tracing::debug;

use crate::data::{GroupId, GroupName, GroupUpdate, Issue, TabId, WindowId};
use crate::error::TriageError;
use crate::services::browser::Browser;

/// Tabs of one group, in the order they were opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupState {
    pub tab_ids: Vec<TabId>,
    pub group_id: GroupId,
}

/// What happened to a single issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub tab: TabId,
    pub group: Option<(GroupName, GroupId)>,
}

#[derive(Debug, Default)]
pub struct TabGroupEngine {
    groups: HashMap<GroupName, GroupState>,
}

impl TabGroupEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens `issue` in `window` and, when grouping, files the tab under the
    /// issue's group. Errors stop here; nothing already opened is undone.
    pub async fn assign<B>(
        &mut self,
        browser: &B,
        issue: &Issue,
        window: WindowId,
        grouping: bool,
    ) -> Result<Assignment, TriageError>
    where
        B: Browser + ?Sized,
    {
        let tab = browser.create_tab(window, &issue.html_url).await?;

        if !grouping {
            return Ok(Assignment { tab, group: None });
        }

        let name = issue.group_name();
        let group_id = match self.groups.get_mut(&name) {
            Some(state) => {
                let mut tab_ids = state.tab_ids.clone();
                tab_ids.push(tab);
                browser.add_to_group(state.group_id, &tab_ids).await?;
                state.tab_ids = tab_ids;
                debug!(group = %name, tabs = state.tab_ids.len(), "group extended");
                state.group_id
            }
            None => {
                let tab_ids = vec![tab];
                let group_id = browser.create_group(window, &tab_ids).await?;
                self.groups
                    .insert(name.clone(), GroupState { tab_ids, group_id });
                debug!(group = %name, %group_id, "group created");
                group_id
            }
        };

        browser
            .update_group(group_id, &GroupUpdate::collapsed(&name))
            .await?;

        Ok(Assignment {
            tab,
            group: Some((name, group_id)),
        })
    }

    pub fn group(&self, name: &GroupName) -> Option<&GroupState> {
        self.groups.get(name)
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Groups sorted by name, with `Other` last.
    pub fn into_groups(self) -> Vec<(GroupName, GroupState)> {
        let mut groups: Vec<_> = self.groups.into_iter().collect();
        groups.sort_by(|(a, _), (b, _)| a.is_other().cmp(&b.is_other()).then_with(|| a.cmp(b)));
        groups
    }
}
