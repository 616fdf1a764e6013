mod support;

use std::collections::HashSet;

use ghtabs::data::{GroupName, GroupUpdate, TabId, WindowId};
use ghtabs::TabGroupEngine;

use support::{issue, issue_url, Call, RecordingBrowser};

const WINDOW: WindowId = WindowId(1);

#[tokio::test]
async fn ungrouped_tabs_follow_issue_order() {
    let browser = RecordingBrowser::new();
    let mut engine = TabGroupEngine::new();
    let issues = [
        issue(1, &["area:core"]),
        issue(2, &[]),
        issue(3, &["area:ui"]),
    ];

    for issue in &issues {
        let assignment = engine.assign(&browser, issue, WINDOW, false).await.unwrap();
        assert_eq!(assignment.group, None);
    }

    assert_eq!(
        browser.tab_urls(),
        vec![issue_url(1), issue_url(2), issue_url(3)]
    );
    assert!(browser.group_calls().is_empty());
    assert_eq!(engine.group_count(), 0);
}

#[tokio::test]
async fn issues_are_filed_by_first_area_label() {
    let browser = RecordingBrowser::new();
    let mut engine = TabGroupEngine::new();
    let issues = [
        issue(1, &["area:core", "bug"]),
        issue(2, &["area:core"]),
        issue(3, &[]),
    ];

    let mut assignments = Vec::new();
    for issue in &issues {
        assignments.push(engine.assign(&browser, issue, WINDOW, true).await.unwrap());
    }

    let core = GroupName::new("area:core");
    let core_state = engine.group(&core).unwrap();
    assert_eq!(core_state.tab_ids, vec![assignments[0].tab, assignments[1].tab]);

    let other = engine.group(&GroupName::other()).unwrap();
    assert_eq!(other.tab_ids, vec![assignments[2].tab]);
    assert_eq!(engine.group_count(), 2);

    let calls = browser.group_calls();
    assert_eq!(
        calls,
        vec![
            Call::CreateGroup {
                window: WINDOW,
                tabs: vec![assignments[0].tab],
            },
            Call::UpdateGroup {
                group: core_state.group_id,
                update: GroupUpdate::collapsed(&core),
            },
            Call::AddToGroup {
                group: core_state.group_id,
                tabs: vec![assignments[0].tab, assignments[1].tab],
            },
            Call::UpdateGroup {
                group: core_state.group_id,
                update: GroupUpdate::collapsed(&core),
            },
            Call::CreateGroup {
                window: WINDOW,
                tabs: vec![assignments[2].tab],
            },
            Call::UpdateGroup {
                group: other.group_id,
                update: GroupUpdate::collapsed(&GroupName::other()),
            },
        ]
    );
}

#[tokio::test]
async fn one_group_per_distinct_name() {
    let browser = RecordingBrowser::new();
    let mut engine = TabGroupEngine::new();
    let issues = [
        issue(1, &["area:infra"]),
        issue(2, &["bug"]),
        issue(3, &["area:ui", "area:infra"]),
        issue(4, &["area:infra"]),
        issue(5, &[]),
    ];

    for issue in &issues {
        engine.assign(&browser, issue, WINDOW, true).await.unwrap();
    }

    let distinct: HashSet<GroupName> = issues.iter().map(|i| i.group_name()).collect();
    assert_eq!(engine.group_count(), distinct.len());

    let created = browser
        .calls()
        .into_iter()
        .filter(|call| matches!(call, Call::CreateGroup { .. }))
        .count();
    assert_eq!(created, 3);

    let names: Vec<String> = engine
        .into_groups()
        .into_iter()
        .map(|(name, _)| name.to_string())
        .collect();
    assert_eq!(names, vec!["area:infra", "area:ui", "Other"]);
}

#[tokio::test]
async fn extending_a_group_sends_all_of_its_tabs_in_order() {
    let browser = RecordingBrowser::new();
    let mut engine = TabGroupEngine::new();

    let first = engine
        .assign(&browser, &issue(1, &["area:infra"]), WINDOW, true)
        .await
        .unwrap();
    let second = engine
        .assign(&browser, &issue(2, &["area:infra"]), WINDOW, true)
        .await
        .unwrap();

    let (_, group) = first.group.clone().unwrap();
    assert_eq!(second.group, Some((GroupName::new("area:infra"), group)));

    let extend: Vec<Vec<TabId>> = browser
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            Call::AddToGroup { tabs, .. } => Some(tabs),
            _ => None,
        })
        .collect();
    assert_eq!(extend, vec![vec![first.tab, second.tab]]);
}

#[tokio::test]
async fn every_membership_change_reapplies_title_and_collapse() {
    let browser = RecordingBrowser::new();
    let mut engine = TabGroupEngine::new();

    for id in 1..=3 {
        engine
            .assign(&browser, &issue(id, &["area:core"]), WINDOW, true)
            .await
            .unwrap();
    }

    let updates: Vec<GroupUpdate> = browser
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            Call::UpdateGroup { update, .. } => Some(update),
            _ => None,
        })
        .collect();
    assert_eq!(updates.len(), 3);
    assert!(updates
        .iter()
        .all(|u| u.title == "area:core" && u.collapsed));
}
