//! Tests for AutoGrouper

use std::sync::Arc;

use shared::{GroupId, Tab, Window, WindowType};

use crate::error::BalancerError;
use crate::services::auto_grouper::AutoGrouper;
use crate::services::memory_host::InMemoryHost;
use crate::traits::MockTabHost;

fn groups_of(window: &Window) -> Vec<Option<GroupId>> {
    window.tabs.iter().map(|tab| tab.group_id).collect()
}

#[tokio::test]
async fn test_groups_loose_tabs_by_domain() {
    let host = Arc::new(InMemoryHost::new(vec![Window::new(1, vec![
        Tab::new(1, 1, "https://github.com/a"),
        Tab::new(2, 1, "https://news.ycombinator.com"),
        Tab::new(3, 1, "https://gist.github.com/b"),
    ])]));

    let report = AutoGrouper::new(host.clone()).run().await.unwrap();

    assert_eq!(report.groups_created, 1);
    let windows = host.windows().await;
    let groups = groups_of(&windows[0]);
    assert!(groups[0].is_some());
    assert_eq!(groups[0], groups[2]);
    assert_eq!(groups[1], None);
    assert_eq!(host.group_title(groups[0].unwrap()).await.as_deref(), Some("github.com"));
}

#[tokio::test]
async fn test_dissolves_single_tab_groups_and_regroups_them() {
    let host = Arc::new(InMemoryHost::new(vec![Window::new(1, vec![
        Tab::new(1, 1, "https://docs.rs/tokio").with_group(7),
        Tab::new(2, 1, "https://docs.rs/serde"),
        Tab::new(3, 1, "https://example.org").with_group(8),
        Tab::new(4, 1, "https://example.org/x").with_group(8),
    ])]));

    let report = AutoGrouper::new(host.clone()).run().await.unwrap();

    assert_eq!(report.groups_dissolved, 1);
    assert_eq!(report.groups_created, 1);
    let windows = host.windows().await;
    let groups = groups_of(&windows[0]);
    assert_eq!(groups[0], groups[1]);
    assert_ne!(groups[0], Some(GroupId(7)));
    assert_eq!(groups[2], Some(GroupId(8)));
}

#[tokio::test]
async fn test_similar_titles_cluster_after_domains() {
    let host = Arc::new(InMemoryHost::new(vec![Window::new(1, vec![
        Tab::new(1, 1, "https://blog.one.net/p").with_title("Rust async runtime internals"),
        Tab::new(2, 1, "https://two.org/q").with_title("Rust async runtime internals explained"),
        Tab::new(3, 1, "https://three.io").with_title("Holiday photos"),
    ])]));

    let report = AutoGrouper::new(host.clone()).run().await.unwrap();

    assert_eq!(report.groups_created, 1);
    let windows = host.windows().await;
    let group = windows[0].tabs[0].group_id.unwrap();
    assert_eq!(windows[0].tabs[1].group_id, Some(group));
    assert_eq!(windows[0].tabs[2].group_id, None);
    assert_eq!(
        host.group_title(group).await.as_deref(),
        Some("Rust Async Runtime Internals")
    );
}

#[tokio::test]
async fn test_pinned_tabs_and_other_windows_untouched() {
    let mut popup = Window::new(2, vec![
        Tab::new(5, 2, "https://a.com/1"),
        Tab::new(6, 2, "https://a.com/2"),
    ]);
    popup.window_type = WindowType::Popup;

    let host = Arc::new(InMemoryHost::new(vec![
        Window::new(1, vec![
            Tab::new(1, 1, "https://a.com/1").pinned(),
            Tab::new(2, 1, "https://a.com/2"),
        ]),
        popup,
    ]));

    let report = AutoGrouper::new(host.clone()).run().await.unwrap();

    assert_eq!(report.groups_created, 0);
    let windows = host.windows().await;
    assert!(windows.iter().flat_map(|w| w.tabs.iter()).all(|tab| tab.group_id.is_none()));
}

#[tokio::test]
async fn test_group_failure_is_counted_and_skipped() {
    let mut host = MockTabHost::new();
    host.expect_list_windows().returning(|| {
        Ok(vec![Window::new(1, vec![
            Tab::new(1, 1, "https://a.com/1"),
            Tab::new(2, 1, "https://a.com/2"),
            Tab::new(3, 1, "https://b.com/1"),
            Tab::new(4, 1, "https://b.com/2"),
        ])])
    });
    let mut calls = 0;
    host.expect_group_tabs().times(2).returning(move |_| {
        calls += 1;
        if calls == 1 {
            Err(BalancerError::host("group_tabs", "window closed"))
        } else {
            Ok(GroupId(3))
        }
    });
    host.expect_title_group().times(1).returning(|_, _| Ok(()));

    let report = AutoGrouper::new(Arc::new(host)).run().await.unwrap();

    assert_eq!(report.failures, 1);
    assert_eq!(report.groups_created, 1);
}

#[tokio::test]
async fn test_listing_failure_propagates() {
    let mut host = MockTabHost::new();
    host.expect_list_windows()
        .returning(|| Err(BalancerError::host("list_windows", "disconnected")));

    let result = AutoGrouper::new(Arc::new(host)).run().await;
    assert!(result.is_err());
}
