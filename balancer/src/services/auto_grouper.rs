//! Automatic tab grouping
//!
//! Optional pass run after balancing. Inside every normal window it:
//! 1. dissolves groups left with a single tab
//! 2. groups loose tabs sharing a base domain, titled with the domain
//! 3. clusters what is still loose by title similarity
//!
//! Pinned tabs are never grouped. A failing host call only skips the group
//! it was working on.

use std::sync::Arc;

use serde::Serialize;
use shared::{Component, GroupId, Tab, TabId, Window, component_debug, component_info, component_warn};

use crate::core::domain::base_domain;
use crate::core::similarity::cluster_by_similarity;
use crate::error::BalancerResult;
use crate::traits::TabHost;

/// Smallest number of tabs worth a group
pub const MIN_GROUP_SIZE: usize = 2;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoGroupReport {
    pub groups_created: usize,
    pub groups_dissolved: usize,
    pub failures: usize,
}

pub struct AutoGrouper<H: TabHost> {
    host: Arc<H>,
}

impl<H: TabHost> AutoGrouper<H> {
    pub fn new(host: Arc<H>) -> Self {
        Self { host }
    }

    /// Re-list the host's windows and group each one
    pub async fn run(&self) -> BalancerResult<AutoGroupReport> {
        let windows = self.host.list_windows().await?;
        let mut report = AutoGroupReport::default();

        for window in windows.iter().filter(|w| w.is_normal()) {
            self.group_window(window, &mut report).await;
        }

        component_info!(
            Component::Grouper,
            "Auto-grouping done: {} created, {} dissolved, {} failures",
            report.groups_created,
            report.groups_dissolved,
            report.failures
        );
        Ok(report)
    }

    async fn group_window(&self, window: &Window, report: &mut AutoGroupReport) {
        let mut loose: Vec<&Tab> = window.tabs.iter().filter(|tab| tab.group_id.is_none()).collect();

        for (group_id, members) in existing_groups(&window.tabs) {
            if members.len() >= MIN_GROUP_SIZE {
                continue;
            }
            let ids: Vec<TabId> = members.iter().map(|tab| tab.id).collect();
            match self.host.ungroup_tabs(&ids).await {
                Ok(()) => {
                    report.groups_dissolved += 1;
                    component_debug!(Component::Grouper, "Dissolved {} in {}", group_id, window.id);
                    loose.extend(members);
                }
                Err(e) => {
                    report.failures += 1;
                    component_warn!(Component::Grouper, "Could not dissolve {}: {}", group_id, e);
                }
            }
        }

        loose.retain(|tab| !tab.pinned);

        let mut residual: Vec<Tab> = Vec::new();
        for (domain, members) in domain_buckets(&loose) {
            if members.len() >= MIN_GROUP_SIZE {
                let ids: Vec<TabId> = members.iter().map(|tab| tab.id).collect();
                self.create_group(&ids, &domain, report).await;
            } else {
                residual.extend(members.into_iter().cloned());
            }
        }
        residual.extend(loose.iter().filter(|tab| base_domain(&tab.url).is_none()).map(|tab| (*tab).clone()));

        for cluster in cluster_by_similarity(&residual) {
            self.create_group(&cluster.tab_ids, &cluster.name, report).await;
        }
    }

    async fn create_group(&self, tab_ids: &[TabId], title: &str, report: &mut AutoGroupReport) {
        let group_id = match self.host.group_tabs(tab_ids).await {
            Ok(group_id) => group_id,
            Err(e) => {
                report.failures += 1;
                component_warn!(Component::Grouper, "Could not group {} tabs as '{}': {}", tab_ids.len(), title, e);
                return;
            }
        };
        report.groups_created += 1;

        if let Err(e) = self.host.title_group(group_id, title).await {
            report.failures += 1;
            component_warn!(Component::Grouper, "Could not title {} as '{}': {}", group_id, title, e);
        } else {
            component_debug!(Component::Grouper, "Created {} '{}' with {} tabs", group_id, title, tab_ids.len());
        }
    }
}

/// Host groups of a window in first-seen order
fn existing_groups(tabs: &[Tab]) -> Vec<(GroupId, Vec<&Tab>)> {
    let mut groups: Vec<(GroupId, Vec<&Tab>)> = Vec::new();
    for tab in tabs {
        let Some(group_id) = tab.group_id else { continue };
        match groups.iter_mut().find(|(id, _)| *id == group_id) {
            Some((_, members)) => members.push(tab),
            None => groups.push((group_id, vec![tab])),
        }
    }
    groups
}

/// Tabs bucketed by base domain in first-seen order, unresolvable ones skipped
fn domain_buckets<'a>(tabs: &[&'a Tab]) -> Vec<(String, Vec<&'a Tab>)> {
    let mut buckets: Vec<(String, Vec<&'a Tab>)> = Vec::new();
    for tab in tabs {
        let Some(domain) = base_domain(&tab.url) else { continue };
        match buckets.iter_mut().find(|(d, _)| *d == domain) {
            Some((_, members)) => members.push(tab),
            None => buckets.push((domain, vec![tab])),
        }
    }
    buckets
}
