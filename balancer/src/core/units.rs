//! Moveable-unit extraction
//!
//! A unit is the smallest set of tabs the planner is allowed to relocate.
//! Units partition a window: every tab belongs to exactly one unit.

use shared::{GroupId, Tab, TabId};

use super::domain::base_domain;
use super::snapshot::SimulatedWindowState;

/// Indivisible set of tabs that move together
#[derive(Debug, Clone, PartialEq)]
pub struct MoveableUnit {
    pub tab_ids: Vec<TabId>,
    pub tabs: Vec<Tab>,
    /// Shared base domain of the unit's tabs, if there is one
    pub domain: Option<String>,
    /// Host group the unit was built from, `None` for loose tabs
    pub group_id: Option<GroupId>,
}

impl MoveableUnit {
    fn from_tabs(tabs: Vec<Tab>, domain: Option<String>, group_id: Option<GroupId>) -> Self {
        Self {
            tab_ids: tabs.iter().map(|tab| tab.id).collect(),
            tabs,
            domain,
            group_id,
        }
    }

    pub fn size(&self) -> usize {
        self.tab_ids.len()
    }
}

/// Partition a window's tabs into moveable units
///
/// Order of the result: host groups (when `respect_grouping`), then one
/// unit per base domain, then singletons for tabs without a resolvable
/// domain. Within each tier units appear in first-seen order.
pub fn get_units(window: &SimulatedWindowState, respect_grouping: bool) -> Vec<MoveableUnit> {
    let mut units = Vec::new();
    let mut remaining: Vec<&Tab> = Vec::new();

    if respect_grouping {
        let mut groups: Vec<(GroupId, Vec<Tab>)> = Vec::new();
        for tab in window.tabs() {
            match tab.group_id {
                Some(group_id) => match groups.iter_mut().find(|(id, _)| *id == group_id) {
                    Some((_, members)) => members.push(tab.clone()),
                    None => groups.push((group_id, vec![tab.clone()])),
                },
                None => remaining.push(tab),
            }
        }

        for (group_id, members) in groups {
            let domain = common_domain(&members);
            units.push(MoveableUnit::from_tabs(members, domain, Some(group_id)));
        }
    } else {
        remaining.extend(window.tabs());
    }

    let mut buckets: Vec<(String, Vec<Tab>)> = Vec::new();
    let mut singletons = Vec::new();
    for tab in remaining {
        match base_domain(&tab.url) {
            Some(domain) => match buckets.iter_mut().find(|(d, _)| *d == domain) {
                Some((_, members)) => members.push(tab.clone()),
                None => buckets.push((domain, vec![tab.clone()])),
            },
            None => singletons.push(MoveableUnit::from_tabs(vec![tab.clone()], None, None)),
        }
    }

    units.extend(
        buckets
            .into_iter()
            .map(|(domain, members)| MoveableUnit::from_tabs(members, Some(domain), None)),
    );
    units.extend(singletons);
    units
}

/// Base domain shared by every tab, `None` when they disagree
fn common_domain(tabs: &[Tab]) -> Option<String> {
    let mut domains = tabs.iter().map(|tab| base_domain(&tab.url));
    let first = domains.next()??;
    domains
        .all(|domain| domain.as_deref() == Some(first.as_str()))
        .then_some(first)
}
