//! Simulation state built from a host window listing
//!
//! The planner never mutates host records. It works on a cloned
//! `SimulatedWindowState` per window, updated as moves are tentatively
//! applied so that later decisions see the post-move picture.

use std::collections::HashMap;

use shared::{Tab, TabId, Window, WindowId};

use super::domain::base_domain;

/// Mutable per-window view used exclusively during planning
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedWindowState {
    pub id: WindowId,
    tabs: Vec<Tab>,
    /// Most frequent base domain at snapshot time
    pub primary_domain: Option<String>,
    /// Position among the windows the plan opens; `None` for host windows
    opened: Option<usize>,
}

impl SimulatedWindowState {
    pub fn new(window: &Window) -> Self {
        Self {
            id: window.id,
            primary_domain: primary_domain(&window.tabs),
            tabs: window.tabs.clone(),
            opened: None,
        }
    }

    /// Placeholder for the `slot`-th window a plan opens
    ///
    /// The host has not assigned an id yet, so the placeholder carries a
    /// negative one that can never collide with a host window.
    pub fn opened(slot: usize) -> Self {
        Self {
            id: WindowId(-1 - slot as i64),
            tabs: Vec::new(),
            primary_domain: None,
            opened: Some(slot),
        }
    }

    pub fn opened_slot(&self) -> Option<usize> {
        self.opened
    }

    /// Number of tabs currently placed in this window
    ///
    /// Always equal to `tabs().len()`; the count is derived, never stored.
    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Whether any tab in the window resolves to `domain`
    pub fn contains_domain(&self, domain: &str) -> bool {
        self.domain_count(domain) > 0
    }

    /// Number of tabs in the window resolving to `domain`
    pub fn domain_count(&self, domain: &str) -> usize {
        self.tabs
            .iter()
            .filter(|tab| base_domain(&tab.url).as_deref() == Some(domain))
            .count()
    }

    /// Remove the given tabs, returning them in window order
    pub fn take_tabs(&mut self, tab_ids: &[TabId]) -> Vec<Tab> {
        let (taken, kept): (Vec<Tab>, Vec<Tab>) = std::mem::take(&mut self.tabs)
            .into_iter()
            .partition(|tab| tab_ids.contains(&tab.id));
        self.tabs = kept;
        taken
    }

    /// Append tabs, rewriting their window id to this window
    pub fn add_tabs(&mut self, tabs: Vec<Tab>) {
        let id = self.id;
        self.tabs.extend(tabs.into_iter().map(|mut tab| {
            tab.window_id = id;
            tab
        }));
    }
}

/// Convert a host listing into simulation state, normal windows only
pub fn build_state(windows: &[Window]) -> Vec<SimulatedWindowState> {
    windows
        .iter()
        .filter(|window| window.is_normal())
        .map(SimulatedWindowState::new)
        .collect()
}

/// Base domain with the highest tab count
///
/// Ties are broken lexicographically (smallest domain wins) so the result
/// does not depend on the order the host happens to list tabs in.
pub fn primary_domain(tabs: &[Tab]) -> Option<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for tab in tabs {
        if let Some(domain) = base_domain(&tab.url) {
            *counts.entry(domain).or_insert(0) += 1;
        }
    }

    counts
        .into_iter()
        .max_by(|(a_domain, a_count), (b_domain, b_count)| {
            a_count.cmp(b_count).then_with(|| b_domain.cmp(a_domain))
        })
        .map(|(domain, _)| domain)
}
