//! Test helpers and builder patterns for balancer tests
//!
//! This module provides convenient helper functions and builder patterns
//! to reduce test boilerplate and improve maintainability.

use std::collections::BTreeSet;
use std::sync::Arc;

use balancer::{BalanceReport, BalancerConfig, InMemoryHost, TabBalancer};
use shared::{TabId, Window, WindowId};

use super::fixtures::TestFixtures;

/// Builder pattern for creating test balancers over an in-memory host
pub struct BalancerBuilder {
    windows: Vec<Window>,
    config: BalancerConfig,
}

impl BalancerBuilder {
    /// Create a new builder with the standard limits and no windows
    pub fn new() -> Self {
        Self {
            windows: Vec::new(),
            config: BalancerConfig {
                max_tabs: TestFixtures::MAX_TABS,
                min_tabs: TestFixtures::MIN_TABS,
                ..BalancerConfig::default()
            },
        }
    }

    pub fn with_window(mut self, window: Window) -> Self {
        self.windows.push(window);
        self
    }

    pub fn with_windows(mut self, windows: Vec<Window>) -> Self {
        self.windows.extend(windows);
        self
    }

    pub fn with_limits(mut self, max_tabs: usize, min_tabs: usize) -> Self {
        self.config.max_tabs = max_tabs;
        self.config.min_tabs = min_tabs;
        self
    }

    pub fn with_respect_grouping(mut self, respect_grouping: bool) -> Self {
        self.config.respect_grouping = respect_grouping;
        self
    }

    pub fn with_auto_group(mut self, auto_group: bool) -> Self {
        self.config.auto_group = auto_group;
        self
    }

    /// Build the balancer together with a handle on its host
    pub fn build(self) -> (TabBalancer<InMemoryHost>, Arc<InMemoryHost>) {
        self.config.validate().expect("Valid test configuration");
        let host = Arc::new(InMemoryHost::new(self.windows));
        (TabBalancer::new(host.clone(), self.config), host)
    }
}

/// Helper functions for common test operations
pub struct TestHelpers;

impl TestHelpers {
    /// Tab count of every window, in host order
    pub async fn tab_counts(host: &InMemoryHost) -> Vec<(WindowId, usize)> {
        host.windows()
            .await
            .iter()
            .map(|window| (window.id, window.tabs.len()))
            .collect()
    }

    pub async fn count_of(host: &InMemoryHost, window_id: WindowId) -> Option<usize> {
        Self::tab_counts(host)
            .await
            .into_iter()
            .find(|(id, _)| *id == window_id)
            .map(|(_, count)| count)
    }

    pub async fn all_tab_ids(host: &InMemoryHost) -> BTreeSet<TabId> {
        host.windows()
            .await
            .iter()
            .flat_map(|window| window.tabs.iter().map(|tab| tab.id))
            .collect()
    }

    pub fn tab_ids_of(windows: &[Window]) -> BTreeSet<TabId> {
        windows
            .iter()
            .flat_map(|window| window.tabs.iter().map(|tab| tab.id))
            .collect()
    }

    /// Run a balance and assert that no tab was lost or duplicated
    pub async fn balance_conserving(balancer: &TabBalancer<InMemoryHost>, host: &InMemoryHost) -> BalanceReport {
        let before = Self::all_tab_ids(host).await;
        let report = balancer.balance_windows().await.expect("Balancing should not fail");
        assert_eq!(Self::all_tab_ids(host).await, before, "Tabs must be conserved");
        report
    }
}
