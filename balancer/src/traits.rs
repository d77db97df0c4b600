//! Trait definitions with mockall annotations for testing
//!
//! The balancer never talks to the browser directly. Everything it needs
//! from the outside world goes through these traits, which keeps the
//! planning core pure and lets tests inject mocks.

use shared::{GroupId, TabId, Window, WindowId};

use crate::config::BalancerConfig;
use crate::error::BalancerResult;

/// Browser tab/window API abstraction
///
/// Mirrors the subset of the extension host API the balancer relies on.
/// Calls are not transactional: each one may fail independently, e.g. when
/// a tab was closed between the snapshot and the move.
#[mockall::automock]
#[async_trait::async_trait]
pub trait TabHost: Send + Sync {
    /// List all windows populated with their tabs
    async fn list_windows(&self) -> BalancerResult<Vec<Window>>;

    /// Move tabs into a window
    ///
    /// # Parameters
    /// - `tab_ids`: Tabs to move, kept in this order
    /// - `window_id`: Destination window
    /// - `index`: Insert position, `None` appends at the end
    async fn move_tabs(
        &self,
        tab_ids: &[TabId],
        window_id: WindowId,
        index: Option<usize>,
    ) -> BalancerResult<()>;

    /// Open a new window seeded with an existing tab
    ///
    /// # Returns
    /// Identifier of the created window
    async fn create_window(&self, seed_tab: TabId) -> BalancerResult<WindowId>;

    /// Group tabs together in their current window
    ///
    /// # Returns
    /// Identifier of the new group
    async fn group_tabs(&self, tab_ids: &[TabId]) -> BalancerResult<GroupId>;

    /// Remove tabs from whatever group they belong to
    async fn ungroup_tabs(&self, tab_ids: &[TabId]) -> BalancerResult<()>;

    /// Set the visible title of a group
    async fn title_group(&self, group_id: GroupId, title: &str) -> BalancerResult<()>;
}

/// Persisted key-value settings abstraction
///
/// Holds the user's balancer configuration between runs.
#[mockall::automock]
#[async_trait::async_trait]
pub trait SettingsStore: Send + Sync {
    /// Load the stored configuration, `None` when nothing was saved yet
    async fn load(&self) -> BalancerResult<Option<BalancerConfig>>;

    /// Persist the configuration
    async fn save(&self, config: &BalancerConfig) -> BalancerResult<()>;
}
