//! In-memory tab host
//!
//! A [`TabHost`] backed by a window list held in memory. Used by the CLI to
//! balance a JSON snapshot offline and by the integration tests. It follows
//! the browser's observable behaviour closely enough for planning to be
//! re-run against its results:
//! - a moved tab leaves its group
//! - a window left without tabs is closed
//! - window and group ids are never reused
//! - unknown tab, window and group ids are errors

use std::collections::HashMap;
use std::path::Path;

use shared::{GroupId, Tab, TabId, Window, WindowId, WindowType};
use tokio::fs;
use tokio::sync::Mutex;

use crate::error::{BalancerError, BalancerResult};
use crate::traits::TabHost;

struct HostState {
    windows: Vec<Window>,
    group_titles: HashMap<GroupId, String>,
    next_window_id: i64,
    next_group_id: i64,
}

impl HostState {
    fn locate(&self, tab_id: TabId) -> BalancerResult<(usize, usize)> {
        self.windows
            .iter()
            .enumerate()
            .find_map(|(w, window)| window.tabs.iter().position(|tab| tab.id == tab_id).map(|t| (w, t)))
            .ok_or(BalancerError::TabNotFound { tab_id })
    }

    fn ensure_tabs(&self, tab_ids: &[TabId]) -> BalancerResult<()> {
        tab_ids.iter().try_for_each(|id| self.locate(*id).map(|_| ()))
    }

    fn detach(&mut self, tab_id: TabId) -> BalancerResult<Tab> {
        let (w, t) = self.locate(tab_id)?;
        let mut tab = self.windows[w].tabs.remove(t);
        tab.group_id = None;
        Ok(tab)
    }

    fn close_empty_windows(&mut self) {
        self.windows.retain(|window| !window.tabs.is_empty());
    }
}

/// Window list guarded by an async mutex
pub struct InMemoryHost {
    state: Mutex<HostState>,
}

impl InMemoryHost {
    pub fn new(windows: Vec<Window>) -> Self {
        let next_window_id = windows.iter().map(|w| w.id.0).max().unwrap_or(0) + 1;
        let next_group_id = windows
            .iter()
            .flat_map(|w| w.tabs.iter())
            .filter_map(|tab| tab.group_id.map(|g| g.0))
            .max()
            .unwrap_or(0)
            + 1;

        Self {
            state: Mutex::new(HostState {
                windows,
                group_titles: HashMap::new(),
                next_window_id,
                next_group_id,
            }),
        }
    }

    /// Build a host from a JSON array of windows
    pub fn from_json(json: &str) -> BalancerResult<Self> {
        let windows: Vec<Window> = serde_json::from_str(json)?;
        Ok(Self::new(windows))
    }

    /// Load a JSON window snapshot from disk
    pub async fn load(path: impl AsRef<Path>) -> BalancerResult<Self> {
        let json = fs::read_to_string(path.as_ref()).await?;
        Self::from_json(&json)
    }

    /// Current windows
    pub async fn windows(&self) -> Vec<Window> {
        self.state.lock().await.windows.clone()
    }

    /// Title assigned to a group, if any
    pub async fn group_title(&self, group_id: GroupId) -> Option<String> {
        self.state.lock().await.group_titles.get(&group_id).cloned()
    }

    /// Serialize the current windows as pretty JSON
    pub async fn to_json(&self) -> BalancerResult<String> {
        Ok(serde_json::to_string_pretty(&self.windows().await)?)
    }
}

#[async_trait::async_trait]
impl TabHost for InMemoryHost {
    async fn list_windows(&self) -> BalancerResult<Vec<Window>> {
        Ok(self.windows().await)
    }

    async fn move_tabs(&self, tab_ids: &[TabId], window_id: WindowId, index: Option<usize>) -> BalancerResult<()> {
        let mut state = self.state.lock().await;
        if !state.windows.iter().any(|w| w.id == window_id) {
            return Err(BalancerError::WindowNotFound { window_id });
        }
        state.ensure_tabs(tab_ids)?;

        let mut moved = Vec::with_capacity(tab_ids.len());
        for id in tab_ids {
            let mut tab = state.detach(*id)?;
            tab.window_id = window_id;
            moved.push(tab);
        }

        if let Some(target) = state.windows.iter_mut().find(|w| w.id == window_id) {
            let at = index.unwrap_or(target.tabs.len()).min(target.tabs.len());
            target.tabs.splice(at..at, moved);
        }
        state.close_empty_windows();
        Ok(())
    }

    async fn create_window(&self, seed_tab: TabId) -> BalancerResult<WindowId> {
        let mut state = self.state.lock().await;
        let mut tab = state.detach(seed_tab)?;

        let window_id = WindowId(state.next_window_id);
        state.next_window_id += 1;
        tab.window_id = window_id;

        state.windows.push(Window {
            id: window_id,
            window_type: WindowType::Normal,
            tabs: vec![tab],
        });
        state.close_empty_windows();
        Ok(window_id)
    }

    async fn group_tabs(&self, tab_ids: &[TabId]) -> BalancerResult<GroupId> {
        let mut state = self.state.lock().await;
        if tab_ids.is_empty() {
            return Err(BalancerError::host("group_tabs", "no tabs given"));
        }

        let mut window = None;
        for id in tab_ids {
            let (w, _) = state.locate(*id)?;
            if window.is_some_and(|first| first != w) {
                return Err(BalancerError::host("group_tabs", "tabs span several windows"));
            }
            window = Some(w);
        }

        let group_id = GroupId(state.next_group_id);
        state.next_group_id += 1;
        for id in tab_ids {
            let (w, t) = state.locate(*id)?;
            state.windows[w].tabs[t].group_id = Some(group_id);
        }
        Ok(group_id)
    }

    async fn ungroup_tabs(&self, tab_ids: &[TabId]) -> BalancerResult<()> {
        let mut state = self.state.lock().await;
        state.ensure_tabs(tab_ids)?;
        for id in tab_ids {
            let (w, t) = state.locate(*id)?;
            state.windows[w].tabs[t].group_id = None;
        }
        Ok(())
    }

    async fn title_group(&self, group_id: GroupId, title: &str) -> BalancerResult<()> {
        let mut state = self.state.lock().await;
        let exists = state
            .windows
            .iter()
            .flat_map(|w| w.tabs.iter())
            .any(|tab| tab.group_id == Some(group_id));
        if !exists {
            return Err(BalancerError::GroupNotFound { group_id });
        }
        state.group_titles.insert(group_id, title.to_string());
        Ok(())
    }
}
