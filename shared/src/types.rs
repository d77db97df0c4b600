//! Host-boundary value types
//!
//! Tabs and windows as reported by the browser. The balancing engine only
//! reads these records and issues move/group requests; it never relies on
//! fields beyond the ones declared here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Browser-assigned tab identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub i64);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tab:{}", self.0)
    }
}

/// Browser-assigned window identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub i64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window:{}", self.0)
    }
}

/// Browser-assigned tab group identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub i64);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group:{}", self.0)
    }
}

/// Group id the host reports for a tab outside any group
pub const TAB_GROUP_ID_NONE: i64 = -1;

/// Serde adapter for `Tab::group_id`
///
/// Hosts mark ungrouped tabs with a negative sentinel rather than leaving
/// the field out. Any negative id reads as `None`, and `None` is written
/// back as the sentinel.
mod group_membership {
    use super::*;

    pub fn serialize<S: Serializer>(group_id: &Option<GroupId>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(group_id.map_or(TAB_GROUP_ID_NONE, |group| group.0))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<GroupId>, D::Error> {
        let raw = Option::<i64>::deserialize(deserializer)?;
        Ok(raw.filter(|id| *id >= 0).map(GroupId))
    }
}

/// Kind of browser window. Only `Normal` windows take part in balancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowType {
    #[default]
    Normal,
    Popup,
    Panel,
    App,
    Devtools,
}

/// A single browser tab
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub id: TabId,
    pub window_id: WindowId,
    pub url: String,
    #[serde(default)]
    pub title: String,
    /// `None` when the tab is not part of any group
    #[serde(default, with = "group_membership")]
    pub group_id: Option<GroupId>,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub audible: bool,
    #[serde(default)]
    pub last_accessed: Option<DateTime<Utc>>,
}

impl Tab {
    /// Create a loose (ungrouped, unpinned) tab
    pub fn new(id: i64, window_id: i64, url: impl Into<String>) -> Self {
        Self {
            id: TabId(id),
            window_id: WindowId(window_id),
            url: url.into(),
            title: String::new(),
            group_id: None,
            pinned: false,
            audible: false,
            last_accessed: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_group(mut self, group_id: i64) -> Self {
        self.group_id = Some(GroupId(group_id));
        self
    }

    pub fn pinned(mut self) -> Self {
        self.pinned = true;
        self
    }
}

/// A browser window together with its tabs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub id: WindowId,
    #[serde(rename = "type", default)]
    pub window_type: WindowType,
    #[serde(default)]
    pub tabs: Vec<Tab>,
}

impl Window {
    pub fn new(id: i64, tabs: Vec<Tab>) -> Self {
        Self {
            id: WindowId(id),
            window_type: WindowType::Normal,
            tabs,
        }
    }

    pub fn is_normal(&self) -> bool {
        self.window_type == WindowType::Normal
    }
}
