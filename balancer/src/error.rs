//! Balancer-specific error types

use shared::{GroupId, SharedError, TabId, WindowId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BalancerError {
    #[error("Host call failed: {operation}: {message}")]
    HostCallFailed { operation: String, message: String },

    #[error("Tab not found: {tab_id}")]
    TabNotFound { tab_id: TabId },

    #[error("Window not found: {window_id}")]
    WindowNotFound { window_id: WindowId },

    #[error("Group not found: {group_id}")]
    GroupNotFound { group_id: GroupId },

    #[error("Configuration error: {field}")]
    ConfigurationError { field: String },

    #[error("Settings store error: {operation} on {path}")]
    SettingsError { operation: String, path: String },

    #[error("Shared component error")]
    SharedError(#[from] SharedError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl BalancerError {
    pub fn host(operation: impl Into<String>, message: impl Into<String>) -> Self {
        BalancerError::HostCallFailed {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn config(field: impl Into<String>) -> Self {
        BalancerError::ConfigurationError { field: field.into() }
    }
}

pub type BalancerResult<T> = Result<T, BalancerError>;
