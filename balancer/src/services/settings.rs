//! JSON file settings store

use std::path::{Path, PathBuf};

use shared::{Component, component_debug};
use tokio::fs;

use crate::config::BalancerConfig;
use crate::error::{BalancerError, BalancerResult};
use crate::traits::SettingsStore;

/// Persists the balancer configuration as a single JSON document
pub struct JsonFileSettings {
    path: PathBuf,
}

impl JsonFileSettings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn error(&self, operation: &str) -> BalancerError {
        BalancerError::SettingsError {
            operation: operation.to_string(),
            path: self.path.display().to_string(),
        }
    }
}

#[async_trait::async_trait]
impl SettingsStore for JsonFileSettings {
    async fn load(&self) -> BalancerResult<Option<BalancerConfig>> {
        if fs::metadata(&self.path).await.is_err() {
            component_debug!(Component::Balancer, "No settings at {}", self.path.display());
            return Ok(None);
        }

        let json = fs::read_to_string(&self.path).await.map_err(|_| self.error("read"))?;
        let config: BalancerConfig = serde_json::from_str(&json).map_err(|_| self.error("parse"))?;
        config.validate()?;
        Ok(Some(config))
    }

    async fn save(&self, config: &BalancerConfig) -> BalancerResult<()> {
        config.validate()?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|_| self.error("create directory"))?;
        }

        let json = serde_json::to_string_pretty(config)?;
        fs::write(&self.path, json).await.map_err(|_| self.error("write"))?;
        component_debug!(Component::Balancer, "Settings saved to {}", self.path.display());
        Ok(())
    }
}
