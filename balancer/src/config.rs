//! Balancer configuration
//!
//! ## Configuration Sources
//! Values are resolved from, lowest precedence first:
//! 1. Built-in defaults
//! 2. The persisted settings file (see [`crate::traits::SettingsStore`])
//! 3. `.env` file / system environment variables
//! 4. Command-line flags
//!
//! ## Environment Variables
//! - `TAB_BALANCER_MAX_TABS`: upper bound that triggers relief
//! - `TAB_BALANCER_MIN_TABS`: lower bound that triggers consolidation/refill
//! - `TAB_BALANCER_RESPECT_GROUPING`: keep existing tab groups together (`true`/`false`)
//! - `TAB_BALANCER_AUTO_GROUP`: run domain auto-grouping after balancing (`true`/`false`)

use serde::{Deserialize, Serialize};
use shared::{SharedError, SharedResult};

use crate::error::{BalancerError, BalancerResult};

pub const ENV_MAX_TABS: &str = "TAB_BALANCER_MAX_TABS";
pub const ENV_MIN_TABS: &str = "TAB_BALANCER_MIN_TABS";
pub const ENV_RESPECT_GROUPING: &str = "TAB_BALANCER_RESPECT_GROUPING";
pub const ENV_AUTO_GROUP: &str = "TAB_BALANCER_AUTO_GROUP";

/// Limits and switches for a balancing run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BalancerConfig {
    /// Upper bound triggering relief
    pub max_tabs: usize,
    /// Lower bound triggering consolidation/refill
    pub min_tabs: usize,
    /// Existing tab groups form atomic units
    pub respect_grouping: bool,
    /// Run domain-based auto-grouping after balancing
    pub auto_group: bool,
}

impl Default for BalancerConfig {
    fn default() -> Self {
        Self {
            max_tabs: 30,
            min_tabs: 5,
            respect_grouping: true,
            auto_group: false,
        }
    }
}

impl BalancerConfig {
    /// Create a validated configuration
    pub fn new(
        max_tabs: usize,
        min_tabs: usize,
        respect_grouping: bool,
        auto_group: bool,
    ) -> BalancerResult<Self> {
        let config = Self {
            max_tabs,
            min_tabs,
            respect_grouping,
            auto_group,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check `max_tabs > 0` and `min_tabs < max_tabs`
    pub fn validate(&self) -> BalancerResult<()> {
        if self.max_tabs == 0 {
            return Err(BalancerError::config("maxTabs must be greater than zero"));
        }
        if self.min_tabs >= self.max_tabs {
            return Err(BalancerError::config(format!(
                "minTabs ({}) must be lower than maxTabs ({})",
                self.min_tabs, self.max_tabs
            )));
        }
        Ok(())
    }

    /// Overlay values found in the environment (and `.env`, if present)
    pub fn with_env_overrides(self) -> BalancerResult<Self> {
        // Silently ignored when no .env file exists
        let _ = dotenv::dotenv();
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Overlay values from an arbitrary key lookup
    pub fn with_overrides_from<F>(mut self, lookup: F) -> BalancerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_MAX_TABS) {
            self.max_tabs = parse_count(ENV_MAX_TABS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_MIN_TABS) {
            self.min_tabs = parse_count(ENV_MIN_TABS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_RESPECT_GROUPING) {
            self.respect_grouping = parse_flag(ENV_RESPECT_GROUPING, &raw)?;
        }
        if let Some(raw) = lookup(ENV_AUTO_GROUP) {
            self.auto_group = parse_flag(ENV_AUTO_GROUP, &raw)?;
        }
        Ok(self)
    }
}

fn parse_count(key: &str, raw: &str) -> SharedResult<usize> {
    raw.trim().parse::<usize>().map_err(|_| SharedError::InvalidConfig {
        field: key.to_string(),
        value: raw.to_string(),
    })
}

fn parse_flag(key: &str, raw: &str) -> SharedResult<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(SharedError::InvalidConfig {
            field: key.to_string(),
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_is_valid() {
        assert!(BalancerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_max() {
        let result = BalancerConfig::new(0, 0, true, false);
        assert!(matches!(result, Err(BalancerError::ConfigurationError { .. })));
    }

    #[test]
    fn test_rejects_min_not_below_max() {
        assert!(BalancerConfig::new(10, 10, true, false).is_err());
        assert!(BalancerConfig::new(10, 12, true, false).is_err());
        assert!(BalancerConfig::new(10, 0, true, false).is_ok());
    }

    #[test]
    fn test_overrides_from_lookup() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_MAX_TABS, "50"),
            (ENV_MIN_TABS, " 8 "),
            (ENV_AUTO_GROUP, "yes"),
        ]);

        let config = BalancerConfig::default()
            .with_overrides_from(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.max_tabs, 50);
        assert_eq!(config.min_tabs, 8);
        assert!(config.respect_grouping);
        assert!(config.auto_group);
    }

    #[test]
    fn test_invalid_override_is_reported() {
        let result = BalancerConfig::default()
            .with_overrides_from(|key| (key == ENV_RESPECT_GROUPING).then(|| "maybe".to_string()));

        match result {
            Err(BalancerError::SharedError(shared::SharedError::InvalidConfig { field, value })) => {
                assert_eq!(field, ENV_RESPECT_GROUPING);
                assert_eq!(value, "maybe");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: BalancerConfig = serde_json::from_str(r#"{"maxTabs": 12}"#).unwrap();
        assert_eq!(config.max_tabs, 12);
        assert_eq!(config.min_tabs, 5);
        assert!(config.respect_grouping);
    }
}
