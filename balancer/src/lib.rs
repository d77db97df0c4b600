//! Tab/window balancing library
//!
//! Keeps browser windows within configured size limits. A run snapshots the
//! host's windows, plans unit moves against a simulation of them and then
//! executes the plan through batched host calls, optionally followed by
//! automatic grouping by domain and title similarity.
//!
//! The planning core is pure; every host interaction goes through
//! [`TabHost`] so it can be mocked or replaced by [`InMemoryHost`].

pub mod balancer;
pub mod config;
pub mod core;
pub mod error;
pub mod services;
pub mod traits;

// Re-export commonly used types
pub use balancer::{BalanceReport, TabBalancer};
pub use config::BalancerConfig;
pub use core::{MoveOperation, MoveTarget, Plan, PlacementPlanner};
pub use error::{BalancerError, BalancerResult};
pub use services::{AutoGroupReport, ExecutionReport, InMemoryHost, JsonFileSettings};
pub use traits::{SettingsStore, TabHost};
