//! Service implementations
//!
//! Everything here talks to a collaborator (the tab host or the file
//! system). The pure planning logic lives in [`crate::core`].

pub mod auto_grouper;
pub mod executor;
pub mod memory_host;
pub mod settings;

#[cfg(test)]
mod tests;

pub use auto_grouper::{AutoGroupReport, AutoGrouper};
pub use executor::{DestinationBatch, ExecutionReport, MoveExecutor, coalesce, schedule};
pub use memory_host::InMemoryHost;
pub use settings::JsonFileSettings;
