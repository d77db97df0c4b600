//! Shared types for the tab balancer
//!
//! Contains the host-boundary value types (tabs, windows, identifiers),
//! the shared error type and logging helpers used by every component.

pub mod errors;
pub mod logging;
pub mod types;

pub use errors::*;
pub use logging::Component;
pub use types::*;
