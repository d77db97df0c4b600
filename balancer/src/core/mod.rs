//! Core business logic modules
//!
//! This module contains pure planning logic with no I/O dependencies.
//! All functions are deterministic and easily testable.

pub mod domain;
pub mod planner;
pub mod similarity;
pub mod snapshot;
pub mod units;

pub use domain::base_domain;
pub use planner::{DoomedWindows, MoveOperation, MoveTarget, Plan, PlacementPlanner, find_best_target};
pub use similarity::{SimilarityCluster, cluster_by_similarity};
pub use snapshot::{SimulatedWindowState, build_state};
pub use units::{MoveableUnit, get_units};
