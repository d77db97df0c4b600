//! Service-specific tests
//!
//! Host-facing services are tested against `MockTabHost` to pin the exact
//! calls they issue, and against `InMemoryHost` where the resulting window
//! layout is what matters.

#[cfg(test)]
mod auto_grouper;

// Common test utilities for services
#[cfg(test)]
pub mod common {
    use std::sync::{Arc, Mutex};

    use shared::{GroupId, TabId, WindowId};

    use crate::core::{DoomedWindows, MoveOperation, MoveTarget, Plan, SimulatedWindowState};

    /// Calls recorded by a mock host, in call order
    pub type CallLog<T> = Arc<Mutex<Vec<T>>>;

    pub fn call_log<T>() -> CallLog<T> {
        Arc::new(Mutex::new(Vec::new()))
    }

    pub fn ids(raw: &[i64]) -> Vec<TabId> {
        raw.iter().map(|id| TabId(*id)).collect()
    }

    /// Move of loose tabs into an existing window
    pub fn move_to(tab_ids: &[i64], source: i64, target: i64) -> MoveOperation {
        MoveOperation {
            tab_ids: ids(tab_ids),
            source: WindowId(source),
            target: MoveTarget::Existing(WindowId(target)),
            group_id: None,
        }
    }

    /// Move of loose tabs into the `slot`-th window opened for the plan
    pub fn move_to_new(tab_ids: &[i64], source: i64, slot: usize) -> MoveOperation {
        MoveOperation {
            tab_ids: ids(tab_ids),
            source: WindowId(source),
            target: MoveTarget::New(slot),
            group_id: None,
        }
    }

    /// Plan made of `moves` only, with no simulated windows
    pub fn plan_of(moves: Vec<MoveOperation>) -> Plan {
        plan_with_state(moves, Vec::new())
    }

    pub fn plan_with_state(moves: Vec<MoveOperation>, state: Vec<SimulatedWindowState>) -> Plan {
        Plan {
            moves,
            doomed: DoomedWindows::new(),
            state,
        }
    }

    pub fn grouped(mut op: MoveOperation, group_id: i64) -> MoveOperation {
        op.group_id = Some(GroupId(group_id));
        op
    }
}
