//! Move execution against the host
//!
//! Turns a plan into host calls. Operations are coalesced by destination so
//! each window receives a single batched move, and every batch succeeds or
//! fails on its own: a stale tab id in one batch never stops the others.
//!
//! The host closes a window as soon as its last tab leaves. Batches are
//! therefore scheduled so that a window about to lose all of its original
//! tabs receives its incoming batch first.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use serde::Serialize;
use shared::{Component, GroupId, TabId, WindowId, component_debug, component_info, component_warn};

use crate::core::{MoveOperation, MoveTarget, Plan};
use crate::error::{BalancerError, BalancerResult};
use crate::traits::TabHost;

/// Tabs bound for one destination, in planned order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationBatch {
    pub target: MoveTarget,
    pub tab_ids: Vec<TabId>,
    /// Original groups to restore once the tabs have landed
    pub groups: Vec<(GroupId, Vec<TabId>)>,
    /// Host windows the batch's tabs are taken from
    pub sources: BTreeSet<WindowId>,
}

/// What happened while executing a plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionReport {
    pub batches_applied: usize,
    pub batches_failed: usize,
    pub tabs_moved: usize,
    pub windows_created: Vec<WindowId>,
    pub groups_restored: usize,
    pub regroup_failures: usize,
}

impl ExecutionReport {
    pub fn is_clean(&self) -> bool {
        self.batches_failed == 0 && self.regroup_failures == 0
    }
}

/// Group operations by destination
///
/// A tab planned twice (moved by relief, then again by consolidation) only
/// keeps its last destination, and takes its place in the batch from that
/// last operation. Batches are listed in the order their first tab was
/// emitted.
pub fn coalesce(moves: &[MoveOperation]) -> Vec<DestinationBatch> {
    let mut origin: HashMap<TabId, WindowId> = HashMap::new();
    let mut last_move: HashMap<TabId, usize> = HashMap::new();
    for (index, op) in moves.iter().enumerate() {
        for id in &op.tab_ids {
            origin.entry(*id).or_insert(op.source);
            last_move.insert(*id, index);
        }
    }

    let mut batches: Vec<DestinationBatch> = Vec::new();

    for (index, op) in moves.iter().enumerate() {
        let ids: Vec<TabId> = op
            .tab_ids
            .iter()
            .copied()
            .filter(|id| last_move.get(id) == Some(&index))
            .collect();
        if ids.is_empty() {
            continue;
        }

        let position = match batches.iter().position(|batch| batch.target == op.target) {
            Some(position) => position,
            None => {
                batches.push(DestinationBatch {
                    target: op.target,
                    tab_ids: Vec::new(),
                    groups: Vec::new(),
                    sources: BTreeSet::new(),
                });
                batches.len() - 1
            }
        };
        let batch = &mut batches[position];

        if let Some(group_id) = op.group_id {
            match batch.groups.iter_mut().find(|(id, _)| *id == group_id) {
                Some((_, members)) => members.extend(ids.iter().copied()),
                None => batch.groups.push((group_id, ids.clone())),
            }
        }
        batch.sources.extend(ids.iter().filter_map(|id| origin.get(id)));
        batch.tab_ids.extend(ids);
    }

    batches
}

/// Coalesce a plan and order its batches for execution
///
/// A window keeping none of its original tabs is only safe to drain after
/// its incoming batch has landed, so that batch goes first. Windows the
/// plan opens are created in slot order. Should two windows each need the
/// other to go first, plan order decides.
pub fn schedule(plan: &Plan) -> Vec<DestinationBatch> {
    let moved: HashSet<TabId> = plan
        .moves
        .iter()
        .flat_map(|op| op.tab_ids.iter().copied())
        .collect();
    let anchored: HashSet<WindowId> = plan
        .state
        .iter()
        .filter(|window| window.tabs().iter().any(|tab| !moved.contains(&tab.id)))
        .map(|window| window.id)
        .collect();

    let must_precede = |first: &DestinationBatch, then: &DestinationBatch| match (first.target, then.target) {
        (MoveTarget::Existing(window), _) => !anchored.contains(&window) && then.sources.contains(&window),
        (MoveTarget::New(a), MoveTarget::New(b)) => a < b,
        (MoveTarget::New(_), MoveTarget::Existing(_)) => false,
    };

    let mut pending: Vec<Option<DestinationBatch>> = coalesce(&plan.moves).into_iter().map(Some).collect();
    let mut ordered = Vec::with_capacity(pending.len());

    while ordered.len() < pending.len() {
        let ready = |index: usize| {
            let Some(batch) = &pending[index] else {
                return false;
            };
            pending
                .iter()
                .enumerate()
                .filter(|(other, _)| *other != index)
                .filter_map(|(_, other)| other.as_ref())
                .all(|other| !must_precede(other, batch))
        };
        let next = (0..pending.len())
            .find(|index| ready(*index))
            .or_else(|| pending.iter().position(Option::is_some));
        let Some(next) = next else {
            break;
        };
        if let Some(batch) = pending[next].take() {
            ordered.push(batch);
        }
    }

    ordered
}

/// Applies planned moves through a [`TabHost`]
pub struct MoveExecutor<H: TabHost> {
    host: Arc<H>,
    respect_grouping: bool,
}

impl<H: TabHost> MoveExecutor<H> {
    pub fn new(host: Arc<H>, respect_grouping: bool) -> Self {
        Self { host, respect_grouping }
    }

    /// Execute every operation of a plan, one host batch per destination
    pub async fn execute(&self, plan: &Plan) -> ExecutionReport {
        let mut report = ExecutionReport::default();
        let batches = schedule(plan);

        if !batches.is_empty() {
            component_info!(
                Component::Executor,
                "Executing {} operations as {} destination batches",
                plan.moves.len(),
                batches.len()
            );
        }

        for batch in &batches {
            match self.apply_batch(batch, &mut report).await {
                Ok(window_id) => {
                    report.batches_applied += 1;
                    report.tabs_moved += batch.tab_ids.len();
                    component_debug!(
                        Component::Executor,
                        "Moved {} tabs into {}",
                        batch.tab_ids.len(),
                        window_id
                    );
                    if self.respect_grouping {
                        self.restore_groups(batch, &mut report).await;
                    }
                }
                Err(e) => {
                    report.batches_failed += 1;
                    component_warn!(
                        Component::Executor,
                        "Batch of {} tabs for {} failed: {}",
                        batch.tab_ids.len(),
                        batch.target,
                        e
                    );
                }
            }
        }

        report
    }

    /// Issue the host calls for one batch, returning the destination window
    async fn apply_batch(&self, batch: &DestinationBatch, report: &mut ExecutionReport) -> BalancerResult<WindowId> {
        match batch.target {
            MoveTarget::Existing(window_id) => {
                self.host.move_tabs(&batch.tab_ids, window_id, None).await?;
                Ok(window_id)
            }
            MoveTarget::New(_) => {
                let Some((seed, rest)) = batch.tab_ids.split_first() else {
                    return Err(BalancerError::host("create_window", "empty batch"));
                };
                let window_id = self.host.create_window(*seed).await?;
                report.windows_created.push(window_id);
                if !rest.is_empty() {
                    self.host.move_tabs(rest, window_id, None).await?;
                }
                Ok(window_id)
            }
        }
    }

    async fn restore_groups(&self, batch: &DestinationBatch, report: &mut ExecutionReport) {
        for (original, tab_ids) in &batch.groups {
            match self.host.group_tabs(tab_ids).await {
                Ok(group_id) => {
                    report.groups_restored += 1;
                    component_debug!(
                        Component::Executor,
                        "Regrouped {} tabs of {} as {}",
                        tab_ids.len(),
                        original,
                        group_id
                    );
                }
                Err(e) => {
                    report.regroup_failures += 1;
                    component_warn!(
                        Component::Executor,
                        "Could not regroup {} tabs of {}: {}",
                        tab_ids.len(),
                        original,
                        e
                    );
                }
            }
        }
    }
}
