//! Placement planning for tab/window balancing
//!
//! The planner decides which units move where, entirely against a cloned
//! simulation of the host's windows. It runs two passes that share one
//! doomed-window set:
//!
//! 1. **Relief**: windows above `max_tabs` shed their smallest non-dominant
//!    units until they fit again. Units on the window's primary domain never
//!    move, so a window made of one big topic may stay above the cap.
//! 2. **Consolidation / refill**: windows below `min_tabs` are emptied into
//!    existing windows when every unit has somewhere to go. Otherwise they
//!    are topped up from donors that already share a domain with them. The
//!    pass repeats until it plans nothing more.
//!
//! Windows opened by relief are simulated like any other window, so a plan
//! executed as planned leaves nothing for the next run to do.
//!
//! The planner never fails: a unit without a destination simply stays put.

use std::collections::{BTreeSet, VecDeque};
use std::fmt;

use shared::{Component, GroupId, TabId, Window, WindowId, component_debug};

use super::snapshot::{SimulatedWindowState, build_state};
use super::units::{MoveableUnit, get_units};
use crate::config::BalancerConfig;

/// Windows committed to being emptied during a planning pass
pub type DoomedWindows = BTreeSet<WindowId>;

/// Where a unit is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveTarget {
    Existing(WindowId),
    /// The n-th window the plan opens, created at execution time
    New(usize),
}

impl fmt::Display for MoveTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveTarget::Existing(id) => write!(f, "{id}"),
            MoveTarget::New(slot) => write!(f, "window:new#{slot}"),
        }
    }
}

/// A single planned relocation of one unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOperation {
    pub tab_ids: Vec<TabId>,
    /// Negative when the unit leaves a window the plan itself opened
    pub source: WindowId,
    pub target: MoveTarget,
    /// Host group the unit came from; restored after the move
    pub group_id: Option<GroupId>,
}

/// Outcome of a planning pass
#[derive(Debug, Clone)]
pub struct Plan {
    pub moves: Vec<MoveOperation>,
    /// Host windows emptied by consolidation
    pub doomed: DoomedWindows,
    /// Simulated windows after every planned move, opened windows last
    pub state: Vec<SimulatedWindowState>,
}

impl Plan {
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn tabs_moved(&self) -> usize {
        self.moves.iter().map(|op| op.tab_ids.len()).sum()
    }
}

/// Computes move plans from host snapshots
#[derive(Debug, Clone)]
pub struct PlacementPlanner {
    config: BalancerConfig,
}

impl PlacementPlanner {
    pub fn new(config: BalancerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BalancerConfig {
        &self.config
    }

    /// Plan moves for a host listing
    pub fn plan(&self, windows: &[Window]) -> Plan {
        self.plan_state(build_state(windows))
    }

    /// Plan moves starting from an already built simulation
    pub fn plan_state(&self, mut state: Vec<SimulatedWindowState>) -> Plan {
        let mut doomed = DoomedWindows::new();
        let mut moves = Vec::new();

        self.relieve_overloaded(&mut state, &mut doomed, &mut moves);
        self.consolidate_underloaded(&mut state, &mut doomed, &mut moves);

        // placeholders consolidated away are simply never opened
        doomed.retain(|id| {
            state
                .iter()
                .any(|window| window.id == *id && window.opened_slot().is_none())
        });

        component_debug!(
            Component::Planner,
            moves = moves.len(),
            doomed = doomed.len(),
            "Planning pass complete"
        );

        Plan { moves, doomed, state }
    }

    /// Pass 1: shed non-dominant units from windows above `max_tabs`
    pub fn relieve_overloaded(
        &self,
        state: &mut Vec<SimulatedWindowState>,
        doomed: &mut DoomedWindows,
        moves: &mut Vec<MoveOperation>,
    ) {
        let max_tabs = self.config.max_tabs;

        for idx in 0..state.len() {
            let source = state[idx].id;
            if state[idx].tab_count() <= max_tabs || doomed.contains(&source) {
                continue;
            }

            let primary = state[idx].primary_domain.clone();
            let mut candidates: Vec<MoveableUnit> = get_units(&state[idx], self.config.respect_grouping)
                .into_iter()
                // nothing is dominant in a window without a primary domain
                .filter(|unit| primary.is_none() || unit.domain != primary)
                .collect();
            candidates.sort_by_key(MoveableUnit::size);
            let mut candidates = VecDeque::from(candidates);

            component_debug!(
                Component::Planner,
                "{} holds {} tabs (max {}), {} relief candidates",
                source,
                state[idx].tab_count(),
                max_tabs,
                candidates.len()
            );

            while state[idx].tab_count() > max_tabs {
                let Some(unit) = candidates.pop_front() else {
                    component_debug!(
                        Component::Planner,
                        "{} stays at {} tabs: only its primary domain is left",
                        source,
                        state[idx].tab_count()
                    );
                    break;
                };

                if let Some(target) = find_best_target(state, &unit, source, doomed, max_tabs, true) {
                    moves.push(apply_move(state, source, &unit, target));
                }
            }
        }
    }

    /// Pass 2: empty or top up windows below `min_tabs`
    ///
    /// Refills shrink donors, which can make room for a window the pass
    /// already gave up on, so the pass runs again until it plans nothing.
    /// Every productive round dooms a window or narrows a shortfall, which
    /// bounds the number of rounds.
    pub fn consolidate_underloaded(
        &self,
        state: &mut Vec<SimulatedWindowState>,
        doomed: &mut DoomedWindows,
        moves: &mut Vec<MoveOperation>,
    ) {
        loop {
            let planned = moves.len();

            for idx in 0..state.len() {
                let window = &state[idx];
                if doomed.contains(&window.id) || window.is_empty() || window.tab_count() >= self.config.min_tabs {
                    continue;
                }

                if !self.try_consolidate(state, idx, doomed, moves) {
                    self.refill(state, idx, doomed, moves);
                }
            }

            if moves.len() == planned {
                break;
            }
        }
    }

    /// Move every unit of `state[idx]` into existing windows, all or nothing
    fn try_consolidate(
        &self,
        state: &mut Vec<SimulatedWindowState>,
        idx: usize,
        doomed: &mut DoomedWindows,
        moves: &mut Vec<MoveOperation>,
    ) -> bool {
        let source = state[idx].id;
        let units = get_units(&state[idx], self.config.respect_grouping);

        let mut tentative = state.clone();
        let mut staged = Vec::with_capacity(units.len());
        for unit in &units {
            match find_best_target(&tentative, unit, source, doomed, self.config.max_tabs, false) {
                Some(target) => staged.push(apply_move(&mut tentative, source, unit, target)),
                None => {
                    component_debug!(
                        Component::Planner,
                        "Cannot consolidate {}: unit of {} tabs has no destination",
                        source,
                        unit.size()
                    );
                    return false;
                }
            }
        }

        *state = tentative;
        moves.extend(staged);
        doomed.insert(source);
        component_debug!(Component::Planner, "{} consolidated and doomed", source);
        true
    }

    /// Pull same-domain units from donors without taking them below `min_tabs`
    fn refill(
        &self,
        state: &mut Vec<SimulatedWindowState>,
        idx: usize,
        doomed: &DoomedWindows,
        moves: &mut Vec<MoveOperation>,
    ) {
        let min_tabs = self.config.min_tabs;
        let target = target_of(&state[idx]);
        let mut shortfall = min_tabs.saturating_sub(state[idx].tab_count());

        for donor_idx in 0..state.len() {
            if shortfall == 0 {
                break;
            }
            let donor = state[donor_idx].id;
            if donor_idx == idx || doomed.contains(&donor) || state[donor_idx].tab_count() <= min_tabs {
                continue;
            }

            let mut units = get_units(&state[donor_idx], self.config.respect_grouping);
            units.sort_by_key(MoveableUnit::size);

            for unit in units {
                let Some(domain) = unit.domain.as_deref() else {
                    continue;
                };
                if unit.size() > shortfall
                    || state[donor_idx].tab_count() - unit.size() < min_tabs
                    || state[idx].tab_count() + unit.size() > self.config.max_tabs
                    || !state[idx].contains_domain(domain)
                {
                    continue;
                }

                component_debug!(
                    Component::Planner,
                    "Refilling {} with {} tabs of {} from {}",
                    target,
                    unit.size(),
                    domain,
                    donor
                );
                moves.push(apply_move(state, donor, &unit, target));
                shortfall -= unit.size();
            }
        }
    }
}

/// Pick a destination for `unit` leaving `source`
///
/// Priority: a window already showing the unit's domain, then any window
/// with room, then a new window when `allow_new`. Windows the plan has
/// already opened compete like host windows. Doomed windows, the source
/// and windows without tabs (the host closes those) are never returned,
/// and a unit larger than `max_tabs` never gets a window of its own.
pub fn find_best_target(
    state: &[SimulatedWindowState],
    unit: &MoveableUnit,
    source: WindowId,
    doomed: &DoomedWindows,
    max_tabs: usize,
    allow_new: bool,
) -> Option<MoveTarget> {
    let has_room = |window: &&SimulatedWindowState| {
        window.id != source
            && !window.is_empty()
            && !doomed.contains(&window.id)
            && window.tab_count() + unit.size() <= max_tabs
    };

    if let Some(domain) = unit.domain.as_deref() {
        let mut best: Option<(&SimulatedWindowState, usize)> = None;
        for window in state.iter().filter(has_room) {
            let matches = window.domain_count(domain);
            if matches > 0 && best.map_or(true, |(_, most)| matches > most) {
                best = Some((window, matches));
            }
        }
        if let Some((window, _)) = best {
            return Some(target_of(window));
        }
    }

    // best fit: the fullest window that still has room
    let mut fullest: Option<&SimulatedWindowState> = None;
    for window in state.iter().filter(has_room) {
        if fullest.map_or(true, |current| window.tab_count() > current.tab_count()) {
            fullest = Some(window);
        }
    }
    if let Some(window) = fullest {
        return Some(target_of(window));
    }

    if allow_new && unit.size() <= max_tabs {
        let slot = state.iter().filter(|window| window.opened_slot().is_some()).count();
        return Some(MoveTarget::New(slot));
    }
    None
}

/// How a simulated window is addressed in a move
fn target_of(window: &SimulatedWindowState) -> MoveTarget {
    match window.opened_slot() {
        Some(slot) => MoveTarget::New(slot),
        None => MoveTarget::Existing(window.id),
    }
}

/// Apply a move to the simulation and describe it as an operation
///
/// The first move into `New(slot)` adds that window to the simulation.
fn apply_move(
    state: &mut Vec<SimulatedWindowState>,
    source: WindowId,
    unit: &MoveableUnit,
    target: MoveTarget,
) -> MoveOperation {
    let moved = state
        .iter_mut()
        .find(|window| window.id == source)
        .map(|window| window.take_tabs(&unit.tab_ids))
        .unwrap_or_default();

    if let MoveTarget::New(slot) = target {
        if !state.iter().any(|window| window.opened_slot() == Some(slot)) {
            state.push(SimulatedWindowState::opened(slot));
        }
    }
    if let Some(window) = state.iter_mut().find(|window| target_of(window) == target) {
        window.add_tabs(moved);
    }

    component_debug!(
        Component::Planner,
        "Move {} tabs from {} to {}",
        unit.size(),
        source,
        target
    );

    MoveOperation {
        tab_ids: unit.tab_ids.clone(),
        source,
        target,
        group_id: unit.group_id,
    }
}
