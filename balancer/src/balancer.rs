//! Balancing driver
//!
//! Ties the pieces together for one run: snapshot the host, plan against
//! the snapshot, execute the plan, then optionally auto-group. The driver
//! holds no state between runs; every call starts from a fresh listing.

use std::sync::Arc;

use shared::{Component, component_info, logging};

use crate::config::BalancerConfig;
use crate::core::{Plan, PlacementPlanner};
use crate::error::BalancerResult;
use crate::services::{AutoGroupReport, AutoGrouper, ExecutionReport, MoveExecutor};
use crate::traits::TabHost;

/// Outcome of a full balancing run
#[derive(Debug, Clone)]
pub struct BalanceReport {
    pub plan: Plan,
    pub execution: ExecutionReport,
    /// `None` when auto-grouping is disabled
    pub auto_group: Option<AutoGroupReport>,
}

/// Balances the windows of a [`TabHost`]
pub struct TabBalancer<H: TabHost> {
    host: Arc<H>,
    planner: PlacementPlanner,
    executor: MoveExecutor<H>,
    grouper: AutoGrouper<H>,
}

impl<H: TabHost> TabBalancer<H> {
    pub fn new(host: Arc<H>, config: BalancerConfig) -> Self {
        Self {
            planner: PlacementPlanner::new(config),
            executor: MoveExecutor::new(host.clone(), config.respect_grouping),
            grouper: AutoGrouper::new(host.clone()),
            host,
        }
    }

    pub fn config(&self) -> &BalancerConfig {
        self.planner.config()
    }

    pub fn host(&self) -> &Arc<H> {
        &self.host
    }

    /// Compute the plan for the host's current windows without touching them
    pub async fn plan(&self) -> BalancerResult<Plan> {
        let windows = self.host.list_windows().await?;
        let plan = self.planner.plan(&windows);

        logging::log_progress(
            Component::Planner,
            "Planned",
            &format!(
                "{} moves over {} windows, {} doomed",
                plan.moves.len(),
                windows.len(),
                plan.doomed.len()
            ),
        );
        Ok(plan)
    }

    /// Plan, execute and optionally auto-group
    ///
    /// Only the initial listing can fail the run. Host failures while
    /// executing are counted in the report instead.
    pub async fn balance_windows(&self) -> BalancerResult<BalanceReport> {
        let plan = self.plan().await?;

        let execution = if plan.is_empty() {
            component_info!(Component::Balancer, "Windows already balanced");
            ExecutionReport::default()
        } else {
            self.executor.execute(&plan).await
        };

        let auto_group = if self.config().auto_group {
            match self.grouper.run().await {
                Ok(report) => Some(report),
                Err(e) => {
                    logging::log_error(Component::Grouper, "Auto-grouping", &e);
                    None
                }
            }
        } else {
            None
        };

        if execution.is_clean() {
            logging::log_success(
                Component::Balancer,
                &format!("Moved {} tabs in {} batches", execution.tabs_moved, execution.batches_applied),
            );
        } else {
            logging::log_error(
                Component::Balancer,
                "Balancing",
                &format!(
                    "{} failed batches, {} regroup failures",
                    execution.batches_failed, execution.regroup_failures
                ),
            );
        }

        Ok(BalanceReport {
            plan,
            execution,
            auto_group,
        })
    }
}
