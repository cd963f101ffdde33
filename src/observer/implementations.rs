// src/observer/implementations.rs

use crate::allocation::engine::{AllocationOutcome, Infeasibility, OrderGroup, RoundRecord};
use crate::model::recipe::BoxType;
use crate::observer::traits::AllocationObserver;
use std::time::Duration;
use tracing::{debug, error, info};

// =========================================================================
// 1. Tracing Observer
// =========================================================================

/// Forwards engine events to `tracing`.
///
/// With `verbose` off, per-group progress drops to `debug` and only pass
/// results and failures are reported at `info`/`error`.
#[derive(Debug, Clone)]
pub struct TracingObserver {
    verbose: bool,
}

impl TracingObserver {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new(true)
    }
}

impl AllocationObserver for TracingObserver {
    fn group_started(&mut self, group: &OrderGroup) {
        if self.verbose {
            info!(
                box_type = %group.box_type,
                num_recipes = group.num_recipes,
                num_portions = group.num_portions,
                num_orders = group.num_orders,
                "fulfilling orders for a customer group"
            );
        } else {
            debug!(
                box_type = %group.box_type,
                num_recipes = group.num_recipes,
                num_portions = group.num_portions,
                num_orders = group.num_orders,
                "fulfilling orders for a customer group"
            );
        }
    }

    fn round_completed(&mut self, record: &RoundRecord) {
        debug!(
            box_type = %record.box_type,
            round = record.round,
            lowest_recipe = %record.lowest_recipe,
            orders_fulfilled = record.orders_fulfilled,
            stock_deducted = record.stock_deducted,
            orders_remaining = record.orders_remaining,
            "allocation round applied"
        );
    }

    fn group_infeasible(&mut self, infeasibility: &Infeasibility) {
        error!(
            box_type = %infeasibility.box_type,
            num_recipes = infeasibility.num_recipes,
            num_portions = infeasibility.num_portions,
            recipes_with_capacity = infeasibility.recipes_with_capacity,
            orders_remaining = infeasibility.orders_remaining,
            "not enough recipes with sufficient stock to keep every customer's recipes distinct, aborting"
        );
    }

    fn pass_completed(&mut self, box_type: BoxType, outcome: &AllocationOutcome, elapsed: Duration) {
        match outcome {
            AllocationOutcome::Allocated(excess) => {
                info!(
                    box_type = %box_type,
                    recipes = excess.len(),
                    excess_stock = excess.total_stock(),
                    "orders allocated successfully"
                );
                if self.verbose {
                    for entry in excess.entries() {
                        info!(
                            recipe = %entry.recipe_id,
                            stock_count = entry.stock_count,
                            box_type = %entry.box_type,
                            "excess stock"
                        );
                    }
                }
            }
            AllocationOutcome::Infeasible(_) => {
                info!(box_type = %box_type, "allocation failed");
            }
        }
        debug!(box_type = %box_type, elapsed_ms = elapsed.as_millis() as u64, "pass completed");
    }
}

// =========================================================================
// 2. History Recorder
// =========================================================================

/// Keeps every round for later export while passing events on to an inner observer.
#[derive(Debug, Clone, Default)]
pub struct HistoryRecorder<O: AllocationObserver = TracingObserver> {
    inner: O,
    records: Vec<RoundRecord>,
    failures: Vec<Infeasibility>,
}

impl<O: AllocationObserver> HistoryRecorder<O> {
    pub fn new(inner: O) -> Self {
        Self {
            inner,
            records: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn records(&self) -> &[RoundRecord] {
        &self.records
    }

    pub fn failures(&self) -> &[Infeasibility] {
        &self.failures
    }

    pub fn inner(&self) -> &O {
        &self.inner
    }
}

impl<O: AllocationObserver> AllocationObserver for HistoryRecorder<O> {
    fn group_started(&mut self, group: &OrderGroup) {
        self.inner.group_started(group);
    }

    fn round_completed(&mut self, record: &RoundRecord) {
        self.records.push(record.clone());
        self.inner.round_completed(record);
    }

    fn group_infeasible(&mut self, infeasibility: &Infeasibility) {
        self.failures.push(infeasibility.clone());
        self.inner.group_infeasible(infeasibility);
    }

    fn pass_completed(&mut self, box_type: BoxType, outcome: &AllocationOutcome, elapsed: Duration) {
        self.inner.pass_completed(box_type, outcome, elapsed);
    }
}
