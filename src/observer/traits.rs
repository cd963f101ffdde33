// src/observer/traits.rs

use crate::allocation::engine::{AllocationOutcome, Infeasibility, OrderGroup, RoundRecord};
use crate::model::recipe::BoxType;
use std::fmt::Debug;
use std::time::Duration;

/// Receives progress from the allocation engine.
///
/// The engine never logs on its own; whoever constructs it decides where the
/// events go by choosing the observer. Every hook has an empty default so an
/// implementation only overrides what it cares about.
pub trait AllocationObserver: Debug {
    /// A bucket with a non-zero order count is about to be worked.
    fn group_started(&mut self, _group: &OrderGroup) {}

    /// One greedy round has been applied to the stock table.
    fn round_completed(&mut self, _record: &RoundRecord) {}

    /// A bucket ran out of distinct recipes before all its orders were covered.
    fn group_infeasible(&mut self, _infeasibility: &Infeasibility) {}

    /// A whole box type has been processed, successfully or not.
    fn pass_completed(&mut self, _box_type: BoxType, _outcome: &AllocationOutcome, _elapsed: Duration) {}
}
