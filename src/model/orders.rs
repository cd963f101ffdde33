// src/model/orders.rs

use crate::model::recipe::BoxType;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

type PortionCounts = BTreeMap<String, u32>;
type RecipeGroups = BTreeMap<String, PortionCounts>;

/// Order counts keyed by box type, then recipe-count label, then portion-count label.
///
/// Box types are kept as raw labels so that an order file may carry segments the
/// allocator does not process; those are simply never looked up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderDemand(BTreeMap<String, RecipeGroups>);

impl OrderDemand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of orders for one bucket of one box type.
    pub fn set(
        &mut self,
        box_type: BoxType,
        recipe_category: impl Into<String>,
        portion_category: impl Into<String>,
        orders: u32,
    ) {
        self.0
            .entry(box_type.as_str().to_string())
            .or_default()
            .entry(recipe_category.into())
            .or_default()
            .insert(portion_category.into(), orders);
    }

    pub fn contains_box_type(&self, box_type: BoxType) -> bool {
        self.0.contains_key(box_type.as_str())
    }

    /// Every box type label present in the order data, known or not.
    pub fn box_type_labels(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Recipe-count labels used by a box type, or `None` if it has no orders at all.
    pub fn recipe_labels(&self, box_type: BoxType) -> Option<BTreeSet<String>> {
        self.0
            .get(box_type.as_str())
            .map(|groups| groups.keys().cloned().collect())
    }

    /// Union of the portion-count labels used anywhere within a box type.
    pub fn portion_labels(&self, box_type: BoxType) -> Option<BTreeSet<String>> {
        self.0.get(box_type.as_str()).map(|groups| {
            groups
                .values()
                .flat_map(|portions| portions.keys().cloned())
                .collect()
        })
    }

    pub fn order_count(
        &self,
        box_type: BoxType,
        recipe_category: &str,
        portion_category: &str,
    ) -> Option<u32> {
        self.0
            .get(box_type.as_str())?
            .get(recipe_category)?
            .get(portion_category)
            .copied()
    }

    /// Total number of customer orders placed for a box type.
    pub fn total_orders(&self, box_type: BoxType) -> u64 {
        self.0
            .get(box_type.as_str())
            .map(|groups| {
                groups
                    .values()
                    .flat_map(|portions| portions.values())
                    .map(|n| u64::from(*n))
                    .sum()
            })
            .unwrap_or(0)
    }
}
