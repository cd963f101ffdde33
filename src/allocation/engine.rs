// src/allocation/engine.rs

use crate::allocation::config::AllocationConfig;
use crate::error::{AllocationError, IntegrityError, Result};
use crate::io::loader;
use crate::model::category::CategoryMap;
use crate::model::orders::OrderDemand;
use crate::model::recipe::{BoxType, RecipeCatalog};
use crate::model::stock_table::StockTable;
use crate::observer::implementations::TracingObserver;
use crate::observer::traits::AllocationObserver;
use serde::Serialize;
use std::path::Path;
use std::time::Instant;

/// One bucket of one box type, with the number of orders still to cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderGroup {
    pub box_type: BoxType,
    pub num_recipes: u32,
    pub num_portions: u32,
    pub num_orders: u32,
}

// Serialize so the round log can be written to CSV
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundRecord {
    pub box_type: BoxType,
    pub num_recipes: u32,
    pub num_portions: u32,
    pub round: usize,
    /// Lowest-stock recipe that still had capacity; it was paired with the
    /// `num_recipes - 1` highest-stock recipes.
    pub lowest_recipe: String,
    pub orders_fulfilled: u32,
    /// Units taken from each recipe in the pairing.
    pub stock_deducted: u32,
    pub orders_remaining: u32,
}

/// Why a bucket could not be fully covered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Infeasibility {
    pub box_type: BoxType,
    pub num_recipes: u32,
    pub num_portions: u32,
    pub orders_remaining: u32,
    pub recipes_with_capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupOutcome {
    Fulfilled,
    Infeasible(Infeasibility),
}

/// Result of allocating every bucket of one box type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocationOutcome {
    /// All orders were covered; carries the stock left over.
    Allocated(StockTable),
    /// A bucket could not be covered without repeating a recipe for a customer.
    Infeasible(Infeasibility),
}

impl AllocationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AllocationOutcome::Allocated(_))
    }

    pub fn excess_stock(&self) -> Option<&StockTable> {
        match self {
            AllocationOutcome::Allocated(table) => Some(table),
            AllocationOutcome::Infeasible(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
struct LoadedData {
    orders: OrderDemand,
    recipes: RecipeCatalog,
    categories: CategoryMap,
}

/// Greedy recipe stock allocator.
///
/// Each bucket is worked in rounds: the lowest-stock recipe that can still cover
/// an order is paired with the `num_recipes - 1` highest-stock recipes, so every
/// customer in the round receives `num_recipes` distinct recipes. A bucket fails
/// as soon as fewer than `num_recipes` recipes can cover an order.
pub struct AllocationEngine<O: AllocationObserver = TracingObserver> {
    config: AllocationConfig,
    observer: O,
    data: Option<LoadedData>,
    // Table as it stood after the most recent pass, including failed ones
    last_pass_stock: Option<StockTable>,
    excess_stock: Option<StockTable>,
}

impl AllocationEngine<TracingObserver> {
    /// Engine that reports through `tracing` at the config's verbosity.
    pub fn from_config(config: AllocationConfig) -> Self {
        let observer = TracingObserver::new(config.verbose);
        Self::new(config, observer)
    }
}

impl<O: AllocationObserver> AllocationEngine<O> {
    pub fn new(config: AllocationConfig, observer: O) -> Self {
        Self {
            config,
            observer,
            data: None,
            last_pass_stock: None,
            excess_stock: None,
        }
    }

    /// Validates the inputs and derives the category mappings.
    ///
    /// Both box types must be present in the recipes and in the orders. Any
    /// previous results are cleared.
    pub fn load_data(&mut self, orders: OrderDemand, recipes: RecipeCatalog) -> Result<()> {
        for box_type in BoxType::ALL {
            if !recipes.contains_box_type(box_type) {
                return Err(IntegrityError::MissingBoxType {
                    box_type,
                    dataset: "recipe",
                }
                .into());
            }
            if !orders.contains_box_type(box_type) {
                return Err(IntegrityError::MissingBoxType {
                    box_type,
                    dataset: "orders",
                }
                .into());
            }
        }

        let categories = CategoryMap::derive(&orders)?;

        self.data = Some(LoadedData {
            orders,
            recipes,
            categories,
        });
        self.last_pass_stock = None;
        self.excess_stock = None;
        Ok(())
    }

    /// Covers `group.num_orders` orders from `table`, mutating it in place.
    ///
    /// The table is re-sorted before the first round. On failure the rounds
    /// already applied stay applied.
    pub fn fulfill_group(&mut self, table: &mut StockTable, group: OrderGroup) -> GroupOutcome {
        let mut remaining = group.num_orders;
        if remaining == 0 {
            return GroupOutcome::Fulfilled;
        }
        self.observer.group_started(&group);
        table.sort();

        let portions = group.num_portions;
        let required = group.num_recipes as usize;
        if portions == 0 || required == 0 {
            return self.infeasible(group, remaining, 0);
        }
        let mut round = 0;

        while remaining > 0 {
            let with_capacity = table.recipes_with_capacity(portions);
            let lowest = match table.lowest_with_capacity(portions) {
                Some(i) if with_capacity >= required => i,
                _ => return self.infeasible(group, remaining, with_capacity),
            };

            let capacity = table.entries()[lowest].fulfillable_orders(portions);
            let orders = capacity.min(remaining);
            let amount = orders * portions;

            // Recipes with capacity sit at the top of the sorted table, so the
            // lowest one is never among the `required - 1` highest.
            let len = table.len();
            let mut targets = Vec::with_capacity(required);
            targets.push(lowest);
            targets.extend(len - (required - 1)..len);

            let lowest_recipe = table.entries()[lowest].recipe_id.clone();
            if !table.deduct(&targets, amount) {
                return self.infeasible(group, remaining, with_capacity);
            }
            table.sort();
            remaining -= orders;
            round += 1;

            self.observer.round_completed(&RoundRecord {
                box_type: group.box_type,
                num_recipes: group.num_recipes,
                num_portions: portions,
                round,
                lowest_recipe,
                orders_fulfilled: orders,
                stock_deducted: amount,
                orders_remaining: remaining,
            });
        }

        GroupOutcome::Fulfilled
    }

    fn infeasible(&mut self, group: OrderGroup, remaining: u32, with_capacity: usize) -> GroupOutcome {
        let infeasibility = Infeasibility {
            box_type: group.box_type,
            num_recipes: group.num_recipes,
            num_portions: group.num_portions,
            orders_remaining: remaining,
            recipes_with_capacity: with_capacity,
        };
        self.observer.group_infeasible(&infeasibility);
        GroupOutcome::Infeasible(infeasibility)
    }

    /// Allocates every bucket of `box_type`, largest recipe and portion counts first.
    ///
    /// `extra_stock` is merged into the box type's own recipes before allocation.
    pub fn allocate_box_type(
        &mut self,
        box_type: BoxType,
        extra_stock: Option<&StockTable>,
    ) -> Result<AllocationOutcome> {
        let started = Instant::now();
        let data = self.data.as_ref().ok_or(AllocationError::NotLoaded)?;

        let mut table = StockTable::for_box_type(&data.recipes, box_type);
        if let Some(extra) = extra_stock {
            table.merge(extra);
        }

        let mut groups = Vec::new();
        for bucket in data.categories.buckets() {
            let num_orders = data
                .orders
                .order_count(
                    box_type,
                    &bucket.recipe_category.label,
                    &bucket.portion_category.label,
                )
                .ok_or_else(|| AllocationError::CategoryMismatch {
                    box_type,
                    recipe_category: bucket.recipe_category.label.clone(),
                    portion_category: bucket.portion_category.label.clone(),
                })?;
            groups.push(OrderGroup {
                box_type,
                num_recipes: bucket.recipe_category.count,
                num_portions: bucket.portion_category.count,
                num_orders,
            });
        }

        for group in groups {
            if let GroupOutcome::Infeasible(infeasibility) = self.fulfill_group(&mut table, group) {
                self.last_pass_stock = Some(table);
                let outcome = AllocationOutcome::Infeasible(infeasibility);
                self.observer
                    .pass_completed(box_type, &outcome, started.elapsed());
                return Ok(outcome);
            }
        }

        self.last_pass_stock = Some(table.clone());
        let outcome = AllocationOutcome::Allocated(table);
        self.observer
            .pass_completed(box_type, &outcome, started.elapsed());
        Ok(outcome)
    }

    /// Loads the data and allocates every box type in the configured order.
    ///
    /// Returns `Ok(false)` as soon as a box type cannot be fully allocated; the
    /// later box types are not attempted. On success the final excess stock is
    /// available from [`Self::excess_stock`].
    pub fn run(&mut self, orders: OrderDemand, recipes: RecipeCatalog) -> Result<bool> {
        self.config.validate()?;
        self.load_data(orders, recipes)?;

        let mut carried: Option<StockTable> = None;
        for box_type in self.config.box_type_order.clone() {
            match self.allocate_box_type(box_type, carried.as_ref())? {
                AllocationOutcome::Allocated(excess) => carried = Some(excess),
                AllocationOutcome::Infeasible(_) => return Ok(false),
            }
        }

        self.excess_stock = carried;
        Ok(true)
    }

    /// Same as [`Self::run`], reading both inputs from JSON files.
    pub fn run_files(&mut self, orders_path: &Path, recipes_path: &Path) -> Result<bool> {
        let orders = loader::load_orders(orders_path)?;
        let recipes = loader::load_recipes(recipes_path)?;
        self.run(orders, recipes)
    }

    pub fn config(&self) -> &AllocationConfig {
        &self.config
    }

    pub fn orders(&self) -> Option<&OrderDemand> {
        self.data.as_ref().map(|d| &d.orders)
    }

    pub fn recipes(&self) -> Option<&RecipeCatalog> {
        self.data.as_ref().map(|d| &d.recipes)
    }

    pub fn categories(&self) -> Option<&CategoryMap> {
        self.data.as_ref().map(|d| &d.categories)
    }

    /// Stock left after a successful [`Self::run`].
    pub fn excess_stock(&self) -> Option<&StockTable> {
        self.excess_stock.as_ref()
    }

    /// Stock as the most recent pass left it, whether or not it succeeded.
    pub fn last_pass_stock(&self) -> Option<&StockTable> {
        self.last_pass_stock.as_ref()
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn into_observer(self) -> O {
        self.observer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::stock_table::StockEntry;
    use crate::observer::implementations::HistoryRecorder;

    fn engine() -> AllocationEngine {
        AllocationEngine::from_config(AllocationConfig {
            verbose: false,
            ..Default::default()
        })
    }

    fn table(rows: &[(&str, u32)]) -> StockTable {
        StockTable::new(
            rows.iter()
                .map(|(id, stock)| StockEntry {
                    recipe_id: id.to_string(),
                    stock_count: *stock,
                    box_type: BoxType::Vegetarian,
                })
                .collect(),
        )
    }

    fn group(num_recipes: u32, num_portions: u32, num_orders: u32) -> OrderGroup {
        OrderGroup {
            box_type: BoxType::Vegetarian,
            num_recipes,
            num_portions,
            num_orders,
        }
    }

    /// Orders with a single two-recipes/two-portions bucket per box type.
    fn simple_orders(vegetarian: u32, gourmet: u32) -> OrderDemand {
        let mut orders = OrderDemand::new();
        orders.set(BoxType::Vegetarian, "two_recipes", "two_portions", vegetarian);
        orders.set(BoxType::Gourmet, "two_recipes", "two_portions", gourmet);
        orders
    }

    #[test]
    fn smallest_with_stock_pairs_with_largest() {
        let mut stock = table(&[("r1", 10), ("r2", 10), ("r3", 10)]);
        let outcome = engine().fulfill_group(&mut stock, group(2, 2, 3));

        assert_eq!(outcome, GroupOutcome::Fulfilled);
        assert_eq!(stock.stock_of("r1"), Some(4));
        assert_eq!(stock.stock_of("r2"), Some(10));
        assert_eq!(stock.stock_of("r3"), Some(4));
        assert_eq!(stock.total_stock(), 18);
    }

    #[test]
    fn unsorted_table_is_sorted_before_pairing() {
        let mut stock = table(&[("a", 2), ("b", 4), ("c", 6)]);
        // Leaves the rows ordered a(2), b(4), c(2) until re-sorted.
        assert!(stock.deduct(&[2], 4));

        let outcome = engine().fulfill_group(&mut stock, group(2, 2, 1));

        assert_eq!(outcome, GroupOutcome::Fulfilled);
        // a is the lowest with stock once sorted, paired with b
        assert_eq!(stock.stock_of("a"), Some(0));
        assert_eq!(stock.stock_of("b"), Some(2));
        assert_eq!(stock.stock_of("c"), Some(2));
    }

    #[test]
    fn zero_orders_leave_the_table_untouched() {
        let mut stock = table(&[("r1", 1), ("r2", 0)]);
        let before = stock.clone();

        assert_eq!(
            engine().fulfill_group(&mut stock, group(4, 4, 0)),
            GroupOutcome::Fulfilled
        );
        assert_eq!(stock, before);
    }

    #[test]
    fn too_few_recipes_with_stock_fails() {
        let mut stock = table(&[("r1", 3), ("r2", 8), ("r3", 8)]);
        let outcome = engine().fulfill_group(&mut stock, group(3, 4, 1));

        match outcome {
            GroupOutcome::Infeasible(infeasibility) => {
                assert_eq!(infeasibility.recipes_with_capacity, 2);
                assert_eq!(infeasibility.orders_remaining, 1);
            }
            other => panic!("expected infeasible, got {:?}", other),
        }
        assert_eq!(stock.total_stock(), 19);
    }

    #[test]
    fn single_recipe_orders_only_touch_the_lowest_with_stock() {
        let mut stock = table(&[("r1", 1), ("r2", 6), ("r3", 9)]);
        let outcome = engine().fulfill_group(&mut stock, group(1, 2, 4));

        assert_eq!(outcome, GroupOutcome::Fulfilled);
        // r2 covers 3 orders, then r3 (now lowest with stock) covers the last one
        assert_eq!(stock.stock_of("r1"), Some(1));
        assert_eq!(stock.stock_of("r2"), Some(0));
        assert_eq!(stock.stock_of("r3"), Some(7));
    }

    #[test]
    fn zero_sized_groups_are_infeasible() {
        let mut stock = table(&[("r1", 4)]);
        assert!(matches!(
            engine().fulfill_group(&mut stock, group(1, 0, 1)),
            GroupOutcome::Infeasible(_)
        ));
        assert!(matches!(
            engine().fulfill_group(&mut stock, group(0, 2, 1)),
            GroupOutcome::Infeasible(_)
        ));
        assert_eq!(stock.stock_of("r1"), Some(4));
    }

    #[test]
    fn rounds_are_reported_to_the_observer() {
        let mut engine = AllocationEngine::new(
            AllocationConfig::default(),
            HistoryRecorder::new(TracingObserver::new(false)),
        );
        let mut stock = table(&[("a", 4), ("b", 6), ("c", 10)]);
        assert_eq!(
            engine.fulfill_group(&mut stock, group(2, 2, 4)),
            GroupOutcome::Fulfilled
        );

        let records = engine.observer().records();
        // a(2 orders) with c, then b(2 orders) with c
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].lowest_recipe, "a");
        assert_eq!(records[0].orders_fulfilled, 2);
        assert_eq!(records[1].lowest_recipe, "b");
        assert_eq!(records[1].orders_remaining, 0);
        assert_eq!(stock.total_stock(), 4);
    }

    #[test]
    fn allocating_before_loading_is_an_error() {
        assert!(matches!(
            engine().allocate_box_type(BoxType::Gourmet, None),
            Err(AllocationError::NotLoaded)
        ));
    }

    #[test]
    fn missing_box_type_in_recipes_is_an_integrity_error() {
        let mut recipes = RecipeCatalog::new();
        recipes.insert("g1", 10, BoxType::Gourmet);

        let err = engine()
            .load_data(simple_orders(1, 1), recipes)
            .unwrap_err();
        assert!(matches!(
            err,
            AllocationError::DataIntegrity(IntegrityError::MissingBoxType {
                box_type: BoxType::Vegetarian,
                ..
            })
        ));
    }

    #[test]
    fn missing_box_type_in_orders_is_an_integrity_error() {
        let mut recipes = RecipeCatalog::new();
        recipes.insert("v1", 10, BoxType::Vegetarian);
        recipes.insert("g1", 10, BoxType::Gourmet);
        let mut orders = OrderDemand::new();
        orders.set(BoxType::Vegetarian, "two_recipes", "two_portions", 1);

        assert!(matches!(
            engine().load_data(orders, recipes),
            Err(AllocationError::DataIntegrity(
                IntegrityError::MissingBoxType { .. }
            ))
        ));
    }

    #[test]
    fn absent_bucket_is_a_category_mismatch() {
        let mut recipes = RecipeCatalog::new();
        recipes.insert("v1", 10, BoxType::Vegetarian);
        recipes.insert("g1", 10, BoxType::Gourmet);

        let mut orders = OrderDemand::new();
        for box_type in BoxType::ALL {
            orders.set(box_type, "two_recipes", "two_portions", 0);
            orders.set(box_type, "two_recipes", "four_portions", 0);
            orders.set(box_type, "three_recipes", "two_portions", 0);
        }

        let mut engine = engine();
        engine.load_data(orders, recipes).unwrap();
        let err = engine
            .allocate_box_type(BoxType::Vegetarian, None)
            .unwrap_err();

        match err {
            AllocationError::CategoryMismatch {
                box_type,
                recipe_category,
                portion_category,
            } => {
                assert_eq!(box_type, BoxType::Vegetarian);
                assert_eq!(recipe_category, "three_recipes");
                assert_eq!(portion_category, "four_portions");
            }
            other => panic!("expected category mismatch, got {:?}", other),
        }
    }

    #[test]
    fn failed_pass_keeps_partial_consumption() {
        let mut recipes = RecipeCatalog::new();
        recipes.insert("a", 4, BoxType::Vegetarian);
        recipes.insert("b", 4, BoxType::Vegetarian);
        recipes.insert("c", 4, BoxType::Vegetarian);
        recipes.insert("g", 10, BoxType::Gourmet);

        let mut engine = engine();
        assert!(!engine.run(simple_orders(4, 0), recipes).unwrap());

        let partial = engine.last_pass_stock().unwrap();
        assert_eq!(partial.stock_of("a"), Some(0));
        assert_eq!(partial.stock_of("b"), Some(4));
        assert_eq!(partial.stock_of("c"), Some(0));
        assert!(engine.excess_stock().is_none());
    }

    #[test]
    fn vegetarian_leftovers_feed_the_gourmet_pass() {
        let mut recipes = RecipeCatalog::new();
        recipes.insert("v1", 4, BoxType::Vegetarian);
        recipes.insert("v2", 4, BoxType::Vegetarian);
        recipes.insert("g1", 2, BoxType::Gourmet);

        // Gourmet alone has one recipe, so it needs a vegetarian leftover to pair with.
        let mut engine = engine();
        assert!(engine.run(simple_orders(1, 1), recipes).unwrap());

        let excess = engine.excess_stock().unwrap();
        assert_eq!(excess.len(), 3);
        assert_eq!(excess.total_stock(), 10 - 4 - 4);
        assert_eq!(excess.stock_of("g1"), Some(0));
    }

    #[test]
    fn reloading_resets_previous_results() {
        let mut recipes = RecipeCatalog::new();
        recipes.insert("v1", 4, BoxType::Vegetarian);
        recipes.insert("v2", 4, BoxType::Vegetarian);
        recipes.insert("g1", 4, BoxType::Gourmet);
        recipes.insert("g2", 4, BoxType::Gourmet);

        let mut engine = engine();
        assert!(engine.run(simple_orders(0, 0), recipes.clone()).unwrap());
        assert!(engine.excess_stock().is_some());

        engine.load_data(simple_orders(0, 0), recipes).unwrap();
        assert!(engine.excess_stock().is_none());
        assert!(engine.last_pass_stock().is_none());
    }
}
