// src/model/stock_table.rs

use crate::model::recipe::{BoxType, RecipeCatalog, RecipeStock};
use serde::Serialize;
use std::collections::BTreeMap;

/// One row of a stock table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockEntry {
    pub recipe_id: String,
    pub stock_count: u32,
    pub box_type: BoxType,
}

impl StockEntry {
    /// How many orders of `num_portions` this recipe can still cover.
    pub fn fulfillable_orders(&self, num_portions: u32) -> u32 {
        self.stock_count / num_portions
    }
}

/// Recipe stock kept in ascending order of `stock_count`.
///
/// Ties are ordered by recipe id so the same input always produces the same
/// allocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StockTable {
    entries: Vec<StockEntry>,
}

impl StockTable {
    pub fn new(entries: Vec<StockEntry>) -> Self {
        let mut table = Self { entries };
        table.sort();
        table
    }

    /// Builds the table for one box type from the catalog.
    pub fn for_box_type(catalog: &RecipeCatalog, box_type: BoxType) -> Self {
        Self::new(
            catalog
                .for_box_type(box_type)
                .map(|(id, recipe)| StockEntry {
                    recipe_id: id.clone(),
                    stock_count: recipe.stock_count,
                    box_type: recipe.box_type,
                })
                .collect(),
        )
    }

    /// Adds rows carried over from another table. A recipe already present has
    /// the carried stock added to its own.
    pub fn merge(&mut self, other: &StockTable) {
        for incoming in &other.entries {
            match self
                .entries
                .iter_mut()
                .find(|e| e.recipe_id == incoming.recipe_id)
            {
                Some(existing) => {
                    existing.stock_count = existing.stock_count.saturating_add(incoming.stock_count)
                }
                None => self.entries.push(incoming.clone()),
            }
        }
        self.sort();
    }

    pub fn sort(&mut self) {
        self.entries.sort_by(|a, b| {
            a.stock_count
                .cmp(&b.stock_count)
                .then_with(|| a.recipe_id.cmp(&b.recipe_id))
        });
    }

    pub fn entries(&self) -> &[StockEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, recipe_id: &str) -> Option<&StockEntry> {
        self.entries.iter().find(|e| e.recipe_id == recipe_id)
    }

    pub fn stock_of(&self, recipe_id: &str) -> Option<u32> {
        self.get(recipe_id).map(|e| e.stock_count)
    }

    pub fn total_stock(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.stock_count)).sum()
    }

    /// Number of recipes able to cover at least one order of `num_portions`.
    pub fn recipes_with_capacity(&self, num_portions: u32) -> usize {
        self.entries
            .iter()
            .filter(|e| e.fulfillable_orders(num_portions) > 0)
            .count()
    }

    /// Position of the lowest-stock recipe that can still cover an order.
    pub fn lowest_with_capacity(&self, num_portions: u32) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.fulfillable_orders(num_portions) > 0)
    }

    /// Removes `amount` from every row at `positions`.
    ///
    /// A position listed more than once is charged once per listing. Returns
    /// `false` and changes nothing if any row holds less than its total charge
    /// or a position is out of range.
    pub fn deduct(&mut self, positions: &[usize], amount: u32) -> bool {
        let mut charges: BTreeMap<usize, u64> = BTreeMap::new();
        for &i in positions {
            *charges.entry(i).or_default() += u64::from(amount);
        }

        let covered = charges.iter().all(|(&i, &charge)| {
            self.entries
                .get(i)
                .map_or(false, |e| u64::from(e.stock_count) >= charge)
        });
        if !covered {
            return false;
        }
        for (i, charge) in charges {
            // charge <= stock_count, which fits in u32
            self.entries[i].stock_count -= charge as u32;
        }
        true
    }

    /// Converts the table back into the recipe-file shape.
    pub fn to_catalog(&self) -> RecipeCatalog {
        self.entries
            .iter()
            .map(|e| {
                (
                    e.recipe_id.clone(),
                    RecipeStock {
                        stock_count: e.stock_count,
                        box_type: e.box_type,
                    },
                )
            })
            .collect()
    }
}
