// src/allocation/config.rs

use crate::error::{AllocationError, Result};
use crate::model::recipe::BoxType;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AllocationConfig {
    /// Box types in processing order. Each pass receives the previous pass's
    /// excess stock as extra supply.
    pub box_type_order: Vec<BoxType>,
    /// Report per-group progress at info level instead of debug.
    pub verbose: bool,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            // Vegetarian first: its recipe pool is the smaller one.
            box_type_order: vec![BoxType::Vegetarian, BoxType::Gourmet],
            verbose: true,
        }
    }
}

impl AllocationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.box_type_order.is_empty() {
            return Err(AllocationError::InvalidConfig(
                "box type order must name at least one box type".to_string(),
            ));
        }
        for (i, box_type) in self.box_type_order.iter().enumerate() {
            if self.box_type_order[..i].contains(box_type) {
                return Err(AllocationError::InvalidConfig(format!(
                    "box type '{}' appears more than once in the processing order",
                    box_type
                )));
            }
        }
        Ok(())
    }
}

/// File locations used by the binary.
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub orders: PathBuf,
    pub recipes: PathBuf,
    pub excess_stock_json: PathBuf,
    pub excess_stock_csv: PathBuf,
    pub round_log_csv: PathBuf,
    pub failure_log_csv: PathBuf,
}

impl Default for RunPaths {
    fn default() -> Self {
        Self {
            orders: PathBuf::from("orders.json"),
            recipes: PathBuf::from("recipes.json"),
            excess_stock_json: PathBuf::from("excess_stock.json"),
            excess_stock_csv: PathBuf::from("excess_stock.csv"),
            round_log_csv: PathBuf::from("allocation_rounds.csv"),
            failure_log_csv: PathBuf::from("allocation_failures.csv"),
        }
    }
}
