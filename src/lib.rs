//! Greedy allocation of recipe stock to customer orders.
//!
//! Orders are grouped by box type, number of recipes and number of portions.
//! The allocator covers every group without giving any customer the same
//! recipe twice, serving the largest groups first and carrying the stock left
//! by one box type over to the next.

pub mod allocation;
pub mod error;
pub mod io;
pub mod logging;
pub mod model;
pub mod observer;

pub use allocation::config::AllocationConfig;
pub use allocation::engine::{AllocationEngine, AllocationOutcome, GroupOutcome, OrderGroup};
pub use error::{AllocationError, IntegrityError, LoadError};
pub use model::orders::OrderDemand;
pub use model::recipe::{BoxType, RecipeCatalog, RecipeStock};
pub use model::stock_table::{StockEntry, StockTable};
