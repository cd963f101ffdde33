pub mod category;
pub mod orders;
pub mod recipe;
pub mod stock_table;
