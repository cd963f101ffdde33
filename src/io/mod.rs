pub mod loader;
pub mod reporting;
