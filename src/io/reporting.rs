// src/io/reporting.rs

use crate::allocation::engine::{Infeasibility, RoundRecord};
use crate::error::LoadError;
use crate::model::stock_table::StockTable;
use serde::Serialize;
use std::path::Path;

/// Writes the per-round allocation log to a CSV file.
///
/// # Arguments
/// * `file_path` - The path to save the file (e.g., "reports/rounds.csv").
/// * `data` - The rounds captured by a `HistoryRecorder`.
pub fn write_round_log(file_path: &Path, data: &[RoundRecord]) -> Result<usize, LoadError> {
    write_rows(file_path, data)
}

/// Writes the buckets that could not be covered to a CSV file.
pub fn write_failure_log(file_path: &Path, data: &[Infeasibility]) -> Result<usize, LoadError> {
    write_rows(file_path, data)
}

/// Writes the excess stock table, lowest stock first, to a CSV file.
pub fn write_excess_stock(file_path: &Path, stock: &StockTable) -> Result<usize, LoadError> {
    write_rows(file_path, stock.entries())
}

fn write_rows<T: Serialize>(file_path: &Path, rows: &[T]) -> Result<usize, LoadError> {
    let csv_error = |source| LoadError::Csv {
        path: file_path.to_path_buf(),
        source,
    };

    let mut wtr = csv::Writer::from_path(file_path).map_err(csv_error)?;
    for row in rows {
        wtr.serialize(row).map_err(csv_error)?;
    }

    // Flush the buffer to ensure all data is written
    wtr.flush().map_err(|e| csv_error(e.into()))?;
    Ok(rows.len())
}
