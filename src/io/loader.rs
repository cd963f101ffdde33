// src/io/loader.rs

use crate::error::LoadError;
use crate::model::orders::OrderDemand;
use crate::model::recipe::RecipeCatalog;
use crate::model::stock_table::StockTable;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Reads any JSON document from `path`.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads the nested `box type -> recipe category -> portion category -> count` file.
pub fn load_orders(path: &Path) -> Result<OrderDemand, LoadError> {
    load_json(path)
}

/// Reads the `recipe id -> {stock_count, box_type}` file.
pub fn load_recipes(path: &Path) -> Result<RecipeCatalog, LoadError> {
    load_json(path)
}

/// Writes excess stock in the same shape as the recipe file.
pub fn write_excess_stock_json(path: &Path, stock: &StockTable) -> Result<(), LoadError> {
    let write_error = |source| LoadError::Write {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(write_error)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &stock.to_catalog()).map_err(|source| {
        LoadError::Serialize {
            path: path.to_path_buf(),
            source,
        }
    })?;
    writer.flush().map_err(write_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::recipe::BoxType;
    use std::path::PathBuf;

    #[test]
    fn missing_file_reports_its_path() {
        let path = PathBuf::from("does/not/exist.json");
        match load_orders(&path) {
            Err(LoadError::Io { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected io error, got {:?}", other),
        }
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recipes.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            load_recipes(&path),
            Err(LoadError::Json { .. })
        ));
    }

    #[test]
    fn unwritable_destination_is_a_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("excess.json");

        let err = write_excess_stock_json(&path, &StockTable::default()).unwrap_err();
        assert!(matches!(err, LoadError::Write { .. }));
        assert!(err.to_string().starts_with("failed to write"));
    }

    #[test]
    fn excess_stock_is_written_as_a_recipe_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("excess.json");

        let mut catalog = RecipeCatalog::new();
        catalog.insert("recipe_1", 5, BoxType::Gourmet);
        catalog.insert("recipe_2", 0, BoxType::Vegetarian);
        let stock = StockTable::for_box_type(&catalog, BoxType::Gourmet);

        write_excess_stock_json(&path, &stock).unwrap();
        let reread = load_recipes(&path).unwrap();

        assert_eq!(reread.len(), 1);
        assert_eq!(reread.get("recipe_1").unwrap().stock_count, 5);
    }
}
