// src/error.rs

use crate::model::recipe::BoxType;
use std::path::PathBuf;
use thiserror::Error;

/// Input data that is structurally unusable for allocation.
#[derive(Error, Debug)]
pub enum IntegrityError {
    #[error("box type '{box_type}' is missing from the {dataset} data")]
    MissingBoxType {
        box_type: BoxType,
        dataset: &'static str,
    },

    #[error(
        "could not read a count from category '{label}': the first '_' separated word \
         must be a number or a number word, e.g. 'two_recipes'"
    )]
    UnparseableCategory { label: String },

    #[error("category '{label}' stands for zero items")]
    ZeroCategory { label: String },

    #[error("categories '{first}' and '{second}' both stand for {count}")]
    DuplicateCategory {
        first: String,
        second: String,
        count: u32,
    },

    #[error("'{box_type}' orders use different categories than '{reference}' orders")]
    InconsistentCategories {
        box_type: BoxType,
        reference: BoxType,
    },
}

/// Failure to read or write one of the data files.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize {}: {source}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write CSV report {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Errors that abort an allocation run.
///
/// An order set that is well formed but cannot be met is not an error; it is
/// reported through [`crate::allocation::engine::AllocationOutcome::Infeasible`].
#[derive(Error, Debug)]
pub enum AllocationError {
    #[error("data integrity error: {0}")]
    DataIntegrity(#[from] IntegrityError),

    #[error(
        "recipe category '{recipe_category}' with portion category '{portion_category}' \
         does not exist for the {box_type} box type"
    )]
    CategoryMismatch {
        box_type: BoxType,
        recipe_category: String,
        portion_category: String,
    },

    #[error("allocation was requested before any data was loaded")]
    NotLoaded,

    #[error("invalid allocation config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Load(#[from] LoadError),
}

pub type Result<T> = std::result::Result<T, AllocationError>;
