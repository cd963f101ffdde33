// src/model/recipe.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The customer segment a recipe (and an order) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxType {
    Vegetarian,
    Gourmet,
}

impl BoxType {
    /// Every box type the allocator knows how to process.
    pub const ALL: [BoxType; 2] = [BoxType::Vegetarian, BoxType::Gourmet];

    pub fn as_str(&self) -> &'static str {
        match self {
            BoxType::Vegetarian => "vegetarian",
            BoxType::Gourmet => "gourmet",
        }
    }
}

impl fmt::Display for BoxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BoxType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vegetarian" => Ok(BoxType::Vegetarian),
            "gourmet" => Ok(BoxType::Gourmet),
            other => Err(format!("unknown box type '{}'", other)),
        }
    }
}

/// Stock held for a single recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeStock {
    pub stock_count: u32,
    pub box_type: BoxType,
}

/// All recipes keyed by id, as supplied by the recipe file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeCatalog(BTreeMap<String, RecipeStock>);

impl RecipeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, stock_count: u32, box_type: BoxType) {
        self.0.insert(
            id.into(),
            RecipeStock {
                stock_count,
                box_type,
            },
        );
    }

    pub fn get(&self, id: &str) -> Option<&RecipeStock> {
        self.0.get(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &RecipeStock)> {
        self.0.iter()
    }

    /// Recipes belonging to one box type, in id order.
    pub fn for_box_type(&self, box_type: BoxType) -> impl Iterator<Item = (&String, &RecipeStock)> {
        self.0.iter().filter(move |(_, r)| r.box_type == box_type)
    }

    pub fn contains_box_type(&self, box_type: BoxType) -> bool {
        self.for_box_type(box_type).next().is_some()
    }

    pub fn total_stock(&self) -> u64 {
        self.0.values().map(|r| u64::from(r.stock_count)).sum()
    }
}

impl FromIterator<(String, RecipeStock)> for RecipeCatalog {
    fn from_iter<I: IntoIterator<Item = (String, RecipeStock)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_type_round_trips_through_its_label() {
        for box_type in BoxType::ALL {
            assert_eq!(box_type.as_str().parse::<BoxType>(), Ok(box_type));
        }
        assert!("vegan".parse::<BoxType>().is_err());
    }

    #[test]
    fn catalog_deserializes_from_recipe_json() {
        let json = r#"{
            "recipe_1": {"stock_count": 12, "box_type": "vegetarian"},
            "recipe_2": {"stock_count": 3, "box_type": "gourmet"}
        }"#;
        let catalog: RecipeCatalog = serde_json::from_str(json).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("recipe_2").unwrap().stock_count, 3);
        assert_eq!(catalog.for_box_type(BoxType::Vegetarian).count(), 1);
        assert_eq!(catalog.total_stock(), 15);
    }

    #[test]
    fn unknown_box_type_is_rejected() {
        let json = r#"{"recipe_1": {"stock_count": 1, "box_type": "vegan"}}"#;
        assert!(serde_json::from_str::<RecipeCatalog>(json).is_err());
    }
}
