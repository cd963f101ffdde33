// src/model/category.rs

use crate::error::IntegrityError;
use crate::model::orders::OrderDemand;
use crate::model::recipe::BoxType;
use std::collections::{BTreeMap, BTreeSet};

/// Number words accepted as the leading token of a category label.
const NUMBER_WORDS: [(&str, u32); 20] = [
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
    ("eleven", 11),
    ("twelve", 12),
    ("thirteen", 13),
    ("fourteen", 14),
    ("fifteen", 15),
    ("sixteen", 16),
    ("seventeen", 17),
    ("eighteen", 18),
    ("nineteen", 19),
    ("twenty", 20),
];

/// Box type whose order keys define the category sets every other box type must match.
const REFERENCE_BOX_TYPE: BoxType = BoxType::Gourmet;

/// Extracts the count encoded in a label such as `"three_recipes"` or `"4_portions"`.
///
/// The first underscore-delimited token must be either a plain decimal number or a
/// number word from one to twenty. Zero is rejected since a bucket of zero recipes
/// or zero portions cannot be allocated.
pub fn parse_category_count(label: &str) -> Result<u32, IntegrityError> {
    let token = label.split('_').next().unwrap_or_default();
    let unparseable = || IntegrityError::UnparseableCategory {
        label: label.to_string(),
    };

    let count = if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
        token.parse::<u32>().map_err(|_| unparseable())?
    } else {
        let lowered = token.to_ascii_lowercase();
        NUMBER_WORDS
            .iter()
            .find(|(word, _)| *word == lowered)
            .map(|(_, n)| *n)
            .ok_or_else(unparseable)?
    };

    if count == 0 {
        return Err(IntegrityError::ZeroCategory {
            label: label.to_string(),
        });
    }
    Ok(count)
}

/// A category label together with the count it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub label: String,
    pub count: u32,
}

/// One (recipe-count, portion-count) combination to be fulfilled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub recipe_category: Category,
    pub portion_category: Category,
}

/// Category-to-count mappings derived from the order data.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CategoryMap {
    /// Sorted by descending count.
    recipes: Vec<Category>,
    /// Sorted by descending count.
    portions: Vec<Category>,
}

impl CategoryMap {
    /// Derives both mappings from the reference box type and checks that every
    /// other known box type in `orders` uses exactly the same labels.
    pub fn derive(orders: &OrderDemand) -> Result<Self, IntegrityError> {
        let reference_recipes =
            orders
                .recipe_labels(REFERENCE_BOX_TYPE)
                .ok_or(IntegrityError::MissingBoxType {
                    box_type: REFERENCE_BOX_TYPE,
                    dataset: "orders",
                })?;
        let reference_portions = orders.portion_labels(REFERENCE_BOX_TYPE).unwrap_or_default();

        for box_type in BoxType::ALL {
            if box_type == REFERENCE_BOX_TYPE {
                continue;
            }
            if let Some(recipes) = orders.recipe_labels(box_type) {
                let portions = orders.portion_labels(box_type).unwrap_or_default();
                if recipes != reference_recipes || portions != reference_portions {
                    return Err(IntegrityError::InconsistentCategories {
                        box_type,
                        reference: REFERENCE_BOX_TYPE,
                    });
                }
            }
        }

        Ok(Self {
            recipes: Self::parse_axis(&reference_recipes)?,
            portions: Self::parse_axis(&reference_portions)?,
        })
    }

    fn parse_axis(labels: &BTreeSet<String>) -> Result<Vec<Category>, IntegrityError> {
        let mut seen: BTreeMap<u32, &str> = BTreeMap::new();
        let mut categories = Vec::with_capacity(labels.len());

        for label in labels {
            let count = parse_category_count(label)?;
            if let Some(first) = seen.insert(count, label) {
                return Err(IntegrityError::DuplicateCategory {
                    first: first.to_string(),
                    second: label.clone(),
                    count,
                });
            }
            categories.push(Category {
                label: label.clone(),
                count,
            });
        }

        categories.sort_by(|a, b| b.count.cmp(&a.count));
        Ok(categories)
    }

    pub fn recipe_categories(&self) -> &[Category] {
        &self.recipes
    }

    pub fn portion_categories(&self) -> &[Category] {
        &self.portions
    }

    /// Label-to-count view of the recipe categories.
    pub fn recipe_counts(&self) -> BTreeMap<&str, u32> {
        self.recipes.iter().map(|c| (c.label.as_str(), c.count)).collect()
    }

    /// Label-to-count view of the portion categories.
    pub fn portion_counts(&self) -> BTreeMap<&str, u32> {
        self.portions.iter().map(|c| (c.label.as_str(), c.count)).collect()
    }

    /// Every bucket, largest recipe count first and largest portion count first
    /// within each recipe count.
    pub fn buckets(&self) -> Vec<Bucket> {
        self.recipes
            .iter()
            .flat_map(|recipe| {
                self.portions.iter().map(move |portion| Bucket {
                    recipe_category: recipe.clone(),
                    portion_category: portion.clone(),
                })
            })
            .collect()
    }
}
