//! Recipe catalog: validated recipes indexed by id, factory type and tier.
//!
//! Built wholesale from a sequence of records; never patched in place.
//! Invalid records are reported in the [`LoadReport`] and skipped, so one bad
//! record never aborts the load.

use crate::factory::FactoryKind;
use crate::recipe::{self, Recipe, RecipeError};
use std::collections::HashMap;
use tracing::{info, warn};

/// A record the catalog refused, with the rule it broke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRecipe {
    pub id: String,
    pub error: RecipeError,
}

/// Outcome of building a catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Number of records accepted (before id de-duplication).
    pub accepted: usize,
    pub rejected: Vec<RejectedRecipe>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecipeCatalog {
    /// Recipes in insertion order.
    recipes: Vec<Recipe>,
    id_to_index: HashMap<String, usize>,
}

impl RecipeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and index every record.
    ///
    /// On an id collision the later record replaces the earlier one but keeps
    /// the earlier one's position in insertion order.
    pub fn from_records<I>(records: I) -> (Self, LoadReport)
    where
        I: IntoIterator<Item = Recipe>,
    {
        let mut catalog = Self::new();
        let mut report = LoadReport::default();

        for record in records {
            match recipe::validate(&record) {
                Ok(()) => {
                    info!(id = %record.id, tier = record.tier, "loaded recipe");
                    catalog.insert(record);
                    report.accepted += 1;
                }
                Err(error) => {
                    warn!(id = %record.id, %error, "rejected invalid recipe");
                    report.rejected.push(RejectedRecipe {
                        id: record.id,
                        error,
                    });
                }
            }
        }

        info!(
            recipes = catalog.len(),
            rejected = report.rejected.len(),
            "recipe catalog built"
        );
        (catalog, report)
    }

    fn insert(&mut self, recipe: Recipe) {
        match self.id_to_index.get(&recipe.id) {
            Some(&index) => self.recipes[index] = recipe,
            None => {
                self.id_to_index
                    .insert(recipe.id.clone(), self.recipes.len());
                self.recipes.push(recipe);
            }
        }
    }

    pub fn by_id(&self, id: &str) -> Option<&Recipe> {
        self.id_to_index.get(id).map(|&i| &self.recipes[i])
    }

    /// Recipes targeting a factory type tag, in insertion order.
    pub fn by_factory_type(&self, factory: &str) -> Vec<&Recipe> {
        self.recipes
            .iter()
            .filter(|r| r.factory == factory)
            .collect()
    }

    /// Recipes of a tier, in insertion order.
    pub fn by_tier(&self, tier: i32) -> Vec<&Recipe> {
        self.recipes.iter().filter(|r| r.tier == tier).collect()
    }

    /// Recipes a factory kind accepts, in insertion order.
    pub fn for_kind(&self, kind: FactoryKind) -> Vec<&Recipe> {
        self.recipes.iter().filter(|r| kind.accepts(r)).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.iter()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}
