//! Shared test helpers for integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::catalog::RecipeCatalog;
use crate::engine::ProductionEngine;
use crate::factory::{Factory, FactoryKind};
use crate::fixed::{Fixed64, secs};
use crate::recipe::Recipe;

// ===========================================================================
// Fixed-point helper
// ===========================================================================

pub fn fixed(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

// ===========================================================================
// Recipes
// ===========================================================================

pub fn iron_ore_recipe() -> Recipe {
    Recipe::new("iron_ore", "mine")
        .with_output("iron_ore", 1)
        .with_time(secs(4))
}

pub fn copper_ore_recipe() -> Recipe {
    Recipe::new("copper_ore", "mine")
        .with_output("copper_ore", 1)
        .with_time(secs(4))
}

pub fn smelt_iron_recipe() -> Recipe {
    Recipe::new("iron_ingot", "smelter")
        .with_input("iron_ore", 1)
        .with_output("iron_ingot", 1)
        .with_time(secs(4))
        .with_tier(1)
}

pub fn smelt_copper_recipe() -> Recipe {
    Recipe::new("copper_ingot", "smelter")
        .with_input("copper_ore", 1)
        .with_output("copper_ingot", 1)
        .with_time(secs(4))
        .with_tier(1)
}

/// One input: 1 iron ingot -> 1 iron plate.
pub fn iron_plate_recipe() -> Recipe {
    Recipe::new("iron_plate", "basic_assembler")
        .with_input("iron_ingot", 1)
        .with_output("iron_plate", 1)
        .with_time(secs(3))
        .with_tier(2)
}

/// One input with count 2: 2 iron ingots -> 1 gear.
pub fn gear_recipe() -> Recipe {
    Recipe::new("gear", "basic_assembler")
        .with_input("iron_ingot", 2)
        .with_output("gear", 1)
        .with_time(secs(3))
        .with_tier(2)
}

/// Two inputs: 1 iron ingot + 1 copper ingot -> 1 circuit.
pub fn circuit_recipe() -> Recipe {
    Recipe::new("circuit", "basic_assembler")
        .with_input("iron_ingot", 1)
        .with_input("copper_ingot", 1)
        .with_output("circuit", 1)
        .with_time(secs(3))
        .with_tier(2)
}

/// Every recipe above, all valid.
pub fn standard_catalog() -> RecipeCatalog {
    let (catalog, _) = RecipeCatalog::from_records([
        iron_ore_recipe(),
        copper_ore_recipe(),
        smelt_iron_recipe(),
        smelt_copper_recipe(),
        iron_plate_recipe(),
        gear_recipe(),
        circuit_recipe(),
    ]);
    catalog
}

// ===========================================================================
// Factories & engines
// ===========================================================================

pub fn mine(recipe_id: &str) -> Factory {
    Factory::new(FactoryKind::Extractor).with_recipe(recipe_id)
}

pub fn smelter(recipe_id: &str) -> Factory {
    Factory::new(FactoryKind::Converter).with_recipe(recipe_id)
}

pub fn assembler(recipe_id: &str) -> Factory {
    Factory::new(FactoryKind::Assembler).with_recipe(recipe_id)
}

pub fn engine_with(catalog: RecipeCatalog) -> ProductionEngine {
    ProductionEngine::with_catalog(catalog)
}
