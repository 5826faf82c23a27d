//! Serde data file structs for recipes and run configuration.
//!
//! These structs define the on-disk format. They are deserialized from RON,
//! JSON, or TOML data files and then converted into core types by the loader.
//! Every recipe field is optional on disk: anything missing takes a default
//! that validation rejects, so a malformed record is reported rather than
//! failing the whole file.

use hexfab_core::config::EngineConfig;
use hexfab_core::factory::{Factory, FactoryKind, UnknownFactoryType};
use hexfab_core::fixed::{Fixed64, f64_to_fixed64_saturating};
use hexfab_core::hex::AxialCoord;
use hexfab_core::recipe::{ItemCount, Recipe};
use serde::Deserialize;
use std::path::PathBuf;

// ===========================================================================
// Recipes
// ===========================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ItemCountData {
    pub item: String,
    pub count: i32,
}

/// A recipe record as written in a data file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RecipeData {
    pub id: String,
    pub inputs: Vec<ItemCountData>,
    pub output: Option<ItemCountData>,
    /// Craft time in seconds.
    pub time: f64,
    pub factory: String,
    pub tier: i32,
}

impl From<ItemCountData> for ItemCount {
    fn from(data: ItemCountData) -> Self {
        ItemCount::new(data.item, data.count)
    }
}

impl From<RecipeData> for Recipe {
    /// Times beyond the fixed-point range clamp to its bounds. NaN becomes
    /// zero, which validation then rejects.
    fn from(data: RecipeData) -> Self {
        Recipe {
            id: data.id,
            inputs: data.inputs.into_iter().map(ItemCount::from).collect(),
            output: data.output.map(ItemCount::from),
            craft_time: f64_to_fixed64_saturating(data.time).unwrap_or(Fixed64::ZERO),
            factory: data.factory,
            tier: data.tier,
        }
    }
}

// ===========================================================================
// Demo runs
// ===========================================================================

/// One factory to place before the run starts.
#[derive(Debug, Clone, Deserialize)]
pub struct PlacementData {
    pub q: i32,
    pub r: i32,
    /// Factory type tag (`"mine"`, `"smelter"`, `"basic_assembler"`).
    pub factory: String,
    #[serde(default)]
    pub recipe: Option<String>,
}

impl PlacementData {
    pub fn coord(&self) -> AxialCoord {
        AxialCoord::new(self.q, self.r)
    }

    pub fn to_factory(&self) -> Result<Factory, UnknownFactoryType> {
        let kind: FactoryKind = self.factory.parse()?;
        let factory = Factory::new(kind);
        Ok(match &self.recipe {
            Some(id) => factory.with_recipe(id.clone()),
            None => factory,
        })
    }
}

/// A scripted headless run.
#[derive(Debug, Clone, Deserialize)]
pub struct DemoConfig {
    /// Number of ticks to run.
    pub ticks: u64,
    /// Seconds per tick.
    pub delta: f64,
    /// Recipe file, relative to the demo config file.
    pub recipes: PathBuf,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub placements: Vec<PlacementData>,
}
