//! Recipe records and the structural validator.
//!
//! A [`Recipe`] is plain data handed over by a recipe source. Validity is a
//! separate predicate ([`validate`] / [`is_valid`]) that does not depend on
//! any factory instance.

use crate::fixed::Fixed64;
use serde::{Deserialize, Serialize};

/// Most inputs any recipe may declare.
pub const MAX_RECIPE_INPUTS: usize = 2;

/// Inclusive tier range.
pub const MIN_TIER: i32 = 0;
pub const MAX_TIER: i32 = 5;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// An item kind with a quantity. The count is signed so malformed source
/// data survives deserialization and is rejected by validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemCount {
    pub item: String,
    pub count: i32,
}

impl ItemCount {
    pub fn new(item: impl Into<String>, count: i32) -> Self {
        Self {
            item: item.into(),
            count,
        }
    }

    /// The count as a ledger quantity. Non-positive counts map to zero.
    pub fn quantity(&self) -> u64 {
        u64::try_from(self.count).unwrap_or(0)
    }
}

/// A declarative transformation: inputs to a single output over a craft time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub inputs: Vec<ItemCount>,
    pub output: Option<ItemCount>,
    pub craft_time: Fixed64,
    /// Tag of the factory type that runs this recipe (`"mine"`, `"smelter"`, ...).
    pub factory: String,
    pub tier: i32,
}

impl Recipe {
    /// Start a recipe with no inputs, no output, zero time and tier 0.
    pub fn new(id: impl Into<String>, factory: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            inputs: Vec::new(),
            output: None,
            craft_time: Fixed64::ZERO,
            factory: factory.into(),
            tier: 0,
        }
    }

    pub fn with_input(mut self, item: impl Into<String>, count: i32) -> Self {
        self.inputs.push(ItemCount::new(item, count));
        self
    }

    pub fn with_output(mut self, item: impl Into<String>, count: i32) -> Self {
        self.output = Some(ItemCount::new(item, count));
        self
    }

    pub fn with_time(mut self, craft_time: Fixed64) -> Self {
        self.craft_time = craft_time;
        self
    }

    pub fn with_tier(mut self, tier: i32) -> Self {
        self.tier = tier;
        self
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// The first structural rule a recipe breaks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecipeError {
    #[error("recipe declares {0} inputs, at most 2 are allowed")]
    TooManyInputs(usize),
    #[error("recipe has no output")]
    MissingOutput,
    #[error("output item kind is empty")]
    EmptyOutputItem,
    #[error("output count must be positive, got {0}")]
    NonPositiveOutputCount(i32),
    #[error("craft time must be positive")]
    NonPositiveTime,
    #[error("factory type tag is empty")]
    EmptyFactoryTag,
    #[error("input {index} has an empty item kind")]
    EmptyInputItem { index: usize },
    #[error("input {index} count must be positive, got {count}")]
    NonPositiveInputCount { index: usize, count: i32 },
    #[error("tier {0} is outside 0..=5")]
    TierOutOfRange(i32),
}

/// Check every structural rule, reporting the first failure.
pub fn validate(recipe: &Recipe) -> Result<(), RecipeError> {
    if recipe.inputs.len() > MAX_RECIPE_INPUTS {
        return Err(RecipeError::TooManyInputs(recipe.inputs.len()));
    }

    let output = recipe.output.as_ref().ok_or(RecipeError::MissingOutput)?;
    if output.item.is_empty() {
        return Err(RecipeError::EmptyOutputItem);
    }
    if output.count <= 0 {
        return Err(RecipeError::NonPositiveOutputCount(output.count));
    }

    if recipe.craft_time <= Fixed64::ZERO {
        return Err(RecipeError::NonPositiveTime);
    }

    if recipe.factory.is_empty() {
        return Err(RecipeError::EmptyFactoryTag);
    }

    for (index, input) in recipe.inputs.iter().enumerate() {
        if input.item.is_empty() {
            return Err(RecipeError::EmptyInputItem { index });
        }
        if input.count <= 0 {
            return Err(RecipeError::NonPositiveInputCount {
                index,
                count: input.count,
            });
        }
    }

    if !(MIN_TIER..=MAX_TIER).contains(&recipe.tier) {
        return Err(RecipeError::TierOutOfRange(recipe.tier));
    }

    Ok(())
}

/// Whether a recipe passes every structural rule.
pub fn is_valid(recipe: &Recipe) -> bool {
    validate(recipe).is_ok()
}
