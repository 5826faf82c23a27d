//! Factory variants and placed factory instances.
//!
//! [`FactoryKind`] is a closed set of three variants with a fixed behavior
//! table: input arity, craft time, tier, production stage and the recipe
//! acceptance rule. Every variant has exactly one output.

use crate::fixed::Fixed64;
use crate::hex::AxialCoord;
use crate::recipe::{self, Recipe};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every factory produces exactly one item kind.
pub const MAX_OUTPUTS: usize = 1;

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

/// Production stages, run in [`Stage::ORDER`] on every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    Extraction,
    Conversion,
    Assembly,
}

impl Stage {
    pub const ORDER: [Stage; 3] = [Stage::Extraction, Stage::Conversion, Stage::Assembly];
}

/// Why a ready factory did not craft this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StallReason {
    /// Starved: the ledger lacks at least one declared input.
    MissingInputs,
    /// No recipe assigned, the id is not in the catalog, or the kind does not
    /// accept it.
    NoRecipe,
}

// ---------------------------------------------------------------------------
// Factory kinds
// ---------------------------------------------------------------------------

/// The three built-in factory variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FactoryKind {
    /// Mine: no inputs, extracts a raw resource.
    Extractor,
    /// Smelter: one input.
    Converter,
    /// Basic assembler: one or two inputs.
    Assembler,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown factory type tag '{0}'")]
pub struct UnknownFactoryType(pub String);

impl FactoryKind {
    pub fn all() -> [FactoryKind; 3] {
        [
            FactoryKind::Extractor,
            FactoryKind::Converter,
            FactoryKind::Assembler,
        ]
    }

    /// The tag recipes use to target this kind.
    pub fn tag(self) -> &'static str {
        match self {
            FactoryKind::Extractor => "mine",
            FactoryKind::Converter => "smelter",
            FactoryKind::Assembler => "basic_assembler",
        }
    }

    pub fn max_inputs(self) -> usize {
        match self {
            FactoryKind::Extractor => 0,
            FactoryKind::Converter => 1,
            FactoryKind::Assembler => 2,
        }
    }

    pub fn max_outputs(self) -> usize {
        MAX_OUTPUTS
    }

    /// Seconds per crafting cycle.
    pub fn craft_time(self) -> Fixed64 {
        match self {
            FactoryKind::Extractor | FactoryKind::Converter => Fixed64::from_num(4),
            FactoryKind::Assembler => Fixed64::from_num(3),
        }
    }

    pub fn tier(self) -> i32 {
        match self {
            FactoryKind::Extractor => 0,
            FactoryKind::Converter => 1,
            FactoryKind::Assembler => 2,
        }
    }

    pub fn stage(self) -> Stage {
        match self {
            FactoryKind::Extractor => Stage::Extraction,
            FactoryKind::Converter => Stage::Conversion,
            FactoryKind::Assembler => Stage::Assembly,
        }
    }

    /// Whether this kind can run `recipe`.
    ///
    /// The shared precondition (valid recipe, matching tag, input count within
    /// `max_inputs`) is tightened per variant: extractors need exactly zero
    /// inputs, converters exactly one, assemblers one or two.
    pub fn accepts(self, recipe: &Recipe) -> bool {
        if !recipe::is_valid(recipe)
            || recipe.factory != self.tag()
            || recipe.inputs.len() > self.max_inputs()
        {
            return false;
        }
        let n = recipe.inputs.len();
        match self {
            FactoryKind::Extractor => n == 0,
            FactoryKind::Converter => n == 1,
            FactoryKind::Assembler => (1..=2).contains(&n),
        }
    }
}

impl FromStr for FactoryKind {
    type Err = UnknownFactoryType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FactoryKind::all()
            .into_iter()
            .find(|kind| kind.tag() == s)
            .ok_or_else(|| UnknownFactoryType(s.to_string()))
    }
}

impl fmt::Display for FactoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// ---------------------------------------------------------------------------
// Placed instances
// ---------------------------------------------------------------------------

/// A factory instance as owned by the grid: its kind, the recipe it runs and
/// the time accumulated toward the current cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Factory {
    kind: FactoryKind,
    recipe: Option<String>,
    elapsed: Fixed64,
}

impl Factory {
    pub fn new(kind: FactoryKind) -> Self {
        Self {
            kind,
            recipe: None,
            elapsed: Fixed64::ZERO,
        }
    }

    /// Assign the recipe this factory runs, by catalog id.
    pub fn with_recipe(mut self, recipe_id: impl Into<String>) -> Self {
        self.recipe = Some(recipe_id.into());
        self
    }

    pub fn kind(&self) -> FactoryKind {
        self.kind
    }

    pub fn recipe_id(&self) -> Option<&str> {
        self.recipe.as_deref()
    }

    /// Replace the recipe and restart the cycle.
    pub fn set_recipe(&mut self, recipe_id: Option<String>) {
        self.recipe = recipe_id;
        self.reset_progress();
    }

    pub fn elapsed(&self) -> Fixed64 {
        self.elapsed
    }

    /// Fraction of the current cycle completed, in `[0, 1]`.
    pub fn progress(&self) -> Fixed64 {
        (self.elapsed / self.kind.craft_time()).min(Fixed64::ONE)
    }

    /// Whether the current cycle has completed.
    pub fn is_ready(&self) -> bool {
        self.elapsed >= self.kind.craft_time()
    }

    /// Accumulate simulated time. Elapsed time saturates at one full cycle,
    /// so a factory that cannot craft stays ready without drifting further.
    pub fn accumulate(&mut self, dt: Fixed64) {
        self.elapsed = self.elapsed.saturating_add(dt).min(self.kind.craft_time());
    }

    pub fn reset_progress(&mut self) {
        self.elapsed = Fixed64::ZERO;
    }
}

/// Read-only view of a placed factory for presentation layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactoryInfo {
    pub coord: AxialCoord,
    pub kind: FactoryKind,
    pub tier: i32,
    pub max_inputs: usize,
    pub recipe: Option<String>,
    pub progress: Fixed64,
}

impl FactoryInfo {
    pub fn new(coord: AxialCoord, factory: &Factory) -> Self {
        Self {
            coord,
            kind: factory.kind(),
            tier: factory.kind().tier(),
            max_inputs: factory.kind().max_inputs(),
            recipe: factory.recipe_id().map(str::to_string),
            progress: factory.progress(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::secs;

    fn recipe(factory: &str, inputs: &[&str]) -> Recipe {
        let mut r = Recipe::new("r", factory)
            .with_output("out", 1)
            .with_time(secs(4))
            .with_tier(1);
        for item in inputs {
            r = r.with_input(*item, 1);
        }
        r
    }

    #[test]
    fn arity_limits_and_single_output() {
        for kind in FactoryKind::all() {
            assert!(kind.max_inputs() <= 2);
            assert_eq!(kind.max_outputs(), 1);
        }
        assert_eq!(FactoryKind::Extractor.max_inputs(), 0);
        assert_eq!(FactoryKind::Converter.max_inputs(), 1);
        assert_eq!(FactoryKind::Assembler.max_inputs(), 2);
    }

    #[test]
    fn behavior_table() {
        assert_eq!(FactoryKind::Extractor.craft_time(), secs(4));
        assert_eq!(FactoryKind::Converter.craft_time(), secs(4));
        assert_eq!(FactoryKind::Assembler.craft_time(), secs(3));
        assert_eq!(FactoryKind::Extractor.tier(), 0);
        assert_eq!(FactoryKind::Converter.tier(), 1);
        assert_eq!(FactoryKind::Assembler.tier(), 2);
    }

    #[test]
    fn mine_accepts_only_zero_input_mine_recipes() {
        let mine = FactoryKind::Extractor;
        assert!(mine.accepts(&recipe("mine", &[])));
        assert!(!mine.accepts(&recipe("mine", &["ore"])));
        assert!(!mine.accepts(&recipe("smelter", &[])));
    }

    #[test]
    fn smelter_requires_exactly_one_input() {
        let smelter = FactoryKind::Converter;
        assert!(smelter.accepts(&recipe("smelter", &["iron_ore"])));
        assert!(!smelter.accepts(&recipe("smelter", &[])));
        assert!(!smelter.accepts(&recipe("smelter", &["a", "b"])));
        assert!(!smelter.accepts(&recipe("basic_assembler", &["iron_ore"])));
    }

    #[test]
    fn assembler_allows_one_or_two_inputs() {
        let asm = FactoryKind::Assembler;
        assert!(asm.accepts(&recipe("basic_assembler", &["a"])));
        assert!(asm.accepts(&recipe("basic_assembler", &["a", "b"])));
        assert!(!asm.accepts(&recipe("basic_assembler", &[])));
        assert!(!asm.accepts(&recipe("smelter", &["a"])));
    }

    #[test]
    fn invalid_recipes_are_never_accepted() {
        let bad = recipe("smelter", &["iron_ore"]).with_tier(6);
        assert!(!FactoryKind::Converter.accepts(&bad));
    }

    #[test]
    fn tags_round_trip() {
        for kind in FactoryKind::all() {
            assert_eq!(kind.tag().parse::<FactoryKind>().unwrap(), kind);
        }
        assert!("refinery".parse::<FactoryKind>().is_err());
    }

    #[test]
    fn progress_saturates_at_one_cycle() {
        let mut f = Factory::new(FactoryKind::Assembler);
        f.accumulate(secs(1));
        assert!(!f.is_ready());
        f.accumulate(secs(1));
        f.accumulate(secs(1));
        assert!(f.is_ready());
        assert_eq!(f.progress(), Fixed64::ONE);
        f.accumulate(secs(10));
        assert_eq!(f.elapsed(), secs(3));
    }

    #[test]
    fn changing_recipe_resets_progress() {
        let mut f = Factory::new(FactoryKind::Converter).with_recipe("iron_ingot");
        f.accumulate(secs(2));
        f.set_recipe(Some("copper_ingot".into()));
        assert_eq!(f.elapsed(), Fixed64::ZERO);
        assert_eq!(f.recipe_id(), Some("copper_ingot"));
    }
}
