//! The production engine: one tick-driven pass over every placed factory.
//!
//! Each call to [`ProductionEngine::advance`] runs the same pipeline:
//!
//! 1. **Pre-tick** -- publish placement changes recorded by the grid.
//! 2. **Accumulate** -- add `dt` to every factory's elapsed time.
//! 3. **Stages** -- extraction, then conversion, then assembly. Each stage
//!    visits its factories in row-major order.
//! 4. **Post-tick** -- emit `TickCompleted`, deliver events, bump the tick.
//!
//! # Stage visibility
//!
//! A copy of the ledger is taken when the tick starts. Consumers check and
//! draw from that copy (minus what earlier consumers already drew this tick),
//! while output is credited only to the real ledger. Anything produced during
//! a tick is therefore spendable from the next tick on, at every hop of a
//! chain.

use crate::catalog::RecipeCatalog;
use crate::config::EngineConfig;
use crate::event::{Event, EventBus, EventKind, PassiveListener};
use crate::factory::{Factory, FactoryInfo, Stage, StallReason};
use crate::fixed::{Fixed64, Ticks};
use crate::grid::{GridError, HexGrid};
use crate::hex::AxialCoord;
use crate::id::FactoryId;
use crate::layout::{HexLayout, LayoutError};
use crate::ledger::{LedgerError, LedgerSnapshot, ResourceLedger};
use crate::recipe::Recipe;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

// ---------------------------------------------------------------------------
// Errors and results
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("tick delta must not be negative, got {0}")]
    NegativeDelta(Fixed64),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// What one tick did.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TickReport {
    pub tick: Ticks,
    /// Total output per item kind.
    pub produced: BTreeMap<String, u64>,
    /// Total input drawn per item kind.
    pub consumed: BTreeMap<String, u64>,
    /// Ready factories that lacked inputs, in visiting order.
    pub starved: Vec<AxialCoord>,
    /// The ledger after the tick.
    pub ledger: LedgerSnapshot,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct ProductionEngine {
    grid: HexGrid,
    catalog: RecipeCatalog,
    ledger: ResourceLedger,
    events: EventBus,
    layout: HexLayout,
    /// Completed ticks.
    tick: Ticks,
}

impl ProductionEngine {
    pub fn new(config: &EngineConfig, catalog: RecipeCatalog) -> Result<Self, EngineError> {
        Ok(Self {
            grid: HexGrid::new(),
            catalog,
            ledger: ResourceLedger::with_items(config.seed_items.iter().cloned()),
            events: EventBus::new(config.event_capacity),
            layout: config.layout()?,
            tick: 0,
        })
    }

    /// An engine with default settings.
    pub fn with_catalog(catalog: RecipeCatalog) -> Self {
        Self {
            grid: HexGrid::new(),
            catalog,
            ledger: ResourceLedger::new(),
            events: EventBus::default(),
            layout: HexLayout::default(),
            tick: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Advance
    // -----------------------------------------------------------------------

    /// Run one full pass. A negative `dt` is rejected before anything changes.
    pub fn advance(&mut self, dt: Fixed64) -> Result<TickReport, EngineError> {
        if dt < Fixed64::ZERO {
            return Err(EngineError::NegativeDelta(dt));
        }
        let tick = self.tick + 1;

        self.phase_pre_tick(tick);
        self.phase_accumulate(dt);

        let mut report = TickReport {
            tick,
            ..TickReport::default()
        };
        let mut spendable = self.ledger.clone();
        for stage in Stage::ORDER {
            self.run_stage(stage, tick, &mut spendable, &mut report)?;
        }

        self.phase_post_tick(tick);
        report.ledger = self.ledger.snapshot();

        debug!(
            tick,
            produced = report.produced.values().sum::<u64>(),
            consumed = report.consumed.values().sum::<u64>(),
            starved = report.starved.len(),
            "tick complete"
        );
        Ok(report)
    }

    fn phase_pre_tick(&mut self, tick: Ticks) {
        for change in self.grid.drain_changes() {
            self.events.emit(change.into_event(tick));
        }
    }

    fn phase_accumulate(&mut self, dt: Fixed64) {
        for factory in self.grid.factories_mut() {
            factory.accumulate(dt);
        }
    }

    fn run_stage(
        &mut self,
        stage: Stage,
        tick: Ticks,
        spendable: &mut ResourceLedger,
        report: &mut TickReport,
    ) -> Result<(), EngineError> {
        let ready: Vec<AxialCoord> = self
            .grid
            .iter()
            .filter(|(_, f)| f.kind().stage() == stage && f.is_ready())
            .map(|(coord, _)| coord)
            .collect();

        for coord in ready {
            let Some(recipe) = self.grid.get(coord).and_then(|f| self.recipe_for(f)) else {
                debug!(%coord, "ready factory has no usable recipe");
                self.events.emit(Event::FactoryStalled {
                    coord,
                    reason: StallReason::NoRecipe,
                    tick,
                });
                continue;
            };
            let recipe = recipe.clone();

            let needs = requirements(&recipe);
            if !needs.iter().all(|(item, qty)| spendable.has(item, *qty)) {
                debug!(%coord, recipe = %recipe.id, "factory starved");
                report.starved.push(coord);
                self.events.emit(Event::FactoryStalled {
                    coord,
                    reason: StallReason::MissingInputs,
                    tick,
                });
                continue;
            }

            for (item, qty) in needs {
                spendable.remove(item, qty)?;
                self.ledger.remove(item, qty)?;
                *report.consumed.entry(item.to_string()).or_default() += qty;
                self.events.emit(Event::ItemConsumed {
                    coord,
                    item: item.to_string(),
                    quantity: qty,
                    tick,
                });
            }

            if let Some(output) = &recipe.output {
                let qty = output.quantity();
                self.ledger.add(&output.item, qty);
                *report.produced.entry(output.item.clone()).or_default() += qty;
                self.events.emit(Event::ItemProduced {
                    coord,
                    item: output.item.clone(),
                    quantity: qty,
                    tick,
                });
            }

            if let Some(factory) = self.grid.get_mut(coord) {
                factory.reset_progress();
            }
        }
        Ok(())
    }

    /// The catalog recipe a factory is assigned, if its kind accepts it.
    fn recipe_for(&self, factory: &Factory) -> Option<&Recipe> {
        let recipe = self.catalog.by_id(factory.recipe_id()?)?;
        factory.kind().accepts(recipe).then_some(recipe)
    }

    fn phase_post_tick(&mut self, tick: Ticks) {
        self.events.emit(Event::TickCompleted { tick });
        self.events.deliver();
        self.tick = tick;
    }

    // -----------------------------------------------------------------------
    // Placement
    // -----------------------------------------------------------------------

    pub fn place(&mut self, coord: AxialCoord, factory: Factory) -> Result<FactoryId, GridError> {
        self.grid.place(coord, factory)
    }

    pub fn remove(&mut self, coord: AxialCoord) -> Result<Factory, GridError> {
        self.grid.remove(coord)
    }

    pub fn assign_recipe(
        &mut self,
        coord: AxialCoord,
        recipe_id: Option<String>,
    ) -> Result<(), GridError> {
        self.grid.assign_recipe(coord, recipe_id)
    }

    /// Swap in a freshly built catalog. Factories keep their recipe ids and
    /// resolve them against the new catalog on their next craft.
    pub fn reload_catalog(&mut self, catalog: RecipeCatalog) {
        self.catalog = catalog;
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn ledger_snapshot(&self) -> LedgerSnapshot {
        self.ledger.snapshot()
    }

    pub fn occupancy_at(&self, coord: AxialCoord) -> Option<FactoryInfo> {
        self.grid.info_at(coord)
    }

    /// Occupied neighbors of `coord`, in direction order.
    pub fn neighbors_of(&self, coord: AxialCoord) -> Vec<FactoryInfo> {
        self.grid
            .neighbors_of(coord)
            .into_iter()
            .map(|(c, f)| FactoryInfo::new(c, f))
            .collect()
    }

    pub fn grid(&self) -> &HexGrid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut HexGrid {
        &mut self.grid
    }

    pub fn catalog(&self) -> &RecipeCatalog {
        &self.catalog
    }

    pub fn ledger(&self) -> &ResourceLedger {
        &self.ledger
    }

    /// For seeding stock between ticks.
    pub fn ledger_mut(&mut self) -> &mut ResourceLedger {
        &mut self.ledger
    }

    pub fn layout(&self) -> &HexLayout {
        &self.layout
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    pub fn on_passive(&mut self, kind: EventKind, listener: PassiveListener) {
        self.events.on_passive(kind, listener);
    }

    /// Number of completed ticks.
    pub fn tick(&self) -> Ticks {
        self.tick
    }
}

/// Input quantities per item kind, summed over repeated entries.
fn requirements(recipe: &Recipe) -> BTreeMap<&str, u64> {
    let mut needs = BTreeMap::new();
    for input in &recipe.inputs {
        *needs.entry(input.item.as_str()).or_insert(0u64) += input.quantity();
    }
    needs
}
