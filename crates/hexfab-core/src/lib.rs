//! Hexfab Core -- a tick-driven production-chain simulator on a hex grid.
//!
//! Factories occupy cells of an unbounded hex grid (one per cell), run
//! recipes drawn from a validated catalog, and move items through a single
//! shared resource ledger. Time is supplied from outside: the host calls
//! [`engine::ProductionEngine::advance`] once per frame or tick.
//!
//! # Tick Pipeline
//!
//! 1. **Pre-tick** -- Publish placement changes queued by the grid.
//! 2. **Accumulate** -- Every factory adds `dt` toward its craft time.
//! 3. **Extraction** -- Ready mines add their output to the ledger.
//! 4. **Conversion** -- Ready smelters swap one input for one output.
//! 5. **Assembly** -- Ready assemblers draw all inputs at once or none.
//! 6. **Post-tick** -- Deliver buffered events and bump the tick counter.
//!
//! Output produced during a tick is only spendable from the next tick on.
//!
//! # Key Types
//!
//! - [`hex::AxialCoord`] / [`hex::CubeCoord`] -- cell addressing, distance
//!   and neighbors.
//! - [`layout::HexLayout`] -- flat-topped world geometry.
//! - [`grid::HexGrid`] -- occupancy store, the single source of truth for
//!   the one-factory-per-cell rule.
//! - [`factory::FactoryKind`] -- the closed set of factory variants and
//!   their behavior table.
//! - [`recipe::Recipe`] / [`catalog::RecipeCatalog`] -- recipe records, the
//!   structural validator and the indexed catalog.
//! - [`ledger::ResourceLedger`] -- item stock shared by every factory.
//! - [`event::EventBus`] -- typed events with buffered delivery.
//! - [`fixed::Fixed64`] -- Q32.32 fixed-point type for simulated time.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod event;
pub mod factory;
pub mod fixed;
pub mod grid;
pub mod hex;
pub mod id;
pub mod layout;
pub mod ledger;
pub mod recipe;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
