//! # hexfab-demo -- headless production run
//!
//! Loads a demo config (TOML/RON/JSON), builds the recipe catalog, places the
//! scripted factories and advances the engine a fixed number of ticks,
//! logging the ledger after each one.
//!
//! ```text
//! hexfab-demo [path/to/demo.toml]
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use anyhow::{Context, Result};
use hexfab_core::engine::ProductionEngine;
use hexfab_core::event::{Event, EventKind};
use hexfab_core::fixed::{Fixed64, f64_to_fixed64};
use hexfab_core::hex::AxialCoord;
use hexfab_data::{load_catalog, load_demo_config};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/demo.toml");

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let demo = load_demo_config(&config_path)
        .with_context(|| format!("loading demo config {}", config_path.display()))?;
    let dt = f64_to_fixed64(demo.delta)
        .filter(|dt| *dt >= Fixed64::ZERO)
        .with_context(|| format!("tick delta {} is not a usable duration", demo.delta))?;

    let (catalog, report) = load_catalog(&demo.recipes);
    if !report.is_clean() {
        warn!(rejected = report.rejected.len(), "some recipes were rejected");
    }
    let mut engine = ProductionEngine::new(&demo.engine, catalog)?;

    engine.on_passive(
        EventKind::ItemProduced,
        Box::new(|event| {
            if let Event::ItemProduced {
                coord,
                item,
                quantity,
                tick,
            } = event
            {
                info!(tick, %coord, %item, quantity, "produced");
            }
        }),
    );

    for placement in &demo.placements {
        let factory = placement.to_factory()?;
        engine.place(placement.coord(), factory)?;
    }

    let origin = AxialCoord::ORIGIN;
    let hub = engine.neighbors_of(origin);
    info!(
        factories = engine.grid().len(),
        neighbors_of_origin = hub.len(),
        "layout ready"
    );

    for _ in 0..demo.ticks {
        let report = engine.advance(dt)?;
        let ledger = report
            .ledger
            .iter()
            .map(|(item, count)| format!("{item}={count}"))
            .collect::<Vec<_>>()
            .join(" ");
        info!(tick = report.tick, starved = report.starved.len(), %ledger, "tick");
    }

    Ok(())
}
