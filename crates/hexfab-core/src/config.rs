//! Engine configuration.

use crate::layout::{HexLayout, LayoutError};
use serde::{Deserialize, Serialize};

/// Settings fixed at engine construction. Every field has a default, so a
/// config file only needs the keys it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Center-to-corner radius of one hex cell in world units.
    pub cell_radius: f64,
    /// Ring buffer size for each event kind.
    pub event_capacity: usize,
    /// Item kinds the ledger starts with at zero, so they show up in
    /// snapshots before anything produces them.
    pub seed_items: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cell_radius: 1.0,
            event_capacity: 1024,
            seed_items: Vec::new(),
        }
    }
}

impl EngineConfig {
    pub fn layout(&self) -> Result<HexLayout, LayoutError> {
        HexLayout::new(self.cell_radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_take_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{ "cell_radius": 2.0 }"#).unwrap();
        assert_eq!(config.cell_radius, 2.0);
        assert_eq!(config.event_capacity, 1024);
        assert!(config.seed_items.is_empty());
    }

    #[test]
    fn layout_validates_radius() {
        let config = EngineConfig {
            cell_radius: -3.0,
            ..EngineConfig::default()
        };
        assert!(config.layout().is_err());
        assert!(EngineConfig::default().layout().is_ok());
    }
}
