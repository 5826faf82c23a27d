//! The shared resource ledger: item kind to non-negative quantity.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("insufficient {item}: requested {requested}, available {available}")]
    Insufficient {
        item: String,
        requested: u64,
        available: u64,
    },
}

/// Immutable copy of the ledger taken between ticks.
pub type LedgerSnapshot = BTreeMap<String, u64>;

/// Resource stock keyed by item kind. Missing kinds read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLedger {
    stock: BTreeMap<String, u64>,
}

impl ResourceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// A ledger with zeroed counters for the given item kinds, so they show up
    /// in snapshots before anything is produced.
    pub fn with_items<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            stock: items.into_iter().map(|item| (item.into(), 0)).collect(),
        }
    }

    pub fn get(&self, item: &str) -> u64 {
        self.stock.get(item).copied().unwrap_or(0)
    }

    pub fn has(&self, item: &str, quantity: u64) -> bool {
        self.get(item) >= quantity
    }

    /// Add to an item's stock, saturating at `u64::MAX`.
    pub fn add(&mut self, item: &str, quantity: u64) {
        match self.stock.get_mut(item) {
            Some(current) => *current = current.saturating_add(quantity),
            None => {
                self.stock.insert(item.to_string(), quantity);
            }
        }
    }

    /// Remove from an item's stock. Nothing changes when the stock is short.
    pub fn remove(&mut self, item: &str, quantity: u64) -> Result<(), LedgerError> {
        let available = self.get(item);
        if available < quantity {
            return Err(LedgerError::Insufficient {
                item: item.to_string(),
                requested: quantity,
                available,
            });
        }
        if let Some(current) = self.stock.get_mut(item) {
            *current -= quantity;
        }
        Ok(())
    }

    pub fn set(&mut self, item: &str, quantity: u64) {
        self.stock.insert(item.to_string(), quantity);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.stock.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn total(&self) -> u64 {
        self.stock.values().fold(0u64, |acc, v| acc.saturating_add(*v))
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        self.stock.clone()
    }
}
