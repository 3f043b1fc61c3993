use serde::{Deserialize, Serialize};

use super::holding::{Holding, Market};

/// The current derived state for one symbol: quantity and weighted-average
/// cost after replaying the trade ledger over the baseline, plus the latest
/// quote when one is attached.
///
/// Recomputed in full on every reconciliation; never persisted or updated
/// in place. `quantity` is never negative, and `cost_basis` is 0 whenever
/// `quantity` is 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    pub name: String,
    pub market: Market,
    pub category: String,
    pub quantity: f64,
    pub cost_basis: f64,

    /// Latest quote; `None` when no price could be fetched
    pub price: Option<f64>,
}

impl Position {
    /// Seed a position from a baseline holding. No price is attached.
    pub fn from_holding(holding: &Holding) -> Self {
        Self {
            symbol: holding.symbol.to_uppercase(),
            name: holding.name.clone(),
            market: holding.market,
            category: holding.category.clone(),
            quantity: holding.quantity,
            cost_basis: holding.cost_basis,
            price: None,
        }
    }

    /// An empty position for a trade on a symbol the baseline doesn't know.
    /// The cost basis is seeded from the trade's price.
    pub fn synthetic(symbol: impl Into<String>, seed_price: f64) -> Self {
        let symbol = symbol.into().to_uppercase();
        Self {
            name: symbol.clone(),
            symbol,
            market: Market::Other,
            category: "other".to_string(),
            quantity: 0.0,
            cost_basis: seed_price,
            price: None,
        }
    }

    /// `quantity * price`, when a price is attached.
    #[must_use]
    pub fn market_value(&self) -> Option<f64> {
        self.price.map(|p| self.quantity * p)
    }

    /// `quantity * cost_basis`. Always defined.
    #[must_use]
    pub fn cost_value(&self) -> f64 {
        self.quantity * self.cost_basis
    }

    /// Whether any quantity is currently held.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.quantity > 0.0
    }
}
