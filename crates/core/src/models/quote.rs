use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Latest known price per symbol.
///
/// Keys are stored uppercase and lookups normalize, so `get("aapl")` and
/// `get("AAPL")` agree. An absent entry means the quote fetch failed for
/// that symbol: such positions are listed without a price and excluded
/// from monetary totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceMap {
    prices: HashMap<String, f64>,
}

impl PriceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.prices.get(&symbol.to_uppercase()).copied()
    }

    pub fn set(&mut self, symbol: &str, price: f64) {
        self.prices.insert(symbol.to_uppercase(), price);
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.prices.contains_key(&symbol.to_uppercase())
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// All symbols with a known price, sorted for deterministic output.
    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self.prices.keys().cloned().collect();
        symbols.sort();
        symbols
    }
}

/// Result of refreshing quotes for a set of symbols: the prices that could
/// be fetched plus the symbols whose fetch failed.
#[derive(Debug, Clone, Default)]
pub struct QuoteSnapshot {
    pub prices: PriceMap,

    /// Symbols with no usable quote, in request order
    pub failed: Vec<String>,
}

impl QuoteSnapshot {
    /// Number of symbols that could not be quoted.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }
}
