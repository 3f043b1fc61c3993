use serde::Deserialize;

use crate::errors::CoreError;
use crate::models::holding::{Holding, Market};

/// Raw baseline record as it appears in the external document.
/// Everything except the symbol is optional; the loader normalizes sparse
/// records the same way the tracker always has.
#[derive(Debug, Deserialize)]
struct BaselineRecord {
    symbol: String,

    name: Option<String>,

    #[serde(default)]
    market: Market,

    category: Option<String>,

    #[serde(default, alias = "qty")]
    quantity: f64,

    #[serde(default, alias = "cost")]
    cost_basis: f64,
}

/// Loads and normalizes the base holdings list from a JSON document.
pub struct BaselineLoader;

impl BaselineLoader {
    /// Parse a baseline document.
    ///
    /// Symbols are uppercased; an empty or missing name defaults to the
    /// symbol, the category to "other". Records with an empty symbol or a
    /// non-finite or negative quantity/cost are rejected. Duplicate symbols
    /// resolve last-wins.
    pub fn load_from_json(json: &str) -> Result<Vec<Holding>, CoreError> {
        let records: Vec<BaselineRecord> = serde_json::from_str(json)?;

        let mut holdings: Vec<Holding> = Vec::with_capacity(records.len());
        for record in records {
            let symbol = record.symbol.trim().to_uppercase();
            if symbol.is_empty() {
                return Err(CoreError::ValidationError(
                    "Baseline record has an empty symbol".into(),
                ));
            }
            if !record.quantity.is_finite() || record.quantity < 0.0 {
                return Err(CoreError::ValidationError(format!(
                    "Baseline quantity for {symbol} must be finite and non-negative, got {}",
                    record.quantity
                )));
            }
            if !record.cost_basis.is_finite() || record.cost_basis < 0.0 {
                return Err(CoreError::ValidationError(format!(
                    "Baseline cost for {symbol} must be finite and non-negative, got {}",
                    record.cost_basis
                )));
            }

            let holding = Holding {
                name: record
                    .name
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or_else(|| symbol.clone()),
                market: record.market,
                category: record.category.unwrap_or_else(|| "other".to_string()),
                quantity: record.quantity,
                cost_basis: record.cost_basis,
                symbol,
            };

            // Last record wins for a repeated symbol
            if let Some(existing) = holdings.iter_mut().find(|h| h.symbol == holding.symbol) {
                *existing = holding;
            } else {
                holdings.push(holding);
            }
        }

        Ok(holdings)
    }

    /// Load the baseline from a file on disk.
    pub fn load_from_file(path: &str) -> Result<Vec<Holding>, CoreError> {
        let json = std::fs::read_to_string(path)?;
        Self::load_from_json(&json)
    }
}
