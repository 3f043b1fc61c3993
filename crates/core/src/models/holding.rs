use serde::{Deserialize, Deserializer, Serialize};

/// The market a symbol trades on.
/// Determines which quote provider is used to fetch its price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Market {
    /// US equities (AAPL, MSFT, etc.) — quoted via Twelve Data
    #[serde(rename = "US")]
    Us,
    /// Hong Kong equities (0700, 9988, etc.) — quoted via Yahoo Finance
    #[serde(rename = "HK")]
    Hk,
    /// Synthetic positions and anything the baseline doesn't classify
    #[serde(rename = "OTHER")]
    Other,
}

impl Market {
    /// Parse a market code. Anything unrecognized maps to `Other`.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_uppercase().as_str() {
            "US" => Market::Us,
            "HK" => Market::Hk,
            _ => Market::Other,
        }
    }
}

impl Default for Market {
    fn default() -> Self {
        Market::Us
    }
}

impl<'de> Deserialize<'de> for Market {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code = String::deserialize(deserializer)?;
        Ok(Market::from_code(&code))
    }
}

impl std::fmt::Display for Market {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Market::Us => write!(f, "US"),
            Market::Hk => write!(f, "HK"),
            Market::Other => write!(f, "Other"),
        }
    }
}

/// A single baseline holding: the starting position for one symbol before
/// the trade ledger is replayed on top of it.
///
/// Loaded from the external baseline document and immutable afterwards.
/// One per symbol; symbols are uppercase identity keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Ticker symbol, uppercased (e.g., "AAPL", "0700")
    pub symbol: String,

    /// Human-readable name (e.g., "Apple Inc.")
    pub name: String,

    /// Which market the symbol trades on
    #[serde(default)]
    pub market: Market,

    /// Free-form grouping category (e.g., "tech", "etf", "other")
    pub category: String,

    /// Starting quantity held, never negative
    pub quantity: f64,

    /// Starting weighted-average cost per unit, never negative
    pub cost_basis: f64,
}

impl Holding {
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        market: Market,
        category: impl Into<String>,
        quantity: f64,
        cost_basis: f64,
    ) -> Self {
        Self {
            symbol: symbol.into().to_uppercase(),
            name: name.into(),
            market,
            category: category.into(),
            quantity,
            cost_basis,
        }
    }
}
