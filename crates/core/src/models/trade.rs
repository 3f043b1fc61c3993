use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single user-recorded trade in the ledger.
///
/// Quantity is signed: positive buys, negative sells. The ledger is
/// append-only and only ever bulk-cleared; replay happens in recorded
/// order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Unique identifier
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    /// Ticker symbol, uppercased
    pub symbol: String,

    /// Signed quantity: positive = buy, negative = sell; never zero
    pub quantity: f64,

    /// Execution price per unit, always positive
    pub price: f64,

    /// Unix timestamp in milliseconds at which the trade was recorded
    #[serde(default)]
    pub timestamp: i64,
}

impl Trade {
    pub fn new(symbol: impl Into<String>, quantity: f64, price: f64, timestamp: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            symbol: symbol.into().to_uppercase(),
            quantity,
            price,
            timestamp,
        }
    }

    pub fn is_buy(&self) -> bool {
        self.quantity > 0.0
    }

    pub fn is_sell(&self) -> bool {
        self.quantity < 0.0
    }

    /// When the trade was recorded, if the timestamp is representable.
    #[must_use]
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}
