use serde::{Deserialize, Serialize};

use super::position::Position;

/// Which attribute the allocation breakdown groups positions by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllocationDimension {
    /// Group by the free-form category (e.g., "tech", "etf")
    Category,
    /// Group by market (US, HK, Other)
    Market,
    /// One group per symbol
    Symbol,
}

impl AllocationDimension {
    /// Extract the grouping key for a position.
    pub fn key_of(&self, position: &Position) -> String {
        match self {
            AllocationDimension::Category => position.category.clone(),
            AllocationDimension::Market => position.market.to_string(),
            AllocationDimension::Symbol => position.symbol.clone(),
        }
    }
}

/// One slice of the allocation breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationSlice {
    pub key: String,

    /// Aggregate market value of the group
    pub value: f64,

    /// Share of total portfolio value, 0 to 100; 0 when the total is 0
    pub percent_of_total: f64,
}
