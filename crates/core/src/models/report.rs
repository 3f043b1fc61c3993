use serde::{Deserialize, Serialize};

/// One row of the portfolio summary: a single open position valued against
/// the latest quote.
///
/// `market_value`, `pnl`, and `pnl_pct` are `None` exactly when no price is
/// available for the symbol. Such rows stay in the listing but are excluded
/// from the totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionReport {
    pub symbol: String,
    pub name: String,

    /// Quantity currently held (always positive in a report row)
    pub quantity: f64,

    /// Weighted-average cost per unit
    pub cost_basis: f64,

    /// Latest quote, if one was available
    pub price: Option<f64>,

    /// quantity * price
    pub market_value: Option<f64>,

    /// quantity * cost_basis
    pub cost_value: f64,

    /// market_value - cost_value
    pub pnl: Option<f64>,

    /// pnl / cost_value as a fraction (0.25 = +25%); 0 when cost_value is 0
    pub pnl_pct: Option<f64>,
}

/// Portfolio-level sums over all priced open positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioTotals {
    pub total_value: f64,
    pub total_cost: f64,

    /// total_value - total_cost
    pub total_pnl: f64,

    /// total_pnl / total_cost as a fraction; 0 when total_cost is 0
    pub total_pnl_pct: f64,
}

/// Full aggregation output: per-position rows, portfolio totals, and the
/// symbols that had no price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioReport {
    pub positions: Vec<PositionReport>,
    pub totals: PortfolioTotals,

    /// Symbols excluded from totals because no price was available
    pub missing_prices: Vec<String>,
}

impl PortfolioReport {
    /// Number of symbols that had no price.
    #[must_use]
    pub fn missing_price_count(&self) -> usize {
        self.missing_prices.len()
    }
}
