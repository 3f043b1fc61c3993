use crate::models::position::Position;
use crate::models::quote::PriceMap;
use crate::models::report::{PortfolioReport, PortfolioTotals, PositionReport};

/// Values a position set against a price map: per-position market value,
/// cost value, and P&L, plus portfolio totals.
///
/// Flat positions (quantity 0) hold no economic value and appear in
/// neither the listing nor the totals. Positions without a price are
/// listed with empty monetary fields, excluded from the totals, and
/// reported in `missing_prices`.
pub struct AggregationService;

impl AggregationService {
    pub fn new() -> Self {
        Self
    }

    pub fn aggregate(&self, positions: &[Position], prices: &PriceMap) -> PortfolioReport {
        let mut rows = Vec::new();
        let mut missing_prices = Vec::new();
        let mut total_value = 0.0;
        let mut total_cost = 0.0;

        for position in positions {
            if !position.is_open() {
                continue;
            }

            let price = prices.get(&position.symbol).or(position.price);
            let cost_value = position.quantity * position.cost_basis;

            let (market_value, pnl, pnl_pct) = match price {
                Some(p) => {
                    let market_value = position.quantity * p;
                    let pnl = market_value - cost_value;
                    let pnl_pct = if cost_value > 0.0 { pnl / cost_value } else { 0.0 };

                    total_value += market_value;
                    total_cost += cost_value;

                    (Some(market_value), Some(pnl), Some(pnl_pct))
                }
                None => {
                    missing_prices.push(position.symbol.clone());
                    (None, None, None)
                }
            };

            rows.push(PositionReport {
                symbol: position.symbol.clone(),
                name: position.name.clone(),
                quantity: position.quantity,
                cost_basis: position.cost_basis,
                price,
                market_value,
                cost_value,
                pnl,
                pnl_pct,
            });
        }

        let total_pnl = total_value - total_cost;
        let total_pnl_pct = if total_cost > 0.0 { total_pnl / total_cost } else { 0.0 };

        PortfolioReport {
            positions: rows,
            totals: PortfolioTotals {
                total_value,
                total_cost,
                total_pnl,
                total_pnl_pct,
            },
            missing_prices,
        }
    }
}

impl Default for AggregationService {
    fn default() -> Self {
        Self::new()
    }
}
