use std::collections::HashMap;

use crate::models::holding::Holding;
use crate::models::position::Position;
use crate::models::quote::PriceMap;
use crate::models::trade::Trade;

/// Rebuilds the current position set from the baseline holdings and the
/// trade ledger.
///
/// Pure business logic — no I/O, no clock, no shared state. Replaying the
/// same inputs always produces identical output.
pub struct PositionService;

impl PositionService {
    pub fn new() -> Self {
        Self
    }

    /// Replay `trades` in recorded order over `base` and return the
    /// resulting positions, sorted by symbol.
    ///
    /// Buys fold into the weighted-average cost basis. Sells reduce
    /// quantity without touching cost, clamp at zero on oversell, and reset
    /// cost to zero once the position is flat. A trade on a symbol the
    /// baseline doesn't know creates a synthetic position first.
    pub fn reconcile(&self, base: &[Holding], trades: &[Trade]) -> Vec<Position> {
        let mut book: HashMap<String, Position> = HashMap::new();
        for holding in base {
            book.insert(
                holding.symbol.to_uppercase(),
                Position::from_holding(holding),
            );
        }

        for trade in trades {
            let symbol = trade.symbol.to_uppercase();
            let position = book
                .entry(symbol.clone())
                .or_insert_with(|| Position::synthetic(symbol, trade.price));
            Self::apply_trade(position, trade);
        }

        let mut positions: Vec<Position> = book.into_values().collect();
        positions.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        positions
    }

    /// Attach the latest quotes to a reconciled position set.
    pub fn apply_prices(&self, positions: &mut [Position], prices: &PriceMap) {
        for position in positions.iter_mut() {
            position.price = prices.get(&position.symbol);
        }
    }

    /// Apply a single trade to a position in place.
    ///
    /// A zero-quantity trade is a no-op; the recording boundary rejects
    /// those before they reach the ledger.
    fn apply_trade(position: &mut Position, trade: &Trade) {
        if trade.quantity > 0.0 {
            // Buy: quantity-weighted mean of prior cost and purchase price
            let new_quantity = position.quantity + trade.quantity;
            if new_quantity > 0.0 {
                position.cost_basis = (position.quantity * position.cost_basis
                    + trade.quantity * trade.price)
                    / new_quantity;
            }
            position.quantity = new_quantity;
        } else if trade.quantity < 0.0 {
            // Sell: cost basis unchanged while anything remains; a flat
            // position has no cost basis. Oversell clamps at zero.
            let new_quantity = position.quantity + trade.quantity;
            if new_quantity > 0.0 {
                position.quantity = new_quantity;
            } else {
                position.quantity = 0.0;
                position.cost_basis = 0.0;
            }
        }
    }
}

impl Default for PositionService {
    fn default() -> Self {
        Self::new()
    }
}
