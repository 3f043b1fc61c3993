pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use chrono::Utc;
use uuid::Uuid;

use errors::CoreError;
use models::{
    allocation::{AllocationDimension, AllocationSlice},
    holding::{Holding, Market},
    position::Position,
    quote::PriceMap,
    report::PortfolioReport,
    trade::Trade,
};
use services::{
    aggregation_service::AggregationService, allocation_service::AllocationService,
    position_service::PositionService, quote_service::QuoteService,
};
use storage::{baseline::BaselineLoader, ledger::LedgerStore};

/// Main entry point for the Portfolio Tracker core library.
/// Holds the baseline holdings, the in-memory trade ledger, the latest
/// quote snapshot, and the services that operate on them.
#[must_use]
pub struct PortfolioTracker {
    baseline: Vec<Holding>,
    trades: Vec<Trade>,
    quotes: PriceMap,
    position_service: PositionService,
    aggregation_service: AggregationService,
    allocation_service: AllocationService,
    /// Tracks whether the ledger has changed since the last save/load.
    dirty: bool,
}

impl std::fmt::Debug for PortfolioTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioTracker")
            .field("baseline", &self.baseline.len())
            .field("trades", &self.trades.len())
            .field("quotes", &self.quotes.len())
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl PortfolioTracker {
    /// Create a tracker with no baseline and an empty ledger.
    pub fn new() -> Self {
        Self::build(Vec::new(), Vec::new())
    }

    /// Create a tracker from an already-loaded baseline.
    pub fn with_baseline(baseline: Vec<Holding>) -> Self {
        Self::build(baseline, Vec::new())
    }

    /// Load the baseline holdings from a JSON file on disk.
    pub fn load_baseline_from_file(path: &str) -> Result<Self, CoreError> {
        let baseline = BaselineLoader::load_from_file(path)?;
        Ok(Self::build(baseline, Vec::new()))
    }

    // ── Trade Ledger ────────────────────────────────────────────────

    /// Record a buy (positive quantity) or sell (negative quantity) trade,
    /// stamped with the current time.
    ///
    /// The trade is validated before it enters the ledger: an empty symbol,
    /// a zero or non-finite quantity, or a non-positive or non-finite price
    /// is rejected with `CoreError::InvalidTrade`.
    pub fn record_trade(
        &mut self,
        symbol: &str,
        quantity: f64,
        price: f64,
    ) -> Result<Uuid, CoreError> {
        self.record_trade_at(symbol, quantity, price, Utc::now().timestamp_millis())
    }

    /// Record a trade with an explicit timestamp (unix milliseconds).
    /// Useful for deterministic replay and imports.
    pub fn record_trade_at(
        &mut self,
        symbol: &str,
        quantity: f64,
        price: f64,
        timestamp: i64,
    ) -> Result<Uuid, CoreError> {
        Self::validate_trade(symbol, quantity, price)?;

        let trade = Trade::new(symbol, quantity, price, timestamp);
        let id = trade.id;
        self.trades.push(trade);
        self.dirty = true;
        Ok(id)
    }

    /// Remove all trades from the ledger. Individual trades are never
    /// deleted, only the whole ledger at once.
    pub fn clear_trades(&mut self) {
        if !self.trades.is_empty() {
            self.trades.clear();
            self.dirty = true;
        }
    }

    /// All trades in recorded order.
    #[must_use]
    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    /// Number of trades in the ledger.
    #[must_use]
    pub fn trade_count(&self) -> usize {
        self.trades.len()
    }

    /// Trades for one symbol (case-insensitive), in recorded order.
    #[must_use]
    pub fn trades_for_symbol(&self, symbol: &str) -> Vec<&Trade> {
        let upper = symbol.to_uppercase();
        self.trades
            .iter()
            .filter(|t| t.symbol.to_uppercase() == upper)
            .collect()
    }

    /// The baseline holdings the ledger is replayed over.
    #[must_use]
    pub fn baseline(&self) -> &[Holding] {
        &self.baseline
    }

    // ── Positions & Reports ─────────────────────────────────────────

    /// Current positions: baseline plus replayed ledger, with the latest
    /// quotes attached. Sorted by symbol.
    #[must_use]
    pub fn positions(&self) -> Vec<Position> {
        let mut positions = self.position_service.reconcile(&self.baseline, &self.trades);
        self.position_service.apply_prices(&mut positions, &self.quotes);
        positions
    }

    /// Full portfolio summary: per-position P&L rows, totals, and the
    /// symbols that had no price.
    #[must_use]
    pub fn summary(&self) -> PortfolioReport {
        self.aggregation_service.aggregate(&self.positions(), &self.quotes)
    }

    /// Allocation breakdown grouped by the given dimension.
    #[must_use]
    pub fn allocation(&self, dimension: AllocationDimension) -> Vec<AllocationSlice> {
        self.allocation_service.group(&self.positions(), &self.quotes, dimension)
    }

    // ── Quotes ──────────────────────────────────────────────────────

    /// Refresh quotes for every current position through the given service.
    /// Replaces the quote snapshot and returns the symbols whose fetch
    /// failed.
    pub async fn refresh_quotes(&mut self, service: &QuoteService) -> Vec<String> {
        let targets: Vec<(String, Market)> = self
            .position_service
            .reconcile(&self.baseline, &self.trades)
            .iter()
            .map(|p| (p.symbol.clone(), p.market))
            .collect();

        let snapshot = service.fetch_snapshot(&targets).await;
        self.quotes = snapshot.prices;
        snapshot.failed
    }

    /// Manually set a quote (useful for testing, offline use, or imports).
    pub fn set_quote(&mut self, symbol: &str, price: f64) {
        self.quotes.set(symbol, price);
    }

    /// The latest quote snapshot.
    #[must_use]
    pub fn quotes(&self) -> &PriceMap {
        &self.quotes
    }

    // ── Ledger Persistence ──────────────────────────────────────────

    /// Load the trade ledger from a file, replacing the in-memory ledger.
    /// Returns the number of trades loaded. A missing file loads as empty.
    pub fn load_trades_from_file(&mut self, path: &str) -> Result<usize, CoreError> {
        let trades = LedgerStore::load_from_file(path)?;
        let count = trades.len();
        self.trades = trades;
        self.dirty = false;
        Ok(count)
    }

    /// Save the trade ledger to a file. Clears the unsaved-changes flag.
    pub fn save_trades_to_file(&mut self, path: &str) -> Result<(), CoreError> {
        LedgerStore::save_to_file(path, &self.trades)?;
        self.dirty = false;
        Ok(())
    }

    /// Export the trade ledger as a versioned JSON document.
    pub fn export_trades_to_json(&self) -> Result<String, CoreError> {
        LedgerStore::to_json(&self.trades)
    }

    /// Import trades from a ledger JSON document, appending them to the
    /// ledger. All trades are validated first; if any is invalid, none are
    /// imported. Returns the number of trades imported.
    pub fn import_trades_from_json(&mut self, json: &str) -> Result<usize, CoreError> {
        let trades = LedgerStore::from_json(json)?;

        for trade in &trades {
            Self::validate_trade(&trade.symbol, trade.quantity, trade.price)?;
        }

        let count = trades.len();
        self.trades.extend(trades);
        if count > 0 {
            self.dirty = true;
        }
        Ok(count)
    }

    /// Returns `true` if the ledger has been modified since the last save
    /// or load.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    // ── Internal ────────────────────────────────────────────────────

    fn validate_trade(symbol: &str, quantity: f64, price: f64) -> Result<(), CoreError> {
        if symbol.trim().is_empty() {
            return Err(CoreError::InvalidTrade(
                "Trade symbol must not be empty".into(),
            ));
        }
        if !quantity.is_finite() || quantity == 0.0 {
            return Err(CoreError::InvalidTrade(format!(
                "Trade quantity must be finite and nonzero, got {quantity}"
            )));
        }
        if !price.is_finite() || price <= 0.0 {
            return Err(CoreError::InvalidTrade(format!(
                "Trade price must be finite and positive, got {price}"
            )));
        }
        Ok(())
    }

    fn build(baseline: Vec<Holding>, trades: Vec<Trade>) -> Self {
        Self {
            baseline,
            trades,
            quotes: PriceMap::new(),
            position_service: PositionService::new(),
            aggregation_service: AggregationService::new(),
            allocation_service: AllocationService::new(),
            dirty: false,
        }
    }
}

impl Default for PortfolioTracker {
    fn default() -> Self {
        Self::new()
    }
}
