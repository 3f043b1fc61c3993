use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::holding::Market;

/// Trait abstraction for all quote providers.
///
/// Each upstream API (Twelve Data, Yahoo Finance) implements this trait.
/// If an API stops working or changes, we replace only that one
/// implementation — the rest of the codebase is untouched.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Which markets this provider can quote.
    fn supported_markets(&self) -> Vec<Market>;

    /// Get the current price of a symbol.
    async fn get_quote(&self, symbol: &str) -> Result<f64, CoreError>;
}
