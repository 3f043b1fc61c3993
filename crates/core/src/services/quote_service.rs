use crate::errors::CoreError;
use crate::models::holding::Market;
use crate::models::quote::{PriceMap, QuoteSnapshot};
use crate::providers::registry::QuoteProviderRegistry;

/// Fetches current quotes from API providers.
///
/// Providers are tried in registration order. If the first supporting
/// provider fails (API down, rate limited, etc.), the next one is used.
/// A returned price must be finite and positive, otherwise the provider's
/// answer is treated as a failure.
pub struct QuoteService {
    registry: QuoteProviderRegistry,
}

impl QuoteService {
    pub fn new(registry: QuoteProviderRegistry) -> Self {
        Self { registry }
    }

    /// Check if at least one provider is available for a given market.
    pub fn has_provider_for(&self, market: &Market) -> bool {
        self.registry.get_provider_for(market).is_some()
    }

    /// Get the names of all providers available for a given market.
    pub fn provider_names(&self, market: &Market) -> Vec<String> {
        self.registry
            .get_providers_for(market)
            .iter()
            .map(|p| p.name().to_string())
            .collect()
    }

    /// Fetch the current quote for one symbol, with automatic fallback.
    pub async fn fetch_quote(&self, symbol: &str, market: &Market) -> Result<f64, CoreError> {
        let providers = self.registry.get_providers_for(market);
        if providers.is_empty() {
            return Err(CoreError::NoProvider(market.to_string()));
        }

        let mut last_error = None;
        for provider in &providers {
            match provider.get_quote(symbol).await {
                Ok(price) => {
                    if !price.is_finite() || price <= 0.0 {
                        last_error = Some(CoreError::Api {
                            provider: provider.name().to_string(),
                            message: format!(
                                "Invalid price returned for {symbol}: {price} (must be finite and positive)"
                            ),
                        });
                        continue;
                    }
                    return Ok(price);
                }
                Err(e) => {
                    last_error = Some(e);
                    // Try next provider
                }
            }
        }

        Err(last_error.unwrap_or_else(|| CoreError::NoProvider(market.to_string())))
    }

    /// Fetch quotes for a list of (symbol, market) targets.
    ///
    /// Individual failures never abort the snapshot: the failed symbols are
    /// returned alongside the prices that could be fetched.
    pub async fn fetch_snapshot(&self, targets: &[(String, Market)]) -> QuoteSnapshot {
        let mut prices = PriceMap::new();
        let mut failed = Vec::new();

        for (symbol, market) in targets {
            match self.fetch_quote(symbol, market).await {
                Ok(price) => prices.set(symbol, price),
                Err(_) => failed.push(symbol.to_uppercase()),
            }
        }

        QuoteSnapshot { prices, failed }
    }
}
