use std::collections::HashMap;

use crate::models::holding::Market;

use super::traits::QuoteProvider;
use super::twelvedata::TwelveDataProvider;
use super::yahoo::YahooQuoteProvider;

/// Registry of all available quote providers.
///
/// Routes requests to the correct provider based on `Market`. Providers
/// registered later act as fallbacks for the same market.
pub struct QuoteProviderRegistry {
    providers: Vec<Box<dyn QuoteProvider>>,
}

impl QuoteProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Create a registry with all default providers pre-configured.
    pub fn new_with_defaults(api_keys: &HashMap<String, String>) -> Self {
        let mut registry = Self::new();

        // Yahoo Finance — HK quotes, no API key needed
        registry.register(Box::new(YahooQuoteProvider::new()));

        // Twelve Data — US and unclassified symbols, requires API key
        if let Some(key) = api_keys.get("twelvedata") {
            registry.register(Box::new(TwelveDataProvider::new(key.clone())));
        }

        registry
    }

    /// Register a new quote provider.
    pub fn register(&mut self, provider: Box<dyn QuoteProvider>) {
        self.providers.push(provider);
    }

    /// Find the first provider that supports the given market.
    pub fn get_provider_for(&self, market: &Market) -> Option<&dyn QuoteProvider> {
        self.providers
            .iter()
            .find(|p| p.supported_markets().contains(market))
            .map(|p| p.as_ref())
    }

    /// Return ALL providers that support the given market, in registration
    /// order. Used for fallback: if the first provider fails, try the next.
    pub fn get_providers_for(&self, market: &Market) -> Vec<&dyn QuoteProvider> {
        self.providers
            .iter()
            .filter(|p| p.supported_markets().contains(market))
            .map(|p| p.as_ref())
            .collect()
    }
}

impl Default for QuoteProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
