use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::traits::QuoteProvider;
use crate::errors::CoreError;
use crate::models::holding::Market;

const BASE_URL: &str = "https://query1.finance.yahoo.com/v7/finance/quote";

/// Yahoo Finance quote provider for Hong Kong equities.
///
/// - **Free**: no API key required (unofficial public endpoint).
/// - **Endpoint**: `?symbols={symbol}.HK`
///
/// Symbols without an exchange suffix get ".HK" appended, so "0700" is
/// requested as "0700.HK".
pub struct YahooQuoteProvider {
    client: Client,
}

impl YahooQuoteProvider {
    pub fn new() -> Self {
        let builder = Client::builder().timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
        }
    }

    /// Append the ".HK" exchange suffix unless the symbol already has one.
    fn hk_symbol(symbol: &str) -> String {
        let upper = symbol.to_uppercase();
        if upper.contains('.') {
            upper
        } else {
            format!("{upper}.HK")
        }
    }
}

impl Default for YahooQuoteProvider {
    fn default() -> Self {
        Self::new()
    }
}

// ── Yahoo Finance API response types ────────────────────────────────

#[derive(Deserialize)]
struct QuoteResponse {
    #[serde(rename = "quoteResponse")]
    quote_response: QuoteResponseBody,
}

#[derive(Deserialize)]
struct QuoteResponseBody {
    result: Vec<QuoteResult>,
}

#[derive(Deserialize)]
struct QuoteResult {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
}

#[async_trait]
impl QuoteProvider for YahooQuoteProvider {
    fn name(&self) -> &str {
        "Yahoo Finance"
    }

    fn supported_markets(&self) -> Vec<Market> {
        vec![Market::Hk]
    }

    async fn get_quote(&self, symbol: &str) -> Result<f64, CoreError> {
        let full_symbol = Self::hk_symbol(symbol);

        let resp: QuoteResponse = self
            .client
            .get(BASE_URL)
            .query(&[("symbols", full_symbol.as_str())])
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: "Yahoo Finance".into(),
                message: format!("Failed to parse quote for {symbol}: {e}"),
            })?;

        resp.quote_response
            .result
            .first()
            .and_then(|q| q.regular_market_price)
            .ok_or_else(|| CoreError::QuoteUnavailable {
                symbol: symbol.to_uppercase(),
                market: Market::Hk.to_string(),
            })
    }
}
