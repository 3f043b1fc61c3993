use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::traits::QuoteProvider;
use crate::errors::CoreError;
use crate::models::holding::Market;

const BASE_URL: &str = "https://api.twelvedata.com";

/// Twelve Data quote provider for US-market symbols.
///
/// - **Requires**: API key (configured under the name "twelvedata").
/// - **Endpoint**: `/price?symbol={symbol}&apikey={key}`
/// - **Data**: real-time prices for US equities and ETFs.
///
/// Also handles unclassified symbols, since synthetic positions default to
/// the catch-all market. Prices arrive as JSON strings and are parsed.
pub struct TwelveDataProvider {
    client: Client,
    api_key: String,
}

impl TwelveDataProvider {
    pub fn new(api_key: String) -> Self {
        let builder = Client::builder().timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            api_key,
        }
    }
}

// ── Twelve Data API response types ──────────────────────────────────

#[derive(Deserialize)]
struct PriceResponse {
    price: Option<String>,
}

#[async_trait]
impl QuoteProvider for TwelveDataProvider {
    fn name(&self) -> &str {
        "Twelve Data"
    }

    fn supported_markets(&self) -> Vec<Market> {
        vec![Market::Us, Market::Other]
    }

    async fn get_quote(&self, symbol: &str) -> Result<f64, CoreError> {
        let upper = symbol.to_uppercase();
        let url = format!("{BASE_URL}/price");

        let resp: PriceResponse = self
            .client
            .get(&url)
            .query(&[("symbol", upper.as_str()), ("apikey", self.api_key.as_str())])
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: "Twelve Data".into(),
                message: format!("Failed to parse price for {symbol}: {e}"),
            })?;

        let price_str = resp.price.ok_or_else(|| CoreError::Api {
            provider: "Twelve Data".into(),
            message: format!("No price data for {symbol}. API limit may be exceeded."),
        })?;

        price_str.parse().map_err(|e| CoreError::Api {
            provider: "Twelve Data".into(),
            message: format!("Invalid price format for {symbol}: {e}"),
        })
    }
}
