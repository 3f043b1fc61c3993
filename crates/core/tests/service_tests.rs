// ═══════════════════════════════════════════════════════════════════
// Service Tests — AggregationService, AllocationService, QuoteService
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use std::collections::HashMap;

use portfolio_tracker_core::errors::CoreError;
use portfolio_tracker_core::models::allocation::AllocationDimension;
use portfolio_tracker_core::models::holding::Market;
use portfolio_tracker_core::models::position::Position;
use portfolio_tracker_core::models::quote::PriceMap;
use portfolio_tracker_core::providers::registry::QuoteProviderRegistry;
use portfolio_tracker_core::providers::traits::QuoteProvider;
use portfolio_tracker_core::services::aggregation_service::AggregationService;
use portfolio_tracker_core::services::allocation_service::AllocationService;
use portfolio_tracker_core::services::quote_service::QuoteService;

// ═══════════════════════════════════════════════════════════════════
// Mock Providers
// ═══════════════════════════════════════════════════════════════════

struct MockQuoteProvider {
    prices: HashMap<String, f64>,
}

impl MockQuoteProvider {
    fn new() -> Self {
        let mut prices = HashMap::new();
        prices.insert("AAPL".to_string(), 185.0);
        prices.insert("TSLA".to_string(), 240.0);
        prices.insert("0700".to_string(), 310.0);
        Self { prices }
    }

    fn with_prices(prices: HashMap<String, f64>) -> Self {
        Self { prices }
    }
}

#[async_trait]
impl QuoteProvider for MockQuoteProvider {
    fn name(&self) -> &str {
        "MockProvider"
    }

    fn supported_markets(&self) -> Vec<Market> {
        vec![Market::Us, Market::Hk, Market::Other]
    }

    async fn get_quote(&self, symbol: &str) -> Result<f64, CoreError> {
        self.prices
            .get(&symbol.to_uppercase())
            .copied()
            .ok_or_else(|| CoreError::QuoteUnavailable {
                symbol: symbol.to_uppercase(),
                market: "US".into(),
            })
    }
}

/// A mock that always fails (for testing fallback behavior).
struct FailingMockProvider;

#[async_trait]
impl QuoteProvider for FailingMockProvider {
    fn name(&self) -> &str {
        "FailingMock"
    }

    fn supported_markets(&self) -> Vec<Market> {
        vec![Market::Us, Market::Hk, Market::Other]
    }

    async fn get_quote(&self, symbol: &str) -> Result<f64, CoreError> {
        Err(CoreError::Api {
            provider: "FailingMock".into(),
            message: format!("Simulated failure for {symbol}"),
        })
    }
}

/// A mock that answers every quote with one fixed (possibly bogus) price.
struct FixedPriceProvider(f64);

#[async_trait]
impl QuoteProvider for FixedPriceProvider {
    fn name(&self) -> &str {
        "FixedPrice"
    }

    fn supported_markets(&self) -> Vec<Market> {
        vec![Market::Us, Market::Hk, Market::Other]
    }

    async fn get_quote(&self, _symbol: &str) -> Result<f64, CoreError> {
        Ok(self.0)
    }
}

fn make_service_with_mock() -> QuoteService {
    let mut registry = QuoteProviderRegistry::new();
    registry.register(Box::new(MockQuoteProvider::new()));
    QuoteService::new(registry)
}

fn pos(symbol: &str, category: &str, market: Market, quantity: f64, cost_basis: f64) -> Position {
    Position {
        symbol: symbol.to_string(),
        name: symbol.to_string(),
        market,
        category: category.to_string(),
        quantity,
        cost_basis,
        price: None,
    }
}

// ═══════════════════════════════════════════════════════════════════
// AggregationService
// ═══════════════════════════════════════════════════════════════════

mod aggregation {
    use super::*;

    #[test]
    fn empty_positions_zero_totals() {
        let svc = AggregationService::new();
        let report = svc.aggregate(&[], &PriceMap::new());

        assert!(report.positions.is_empty());
        assert!(report.missing_prices.is_empty());
        assert_eq!(report.totals.total_value, 0.0);
        assert_eq!(report.totals.total_cost, 0.0);
        assert_eq!(report.totals.total_pnl, 0.0);
        assert_eq!(report.totals.total_pnl_pct, 0.0);
    }

    #[test]
    fn single_priced_position() {
        let svc = AggregationService::new();
        let positions = vec![pos("AAPL", "tech", Market::Us, 10.0, 100.0)];
        let mut prices = PriceMap::new();
        prices.set("AAPL", 150.0);

        let report = svc.aggregate(&positions, &prices);
        assert_eq!(report.positions.len(), 1);
        let row = &report.positions[0];
        assert_eq!(row.market_value, Some(1500.0));
        assert_eq!(row.cost_value, 1000.0);
        assert_eq!(row.pnl, Some(500.0));
        assert!((row.pnl_pct.unwrap() - 0.5).abs() < 1e-12);

        assert_eq!(report.totals.total_value, 1500.0);
        assert_eq!(report.totals.total_cost, 1000.0);
        assert_eq!(report.totals.total_pnl, 500.0);
        assert!((report.totals.total_pnl_pct - 0.5).abs() < 1e-12);
    }

    #[test]
    fn missing_price_listed_but_excluded_from_totals() {
        // Scenario: price map missing AAPL
        let svc = AggregationService::new();
        let positions = vec![
            pos("AAPL", "tech", Market::Us, 10.0, 100.0),
            pos("TSLA", "auto", Market::Us, 2.0, 200.0),
        ];
        let mut prices = PriceMap::new();
        prices.set("TSLA", 250.0);

        let report = svc.aggregate(&positions, &prices);
        assert_eq!(report.positions.len(), 2);
        assert_eq!(report.missing_prices, vec!["AAPL".to_string()]);
        assert_eq!(report.missing_price_count(), 1);

        let aapl = &report.positions[0];
        assert_eq!(aapl.price, None);
        assert_eq!(aapl.market_value, None);
        assert_eq!(aapl.pnl, None);
        assert_eq!(aapl.pnl_pct, None);

        // Totals cover TSLA only
        assert_eq!(report.totals.total_value, 500.0);
        assert_eq!(report.totals.total_cost, 400.0);
    }

    #[test]
    fn flat_positions_excluded_entirely() {
        let svc = AggregationService::new();
        let positions = vec![
            pos("AAPL", "tech", Market::Us, 0.0, 0.0),
            pos("TSLA", "auto", Market::Us, 1.0, 100.0),
        ];
        let mut prices = PriceMap::new();
        prices.set("AAPL", 185.0);
        prices.set("TSLA", 240.0);

        let report = svc.aggregate(&positions, &prices);
        assert_eq!(report.positions.len(), 1);
        assert_eq!(report.positions[0].symbol, "TSLA");
        assert!(report.missing_prices.is_empty());
    }

    #[test]
    fn zero_cost_position_pnl_pct_is_zero() {
        let svc = AggregationService::new();
        let positions = vec![pos("AAPL", "tech", Market::Us, 10.0, 0.0)];
        let mut prices = PriceMap::new();
        prices.set("AAPL", 5.0);

        let report = svc.aggregate(&positions, &prices);
        let row = &report.positions[0];
        assert_eq!(row.pnl, Some(50.0));
        assert_eq!(row.pnl_pct, Some(0.0));
        assert!(row.pnl_pct.unwrap().is_finite());
    }

    #[test]
    fn zero_total_cost_total_pnl_pct_is_zero() {
        // Scenario: aggregation with totalCost = 0 must not produce NaN
        let svc = AggregationService::new();
        let positions = vec![
            pos("AAPL", "tech", Market::Us, 10.0, 0.0),
            pos("MSFT", "tech", Market::Us, 4.0, 0.0),
        ];
        let mut prices = PriceMap::new();
        prices.set("AAPL", 5.0);
        prices.set("MSFT", 25.0);

        let report = svc.aggregate(&positions, &prices);
        assert_eq!(report.totals.total_cost, 0.0);
        assert_eq!(report.totals.total_value, 150.0);
        assert_eq!(report.totals.total_pnl, 150.0);
        assert_eq!(report.totals.total_pnl_pct, 0.0);
        assert!(report.totals.total_pnl_pct.is_finite());
    }

    #[test]
    fn falls_back_to_embedded_position_price() {
        let svc = AggregationService::new();
        let mut position = pos("AAPL", "tech", Market::Us, 2.0, 100.0);
        position.price = Some(150.0);

        let report = svc.aggregate(&[position], &PriceMap::new());
        assert_eq!(report.positions[0].market_value, Some(300.0));
        assert!(report.missing_prices.is_empty());
    }

    #[test]
    fn loss_produces_negative_pnl() {
        let svc = AggregationService::new();
        let positions = vec![pos("TSLA", "auto", Market::Us, 4.0, 300.0)];
        let mut prices = PriceMap::new();
        prices.set("TSLA", 240.0);

        let report = svc.aggregate(&positions, &prices);
        let row = &report.positions[0];
        assert_eq!(row.pnl, Some(-240.0));
        assert!((row.pnl_pct.unwrap() + 0.2).abs() < 1e-12);
        assert_eq!(report.totals.total_pnl, -240.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// AllocationService
// ═══════════════════════════════════════════════════════════════════

mod allocation {
    use super::*;

    fn priced(prices: &[(&str, f64)]) -> PriceMap {
        let mut map = PriceMap::new();
        for (symbol, price) in prices {
            map.set(symbol, *price);
        }
        map
    }

    #[test]
    fn groups_by_category() {
        let svc = AllocationService::new();
        let positions = vec![
            pos("AAPL", "tech", Market::Us, 10.0, 100.0),
            pos("MSFT", "tech", Market::Us, 10.0, 100.0),
            pos("TSLA", "auto", Market::Us, 10.0, 100.0),
        ];
        let prices = priced(&[("AAPL", 100.0), ("MSFT", 200.0), ("TSLA", 100.0)]);

        let slices = svc.group(&positions, &prices, AllocationDimension::Category);
        assert_eq!(slices.len(), 2);
        // BTreeMap order: "auto" before "tech"
        assert_eq!(slices[0].key, "auto");
        assert_eq!(slices[0].value, 1000.0);
        assert_eq!(slices[1].key, "tech");
        assert_eq!(slices[1].value, 3000.0);
        assert!((slices[0].percent_of_total - 25.0).abs() < 1e-9);
        assert!((slices[1].percent_of_total - 75.0).abs() < 1e-9);
    }

    #[test]
    fn percentages_sum_to_100() {
        let svc = AllocationService::new();
        let positions = vec![
            pos("AAPL", "tech", Market::Us, 3.0, 10.0),
            pos("0700", "tech", Market::Hk, 7.0, 20.0),
            pos("TSLA", "auto", Market::Us, 11.0, 30.0),
            pos("GLD", "etf", Market::Us, 1.5, 40.0),
        ];
        let prices = priced(&[("AAPL", 185.0), ("0700", 310.0), ("TSLA", 240.0), ("GLD", 190.0)]);

        for dimension in [
            AllocationDimension::Category,
            AllocationDimension::Market,
            AllocationDimension::Symbol,
        ] {
            let slices = svc.group(&positions, &prices, dimension);
            let sum: f64 = slices.iter().map(|s| s.percent_of_total).sum();
            assert!((sum - 100.0).abs() < 0.1, "{dimension:?} sums to {sum}");
        }
    }

    #[test]
    fn groups_by_market() {
        let svc = AllocationService::new();
        let positions = vec![
            pos("AAPL", "tech", Market::Us, 1.0, 10.0),
            pos("0700", "tech", Market::Hk, 1.0, 10.0),
        ];
        let prices = priced(&[("AAPL", 100.0), ("0700", 300.0)]);

        let slices = svc.group(&positions, &prices, AllocationDimension::Market);
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].key, "HK");
        assert_eq!(slices[1].key, "US");
    }

    #[test]
    fn unpriced_positions_contribute_nothing() {
        let svc = AllocationService::new();
        let positions = vec![
            pos("AAPL", "tech", Market::Us, 1.0, 10.0),
            pos("MYST", "mystery", Market::Other, 100.0, 10.0),
        ];
        let prices = priced(&[("AAPL", 100.0)]);

        let slices = svc.group(&positions, &prices, AllocationDimension::Category);
        // The unpriced group has zero value and is omitted
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].key, "tech");
        assert!((slices[0].percent_of_total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn flat_positions_contribute_nothing() {
        let svc = AllocationService::new();
        let positions = vec![
            pos("AAPL", "tech", Market::Us, 1.0, 10.0),
            pos("TSLA", "auto", Market::Us, 0.0, 0.0),
        ];
        let prices = priced(&[("AAPL", 100.0), ("TSLA", 240.0)]);

        let slices = svc.group(&positions, &prices, AllocationDimension::Category);
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].key, "tech");
    }

    #[test]
    fn empty_result_emits_placeholder() {
        let svc = AllocationService::new();

        let slices = svc.group(&[], &PriceMap::new(), AllocationDimension::Category);
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].key, "other");
        assert_eq!(slices[0].value, 1.0);
        assert_eq!(slices[0].percent_of_total, 0.0);
    }

    #[test]
    fn all_unpriced_emits_placeholder() {
        let svc = AllocationService::new();
        let positions = vec![pos("AAPL", "tech", Market::Us, 10.0, 100.0)];

        let slices = svc.group(&positions, &PriceMap::new(), AllocationDimension::Category);
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].key, "other");
        assert_eq!(slices[0].value, 1.0);
        assert_eq!(slices[0].percent_of_total, 0.0);
    }

    #[test]
    fn symbol_dimension_one_group_per_symbol() {
        let svc = AllocationService::new();
        let positions = vec![
            pos("AAPL", "tech", Market::Us, 1.0, 10.0),
            pos("MSFT", "tech", Market::Us, 1.0, 10.0),
        ];
        let prices = priced(&[("AAPL", 100.0), ("MSFT", 100.0)]);

        let slices = svc.group(&positions, &prices, AllocationDimension::Symbol);
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].key, "AAPL");
        assert_eq!(slices[1].key, "MSFT");
        assert!((slices[0].percent_of_total - 50.0).abs() < 1e-9);
    }
}

// ═══════════════════════════════════════════════════════════════════
// QuoteService — with mock providers
// ═══════════════════════════════════════════════════════════════════

mod quote_service {
    use super::*;

    #[tokio::test]
    async fn fetch_quote_from_mock() {
        let svc = make_service_with_mock();
        let price = svc.fetch_quote("AAPL", &Market::Us).await.unwrap();
        assert_eq!(price, 185.0);
    }

    #[tokio::test]
    async fn fetch_quote_normalizes_symbol_case() {
        let svc = make_service_with_mock();
        let price = svc.fetch_quote("aapl", &Market::Us).await.unwrap();
        assert_eq!(price, 185.0);
    }

    #[tokio::test]
    async fn no_provider_fails() {
        let svc = QuoteService::new(QuoteProviderRegistry::new());
        let result = svc.fetch_quote("AAPL", &Market::Us).await;
        assert!(result.is_err());
        match result.unwrap_err() {
            CoreError::NoProvider(market) => assert_eq!(market, "US"),
            other => panic!("Expected NoProvider, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn fallback_on_primary_failure() {
        let mut registry = QuoteProviderRegistry::new();
        registry.register(Box::new(FailingMockProvider));
        registry.register(Box::new(MockQuoteProvider::new()));
        let svc = QuoteService::new(registry);

        let price = svc.fetch_quote("AAPL", &Market::Us).await.unwrap();
        assert_eq!(price, 185.0);
    }

    #[tokio::test]
    async fn all_providers_fail_returns_last_error() {
        let mut registry = QuoteProviderRegistry::new();
        registry.register(Box::new(FailingMockProvider));
        let svc = QuoteService::new(registry);

        let result = svc.fetch_quote("AAPL", &Market::Us).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn non_positive_price_rejected() {
        let mut registry = QuoteProviderRegistry::new();
        registry.register(Box::new(FixedPriceProvider(0.0)));
        let svc = QuoteService::new(registry);

        let result = svc.fetch_quote("AAPL", &Market::Us).await;
        assert!(result.is_err());
        match result.unwrap_err() {
            CoreError::Api { message, .. } => assert!(message.contains("Invalid price")),
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn non_finite_price_rejected() {
        let mut registry = QuoteProviderRegistry::new();
        registry.register(Box::new(FixedPriceProvider(f64::NAN)));
        let svc = QuoteService::new(registry);

        assert!(svc.fetch_quote("AAPL", &Market::Us).await.is_err());
    }

    #[tokio::test]
    async fn invalid_price_falls_back_to_next_provider() {
        let mut registry = QuoteProviderRegistry::new();
        registry.register(Box::new(FixedPriceProvider(-1.0)));
        registry.register(Box::new(MockQuoteProvider::new()));
        let svc = QuoteService::new(registry);

        let price = svc.fetch_quote("AAPL", &Market::Us).await.unwrap();
        assert_eq!(price, 185.0);
    }

    #[tokio::test]
    async fn snapshot_collects_prices_and_failures() {
        let svc = make_service_with_mock();
        let targets = vec![
            ("AAPL".to_string(), Market::Us),
            ("0700".to_string(), Market::Hk),
            ("NOPE".to_string(), Market::Us),
        ];

        let snapshot = svc.fetch_snapshot(&targets).await;
        assert_eq!(snapshot.prices.get("AAPL"), Some(185.0));
        assert_eq!(snapshot.prices.get("0700"), Some(310.0));
        assert_eq!(snapshot.failed, vec!["NOPE".to_string()]);
        assert_eq!(snapshot.failed_count(), 1);
    }

    #[tokio::test]
    async fn snapshot_of_empty_targets_is_empty() {
        let svc = make_service_with_mock();
        let snapshot = svc.fetch_snapshot(&[]).await;
        assert!(snapshot.prices.is_empty());
        assert!(snapshot.failed.is_empty());
    }

    #[test]
    fn has_provider_for_and_names() {
        let svc = make_service_with_mock();
        assert!(svc.has_provider_for(&Market::Us));
        assert!(svc.has_provider_for(&Market::Hk));
        assert_eq!(svc.provider_names(&Market::Us), vec!["MockProvider".to_string()]);

        let empty = QuoteService::new(QuoteProviderRegistry::new());
        assert!(!empty.has_provider_for(&Market::Us));
        assert!(empty.provider_names(&Market::Us).is_empty());
    }

    #[tokio::test]
    async fn with_prices_constructor_used_for_partial_coverage() {
        let mut prices = HashMap::new();
        prices.insert("GLD".to_string(), 190.0);
        let mut registry = QuoteProviderRegistry::new();
        registry.register(Box::new(MockQuoteProvider::with_prices(prices)));
        let svc = QuoteService::new(registry);

        assert_eq!(svc.fetch_quote("GLD", &Market::Us).await.unwrap(), 190.0);
        assert!(svc.fetch_quote("AAPL", &Market::Us).await.is_err());
    }
}
