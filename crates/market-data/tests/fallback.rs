//! End-to-end resolver tests.
//!
//! The real adapters run against a routed in-memory upstream so the whole
//! path from upstream JSON to the caller's result is exercised without the
//! network.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use zeterminal_market_data::{
    AlphaVantageProvider, BarTime, CancelToken, FallbackResolver, IntervalKind, MarketDataError,
    MarketDataProvider, ProviderConfig, UpstreamClient, YahooProvider,
};

// =============================================================================
// Upstream double
// =============================================================================

type Route = Box<dyn Fn(&str, &[(&str, &str)]) -> Result<Value, MarketDataError> + Send + Sync>;

/// Answers each request through `route`, optionally after a delay, and counts
/// requests per host.
struct RoutedUpstream {
    route: Route,
    delay: Duration,
    alpha_calls: AtomicUsize,
    yahoo_calls: AtomicUsize,
}

impl RoutedUpstream {
    fn new(
        route: impl Fn(&str, &[(&str, &str)]) -> Result<Value, MarketDataError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            route: Box::new(route),
            delay: Duration::ZERO,
            alpha_calls: AtomicUsize::new(0),
            yahoo_calls: AtomicUsize::new(0),
        }
    }

    fn alpha_calls(&self) -> usize {
        self.alpha_calls.load(Ordering::SeqCst)
    }

    fn yahoo_calls(&self) -> usize {
        self.yahoo_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UpstreamClient for RoutedUpstream {
    async fn get_json(
        &self,
        _provider: &str,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<Value, MarketDataError> {
        if url.contains("alphavantage") {
            self.alpha_calls.fetch_add(1, Ordering::SeqCst);
        } else if url.contains("yahoo") {
            self.yahoo_calls.fetch_add(1, Ordering::SeqCst);
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        (self.route)(url, query)
    }
}

fn param<'a>(query: &'a [(&str, &str)], key: &str) -> Option<&'a str> {
    query.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

fn not_found() -> Result<Value, MarketDataError> {
    Err(MarketDataError::HttpStatus {
        provider: "TEST".to_string(),
        status: 404,
    })
}

fn global_quote(symbol: &str, price: &str, previous_close: &str) -> Value {
    json!({
        "Global Quote": {
            "01. symbol": symbol,
            "02. open": price,
            "03. high": price,
            "04. low": price,
            "05. price": price,
            "06. volume": "1000",
            "08. previous close": previous_close,
            "09. change": "0.0",
            "10. change percent": "0.0000%"
        }
    })
}

fn yahoo_chart(symbol: &str, price: f64, previous_close: f64) -> Value {
    json!({
        "chart": {
            "result": [{
                "meta": {
                    "symbol": symbol,
                    "regularMarketPrice": price,
                    "previousClose": previous_close
                },
                "timestamp": [1704153600, 1704240000, 1704326400],
                "indicators": {
                    "quote": [{
                        "open":   [1.0, 2.0, 3.0],
                        "high":   [1.0, 2.0, 3.0],
                        "low":    [1.0, 2.0, 3.0],
                        "close":  [1.0, 2.0, 3.0],
                        "volume": [10, 20, 30]
                    }]
                }
            }]
        }
    })
}

fn resolver(upstream: Arc<RoutedUpstream>) -> FallbackResolver {
    let config = ProviderConfig {
        alpha_vantage_api_key: "test".to_string(),
        ..Default::default()
    };
    let primary: Arc<dyn MarketDataProvider> =
        Arc::new(AlphaVantageProvider::new(upstream.clone(), &config));
    let secondary: Arc<dyn MarketDataProvider> = Arc::new(YahooProvider::new(upstream));
    FallbackResolver::new(primary, secondary)
}

// =============================================================================
// Single-symbol fallback
// =============================================================================

#[tokio::test]
async fn test_primary_answer_never_consults_secondary() {
    let upstream = Arc::new(RoutedUpstream::new(|url, query| {
        if url.contains("alphavantage") {
            Ok(global_quote(param(query, "symbol").unwrap_or(""), "110.00", "100.00"))
        } else {
            Ok(yahoo_chart("AAPL", 1.0, 1.0))
        }
    }));

    let quote = resolver(upstream.clone())
        .get_quote("AAPL", &CancelToken::none())
        .await
        .unwrap();

    assert_eq!(quote.source, "ALPHA_VANTAGE");
    assert_eq!(quote.price, 110.0);
    assert!((quote.change_percent - 10.0).abs() < 1e-9);
    assert_eq!(upstream.alpha_calls(), 1);
    assert_eq!(upstream.yahoo_calls(), 0);
}

#[tokio::test]
async fn test_secondary_answers_when_primary_throttled() {
    let upstream = Arc::new(RoutedUpstream::new(|url, _| {
        if url.contains("alphavantage") {
            Ok(json!({
                "Note": "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute."
            }))
        } else {
            Ok(yahoo_chart("MSFT", 420.0, 400.0))
        }
    }));

    let quote = resolver(upstream.clone())
        .get_quote("msft", &CancelToken::none())
        .await
        .unwrap();

    assert_eq!(quote.source, "YAHOO");
    assert_eq!(quote.symbol, "MSFT");
    assert_eq!(quote.change, 20.0);
    assert!((quote.change_percent - 5.0).abs() < 1e-9);
    assert_eq!(upstream.alpha_calls(), 1);
    assert_eq!(upstream.yahoo_calls(), 1);
}

#[tokio::test]
async fn test_unknown_symbol_is_absent_not_error() {
    let upstream = Arc::new(RoutedUpstream::new(|url, _| {
        if url.contains("alphavantage") {
            Ok(json!({ "Global Quote": {} }))
        } else {
            not_found()
        }
    }));

    assert!(resolver(upstream)
        .get_quote("BADSYM", &CancelToken::none())
        .await
        .is_none());
}

// =============================================================================
// Bulk race
// =============================================================================

#[tokio::test]
async fn test_bulk_drops_symbols_no_provider_has() {
    let upstream = Arc::new(RoutedUpstream::new(|url, query| {
        let wants_aapl = param(query, "symbol") == Some("AAPL") || url.ends_with("/AAPL");
        match (url.contains("alphavantage"), wants_aapl) {
            (true, true) => Ok(global_quote("AAPL", "190.00", "188.00")),
            (true, false) => Ok(json!({ "Global Quote": {} })),
            (false, true) => Ok(yahoo_chart("AAPL", 190.0, 188.0)),
            (false, false) => not_found(),
        }
    }));

    let quotes = resolver(upstream)
        .get_quotes(
            &["AAPL".to_string(), "BADSYM".to_string()],
            &CancelToken::none(),
        )
        .await;

    assert_eq!(quotes.len(), 1);
    assert_eq!(quotes[0].symbol, "AAPL");
    assert_eq!(quotes[0].price, 190.0);
}

#[tokio::test(start_paused = true)]
async fn test_bulk_keeps_input_order_across_symbols() {
    let mut upstream = RoutedUpstream::new(|url, query| {
        if url.contains("alphavantage") {
            Ok(global_quote(param(query, "symbol").unwrap_or(""), "10.00", "10.00"))
        } else {
            let symbol = url.rsplit('/').next().unwrap_or("").to_string();
            Ok(yahoo_chart(&symbol, 10.0, 10.0))
        }
    });
    upstream.delay = Duration::from_millis(100);
    let upstream = Arc::new(upstream);

    let symbols: Vec<String> = ["TSLA", "AAPL", "MSFT"].iter().map(|s| s.to_string()).collect();
    let quotes = resolver(upstream.clone())
        .get_quotes(&symbols, &CancelToken::none())
        .await;

    let resolved: Vec<&str> = quotes.iter().map(|q| q.symbol.as_str()).collect();
    assert_eq!(resolved, vec!["TSLA", "AAPL", "MSFT"]);
    // Both adapters are started for every symbol before either settles
    assert_eq!(upstream.alpha_calls(), 3);
    assert_eq!(upstream.yahoo_calls(), 3);
}

// =============================================================================
// Series
// =============================================================================

#[tokio::test]
async fn test_series_from_legacy_primary_is_ascending_and_limited() {
    let upstream = Arc::new(RoutedUpstream::new(|url, _| {
        if !url.contains("alphavantage") {
            return not_found();
        }
        let mut days = serde_json::Map::new();
        for day in 1..=20 {
            let close = format!("{}.0", day);
            days.insert(
                format!("2024-01-{:02}", day),
                json!({
                    "1. open": close,
                    "2. high": close,
                    "3. low": close,
                    "4. close": close,
                    "5. volume": "100"
                }),
            );
        }
        Ok(json!({
            "Meta Data": { "2. Symbol": "AAPL" },
            "Time Series (Daily)": days
        }))
    }));

    let series = resolver(upstream)
        .get_series("AAPL", IntervalKind::Daily, Some(5), &CancelToken::none())
        .await;

    assert_eq!(series.len(), 5);
    assert_eq!(series.closes(), vec![16.0, 17.0, 18.0, 19.0, 20.0]);
    let times: Vec<BarTime> = series.bars().iter().map(|b| b.time).collect();
    assert!(times.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn test_series_falls_back_to_secondary() {
    let upstream = Arc::new(RoutedUpstream::new(|url, _| {
        if url.contains("alphavantage") {
            Ok(json!({ "Error Message": "Invalid API call." }))
        } else {
            Ok(yahoo_chart("AAPL", 3.0, 2.0))
        }
    }));

    let series = resolver(upstream)
        .get_series("AAPL", IntervalKind::Daily, None, &CancelToken::none())
        .await;

    assert_eq!(series.closes(), vec![1.0, 2.0, 3.0]);
}

// =============================================================================
// Cancellation
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_cancel_mid_flight_is_not_found() {
    let mut upstream = RoutedUpstream::new(|_, query| {
        Ok(global_quote(param(query, "symbol").unwrap_or(""), "1.00", "1.00"))
    });
    upstream.delay = Duration::from_secs(60);
    let upstream = Arc::new(upstream);

    let resolver = resolver(upstream.clone());
    let cancel = CancelToken::new();
    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    assert!(resolver.get_quote("AAPL", &cancel).await.is_none());
    assert_eq!(upstream.alpha_calls(), 1);
    assert_eq!(upstream.yahoo_calls(), 0);
}

#[tokio::test]
async fn test_cancelled_bulk_returns_empty() {
    let upstream = Arc::new(RoutedUpstream::new(|_, query| {
        Ok(global_quote(param(query, "symbol").unwrap_or(""), "1.00", "1.00"))
    }));
    let cancel = CancelToken::new();
    cancel.cancel();

    let quotes = resolver(upstream.clone())
        .get_quotes(&["AAPL".to_string()], &cancel)
        .await;

    assert!(quotes.is_empty());
    assert_eq!(upstream.alpha_calls(), 0);
}
