//! Alpha Vantage market data provider implementation.
//!
//! The primary provider. All of its payloads use the legacy-keyed shape:
//! - Quotes via the GLOBAL_QUOTE endpoint
//! - Intraday bars via TIME_SERIES_INTRADAY
//! - Daily bars via TIME_SERIES_DAILY
//! - Symbol search via SYMBOL_SEARCH
//!
//! Note: the free tier is heavily throttled. Quota exhaustion is reported in
//! the response body rather than with a status code and degrades to "no data".

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;

use crate::config::ProviderConfig;
use crate::errors::MarketDataError;
use crate::models::{
    IntervalKind, LegacyBar, LegacySearchMatch, NormalizedQuote, OhlcvBar, RawProviderQuote,
    SearchResult,
};
use crate::normalizer::{normalize_bars, normalize_quote, normalize_search_match};
use crate::provider::soft::SoftFailure;
use crate::provider::{MarketDataProvider, ProviderCapabilities, UpstreamClient};

const BASE_URL: &str = "https://www.alphavantage.co/query";
const PROVIDER_ID: &str = "ALPHA_VANTAGE";
const DAILY_SERIES_KEY: &str = "Time Series (Daily)";

/// Alpha Vantage market data provider.
pub struct AlphaVantageProvider {
    upstream: Arc<dyn UpstreamClient>,
    api_key: String,
    intraday_interval: String,
}

// ============================================================================
// Response structures for Alpha Vantage API
// ============================================================================

/// Free-text notices Alpha Vantage puts in the body instead of an HTTP error.
#[derive(Debug, Default, Deserialize)]
struct ApiNotices {
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

/// GLOBAL_QUOTE response
#[derive(Debug, Deserialize)]
struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote")]
    quote: Option<RawProviderQuote>,
    #[serde(flatten)]
    notices: ApiNotices,
}

/// SYMBOL_SEARCH response
#[derive(Debug, Deserialize)]
struct SymbolSearchResponse {
    #[serde(rename = "bestMatches", default)]
    best_matches: Vec<LegacySearchMatch>,
    #[serde(flatten)]
    notices: ApiNotices,
}

// ============================================================================
// AlphaVantageProvider implementation
// ============================================================================

impl AlphaVantageProvider {
    pub fn new(upstream: Arc<dyn UpstreamClient>, config: &ProviderConfig) -> Self {
        Self {
            upstream,
            api_key: config.alpha_vantage_api_key.trim().to_string(),
            intraday_interval: config.intraday_interval.clone(),
        }
    }

    /// Make a request to the Alpha Vantage API.
    async fn fetch(&self, params: &[(&str, &str)]) -> Result<Value, MarketDataError> {
        if self.api_key.is_empty() {
            return Err(MarketDataError::MissingApiKey(PROVIDER_ID.to_string()));
        }

        let mut all_params: Vec<(&str, &str)> = params.to_vec();
        all_params.push(("apikey", self.api_key.as_str()));

        self.upstream
            .get_json(PROVIDER_ID, BASE_URL, &all_params)
            .await
    }

    /// Check for API-level errors in the response.
    fn check_api_error(notices: &ApiNotices) -> Result<(), MarketDataError> {
        if let Some(ref msg) = notices.error_message {
            if msg.contains("Invalid API call") || msg.contains("not found") {
                return Err(MarketDataError::SymbolNotFound(msg.clone()));
            }
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: msg.clone(),
            });
        }

        for msg in [&notices.note, &notices.information].into_iter().flatten() {
            if msg.contains("API call frequency")
                || msg.contains("rate limit")
                || msg.contains("requests per day")
            {
                return Err(MarketDataError::RateLimited {
                    provider: PROVIDER_ID.to_string(),
                });
            }
            warn!("Alpha Vantage notice: {}", msg);
        }

        Ok(())
    }

    fn series_key(&self, interval: IntervalKind) -> String {
        match interval {
            IntervalKind::Intraday => format!("Time Series ({})", self.intraday_interval),
            IntervalKind::Daily => DAILY_SERIES_KEY.to_string(),
        }
    }

    async fn quote(&self, symbol: &str) -> Result<NormalizedQuote, MarketDataError> {
        let symbol = symbol.trim().to_uppercase();
        let value = self
            .fetch(&[("function", "GLOBAL_QUOTE"), ("symbol", symbol.as_str())])
            .await?;

        let response: GlobalQuoteResponse = serde_json::from_value(value)
            .map_err(|e| MarketDataError::schema(PROVIDER_ID, e.to_string()))?;
        Self::check_api_error(&response.notices)?;

        // Unknown symbols come back as an empty "Global Quote" object
        let raw = response
            .quote
            .filter(|q| !q.is_empty())
            .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.clone()))?;

        Ok(normalize_quote(&raw, &symbol, PROVIDER_ID))
    }

    async fn series(
        &self,
        symbol: &str,
        interval: IntervalKind,
    ) -> Result<Vec<OhlcvBar>, MarketDataError> {
        let symbol = symbol.trim().to_uppercase();
        let mut value = match interval {
            IntervalKind::Intraday => {
                self.fetch(&[
                    ("function", "TIME_SERIES_INTRADAY"),
                    ("symbol", symbol.as_str()),
                    ("interval", self.intraday_interval.as_str()),
                ])
                .await?
            }
            IntervalKind::Daily => {
                self.fetch(&[("function", "TIME_SERIES_DAILY"), ("symbol", symbol.as_str())])
                    .await?
            }
        };

        let notices: ApiNotices = serde_json::from_value(value.clone()).unwrap_or_default();
        Self::check_api_error(&notices)?;

        let key = self.series_key(interval);
        let raw_series = value
            .get_mut(&key)
            .map(Value::take)
            .ok_or_else(|| MarketDataError::SymbolNotFound(format!("No {} for {}", key, symbol)))?;

        let raw_series: HashMap<String, LegacyBar> = serde_json::from_value(raw_series)
            .map_err(|e| MarketDataError::schema(PROVIDER_ID, format!("{}: {}", key, e)))?;

        let bars = normalize_bars(&raw_series, interval);
        if bars.is_empty() {
            return Err(MarketDataError::SymbolNotFound(symbol));
        }

        debug!(
            "Alpha Vantage: fetched {} {} bars for {}",
            bars.len(),
            interval,
            symbol
        );

        Ok(bars)
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, MarketDataError> {
        let value = self
            .fetch(&[("function", "SYMBOL_SEARCH"), ("keywords", query)])
            .await?;

        let response: SymbolSearchResponse = serde_json::from_value(value)
            .map_err(|e| MarketDataError::schema(PROVIDER_ID, e.to_string()))?;
        Self::check_api_error(&response.notices)?;

        Ok(response
            .best_matches
            .iter()
            .filter_map(normalize_search_match)
            .collect())
    }
}

// ============================================================================
// MarketDataProvider trait implementation
// ============================================================================

#[async_trait]
impl MarketDataProvider for AlphaVantageProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::market_data()
    }

    async fn fetch_quote(&self, symbol: &str) -> Option<NormalizedQuote> {
        self.quote(symbol).await.soft(PROVIDER_ID, "quote", symbol)
    }

    async fn fetch_series(&self, symbol: &str, interval: IntervalKind) -> Option<Vec<OhlcvBar>> {
        self.series(symbol, interval)
            .await
            .soft(PROVIDER_ID, "series", symbol)
    }

    async fn fetch_search(&self, query: &str) -> Vec<SearchResult> {
        self.search(query)
            .await
            .soft(PROVIDER_ID, "search", query)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BarTime;
    use crate::provider::testing::CannedUpstream;
    use serde_json::json;

    fn provider(upstream: Arc<CannedUpstream>) -> AlphaVantageProvider {
        let config = ProviderConfig {
            alpha_vantage_api_key: "test_key".to_string(),
            ..Default::default()
        };
        AlphaVantageProvider::new(upstream, &config)
    }

    #[test]
    fn test_provider_id() {
        let p = provider(Arc::new(CannedUpstream::ok(json!({}))));
        assert_eq!(p.id(), "ALPHA_VANTAGE");
    }

    #[test]
    fn test_provider_capabilities() {
        let caps = provider(Arc::new(CannedUpstream::ok(json!({})))).capabilities();
        assert!(caps.supports_quote);
        assert!(caps.supports_series);
        assert!(caps.supports_search);
        assert!(!caps.supports_news);
    }

    #[tokio::test]
    async fn test_fetch_quote() {
        let upstream = Arc::new(CannedUpstream::ok(json!({
            "Global Quote": {
                "01. symbol": "IBM",
                "02. open": "168.0000",
                "03. high": "170.1000",
                "04. low": "167.5000",
                "05. price": "169.2500",
                "06. volume": "4123456",
                "07. latest trading day": "2024-01-15",
                "08. previous close": "167.9000",
                "09. change": "1.3500",
                "10. change percent": "0.8041%"
            }
        })));
        let p = provider(upstream.clone());

        let quote = p.fetch_quote("ibm").await.unwrap();
        assert_eq!(quote.symbol, "IBM");
        assert_eq!(quote.price, 169.25);
        assert_eq!(quote.volume, 4123456);
        assert_eq!(quote.source, "ALPHA_VANTAGE");

        let query = upstream.last_query();
        assert!(query.contains(&("function".to_string(), "GLOBAL_QUOTE".to_string())));
        assert!(query.contains(&("symbol".to_string(), "IBM".to_string())));
        assert!(query.contains(&("apikey".to_string(), "test_key".to_string())));
    }

    #[tokio::test]
    async fn test_fetch_quote_empty_object_is_none() {
        let p = provider(Arc::new(CannedUpstream::ok(json!({ "Global Quote": {} }))));
        assert!(p.fetch_quote("BADSYM").await.is_none());
    }

    #[tokio::test]
    async fn test_fetch_quote_rate_limit_note_is_none() {
        let p = provider(Arc::new(CannedUpstream::ok(json!({
            "Note": "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute."
        }))));
        assert!(p.fetch_quote("IBM").await.is_none());
    }

    #[tokio::test]
    async fn test_fetch_quote_http_error_is_none() {
        let p = provider(Arc::new(CannedUpstream::status(503)));
        assert!(p.fetch_quote("IBM").await.is_none());
    }

    #[tokio::test]
    async fn test_missing_key_never_calls_upstream() {
        let upstream = Arc::new(CannedUpstream::ok(json!({})));
        let config = ProviderConfig {
            alpha_vantage_api_key: "  ".to_string(),
            ..Default::default()
        };
        let p = AlphaVantageProvider::new(upstream.clone(), &config);
        assert!(p.fetch_quote("IBM").await.is_none());
        assert_eq!(upstream.calls(), 0);
    }

    #[tokio::test]
    async fn test_fetch_daily_series() {
        let p = provider(Arc::new(CannedUpstream::ok(json!({
            "Meta Data": { "2. Symbol": "IBM" },
            "Time Series (Daily)": {
                "2024-01-16": {
                    "1. open": "170.0", "2. high": "171.0", "3. low": "169.0",
                    "4. close": "170.5", "5. volume": "2000"
                },
                "2024-01-15": {
                    "1. open": "168.0", "2. high": "170.1", "3. low": "167.5",
                    "4. close": "169.25", "5. volume": "1000"
                }
            }
        }))));

        let bars = p.fetch_series("IBM", IntervalKind::Daily).await.unwrap();
        assert_eq!(bars.len(), 2);
        assert!(bars.iter().all(|b| matches!(b.time, BarTime::Date(_))));
        assert!(bars.iter().any(|b| b.close == 170.5 && b.volume == 2000));
    }

    #[tokio::test]
    async fn test_fetch_intraday_series_uses_interval_key() {
        let upstream = Arc::new(CannedUpstream::ok(json!({
            "Time Series (5min)": {
                "2024-01-15 16:00:00": {
                    "1. open": "1", "2. high": "1", "3. low": "1",
                    "4. close": "1", "5. volume": "1"
                }
            }
        })));
        let p = provider(upstream.clone());

        let bars = p.fetch_series("IBM", IntervalKind::Intraday).await.unwrap();
        assert_eq!(bars.len(), 1);
        assert!(matches!(bars[0].time, BarTime::Time(_)));
        assert!(upstream
            .last_query()
            .contains(&("interval".to_string(), "5min".to_string())));
    }

    #[tokio::test]
    async fn test_fetch_series_error_message_is_none() {
        let p = provider(Arc::new(CannedUpstream::ok(json!({
            "Error Message": "Invalid API call. Please retry or visit the documentation."
        }))));
        assert!(p.fetch_series("BADSYM", IntervalKind::Daily).await.is_none());
    }

    #[tokio::test]
    async fn test_fetch_search() {
        let p = provider(Arc::new(CannedUpstream::ok(json!({
            "bestMatches": [
                {
                    "1. symbol": "TSCO.LON", "2. name": "Tesco PLC", "3. type": "Equity",
                    "4. region": "United Kingdom", "8. currency": "GBX"
                },
                { "2. name": "No symbol" }
            ]
        }))));

        let results = p.fetch_search("tesco").await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].symbol, "TSCO.LON");
        assert_eq!(results[0].currency, "GBX");
    }

    #[tokio::test]
    async fn test_fetch_search_failure_is_empty() {
        let p = provider(Arc::new(CannedUpstream::status(500)));
        assert!(p.fetch_search("tesco").await.is_empty());
    }

    #[test]
    fn test_check_api_error() {
        let notices = ApiNotices {
            error_message: Some("Invalid API call".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            AlphaVantageProvider::check_api_error(&notices),
            Err(MarketDataError::SymbolNotFound(_))
        ));

        let notices = ApiNotices {
            information: Some("You have reached the 25 requests per day limit".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            AlphaVantageProvider::check_api_error(&notices),
            Err(MarketDataError::RateLimited { .. })
        ));

        let notices = ApiNotices {
            information: Some("The demo API key is for demo purposes only.".to_string()),
            ..Default::default()
        };
        assert!(AlphaVantageProvider::check_api_error(&notices).is_ok());
    }
}
