//! Market data service.
//!
//! The entry point consumers use. Wires the HTTP upstream, the provider
//! adapters and the fallback resolver together from a [`ProviderConfig`] and
//! exposes the dashboard-level operations on top of them.

use std::collections::HashMap;
use std::sync::Arc;

use log::info;
use serde::Serialize;

use crate::config::{MarketIndex, ProviderConfig, MARKET_INDICES, TICKER_SYMBOLS};
use crate::indicators::{IndicatorSet, DEFAULT_INDICATOR_WINDOW};
use crate::models::{IntervalKind, NewsArticle, NormalizedQuote, SearchResult, Series};
use crate::portfolio::{value_positions, PortfolioSummary, Position};
use crate::provider::alpha_vantage::AlphaVantageProvider;
use crate::provider::news_api::NewsApiProvider;
use crate::provider::yahoo::YahooProvider;
use crate::provider::{HttpUpstream, UpstreamClient};
use crate::registry::{CancelToken, FallbackResolver};

/// A market index quote paired with its display name.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexQuote {
    pub name: String,
    #[serde(flatten)]
    pub quote: NormalizedQuote,
}

pub struct MarketDataService {
    resolver: FallbackResolver,
    watchlist: Vec<String>,
    indices: Vec<MarketIndex>,
}

impl MarketDataService {
    /// Build the service with the default provider set: Alpha Vantage as
    /// primary, Yahoo as secondary and NewsAPI for headlines.
    pub fn new(config: &ProviderConfig) -> Self {
        let upstream: Arc<dyn UpstreamClient> = Arc::new(HttpUpstream::new(config));

        let resolver = FallbackResolver::new(
            Arc::new(AlphaVantageProvider::new(upstream.clone(), config)),
            Arc::new(YahooProvider::new(upstream.clone())),
        )
        .with_news(Arc::new(NewsApiProvider::new(upstream, config)));

        info!(
            "Market data service ready (news {})",
            if config.news_api_key.is_some() {
                "enabled"
            } else {
                "disabled"
            }
        );

        Self::with_resolver(resolver, config.watchlist.clone())
    }

    /// Build the service around an existing resolver.
    pub fn with_resolver(resolver: FallbackResolver, watchlist: Vec<String>) -> Self {
        Self {
            resolver,
            watchlist,
            indices: MARKET_INDICES.to_vec(),
        }
    }

    pub fn resolver(&self) -> &FallbackResolver {
        &self.resolver
    }

    pub async fn get_quote(&self, symbol: &str, cancel: &CancelToken) -> Option<NormalizedQuote> {
        self.resolver.get_quote(symbol, cancel).await
    }

    pub async fn get_quotes(&self, symbols: &[String], cancel: &CancelToken) -> Vec<NormalizedQuote> {
        self.resolver.get_quotes(symbols, cancel).await
    }

    pub async fn get_series(
        &self,
        symbol: &str,
        interval: IntervalKind,
        limit: Option<usize>,
        cancel: &CancelToken,
    ) -> Series {
        self.resolver.get_series(symbol, interval, limit, cancel).await
    }

    pub async fn get_search(&self, query: &str, cancel: &CancelToken) -> Vec<SearchResult> {
        self.resolver.get_search(query, cancel).await
    }

    pub async fn get_news(
        &self,
        symbol: Option<&str>,
        limit: Option<usize>,
        cancel: &CancelToken,
    ) -> Vec<NewsArticle> {
        self.resolver.get_news(symbol, limit, cancel).await
    }

    /// Indicators over an already assembled series. No I/O.
    pub fn get_indicators(series: &Series) -> IndicatorSet {
        IndicatorSet::from_series(series)
    }

    /// Indicators over the most recent `window` daily bars of `symbol`
    /// (default [`DEFAULT_INDICATOR_WINDOW`]). `None` when no series is
    /// available.
    pub async fn get_indicators_for(
        &self,
        symbol: &str,
        window: Option<usize>,
        cancel: &CancelToken,
    ) -> Option<IndicatorSet> {
        let window = window.unwrap_or(DEFAULT_INDICATOR_WINDOW);
        let series = self
            .get_series(symbol, IntervalKind::Daily, Some(window), cancel)
            .await;

        (!series.is_empty()).then(|| Self::get_indicators(&series))
    }

    /// Quotes for the configured watchlist.
    pub async fn get_watchlist(&self, cancel: &CancelToken) -> Vec<NormalizedQuote> {
        self.get_quotes(&self.watchlist, cancel).await
    }

    /// Quotes for the ticker symbols.
    pub async fn get_ticker(&self, cancel: &CancelToken) -> Vec<NormalizedQuote> {
        let symbols: Vec<String> = TICKER_SYMBOLS.iter().map(|s| s.to_string()).collect();
        self.get_quotes(&symbols, cancel).await
    }

    /// Index quotes in configured order. Indices without a quote are omitted.
    pub async fn get_market_indices(&self, cancel: &CancelToken) -> Vec<IndexQuote> {
        let symbols: Vec<String> = self.indices.iter().map(|i| i.symbol.to_string()).collect();

        let mut by_symbol: HashMap<String, NormalizedQuote> = self
            .resolver
            .get_quotes_by_symbol(&symbols, cancel)
            .await
            .into_iter()
            .filter_map(|(symbol, quote)| Some((symbol, quote?)))
            .collect();

        self.indices
            .iter()
            .filter_map(|index| {
                by_symbol
                    .remove(&index.symbol.trim().to_uppercase())
                    .map(|quote| IndexQuote {
                        name: index.name.to_string(),
                        quote,
                    })
            })
            .collect()
    }

    /// Value `positions` at current prices.
    pub async fn get_portfolio(
        &self,
        positions: &[Position],
        cancel: &CancelToken,
    ) -> PortfolioSummary {
        let symbols: Vec<String> = positions.iter().map(|p| p.symbol.clone()).collect();
        let quotes = self.get_quotes(&symbols, cancel).await;
        value_positions(positions, &quotes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BarTime, OhlcvBar};
    use crate::provider::{MarketDataProvider, ProviderCapabilities};
    use async_trait::async_trait;
    use chrono::NaiveDate;

    /// Knows a fixed set of symbols with one price each.
    struct FixedProvider {
        prices: HashMap<&'static str, f64>,
    }

    #[async_trait]
    impl MarketDataProvider for FixedProvider {
        fn id(&self) -> &'static str {
            "FIXED"
        }

        fn capabilities(&self) -> ProviderCapabilities {
            ProviderCapabilities::quotes_and_series()
        }

        async fn fetch_quote(&self, symbol: &str) -> Option<NormalizedQuote> {
            let price = *self.prices.get(symbol)?;
            Some(NormalizedQuote {
                symbol: symbol.to_string(),
                price,
                change: 0.0,
                change_percent: 0.0,
                open: price,
                high: price,
                low: price,
                previous_close: price,
                volume: 0,
                source: "FIXED".to_string(),
            })
        }

        async fn fetch_series(
            &self,
            symbol: &str,
            _interval: IntervalKind,
        ) -> Option<Vec<OhlcvBar>> {
            self.prices.get(symbol)?;
            Some(
                (1..=30)
                    .map(|day| OhlcvBar {
                        time: BarTime::Date(NaiveDate::from_ymd_opt(2024, 1, day).unwrap()),
                        open: day as f64,
                        high: day as f64,
                        low: day as f64,
                        close: day as f64,
                        volume: 10,
                    })
                    .collect(),
            )
        }
    }

    fn service() -> MarketDataService {
        let known = Arc::new(FixedProvider {
            prices: HashMap::from([("AAPL", 180.0), ("SPY", 470.0), ("^VIX", 13.5)]),
        });
        let empty = Arc::new(FixedProvider {
            prices: HashMap::new(),
        });
        MarketDataService::with_resolver(
            FallbackResolver::new(known, empty),
            vec!["AAPL".to_string(), "BADSYM".to_string()],
        )
    }

    #[tokio::test]
    async fn test_watchlist_drops_unknown_symbols() {
        let quotes = service().get_watchlist(&CancelToken::none()).await;
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].symbol, "AAPL");
    }

    #[tokio::test]
    async fn test_market_indices_keep_configured_order() {
        let indices = service().get_market_indices(&CancelToken::none()).await;
        let names: Vec<&str> = indices.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["S&P 500", "VIX"]);
        assert_eq!(indices[1].quote.price, 13.5);
    }

    /// Echoes a different symbol than the one requested, as upstreams do for
    /// index aliases.
    struct AliasingProvider;

    #[async_trait]
    impl MarketDataProvider for AliasingProvider {
        fn id(&self) -> &'static str {
            "ALIASING"
        }

        fn capabilities(&self) -> ProviderCapabilities {
            ProviderCapabilities::quotes_and_series()
        }

        async fn fetch_quote(&self, symbol: &str) -> Option<NormalizedQuote> {
            Some(NormalizedQuote {
                symbol: format!("{}.INDX", symbol.trim_start_matches('^').to_lowercase()),
                price: 100.0,
                change: 0.0,
                change_percent: 0.0,
                open: 100.0,
                high: 100.0,
                low: 100.0,
                previous_close: 100.0,
                volume: 0,
                source: "ALIASING".to_string(),
            })
        }

        async fn fetch_series(
            &self,
            _symbol: &str,
            _interval: IntervalKind,
        ) -> Option<Vec<OhlcvBar>> {
            None
        }
    }

    #[tokio::test]
    async fn test_market_indices_match_requested_symbol() {
        let empty = Arc::new(FixedProvider {
            prices: HashMap::new(),
        });
        let service = MarketDataService::with_resolver(
            FallbackResolver::new(Arc::new(AliasingProvider), empty),
            Vec::new(),
        );

        let indices = service.get_market_indices(&CancelToken::none()).await;

        assert_eq!(indices.len(), MARKET_INDICES.len());
        assert_eq!(indices[3].name, "VIX");
        assert_eq!(indices[3].quote.symbol, "vix.INDX");
    }

    #[tokio::test]
    async fn test_indicators_use_recent_window() {
        let set = service()
            .get_indicators_for("aapl", None, &CancelToken::none())
            .await
            .unwrap();
        // Window is days 11..=30
        assert_eq!(set.last_close, Some(30.0));
        assert_eq!(set.sma20, Some(20.5));
        assert!(set.sma50.is_none());
        assert_eq!(set.rsi14, Some(100.0));
    }

    #[tokio::test]
    async fn test_indicators_for_unknown_symbol_is_none() {
        assert!(service()
            .get_indicators_for("BADSYM", None, &CancelToken::none())
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_portfolio_uses_current_quotes() {
        let summary = service()
            .get_portfolio(
                &[Position::new("AAPL", 10.0, 150.0), Position::new("BADSYM", 1.0, 5.0)],
                &CancelToken::none(),
            )
            .await;
        assert_eq!(summary.positions[0].market_value, 1800.0);
        assert!(!summary.positions[1].quoted);
        assert_eq!(summary.total_cost, 1505.0);
    }
}
