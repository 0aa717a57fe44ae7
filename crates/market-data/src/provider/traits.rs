//! Market data provider trait definitions.
//!
//! This module defines the core `MarketDataProvider` trait that every
//! upstream adapter implements.

use async_trait::async_trait;

use crate::models::{IntervalKind, NewsArticle, NormalizedQuote, OhlcvBar, SearchResult};

use super::capabilities::ProviderCapabilities;

/// Trait for market data providers.
///
/// One implementation wraps exactly one upstream source and translates its
/// payloads into the canonical models. Every method is infallible from the
/// caller's point of view: transport failures, bad statuses, malformed
/// payloads and unknown symbols all come back as `None` or an empty `Vec`.
/// That uniform soft-failure contract is what lets the resolver chain
/// providers without inspecting errors.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use zeterminal_market_data::provider::{MarketDataProvider, ProviderCapabilities};
///
/// struct MyProvider;
///
/// #[async_trait]
/// impl MarketDataProvider for MyProvider {
///     fn id(&self) -> &'static str {
///         "MY_PROVIDER"
///     }
///
///     fn capabilities(&self) -> ProviderCapabilities {
///         ProviderCapabilities::quotes_and_series()
///     }
///
///     // ... override fetch_quote / fetch_series
/// }
/// ```
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "ALPHA_VANTAGE", "YAHOO", etc.
    /// Used for logging and stamped on every quote the provider produces.
    fn id(&self) -> &'static str;

    /// Describes what this provider can do.
    fn capabilities(&self) -> ProviderCapabilities;

    /// Fetch the current quote for `symbol`, or `None` if the provider has
    /// nothing usable.
    async fn fetch_quote(&self, symbol: &str) -> Option<NormalizedQuote> {
        let _ = symbol;
        None
    }

    /// Fetch the bars for `symbol` at the given interval kind.
    ///
    /// Bars are normalized but not yet assembled: order is whatever the
    /// upstream used and invalid bars may still be present.
    async fn fetch_series(&self, symbol: &str, interval: IntervalKind) -> Option<Vec<OhlcvBar>> {
        let _ = (symbol, interval);
        None
    }

    /// Search for symbols matching `query`. Empty on any failure.
    async fn fetch_search(&self, query: &str) -> Vec<SearchResult> {
        let _ = query;
        Vec::new()
    }

    /// Fetch headlines about `symbol`, or general market news when `None`.
    /// Empty on any failure.
    async fn fetch_news(&self, symbol: Option<&str>) -> Vec<NewsArticle> {
        let _ = symbol;
        Vec::new()
    }
}
