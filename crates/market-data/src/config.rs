//! Provider configuration.
//!
//! Everything the adapters need from the process environment is collected
//! here and handed to them at construction time. Loading it from the
//! environment is the caller's job.

use std::time::Duration;

/// Placeholder key the primary provider accepts for its demo symbols.
pub const DEMO_API_KEY: &str = "demo";

/// Watchlist shown when the user has not configured one.
pub const DEFAULT_WATCHLIST: &[&str] = &["AAPL", "MSFT", "GOOGL", "TSLA"];

/// Symbols scrolled in the market ticker.
pub const TICKER_SYMBOLS: &[&str] = &[
    "AAPL", "MSFT", "GOOGL", "AMZN", "TSLA", "META", "NVDA", "JPM", "V", "JNJ",
];

/// A market index tracked through a proxy symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MarketIndex {
    pub symbol: &'static str,
    pub name: &'static str,
}

pub const MARKET_INDICES: &[MarketIndex] = &[
    MarketIndex {
        symbol: "SPY",
        name: "S&P 500",
    },
    MarketIndex {
        symbol: "QQQ",
        name: "NASDAQ",
    },
    MarketIndex {
        symbol: "DIA",
        name: "Dow Jones",
    },
    MarketIndex {
        symbol: "^VIX",
        name: "VIX",
    },
];

/// Configuration passed to the provider adapters.
#[derive(Clone, Debug)]
pub struct ProviderConfig {
    /// Key for the primary (legacy-keyed) provider. Defaults to [`DEMO_API_KEY`].
    pub alpha_vantage_api_key: String,

    /// Key for the news provider. `None` means news is always empty.
    pub news_api_key: Option<String>,

    /// Transport timeout applied by the HTTP client. The core itself does
    /// not time requests out.
    pub request_timeout: Duration,

    /// Bar width requested from the primary provider for intraday series.
    pub intraday_interval: String,

    /// User agent sent with every upstream request.
    pub user_agent: String,

    /// Symbols bulk-fetched for the watchlist.
    pub watchlist: Vec<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            alpha_vantage_api_key: DEMO_API_KEY.to_string(),
            news_api_key: None,
            request_timeout: Duration::from_secs(30),
            intraday_interval: "5min".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
            watchlist: DEFAULT_WATCHLIST.iter().map(|s| s.to_string()).collect(),
        }
    }
}
