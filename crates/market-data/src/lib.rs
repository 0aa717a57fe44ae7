//! Zeterminal Market Data Crate
//!
//! Provider-agnostic market data for the Zeterminal dashboard: quotes,
//! intraday and daily price series, symbol search, news and the analytics
//! derived from them.
//!
//! # Overview
//!
//! Upstream providers disagree on field names, value types and availability.
//! This crate presents one canonical view regardless of which provider
//! answered:
//! - Two payload shapes (legacy-keyed strings and plain numbers) normalized
//!   into [`NormalizedQuote`] and [`OhlcvBar`]
//! - Primary → secondary fallback for single-symbol requests
//! - Per-symbol provider races for bulk quote requests
//! - Chronologically ordered [`Series`] and [`IndicatorSet`] analytics
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! |     Caller       |  (UI / CLI)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! | FallbackResolver |  (sequential fallback, bulk race, cancellation)
//! +------------------+
//!          |
//!          v
//! +------------------+     +------------------+
//! |    Provider      | --> |   Normalizer     |  (Alpha Vantage, Yahoo, NewsAPI)
//! +------------------+     +------------------+
//!          |
//!          v
//! +------------------+     +------------------+
//! |    Assembler     | --> |   Indicators     |  (SMA, EMA, RSI)
//! +------------------+     +------------------+
//! ```
//!
//! # Failure model
//!
//! Errors never cross the resolver. Adapters log and drop them; callers see
//! either data or an explicit absence (`None`, an empty [`Series`], an empty
//! `Vec`).

pub mod assembler;
pub mod config;
pub mod errors;
pub mod indicators;
pub mod models;
pub mod normalizer;
pub mod portfolio;
pub mod provider;
pub mod registry;
pub mod service;

// Re-export model types
pub use models::{
    BarTime, IntervalKind, NewsArticle, NormalizedQuote, OhlcvBar, RawProviderQuote,
    SearchResult, Series,
};

pub use assembler::assemble;
pub use config::{
    MarketIndex, ProviderConfig, DEFAULT_WATCHLIST, DEMO_API_KEY, MARKET_INDICES, TICKER_SYMBOLS,
};
pub use errors::{FailureKind, MarketDataError};
pub use indicators::{ema, rsi, sma, IndicatorSet, RsiSignal};
pub use normalizer::{normalize_bar, normalize_quote};
pub use portfolio::{value_positions, PortfolioSummary, Position, PositionValuation};

// Re-export provider types
pub use provider::alpha_vantage::AlphaVantageProvider;
pub use provider::news_api::NewsApiProvider;
pub use provider::yahoo::YahooProvider;
pub use provider::{HttpUpstream, MarketDataProvider, ProviderCapabilities, UpstreamClient};

// Re-export registry types
pub use registry::{CancelToken, FallbackResolver};
pub use service::{IndexQuote, MarketDataService};
