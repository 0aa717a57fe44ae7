//! Provider capabilities.
//!
//! Describes which operations an adapter actually backs with an upstream
//! call, so the resolver can skip adapters that would only ever answer empty.

/// Operations a provider supports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProviderCapabilities {
    /// Single-symbol quotes.
    pub supports_quote: bool,

    /// Intraday and daily OHLCV series.
    pub supports_series: bool,

    /// Symbol/keyword search.
    pub supports_search: bool,

    /// News headlines.
    pub supports_news: bool,
}

impl ProviderCapabilities {
    /// Quotes, series and search.
    pub const fn market_data() -> Self {
        Self {
            supports_quote: true,
            supports_series: true,
            supports_search: true,
            supports_news: false,
        }
    }

    /// Quotes and series only.
    pub const fn quotes_and_series() -> Self {
        Self {
            supports_quote: true,
            supports_series: true,
            supports_search: false,
            supports_news: false,
        }
    }

    /// News only.
    pub const fn news() -> Self {
        Self {
            supports_quote: false,
            supports_series: false,
            supports_search: false,
            supports_news: true,
        }
    }
}
