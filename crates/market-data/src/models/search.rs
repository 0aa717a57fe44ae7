//! Search result models for symbol lookup.

use serde::{Deserialize, Serialize};

use super::lenient;

/// Result from a ticker/symbol search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Symbol/ticker (e.g., "AAPL", "SHOP.TRT")
    pub symbol: String,

    /// Display name (e.g., "Apple Inc")
    pub name: String,

    /// Market region (e.g., "United States")
    pub region: String,

    /// Trading currency (e.g., "USD")
    pub currency: String,
}

impl SearchResult {
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        region: impl Into<String>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            region: region.into(),
            currency: currency.into(),
        }
    }
}

/// Search match in the legacy-keyed shape. Search has no plain-field variant
/// upstream.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct LegacySearchMatch {
    #[serde(default, rename = "1. symbol", deserialize_with = "lenient::string")]
    pub symbol: Option<String>,
    #[serde(default, rename = "2. name", deserialize_with = "lenient::string")]
    pub name: Option<String>,
    #[serde(default, rename = "4. region", deserialize_with = "lenient::string")]
    pub region: Option<String>,
    #[serde(default, rename = "8. currency", deserialize_with = "lenient::string")]
    pub currency: Option<String>,
}
