use serde::{Deserialize, Serialize};

use super::lenient;

/// Canonical quote, identical regardless of which provider answered.
///
/// Numeric fields the upstream did not supply are 0, never `NaN`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedQuote {
    /// Uppercase ticker
    pub symbol: String,

    /// Last traded price
    pub price: f64,

    /// Absolute change against the previous close
    pub change: f64,

    /// Percent change against the previous close
    pub change_percent: f64,

    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub previous_close: f64,
    pub volume: u64,

    /// Provider that produced the quote (ALPHA_VANTAGE, YAHOO, ...)
    pub source: String,
}

/// Quote payload as it arrives from a provider.
///
/// Holds both upstream shapes at once: the legacy shape with numbered string
/// labels (`"05. price"`) and the plain shape with numeric fields (`price`).
/// A single object may carry either or both; the normalizer decides which
/// value wins per field.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawProviderQuote {
    // Plain shape
    #[serde(default, deserialize_with = "lenient::string")]
    pub symbol: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub change: Option<f64>,
    #[serde(default, rename = "changePercent", deserialize_with = "lenient::number")]
    pub change_percent: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub open: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub high: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub low: Option<f64>,
    #[serde(default, rename = "previousClose", deserialize_with = "lenient::number")]
    pub previous_close: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub volume: Option<f64>,

    // Legacy shape
    #[serde(default, rename = "01. symbol", deserialize_with = "lenient::string")]
    pub legacy_symbol: Option<String>,
    #[serde(default, rename = "02. open", deserialize_with = "lenient::string")]
    pub legacy_open: Option<String>,
    #[serde(default, rename = "03. high", deserialize_with = "lenient::string")]
    pub legacy_high: Option<String>,
    #[serde(default, rename = "04. low", deserialize_with = "lenient::string")]
    pub legacy_low: Option<String>,
    #[serde(default, rename = "05. price", deserialize_with = "lenient::string")]
    pub legacy_price: Option<String>,
    #[serde(default, rename = "06. volume", deserialize_with = "lenient::string")]
    pub legacy_volume: Option<String>,
    #[serde(default, rename = "08. previous close", deserialize_with = "lenient::string")]
    pub legacy_previous_close: Option<String>,
    #[serde(default, rename = "09. change", deserialize_with = "lenient::string")]
    pub legacy_change: Option<String>,
    #[serde(default, rename = "10. change percent", deserialize_with = "lenient::string")]
    pub legacy_change_percent: Option<String>,
}

impl RawProviderQuote {
    /// True when neither shape carries a price. Providers answer an unknown
    /// symbol with an empty object, which deserializes to this.
    pub fn is_empty(&self) -> bool {
        self.price.is_none() && self.legacy_price.is_none()
    }
}
