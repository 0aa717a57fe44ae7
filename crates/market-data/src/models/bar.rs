use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::lenient;

/// Granularity of a requested series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IntervalKind {
    /// Fine-grained bars within the current session
    #[default]
    Intraday,
    /// One bar per trading day
    Daily,
}

impl IntervalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Intraday => "intraday",
            Self::Daily => "daily",
        }
    }
}

impl fmt::Display for IntervalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntervalKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "intraday" => Ok(Self::Intraday),
            "daily" => Ok(Self::Daily),
            other => Err(format!("unknown interval kind: {}", other)),
        }
    }
}

/// Position of a bar on the time axis.
///
/// Intraday bars carry a timestamp, daily bars a calendar date. Serialized as
/// a `time` or `date` field on the enclosing bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarTime {
    Time(NaiveDateTime),
    Date(NaiveDate),
}

/// One OHLCV bar. `close` is the price indicators read.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OhlcvBar {
    #[serde(flatten)]
    pub time: BarTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl OhlcvBar {
    /// A bar is usable only if it has a positive, finite close.
    pub fn is_valid(&self) -> bool {
        self.close.is_finite() && self.close > 0.0
    }
}

/// One entry of a legacy-keyed time series mapping.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct LegacyBar {
    #[serde(default, rename = "1. open", deserialize_with = "lenient::string")]
    pub open: Option<String>,
    #[serde(default, rename = "2. high", deserialize_with = "lenient::string")]
    pub high: Option<String>,
    #[serde(default, rename = "3. low", deserialize_with = "lenient::string")]
    pub low: Option<String>,
    #[serde(default, rename = "4. close", deserialize_with = "lenient::string")]
    pub close: Option<String>,
    #[serde(default, rename = "5. volume", deserialize_with = "lenient::string")]
    pub volume: Option<String>,
}
