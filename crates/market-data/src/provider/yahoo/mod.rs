//! Yahoo Finance market data provider.
//!
//! The secondary provider. It answers quotes and series from the v8 chart
//! endpoint, whose fields are already numeric (the plain shape). The upstream
//! does not supply change or change percent, so they are derived here from
//! price and previous close.

mod models;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;
use tracing::debug;
use urlencoding::encode;

use crate::errors::MarketDataError;
use crate::models::{BarTime, IntervalKind, NormalizedQuote, OhlcvBar, RawProviderQuote};
use crate::normalizer::{finite_or_zero, normalize_quote, to_volume};
use crate::provider::soft::SoftFailure;
use crate::provider::{MarketDataProvider, ProviderCapabilities, UpstreamClient};

use models::{YahooChartMeta, YahooChartResponse, YahooChartResult};

const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const PROVIDER_ID: &str = "YAHOO";

/// Upstream granularity and range for each interval kind.
fn chart_params(interval: IntervalKind) -> (&'static str, &'static str) {
    match interval {
        // Fine granularity over the current session
        IntervalKind::Intraday => ("5m", "1d"),
        // One bar per day over the last month
        IntervalKind::Daily => ("1d", "1mo"),
    }
}

/// Yahoo Finance market data provider.
pub struct YahooProvider {
    upstream: Arc<dyn UpstreamClient>,
}

impl YahooProvider {
    pub fn new(upstream: Arc<dyn UpstreamClient>) -> Self {
        Self { upstream }
    }

    async fn fetch_chart(
        &self,
        symbol: &str,
        granularity: &str,
        range: &str,
    ) -> Result<YahooChartResult, MarketDataError> {
        let url = format!("{}/{}", CHART_URL, encode(symbol));
        let value = self
            .upstream
            .get_json(
                PROVIDER_ID,
                &url,
                &[("interval", granularity), ("range", range)],
            )
            .await?;

        let response: YahooChartResponse = serde_json::from_value(value)
            .map_err(|e| MarketDataError::schema(PROVIDER_ID, e.to_string()))?;

        if let Some(error) = response.chart.error {
            return Err(MarketDataError::SymbolNotFound(format!(
                "{}: {}",
                symbol,
                error
                    .description
                    .or(error.code)
                    .unwrap_or_else(|| "unknown error".to_string())
            )));
        }

        response
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))
    }

    /// Build a plain-shape payload from chart metadata, deriving the change
    /// fields the upstream leaves out.
    fn meta_to_raw(meta: &YahooChartMeta) -> Option<RawProviderQuote> {
        let price = meta.regular_market_price?;
        let previous_close = meta.previous_close.or(meta.chart_previous_close);

        let (change, change_percent) = match previous_close {
            Some(prev) if prev != 0.0 => (
                Some(price - prev),
                Some((price - prev) / prev * 100.0),
            ),
            Some(prev) => (Some(price - prev), None),
            None => (None, None),
        };

        Some(RawProviderQuote {
            symbol: meta.symbol.clone(),
            price: Some(price),
            change,
            change_percent,
            open: meta.regular_market_open,
            high: meta.regular_market_day_high,
            low: meta.regular_market_day_low,
            previous_close,
            volume: meta.regular_market_volume,
            ..Default::default()
        })
    }

    /// Zip the parallel arrays into bars, dropping bars without a positive close.
    fn result_to_bars(result: &YahooChartResult, interval: IntervalKind) -> Vec<OhlcvBar> {
        let (Some(timestamps), Some(indicators)) = (&result.timestamp, &result.indicators) else {
            return Vec::new();
        };
        let Some(arrays) = indicators.quote.first() else {
            return Vec::new();
        };

        let at = |values: &Vec<Option<f64>>, i: usize| {
            finite_or_zero(values.get(i).copied().flatten().unwrap_or(0.0))
        };

        timestamps
            .iter()
            .enumerate()
            .filter_map(|(i, ts)| {
                let dt = DateTime::from_timestamp(*ts, 0)?;
                let time = match interval {
                    IntervalKind::Intraday => BarTime::Time(dt.naive_utc()),
                    IntervalKind::Daily => BarTime::Date(dt.date_naive()),
                };
                Some(OhlcvBar {
                    time,
                    open: at(&arrays.open, i),
                    high: at(&arrays.high, i),
                    low: at(&arrays.low, i),
                    close: at(&arrays.close, i),
                    volume: to_volume(at(&arrays.volume, i)),
                })
            })
            .filter(|bar| bar.close > 0.0)
            .collect()
    }

    async fn quote(&self, symbol: &str) -> Result<NormalizedQuote, MarketDataError> {
        let symbol = symbol.trim().to_uppercase();
        let result = self.fetch_chart(&symbol, "1d", "1d").await?;

        let raw = Self::meta_to_raw(&result.meta).ok_or_else(|| {
            MarketDataError::schema(PROVIDER_ID, "meta.regularMarketPrice missing")
        })?;

        Ok(normalize_quote(&raw, &symbol, PROVIDER_ID))
    }

    async fn series(
        &self,
        symbol: &str,
        interval: IntervalKind,
    ) -> Result<Vec<OhlcvBar>, MarketDataError> {
        let symbol = symbol.trim().to_uppercase();
        let (granularity, range) = chart_params(interval);
        let result = self.fetch_chart(&symbol, granularity, range).await?;

        let bars = Self::result_to_bars(&result, interval);
        if bars.is_empty() {
            return Err(MarketDataError::SymbolNotFound(symbol));
        }

        debug!(
            "Yahoo: fetched {} {} bars for {}",
            bars.len(),
            interval,
            symbol
        );

        Ok(bars)
    }
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::quotes_and_series()
    }

    async fn fetch_quote(&self, symbol: &str) -> Option<NormalizedQuote> {
        self.quote(symbol).await.soft(PROVIDER_ID, "quote", symbol)
    }

    async fn fetch_series(&self, symbol: &str, interval: IntervalKind) -> Option<Vec<OhlcvBar>> {
        self.series(symbol, interval)
            .await
            .soft(PROVIDER_ID, "series", symbol)
    }
}
