//! Technical indicators over a series' closing prices.
//!
//! All functions take closes in ascending time order and return `None` when
//! there is not enough data, which is distinct from a computed zero.

use serde::{Deserialize, Serialize};

use crate::models::Series;

/// Period of the RSI carried in an [`IndicatorSet`].
pub const RSI_PERIOD: usize = 14;

/// RSI above this is overbought.
pub const RSI_OVERBOUGHT: f64 = 70.0;

/// RSI below this is oversold.
pub const RSI_OVERSOLD: f64 = 30.0;

/// Number of daily bars the dashboard computes indicators over.
pub const DEFAULT_INDICATOR_WINDOW: usize = 20;

/// Simple moving average of the last `period` closes.
pub fn sma(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period {
        return None;
    }
    let window = &closes[closes.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}

/// Exponential moving average.
///
/// Seeded with the mean of the *first* `period` closes, then smoothed forward
/// over every later close with multiplier `2 / (period + 1)`.
pub fn ema(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period {
        return None;
    }
    let multiplier = 2.0 / (period as f64 + 1.0);
    let seed = closes[..period].iter().sum::<f64>() / period as f64;
    Some(
        closes[period..]
            .iter()
            .fold(seed, |ema, close| (close - ema) * multiplier + ema),
    )
}

/// Relative strength index, single-pass form.
///
/// Differences are taken over the whole input, not only the last `period`
/// closes, and the gain and loss sums are both divided by `period` regardless
/// of how many samples each has. A zero average loss yields 100.
pub fn rsi(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period {
        return None;
    }

    let (gains, losses) = closes
        .windows(2)
        .map(|w| w[1] - w[0])
        .fold((0.0, 0.0), |(gains, losses), diff| {
            if diff > 0.0 {
                (gains + diff, losses)
            } else if diff < 0.0 {
                (gains, losses - diff)
            } else {
                (gains, losses)
            }
        });

    let avg_gain = gains / period as f64;
    let avg_loss = losses / period as f64;

    if avg_loss == 0.0 {
        return Some(100.0);
    }

    let rs = avg_gain / avg_loss;
    Some(100.0 - 100.0 / (1.0 + rs))
}

/// RSI classification band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsiSignal {
    Overbought,
    Oversold,
    Neutral,
}

impl RsiSignal {
    pub fn classify(rsi: f64) -> Self {
        if rsi > RSI_OVERBOUGHT {
            Self::Overbought
        } else if rsi < RSI_OVERSOLD {
            Self::Oversold
        } else {
            Self::Neutral
        }
    }
}

/// Analytics derived from one series. Recomputed on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSet {
    pub sma20: Option<f64>,
    pub sma50: Option<f64>,
    pub ema12: Option<f64>,
    pub rsi14: Option<f64>,
    pub rsi_signal: Option<RsiSignal>,
    pub last_close: Option<f64>,
}

impl IndicatorSet {
    pub fn from_series(series: &Series) -> Self {
        Self::from_closes(&series.closes())
    }

    pub fn from_closes(closes: &[f64]) -> Self {
        let rsi14 = rsi(closes, RSI_PERIOD);
        Self {
            sma20: sma(closes, 20),
            sma50: sma(closes, 50),
            ema12: ema(closes, 12),
            rsi14,
            rsi_signal: rsi14.map(RsiSignal::classify),
            last_close: closes.last().copied(),
        }
    }
}
