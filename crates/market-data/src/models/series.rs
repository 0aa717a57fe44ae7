use serde::Serialize;

use super::bar::{IntervalKind, OhlcvBar};

/// Chronologically ordered bars for one (symbol, interval) pair.
///
/// Only the assembler builds a `Series`, so bars are always strictly
/// ascending by time with no duplicates and no bar with a non-positive close.
/// A refresh produces a new `Series`; existing ones are never modified.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Series {
    symbol: String,
    interval: IntervalKind,
    bars: Vec<OhlcvBar>,
}

impl Series {
    pub(crate) fn from_ordered(symbol: String, interval: IntervalKind, bars: Vec<OhlcvBar>) -> Self {
        Self {
            symbol,
            interval,
            bars,
        }
    }

    /// An empty series, meaning "no data available".
    pub fn empty(symbol: impl Into<String>, interval: IntervalKind) -> Self {
        Self::from_ordered(symbol.into(), interval, Vec::new())
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn interval(&self) -> IntervalKind {
        self.interval
    }

    pub fn bars(&self) -> &[OhlcvBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Most recent bar.
    pub fn last(&self) -> Option<&OhlcvBar> {
        self.bars.last()
    }

    /// Closing prices in ascending time order.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// A new series holding only the most recent `count` bars.
    pub fn tail(&self, count: usize) -> Self {
        let start = self.bars.len().saturating_sub(count);
        Self::from_ordered(self.symbol.clone(), self.interval, self.bars[start..].to_vec())
    }

    pub fn into_bars(self) -> Vec<OhlcvBar> {
        self.bars
    }
}
