//! Series assembly.
//!
//! Turns the bars an adapter produced into a [`Series`]: invalid bars dropped,
//! ascending by time, no duplicate timestamps, optionally truncated to the
//! most recent bars.

use log::debug;

use crate::models::{IntervalKind, OhlcvBar, Series};

/// Assemble bars into a series.
///
/// Upstream order is detected, not assumed: if the first bar is later than
/// the last one the input is reversed. Input that is still out of order after
/// that is sorted. When two bars share a timestamp the later one in the
/// ascending sequence is kept.
///
/// `limit` keeps only the most recent `limit` bars. An empty result is a valid
/// "no data" series, not an error.
pub fn assemble(
    symbol: &str,
    interval: IntervalKind,
    bars: Vec<OhlcvBar>,
    limit: Option<usize>,
) -> Series {
    let received = bars.len();
    let mut bars: Vec<OhlcvBar> = bars.into_iter().filter(OhlcvBar::is_valid).collect();

    if received != bars.len() {
        debug!(
            "Dropped {} invalid bars for {} ({})",
            received - bars.len(),
            symbol,
            interval
        );
    }

    if let (Some(first), Some(last)) = (bars.first(), bars.last()) {
        if first.time > last.time {
            bars.reverse();
        }
    }

    if !bars.windows(2).all(|w| w[0].time <= w[1].time) {
        bars.sort_by_key(|b| b.time);
    }

    let mut ordered: Vec<OhlcvBar> = Vec::with_capacity(bars.len());
    for bar in bars {
        match ordered.last_mut() {
            Some(prev) if prev.time == bar.time => *prev = bar,
            _ => ordered.push(bar),
        }
    }

    if let Some(limit) = limit {
        let start = ordered.len().saturating_sub(limit);
        ordered.drain(..start);
    }

    Series::from_ordered(symbol.trim().to_uppercase(), interval, ordered)
}
