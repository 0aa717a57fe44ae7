//! Field normalization.
//!
//! Maps both upstream payload shapes onto the canonical records in
//! [`crate::models`]. Nothing here fails: a field that is absent or corrupt
//! degrades to 0 so bad upstream data shows up as a visible zero instead of
//! a `NaN` leaking into downstream arithmetic.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::debug;

use crate::models::{
    BarTime, IntervalKind, LegacyBar, LegacySearchMatch, NormalizedQuote, OhlcvBar,
    RawProviderQuote, SearchResult,
};

const INTRADAY_LABEL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DAILY_LABEL_FORMAT: &str = "%Y-%m-%d";

/// Parse a decimal string. Anything unparseable becomes `NaN`.
pub fn parse_float(s: &str) -> f64 {
    s.trim().parse::<f64>().unwrap_or(f64::NAN)
}

/// Parse a percent string such as `"0.8041%"`, dropping the trailing `%`.
pub fn parse_percent(s: &str) -> f64 {
    parse_float(s.trim().trim_end_matches('%'))
}

/// Replace `NaN` and infinities with 0.
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Volumes are whole shares. Fractions truncate, garbage and negatives are 0.
pub fn to_volume(value: f64) -> u64 {
    let value = finite_or_zero(value);
    if value <= 0.0 {
        0
    } else {
        value.trunc() as u64
    }
}

/// Plain field first, then the legacy label, then 0.
fn resolve(plain: Option<f64>, legacy: Option<&str>, parse: fn(&str) -> f64) -> f64 {
    let value = match plain {
        Some(v) => v,
        None => legacy.map(parse).unwrap_or(0.0),
    };
    finite_or_zero(value)
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// Normalize a quote payload in either shape.
///
/// `requested_symbol` is used when the payload carries no symbol of its own,
/// so the result always has one. `changePercent` is recomputed from price and
/// previous close whenever the previous close is non-zero; the upstream text
/// is only used as a fallback.
pub fn normalize_quote(
    raw: &RawProviderQuote,
    requested_symbol: &str,
    source: &str,
) -> NormalizedQuote {
    let symbol = non_blank(raw.symbol.as_deref())
        .or_else(|| non_blank(raw.legacy_symbol.as_deref()))
        .unwrap_or(requested_symbol)
        .trim()
        .to_uppercase();

    let price = resolve(raw.price, raw.legacy_price.as_deref(), parse_float);
    let previous_close = resolve(
        raw.previous_close,
        raw.legacy_previous_close.as_deref(),
        parse_float,
    );

    let change = resolve(raw.change, raw.legacy_change.as_deref(), parse_float);

    let change_percent = if previous_close != 0.0 {
        finite_or_zero((price - previous_close) / previous_close * 100.0)
    } else {
        resolve(
            raw.change_percent,
            raw.legacy_change_percent.as_deref(),
            parse_percent,
        )
    };

    NormalizedQuote {
        symbol,
        price,
        change,
        change_percent,
        open: resolve(raw.open, raw.legacy_open.as_deref(), parse_float),
        high: resolve(raw.high, raw.legacy_high.as_deref(), parse_float),
        low: resolve(raw.low, raw.legacy_low.as_deref(), parse_float),
        previous_close,
        volume: to_volume(resolve(
            raw.volume,
            raw.legacy_volume.as_deref(),
            parse_float,
        )),
        source: source.to_string(),
    }
}

/// Parse a series time label for the given interval kind.
///
/// Intraday labels are `YYYY-MM-DD HH:MM:SS`; daily labels are `YYYY-MM-DD`.
/// RFC 3339 timestamps are accepted for either.
pub fn parse_time_label(label: &str, kind: IntervalKind) -> Option<BarTime> {
    let label = label.trim();
    match kind {
        IntervalKind::Intraday => NaiveDateTime::parse_from_str(label, INTRADAY_LABEL_FORMAT)
            .ok()
            .or_else(|| {
                DateTime::parse_from_rfc3339(label)
                    .ok()
                    .map(|dt| dt.naive_utc())
            })
            .map(BarTime::Time),
        IntervalKind::Daily => NaiveDate::parse_from_str(label, DAILY_LABEL_FORMAT)
            .ok()
            .or_else(|| {
                DateTime::parse_from_rfc3339(label)
                    .ok()
                    .map(|dt| dt.date_naive())
            })
            .map(BarTime::Date),
    }
}

/// Convert one legacy-keyed record into a bar at `time`.
pub fn normalize_bar(raw: &LegacyBar, time: BarTime) -> OhlcvBar {
    let field = |v: &Option<String>| finite_or_zero(v.as_deref().map(parse_float).unwrap_or(0.0));
    OhlcvBar {
        time,
        open: field(&raw.open),
        high: field(&raw.high),
        low: field(&raw.low),
        close: field(&raw.close),
        volume: to_volume(field(&raw.volume)),
    }
}

/// Convert a legacy time-label → record mapping into bars.
///
/// Output order is unspecified; the assembler orders and filters it. Entries
/// whose label cannot be parsed are skipped.
pub fn normalize_bars(series: &HashMap<String, LegacyBar>, kind: IntervalKind) -> Vec<OhlcvBar> {
    series
        .iter()
        .filter_map(|(label, raw)| match parse_time_label(label, kind) {
            Some(time) => Some(normalize_bar(raw, time)),
            None => {
                debug!("Skipping bar with unparseable time label '{}'", label);
                None
            }
        })
        .collect()
}

/// Convert a legacy search match. Matches without a symbol are dropped.
pub fn normalize_search_match(raw: &LegacySearchMatch) -> Option<SearchResult> {
    let symbol = non_blank(raw.symbol.as_deref())?;
    Some(SearchResult::new(
        symbol,
        raw.name.as_deref().unwrap_or_default().trim(),
        raw.region.as_deref().unwrap_or_default().trim(),
        raw.currency.as_deref().unwrap_or_default().trim(),
    ))
}
