//! Market data models
//!
//! This module contains the canonical data types every provider is normalized into:
//! - `quote` - Canonical quote (NormalizedQuote) and the raw two-shape payload (RawProviderQuote)
//! - `bar` - OHLCV bars, their time axis and the interval kind
//! - `series` - Ordered bar sequence for one symbol and interval
//! - `search` - Search result data (SearchResult)
//! - `news` - News headlines (NewsArticle)

mod bar;
pub(crate) mod lenient;
mod news;
mod quote;
mod search;
mod series;

pub use bar::{BarTime, IntervalKind, LegacyBar, OhlcvBar};
pub use news::NewsArticle;
pub use quote::{NormalizedQuote, RawProviderQuote};
pub use search::{LegacySearchMatch, SearchResult};
pub use series::Series;
