//! Provider orchestration.
//!
//! This module provides:
//! - Sequential primary → secondary fallback for single-symbol requests
//! - Per-symbol provider races for bulk quote requests
//! - Caller-driven cancellation

mod cancel;
mod fallback;

pub use cancel::CancelToken;
pub use fallback::{FallbackResolver, MIN_SEARCH_QUERY_LEN};
