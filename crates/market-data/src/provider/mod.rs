//! Market data provider abstractions and implementations.
//!
//! This module contains:
//! - The `MarketDataProvider` trait that all providers implement
//! - Provider capabilities
//! - The `UpstreamClient` seam between adapters and HTTP
//! - Concrete provider implementations (Alpha Vantage, Yahoo, NewsAPI)
//!
//! # Architecture
//!
//! Adapters never surface errors. Internally each one works with
//! `Result<_, MarketDataError>` and converts to `Option`/empty at its trait
//! boundary, logging the failure kind on the way. The resolver only ever
//! sees "data" or "no data".

mod capabilities;
mod http;
pub(crate) mod soft;
mod traits;

pub mod alpha_vantage;
pub mod news_api;
pub mod yahoo;

// Re-exports
pub use capabilities::ProviderCapabilities;
pub use http::{HttpUpstream, UpstreamClient};
pub use traits::MarketDataProvider;
