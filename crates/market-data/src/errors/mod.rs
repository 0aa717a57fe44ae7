//! Error types and failure classification for the market data crate.
//!
//! This module provides:
//! - [`MarketDataError`]: The error enum used inside provider adapters
//! - [`FailureKind`]: Classification used when an error is downgraded to a soft failure
//!
//! Errors never leave the crate through the public resolver API. Adapters
//! log them and convert them to an absent value at their boundary.

mod kind;

pub use kind::FailureKind;

use thiserror::Error;

/// Errors that can occur while talking to an upstream provider.
///
/// Each variant is classified into a [`FailureKind`] via the [`kind`](Self::kind)
/// method, which is what gets reported when the error is swallowed.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The provider had no data for the requested symbol or query.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The provider rejected the request because of rate limits or quota.
    /// Covers both HTTP 429 and in-body throttling notes.
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The provider answered with a non-2xx status.
    #[error("HTTP {status} from {provider}")]
    HttpStatus {
        /// The provider that answered
        provider: String,
        /// The HTTP status code
        status: u16,
    },

    /// The provider reported an error inside an otherwise successful response.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The payload did not have the expected shape.
    #[error("Schema mismatch from {provider}: {message}")]
    SchemaMismatch {
        /// The provider whose payload was malformed
        provider: String,
        /// What was wrong with it
        message: String,
    },

    /// The provider needs an API key and none is configured.
    #[error("Missing API key for {0}")]
    MissingApiKey(String),

    /// The caller cancelled the request before it completed.
    #[error("Request cancelled")]
    Cancelled,

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Returns the failure classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use zeterminal_market_data::errors::{FailureKind, MarketDataError};
    ///
    /// let error = MarketDataError::RateLimited { provider: "ALPHA_VANTAGE".to_string() };
    /// assert_eq!(error.kind(), FailureKind::Transport);
    ///
    /// let error = MarketDataError::SymbolNotFound("INVALID".to_string());
    /// assert_eq!(error.kind(), FailureKind::NotFound);
    /// ```
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::SymbolNotFound(_) => FailureKind::NotFound,

            Self::RateLimited { .. }
            | Self::HttpStatus { .. }
            | Self::ProviderError { .. }
            | Self::MissingApiKey(_)
            | Self::Network(_) => FailureKind::Transport,

            Self::SchemaMismatch { .. } => FailureKind::SchemaMismatch,

            Self::Cancelled => FailureKind::Cancelled,
        }
    }

    pub(crate) fn schema(provider: &str, message: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            provider: provider.to_string(),
            message: message.into(),
        }
    }
}
