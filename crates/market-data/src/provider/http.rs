//! Upstream HTTP access shared by all adapters.

use async_trait::async_trait;
use log::debug;
use reqwest::{header, Client, StatusCode};
use serde_json::Value;

use crate::config::ProviderConfig;
use crate::errors::MarketDataError;

/// One upstream GET returning parsed JSON.
///
/// Adapters depend on this trait rather than on `reqwest` directly so tests
/// can answer with canned payloads.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Fetch `url` with `query` parameters and parse the body as JSON.
    ///
    /// `provider` is only used to label errors.
    async fn get_json(
        &self,
        provider: &str,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<Value, MarketDataError>;
}

/// [`UpstreamClient`] backed by a shared `reqwest::Client`.
pub struct HttpUpstream {
    client: Client,
}

impl HttpUpstream {
    pub fn new(config: &ProviderConfig) -> Self {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }
}

/// Mask values of credential-like query parameters for logging.
fn redacted(query: &[(&str, &str)]) -> String {
    query
        .iter()
        .map(|(k, v)| {
            if k.eq_ignore_ascii_case("apikey") {
                format!("{}=***", k)
            } else {
                format!("{}={}", k, v)
            }
        })
        .collect::<Vec<_>>()
        .join("&")
}

#[async_trait]
impl UpstreamClient for HttpUpstream {
    async fn get_json(
        &self,
        provider: &str,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<Value, MarketDataError> {
        debug!("{} request: {}?{}", provider, url, redacted(query));

        let response = self
            .client
            .get(url)
            .query(query)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: provider.to_string(),
            });
        }

        if !status.is_success() {
            return Err(MarketDataError::HttpStatus {
                provider: provider.to_string(),
                status: status.as_u16(),
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            MarketDataError::schema(provider, format!("Failed to parse response: {}", e))
        })
    }
}
