//! NewsAPI headline provider.
//!
//! Serves [`MarketDataProvider::fetch_news`] only. Without a configured key
//! the provider makes no requests and always answers empty.

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;

use crate::config::ProviderConfig;
use crate::errors::MarketDataError;
use crate::models::NewsArticle;
use crate::provider::soft::SoftFailure;
use crate::provider::{MarketDataProvider, ProviderCapabilities, UpstreamClient};

const BASE_URL: &str = "https://newsapi.org/v2/everything";
const PROVIDER_ID: &str = "NEWS_API";
const PAGE_SIZE: &str = "20";
const GENERAL_QUERY: &str = "finance market";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EverythingResponse {
    status: Option<String>,
    code: Option<String>,
    message: Option<String>,
    #[serde(default)]
    articles: Vec<RawArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArticle {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    published_at: Option<String>,
    url_to_image: Option<String>,
    source: Option<RawSource>,
}

#[derive(Debug, Deserialize)]
struct RawSource {
    name: Option<String>,
}

impl RawArticle {
    /// Articles without a title or link are useless to a headline list.
    fn into_article(self) -> Option<NewsArticle> {
        let title = self.title.filter(|t| !t.trim().is_empty())?;
        let url = self.url.filter(|u| !u.trim().is_empty())?;
        Some(NewsArticle {
            title,
            description: self.description.unwrap_or_default(),
            url,
            published_at: self.published_at.unwrap_or_default(),
            source_name: self.source.and_then(|s| s.name),
            image_url: self.url_to_image,
        })
    }
}

/// Search query for a symbol, or the general market query.
fn news_query(symbol: Option<&str>) -> String {
    match symbol.map(str::trim).filter(|s| !s.is_empty()) {
        Some(symbol) => format!("{} stock", symbol.to_uppercase()),
        None => GENERAL_QUERY.to_string(),
    }
}

pub struct NewsApiProvider {
    upstream: Arc<dyn UpstreamClient>,
    api_key: Option<String>,
}

impl NewsApiProvider {
    pub fn new(upstream: Arc<dyn UpstreamClient>, config: &ProviderConfig) -> Self {
        Self {
            upstream,
            api_key: config
                .news_api_key
                .clone()
                .filter(|key| !key.trim().is_empty()),
        }
    }

    async fn everything(&self, symbol: Option<&str>) -> Result<Vec<NewsArticle>, MarketDataError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| MarketDataError::MissingApiKey(PROVIDER_ID.to_string()))?;
        let query = news_query(symbol);

        let value = self
            .upstream
            .get_json(
                PROVIDER_ID,
                BASE_URL,
                &[
                    ("q", query.as_str()),
                    ("language", "en"),
                    ("sortBy", "publishedAt"),
                    ("pageSize", PAGE_SIZE),
                    ("apiKey", api_key),
                ],
            )
            .await?;

        let response: EverythingResponse = serde_json::from_value(value)
            .map_err(|e| MarketDataError::schema(PROVIDER_ID, e.to_string()))?;

        if response.status.as_deref() == Some("error") {
            if response.code.as_deref() == Some("rateLimited") {
                return Err(MarketDataError::RateLimited {
                    provider: PROVIDER_ID.to_string(),
                });
            }
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: response
                    .message
                    .or(response.code)
                    .unwrap_or_else(|| "unknown error".to_string()),
            });
        }

        let articles: Vec<NewsArticle> = response
            .articles
            .into_iter()
            .filter_map(RawArticle::into_article)
            .collect();

        debug!("NewsAPI: {} articles for '{}'", articles.len(), query);
        Ok(articles)
    }
}

#[async_trait]
impl MarketDataProvider for NewsApiProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::news()
    }

    async fn fetch_news(&self, symbol: Option<&str>) -> Vec<NewsArticle> {
        self.everything(symbol)
            .await
            .soft(PROVIDER_ID, "news", symbol.unwrap_or("market"))
            .unwrap_or_default()
    }
}
