use serde::{Deserialize, Serialize};

/// A headline from the news provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub title: String,

    #[serde(default)]
    pub description: String,

    pub url: String,

    /// RFC 3339 publication time as sent upstream
    pub published_at: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}
