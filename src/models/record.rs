//! Collected record shapes, one per database table.

use serde::{Deserialize, Serialize};

use crate::utils::timestamp;

/// `source` value stored for scraped pages.
pub const WEB_SCRAPING_SOURCE: &str = "web_scraping";

/// `data_type` value stored for API payloads.
pub const JSON_DATA_TYPE: &str = "json";

/// A scraped web page (`web_data` row and `webpage_*.json` backup).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebPage {
    pub url: String,
    pub title: String,
    /// Visible text of the page
    pub content: String,
    pub timestamp: String,
    pub source: String,
}

impl WebPage {
    pub fn new(url: impl Into<String>, title: String, content: String) -> Self {
        Self {
            url: url.into(),
            title,
            content,
            timestamp: timestamp(),
            source: WEB_SCRAPING_SOURCE.to_string(),
        }
    }
}

/// An API response (`api_data` row).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiRecord {
    pub endpoint: String,
    pub data_type: String,
    /// Compact JSON of the response body
    pub data_json: String,
    pub timestamp: String,
}

impl ApiRecord {
    pub fn new(endpoint: impl Into<String>, payload: &serde_json::Value) -> Self {
        Self {
            endpoint: endpoint.into(),
            data_type: JSON_DATA_TYPE.to_string(),
            data_json: payload.to_string(),
            timestamp: timestamp(),
        }
    }
}

/// A feed entry (`news_articles` row).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewsArticle {
    pub title: String,
    pub content: String,
    /// URL of the feed the entry came from
    pub source: String,
    pub published_date: String,
    pub url: String,
    pub authors: String,
    pub timestamp: String,
}
