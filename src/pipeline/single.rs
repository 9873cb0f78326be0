// src/pipeline/single.rs

//! One-off collection of a single source from the command line.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{Config, WebPage};
use crate::services::Collector;
use crate::storage::DataStore;
use crate::utils::{http, log, truncate};

/// Characters of page text shown after a scrape.
const PREVIEW_LEN: usize = 120;

async fn collector(config: &Config) -> Result<Collector> {
    let store = DataStore::open(&config.storage).await?;
    let client = http::create_client(&config.http)?;
    Ok(Collector::new(Arc::new(config.clone()), client, Arc::new(store)))
}

/// Scrape one page.
pub async fn run_scrape(config: &Config, url: &str) -> Result<WebPage> {
    let page = collector(config)
        .await?
        .scrape_website(url)
        .await
        .ok_or_else(|| AppError::collect(url, "scrape failed"))?;

    log::success(&format!("{} ({} chars)", page.title, page.content.chars().count()));
    log::sub_item(&truncate(&page.content, PREVIEW_LEN));
    Ok(page)
}

/// Fetch one API endpoint.
pub async fn run_fetch(
    config: &Config,
    url: &str,
    params: &BTreeMap<String, String>,
) -> Result<serde_json::Value> {
    let payload = collector(config)
        .await?
        .fetch_from_api(url, params)
        .await
        .ok_or_else(|| AppError::collect(url, "fetch failed"))?;

    log::success(&format!("Fetched {} bytes of JSON", payload.to_string().len()));
    Ok(payload)
}

/// Read one feed.
pub async fn run_feed(config: &Config, url: &str) -> Result<usize> {
    let count = collector(config)
        .await?
        .parse_rss_feed(url)
        .await
        .ok_or_else(|| AppError::collect(url, "feed failed"))?;

    log::success(&format!("Saved {} article(s)", count));
    Ok(count)
}

/// Parse `key=value` pairs into query parameters.
pub fn parse_params(pairs: &[String]) -> Result<BTreeMap<String, String>> {
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .filter(|(key, _)| !key.is_empty())
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .ok_or_else(|| {
                    AppError::validation(format!("Invalid parameter '{pair}', expected key=value"))
                })
        })
        .collect()
}
