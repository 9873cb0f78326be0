// src/services/page.rs

//! Web page scraping.
//!
//! Pulls the document title and the visible text out of an HTML page.

use reqwest::Client;
use scraper::{Html, Node, Selector};

use crate::error::{AppError, Result};
use crate::models::WebPage;
use crate::utils::http::fetch_text;

/// Title used when a page has none.
pub const NO_TITLE: &str = "No title";

/// Elements whose text is never part of the page content.
const HIDDEN_ELEMENTS: [&str; 2] = ["script", "style"];

/// Extract `(title, text)` from an HTML document.
///
/// Text nodes are trimmed, empty ones dropped, and the rest joined with a
/// single space. Anything inside `<script>` or `<style>` is ignored.
pub fn extract_page(html: &str) -> Result<(String, String)> {
    let document = Html::parse_document(html);
    let title_sel = parse_selector("title")?;

    let title = document
        .select(&title_sel)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| NO_TITLE.to_string());

    let mut parts = Vec::new();
    for node in document.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
        });
        if hidden {
            continue;
        }
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
    }

    Ok((title, parts.join(" ")))
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::collect(format!("selector '{s}'"), format!("{e:?}")))
}

/// Scrapes single pages.
pub struct PageScraper<'a> {
    client: &'a Client,
}

impl<'a> PageScraper<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Fetch a page and turn it into a record.
    pub async fn scrape(&self, url: &str) -> Result<WebPage> {
        let html = fetch_text(self.client, url).await?;
        let (title, content) = extract_page(&html)?;
        Ok(WebPage::new(url, title, content))
    }
}
