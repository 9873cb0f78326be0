// src/services/feed.rs

//! RSS / Atom feed reading.

use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::NewsArticle;
use crate::services::page::NO_TITLE;
use crate::utils::http::fetch_bytes;
use crate::utils::timestamp;

/// Parse a feed document into articles attributed to `feed_url`.
pub fn parse_feed(body: &[u8], feed_url: &str) -> Result<Vec<NewsArticle>> {
    let feed = feed_rs::parser::parse(body).map_err(AppError::feed)?;
    let collected_at = timestamp();

    let articles = feed
        .entries
        .into_iter()
        .map(|entry| {
            let title = entry
                .title
                .map(|t| t.content.trim().to_string())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| NO_TITLE.to_string());

            let content = entry
                .summary
                .map(|s| s.content)
                .or_else(|| entry.content.and_then(|c| c.body))
                .unwrap_or_default();

            let published_date = entry
                .published
                .or(entry.updated)
                .map(|d| d.to_rfc3339())
                .unwrap_or_default();

            let url = entry
                .links
                .into_iter()
                .next()
                .map(|link| link.href)
                .unwrap_or_default();

            let authors = entry
                .authors
                .into_iter()
                .map(|person| person.name)
                .filter(|name| !name.trim().is_empty())
                .collect::<Vec<_>>()
                .join(", ");

            NewsArticle {
                title,
                content,
                source: feed_url.to_string(),
                published_date,
                url,
                authors,
                timestamp: collected_at.clone(),
            }
        })
        .collect();

    Ok(articles)
}

/// Downloads and parses feeds.
pub struct FeedReader<'a> {
    client: &'a Client,
}

impl<'a> FeedReader<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn read(&self, feed_url: &str) -> Result<Vec<NewsArticle>> {
        let body = fetch_bytes(self.client, feed_url, &Default::default()).await?;
        parse_feed(&body, feed_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:dc="http://purl.org/dc/elements/1.1/">
  <channel>
    <title>World News</title>
    <link>https://news.example.com</link>
    <description>Top stories</description>
    <item>
      <title>Summit opens</title>
      <description><![CDATA[Leaders <b>meet</b> today.]]></description>
      <link>https://news.example.com/summit</link>
      <pubDate>Mon, 05 Jan 2026 10:30:00 GMT</pubDate>
      <dc:creator>Jane Reporter</dc:creator>
    </item>
    <item>
      <description>No headline here</description>
    </item>
  </channel>
</rss>"#;

    const ATOM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Example Atom</title>
  <id>urn:uuid:feed</id>
  <updated>2026-01-02T00:00:00Z</updated>
  <entry>
    <title>Atom entry</title>
    <id>urn:uuid:entry-1</id>
    <link href="https://atom.example.com/1"/>
    <updated>2026-01-02T08:00:00Z</updated>
    <summary>Short summary</summary>
    <author><name>A. Writer</name></author>
  </entry>
</feed>"#;

    #[test]
    fn test_parse_rss_items() {
        let articles = parse_feed(RSS.as_bytes(), "https://news.example.com/rss.xml").unwrap();
        assert_eq!(articles.len(), 2);

        let first = &articles[0];
        assert_eq!(first.title, "Summit opens");
        assert!(first.content.contains("meet"));
        assert_eq!(first.url, "https://news.example.com/summit");
        assert_eq!(first.published_date, "2026-01-05T10:30:00+00:00");
        assert_eq!(first.authors, "Jane Reporter");
        assert_eq!(first.source, "https://news.example.com/rss.xml");

        let second = &articles[1];
        assert_eq!(second.title, NO_TITLE);
        assert_eq!(second.content, "No headline here");
        assert_eq!(second.url, "");
        assert_eq!(second.published_date, "");
        assert_eq!(second.authors, "");
    }

    #[test]
    fn test_parse_atom_entry() {
        let articles = parse_feed(ATOM.as_bytes(), "https://atom.example.com/feed").unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Atom entry");
        assert_eq!(articles[0].content, "Short summary");
        assert_eq!(articles[0].url, "https://atom.example.com/1");
        assert_eq!(articles[0].published_date, "2026-01-02T08:00:00+00:00");
        assert_eq!(articles[0].authors, "A. Writer");
    }

    #[test]
    fn test_empty_channel() {
        let rss = r#"<rss version="2.0"><channel><title>Quiet</title></channel></rss>"#;
        assert!(parse_feed(rss.as_bytes(), "https://q.example/rss").unwrap().is_empty());
    }

    #[test]
    fn test_not_a_feed() {
        let result = parse_feed(b"{\"json\": true", "https://q.example/rss");
        assert!(matches!(result, Err(AppError::Feed(_))));
    }

    #[tokio::test]
    async fn test_read_from_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rss.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(RSS))
            .mount(&server)
            .await;

        let client = Client::new();
        let url = format!("{}/rss.xml", server.uri());
        let articles = FeedReader::new(&client).read(&url).await.unwrap();
        assert_eq!(articles.len(), 2);
        assert!(articles.iter().all(|a| a.source == url));
    }
}
