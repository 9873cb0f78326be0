// src/services/collector.rs

//! Collection service.
//!
//! Runs every planned job against the shared client and store. A failing
//! source is logged and counted; it never stops the other jobs.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};
use reqwest::Client;
use serde_json::Value;

use crate::models::{Category, Config, Job, RunStats, SourceKind, WebPage};
use crate::services::{ApiFetcher, FeedReader, PageScraper};
use crate::storage::RecordStore;

/// Result of a single job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    /// Records saved
    Succeeded(usize),
    Failed,
    Skipped,
}

/// Service that collects configured sources into a [`RecordStore`].
pub struct Collector {
    config: Arc<Config>,
    client: Client,
    store: Arc<dyn RecordStore>,
}

impl Collector {
    pub fn new(config: Arc<Config>, client: Client, store: Arc<dyn RecordStore>) -> Self {
        Self {
            config,
            client,
            store,
        }
    }

    /// Scrape one page and save it. Errors are logged and yield `None`.
    pub async fn scrape_website(&self, url: &str) -> Option<WebPage> {
        let result = async {
            let page = PageScraper::new(&self.client).scrape(url).await?;
            self.store.save_web_page(&page).await?;
            Ok::<_, crate::error::AppError>(page)
        }
        .await;

        match result {
            Ok(page) => {
                log::info!("Successfully scraped {}", url);
                Some(page)
            }
            Err(e) => {
                log::error!("Error scraping {}: {}", url, e);
                None
            }
        }
    }

    /// Fetch one API endpoint and save it. Errors are logged and yield `None`.
    pub async fn fetch_from_api(
        &self,
        endpoint: &str,
        params: &BTreeMap<String, String>,
    ) -> Option<Value> {
        let result = async {
            let (record, payload) = ApiFetcher::new(&self.client).fetch(endpoint, params).await?;
            self.store.save_api_record(&record, &payload).await?;
            Ok::<_, crate::error::AppError>(payload)
        }
        .await;

        match result {
            Ok(payload) => {
                log::info!("Successfully fetched data from {}", endpoint);
                Some(payload)
            }
            Err(e) => {
                log::error!("Error fetching from API {}: {}", endpoint, e);
                None
            }
        }
    }

    /// Read one feed and save its entries. Returns the number saved.
    pub async fn parse_rss_feed(&self, feed_url: &str) -> Option<usize> {
        let result = async {
            let articles = FeedReader::new(&self.client).read(feed_url).await?;
            let receipt = self.store.save_articles(&articles).await?;
            Ok::<_, crate::error::AppError>(receipt.row_ids.len())
        }
        .await;

        match result {
            Ok(count) => {
                log::info!(
                    "Successfully parsed RSS feed from {} ({} entries)",
                    feed_url,
                    count
                );
                Some(count)
            }
            Err(e) => {
                log::error!("Error parsing RSS feed {}: {}", feed_url, e);
                None
            }
        }
    }

    /// Run a single job.
    pub async fn run_job(&self, job: &Job) -> JobOutcome {
        let saved = match job.kind {
            SourceKind::Page => self.scrape_website(&job.url).await.map(|_| 1),
            SourceKind::Api => self.fetch_from_api(&job.url, &job.params).await.map(|_| 1),
            SourceKind::Feed => self.parse_rss_feed(&job.url).await,
            SourceKind::Unauthenticated => {
                log::warn!(
                    "Social media collection for {} would require API authentication",
                    job.url
                );
                return JobOutcome::Skipped;
            }
        };

        match saved {
            Some(count) => {
                match job.category {
                    Category::Dataset => log::info!("Collected dataset info from {}", job.url),
                    Category::Government => {
                        log::info!("Collected government data from {}", job.url)
                    }
                    _ => {}
                }
                JobOutcome::Succeeded(count)
            }
            None => JobOutcome::Failed,
        }
    }

    /// Run all jobs with at most `http.max_concurrent` in flight.
    pub async fn collect_all(&self, jobs: Vec<Job>) -> RunStats {
        let started = Instant::now();
        let delay = Duration::from_millis(self.config.http.request_delay_ms);
        let concurrency = self.config.http.max_concurrent.max(1);

        let mut stats = RunStats {
            jobs: jobs.len(),
            ..RunStats::default()
        };

        let mut outcomes = stream::iter(jobs)
            .map(|job| async move {
                let outcome = self.run_job(&job).await;
                (job, outcome)
            })
            .buffer_unordered(concurrency);

        while let Some((job, outcome)) = outcomes.next().await {
            match outcome {
                JobOutcome::Succeeded(_) => stats.succeeded += 1,
                JobOutcome::Failed => {
                    stats.failed += 1;
                    log::debug!("Job failed: {} ({})", job.url, job.category);
                }
                JobOutcome::Skipped => stats.skipped += 1,
            }

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        stats.elapsed_secs = started.elapsed().as_secs_f64();
        stats
    }

    /// Run only the jobs of one category.
    pub async fn collect_category(&self, category: Category) -> RunStats {
        let jobs = Job::plan_category(&self.config.sources, category);
        self.collect_all(jobs).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ApiEndpoint, SourcesConfig, StorageConfig};
    use crate::storage::DataStore;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const RSS: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>T</title><link>https://x.example</link><description>d</description>
<item><title>One</title><link>https://x.example/1</link></item>
<item><title>Two</title><link>https://x.example/2</link></item>
</channel></rss>"#;

    async fn mock_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html><head><title>Page</title></head><body>Hi</body></html>"),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/news/rss"))
            .respond_with(ResponseTemplate::new(200).set_body_string(RSS))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/broken"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        server
    }

    async fn collector(tmp: &TempDir, sources: SourcesConfig) -> (Collector, DataStore) {
        let mut config = Config::default();
        config.storage = StorageConfig {
            data_dir: tmp.path().to_path_buf(),
            ..StorageConfig::default()
        };
        config.sources = sources;

        let store = DataStore::open(&config.storage).await.unwrap();
        let collector = Collector::new(Arc::new(config), Client::new(), Arc::new(store.clone()));
        (collector, store)
    }

    #[tokio::test]
    async fn test_collect_all_counts_outcomes() {
        let server = mock_server().await;
        let base = server.uri();
        let tmp = TempDir::new().unwrap();

        let mut sources = SourcesConfig::empty();
        sources.websites = vec![format!("{base}/page")];
        sources.apis = vec![ApiEndpoint::new(format!("{base}/api"))];
        sources.news = vec![format!("{base}/news/rss")];
        sources.government = vec![format!("{base}/broken")];
        sources.social = vec!["https://social.example".to_string()];

        let (collector, store) = collector(&tmp, sources.clone()).await;
        let stats = collector.collect_all(Job::plan(&sources)).await;

        assert_eq!(stats.jobs, 5);
        assert_eq!(stats.succeeded, 3);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.skipped, 1);

        let counts = store.counts().await.unwrap();
        assert_eq!(counts.web_scraping, 1);
        assert_eq!(counts.api_data, 1);
        assert_eq!(counts.news_articles, 2);
    }

    #[tokio::test]
    async fn test_scrape_failure_saves_nothing() {
        let server = mock_server().await;
        let tmp = TempDir::new().unwrap();
        let (collector, store) = collector(&tmp, SourcesConfig::empty()).await;

        let page = collector
            .scrape_website(&format!("{}/broken", server.uri()))
            .await;
        assert!(page.is_none());
        assert_eq!(store.counts().await.unwrap().total(), 0);
    }

    #[tokio::test]
    async fn test_collect_category_filters() {
        let server = mock_server().await;
        let base = server.uri();
        let tmp = TempDir::new().unwrap();

        let mut sources = SourcesConfig::empty();
        sources.websites = vec![format!("{base}/page")];
        sources.news = vec![format!("{base}/news/rss")];

        let (collector, store) = collector(&tmp, sources).await;
        let stats = collector.collect_category(Category::News).await;

        assert_eq!(stats.jobs, 1);
        assert_eq!(stats.succeeded, 1);
        let counts = store.counts().await.unwrap();
        assert_eq!(counts.web_scraping, 0);
        assert_eq!(counts.news_articles, 2);
    }

    #[tokio::test]
    async fn test_no_jobs() {
        let tmp = TempDir::new().unwrap();
        let (collector, _) = collector(&tmp, SourcesConfig::empty()).await;
        let stats = collector.collect_all(Vec::new()).await;
        assert_eq!(stats.jobs, 0);
        assert_eq!(stats.succeeded + stats.failed + stats.skipped, 0);
    }
}
