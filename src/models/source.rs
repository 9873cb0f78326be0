//! Source categories and the flattened job list.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::AppError;
use crate::models::SourcesConfig;

/// Where a source came from in the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Web,
    Api,
    News,
    Dataset,
    Government,
    Social,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Web,
        Category::Api,
        Category::News,
        Category::Dataset,
        Category::Government,
        Category::Social,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Web => "web",
            Category::Api => "api",
            Category::News => "news",
            Category::Dataset => "dataset",
            Category::Government => "government",
            Category::Social => "social",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "web" | "websites" => Ok(Category::Web),
            "api" | "apis" => Ok(Category::Api),
            "news" => Ok(Category::News),
            "dataset" | "datasets" => Ok(Category::Dataset),
            "government" | "gov" => Ok(Category::Government),
            "social" => Ok(Category::Social),
            other => Err(AppError::validation(format!("Unknown category '{other}'"))),
        }
    }
}

/// How a source is collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// HTML page, scraped for title and text
    Page,
    /// JSON endpoint
    Api,
    /// RSS / Atom feed
    Feed,
    /// Needs credentials we do not have
    Unauthenticated,
}

impl SourceKind {
    /// Classify a news URL as a feed or an API.
    ///
    /// Only whole host labels, path segments and extensions count, so
    /// `anatomy` is not `atom` and the query string is ignored.
    pub fn infer(url: &str) -> Self {
        let Ok(parsed) = Url::parse(url) else {
            return SourceKind::Api;
        };

        let feed_host = parsed
            .host_str()
            .is_some_and(|host| host.split('.').any(|label| FEED_HOST_LABELS.contains(&label)));

        let feed_path = parsed
            .path_segments()
            .into_iter()
            .flatten()
            .map(str::to_lowercase)
            .any(|segment| is_feed_segment(&segment));

        if feed_host || feed_path {
            SourceKind::Feed
        } else {
            SourceKind::Api
        }
    }
}

/// Host labels that mark a feed server, e.g. `rss.cnn.com`.
const FEED_HOST_LABELS: [&str; 2] = ["rss", "feeds"];

/// Path segments that name a feed, e.g. `/rss/` or `/atom`.
const FEED_SEGMENTS: [&str; 4] = ["rss", "atom", "feed", "feeds"];

/// File extensions of feed documents.
const FEED_EXTENSIONS: [&str; 3] = ["rss", "atom", "xml"];

fn is_feed_segment(segment: &str) -> bool {
    if FEED_SEGMENTS.contains(&segment) {
        return true;
    }
    segment
        .rsplit_once('.')
        .is_some_and(|(stem, ext)| !stem.is_empty() && FEED_EXTENSIONS.contains(&ext))
}

/// A single unit of collection work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub category: Category,
    pub kind: SourceKind,
    pub url: String,
    pub params: BTreeMap<String, String>,
}

impl Job {
    fn new(category: Category, kind: SourceKind, url: &str) -> Self {
        Self {
            category,
            kind,
            url: url.to_string(),
            params: BTreeMap::new(),
        }
    }

    /// Flatten the configured sources into jobs.
    pub fn plan(sources: &SourcesConfig) -> Vec<Job> {
        let mut jobs = Vec::with_capacity(sources.total());

        jobs.extend(
            sources
                .websites
                .iter()
                .map(|url| Job::new(Category::Web, SourceKind::Page, url)),
        );
        jobs.extend(sources.apis.iter().map(|api| Job {
            params: api.params.clone(),
            ..Job::new(Category::Api, SourceKind::Api, &api.url)
        }));
        jobs.extend(
            sources
                .news
                .iter()
                .map(|url| Job::new(Category::News, SourceKind::infer(url), url)),
        );
        jobs.extend(
            sources
                .datasets
                .iter()
                .map(|url| Job::new(Category::Dataset, SourceKind::Page, url)),
        );
        jobs.extend(
            sources
                .government
                .iter()
                .map(|url| Job::new(Category::Government, SourceKind::Page, url)),
        );
        jobs.extend(
            sources
                .social
                .iter()
                .map(|url| Job::new(Category::Social, SourceKind::Unauthenticated, url)),
        );

        jobs
    }

    /// Jobs of a single category.
    pub fn plan_category(sources: &SourcesConfig, category: Category) -> Vec<Job> {
        Self::plan(sources)
            .into_iter()
            .filter(|job| job.category == category)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ApiEndpoint;

    #[test]
    fn test_infer_feed() {
        assert_eq!(
            SourceKind::infer("http://feeds.bbci.co.uk/news/world/rss.xml"),
            SourceKind::Feed
        );
        assert_eq!(
            SourceKind::infer("http://rss.cnn.com/rss/cnn_world.rss"),
            SourceKind::Feed
        );
        assert_eq!(
            SourceKind::infer("https://blog.example.com/atom"),
            SourceKind::Feed
        );
    }

    #[test]
    fn test_infer_api() {
        assert_eq!(
            SourceKind::infer("https://newsapi.org/v2/top-headlines?country=us"),
            SourceKind::Api
        );
    }

    #[test]
    fn test_infer_ignores_partial_words() {
        assert_eq!(
            SourceKind::infer("https://api.anatomy-data.example/v1/organs"),
            SourceKind::Api
        );
        assert_eq!(
            SourceKind::infer("https://api.example.com/v1/crossroads"),
            SourceKind::Api
        );
        assert_eq!(
            SourceKind::infer("https://api.example.com/v1/items?format=xml"),
            SourceKind::Api
        );
        assert_eq!(SourceKind::infer("not a url with rss"), SourceKind::Api);
    }

    #[test]
    fn test_infer_feed_hosts_and_extensions() {
        assert_eq!(
            SourceKind::infer("https://www.aljazeera.com/xml/rss/all.xml"),
            SourceKind::Feed
        );
        assert_eq!(
            SourceKind::infer("https://feeds.example.com/world"),
            SourceKind::Feed
        );
        assert_eq!(
            SourceKind::infer("https://blog.example.com/posts.atom"),
            SourceKind::Feed
        );
    }

    #[test]
    fn test_plan_order_and_kinds() {
        let mut sources = SourcesConfig::empty();
        sources.websites = vec!["https://a.example".into()];
        sources.apis = vec![ApiEndpoint::new("https://api.example/x")];
        sources.news = vec![
            "https://news.example/rss".into(),
            "https://news.example/api".into(),
        ];
        sources.government = vec!["https://gov.example".into()];
        sources.social = vec!["https://social.example".into()];

        let jobs = Job::plan(&sources);
        let kinds: Vec<_> = jobs.iter().map(|j| (j.category, j.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                (Category::Web, SourceKind::Page),
                (Category::Api, SourceKind::Api),
                (Category::News, SourceKind::Feed),
                (Category::News, SourceKind::Api),
                (Category::Government, SourceKind::Page),
                (Category::Social, SourceKind::Unauthenticated),
            ]
        );
    }

    #[test]
    fn test_plan_category() {
        let jobs = Job::plan_category(&SourcesConfig::default(), Category::Dataset);
        assert_eq!(jobs.len(), 4);
        assert!(jobs.iter().all(|j| j.kind == SourceKind::Page));
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("News".parse::<Category>().unwrap(), Category::News);
        assert_eq!("gov".parse::<Category>().unwrap(), Category::Government);
        assert!("weather".parse::<Category>().is_err());
    }
}
