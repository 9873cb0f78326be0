//! Application configuration structures.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP client behavior
    #[serde(default)]
    pub http: HttpConfig,

    /// Output locations
    #[serde(default)]
    pub storage: StorageConfig,

    /// Log settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Sources to collect from
    #[serde(default)]
    pub sources: SourcesConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Write the configuration as TOML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.http.max_concurrent == 0 {
            return Err(AppError::validation("http.max_concurrent must be > 0"));
        }
        if self.storage.database_file.trim().is_empty() {
            return Err(AppError::validation("storage.database_file is empty"));
        }
        if self.sources.total() == 0 {
            return Err(AppError::validation("No sources defined"));
        }
        for url in self.sources.all_urls() {
            validate_url(url)?;
        }
        Ok(())
    }
}

fn validate_url(raw: &str) -> Result<()> {
    let parsed = Url::parse(raw)
        .map_err(|e| AppError::validation(format!("Invalid source URL '{raw}': {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(AppError::validation(format!(
            "Unsupported scheme '{other}' in source URL '{raw}'"
        ))),
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Number of sources collected at the same time
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,

    /// Pause after each finished job in milliseconds
    #[serde(default)]
    pub request_delay_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            max_concurrent: defaults::max_concurrent(),
            request_delay_ms: 0,
        }
    }
}

/// Output locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the database, backups and report
    #[serde(default = "defaults::data_dir")]
    pub data_dir: PathBuf,

    /// SQLite file name inside `data_dir`
    #[serde(default = "defaults::database_file")]
    pub database_file: String,

    /// Summary report file name inside `data_dir`
    #[serde(default = "defaults::report_file")]
    pub report_file: String,
}

impl StorageConfig {
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_file)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: defaults::data_dir(),
            database_file: defaults::database_file(),
            report_file: defaults::report_file(),
        }
    }
}

/// Log settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default level when RUST_LOG is unset
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

/// An API endpoint with optional query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiEndpoint {
    pub url: String,

    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

impl ApiEndpoint {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            params: BTreeMap::new(),
        }
    }
}

/// Source lists grouped by category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// General web pages to scrape
    #[serde(default = "defaults::websites")]
    pub websites: Vec<String>,

    /// JSON APIs to fetch
    #[serde(default = "defaults::apis")]
    pub apis: Vec<ApiEndpoint>,

    /// News feeds (or news APIs)
    #[serde(default = "defaults::news")]
    pub news: Vec<String>,

    /// Public dataset portals to scrape
    #[serde(default = "defaults::datasets")]
    pub datasets: Vec<String>,

    /// Open government data portals to scrape
    #[serde(default = "defaults::government")]
    pub government: Vec<String>,

    /// Social platforms; these need credentials and are skipped
    #[serde(default)]
    pub social: Vec<String>,
}

impl SourcesConfig {
    /// Total number of configured sources.
    pub fn total(&self) -> usize {
        self.websites.len()
            + self.apis.len()
            + self.news.len()
            + self.datasets.len()
            + self.government.len()
            + self.social.len()
    }

    /// Every configured URL, in collection order.
    pub fn all_urls(&self) -> impl Iterator<Item = &str> {
        self.websites
            .iter()
            .map(String::as_str)
            .chain(self.apis.iter().map(|api| api.url.as_str()))
            .chain(self.news.iter().map(String::as_str))
            .chain(self.datasets.iter().map(String::as_str))
            .chain(self.government.iter().map(String::as_str))
            .chain(self.social.iter().map(String::as_str))
    }

    /// A source set with nothing in it.
    pub fn empty() -> Self {
        Self {
            websites: Vec::new(),
            apis: Vec::new(),
            news: Vec::new(),
            datasets: Vec::new(),
            government: Vec::new(),
            social: Vec::new(),
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            websites: defaults::websites(),
            apis: defaults::apis(),
            news: defaults::news(),
            datasets: defaults::datasets(),
            government: defaults::government(),
            social: Vec::new(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    use super::ApiEndpoint;

    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".into()
    }
    pub fn timeout() -> u64 {
        10
    }
    pub fn max_concurrent() -> usize {
        3
    }

    // Storage defaults
    pub fn data_dir() -> PathBuf {
        PathBuf::from("global_data_collection")
    }
    pub fn database_file() -> String {
        "global_data.db".into()
    }
    pub fn report_file() -> String {
        "collection_report.json".into()
    }

    pub fn log_level() -> String {
        "info".into()
    }

    // Source defaults
    pub fn websites() -> Vec<String> {
        vec![
            "https://en.wikipedia.org/wiki/Main_Page".into(),
            "https://www.worldometers.info/".into(),
            "https://www.cia.gov/the-world-factbook/".into(),
            "https://www.who.int/data/gho".into(),
        ]
    }
    pub fn apis() -> Vec<ApiEndpoint> {
        vec![
            ApiEndpoint::new("https://api.publicapis.org/entries"),
            ApiEndpoint::new("https://restcountries.com/v3.1/all"),
            ApiEndpoint::new("https://api.spacexdata.com/v4/launches/latest"),
        ]
    }
    pub fn news() -> Vec<String> {
        vec![
            "http://feeds.bbci.co.uk/news/world/rss.xml".into(),
            "https://www.aljazeera.com/xml/rss/all.xml".into(),
            "http://rss.cnn.com/rss/cnn_world.rss".into(),
        ]
    }
    pub fn datasets() -> Vec<String> {
        vec![
            "https://data.worldbank.org/indicator/NY.GDP.MKTP.CD".into(),
            "https://catalog.data.gov/dataset".into(),
            "https://www.kaggle.com/datasets".into(),
            "https://registry.opendata.aws".into(),
        ]
    }
    pub fn government() -> Vec<String> {
        vec![
            "https://www.data.gov".into(),
            "https://www.gov.uk/government/statistics".into(),
            "https://data.europa.eu".into(),
            "https://data.gov.au".into(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.http.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_concurrency() {
        let mut config = Config::default();
        config.http.max_concurrent = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_http_source() {
        let mut config = Config::default();
        config.sources.websites.push("ftp://example.com/file".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_reports_unparseable_source() {
        let mut config = Config::default();
        config.sources.news.push("not a url".to_string());
        match config.validate() {
            Err(AppError::Validation(message)) => assert!(message.contains("not a url")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_empty_sources() {
        let mut config = Config::default();
        config.sources = SourcesConfig::empty();
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [http]
            max_concurrent = 8

            [sources]
            websites = ["https://example.com"]

            [[sources.apis]]
            url = "https://api.example.com/items"
            params = { page = "2" }
            "#,
        )
        .unwrap();

        assert_eq!(config.http.max_concurrent, 8);
        assert_eq!(config.http.timeout_secs, 10);
        assert_eq!(config.sources.websites, vec!["https://example.com"]);
        assert_eq!(config.sources.apis[0].params["page"], "2");
        assert_eq!(config.sources.news.len(), 3);
        assert_eq!(config.storage.database_file, "global_data.db");
    }

    #[test]
    fn save_then_load() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("collector.toml");

        let mut config = Config::default();
        config.sources.apis[0].params.insert("limit".into(), "5".into());
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.sources.apis, config.sources.apis);
        assert_eq!(loaded.storage.data_dir, config.storage.data_dir);
    }

    #[test]
    fn default_sources_total() {
        assert_eq!(SourcesConfig::default().total(), 18);
    }
}
