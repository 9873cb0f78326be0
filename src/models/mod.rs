// src/models/mod.rs

//! Domain models for the collector.
//!
//! Configuration, the record shapes stored per table, the job plan and
//! the summary report.

mod config;
mod record;
mod report;
mod source;

// Re-export all public types
pub use config::{ApiEndpoint, Config, HttpConfig, LoggingConfig, SourcesConfig, StorageConfig};
pub use record::{ApiRecord, JSON_DATA_TYPE, NewsArticle, WEB_SCRAPING_SOURCE, WebPage};
pub use report::{DataSourceCounts, RunStats, SummaryReport};
pub use source::{Category, Job, SourceKind};
