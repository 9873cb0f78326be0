//! Storage for collected records.
//!
//! Every record lands in SQLite; pages and API payloads also get a JSON
//! backup file next to the database.
//!
//! ## Directory Structure
//!
//! ```text
//! global_data_collection/
//! ├── global_data.db
//! ├── collection_report.json
//! ├── webpage_20260101_120000_en_wikipedia_org_wiki_main_page.json
//! └── api_20260101_120001_restcountries_com_v3_1_all.json
//! ```

pub mod database;
pub mod local;

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ApiRecord, DataSourceCounts, NewsArticle, StorageConfig, WebPage};
use crate::utils::slug;

// Re-export for convenience
pub use database::{Database, Table};
pub use local::{LocalStorage, format_megabytes};

/// Backup file prefix for scraped pages.
pub const WEBPAGE_PREFIX: &str = "webpage";

/// Backup file prefix for API payloads.
pub const API_PREFIX: &str = "api";

/// Where a saved record ended up.
#[derive(Debug, Clone)]
pub struct SaveReceipt {
    /// Row ids in SQLite
    pub row_ids: Vec<i64>,
    /// JSON backup, when one was written
    pub backup: Option<PathBuf>,
}

/// Trait for record storage backends.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persist a scraped page.
    async fn save_web_page(&self, page: &WebPage) -> Result<SaveReceipt>;

    /// Persist an API response; `payload` is the parsed body.
    async fn save_api_record(
        &self,
        record: &ApiRecord,
        payload: &serde_json::Value,
    ) -> Result<SaveReceipt>;

    /// Persist entries of one feed.
    async fn save_articles(&self, articles: &[NewsArticle]) -> Result<SaveReceipt>;

    /// Row counts per table.
    async fn counts(&self) -> Result<DataSourceCounts>;
}

/// SQLite plus JSON backups in one data directory.
#[derive(Clone)]
pub struct DataStore {
    database: Database,
    local: LocalStorage,
}

impl DataStore {
    pub fn new(database: Database, local: LocalStorage) -> Self {
        Self { database, local }
    }

    /// Open the data directory described by the storage config.
    pub async fn open(config: &StorageConfig) -> Result<Self> {
        let local = LocalStorage::new(&config.data_dir);
        local.ensure_root().await?;
        let database = Database::open(config.database_path())?;
        Ok(Self::new(database, local))
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn local(&self) -> &LocalStorage {
        &self.local
    }
}

#[async_trait]
impl RecordStore for DataStore {
    async fn save_web_page(&self, page: &WebPage) -> Result<SaveReceipt> {
        let id = self.database.insert_web_page(page)?;
        log::info!("Saved data to {} table", Table::WebData.name());

        let backup = self
            .local
            .write_backup(WEBPAGE_PREFIX, &slug(&page.url), page)
            .await?;

        Ok(SaveReceipt {
            row_ids: vec![id],
            backup: Some(backup),
        })
    }

    async fn save_api_record(
        &self,
        record: &ApiRecord,
        payload: &serde_json::Value,
    ) -> Result<SaveReceipt> {
        let id = self.database.insert_api_record(record)?;
        log::info!("Saved data to {} table", Table::ApiData.name());

        let backup = self
            .local
            .write_backup(API_PREFIX, &slug(&record.endpoint), payload)
            .await?;

        Ok(SaveReceipt {
            row_ids: vec![id],
            backup: Some(backup),
        })
    }

    async fn save_articles(&self, articles: &[NewsArticle]) -> Result<SaveReceipt> {
        let row_ids = self.database.insert_articles(articles)?;
        log::info!(
            "Saved {} rows to {} table",
            row_ids.len(),
            Table::NewsArticles.name()
        );

        Ok(SaveReceipt {
            row_ids,
            backup: None,
        })
    }

    async fn counts(&self) -> Result<DataSourceCounts> {
        self.database.counts()
    }
}
