//! SQLite store for collected records.
//!
//! One table per record shape:
//!
//! ```text
//! web_data       url, title, content, timestamp, source
//! api_data       endpoint, data_type, data_json, timestamp
//! news_articles  title, content, source, published_date, url, authors, timestamp
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, params};

use crate::error::{AppError, Result};
use crate::models::{ApiRecord, DataSourceCounts, NewsArticle, WebPage};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS web_data (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT,
    title TEXT,
    content TEXT,
    timestamp DATETIME,
    source TEXT
);

CREATE TABLE IF NOT EXISTS api_data (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    endpoint TEXT,
    data_type TEXT,
    data_json TEXT,
    timestamp DATETIME
);

CREATE TABLE IF NOT EXISTS news_articles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT,
    content TEXT,
    source TEXT,
    published_date TEXT,
    url TEXT,
    authors TEXT,
    timestamp DATETIME
);
"#;

/// Tables managed by [`Database`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    WebData,
    ApiData,
    NewsArticles,
}

impl Table {
    pub fn name(&self) -> &'static str {
        match self {
            Table::WebData => "web_data",
            Table::ApiData => "api_data",
            Table::NewsArticles => "news_articles",
        }
    }
}

/// Shared SQLite connection.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    path: PathBuf,
}

impl Database {
    /// Open (or create) the database and its tables.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        if path.exists() {
            log::debug!("Opening existing database {}", path.display());
        } else {
            log::info!("Creating database {}", path.display());
        }

        let conn = Connection::open(path)?;
        Self::init(conn, path.to_path_buf())
    }

    /// In-memory database, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?, PathBuf::from(":memory:"))
    }

    fn init(conn: Connection, path: PathBuf) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AppError::collect("database", "connection lock poisoned"))
    }

    /// Insert a scraped page, returning its row id.
    pub fn insert_web_page(&self, page: &WebPage) -> Result<i64> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO web_data (url, title, content, timestamp, source) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![page.url, page.title, page.content, page.timestamp, page.source],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Insert an API response, returning its row id.
    pub fn insert_api_record(&self, record: &ApiRecord) -> Result<i64> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO api_data (endpoint, data_type, data_json, timestamp) VALUES (?1, ?2, ?3, ?4)",
            params![
                record.endpoint,
                record.data_type,
                record.data_json,
                record.timestamp
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Insert feed entries in one transaction, returning their row ids.
    pub fn insert_articles(&self, articles: &[NewsArticle]) -> Result<Vec<i64>> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut ids = Vec::with_capacity(articles.len());
        {
            let mut stmt = tx.prepare(
                "INSERT INTO news_articles (title, content, source, published_date, url, authors, timestamp) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for article in articles {
                stmt.execute(params![
                    article.title,
                    article.content,
                    article.source,
                    article.published_date,
                    article.url,
                    article.authors,
                    article.timestamp
                ])?;
                ids.push(tx.last_insert_rowid());
            }
        }
        tx.commit()?;
        Ok(ids)
    }

    /// Number of rows in a table.
    pub fn count(&self, table: Table) -> Result<u64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", table.name()),
            [],
            |row| row.get(0),
        )?;
        Ok(count.max(0) as u64)
    }

    /// Row counts for all tables.
    pub fn counts(&self) -> Result<DataSourceCounts> {
        Ok(DataSourceCounts {
            web_scraping: self.count(Table::WebData)?,
            api_data: self.count(Table::ApiData)?,
            news_articles: self.count(Table::NewsArticles)?,
        })
    }
}
