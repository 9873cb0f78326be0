//! Summary report written after each collection.

use serde::{Deserialize, Serialize};

/// Row counts per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceCounts {
    pub web_scraping: u64,
    pub api_data: u64,
    pub news_articles: u64,
}

impl DataSourceCounts {
    pub fn total(&self) -> u64 {
        self.web_scraping + self.api_data + self.news_articles
    }
}

/// Outcome of one collection run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub jobs: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub elapsed_secs: f64,
}

/// Contents of `collection_report.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryReport {
    pub timestamp: String,
    pub data_sources: DataSourceCounts,
    /// Human readable, e.g. `"1.25 MB"`
    pub storage_size: String,
    /// Entries in the data directory, excluding the database
    pub file_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<RunStats>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_without_run_stats() {
        let report = SummaryReport {
            timestamp: "2026-01-01T00:00:00.000000".into(),
            data_sources: DataSourceCounts {
                web_scraping: 4,
                api_data: 3,
                news_articles: 120,
            },
            storage_size: "0.42 MB".into(),
            file_count: 7,
            collection: None,
        };

        let value = serde_json::to_value(&report).unwrap();
        assert!(value.get("collection").is_none());
        assert_eq!(value["data_sources"]["news_articles"], 120);
        assert_eq!(report.data_sources.total(), 127);
    }
}
