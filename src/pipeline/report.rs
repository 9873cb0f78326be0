// src/pipeline/report.rs

//! Summary report generation.

use std::path::PathBuf;

use crate::error::Result;
use crate::models::{Config, RunStats, StorageConfig, SummaryReport};
use crate::storage::{DataStore, LocalStorage, RecordStore, format_megabytes};
use crate::utils::{log, timestamp};

/// Build the summary report and write it to the data directory.
///
/// Counts and sizes are taken before the report file itself is written.
pub async fn generate_summary_report(
    store: &dyn RecordStore,
    local: &LocalStorage,
    storage: &StorageConfig,
    stats: Option<RunStats>,
) -> Result<(SummaryReport, PathBuf)> {
    let data_sources = store.counts().await?;
    let size_bytes = local.storage_size_bytes().await?;
    let file_count = local.file_count(&storage.database_file).await?;

    let report = SummaryReport {
        timestamp: timestamp(),
        data_sources,
        storage_size: format_megabytes(size_bytes),
        file_count,
        collection: stats,
    };

    let path = local.write_json(&storage.report_file, &report).await?;
    ::log::info!("Generated summary report at {}", path.display());

    Ok((report, path))
}

/// Log a report as a summary block.
pub fn log_report(report: &SummaryReport) {
    let mut items = vec![
        ("Web pages", report.data_sources.web_scraping.to_string()),
        ("API responses", report.data_sources.api_data.to_string()),
        ("News articles", report.data_sources.news_articles.to_string()),
        ("Storage size", report.storage_size.clone()),
        ("Files", report.file_count.to_string()),
    ];
    if let Some(stats) = &report.collection {
        items.push(("Jobs", stats.jobs.to_string()));
        items.push(("Succeeded", stats.succeeded.to_string()));
        items.push(("Failed", stats.failed.to_string()));
        items.push(("Skipped", stats.skipped.to_string()));
        items.push(("Elapsed", format!("{:.2}s", stats.elapsed_secs)));
    }
    log::summary("Data collection", &items);
}

/// Regenerate the report from what is already stored.
pub async fn run_report(config: &Config) -> Result<SummaryReport> {
    log::header("Generating summary report");

    let store = DataStore::open(&config.storage).await?;
    let (report, _) =
        generate_summary_report(&store, store.local(), &config.storage, None).await?;
    log_report(&report);

    Ok(report)
}
