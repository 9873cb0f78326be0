// src/pipeline/collect.rs

//! Full collection run.

use std::sync::Arc;

use crate::error::Result;
use crate::models::{Category, Config, Job, SummaryReport};
use crate::services::Collector;
use crate::storage::DataStore;
use crate::utils::{http, log};

use super::report::{generate_summary_report, log_report};

/// Collect every configured source (or one category), then write the report.
pub async fn run_collection(config: &Config, only: Option<Category>) -> Result<SummaryReport> {
    log::header("Starting global data collection process");
    config.validate()?;

    let store = DataStore::open(&config.storage).await?;
    let client = http::create_client(&config.http)?;
    let collector = Collector::new(
        Arc::new(config.clone()),
        client,
        Arc::new(store.clone()),
    );

    let jobs = match only {
        Some(category) => Job::plan_category(&config.sources, category),
        None => Job::plan(&config.sources),
    };

    log::step(
        1,
        2,
        &format!(
            "Collect - {} source(s) with {} worker(s)",
            jobs.len(),
            config.http.max_concurrent.max(1)
        ),
    );
    let stats = collector.collect_all(jobs).await;
    ::log::info!(
        "Completed data collection in {:.2} seconds",
        stats.elapsed_secs
    );

    log::step(2, 2, "Report - Summarizing stored data");
    let (report, _) =
        generate_summary_report(&store, store.local(), &config.storage, Some(stats)).await?;
    log_report(&report);

    Ok(report)
}
