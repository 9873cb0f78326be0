// src/pipeline/validate.rs

use crate::error::Result;
use crate::models::{Category, Config, Job};
use crate::utils::log;

/// Validate configuration and list what would be collected.
pub fn run_validate(config: &Config) -> Result<()> {
    log::header("Validating configuration");

    if let Err(e) = config.validate() {
        ::log::error!("Config validation failed: {}", e);
        return Err(e);
    }

    log::success("Config OK");
    log::sub_item(&format!("User agent: {}", config.http.user_agent));
    log::sub_item(&format!("Timeout: {}s", config.http.timeout_secs));
    log::sub_item(&format!("Workers: {}", config.http.max_concurrent));
    log::sub_item(&format!("Data directory: {}", config.storage.data_dir.display()));

    let jobs = Job::plan(&config.sources);
    for category in Category::ALL {
        let count = jobs.iter().filter(|job| job.category == category).count();
        if count > 0 {
            log::sub_item(&format!("{}: {} source(s)", category, count));
        }
    }

    Ok(())
}
