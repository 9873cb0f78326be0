//! Pipeline entry points for collector operations.
//!
//! - `run_collection`: Collect all configured sources and write the report
//! - `run_scrape` / `run_fetch` / `run_feed`: Collect a single source
//! - `run_report`: Rebuild the summary report from stored data
//! - `run_validate`: Check the configuration

pub mod collect;
pub mod report;
pub mod single;
pub mod validate;

pub use collect::run_collection;
pub use report::{generate_summary_report, run_report};
pub use single::{parse_params, run_feed, run_fetch, run_scrape};
pub use validate::run_validate;
