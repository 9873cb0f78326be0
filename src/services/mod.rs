//! Service layer for the collector.
//!
//! This module contains the business logic for:
//! - Page scraping (`PageScraper`)
//! - JSON API fetching (`ApiFetcher`)
//! - Feed reading (`FeedReader`)
//! - Running planned jobs (`Collector`)

mod api;
mod collector;
mod feed;
mod page;

pub use api::ApiFetcher;
pub use collector::{Collector, JobOutcome};
pub use feed::{FeedReader, parse_feed};
pub use page::{NO_TITLE, PageScraper, extract_page};
