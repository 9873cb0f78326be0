// src/lib.rs

//! Global data collector library.
//!
//! Scrapes web pages, fetches public JSON APIs and reads news feeds, then
//! stores everything in SQLite with JSON backups and a summary report.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
