//! Utility functions and helpers.

pub mod http;
pub mod log;

use std::sync::LazyLock;

use chrono::Local;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;
use url::Url;

/// Longest slug used in backup file names, in graphemes.
const MAX_SLUG_LEN: usize = 60;

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{Alphabetic}\p{N}]+").expect("static slug pattern"));

/// Local wall-clock time as ISO-8601 with microseconds, no offset.
pub fn timestamp() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

/// Second-resolution stamp used in backup file names.
pub fn file_stamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// File-name-safe label for a URL: host and path, separators collapsed to `_`.
pub fn slug(url_str: &str) -> String {
    let raw = match Url::parse(url_str) {
        Ok(u) => format!("{}{}", u.host_str().unwrap_or_default(), u.path()),
        Err(_) => url_str.to_string(),
    };

    let collapsed = NON_WORD.replace_all(&raw, "_");
    let trimmed = collapsed.trim_matches('_').to_lowercase();
    let slug = truncate(&trimmed, MAX_SLUG_LEN);

    if slug.is_empty() {
        "source".to_string()
    } else {
        slug
    }
}

/// Cut `text` to at most `max` graphemes.
pub fn truncate(text: &str, max: usize) -> String {
    text.graphemes(true).take(max).collect()
}
