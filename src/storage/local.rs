//! Local filesystem side of the data directory.
//!
//! ## Layout
//!
//! ```text
//! {root}/
//! ├── global_data.db                          # SQLite (see database.rs)
//! ├── collection_report.json                  # Summary of the last run
//! ├── webpage_{YYYYmmdd_HHMMSS}_{slug}.json   # Scraped page backups
//! └── api_{YYYYmmdd_HHMMSS}_{slug}.json       # Raw API payload backups
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::utils::file_stamp;

/// Give up finding a free backup name after this many suffixes.
const MAX_NAME_ATTEMPTS: usize = 1000;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root_dir
    }

    /// Create the root directory if needed.
    pub async fn ensure_root(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.root_dir).await?;
        Ok(())
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.path(key);
        self.ensure_root().await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(path)
    }

    /// Write pretty JSON under a fixed name, replacing any previous file.
    pub async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<PathBuf> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.write_bytes(key, &bytes).await
    }

    /// Write a timestamped backup that never overwrites an existing file.
    ///
    /// The name is `{prefix}_{YYYYmmdd_HHMMSS}_{slug}.json`; on collision a
    /// `_N` suffix is appended. The name is claimed before the body is
    /// written, and a claimed file whose body fails is removed again.
    pub async fn write_backup<T: Serialize + ?Sized>(
        &self,
        prefix: &str,
        slug: &str,
        value: &T,
    ) -> Result<PathBuf> {
        self.ensure_root().await?;

        let stem = format!("{}_{}_{}", prefix, file_stamp(), slug);
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let name = if attempt == 0 {
                format!("{stem}.json")
            } else {
                format!("{stem}_{attempt}.json")
            };
            let path = self.path(&name);

            let opened = tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await;

            match opened {
                Ok(file) => {
                    return match fill_backup(file, value).await {
                        Ok(()) => Ok(path),
                        Err(e) => {
                            if let Err(cleanup) = tokio::fs::remove_file(&path).await {
                                log::warn!(
                                    "Could not remove partial backup {}: {}",
                                    path.display(),
                                    cleanup
                                );
                            }
                            Err(e)
                        }
                    };
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(AppError::Io(e)),
            }
        }

        Err(AppError::collect(
            stem,
            "no free backup file name available",
        ))
    }

    /// Total size of every file under the root, recursively.
    pub async fn storage_size_bytes(&self) -> Result<u64> {
        let mut total = 0;
        let mut pending = vec![self.root_dir.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(AppError::Io(e)),
            };
            while let Some(entry) = entries.next_entry().await? {
                let meta = entry.metadata().await?;
                if meta.is_dir() {
                    pending.push(entry.path());
                } else {
                    total += meta.len();
                }
            }
        }

        Ok(total)
    }

    /// Number of top-level entries in the root, not counting `exclude`.
    pub async fn file_count(&self, exclude: &str) -> Result<usize> {
        let mut entries = match tokio::fs::read_dir(&self.root_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(AppError::Io(e)),
        };

        let mut count = 0;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_name() != exclude {
                count += 1;
            }
        }
        Ok(count)
    }
}

async fn fill_backup<T: Serialize + ?Sized>(mut file: tokio::fs::File, value: &T) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value)?;
    file.write_all(&bytes).await?;
    file.flush().await?;
    Ok(())
}

/// Format a byte count as megabytes with two decimals.
pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / BYTES_PER_MB)
}
