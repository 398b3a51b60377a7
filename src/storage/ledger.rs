// src/storage/ledger.rs

//! Delivery ledger and its JSON file persistence.
//!
//! ## File Layout
//!
//! ```text
//! {
//!   "updated_at": "...",          // last persist time
//!   "count": 2,                   // record count at last persist
//!   "videos": { "<url>": { ... DeliveryRecord ... } }
//! }
//! ```
//!
//! Unknown fields are ignored on load so the file stays forward-readable.
//! A corrupt file is treated as an empty ledger and left in place for
//! operator inspection.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::DeliveryRecord;

/// In-memory mapping from video URL to its delivery record.
///
/// Invariant: at most one record per URL. Membership is an exact string
/// match on the normalized absolute URL.
#[derive(Debug, Default)]
pub struct Ledger {
    records: HashMap<String, DeliveryRecord>,
}

impl Ledger {
    /// Whether a URL has already been delivered.
    pub fn contains(&self, url: &str) -> bool {
        self.records.contains_key(url)
    }

    /// Insert a delivered record for a URL.
    ///
    /// Returns `false` and leaves the existing record untouched when the URL
    /// is already present; an existing record's timestamps are never
    /// overwritten.
    pub fn record(&mut self, source: &str, title: &str, url: &str, at: DateTime<Utc>) -> bool {
        if self.records.contains_key(url) {
            log::warn!("Ledger already contains {url}, keeping existing record");
            return false;
        }

        self.records
            .insert(url.to_string(), DeliveryRecord::delivered(source, title, url, at));
        true
    }

    /// Number of recorded URLs.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the ledger holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over all records.
    pub fn records(&self) -> impl Iterator<Item = &DeliveryRecord> {
        self.records.values()
    }

    fn from_file(file: LedgerFile) -> Self {
        Self {
            records: file.videos,
        }
    }
}

/// On-disk shape of the ledger file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct LedgerFile {
    /// Last persist time
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,

    /// Record count at last persist
    #[serde(default)]
    count: usize,

    /// Delivery records keyed by video URL
    #[serde(default)]
    videos: HashMap<String, DeliveryRecord>,
}

/// File-backed persistence for the ledger.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    /// Create a store for the given ledger file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the ledger, falling back to empty on a missing or corrupt file.
    ///
    /// A corrupt file is logged prominently and left on disk untouched; the
    /// run then behaves as if nothing was ever delivered.
    pub async fn load(&self) -> Ledger {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No ledger at {}, starting empty", self.path.display());
                return Ledger::default();
            }
            Err(e) => {
                log::warn!(
                    "Ledger unreadable at {} ({}); starting empty, file left in place. \
                     Everything ever seen may be re-delivered!",
                    self.path.display(),
                    e
                );
                return Ledger::default();
            }
        };

        match serde_json::from_slice::<LedgerFile>(&bytes) {
            Ok(file) => Ledger::from_file(file),
            Err(e) => {
                log::warn!(
                    "Ledger corrupt at {} ({}); starting empty, file left in place. \
                     Everything ever seen may be re-delivered!",
                    self.path.display(),
                    e
                );
                Ledger::default()
            }
        }
    }

    /// Persist the ledger atomically (write to temp, then rename).
    pub async fn persist(&self, ledger: &Ledger) -> Result<()> {
        let file = LedgerFile {
            updated_at: Some(Utc::now()),
            count: ledger.records.len(),
            videos: ledger.records.clone(),
        };
        let bytes = serde_json::to_vec_pretty(&file)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        let mut out = tokio::fs::File::create(&tmp).await?;
        out.write_all(&bytes).await?;
        out.flush().await?;
        drop(out);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Take exclusive logical ownership of the ledger file for one run.
    ///
    /// Lock-file discipline: a `.lock` sibling is created with `create_new`
    /// and removed when the guard drops. A held lock aborts the run.
    pub fn lock(&self) -> Result<LedgerLock> {
        let lock_path = self.path.with_extension("lock");

        if let Some(parent) = lock_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&lock_path)
        {
            Ok(_) => Ok(LedgerLock { path: lock_path }),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Err(AppError::ledger(
                format!(
                    "another run holds the ledger lock at {}",
                    lock_path.display()
                ),
            )),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

/// Guard for the ledger lock file; removes the file on drop.
#[derive(Debug)]
pub struct LedgerLock {
    path: PathBuf,
}

impl Drop for LedgerLock {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            log::warn!("Failed to remove ledger lock {}: {}", self.path.display(), e);
        }
    }
}
