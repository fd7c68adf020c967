//! Single-slot usage cache persisted as JSON.
//!
//! Defaults to `~/.ymusage/cache/usage.json`. Holds at most one entry: the
//! last successfully fetched [`UsageRecord`] plus the instant it was written.
//! Writes go through a temp file and rename, so readers never observe a
//! half-written entry. Unreadable or corrupt files read as empty.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::usage::UsageRecord;

/// How long a cached record is served without re-authenticating.
pub const FRESHNESS_WINDOW: Duration = Duration::from_secs(15 * 60);

/// The persisted entry: record fields flattened alongside `cached_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// When the entry was written.
    pub cached_at: DateTime<Utc>,
    #[serde(flatten)]
    pub record: UsageRecord,
}

impl CacheEntry {
    /// Age at `now`. `None` when `cached_at` lies in the future.
    pub fn age(&self, now: DateTime<Utc>) -> Option<Duration> {
        now.signed_duration_since(self.cached_at).to_std().ok()
    }

    /// Fresh means written no more than [`FRESHNESS_WINDOW`] ago and not future-dated.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.age(now).is_some_and(|age| age < FRESHNESS_WINDOW)
    }
}

/// File-backed single-slot cache.
#[derive(Debug, Clone)]
pub struct UsageCache {
    path: PathBuf,
}

impl UsageCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Cache file `usage.json` inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join("usage.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current entry, fresh or not. Any read or parse failure yields `None`.
    pub fn load(&self) -> Option<CacheEntry> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Failed to read usage cache, treating as empty: {}", e);
                return None;
            }
        };
        match serde_json::from_str(&data) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Usage cache file is corrupt, treating as empty: {}", e);
                None
            }
        }
    }

    /// The cached record if it is still inside the freshness window at `now`.
    pub fn fresh_record(&self, now: DateTime<Utc>) -> Option<UsageRecord> {
        let entry = self.load()?;
        if entry.is_fresh(now) {
            debug!(cached_at = %entry.cached_at, "Usage cache hit");
            Some(entry.record)
        } else {
            debug!(cached_at = %entry.cached_at, "Usage cache entry stale");
            None
        }
    }

    /// Replace the entry with `record`, stamped `cached_at = now`.
    pub fn store(&self, record: &UsageRecord, now: DateTime<Utc>) -> Result<()> {
        let entry = CacheEntry {
            cached_at: now,
            record: record.clone(),
        };
        self.write_entry(&entry)
    }

    fn write_entry(&self, entry: &CacheEntry) -> Result<()> {
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent)?;

        let json = serde_json::to_string_pretty(entry).map_err(std::io::Error::from)?;
        let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        debug!(path = %self.path.display(), "Usage cache written");
        Ok(())
    }
}
