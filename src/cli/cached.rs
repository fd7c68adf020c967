//! `ymusage cached` handler.

use anyhow::{Context, Result};
use chrono::Utc;

use ymobile_usage::{CacheEntry, Config, UsageCache};

use super::format_record;

/// Print the cached entry and its age. Never touches the network.
pub(crate) fn cmd_cached(json: bool) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let cache = UsageCache::new(config.cache_path());

    let Some(entry) = cache.load() else {
        println!("No cached usage at {}.", cache.path().display());
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&entry)?);
    } else {
        println!("{}", format_record(&entry.record));
        println!("{}", describe_age(&entry, Utc::now()));
    }
    Ok(())
}

fn describe_age(entry: &CacheEntry, now: chrono::DateTime<Utc>) -> String {
    match entry.age(now) {
        Some(age) => {
            let minutes = age.as_secs() / 60;
            let state = if entry.is_fresh(now) { "fresh" } else { "stale" };
            format!("Cached {} min ago ({})", minutes, state)
        }
        None => "Cached in the future (clock skew); will refresh".to_string(),
    }
}
