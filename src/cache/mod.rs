//! Single-slot usage cache with a fixed freshness window and JSON persistence.

pub mod usage_cache;

pub use usage_cache::{CacheEntry, UsageCache, FRESHNESS_WINDOW};
