//! Authenticated Y!mobile data-usage fetcher.
//!
//! Logs into the carrier's customer portal with a per-call cookie session,
//! walks the fixed navigation sequence to the usage report, parses the four
//! usage tables into a [`UsageRecord`], and caches the result for 15 minutes.
//!
//! ```no_run
//! use ymobile_usage::{Config, Credentials, UsageFetcher};
//!
//! # async fn run() -> ymobile_usage::Result<()> {
//! let config = Config::load()?;
//! let fetcher = UsageFetcher::new(&config);
//! let record = fetcher
//!     .get_data(&Credentials::new("09012345678", "password"), false)
//!     .await?;
//! println!("{} GB left of {} GB", record.remaining_gb, record.total_gb);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod credentials;
pub mod error;
pub mod fetcher;
pub mod portal;
pub mod usage;

pub use cache::{CacheEntry, UsageCache, FRESHNESS_WINDOW};
pub use config::{Config, PortalConfig};
pub use credentials::Credentials;
pub use error::{Result, UsageError};
pub use fetcher::UsageFetcher;
pub use usage::{UsageFigures, UsageRecord};
