//! Usage fetcher: the cache gate in front of authenticate + extract.
//!
//! ```text
//! EMPTY --fetch ok--> VALID --15 min--> STALE --fetch ok--> VALID
//!                                          \--fetch err--> (entry untouched, error returned)
//! ```
//!
//! No retries. A failed fetch never falls back to a stale record.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::cache::UsageCache;
use crate::config::{Config, PortalConfig};
use crate::credentials::Credentials;
use crate::error::Result;
use crate::portal::{self, HttpSessionFactory, SessionFactory};
use crate::usage::UsageRecord;

/// Entry point for UI collaborators and the standalone CLI.
///
/// Holds no session state between calls: every fetch opens a fresh cookie
/// session, and the only state that outlives a call is the cache file.
/// Two fetchers pointed at the same cache file are not serialized; the last
/// successful write wins.
pub struct UsageFetcher {
    portal: PortalConfig,
    sessions: Arc<dyn SessionFactory>,
    cache: UsageCache,
}

impl UsageFetcher {
    /// Real HTTP sessions, endpoints and cache location from `config`.
    pub fn new(config: &Config) -> Self {
        Self::with_parts(
            config.portal.clone(),
            Arc::new(HttpSessionFactory::from_config(config)),
            UsageCache::new(config.cache_path()),
        )
    }

    pub fn with_parts(
        portal: PortalConfig,
        sessions: Arc<dyn SessionFactory>,
        cache: UsageCache,
    ) -> Self {
        Self {
            portal,
            sessions,
            cache,
        }
    }

    pub fn cache(&self) -> &UsageCache {
        &self.cache
    }

    /// Return a fresh cached record, or log in and fetch a new one.
    ///
    /// With `force_refresh` the cache is never consulted, only written.
    /// On failure the cache entry is left exactly as it was.
    #[instrument(skip(self, credentials), fields(identifier = credentials.identifier()))]
    pub async fn get_data(
        &self,
        credentials: &Credentials,
        force_refresh: bool,
    ) -> Result<UsageRecord> {
        if !force_refresh {
            if let Some(record) = self.cache.fresh_record(Utc::now()) {
                info!("Serving usage from cache");
                return Ok(record);
            }
        }

        let record = self.fetch_fresh(credentials).await?;
        if let Err(e) = self.cache.store(&record, Utc::now()) {
            warn!(path = %self.cache.path().display(), "Failed to save usage cache: {}", e);
        }
        Ok(record)
    }

    /// Authenticate and extract without touching the cache.
    pub async fn fetch_fresh(&self, credentials: &Credentials) -> Result<UsageRecord> {
        let mut session =
            portal::authenticate(self.sessions.as_ref(), &self.portal, credentials).await?;
        let result = portal::extract(session.as_mut(), &self.portal).await;
        if let Err(e) = &result {
            warn!(kind = e.kind(), "Usage fetch failed: {}", e);
        }
        result
    }
}
