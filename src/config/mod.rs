//! Configuration for the usage fetcher.
//!
//! Loaded from `~/.ymusage/config.json` (all fields optional) and then
//! overridden by `YMUSAGE_*` environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, UsageError};

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const DEFAULT_LOGIN_PAGE_URL: &str = "https://my.ymobile.jp/muc/d/webLink/doSend/MWBWL0130";
const DEFAULT_LOGIN_SUBMIT_URL: &str = "https://id.my.ymobile.jp/sbid_auth/type1/2.0/login.php";
const DEFAULT_USAGE_NAV_URL: &str = "https://my.ymobile.jp/muc/d/webLink/doSend/MRERE0000";
const DEFAULT_REPORT_URL: &str = "https://re61.my.ymobile.jp/resfe/top/";

/// The four endpoints of the portal navigation sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// GET: login-initiation page carrying the hidden login ticket.
    pub login_page_url: String,
    /// POST: credential submission (`telnum`, `password`, `ticket`).
    pub login_submit_url: String,
    /// GET: protected navigation page carrying the two report tokens.
    pub usage_nav_url: String,
    /// POST: report rendering (`mfiv`, `mfym`).
    pub report_url: String,
    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            login_page_url: DEFAULT_LOGIN_PAGE_URL.to_string(),
            login_submit_url: DEFAULT_LOGIN_SUBMIT_URL.to_string(),
            usage_nav_url: DEFAULT_USAGE_NAV_URL.to_string(),
            report_url: DEFAULT_REPORT_URL.to_string(),
            user_agent: format!("ymusage/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl PortalConfig {
    /// Build a config whose four endpoints live under `base` (tests, staging mirrors).
    pub fn with_base_url(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            login_page_url: format!("{}/login", base),
            login_submit_url: format!("{}/login/submit", base),
            usage_nav_url: format!("{}/usage", base),
            report_url: format!("{}/report", base),
            ..Self::default()
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub portal: PortalConfig,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Cache file location. `None` means `~/.ymusage/cache/usage.json`.
    pub cache_path: Option<PathBuf>,
    /// Account identifier for standalone mode. Never used by the library itself.
    pub identifier: Option<String>,
    /// Secret for standalone mode. Prefer `YMUSAGE_PASSWORD` over storing it here.
    #[serde(skip_serializing)]
    pub password: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            portal: PortalConfig::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            cache_path: None,
            identifier: None,
            password: None,
        }
    }
}

impl Config {
    /// Base directory: `~/.ymusage`.
    pub fn dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".ymusage")
    }

    /// Config file path: `~/.ymusage/config.json`.
    pub fn path() -> PathBuf {
        Self::dir().join("config.json")
    }

    /// Default cache file path: `~/.ymusage/cache/usage.json`.
    pub fn default_cache_path() -> PathBuf {
        Self::dir().join("cache").join("usage.json")
    }

    /// Load from the default path, then apply environment overrides and validate.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::path())?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load from a specific file. A missing file yields defaults; a malformed one is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(data) => serde_json::from_str(&data).map_err(|e| {
                UsageError::Config(format!("Failed to parse config at {:?}: {}", path, e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(UsageError::Config(format!(
                "Failed to read config at {:?}: {}",
                path, e
            ))),
        }
    }

    /// Apply `YMUSAGE_*` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    fn apply_overrides_from<F>(&mut self, get: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = get("YMUSAGE_CACHE_PATH").filter(|v| !v.trim().is_empty()) {
            self.cache_path = Some(PathBuf::from(path));
        }
        if let Some(secs) = get("YMUSAGE_TIMEOUT_SECS").and_then(|v| v.trim().parse().ok()) {
            self.timeout_secs = secs;
        }
        if let Some(id) = get("YMUSAGE_ID").filter(|v| !v.trim().is_empty()) {
            self.identifier = Some(id.trim().to_string());
        }
        if let Some(pw) = get("YMUSAGE_PASSWORD").filter(|v| !v.is_empty()) {
            self.password = Some(pw);
        }
    }

    /// Reject endpoints that are not absolute URLs and a zero timeout.
    pub fn validate(&self) -> Result<()> {
        let endpoints = [
            ("login_page_url", &self.portal.login_page_url),
            ("login_submit_url", &self.portal.login_submit_url),
            ("usage_nav_url", &self.portal.usage_nav_url),
            ("report_url", &self.portal.report_url),
        ];
        for (name, value) in endpoints {
            url::Url::parse(value).map_err(|e| {
                UsageError::Config(format!("portal.{} is not a valid URL ({}): {}", name, value, e))
            })?;
        }
        if self.timeout_secs == 0 {
            return Err(UsageError::Config(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Resolved cache file location.
    pub fn cache_path(&self) -> PathBuf {
        self.cache_path.clone().unwrap_or_else(Self::default_cache_path)
    }
}
