//! HTTP session primitive.
//!
//! `PortalSession` abstracts the cookie-carrying HTTP client so the
//! authenticator and extractor can be tested against scripted pages.
//! `HttpSessionFactory` builds real reqwest sessions, one per fetch.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use reqwest::{Client, Response};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{Result, UsageError};

/// A live HTTP client bound to its own cookie jar.
///
/// Scoped to a single fetch: created at the start, dropped at the end.
/// Both methods return the response body as text regardless of status,
/// except for 5xx responses which surface as `PortalUnavailable`.
#[async_trait]
pub trait PortalSession: Send {
    async fn get(&mut self, url: &str) -> Result<String>;

    /// Submit an `application/x-www-form-urlencoded` POST.
    async fn post_form(&mut self, url: &str, form: &[(&str, &str)]) -> Result<String>;
}

/// Opens fresh sessions. Each call must return a session with an empty cookie jar.
pub trait SessionFactory: Send + Sync {
    fn open_session(&self) -> Result<Box<dyn PortalSession>>;
}

/// Builds reqwest clients with a cookie store and per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpSessionFactory {
    user_agent: String,
    timeout: Duration,
}

impl HttpSessionFactory {
    pub fn new(user_agent: impl Into<String>, timeout: Duration) -> Self {
        Self {
            user_agent: user_agent.into(),
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.portal.user_agent.clone(), config.timeout())
    }
}

impl SessionFactory for HttpSessionFactory {
    fn open_session(&self) -> Result<Box<dyn PortalSession>> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(self.timeout)
            .connect_timeout(self.timeout)
            .build()
            .map_err(|e| {
                UsageError::PortalUnavailable(format!("failed to build HTTP client: {}", e))
            })?;
        Ok(Box::new(HttpSession {
            client,
            user_agent: self.user_agent.clone(),
        }))
    }
}

/// reqwest-backed session. The client's cookie jar lives exactly as long as this value.
pub struct HttpSession {
    client: Client,
    user_agent: String,
}

#[async_trait]
impl PortalSession for HttpSession {
    async fn get(&mut self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await?;
        read_body(url, response).await
    }

    async fn post_form(&mut self, url: &str, form: &[(&str, &str)]) -> Result<String> {
        let response = self
            .client
            .post(url)
            .header(USER_AGENT, &self.user_agent)
            .form(form)
            .send()
            .await?;
        read_body(url, response).await
    }
}

async fn read_body(url: &str, response: Response) -> Result<String> {
    let status = response.status();
    if status.is_server_error() {
        return Err(UsageError::PortalUnavailable(format!(
            "{} returned HTTP {}",
            url, status
        )));
    }
    if !status.is_success() {
        // The portal answers some failed steps with 4xx pages; the page
        // structure checks downstream decide what that means.
        warn!(url = url, status = %status, "Portal returned non-success status");
    }
    let body = response.text().await?;
    debug!(url = url, status = %status, bytes = body.len(), "Portal response received");
    Ok(body)
}
