//! Session authenticator: login page, ticket, credential POST.

use tracing::{debug, info};

use crate::config::PortalConfig;
use crate::credentials::Credentials;
use crate::error::{Result, UsageError};

use super::html::first_hidden_value;
use super::session::{PortalSession, SessionFactory};

/// Form field carrying the account identifier.
pub const FIELD_IDENTIFIER: &str = "telnum";
pub const FIELD_SECRET: &str = "password";
/// Form field carrying the login ticket scraped from the login page.
pub const FIELD_TICKET: &str = "ticket";

/// Open a fresh session and perform the login handshake.
///
/// Optimistic: the portal answers the credential POST with a landing page
/// whether or not the credentials were accepted, so success is only known
/// once the extractor finds its tokens.
///
/// # Errors
///
/// `PortalUnavailable` when the login page cannot be fetched or carries no
/// hidden ticket, or when the credential POST fails at the transport level.
pub async fn authenticate(
    factory: &dyn SessionFactory,
    portal: &PortalConfig,
    credentials: &Credentials,
) -> Result<Box<dyn PortalSession>> {
    let mut session = factory.open_session()?;

    let login_page = session.get(&portal.login_page_url).await?;
    let ticket = first_hidden_value(&login_page).ok_or_else(|| {
        UsageError::PortalUnavailable(
            "login page has no hidden ticket field; the portal layout may have changed".to_string(),
        )
    })?;
    debug!(ticket_len = ticket.len(), "Login ticket extracted");

    let form = [
        (FIELD_IDENTIFIER, credentials.identifier()),
        (FIELD_SECRET, credentials.secret()),
        (FIELD_TICKET, ticket.as_str()),
    ];
    session.post_form(&portal.login_submit_url, &form).await?;
    info!(identifier = credentials.identifier(), "Credentials submitted to portal");

    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portal::testing::{login_page, Method, ScriptedPortal};

    fn creds() -> Credentials {
        Credentials::new("09012345678", "s3cret")
    }

    #[tokio::test]
    async fn test_authenticate_posts_credentials_and_ticket() {
        let portal = PortalConfig::default();
        let scripted = ScriptedPortal::new();
        scripted.on_get(&portal.login_page_url, &login_page("T-42"));
        scripted.on_post(&portal.login_submit_url, "<html>ok</html>");

        let session = authenticate(&scripted, &portal, &creds()).await;
        assert!(session.is_ok());

        let requests = scripted.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].method, Method::Get);
        assert_eq!(requests[0].url, portal.login_page_url);
        assert_eq!(requests[1].method, Method::Post);
        assert_eq!(requests[1].url, portal.login_submit_url);
        assert_eq!(
            requests[1].form,
            vec![
                ("telnum".to_string(), "09012345678".to_string()),
                ("password".to_string(), "s3cret".to_string()),
                ("ticket".to_string(), "T-42".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_ticket_is_portal_unavailable() {
        let portal = PortalConfig::default();
        let scripted = ScriptedPortal::new();
        scripted.on_get(&portal.login_page_url, "<html><body>maintenance</body></html>");

        let err = authenticate(&scripted, &portal, &creds())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, UsageError::PortalUnavailable(_)));
        // No credential POST after a failed ticket lookup.
        assert_eq!(scripted.request_count(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_login_page() {
        let portal = PortalConfig::default();
        let scripted = ScriptedPortal::new();
        scripted.unreachable(Method::Get, &portal.login_page_url);

        let err = authenticate(&scripted, &portal, &creds())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, UsageError::PortalUnavailable(_)));
    }

    #[tokio::test]
    async fn test_each_call_opens_new_session() {
        let portal = PortalConfig::default();
        let scripted = ScriptedPortal::new();
        scripted.on_get(&portal.login_page_url, &login_page("T"));

        let _ = authenticate(&scripted, &portal, &creds()).await;
        let _ = authenticate(&scripted, &portal, &creds()).await;
        assert_eq!(scripted.sessions_opened(), 2);
    }
}
