//! Usage extractor: navigation tokens, report POST, report parsing.

use tracing::{debug, info, warn};

use crate::config::PortalConfig;
use crate::error::{Result, UsageError};
use crate::usage::UsageRecord;

use super::html::{hidden_input_values, parse_usage_report};
use super::session::PortalSession;

/// Report form field carrying the first navigation token.
pub const FIELD_TOKEN_IV: &str = "mfiv";
/// Report form field carrying the second navigation token.
pub const FIELD_TOKEN_YM: &str = "mfym";

/// Walk the post-login pages and parse the usage report.
///
/// # Errors
///
/// - `AuthenticationFailed` when the navigation page has fewer than two
///   hidden tokens (the portal falls back to a login page on bad credentials).
/// - `ReportUnavailable` / `ReportMalformed` from report parsing.
/// - `PortalUnavailable` on transport failure.
pub async fn extract(
    session: &mut dyn PortalSession,
    portal: &PortalConfig,
) -> Result<UsageRecord> {
    let nav_page = session.get(&portal.usage_nav_url).await?;
    let tokens = hidden_input_values(&nav_page);
    if tokens.len() < 2 {
        warn!(tokens = tokens.len(), "Usage navigation page lacks report tokens");
        return Err(UsageError::AuthenticationFailed(
            "the portal did not issue report tokens; the identifier or password is probably wrong"
                .to_string(),
        ));
    }
    debug!(tokens = tokens.len(), "Report tokens extracted");

    let form = [
        (FIELD_TOKEN_IV, tokens[0].as_str()),
        (FIELD_TOKEN_YM, tokens[1].as_str()),
    ];
    let report = session.post_form(&portal.report_url, &form).await?;

    let figures = parse_usage_report(&report)?;
    let record = UsageRecord::from_figures(figures);
    info!(
        used_gb = record.used_gb,
        total_gb = record.total_gb,
        remaining_gb = record.remaining_gb,
        "Usage report parsed"
    );
    Ok(record)
}
