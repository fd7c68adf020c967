//! Error types for the usage fetcher.
//!
//! Every stage of a fetch either yields a complete result or one of these
//! errors. The four portal kinds are terminal for the current attempt and are
//! never retried internally.

use thiserror::Error;

/// Errors produced while fetching, parsing or caching usage data.
#[derive(Debug, Error)]
pub enum UsageError {
    /// Network/transport failure, or the login page did not have the expected shape.
    #[error("Portal unavailable: {0}")]
    PortalUnavailable(String),

    /// The post-login page lacked the expected token fields. Usually bad credentials.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Authenticated, but the report container was not rendered.
    #[error("Report unavailable: {0}")]
    ReportUnavailable(String),

    /// The report container was present but its tables or numbers did not parse.
    #[error("Report malformed: {0}")]
    ReportMalformed(String),

    /// Invalid configuration (bad endpoint URL, zero timeout, unreadable config file).
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl UsageError {
    /// `true` when the failure most likely means the identifier/secret pair was rejected.
    ///
    /// Callers use this to tell "check your credentials" apart from
    /// "the portal is having problems".
    pub fn is_credential_error(&self) -> bool {
        matches!(self, UsageError::AuthenticationFailed(_))
    }

    /// Stable snake_case label for logs and machine-readable output.
    pub fn kind(&self) -> &'static str {
        match self {
            UsageError::PortalUnavailable(_) => "portal_unavailable",
            UsageError::AuthenticationFailed(_) => "authentication_failed",
            UsageError::ReportUnavailable(_) => "report_unavailable",
            UsageError::ReportMalformed(_) => "report_malformed",
            UsageError::Config(_) => "config",
            UsageError::Io(_) => "io",
        }
    }
}

impl From<reqwest::Error> for UsageError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            UsageError::PortalUnavailable(format!("request timed out: {}", e))
        } else {
            UsageError::PortalUnavailable(e.to_string())
        }
    }
}

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, UsageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_auth_failure_is_credential_error() {
        assert!(UsageError::AuthenticationFailed("x".into()).is_credential_error());
        assert!(!UsageError::PortalUnavailable("x".into()).is_credential_error());
        assert!(!UsageError::ReportUnavailable("x".into()).is_credential_error());
        assert!(!UsageError::ReportMalformed("x".into()).is_credential_error());
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(
            UsageError::AuthenticationFailed(String::new()).kind(),
            "authentication_failed"
        );
        assert_eq!(
            UsageError::ReportMalformed(String::new()).kind(),
            "report_malformed"
        );
    }

    #[test]
    fn test_display_includes_detail() {
        let err = UsageError::ReportUnavailable("no usage block".into());
        assert_eq!(err.to_string(), "Report unavailable: no usage block");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: UsageError = io.into();
        assert_eq!(err.kind(), "io");
    }
}
