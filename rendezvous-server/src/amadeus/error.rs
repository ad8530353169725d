//! Amadeus client error types.

use std::sync::Arc;

use crate::domain::LegIssueKind;

/// Errors from the Amadeus HTTP client and token exchange.
#[derive(Debug, thiserror::Error)]
pub enum AmadeusError {
    /// Client credentials are missing or unusable
    #[error("credentials not configured: {0}")]
    AuthConfig(String),

    /// The client-credentials exchange failed
    #[error("token exchange failed: {0}")]
    AuthUpstream(String),

    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// JSON deserialization failed
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Fixture data could not be loaded
    #[error("mock data error: {0}")]
    Mock(String),
}

impl AmadeusError {
    /// How a leg that hit this error is tagged.
    pub fn leg_issue_kind(&self) -> LegIssueKind {
        match self {
            AmadeusError::AuthConfig(_) => LegIssueKind::AuthConfig,
            AmadeusError::AuthUpstream(_) => LegIssueKind::AuthUpstream,
            // Malformed offers body.
            AmadeusError::Json { .. } => LegIssueKind::UnparseablePrice,
            AmadeusError::Http(_) | AmadeusError::Api { .. } | AmadeusError::Mock(_) => {
                LegIssueKind::Upstream
            }
        }
    }

    /// Recover an owned error from one shared between coalesced callers.
    ///
    /// Transport errors cannot be cloned; other holders get them as an
    /// [`AmadeusError::Api`] carrying the same status and text.
    pub fn from_shared(err: Arc<Self>) -> Self {
        Arc::try_unwrap(err).unwrap_or_else(|shared| match shared.as_ref() {
            AmadeusError::AuthConfig(m) => AmadeusError::AuthConfig(m.clone()),
            AmadeusError::AuthUpstream(m) => AmadeusError::AuthUpstream(m.clone()),
            AmadeusError::Http(e) => AmadeusError::Api {
                status: e.status().map(|s| s.as_u16()).unwrap_or(0),
                message: e.to_string(),
            },
            AmadeusError::Api { status, message } => AmadeusError::Api {
                status: *status,
                message: message.clone(),
            },
            AmadeusError::Json { message, body } => AmadeusError::Json {
                message: message.clone(),
                body: body.clone(),
            },
            AmadeusError::Mock(m) => AmadeusError::Mock(m.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = AmadeusError::Api {
            status: 500,
            message: "Internal Server Error".into(),
        };
        assert_eq!(err.to_string(), "API error 500: Internal Server Error");

        let err = AmadeusError::AuthConfig("AMADEUS_CLIENT_ID is empty".into());
        assert_eq!(
            err.to_string(),
            "credentials not configured: AMADEUS_CLIENT_ID is empty"
        );

        let err = AmadeusError::Json {
            message: "expected value".into(),
            body: Some("<html>".into()),
        };
        assert!(err.to_string().contains("JSON parse error"));
        assert!(err.to_string().contains("expected value"));
    }

    #[test]
    fn leg_issue_kinds() {
        assert_eq!(
            AmadeusError::AuthConfig(String::new()).leg_issue_kind(),
            LegIssueKind::AuthConfig
        );
        assert_eq!(
            AmadeusError::AuthUpstream(String::new()).leg_issue_kind(),
            LegIssueKind::AuthUpstream
        );
        assert_eq!(
            AmadeusError::Api {
                status: 429,
                message: String::new()
            }
            .leg_issue_kind(),
            LegIssueKind::Upstream
        );
        assert_eq!(
            AmadeusError::Json {
                message: String::new(),
                body: None
            }
            .leg_issue_kind(),
            LegIssueKind::UnparseablePrice
        );
        assert_eq!(
            AmadeusError::Mock(String::new()).leg_issue_kind(),
            LegIssueKind::Upstream
        );
    }

    #[test]
    fn shared_errors_keep_kind_and_message() {
        let shared = Arc::new(AmadeusError::AuthUpstream("status 401".into()));
        let held = shared.clone();

        let owned = AmadeusError::from_shared(shared);
        assert!(matches!(&owned, AmadeusError::AuthUpstream(m) if m == "status 401"));
        assert_eq!(owned.leg_issue_kind(), held.leg_issue_kind());

        let sole = Arc::new(AmadeusError::Api {
            status: 503,
            message: "unavailable".into(),
        });
        assert!(matches!(
            AmadeusError::from_shared(sole),
            AmadeusError::Api { status: 503, .. }
        ));
    }
}
