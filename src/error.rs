//! Error taxonomy surfaced to callers of the directory.
//!
//! Every failure a caller can observe is one of five kinds. Each kind carries
//! a stable reason code so the inbound layer can map it to a status code and
//! a body without inspecting messages.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::upstream::{EnvelopeError, UpstreamError};

/// Name reported as the `source` of every error body.
pub const API_NAME: &str = "employee-api";

pub const CODE_INVALID_FIELD: &str = "api.invalid.field";
pub const CODE_NOT_FOUND: &str = "employee.not.found";
pub const CODE_NO_DATA: &str = "employee.no.data";
pub const CODE_SERVER_ERROR: &str = "api.error";
pub const CODE_REDIRECT: &str = "api.redirect";
/// Inbound request ceiling exceeded. Raised by the HTTP layer, not by the
/// directory.
pub const CODE_TIMEOUT: &str = "api.timeout";

/// Errors returned by [`crate::EmployeeDirectory`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// Caller input failed local validation; no network call was made.
    #[error("{0}")]
    BadRequest(String),

    /// A lookup by identifier had no match.
    #[error("Could not find employee with id: {id}")]
    NotFound { id: String },

    /// The upstream answered correctly but there was nothing to return.
    #[error("No employee data found for the request.")]
    NoData,

    /// Upstream 5xx, exhausted transient failures or a malformed envelope.
    #[error("An error occurred and the request could not be processed.")]
    UpstreamInternal { detail: String },

    /// Upstream answered with a redirect. Never retried.
    #[error("Request redirected.")]
    UpstreamRedirect { detail: String },
}

impl DirectoryError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn upstream_internal(detail: impl Into<String>) -> Self {
        Self::UpstreamInternal {
            detail: detail.into(),
        }
    }

    /// Stable machine-readable code for this kind.
    pub fn reason_code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => CODE_INVALID_FIELD,
            Self::NotFound { .. } => CODE_NOT_FOUND,
            Self::NoData => CODE_NO_DATA,
            Self::UpstreamInternal { .. } => CODE_SERVER_ERROR,
            Self::UpstreamRedirect { .. } => CODE_REDIRECT,
        }
    }

    /// Underlying diagnostic, kept out of the user-facing description.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::UpstreamInternal { detail } | Self::UpstreamRedirect { detail } => {
                Some(detail.as_str())
            }
            _ => None,
        }
    }
}

impl From<UpstreamError> for DirectoryError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Redirect { .. } => Self::UpstreamRedirect {
                detail: err.to_string(),
            },
            other => Self::UpstreamInternal {
                detail: other.to_string(),
            },
        }
    }
}

impl From<EnvelopeError> for DirectoryError {
    fn from(err: EnvelopeError) -> Self {
        match err {
            EnvelopeError::NoData => Self::NoData,
            other => Self::UpstreamInternal {
                detail: other.to_string(),
            },
        }
    }
}

/// Result type for directory operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Error body returned to API clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub correlation_id: String,
    pub source: String,
    pub reason_code: String,
    pub description: String,
}

impl ApiError {
    pub fn new(correlation_id: impl Into<String>, error: &DirectoryError) -> Self {
        Self {
            correlation_id: correlation_id.into(),
            source: API_NAME.to_string(),
            reason_code: error.reason_code().to_string(),
            description: error.to_string(),
        }
    }

    /// Body for a request cut off by the inbound deadline.
    pub fn timed_out(correlation_id: impl Into<String>, limit: std::time::Duration) -> Self {
        Self {
            correlation_id: correlation_id.into(),
            source: API_NAME.to_string(),
            reason_code: CODE_TIMEOUT.to_string(),
            description: format!("Request did not complete within {} seconds.", limit.as_secs()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_reason_codes() {
        assert_eq!(DirectoryError::bad_request("x").reason_code(), "api.invalid.field");
        assert_eq!(
            DirectoryError::NotFound { id: "7".into() }.reason_code(),
            "employee.not.found"
        );
        assert_eq!(DirectoryError::NoData.reason_code(), "employee.no.data");
        assert_eq!(DirectoryError::upstream_internal("boom").reason_code(), "api.error");
    }

    #[test]
    fn test_redirect_maps_to_redirect_kind() {
        let err = DirectoryError::from(UpstreamError::Redirect {
            status: 302,
            location: Some("https://elsewhere".into()),
        });
        assert!(matches!(err, DirectoryError::UpstreamRedirect { .. }));
        assert_eq!(err.reason_code(), "api.redirect");
    }

    #[test]
    fn test_exhaustion_keeps_last_failure() {
        let err = DirectoryError::from(UpstreamError::Exhausted {
            attempts: 4,
            last: Box::new(UpstreamError::Timeout(Duration::from_secs(10))),
        });
        let detail = err.detail().unwrap();
        assert!(detail.contains("4 attempts"));
        assert!(detail.contains("timed out"));
    }

    #[test]
    fn test_envelope_no_data_is_distinct() {
        assert_eq!(DirectoryError::from(EnvelopeError::NoData), DirectoryError::NoData);
        let rejected = DirectoryError::from(EnvelopeError::Rejected {
            status: "error".into(),
            message: "Too Many Attempts.".into(),
        });
        assert!(matches!(rejected, DirectoryError::UpstreamInternal { .. }));
    }

    #[test]
    fn test_api_error_body() {
        let body = ApiError::new("abc-123", &DirectoryError::NotFound { id: "12".into() });
        assert_eq!(body.source, "employee-api");
        assert_eq!(body.reason_code, "employee.not.found");
        assert_eq!(body.description, "Could not find employee with id: 12");
        assert_eq!(body.correlation_id, "abc-123");
    }
}
