//! Upstream employee API subsystem.
//!
//! # Data Flow
//! ```text
//! EmployeeDirectory
//!     → resilience::retries (bounded retry with backoff)
//!     → client.rs (path expansion, deadline, status classification)
//!     → transport.rs (one network round trip, pluggable)
//!     → envelope.rs ({status, message, data} validation)
//! ```
//!
//! # Design Decisions
//! - Failures are classified once, here, and never swallowed
//! - Redirects are surfaced as failures; the transport never follows them
//! - Only timeouts, connection errors, 429 and 5xx are transient

use std::time::Duration;
use thiserror::Error;

pub mod client;
pub mod envelope;
pub mod paths;
pub mod transport;

pub use client::UpstreamClient;
pub use envelope::{EnvelopeError, ResponseEnvelope};
pub use paths::ApiPath;
pub use transport::{HttpTransport, Transport, TransportRequest, TransportResponse};

/// Failures of a single upstream call, or of a retried sequence of calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    /// No complete response within the deadline.
    #[error("upstream timed out after {0:?}")]
    Timeout(Duration),

    /// Connection could not be established or was dropped.
    #[error("connection to upstream failed: {0}")]
    Connect(String),

    /// 3xx answer.
    #[error("upstream redirected with status {status}")]
    Redirect {
        status: u16,
        location: Option<String>,
    },

    /// 5xx answer.
    #[error("upstream returned server error {status}: {body}")]
    ServerError { status: u16, body: String },

    /// 429 answer.
    #[error("upstream rate limited the request")]
    RateLimited,

    /// Any other 4xx answer.
    #[error("upstream returned error code {status}")]
    ClientError { status: u16, body: String },

    /// Body could not be read as an envelope.
    #[error("upstream response could not be decoded: {0}")]
    Decode(String),

    #[error("invalid upstream URL: {0}")]
    InvalidUrl(String),

    /// Terminal state of the retry policy.
    #[error("upstream unavailable after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        last: Box<UpstreamError>,
    },
}

impl UpstreamError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            UpstreamError::Timeout(_)
                | UpstreamError::Connect(_)
                | UpstreamError::ServerError { .. }
                | UpstreamError::RateLimited
        )
    }

    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::Timeout(_) => "timeout",
            UpstreamError::Connect(_) => "connect",
            UpstreamError::Redirect { .. } => "redirect",
            UpstreamError::ServerError { .. } => "server_error",
            UpstreamError::RateLimited => "rate_limited",
            UpstreamError::ClientError { .. } => "client_error",
            UpstreamError::Decode(_) => "decode",
            UpstreamError::InvalidUrl(_) => "invalid_url",
            UpstreamError::Exhausted { .. } => "exhausted",
        }
    }
}
