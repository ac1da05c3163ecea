//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call to upstream:
//!     → timeouts.rs (one deadline for the whole round trip)
//!     → On failure: retries.rs (transient? back off and try again)
//!     → On exhaustion: one terminal UpstreamError::Exhausted
//! ```
//!
//! # Design Decisions
//! - Every upstream call has a deadline
//! - Only transient failures are retried; redirects and 4xx fail immediately
//! - Retry count is bounded, so worst-case latency is bounded too

pub mod backoff;
pub mod retries;
pub mod timeouts;

pub use backoff::Backoff;
pub use retries::RetryPolicy;
