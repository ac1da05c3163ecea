//! Retry logic.
//!
//! # Responsibilities
//! - Re-run an upstream call after transient failures
//! - Wait with exponential backoff between attempts
//! - Collapse exhaustion into one terminal error carrying the last failure
//!
//! # Design Decisions
//! - Applies to every endpoint, writes included: the upstream is a flaky demo
//!   service and a failed write has no partial effect we could observe
//! - Redirects, 4xx and undecodable bodies are deterministic and fail at once

use std::future::Future;

use crate::config::RetryConfig;
use crate::observability::metrics;
use crate::resilience::Backoff;
use crate::upstream::UpstreamError;

/// Bounded retry around a single upstream call.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_retries: u32,
    backoff: Backoff,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff: Backoff) -> Self {
        Self {
            max_retries,
            backoff,
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            config.max_retries,
            Backoff::new(config.base_delay_ms, config.max_delay_ms, config.jitter),
        )
    }

    /// Total attempts including the first one.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Run `call` until it succeeds, fails deterministically, or the retry
    /// budget is spent.
    pub async fn run<T, F, Fut>(&self, operation: &'static str, mut call: F) -> Result<T, UpstreamError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, UpstreamError>>,
    {
        let mut attempts = 0;

        loop {
            attempts += 1;

            let err = match call().await {
                Ok(value) => {
                    metrics::record_upstream_attempt(operation, "success");
                    return Ok(value);
                }
                Err(err) => err,
            };
            metrics::record_upstream_attempt(operation, err.kind());

            if !err.is_transient() {
                tracing::warn!(operation, attempt = attempts, error = %err, "Upstream call failed, not retrying");
                return Err(err);
            }

            if attempts > self.max_retries {
                tracing::error!(operation, attempts, error = %err, "Upstream retries exhausted");
                return Err(UpstreamError::Exhausted {
                    attempts,
                    last: Box::new(err),
                });
            }

            let delay = self.backoff.delay(attempts);
            tracing::info!(operation, attempt = attempts, delay = ?delay, error = %err, "Retrying upstream call");
            metrics::record_upstream_retry(operation);
            tokio::time::sleep(delay).await;
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}
