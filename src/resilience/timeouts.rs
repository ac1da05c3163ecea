//! Deadline enforcement for upstream calls.
//!
//! Applied around the transport so the limit holds regardless of which
//! transport is plugged in.

use std::future::Future;
use std::time::Duration;

use crate::upstream::UpstreamError;

/// Run `future`, failing with [`UpstreamError::Timeout`] once `deadline` passes.
pub async fn with_deadline<T, F>(deadline: Duration, future: F) -> Result<T, UpstreamError>
where
    F: Future<Output = Result<T, UpstreamError>>,
{
    match tokio::time::timeout(deadline, future).await {
        Ok(result) => result,
        Err(_) => Err(UpstreamError::Timeout(deadline)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_completes_within_deadline() {
        let result = with_deadline(Duration::from_millis(500), async { Ok::<_, UpstreamError>(7) }).await;
        assert_eq!(result, Ok(7));
    }

    #[tokio::test]
    async fn test_inner_error_passes_through() {
        let result: Result<(), _> = with_deadline(Duration::from_millis(500), async {
            Err(UpstreamError::RateLimited)
        })
        .await;
        assert_eq!(result, Err(UpstreamError::RateLimited));
    }

    #[tokio::test]
    async fn test_slow_future_times_out() {
        let result: Result<(), _> = with_deadline(Duration::from_millis(20), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        assert_eq!(result, Err(UpstreamError::Timeout(Duration::from_millis(20))));
    }
}
