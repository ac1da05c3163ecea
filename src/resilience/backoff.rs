//! Exponential backoff with optional jitter.

use rand::Rng;
use std::time::Duration;

/// Delay schedule: `base * 2^(retry - 1)`, capped at `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    base_ms: u64,
    max_ms: u64,
    jitter: bool,
}

impl Backoff {
    pub fn new(base_ms: u64, max_ms: u64, jitter: bool) -> Self {
        Self {
            base_ms,
            max_ms: max_ms.max(base_ms),
            jitter,
        }
    }

    /// Delay before the given retry (1-based). Retry 0 waits for nothing.
    pub fn delay(&self, retry: u32) -> Duration {
        if retry == 0 {
            return Duration::ZERO;
        }

        let exponential_base = 2u64.saturating_pow(retry - 1);
        let capped_delay = self.base_ms.saturating_mul(exponential_base).min(self.max_ms);

        // Jitter adds up to 10% on top of the capped delay
        let jitter_range = capped_delay / 10;
        let jitter = if self.jitter && jitter_range > 0 {
            rand::thread_rng().gen_range(0..jitter_range)
        } else {
            0
        };

        Duration::from_millis(capped_delay + jitter)
    }
}
