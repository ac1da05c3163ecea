//! Configuration schema definitions.
//!
//! All types derive Serde traits and carry defaults, so a partial TOML file
//! only needs to name what it changes.

use serde::{Deserialize, Serialize};

/// Public base URL of the dummy employee API.
pub const DEFAULT_BASE_URL: &str = "https://dummy.restapiexample.com/api/v1";

/// Root configuration for the employee directory service.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Where the REST surface listens.
    pub listener: ListenerConfig,

    /// The employee API being fronted.
    pub upstream: UpstreamConfig,

    /// Retry configuration for upstream calls.
    pub retries: RetryConfig,

    /// View cache settings.
    pub cache: CacheConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Ceiling on a whole inbound request, retries included, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 120,
        }
    }
}

/// Upstream employee API settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL; endpoint paths are appended to it.
    pub base_url: String,

    /// Per-attempt deadline in seconds.
    pub timeout_secs: u64,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
            connect_timeout_secs: 10,
            user_agent: concat!("employee-directory/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub max_retries: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,

    /// Add up to 10% random jitter to each delay.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 2000,
            max_delay_ms: 30_000,
            jitter: false,
        }
    }
}

/// View cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct CacheConfig {
    /// When disabled every read goes to the upstream.
    pub enabled: bool,

    /// Distinct search terms kept per cache generation. Further terms are
    /// answered but not stored.
    pub max_search_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_search_entries: 512,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter directive.
    pub log_level: String,

    /// "pretty" or "json".
    pub log_format: String,

    /// Enable the Prometheus exporter.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: DirectoryConfig = toml::from_str(
            r#"
            [upstream]
            base_url = "http://localhost:3000/api/v1"

            [retries]
            max_retries = 1
            "#,
        )
        .unwrap();

        assert_eq!(config.upstream.base_url, "http://localhost:3000/api/v1");
        assert_eq!(config.upstream.timeout_secs, 10);
        assert_eq!(config.retries.max_retries, 1);
        assert_eq!(config.retries.base_delay_ms, 2000);
        assert!(config.cache.enabled);
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
    }

    #[test]
    fn test_empty_file_is_default() {
        let config: DirectoryConfig = toml::from_str("").unwrap();
        assert_eq!(config, DirectoryConfig::default());
    }
}
