//! Configuration Module
//!
//! Loads service configuration from built-in defaults overlaid with
//! `HELLO_CACHE_*` environment variables.

use std::time::Duration;

use ::config::Environment;
use serde::Deserialize;
use thiserror::Error;

use crate::cache::{DEFAULT_CAPACITY, DEFAULT_TTL};

/// Prefix shared by every environment variable the service reads.
pub const ENV_PREFIX: &str = "HELLO_CACHE";

/// One week; the ping scheduler cannot start or tick arbitrarily far out.
const MAX_PING_INTERVAL_MINUTES: u64 = 7 * 24 * 60;
const MAX_PING_INITIAL_DELAY_SECS: u64 = 7 * 24 * 60 * 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] ::config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Service configuration parameters.
///
/// Every field can be overridden with `HELLO_CACHE_<FIELD>` (upper case),
/// e.g. `HELLO_CACHE_CACHE_CAPACITY=5000`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum number of live cache entries
    pub cache_capacity: usize,
    /// Lifetime of each cache entry in seconds
    pub cache_ttl_secs: u64,
    /// Interval between background sweeps of expired entries, in seconds
    pub cleanup_interval_secs: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Whether the keep-alive ping job issues requests
    pub ping_enabled: bool,
    /// URL the ping job requests; empty disables it
    pub ping_url: String,
    /// Minutes between ping attempts
    pub ping_interval_minutes: u64,
    /// Delay before the first ping attempt, in seconds
    pub ping_initial_delay_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CAPACITY,
            cache_ttl_secs: DEFAULT_TTL.as_secs(),
            cleanup_interval_secs: 1,
            server_port: 8080,
            ping_enabled: false,
            ping_url: String::new(),
            ping_interval_minutes: 5,
            ping_initial_delay_secs: 10,
        }
    }
}

impl Config {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(Environment::with_prefix(ENV_PREFIX))
    }

    /// Loads configuration from the given environment source.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        let config: Self = ::config::Config::builder()
            .add_source(environment.try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Rejects values the service cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_capacity == 0 {
            return Err(ConfigError::invalid(
                "cache_capacity",
                "must be greater than zero",
            ));
        }
        if self.cache_ttl_secs == 0 {
            return Err(ConfigError::invalid(
                "cache_ttl_secs",
                "must be greater than zero",
            ));
        }
        if self.cleanup_interval_secs == 0 {
            return Err(ConfigError::invalid(
                "cleanup_interval_secs",
                "must be greater than zero",
            ));
        }
        if self.ping_interval_minutes == 0 {
            return Err(ConfigError::invalid(
                "ping_interval_minutes",
                "must be greater than zero",
            ));
        }
        if self.ping_interval_minutes > MAX_PING_INTERVAL_MINUTES {
            return Err(ConfigError::invalid(
                "ping_interval_minutes",
                format!("must be at most {}", MAX_PING_INTERVAL_MINUTES),
            ));
        }
        if self.ping_initial_delay_secs > MAX_PING_INITIAL_DELAY_SECS {
            return Err(ConfigError::invalid(
                "ping_initial_delay_secs",
                format!("must be at most {}", MAX_PING_INITIAL_DELAY_SECS),
            ));
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }

    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.ping_interval_minutes.saturating_mul(60))
    }

    pub fn ping_initial_delay(&self) -> Duration {
        Duration::from_secs(self.ping_initial_delay_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheStore;

    fn environment(vars: &[(&str, &str)]) -> Environment {
        let source: ::config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX).source(Some(source))
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cache_capacity, 1000);
        assert_eq!(config.cache_ttl_secs, 600);
        assert_eq!(config.cleanup_interval_secs, 1);
        assert_eq!(config.server_port, 8080);
        assert!(!config.ping_enabled);
        assert!(config.ping_url.is_empty());
        assert_eq!(config.ping_interval_minutes, 5);
        assert_eq!(config.ping_initial_delay_secs, 10);
    }

    #[test]
    fn test_config_load_without_overrides() {
        let config = Config::load(environment(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_load_with_overrides() {
        let config = Config::load(environment(&[
            ("HELLO_CACHE_CACHE_CAPACITY", "50"),
            ("HELLO_CACHE_CACHE_TTL_SECS", "30"),
            ("HELLO_CACHE_SERVER_PORT", "9000"),
            ("HELLO_CACHE_PING_ENABLED", "true"),
            ("HELLO_CACHE_PING_URL", "https://example.com/health"),
            ("HELLO_CACHE_PING_INTERVAL_MINUTES", "2"),
        ]))
        .unwrap();

        assert_eq!(config.cache_capacity, 50);
        assert_eq!(config.cache_ttl(), Duration::from_secs(30));
        assert_eq!(config.server_port, 9000);
        assert!(config.ping_enabled);
        assert_eq!(config.ping_url, "https://example.com/health");
        assert_eq!(config.ping_interval(), Duration::from_secs(120));
        assert_eq!(config.cleanup_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_config_ignores_unprefixed_variables() {
        let config = Config::load(environment(&[("CACHE_CAPACITY", "7")])).unwrap();
        assert_eq!(config.cache_capacity, 1000);
    }

    #[test]
    fn test_config_rejects_zero_capacity() {
        let result = Config::load(environment(&[("HELLO_CACHE_CACHE_CAPACITY", "0")]));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                key: "cache_capacity",
                ..
            })
        ));
    }

    #[test]
    fn test_config_rejects_zero_ttl() {
        let config = Config {
            cache_ttl_secs: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_accepts_maximal_ttl() {
        let config = Config::load(environment(&[(
            "HELLO_CACHE_CACHE_TTL_SECS",
            "9223372036854775807",
        )]))
        .unwrap();

        let cache: CacheStore<i32> = CacheStore::new(config.cache_capacity, config.cache_ttl());
        cache.put("k", 1).unwrap();
        assert_eq!(cache.get("k"), Some(1));
    }

    #[test]
    fn test_config_rejects_oversized_ping_schedule() {
        let result = Config::load(environment(&[(
            "HELLO_CACHE_PING_INTERVAL_MINUTES",
            "9223372036854775807",
        )]));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                key: "ping_interval_minutes",
                ..
            })
        ));

        let result = Config::load(environment(&[(
            "HELLO_CACHE_PING_INITIAL_DELAY_SECS",
            "9223372036854775807",
        )]));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                key: "ping_initial_delay_secs",
                ..
            })
        ));
    }

    #[test]
    fn test_config_ping_interval_saturates() {
        let config = Config {
            ping_interval_minutes: u64::MAX,
            ..Config::default()
        };
        assert_eq!(config.ping_interval(), Duration::from_secs(u64::MAX));
    }

    #[test]
    fn test_config_rejects_unparsable_value() {
        let result = Config::load(environment(&[("HELLO_CACHE_SERVER_PORT", "not-a-port")]));
        assert!(matches!(result, Err(ConfigError::Build(_))));
    }
}
