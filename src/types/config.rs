//! Configuration for Togglr.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::{TogglrError, TogglrResult};

/// Main configuration for the Togglr client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Base URL of the flag service.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key sent with every request (required).
    #[serde(default)]
    pub api_key: String,

    /// Per-call timeout (in milliseconds), covering every retry.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Number of retries after the first attempt.
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Maximum number of pooled connections for the transport.
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,

    /// Backoff settings.
    #[serde(default)]
    pub backoff: BackoffConfig,

    /// Cache settings.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_base_url() -> String {
    "http://localhost:8090".to_string()
}

fn default_timeout_ms() -> u64 {
    800
}

fn default_retries() -> u32 {
    2
}

fn default_max_connections() -> usize {
    100
}

/// Exponential backoff settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackoffConfig {
    /// Delay before the first retry (in milliseconds).
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Upper bound on any single delay (in milliseconds).
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Growth factor applied per additional retry.
    #[serde(default = "default_factor")]
    pub factor: f64,
}

impl BackoffConfig {
    /// Delay before the first retry.
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    /// Upper bound on any single delay.
    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            factor: default_factor(),
        }
    }
}

fn default_base_delay_ms() -> u64 {
    100
}

fn default_max_delay_ms() -> u64 {
    2000
}

fn default_factor() -> f64 {
    2.0
}

/// TTL/LRU cache settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheConfig {
    /// Enabled.
    #[serde(default)]
    pub enabled: bool,

    /// Maximum number of entries.
    #[serde(default = "default_cache_size")]
    pub size: usize,

    /// Entry time to live (in milliseconds).
    #[serde(default = "default_cache_ttl_ms")]
    pub ttl_ms: u64,
}

impl CacheConfig {
    /// Entry time to live.
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            size: default_cache_size(),
            ttl_ms: default_cache_ttl_ms(),
        }
    }
}

fn default_cache_size() -> usize {
    100
}

fn default_cache_ttl_ms() -> u64 {
    5000
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (text, json).
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Config {
    /// Creates the default configuration for the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: default_base_url(),
            api_key: api_key.into(),
            timeout_ms: default_timeout_ms(),
            retries: default_retries(),
            max_connections: default_max_connections(),
            backoff: BackoffConfig::default(),
            cache: CacheConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Loads configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> TogglrResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Saves configuration to a TOML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> TogglrResult<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Per-call timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the per-call timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = duration_to_millis(timeout);
        self
    }

    /// Sets the number of retries.
    #[must_use]
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Sets the backoff policy.
    #[must_use]
    pub fn with_backoff(mut self, base_delay: Duration, max_delay: Duration, factor: f64) -> Self {
        self.backoff = BackoffConfig {
            base_delay_ms: duration_to_millis(base_delay),
            max_delay_ms: duration_to_millis(max_delay),
            factor,
        };
        self
    }

    /// Enables caching with the given size and TTL.
    #[must_use]
    pub fn with_cache(mut self, size: usize, ttl: Duration) -> Self {
        self.cache = CacheConfig {
            enabled: true,
            size,
            ttl_ms: duration_to_millis(ttl),
        };
        self
    }

    /// Sets the maximum number of pooled connections.
    #[must_use]
    pub fn with_max_connections(mut self, max_connections: usize) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Checks the settings the client cannot work without.
    pub fn validate(&self) -> TogglrResult<()> {
        if self.api_key.trim().is_empty() {
            return Err(TogglrError::config("api_key is required"));
        }
        if self.base_url.trim().is_empty() {
            return Err(TogglrError::config("base_url must not be empty"));
        }
        if self.timeout_ms == 0 {
            return Err(TogglrError::config("timeout must be greater than zero"));
        }
        if !self.backoff.factor.is_finite() {
            return Err(TogglrError::config("backoff factor must be a finite number"));
        }
        if self.cache.enabled && self.cache.size == 0 {
            return Err(TogglrError::config(
                "cache size must be greater than zero when the cache is enabled",
            ));
        }
        Ok(())
    }
}

fn duration_to_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
