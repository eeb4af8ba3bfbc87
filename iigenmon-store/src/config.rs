//! Configuration management.
//!
//! Everything is optional; a missing file means defaults.

use crate::error::StoreError;
use crate::persistence::{default_cache_dir, default_config_path, load_json};
use iigenmon_fetch::RetryPolicy;
use iigenmon_fetch::host::http::{DEFAULT_API_BASE, DEFAULT_TIMEOUT_SECS};
use iigenmon_fetch::retry::{DEFAULT_BACKOFF_SECS, DEFAULT_MAX_ATTEMPTS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Where cached responses are kept.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    /// Toolbox endpoint.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// HTTP timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Retry settings.
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Retry settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Usage attempts per run.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Seconds to wait after a failed attempt.
    #[serde(default = "default_backoff_secs")]
    pub backoff_secs: u64,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_backoff_secs() -> u64 {
    DEFAULT_BACKOFF_SECS
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_secs: default_backoff_secs(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: None,
            api_base: default_api_base(),
            timeout_secs: default_timeout_secs(),
            retry: RetryConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the default path.
    ///
    /// A broken file is logged and ignored; the reporter still runs on
    /// defaults.
    pub fn load() -> Self {
        let path = default_config_path();
        Self::load_from(&path).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "Ignoring invalid configuration");
            Self::default()
        })
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let config: Config = load_json(path)?;
        if config.timeout_secs == 0 {
            return Err(StoreError::Config("timeout_secs must be positive".into()));
        }

        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Cache directory, falling back to the platform default.
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(default_cache_dir)
    }

    /// HTTP timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Retry policy for the controller.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry.max_attempts,
            Duration::from_secs(self.retry.backoff_secs),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_default() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load_from(&temp_dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.retry_policy(), RetryPolicy::default());
        assert_eq!(config.cache_dir(), default_cache_dir());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{"cache_dir": "/var/tmp/ii", "retry": {"backoff_secs": 5}}"#)
            .unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.cache_dir(), PathBuf::from("/var/tmp/ii"));
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry_policy().backoff, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, "timeout_secs = 3").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(StoreError::Serialization(_))
        ));

        std::fs::write(&path, r#"{"timeout_secs": 0}"#).unwrap();
        assert!(matches!(Config::load_from(&path), Err(StoreError::Config(_))));
    }
}
