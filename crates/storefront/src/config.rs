//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `STOREFRONT_DATA_DIR` - Directory for persisted cart/checkout state (default: .corner-shop)
//! - `STOREFRONT_CATALOG_PATH` - JSON catalog replacing the built-in sample data
//! - `STOREFRONT_SUBMIT_DELAY_MS` - Simulated checkout latency (default: 1500)
//! - `STOREFRONT_LOOKUP_DELAY_MS` - Simulated order lookup latency (default: 1000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate, 0.0-1.0 (default: 1.0)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_DATA_DIR: &str = ".corner-shop";
const DEFAULT_SUBMIT_DELAY_MS: &str = "1500";
const DEFAULT_LOOKUP_DELAY_MS: &str = "1000";
const DEFAULT_SENTRY_SAMPLE_RATE: &str = "1.0";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Directory backing the durable key-value storage
    pub data_dir: PathBuf,
    /// Optional external catalog fixture
    pub catalog_path: Option<PathBuf>,
    /// Artificial delay before an order is confirmed
    pub submit_delay: Duration,
    /// Artificial delay before an order lookup resolves
    pub lookup_delay: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development")
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            catalog_path: None,
            submit_delay: Duration::from_millis(1500),
            lookup_delay: Duration::from_millis(1000),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Lookup(lookup);

        let data_dir = PathBuf::from(env.or_default("STOREFRONT_DATA_DIR", DEFAULT_DATA_DIR));
        let catalog_path = env.optional("STOREFRONT_CATALOG_PATH").map(PathBuf::from);
        let submit_delay = env.millis("STOREFRONT_SUBMIT_DELAY_MS", DEFAULT_SUBMIT_DELAY_MS)?;
        let lookup_delay = env.millis("STOREFRONT_LOOKUP_DELAY_MS", DEFAULT_LOOKUP_DELAY_MS)?;

        let sentry_sample_rate = env
            .or_default("SENTRY_SAMPLE_RATE", DEFAULT_SENTRY_SAMPLE_RATE)
            .parse::<f32>()
            .map_err(|e| ConfigError::InvalidEnvVar("SENTRY_SAMPLE_RATE".to_string(), e.to_string()))?;
        if !(0.0..=1.0).contains(&sentry_sample_rate) {
            return Err(ConfigError::InvalidEnvVar(
                "SENTRY_SAMPLE_RATE".to_string(),
                format!("must be between 0.0 and 1.0 (got {sentry_sample_rate})"),
            ));
        }

        Ok(Self {
            data_dir,
            catalog_path,
            submit_delay,
            lookup_delay,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
        })
    }

    /// Same configuration with both simulated delays removed.
    #[must_use]
    pub fn without_delays(mut self) -> Self {
        self.submit_delay = Duration::ZERO;
        self.lookup_delay = Duration::ZERO;
        self
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Lookup<F>(F);

impl<F: Fn(&str) -> Option<String>> Lookup<F> {
    /// Get an optional variable, treating empty values as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Get a millisecond duration.
    fn millis(&self, key: &str, default: &str) -> Result<Duration, ConfigError> {
        self.or_default(key, default)
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }
}
