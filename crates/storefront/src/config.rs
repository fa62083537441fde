//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 5000)
//! - `STOREFRONT_DATA_DIR` - Directory holding `database.json` and `images/` (default: ./data)
//! - `STOREFRONT_SESSION_TTL_HOURS` - Bearer session lifetime (default: 168)
//! - `STOREFRONT_AUTH_RATE_LIMIT_PER_MINUTE` - Requests per client IP on `/api/auth/*` (default: 10)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance trace sample rate (default: 0.1)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory holding the store file and uploaded images
    pub data_dir: PathBuf,
    /// How long a bearer session stays valid
    pub session_ttl: Duration,
    /// Auth endpoint requests allowed per client IP per minute
    pub auth_rate_limit_per_minute: u32,
    /// Error tracking configuration
    pub sentry: SentryConfig,
}

/// Sentry configuration.
#[derive(Debug, Clone)]
pub struct SentryConfig {
    /// Sentry DSN; error tracking is off without one
    pub dsn: Option<SecretString>,
    pub environment: Option<String>,
    pub sample_rate: f32,
    pub traces_sample_rate: f32,
}

impl Default for SentryConfig {
    fn default() -> Self {
        Self {
            dsn: None,
            environment: None,
            sample_rate: 1.0,
            traces_sample_rate: 0.1,
        }
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 5000,
            data_dir: PathBuf::from("./data"),
            session_ttl: Duration::from_secs(168 * 3600),
            auth_rate_limit_per_minute: 10,
            sentry: SentryConfig::default(),
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
    /// Returns `ConfigError` if a variable is set to a value that cannot be
    /// parsed or is out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(lookup);

        let host = env.parse_or("STOREFRONT_HOST", "127.0.0.1")?;
        let port = env.parse_or("STOREFRONT_PORT", "5000")?;
        let data_dir = PathBuf::from(env.get_or("STOREFRONT_DATA_DIR", "./data"));

        let ttl_hours: u64 = env.parse_or("STOREFRONT_SESSION_TTL_HOURS", "168")?;
        if ttl_hours == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "STOREFRONT_SESSION_TTL_HOURS".to_string(),
                "must be greater than 0".to_string(),
            ));
        }

        let auth_rate_limit_per_minute: u32 =
            env.parse_or("STOREFRONT_AUTH_RATE_LIMIT_PER_MINUTE", "10")?;
        if auth_rate_limit_per_minute == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "STOREFRONT_AUTH_RATE_LIMIT_PER_MINUTE".to_string(),
                "must be greater than 0".to_string(),
            ));
        }

        let sentry = SentryConfig {
            dsn: env.get("SENTRY_DSN").map(SecretString::from),
            environment: env.get("SENTRY_ENVIRONMENT"),
            sample_rate: env.parse_rate("SENTRY_SAMPLE_RATE", "1.0")?,
            traces_sample_rate: env.parse_rate("SENTRY_TRACES_SAMPLE_RATE", "0.1")?,
        };

        Ok(Self {
            host,
            port,
            data_dir,
            session_ttl: Duration::from_secs(ttl_hours.saturating_mul(3600)),
            auth_rate_limit_per_minute,
            sentry,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Get an optional variable; empty values count as unset.
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    fn parse_or<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get_or(key, default)
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }

    /// Parse a sample rate in `0.0..=1.0`.
    fn parse_rate(&self, key: &str, default: &str) -> Result<f32, ConfigError> {
        let rate: f32 = self.parse_or(key, default)?;
        if (0.0..=1.0).contains(&rate) {
            Ok(rate)
        } else {
            Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("{rate} is outside 0.0..=1.0"),
            ))
        }
    }
}
