//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `MARKET_BACKEND_URL` - Base URL of the store backend (e.g., `https://api.market.test`)
//!
//! ## Optional
//! - `MARKET_REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 10)
//! - `MARKET_SELLER_LANDING` - Route opened after a seller login (default: `/seller`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SELLER_LANDING: &str = "/seller";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront state configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Backend base URL, always ending in `/`
    pub backend_url: Url,
    /// Timeout applied to every backend request
    pub request_timeout: Duration,
    /// Route a seller is sent to after logging in
    pub seller_landing: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl StorefrontConfig {
    /// Configuration with defaults for everything but the backend URL.
    #[must_use]
    pub fn new(backend_url: Url) -> Self {
        Self {
            backend_url: with_trailing_slash(backend_url),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            seller_landing: DEFAULT_SELLER_LANDING.to_string(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let backend_url = parse_backend_url(&get_required_env("MARKET_BACKEND_URL")?)?;
        let timeout_secs = get_env_or_default(
            "MARKET_REQUEST_TIMEOUT_SECS",
            &DEFAULT_REQUEST_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("MARKET_REQUEST_TIMEOUT_SECS".to_string(), e.to_string())
        })?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "MARKET_REQUEST_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let seller_landing = get_env_or_default("MARKET_SELLER_LANDING", DEFAULT_SELLER_LANDING);
        if !seller_landing.starts_with('/') {
            return Err(ConfigError::InvalidEnvVar(
                "MARKET_SELLER_LANDING".to_string(),
                "must be an absolute route starting with '/'".to_string(),
            ));
        }

        Ok(Self {
            backend_url,
            request_timeout: Duration::from_secs(timeout_secs),
            seller_landing,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }
}

/// Parse and validate the backend base URL.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` unless the value is an `http` or
/// `https` URL with a host.
pub fn parse_backend_url(value: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar("MARKET_BACKEND_URL".to_string(), reason);

    let url = Url::parse(value.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("must have a host".to_string()));
    }

    Ok(with_trailing_slash(url))
}

/// Make relative joins append to the base path instead of replacing its
/// last segment.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
