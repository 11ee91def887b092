//! CLI error type.

use thiserror::Error;

use market_storefront::api::ApiError;
use market_storefront::{AuthError, ConfigError};

/// Errors that end a command with a non-zero exit code.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Backend client error: {0}")]
    Api(#[from] ApiError),

    #[error("Login failed: {0}")]
    Auth(#[from] AuthError),

    /// `seller-login` run without `--email`.
    #[error("--email is required for this command")]
    MissingEmail,

    #[error("MARKET_PASSWORD must be set when --email is given")]
    MissingPassword,

    #[error("Product not found: {0}")]
    ProductNotFound(String),
}
