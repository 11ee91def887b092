//! Authentication error types.

use thiserror::Error;

/// Shown when the backend rejects a login without saying why.
pub const LOGIN_FALLBACK_MESSAGE: &str = "Something went wrong. Please try again.";

/// Errors that can occur while submitting a login form.
///
/// `Display` is the text the form shows under its inputs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] market_core::EmailError),

    /// Password field left empty.
    #[error("password cannot be empty")]
    EmptyPassword,

    /// Backend refused the login (wrong credentials, transport failure, ...).
    #[error("{0}")]
    Rejected(String),
}

impl AuthError {
    /// Rejection carrying the server message, or the generic fallback.
    #[must_use]
    pub fn rejected(message: Option<&str>) -> Self {
        let message = message
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(LOGIN_FALLBACK_MESSAGE);
        Self::Rejected(message.to_string())
    }
}
