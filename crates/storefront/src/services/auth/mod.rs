//! Login submission.
//!
//! Validates form input locally, then hands the credentials to the backend.
//! Session state changes are applied by [`crate::state::AppContext`]; this
//! service only decides whether a login succeeded and what to tell the form.

mod error;

pub use error::{AuthError, LOGIN_FALLBACK_MESSAGE};

use secrecy::{ExposeSecret, SecretString};
use tracing::{info, instrument, warn};

use market_core::Email;

use crate::api::{LoginResponse, StoreApi};
use crate::models::User;

/// Which login form was submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Principal {
    Customer,
    Seller,
}

/// Email and password from a login form.
///
/// `Debug` never prints the password.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: Email,
    pub password: SecretString,
}

impl Credentials {
    /// Validate raw form input.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` for a malformed email and
    /// `AuthError::EmptyPassword` when the password is empty.
    pub fn new(email: &str, password: impl Into<String>) -> Result<Self, AuthError> {
        let email = Email::parse(email)?;
        let password = SecretString::from(password.into());
        if password.expose_secret().is_empty() {
            return Err(AuthError::EmptyPassword);
        }
        Ok(Self { email, password })
    }
}

/// Authentication service.
pub struct AuthService<'a> {
    api: &'a dyn StoreApi,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(api: &'a dyn StoreApi) -> Self {
        Self { api }
    }

    /// Submit credentials for `principal`.
    ///
    /// On success returns the customer record the backend sent back, if any
    /// (seller logins never carry one).
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Rejected` with the server message, or
    /// [`LOGIN_FALLBACK_MESSAGE`] when the backend gave none.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(
        &self,
        principal: Principal,
        credentials: &Credentials,
    ) -> Result<Option<User>, AuthError> {
        let result = match principal {
            Principal::Customer => {
                self.api
                    .user_login(&credentials.email, &credentials.password)
                    .await
            }
            Principal::Seller => {
                self.api
                    .seller_login(&credentials.email, &credentials.password)
                    .await
            }
        };

        match result {
            Ok(response) => accept(principal, response),
            Err(e) => {
                warn!(error = %e, ?principal, "Login request failed");
                Err(AuthError::rejected(e.server_message()))
            }
        }
    }
}

fn accept(principal: Principal, response: LoginResponse) -> Result<Option<User>, AuthError> {
    if !response.accepted() {
        warn!(?principal, "Login rejected by backend");
        return Err(AuthError::rejected(response.message.as_deref()));
    }
    info!(?principal, "Login successful");
    Ok(response.user)
}
