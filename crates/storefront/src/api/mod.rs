//! Store backend API.
//!
//! # Architecture
//!
//! - [`StoreApi`] is the seam between the state container and the backend;
//!   the container only ever talks to `Arc<dyn StoreApi>`
//! - [`HttpStoreApi`] implements it over `reqwest` with a cookie store, so
//!   the session cookie set by a login is sent on every later call
//! - The backend is the source of truth for sessions and persisted carts
//!
//! # Endpoints
//!
//! | Call | Method | Path |
//! |---|---|---|
//! | seller auth check | GET | `/api/seller/is-auth` |
//! | seller login | POST | `/api/seller/login` |
//! | seller logout | GET | `/api/seller/logout` |
//! | customer auth check | GET | `/api/user/is-auth` |
//! | customer login | POST | `/api/user/login` |
//! | customer logout | GET | `/api/user/logout` |
//! | catalog listing | GET | `/api/product/list` |
//! | cart persist | POST | `/api/cart/update` |

mod http;
pub mod types;

#[cfg(test)]
pub(crate) mod fake;

pub use http::HttpStoreApi;
pub use types::*;

use async_trait::async_trait;
use secrecy::SecretString;
use thiserror::Error;

use market_core::{CartItems, Email};

/// Backend paths, relative to the configured base URL.
pub mod paths {
    pub const SELLER_IS_AUTH: &str = "/api/seller/is-auth";
    pub const SELLER_LOGIN: &str = "/api/seller/login";
    pub const SELLER_LOGOUT: &str = "/api/seller/logout";
    pub const USER_IS_AUTH: &str = "/api/user/is-auth";
    pub const USER_LOGIN: &str = "/api/user/login";
    pub const USER_LOGOUT: &str = "/api/user/logout";
    pub const PRODUCT_LIST: &str = "/api/product/list";
    pub const CART_UPDATE: &str = "/api/cart/update";
}

/// Errors that can occur when talking to the store backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint URL could not be built from the base URL.
    #[error("Invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),

    /// Backend answered with a non-success status code.
    #[error("Request failed with status code {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// `message` field of the error body, if present.
        message: Option<String>,
    },
}

impl ApiError {
    /// Text suitable for a user-visible notification.
    ///
    /// Prefers the message the backend put in the error body.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Status {
                message: Some(message),
                ..
            } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Message the backend attached to a rejected request, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// Operations the storefront needs from the backend.
///
/// Every call is credentialed: implementations must carry the session
/// cookie between calls.
#[async_trait]
pub trait StoreApi: Send + Sync {
    /// Whether the current browser session belongs to a seller.
    async fn seller_is_auth(&self) -> Result<SellerAuthResponse, ApiError>;

    /// Log a seller in.
    async fn seller_login(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<LoginResponse, ApiError>;

    /// End the seller session.
    async fn seller_logout(&self) -> Result<StatusResponse, ApiError>;

    /// Current customer and their persisted cart.
    async fn user_is_auth(&self) -> Result<UserAuthResponse, ApiError>;

    /// Log a customer in.
    async fn user_login(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<LoginResponse, ApiError>;

    /// End the customer session.
    async fn user_logout(&self) -> Result<StatusResponse, ApiError>;

    /// Full product catalog.
    async fn list_products(&self) -> Result<ProductListResponse, ApiError>;

    /// Replace the customer's persisted cart.
    async fn update_cart(&self, items: &CartItems) -> Result<StatusResponse, ApiError>;
}
