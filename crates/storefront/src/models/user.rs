//! User domain types.
//!
//! The backend owns the customer document; the storefront only reads a few
//! fields and keeps the rest untouched in `extra`.

use serde::{Deserialize, Serialize};

use market_core::{CartItems, UserId};

/// An authenticated customer as returned by `GET /api/user/is-auth`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Backend document ID.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Email address as stored by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Cart persisted for this customer.
    #[serde(alias = "cartItems", default, skip_serializing_if = "Option::is_none")]
    pub cart: Option<CartItems>,
    /// Fields the storefront does not interpret.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl User {
    /// Name to greet the customer with, falling back to the email address.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("customer")
    }
}
