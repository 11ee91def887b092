//! Wire types for backend requests and responses.
//!
//! Every response carries a `success` flag. Logical failures come back as
//! `success: false` with a human-readable `message`.

use serde::{Deserialize, Serialize};

use market_core::{CartItems, Product};

use crate::models::User;

/// Response of `GET /api/seller/is-auth`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellerAuthResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Response of `GET /api/user/is-auth`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserAuthResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Response of `GET /api/product/list`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductListResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<Product>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Response of login calls.
///
/// Seller login bodies are opaque; `success` is only treated as a failure
/// when it is explicitly `false`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

impl LoginResponse {
    /// Whether the backend accepted the credentials.
    #[must_use]
    pub fn accepted(&self) -> bool {
        self.success != Some(false)
    }
}

/// Generic `{ success, message }` response (cart persist, logout).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Body of `POST /api/seller/login` and `POST /api/user/login`.
#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Body of `POST /api/cart/update`.
#[derive(Debug, Serialize)]
pub(crate) struct CartUpdateRequest<'a> {
    #[serde(rename = "cartItems")]
    pub cart_items: &'a CartItems,
}

/// Extract the `message` field from an error body, if it is JSON.
pub(crate) fn error_body_message(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: Option<String>,
    }

    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use market_core::ProductId;

    use super::*;

    #[test]
    fn test_user_auth_negative() {
        let resp: UserAuthResponse =
            serde_json::from_value(json!({"success": false, "message": "no session"})).unwrap();
        assert!(!resp.success);
        assert!(resp.user.is_none());
        assert_eq!(resp.message.as_deref(), Some("no session"));
    }

    #[test]
    fn test_product_list() {
        let resp: ProductListResponse = serde_json::from_value(json!({
            "success": true,
            "products": [{"_id": "p1", "name": "Apples", "price": 2, "offerPrice": 1.5}]
        }))
        .unwrap();
        assert_eq!(resp.products.unwrap()[0].id, ProductId::new("p1"));
    }

    #[test]
    fn test_login_response_accepted() {
        let opaque: LoginResponse = serde_json::from_value(json!({"token": "abc"})).unwrap();
        assert!(opaque.accepted());

        let rejected: LoginResponse =
            serde_json::from_value(json!({"success": false, "message": "Invalid"})).unwrap();
        assert!(!rejected.accepted());
    }

    #[test]
    fn test_cart_update_request_shape() {
        let items: CartItems = [(ProductId::new("p1"), 2_i64)].into_iter().collect();
        let body = serde_json::to_value(CartUpdateRequest { cart_items: &items }).unwrap();
        assert_eq!(body, json!({"cartItems": {"p1": 2}}));
    }

    #[test]
    fn test_error_body_message() {
        assert_eq!(
            error_body_message(r#"{"success":false,"message":"Invalid credentials"}"#),
            Some("Invalid credentials".to_string())
        );
        assert_eq!(error_body_message(r#"{"message":"  "}"#), None);
        assert_eq!(error_body_message("Bad Gateway"), None);
    }
}
