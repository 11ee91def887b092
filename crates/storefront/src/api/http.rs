//! `reqwest` implementation of [`StoreApi`].

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use market_core::{CartItems, Email};

use super::types::{CartUpdateRequest, LoginRequest, error_body_message};
use super::{
    ApiError, LoginResponse, ProductListResponse, SellerAuthResponse, StatusResponse, StoreApi,
    UserAuthResponse, paths,
};
use crate::config::StorefrontConfig;

/// Longest slice of a response body written to the logs.
const LOGGED_BODY_CHARS: usize = 500;

/// HTTP client for the store backend.
///
/// Cheap to clone; clones share the connection pool and the cookie jar.
#[derive(Clone)]
pub struct HttpStoreApi {
    inner: Arc<HttpStoreApiInner>,
}

struct HttpStoreApiInner {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpStoreApi {
    /// Create a new client with its own cookie store.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the TLS backend cannot be initialized.
    pub fn new(config: &StorefrontConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(HttpStoreApiInner {
                client,
                base_url: config.backend_url.clone(),
            }),
        })
    }

    /// Base URL every path is resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path.trim_start_matches('/'))?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        self.execute(self.inner.client.get(url)).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        self.execute(self.inner.client.post(url).json(body)).await
    }

    /// Send a request and decode its JSON body.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            log_failed_status(status, &body);
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_body_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %truncate(&body),
                "Failed to parse backend response"
            );
            ApiError::Parse(e)
        })
    }
}

fn log_failed_status(status: StatusCode, body: &str) {
    if status.is_server_error() {
        tracing::error!(
            status = %status,
            body = %truncate(body),
            "Backend returned server error"
        );
    } else {
        tracing::warn!(
            status = %status,
            body = %truncate(body),
            "Backend rejected request"
        );
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(LOGGED_BODY_CHARS).collect()
}

#[async_trait]
impl StoreApi for HttpStoreApi {
    #[instrument(skip(self))]
    async fn seller_is_auth(&self) -> Result<SellerAuthResponse, ApiError> {
        let resp: SellerAuthResponse = self.get(paths::SELLER_IS_AUTH).await?;
        debug!(success = resp.success, "Seller session checked");
        Ok(resp)
    }

    #[instrument(skip(self, password), fields(email = %email))]
    async fn seller_login(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<LoginResponse, ApiError> {
        let body = LoginRequest {
            email: email.as_str(),
            password: password.expose_secret(),
        };
        self.post(paths::SELLER_LOGIN, &body).await
    }

    #[instrument(skip(self))]
    async fn seller_logout(&self) -> Result<StatusResponse, ApiError> {
        self.get(paths::SELLER_LOGOUT).await
    }

    #[instrument(skip(self))]
    async fn user_is_auth(&self) -> Result<UserAuthResponse, ApiError> {
        let resp: UserAuthResponse = self.get(paths::USER_IS_AUTH).await?;
        debug!(success = resp.success, "Customer session checked");
        Ok(resp)
    }

    #[instrument(skip(self, password), fields(email = %email))]
    async fn user_login(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<LoginResponse, ApiError> {
        let body = LoginRequest {
            email: email.as_str(),
            password: password.expose_secret(),
        };
        self.post(paths::USER_LOGIN, &body).await
    }

    #[instrument(skip(self))]
    async fn user_logout(&self) -> Result<StatusResponse, ApiError> {
        self.get(paths::USER_LOGOUT).await
    }

    #[instrument(skip(self))]
    async fn list_products(&self) -> Result<ProductListResponse, ApiError> {
        let resp: ProductListResponse = self.get(paths::PRODUCT_LIST).await?;
        debug!(
            count = resp.products.as_ref().map_or(0, Vec::len),
            "Product list fetched"
        );
        Ok(resp)
    }

    #[instrument(skip(self, items), fields(entries = items.len()))]
    async fn update_cart(&self, items: &CartItems) -> Result<StatusResponse, ApiError> {
        self.post(paths::CART_UPDATE, &CartUpdateRequest { cart_items: items })
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> HttpStoreApi {
        let config = StorefrontConfig::new(Url::parse(base).unwrap());
        HttpStoreApi::new(&config).unwrap()
    }

    #[test]
    fn test_endpoint_under_base_path() {
        let api = client("https://api.market.test/v2");
        assert_eq!(
            api.endpoint(paths::CART_UPDATE).unwrap().as_str(),
            "https://api.market.test/v2/api/cart/update"
        );
    }

    #[test]
    fn test_endpoint_at_root() {
        let api = client("http://localhost:4000");
        assert_eq!(
            api.endpoint(paths::SELLER_IS_AUTH).unwrap().as_str(),
            "http://localhost:4000/api/seller/is-auth"
        );
    }

    #[test]
    fn test_truncate_long_body() {
        let body = "x".repeat(2000);
        assert_eq!(truncate(&body).len(), LOGGED_BODY_CHARS);
        assert_eq!(truncate("short"), "short");
    }
}
