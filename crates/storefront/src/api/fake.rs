//! Scripted in-memory [`StoreApi`] for unit tests.

#![allow(clippy::unwrap_used)]

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::SecretString;

use market_core::{CartItems, Email};

use super::{
    ApiError, LoginResponse, ProductListResponse, SellerAuthResponse, StatusResponse, StoreApi,
    UserAuthResponse,
};

/// Canned outcome of a fake call.
#[derive(Debug, Clone)]
pub enum Reply<T> {
    Ok(T),
    /// Non-success HTTP status with an optional body message.
    Fail(u16, Option<String>),
}

impl<T: Clone> Reply<T> {
    fn get(&self) -> Result<T, ApiError> {
        match self {
            Self::Ok(value) => Ok(value.clone()),
            Self::Fail(status, message) => Err(ApiError::Status {
                status: *status,
                message: message.clone(),
            }),
        }
    }
}

/// Fake backend. Defaults to "nobody is logged in, empty catalog".
pub struct FakeStoreApi {
    seller_auth: Mutex<Reply<SellerAuthResponse>>,
    seller_login: Mutex<Reply<LoginResponse>>,
    user_auth: Mutex<Reply<UserAuthResponse>>,
    user_login: Mutex<Reply<LoginResponse>>,
    products: Mutex<Reply<ProductListResponse>>,
    cart_update: Mutex<Reply<StatusResponse>>,
    persist_delay: Mutex<Duration>,
    persisted: Mutex<Vec<CartItems>>,
    calls: Mutex<Vec<&'static str>>,
}

impl Default for FakeStoreApi {
    fn default() -> Self {
        let ok = StatusResponse {
            success: true,
            message: None,
        };
        Self {
            seller_auth: Mutex::new(Reply::Ok(SellerAuthResponse::default())),
            seller_login: Mutex::new(Reply::Ok(LoginResponse::default())),
            user_auth: Mutex::new(Reply::Ok(UserAuthResponse {
                success: false,
                user: None,
                message: Some("Not Authorized".to_string()),
            })),
            user_login: Mutex::new(Reply::Ok(LoginResponse::default())),
            products: Mutex::new(Reply::Ok(ProductListResponse {
                success: true,
                products: Some(Vec::new()),
                message: None,
            })),
            cart_update: Mutex::new(Reply::Ok(ok)),
            persist_delay: Mutex::new(Duration::ZERO),
            persisted: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl FakeStoreApi {
    pub fn set_seller_auth(&self, reply: Reply<SellerAuthResponse>) {
        *self.seller_auth.lock().unwrap() = reply;
    }

    pub fn set_seller_login(&self, reply: Reply<LoginResponse>) {
        *self.seller_login.lock().unwrap() = reply;
    }

    pub fn set_user_auth(&self, reply: Reply<UserAuthResponse>) {
        *self.user_auth.lock().unwrap() = reply;
    }

    pub fn set_user_login(&self, reply: Reply<LoginResponse>) {
        *self.user_login.lock().unwrap() = reply;
    }

    pub fn set_products(&self, reply: Reply<ProductListResponse>) {
        *self.products.lock().unwrap() = reply;
    }

    pub fn set_cart_update(&self, reply: Reply<StatusResponse>) {
        *self.cart_update.lock().unwrap() = reply;
    }

    pub fn set_persist_delay(&self, delay: Duration) {
        *self.persist_delay.lock().unwrap() = delay;
    }

    /// Every cart payload received, in arrival order.
    pub fn persisted(&self) -> Vec<CartItems> {
        self.persisted.lock().unwrap().clone()
    }

    /// Names of the calls made, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl StoreApi for FakeStoreApi {
    async fn seller_is_auth(&self) -> Result<SellerAuthResponse, ApiError> {
        self.record("seller_is_auth");
        self.seller_auth.lock().unwrap().get()
    }

    async fn seller_login(
        &self,
        _email: &Email,
        _password: &SecretString,
    ) -> Result<LoginResponse, ApiError> {
        self.record("seller_login");
        self.seller_login.lock().unwrap().get()
    }

    async fn seller_logout(&self) -> Result<StatusResponse, ApiError> {
        self.record("seller_logout");
        Ok(StatusResponse {
            success: true,
            message: Some("Logged Out".to_string()),
        })
    }

    async fn user_is_auth(&self) -> Result<UserAuthResponse, ApiError> {
        self.record("user_is_auth");
        self.user_auth.lock().unwrap().get()
    }

    async fn user_login(
        &self,
        _email: &Email,
        _password: &SecretString,
    ) -> Result<LoginResponse, ApiError> {
        self.record("user_login");
        self.user_login.lock().unwrap().get()
    }

    async fn user_logout(&self) -> Result<StatusResponse, ApiError> {
        self.record("user_logout");
        Ok(StatusResponse {
            success: true,
            message: Some("Logged Out".to_string()),
        })
    }

    async fn list_products(&self) -> Result<ProductListResponse, ApiError> {
        self.record("list_products");
        self.products.lock().unwrap().get()
    }

    async fn update_cart(&self, items: &CartItems) -> Result<StatusResponse, ApiError> {
        self.record("update_cart");
        let delay = *self.persist_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.persisted.lock().unwrap().push(items.clone());
        self.cart_update.lock().unwrap().get()
    }
}
