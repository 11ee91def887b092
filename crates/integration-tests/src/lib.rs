//! Integration tests for the Market storefront state.
//!
//! [`MockBackend`] is an in-process stand-in for the store backend. It
//! serves the eight endpoints the storefront uses on an ephemeral port,
//! keeps sessions in cookies the way the real backend does, and records
//! every cart it is asked to persist.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p market-integration-tests
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! let backend = MockBackend::start().await;
//! backend.add_customer("ada@example.com", "hunter22", "Ada", json!({"p1": 2}));
//! let ctx = AppContext::connect(backend.config())?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;
use uuid::Uuid;

use market_storefront::StorefrontConfig;

const USER_COOKIE: &str = "token";
const SELLER_COOKIE: &str = "sellerToken";

#[derive(Debug, Clone)]
struct Customer {
    id: String,
    name: String,
    password: String,
    cart: Value,
}

#[derive(Default)]
struct BackendState {
    products: Vec<Value>,
    product_failure: Option<(StatusCode, Value)>,
    customers: HashMap<String, Customer>,
    user_sessions: HashMap<String, String>,
    seller: Option<(String, String)>,
    seller_sessions: HashSet<String>,
    cart_updates: Vec<Value>,
}

/// Running mock backend. The server stops when this is dropped.
pub struct MockBackend {
    addr: SocketAddr,
    state: Arc<Mutex<BackendState>>,
    server: JoinHandle<()>,
}

impl MockBackend {
    /// Bind an ephemeral port on localhost and start serving.
    pub async fn start() -> Self {
        let state = Arc::new(Mutex::new(BackendState::default()));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let app = router(Arc::clone(&state));
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            state,
            server,
        }
    }

    /// Base URL of the running server.
    pub fn url(&self) -> Url {
        Url::parse(&format!("http://{}/", self.addr)).unwrap()
    }

    /// Storefront configuration pointing at this backend.
    pub fn config(&self) -> StorefrontConfig {
        StorefrontConfig::new(self.url())
    }

    pub fn set_products(&self, products: Vec<Value>) {
        self.lock().products = products;
    }

    /// Make `GET /api/product/list` answer with `status` and `body`.
    pub fn fail_product_list(&self, status: u16, body: Value) {
        let status = StatusCode::from_u16(status).unwrap();
        self.lock().product_failure = Some((status, body));
    }

    /// Register a customer with a persisted cart.
    pub fn add_customer(&self, email: &str, password: &str, name: &str, cart: Value) {
        let id = Uuid::new_v4().simple().to_string();
        self.lock().customers.insert(
            email.to_string(),
            Customer {
                id,
                name: name.to_string(),
                password: password.to_string(),
                cart,
            },
        );
    }

    pub fn set_seller(&self, email: &str, password: &str) {
        self.lock().seller = Some((email.to_string(), password.to_string()));
    }

    /// Every `cartItems` body received by `POST /api/cart/update`.
    pub fn cart_updates(&self) -> Vec<Value> {
        self.lock().cart_updates.clone()
    }

    /// Cart currently stored for a customer.
    pub fn stored_cart(&self, email: &str) -> Option<Value> {
        self.lock().customers.get(email).map(|c| c.cart.clone())
    }

    fn lock(&self) -> MutexGuard<'_, BackendState> {
        self.state.lock().unwrap()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// Sample catalog entry in the backend's wire format.
pub fn product(id: &str, name: &str, category: &str, offer_price: f64, in_stock: bool) -> Value {
    json!({
        "_id": id,
        "name": name,
        "category": category,
        "price": offer_price + 1.0,
        "offerPrice": offer_price,
        "image": [format!("https://cdn.market.test/{id}.png")],
        "description": ["Fresh", "Organic"],
        "inStock": in_stock,
        "rating": 4
    })
}

/// Address nothing is listening on.
pub async fn closed_port_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("http://{addr}/")).unwrap()
}

// =============================================================================
// Routes
// =============================================================================

type Shared = Arc<Mutex<BackendState>>;

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/seller/is-auth", get(seller_is_auth))
        .route("/api/seller/login", post(seller_login))
        .route("/api/seller/logout", get(seller_logout))
        .route("/api/user/is-auth", get(user_is_auth))
        .route("/api/user/login", post(user_login))
        .route("/api/user/logout", get(user_logout))
        .route("/api/product/list", get(product_list))
        .route("/api/cart/update", post(cart_update))
        .with_state(state)
}

#[derive(Deserialize)]
struct LoginForm {
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct CartForm {
    #[serde(rename = "cartItems")]
    cart_items: Value,
}

fn cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

fn set_cookie(name: &str, value: &str) -> [(header::HeaderName, String); 1] {
    [(
        header::SET_COOKIE,
        format!("{name}={value}; Path=/; HttpOnly"),
    )]
}

fn clear_cookie(name: &str) -> [(header::HeaderName, String); 1] {
    [(
        header::SET_COOKIE,
        format!("{name}=; Path=/; Max-Age=0"),
    )]
}

fn not_authorized() -> Response {
    Json(json!({"success": false, "message": "Not Authorized"})).into_response()
}

fn user_json(customer: &Customer, email: &str) -> Value {
    json!({
        "_id": customer.id,
        "name": customer.name,
        "email": email,
        "cart": customer.cart,
    })
}

async fn seller_is_auth(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let state = state.lock().unwrap();
    match cookie(&headers, SELLER_COOKIE) {
        Some(token) if state.seller_sessions.contains(&token) => {
            Json(json!({"success": true})).into_response()
        }
        _ => not_authorized(),
    }
}

async fn seller_login(State(state): State<Shared>, Json(form): Json<LoginForm>) -> Response {
    let mut state = state.lock().unwrap();
    let valid = state
        .seller
        .as_ref()
        .is_some_and(|(email, password)| *email == form.email && *password == form.password);
    if !valid {
        return Json(json!({"success": false, "message": "Invalid Credentials"})).into_response();
    }

    let token = Uuid::new_v4().to_string();
    state.seller_sessions.insert(token.clone());
    (
        set_cookie(SELLER_COOKIE, &token),
        Json(json!({"success": true, "message": "Logged In"})),
    )
        .into_response()
}

async fn seller_logout(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if let Some(token) = cookie(&headers, SELLER_COOKIE) {
        state.lock().unwrap().seller_sessions.remove(&token);
    }
    (
        clear_cookie(SELLER_COOKIE),
        Json(json!({"success": true, "message": "Logged Out"})),
    )
        .into_response()
}

async fn user_is_auth(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let state = state.lock().unwrap();
    let Some(email) = cookie(&headers, USER_COOKIE).and_then(|t| state.user_sessions.get(&t))
    else {
        return not_authorized();
    };
    match state.customers.get(email) {
        Some(customer) => {
            Json(json!({"success": true, "user": user_json(customer, email)})).into_response()
        }
        None => not_authorized(),
    }
}

async fn user_login(State(state): State<Shared>, Json(form): Json<LoginForm>) -> Response {
    let mut state = state.lock().unwrap();
    let Some(customer) = state
        .customers
        .get(&form.email)
        .filter(|c| c.password == form.password)
        .cloned()
    else {
        return Json(json!({"success": false, "message": "Invalid email or password"}))
            .into_response();
    };

    let token = Uuid::new_v4().to_string();
    state.user_sessions.insert(token.clone(), form.email.clone());
    (
        set_cookie(USER_COOKIE, &token),
        Json(json!({"success": true, "user": user_json(&customer, &form.email)})),
    )
        .into_response()
}

async fn user_logout(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if let Some(token) = cookie(&headers, USER_COOKIE) {
        state.lock().unwrap().user_sessions.remove(&token);
    }
    (
        clear_cookie(USER_COOKIE),
        Json(json!({"success": true, "message": "Logged Out"})),
    )
        .into_response()
}

async fn product_list(State(state): State<Shared>) -> Response {
    let state = state.lock().unwrap();
    if let Some((status, body)) = &state.product_failure {
        return (*status, Json(body.clone())).into_response();
    }
    Json(json!({"success": true, "products": state.products})).into_response()
}

async fn cart_update(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(form): Json<CartForm>,
) -> Response {
    let mut state = state.lock().unwrap();
    let Some(email) = cookie(&headers, USER_COOKIE)
        .and_then(|t| state.user_sessions.get(&t))
        .cloned()
    else {
        return not_authorized();
    };

    tracing::debug!(%email, cart = %form.cart_items, "Cart update received");
    state.cart_updates.push(form.cart_items.clone());
    if let Some(customer) = state.customers.get_mut(&email) {
        customer.cart = form.cart_items;
    }
    Json(json!({"success": true, "message": "Cart Updated"})).into_response()
}

/// Cart body as a sorted map, for comparisons that ignore key order.
pub fn cart_map(value: &Value) -> BTreeMap<String, i64> {
    serde_json::from_value(value.clone()).unwrap()
}
