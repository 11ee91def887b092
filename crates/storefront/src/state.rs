//! Application state shared across views.
//!
//! [`AppContext`] is the single source of truth for the session, the
//! catalog snapshot, the cart and the search query. It is constructed once
//! and handed to every view; clones share the same state.
//!
//! Each slice of state lives in its own `watch` channel so views can
//! subscribe to exactly what they render, and so a backend response only
//! ever replaces the slice it owns:
//!
//! | Slice | Written by |
//! |---|---|
//! | customer identity | customer check, customer login, customer logout |
//! | seller flag | seller check, seller login, seller logout |
//! | catalog | catalog fetch |
//! | cart | cart operations, customer check/login/logout |
//! | search query, login prompt | views |

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tracing::{info, instrument, warn};

use market_core::{CartItems, Price, Product, ProductId};

use crate::api::{ApiError, HttpStoreApi, StoreApi};
use crate::cart_sync::{CartOrigin, CartSnapshot, CartSync};
use crate::catalog::{self, ProductDetail};
use crate::config::StorefrontConfig;
use crate::models::{Session, User};
use crate::notify::{Notification, Notifier};
use crate::services::auth::{AuthError, AuthService, Credentials, Principal};
use crate::telemetry;

/// Route of the cart page, opened by "Buy now".
pub const CART_ROUTE: &str = "/cart";

/// Shared storefront state.
///
/// This struct is cheaply cloneable via `Arc`. Creating one spawns the cart
/// sync task, so it must be created inside a Tokio runtime.
#[derive(Clone)]
pub struct AppContext {
    inner: Arc<AppContextInner>,
}

struct AppContextInner {
    config: StorefrontConfig,
    api: Arc<dyn StoreApi>,
    notifier: Notifier,
    user: watch::Sender<Option<Arc<User>>>,
    is_seller: watch::Sender<bool>,
    show_user_login: watch::Sender<bool>,
    products: watch::Sender<Arc<[Product]>>,
    cart: watch::Sender<CartSnapshot>,
    synced: watch::Receiver<u64>,
    search_query: watch::Sender<String>,
}

impl AppContext {
    /// Create the state container on top of any backend implementation.
    ///
    /// Nothing is fetched yet; call [`AppContext::bootstrap`].
    #[must_use]
    pub fn new(config: StorefrontConfig, api: Arc<dyn StoreApi>) -> Self {
        let notifier = Notifier::new();
        let (user, user_rx) = watch::channel(None);
        let (cart, cart_rx) = watch::channel(CartSnapshot::default());
        let (synced_tx, synced) = watch::channel(0);

        tokio::spawn(
            CartSync {
                cart: cart_rx,
                user: user_rx,
                synced: synced_tx,
                api: Arc::clone(&api),
                notifier: notifier.clone(),
            }
            .run(),
        );

        Self {
            inner: Arc::new(AppContextInner {
                config,
                api,
                notifier,
                user,
                is_seller: watch::Sender::new(false),
                show_user_login: watch::Sender::new(false),
                products: watch::Sender::new(Arc::from(Vec::new())),
                cart,
                synced,
                search_query: watch::Sender::new(String::new()),
            }),
        }
    }

    /// Create the state container talking HTTP to the configured backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn connect(config: StorefrontConfig) -> Result<Self, ApiError> {
        let api = HttpStoreApi::new(&config)?;
        Ok(Self::new(config, Arc::new(api)))
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Receive notifications published from now on.
    #[must_use]
    pub fn subscribe_notifications(&self) -> broadcast::Receiver<Notification> {
        self.inner.notifier.subscribe()
    }

    // =========================================================================
    // Bootstrap
    // =========================================================================

    /// Run the seller check, catalog fetch and customer check concurrently.
    ///
    /// They complete in any order; each writes only its own slice.
    #[instrument(skip(self))]
    pub async fn bootstrap(&self) {
        tokio::join!(
            self.check_seller_session(),
            self.fetch_catalog(),
            self.check_customer_session(),
        );
        info!(
            seller = self.is_seller(),
            customer = self.user().is_some(),
            products = self.products().len(),
            "Storefront state bootstrapped"
        );
    }

    /// Refresh the seller flag.
    ///
    /// Any failure means "not a seller" and is only logged.
    #[instrument(skip(self))]
    pub async fn check_seller_session(&self) {
        let is_seller = match self.inner.api.seller_is_auth().await {
            Ok(resp) => resp.success,
            Err(e) => {
                warn!(error = %e, "Seller check failed");
                false
            }
        };
        self.inner.is_seller.send_replace(is_seller);
    }

    /// Load the customer session and their persisted cart.
    ///
    /// Unlike the seller check, failures are shown to the user. A failed
    /// check leaves the current session untouched.
    #[instrument(skip(self))]
    pub async fn check_customer_session(&self) {
        match self.inner.api.user_is_auth().await {
            Ok(resp) if resp.success => match resp.user {
                Some(user) => self.sign_in(user),
                None => {
                    warn!("Customer check succeeded without a user record");
                    self.inner.notifier.error("Malformed response: missing user");
                }
            },
            Ok(resp) => {
                self.inner
                    .notifier
                    .error(resp.message.unwrap_or_else(|| "Not Authorized".to_string()));
            }
            Err(e) => {
                warn!(error = %e, "Customer check failed");
                self.inner.notifier.error(e.user_message());
            }
        }
    }

    /// Replace the catalog snapshot.
    ///
    /// On any failure the previous snapshot stays in place.
    #[instrument(skip(self))]
    pub async fn fetch_catalog(&self) {
        match self.inner.api.list_products().await {
            Ok(resp) if resp.success => match resp.products {
                Some(products) => {
                    self.inner.products.send_replace(Arc::from(products));
                }
                None => {
                    warn!("Product list succeeded without products");
                    self.inner
                        .notifier
                        .error("Malformed response: missing products");
                }
            },
            Ok(resp) => {
                self.inner.notifier.error(
                    resp.message
                        .unwrap_or_else(|| "Failed to load products".to_string()),
                );
            }
            Err(e) => {
                warn!(error = %e, "Product fetch failed");
                self.inner.notifier.error(e.user_message());
            }
        }
    }

    // =========================================================================
    // Login / Logout
    // =========================================================================

    /// Submit the seller login form.
    ///
    /// Returns the route to open on success.
    ///
    /// # Errors
    ///
    /// Returns the message the form should display.
    pub async fn seller_login(&self, credentials: &Credentials) -> Result<String, AuthError> {
        AuthService::new(&*self.inner.api)
            .login(Principal::Seller, credentials)
            .await?;
        self.inner.is_seller.send_replace(true);
        Ok(self.inner.config.seller_landing.clone())
    }

    /// Submit the customer login form.
    ///
    /// On success the customer and their persisted cart are loaded and the
    /// login prompt is closed.
    ///
    /// # Errors
    ///
    /// Returns the message the form should display.
    pub async fn customer_login(&self, credentials: &Credentials) -> Result<(), AuthError> {
        let user = AuthService::new(&*self.inner.api)
            .login(Principal::Customer, credentials)
            .await?;

        match user {
            Some(user) => self.sign_in(user),
            // Some backends only set the cookie; ask who we are.
            None => self.check_customer_session().await,
        }

        self.inner.show_user_login.send_replace(false);
        self.inner.notifier.success("Logged in");
        Ok(())
    }

    /// End the customer session and forget the local cart.
    #[instrument(skip(self))]
    pub async fn logout_customer(&self) {
        match self.inner.api.user_logout().await {
            Ok(resp) if resp.success => {
                self.sign_out();
                self.inner
                    .notifier
                    .success(resp.message.unwrap_or_else(|| "Logged out".to_string()));
            }
            Ok(resp) => {
                self.inner
                    .notifier
                    .error(resp.message.unwrap_or_else(|| "Logout failed".to_string()));
            }
            Err(e) => {
                warn!(error = %e, "Customer logout failed");
                self.inner.notifier.error(e.user_message());
            }
        }
    }

    /// End the seller session.
    #[instrument(skip(self))]
    pub async fn logout_seller(&self) {
        match self.inner.api.seller_logout().await {
            Ok(resp) if resp.success => {
                self.inner.is_seller.send_replace(false);
                self.inner
                    .notifier
                    .success(resp.message.unwrap_or_else(|| "Logged out".to_string()));
            }
            Ok(resp) => {
                self.inner
                    .notifier
                    .error(resp.message.unwrap_or_else(|| "Logout failed".to_string()));
            }
            Err(e) => {
                warn!(error = %e, "Seller logout failed");
                self.inner.notifier.error(e.user_message());
            }
        }
    }

    fn sign_in(&self, user: User) {
        telemetry::set_sentry_user(&user);
        let cart = user.cart.clone().unwrap_or_default();
        info!(user = %user.display_name(), entries = cart.len(), "Customer signed in");

        self.inner.user.send_replace(Some(Arc::new(user)));
        self.replace_cart(cart, CartOrigin::Remote);
    }

    fn sign_out(&self) {
        telemetry::clear_sentry_user();
        self.inner.user.send_replace(None);
        self.replace_cart(CartItems::new(), CartOrigin::Remote);
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Add one unit of a product.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn add_to_cart(&self, id: &ProductId) {
        self.mutate_cart(|items| Some(items.with_added(id)));
        telemetry::add_breadcrumb("cart", "Added to cart", Some(&[("product_id", id.as_str())]));
        self.inner.notifier.success("Added to cart");
    }

    /// Set the quantity of a product exactly.
    ///
    /// A quantity of zero removes the entry (and is a silent no-op when the
    /// product is not in the cart), so the cart never holds a zero.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn update_cart_item(&self, id: &ProductId, quantity: u32) {
        if quantity == 0 {
            let removed = self.mutate_cart(|items| {
                items
                    .contains(id.as_str())
                    .then(|| items.with_quantity(id, 0))
            });
            if removed {
                self.inner.notifier.success("Removed from cart");
            }
            return;
        }

        self.mutate_cart(|items| Some(items.with_quantity(id, quantity)));
        telemetry::add_breadcrumb(
            "cart",
            "Cart updated",
            Some(&[("product_id", id.as_str()), ("quantity", &quantity.to_string())]),
        );
        self.inner.notifier.success("Cart updated");
    }

    /// Take one unit of a product out of the cart.
    ///
    /// Does nothing, silently, when the product is not in the cart.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn remove_from_cart(&self, id: &ProductId) {
        if self.mutate_cart(|items| items.with_removed(id.as_str())) {
            telemetry::add_breadcrumb(
                "cart",
                "Removed from cart",
                Some(&[("product_id", id.as_str())]),
            );
            self.inner.notifier.success("Removed from cart");
        }
    }

    /// Add a product and return the route of the cart page.
    pub fn buy_now(&self, id: &ProductId) -> &'static str {
        self.add_to_cart(id);
        CART_ROUTE
    }

    /// Sum of all quantities in the cart.
    #[must_use]
    pub fn cart_item_count(&self) -> u64 {
        self.inner.cart.borrow().items.item_count()
    }

    /// Cart total at offer prices, truncated to whole cents.
    ///
    /// Entries without a catalog match count as zero.
    #[must_use]
    pub fn cart_total(&self) -> Price {
        let items = self.cart();
        let products = self.products();
        items.total(|id| catalog::find(&products, id.as_str()).map(|p| p.offer_price))
    }

    /// Current cart contents.
    #[must_use]
    pub fn cart(&self) -> Arc<CartItems> {
        Arc::clone(&self.inner.cart.borrow().items)
    }

    /// Watch every cart replacement.
    #[must_use]
    pub fn subscribe_cart(&self) -> watch::Receiver<CartSnapshot> {
        self.inner.cart.subscribe()
    }

    /// Wait until the newest cart has been handed to the backend.
    ///
    /// Returns immediately if nothing is pending, and also when the change
    /// did not need persisting (no customer signed in).
    pub async fn wait_for_cart_sync(&self) {
        let target = self.inner.cart.borrow().version;
        let mut synced = self.inner.synced.clone();
        // Err only if the sync task is gone, in which case nothing is pending.
        let _ = synced.wait_for(|&version| version >= target).await;
    }

    /// Apply a copy-on-write change to the cart.
    ///
    /// `change` sees the current items and returns the replacement, or
    /// `None` to leave the cart alone. Returns whether the cart changed.
    fn mutate_cart<F>(&self, change: F) -> bool
    where
        F: FnOnce(&CartItems) -> Option<CartItems>,
    {
        self.inner.cart.send_if_modified(|snapshot| {
            let Some(next) = change(&snapshot.items) else {
                return false;
            };
            snapshot.version += 1;
            snapshot.items = Arc::new(next);
            snapshot.origin = CartOrigin::Local;
            true
        })
    }

    fn replace_cart(&self, items: CartItems, origin: CartOrigin) {
        self.inner.cart.send_modify(|snapshot| {
            snapshot.version += 1;
            snapshot.items = Arc::new(items);
            snapshot.origin = origin;
        });
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Signed-in customer, if any.
    #[must_use]
    pub fn user(&self) -> Option<Arc<User>> {
        self.inner.user.borrow().clone()
    }

    /// Whether a seller session is active.
    #[must_use]
    pub fn is_seller(&self) -> bool {
        *self.inner.is_seller.borrow()
    }

    /// Snapshot of both sessions.
    #[must_use]
    pub fn session(&self) -> Session {
        Session {
            user: self.user(),
            is_seller: self.is_seller(),
        }
    }

    /// Watch the customer identity.
    #[must_use]
    pub fn subscribe_user(&self) -> watch::Receiver<Option<Arc<User>>> {
        self.inner.user.subscribe()
    }

    /// Whether the customer login prompt is open.
    #[must_use]
    pub fn show_user_login(&self) -> bool {
        *self.inner.show_user_login.borrow()
    }

    pub fn set_show_user_login(&self, show: bool) {
        self.inner.show_user_login.send_replace(show);
    }

    // =========================================================================
    // Catalog & Search
    // =========================================================================

    /// Current catalog snapshot.
    #[must_use]
    pub fn products(&self) -> Arc<[Product]> {
        Arc::clone(&self.inner.products.borrow())
    }

    /// Watch catalog replacements.
    #[must_use]
    pub fn subscribe_products(&self) -> watch::Receiver<Arc<[Product]>> {
        self.inner.products.subscribe()
    }

    /// Look up a product in the snapshot.
    #[must_use]
    pub fn product(&self, id: &ProductId) -> Option<Product> {
        catalog::find(&self.products(), id.as_str()).cloned()
    }

    /// Detail page data for a product.
    #[must_use]
    pub fn product_detail(&self, id: &ProductId) -> Option<ProductDetail> {
        ProductDetail::build(&self.products(), id)
    }

    /// Products of one category.
    #[must_use]
    pub fn products_in_category(&self, category: &str) -> Vec<Product> {
        catalog::in_category(&self.products(), category)
            .into_iter()
            .cloned()
            .collect()
    }

    /// In-stock products matching the current search query.
    #[must_use]
    pub fn search_results(&self) -> Vec<Product> {
        let query = self.search_query();
        catalog::search(&self.products(), &query)
            .into_iter()
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn search_query(&self) -> String {
        self.inner.search_query.borrow().clone()
    }

    pub fn set_search_query(&self, query: impl Into<String>) {
        self.inner.search_query.send_replace(query.into());
    }
}
