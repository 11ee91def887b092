//! Market storefront state.
//!
//! This crate holds the client-side state of the storefront: who is signed
//! in, the catalog snapshot, the cart and the search query. Views read it
//! through [`AppContext`] and call its operations; the backend is reached
//! through the [`api::StoreApi`] seam.
//!
//! # Example
//!
//! ```rust,ignore
//! let config = StorefrontConfig::from_env()?;
//! let ctx = AppContext::connect(config)?;
//! ctx.bootstrap().await;
//! ctx.add_to_cart(&ProductId::new("p1"));
//! ctx.wait_for_cart_sync().await;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart_sync;
pub mod catalog;
pub mod config;
pub mod models;
pub mod notify;
pub mod services;
pub mod state;
pub mod telemetry;

pub use config::{ConfigError, StorefrontConfig};
pub use notify::{Notification, NotificationLevel};
pub use services::auth::{AuthError, Credentials};
pub use state::AppContext;
