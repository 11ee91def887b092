//! Command implementations.
//!
//! Each command runs against a bootstrapped [`market_storefront::AppContext`]
//! and prints through [`crate::output`].

pub mod cart;
pub mod catalog;
pub mod session;
