//! Market Core - Shared domain types.
//!
//! This crate provides the types used across all Market components:
//! - `storefront` - Session, catalog and cart state container
//! - `cli` - Terminal front-end driving the storefront state
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O and no
//! HTTP clients. Cart arithmetic lives here so it can be tested without a
//! backend.
//!
//! # Modules
//!
//! - [`types`] - String IDs, emails, prices, products and cart contents

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
