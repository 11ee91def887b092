//! Business logic services for the storefront state.
//!
//! # Services
//!
//! - `auth` - Login form submission for customers and sellers

pub mod auth;
