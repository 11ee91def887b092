//! Core types for Market.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod email;
pub mod id;
pub mod price;
pub mod product;

pub use cart::CartItems;
pub use email::{Email, EmailError};
pub use id::*;
pub use price::Price;
pub use product::{Description, MAX_STARS, Product};
