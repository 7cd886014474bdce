//! Core types for the JM Games storefront.
//!
//! This module provides type-safe wrappers for the storefront's domain concepts.

pub mod id;
pub mod line;
pub mod price;
pub mod product;
pub mod status;

pub use id::*;
pub use line::{CartLine, FavoriteEntry};
pub use price::{CurrencyCode, Price, simulated_price};
pub use product::{MAX_UNIT_PRICE, PLACEHOLDER_IMAGE, PRICE_SCALE, Product, ProductError};
pub use status::Severity;
