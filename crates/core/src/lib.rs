//! JM Games Core - Shared value types.
//!
//! This crate provides the value types that flow through the storefront:
//! - `storefront` - Cart, favorites, catalog search and the HTTP surface
//! - `integration-tests` - Cross-module scenario tests
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no storage
//! access, no HTTP clients. Products are validated once at the view boundary
//! and passed by value into the engines.
//!
//! # Modules
//!
//! - [`types`] - Identity newtypes, prices, products, line items and severities

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
