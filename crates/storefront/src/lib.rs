//! JM Games Storefront library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused.
//!
//! # Modules
//!
//! - [`storage`] - Persistent key-value store adapter
//! - [`cart`] - Cart engine
//! - [`favorites`] - Favorites engine and heart icon refresh
//! - [`search`] - Catalog search controller and pagination
//! - [`catalog`] - RAWG API client behind the [`catalog::CatalogService`] seam
//! - [`detail`] - Game detail page with related games
//! - [`binding`] - Shopper interactions routed to the engines
//! - [`routes`] - Axum handlers rendering Askama templates

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod affordance;
pub mod binding;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod detail;
pub mod error;
pub mod favorites;
pub mod filters;
pub mod middleware;
pub mod notify;
pub mod routes;
pub mod search;
pub mod state;
pub mod storage;
pub mod view;
