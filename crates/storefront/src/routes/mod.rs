//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Catalog page (first visit loads popular games)
//! GET  /health                 - Health check
//!
//! # Search (HTMX fragments)
//! GET  /search/results         - Current results grid and pagination
//! POST /search                 - Free-text search
//! POST /search/quick           - Quick filter (all, new, popular)
//! POST /search/filters         - Apply genre and platform filters
//! POST /search/clear           - Clear filters
//! POST /search/page            - Previous, next or numbered page
//! POST /search/retry           - Re-run the current search
//!
//! # Game detail
//! GET  /games                  - Missing-id error page
//! GET  /games/{id}             - Game detail page
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart drawer
//! POST /cart/add               - Add to cart (returns badge, triggers cart-updated)
//! POST /cart/update            - Update quantity (returns cart drawer)
//! POST /cart/remove            - Remove line (returns cart drawer)
//! POST /cart/clear             - Empty the cart (returns cart drawer)
//! GET  /cart/count             - Cart count badge
//!
//! # Favorites (HTMX fragments)
//! GET  /favorites              - Favorites drawer
//! POST /favorites/toggle       - Toggle one game (returns its heart button)
//! POST /favorites/remove       - Remove one game (returns favorites drawer)
//! POST /favorites/clear        - Empty favorites (returns favorites drawer)
//! ```
//!
//! Every fragment carries the pending toasts as an out-of-band swap.

pub mod cart;
pub mod catalog;
pub mod favorites;
pub mod games;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// HTMX event fired after the cart changes.
pub const CART_UPDATED_EVENT: &str = "cart-updated";

/// HTMX event fired after favorites membership changes.
pub const FAVORITES_UPDATED_EVENT: &str = "favorites-updated";

/// Create the search routes router.
pub fn search_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(catalog::search))
        .route("/results", get(catalog::results))
        .route("/quick", post(catalog::quick_filter))
        .route("/filters", post(catalog::apply_filters))
        .route("/clear", post(catalog::clear_filters))
        .route("/page", post(catalog::paginate))
        .route("/retry", post(catalog::retry))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the favorites routes router.
pub fn favorites_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(favorites::show))
        .route("/toggle", post(favorites::toggle))
        .route("/remove", post(favorites::remove))
        .route("/clear", post(favorites::clear))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::index))
        .nest("/search", search_routes())
        .route("/games", get(games::missing_id))
        .route("/games/{id}", get(games::show))
        .nest("/cart", cart_routes())
        .nest("/favorites", favorites_routes())
}
