//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart engine renders into the state's cart slot; handlers only read
//! that snapshot back.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use jm_games_core::ProductId;
use serde::Deserialize;
use tracing::instrument;

use crate::binding::{AffordanceData, Dispatch, UiEvent};
use crate::cart::CartSnapshot;
use crate::error::add_breadcrumb;
use crate::filters;
use crate::notify::Toast;
use crate::routes::CART_UPDATED_EVENT;
use crate::state::AppState;

/// Update quantity form data. `quantity` is the raw field text.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub id: String,
    #[serde(default)]
    pub quantity: String,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub id: String,
}

/// Cart drawer fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart.html")]
pub struct CartTemplate {
    pub cart: CartSnapshot,
    pub toasts: Vec<Toast>,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub cart: CartSnapshot,
    pub toasts: Vec<Toast>,
}

fn cart_template(state: &AppState) -> CartTemplate {
    CartTemplate {
        cart: state.cart_snapshot(),
        toasts: state.drain_toasts(),
    }
}

async fn dispatch(state: &AppState, event: UiEvent) {
    let dispatch = state.binder().await.dispatch(event);
    debug_assert!(matches!(dispatch, Dispatch::Done));
}

/// Display the cart drawer.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> CartTemplate {
    cart_template(&state)
}

/// Add one unit to the cart (HTMX).
///
/// Returns the count badge and triggers `cart-updated` so the drawer
/// reloads.
#[instrument(skip(state))]
pub async fn add(State(state): State<AppState>, Form(data): Form<AffordanceData>) -> Response {
    if let Some(id) = data.id.as_deref() {
        add_breadcrumb("cart", "Added to cart", Some(&[("product_id", id)]));
    }
    dispatch(&state, UiEvent::AddToCart(data)).await;

    (
        AppendHeaders([("HX-Trigger", CART_UPDATED_EVENT)]),
        CartCountTemplate {
            cart: state.cart_snapshot(),
            toasts: state.drain_toasts(),
        },
    )
        .into_response()
}

/// Update a line's quantity (HTMX).
#[instrument(skip(state))]
pub async fn update(State(state): State<AppState>, Form(form): Form<UpdateCartForm>) -> Response {
    dispatch(
        &state,
        UiEvent::UpdateQuantity {
            id: ProductId::from(form.id),
            raw: form.quantity,
        },
    )
    .await;

    (
        AppendHeaders([("HX-Trigger", CART_UPDATED_EVENT)]),
        cart_template(&state),
    )
        .into_response()
}

/// Remove a line (HTMX).
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Form(form): Form<RemoveFromCartForm>,
) -> Response {
    dispatch(&state, UiEvent::RemoveCartLine(ProductId::from(form.id))).await;

    (
        AppendHeaders([("HX-Trigger", CART_UPDATED_EVENT)]),
        cart_template(&state),
    )
        .into_response()
}

/// Empty the cart (HTMX).
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Response {
    dispatch(&state, UiEvent::ClearCart).await;

    (
        AppendHeaders([("HX-Trigger", CART_UPDATED_EVENT)]),
        cart_template(&state),
    )
        .into_response()
}

/// Get the cart count badge (HTMX).
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> CartCountTemplate {
    CartCountTemplate {
        cart: state.cart_snapshot(),
        toasts: Vec::new(),
    }
}
