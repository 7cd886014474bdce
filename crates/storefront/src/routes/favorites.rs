//! Favorites route handlers.
//!
//! Toggling swaps the pressed heart button in place; every membership
//! change also triggers `favorites-updated` so the drawer and the results
//! grid redraw their icons from the engine.

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

use crate::affordance::{HeartButton, HeartIcon};
use crate::binding::{AffordanceData, Dispatch, UiEvent};
use crate::error::add_breadcrumb;
use crate::favorites::FavoritesSnapshot;
use crate::filters;
use crate::notify::Toast;
use crate::routes::FAVORITES_UPDATED_EVENT;
use crate::state::AppState;

/// Remove favorite form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFavoriteForm {
    pub id: String,
}

/// Favorites drawer fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/favorites.html")]
pub struct FavoritesTemplate {
    pub favorites: FavoritesSnapshot,
    pub toasts: Vec<Toast>,
}

/// Heart button fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/heart_fragment.html")]
pub struct HeartTemplate {
    pub heart: HeartButton,
    pub toasts: Vec<Toast>,
}

/// Toasts-only fragment, for requests that leave the page untouched.
#[derive(Template, WebTemplate)]
#[template(path = "partials/toasts.html")]
pub struct ToastsTemplate {
    pub toasts: Vec<Toast>,
}

fn favorites_template(state: &AppState) -> FavoritesTemplate {
    FavoritesTemplate {
        favorites: state.favorites_snapshot(),
        toasts: state.drain_toasts(),
    }
}

/// Display the favorites drawer.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> FavoritesTemplate {
    favorites_template(&state)
}

/// Toggle one game (HTMX).
///
/// Returns the pressed button with its new icon. Invalid affordance data
/// leaves the button in place and only shows the error toast.
#[instrument(skip(state))]
pub async fn toggle(State(state): State<AppState>, Form(data): Form<AffordanceData>) -> Response {
    let outcome = state.binder().await.toggle_favorite(&data);

    let Some((product, favorited)) = outcome else {
        return (
            AppendHeaders([("HX-Reswap", "none")]),
            ToastsTemplate {
                toasts: state.drain_toasts(),
            },
        )
            .into_response();
    };

    add_breadcrumb(
        "favorites",
        if favorited { "Favorited" } else { "Unfavorited" },
        Some(&[("product_id", product.id.as_str())]),
    );

    (
        AppendHeaders([("HX-Trigger", FAVORITES_UPDATED_EVENT)]),
        HeartTemplate {
            heart: HeartButton::new(product, HeartIcon::from_favorited(favorited)),
            toasts: state.drain_toasts(),
        },
    )
        .into_response()
}

/// Remove one game (HTMX).
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Form(form): Form<RemoveFavoriteForm>,
) -> Response {
    let dispatch = state
        .binder()
        .await
        .dispatch(UiEvent::RemoveFavorite(ProductId::from(form.id)));
    debug_assert!(matches!(dispatch, Dispatch::Done));

    (
        AppendHeaders([("HX-Trigger", FAVORITES_UPDATED_EVENT)]),
        favorites_template(&state),
    )
        .into_response()
}

/// Empty favorites (HTMX).
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Response {
    let dispatch = state.binder().await.dispatch(UiEvent::ClearFavorites);
    debug_assert!(matches!(dispatch, Dispatch::Done));

    (
        AppendHeaders([("HX-Trigger", FAVORITES_UPDATED_EVENT)]),
        favorites_template(&state),
    )
        .into_response()
}
