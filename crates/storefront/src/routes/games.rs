//! Game detail route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use jm_games_core::ProductId;
use tracing::instrument;

use crate::cart::CartSnapshot;
use crate::catalog::CatalogError;
use crate::detail::GameDetailPage;
use crate::favorites::FavoritesSnapshot;
use crate::filters;
use crate::notify::Toast;
use crate::state::AppState;

/// Shown in place of the page when the game cannot be loaded.
const DETAIL_UNAVAILABLE_TEXT: &str =
    "Não foi possível carregar os detalhes deste jogo. Tente novamente mais tarde.";

/// Shown when the page is opened without a game id.
const MISSING_ID_TEXT: &str = "ID do jogo não especificado.";

/// Game detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/game.html")]
pub struct GamePageTemplate {
    pub page: Option<GameDetailPage>,
    pub error: Option<&'static str>,
    pub cart: CartSnapshot,
    pub favorites: FavoritesSnapshot,
    pub toasts: Vec<Toast>,
}

async fn render(
    state: &AppState,
    outcome: Result<GameDetailPage, CatalogError>,
) -> (StatusCode, GamePageTemplate) {
    let (status, error) = match &outcome {
        Ok(_) => (StatusCode::OK, None),
        Err(CatalogError::MissingId) => (StatusCode::BAD_REQUEST, Some(MISSING_ID_TEXT)),
        Err(e) if e.is_not_found() => (StatusCode::NOT_FOUND, Some(DETAIL_UNAVAILABLE_TEXT)),
        Err(_) => (StatusCode::BAD_GATEWAY, Some(DETAIL_UNAVAILABLE_TEXT)),
    };

    let page = {
        let mut binder = state.binder().await;
        binder.show_detail(outcome);
        binder.detail().cloned()
    };

    (
        status,
        GamePageTemplate {
            page,
            error,
            cart: state.cart_snapshot(),
            favorites: state.favorites_snapshot(),
            toasts: state.drain_toasts(),
        },
    )
}

/// Display a game's detail page.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let id = ProductId::from(id);
    let outcome = GameDetailPage::load(state.catalog(), &id).await;
    render(&state, outcome).await.into_response()
}

/// The detail page opened without an id.
#[instrument(skip(state))]
pub async fn missing_id(State(state): State<AppState>) -> Response {
    render(&state, Err(CatalogError::MissingId))
        .await
        .into_response()
}
