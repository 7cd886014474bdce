//! Catalog page and search route handlers.
//!
//! Search requests never hold the session lock while the catalog is being
//! queried: the handler takes a ticket under the lock, releases it, awaits
//! the catalog, and hands the outcome back. Responses to superseded tickets
//! are discarded by the search controller.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    body::Bytes,
    extract::{RawForm, State},
};
use jm_games_core::{Severity, Slug};
use serde::Deserialize;
use tracing::instrument;

use crate::binding::{Dispatch, UiEvent};
use crate::cart::CartSnapshot;
use crate::catalog::CatalogService;
use crate::error::{AppError, Result};
use crate::favorites::FavoritesSnapshot;
use crate::filters;
use crate::notify::{Notifier, Toast};
use crate::search::pagination::Pagination;
use crate::search::{
    Completion, FilterOptions, PageTarget, QuickFilter, ResultsView, SearchController,
    SearchTicket,
};
use crate::state::AppState;

const WELCOME_TEXT: &str = "Bem-vindo à JM Games!";

/// Quick filter button display data.
#[derive(Debug, Clone)]
pub struct QuickFilterButton {
    pub filter: QuickFilter,
    pub active: bool,
}

/// Genre or platform checkbox display data.
#[derive(Debug, Clone)]
pub struct FilterChoice {
    pub slug: String,
    pub name: String,
    pub selected: bool,
}

/// Filter dialog display data.
#[derive(Debug, Clone, Default)]
pub struct FilterPanel {
    pub genres: Vec<FilterChoice>,
    pub platforms: Vec<FilterChoice>,
    pub genres_error: Option<String>,
    pub platforms_error: Option<String>,
}

/// Results grid display data.
#[derive(Debug, Clone)]
pub struct ResultsPanel {
    pub results: ResultsView,
    pub pagination: Option<Pagination>,
    pub query: String,
    pub quick_filters: Vec<QuickFilterButton>,
}

impl ResultsPanel {
    fn from_controller(search: &SearchController) -> Self {
        let active = search.active_quick_filter();
        Self {
            results: search.results().clone(),
            pagination: search.pagination().cloned(),
            query: search.query().to_string(),
            quick_filters: QuickFilter::ALL
                .iter()
                .map(|&filter| QuickFilterButton {
                    filter,
                    active: active == Some(filter),
                })
                .collect(),
        }
    }
}

impl FilterPanel {
    fn from_controller(search: &SearchController) -> Self {
        let options = search.filter_options();
        Self {
            genres: options
                .genres
                .iter()
                .map(|genre| FilterChoice {
                    slug: genre.slug.to_string(),
                    name: genre.name.clone(),
                    selected: search.is_genre_selected(&genre.slug),
                })
                .collect(),
            platforms: options
                .platforms
                .iter()
                .map(|platform| FilterChoice {
                    slug: platform.slug.to_string(),
                    name: platform.name.clone(),
                    selected: search.is_platform_selected(&platform.slug),
                })
                .collect(),
            genres_error: options.genres_error.clone(),
            platforms_error: options.platforms_error.clone(),
        }
    }
}

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/catalog.html")]
pub struct CatalogPageTemplate {
    pub panel: ResultsPanel,
    pub filter_panel: FilterPanel,
    pub cart: CartSnapshot,
    pub favorites: FavoritesSnapshot,
    pub toasts: Vec<Toast>,
}

/// Results grid fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/results.html")]
pub struct ResultsTemplate {
    pub panel: ResultsPanel,
    pub toasts: Vec<Toast>,
}

/// Free-text search form data.
#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub q: String,
}

/// Quick filter form data.
#[derive(Debug, Deserialize)]
pub struct QuickFilterForm {
    pub filter: String,
}

/// Pagination form data: `previous`, `next` or a page number.
#[derive(Debug, Deserialize)]
pub struct PageForm {
    pub target: String,
}

/// Run a ticket against the catalog and apply the outcome.
pub(crate) async fn run_search(state: &AppState, ticket: SearchTicket) -> Completion {
    let outcome = state.catalog().search_games(ticket.params()).await;
    state.binder().await.complete_search(ticket, outcome)
}

async fn dispatch_search(state: &AppState, event: UiEvent) -> ResultsTemplate {
    let dispatch = state.binder().await.dispatch(event);
    if let Dispatch::Search(ticket) = dispatch {
        let completion = run_search(state, ticket).await;
        tracing::debug!(?completion, "Search finished");
    }
    results_template(state).await
}

async fn results_template(state: &AppState) -> ResultsTemplate {
    let panel = ResultsPanel::from_controller(state.binder().await.search());
    ResultsTemplate {
        panel,
        toasts: state.drain_toasts(),
    }
}

/// Display the catalog page.
///
/// The first visit greets the shopper, loads the filter options and runs
/// the popular-games search.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> CatalogPageTemplate {
    let ticket = {
        let mut binder = state.binder().await;
        if binder.search().has_searched() {
            None
        } else {
            state.notifier().notify(WELCOME_TEXT, Severity::Info);
            Some(binder.search_mut().initial_load())
        }
    };

    if let Some(ticket) = ticket {
        let (options, _) = tokio::join!(
            FilterOptions::load(state.catalog(), state.notifier()),
            run_search(&state, ticket)
        );
        state.binder().await.search_mut().set_filter_options(options);
    }

    let (panel, filter_panel) = {
        let mut binder = state.binder().await;
        binder.close_detail();
        (
            ResultsPanel::from_controller(binder.search()),
            FilterPanel::from_controller(binder.search()),
        )
    };

    CatalogPageTemplate {
        panel,
        filter_panel,
        cart: state.cart_snapshot(),
        favorites: state.favorites_snapshot(),
        toasts: state.drain_toasts(),
    }
}

/// Current results grid (HTMX), re-rendered after favorites change.
#[instrument(skip(state))]
pub async fn results(State(state): State<AppState>) -> ResultsTemplate {
    results_template(&state).await
}

/// Free-text search (HTMX).
#[instrument(skip(state))]
pub async fn search(State(state): State<AppState>, Form(form): Form<SearchForm>) -> ResultsTemplate {
    dispatch_search(&state, UiEvent::SubmitSearch(form.q)).await
}

/// Quick filter (HTMX).
#[instrument(skip(state))]
pub async fn quick_filter(
    State(state): State<AppState>,
    Form(form): Form<QuickFilterForm>,
) -> Result<ResultsTemplate> {
    let filter = QuickFilter::parse(&form.filter)
        .ok_or_else(|| AppError::BadRequest(format!("unknown filter: {}", form.filter)))?;
    Ok(dispatch_search(&state, UiEvent::QuickFilter(filter)).await)
}

/// Apply genre and platform filters (HTMX).
///
/// The form repeats `genres` and `platforms` once per checked box.
#[instrument(skip(state, body))]
pub async fn apply_filters(
    State(state): State<AppState>,
    RawForm(body): RawForm,
) -> ResultsTemplate {
    let (genres, platforms) = parse_filter_form(&body);
    dispatch_search(&state, UiEvent::ApplyFilters { genres, platforms }).await
}

/// Clear filters (HTMX).
#[instrument(skip(state))]
pub async fn clear_filters(State(state): State<AppState>) -> ResultsTemplate {
    dispatch_search(&state, UiEvent::ClearFilters).await
}

/// Previous, next or numbered page (HTMX).
#[instrument(skip(state))]
pub async fn paginate(
    State(state): State<AppState>,
    Form(form): Form<PageForm>,
) -> Result<ResultsTemplate> {
    let target = parse_page_target(&form.target)
        .ok_or_else(|| AppError::BadRequest(format!("invalid page: {}", form.target)))?;
    Ok(dispatch_search(&state, UiEvent::Paginate(target)).await)
}

/// Re-run the current search (HTMX).
#[instrument(skip(state))]
pub async fn retry(State(state): State<AppState>) -> ResultsTemplate {
    dispatch_search(&state, UiEvent::RetrySearch).await
}

fn parse_filter_form(body: &Bytes) -> (Vec<Slug>, Vec<Slug>) {
    let mut genres = Vec::new();
    let mut platforms = Vec::new();
    for (key, value) in url::form_urlencoded::parse(body) {
        match &*key {
            "genres" => genres.push(Slug::from(&*value)),
            "platforms" => platforms.push(Slug::from(&*value)),
            _ => {}
        }
    }
    (genres, platforms)
}

fn parse_page_target(raw: &str) -> Option<PageTarget> {
    match raw.trim() {
        "previous" => Some(PageTarget::Previous),
        "next" => Some(PageTarget::Next),
        number => number.parse().ok().map(PageTarget::Number),
    }
}
