//! Catalog search controller.
//!
//! # Architecture
//!
//! - A search has exactly one active [`SearchMode`]: free text, a quick
//!   filter, or genre/platform filters. Entering a mode replaces the others
//!   and resets to page 1, since the catalog treats free-text search and
//!   filter/sort parameters as incompatible.
//! - Starting a search puts the results view into `Loading` and hands out a
//!   [`SearchTicket`] carrying the effective request and a sequence number.
//!   The caller runs the request and passes the outcome to
//!   [`SearchController::complete`]. Only the most recently issued ticket is
//!   applied, so a slow earlier response cannot overwrite a newer one.
//! - Completion always leaves `Loading`: results, an empty state, or a
//!   failure state with no pagination.

pub mod card;
pub mod pagination;

use std::sync::Arc;

use jm_games_core::{Severity, Slug};
use serde::Serialize;

use crate::catalog::{CatalogError, CatalogService, GamePage, Genre, Platform, SearchParams, SortKey};
use crate::notify::Notifier;

pub use card::GameCard;
pub use pagination::{PageLink, Pagination};

/// Default number of results per page.
pub const DEFAULT_PAGE_SIZE: u32 = 21;

/// Shown when a search returns no games.
pub const NO_RESULTS_TEXT: &str = "Nenhum jogo encontrado com os critérios de busca.";

/// Shown in place of results when a search fails.
pub const SEARCH_FAILED_TEXT: &str =
    "Ocorreu um erro ao buscar os jogos. Por favor, tente novamente mais tarde.";

const SEARCH_FAILED_TOAST: &str = "Erro ao buscar jogos. Tente novamente mais tarde.";
const GENRES_FAILED_TOAST: &str = "Erro ao carregar opções de gênero.";
const GENRES_FAILED_TEXT: &str = "Erro ao carregar gêneros.";
const PLATFORMS_FAILED_TOAST: &str = "Erro ao carregar opções de plataforma.";
const PLATFORMS_FAILED_TEXT: &str = "Erro ao carregar plataformas.";

/// One-click sort presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuickFilter {
    All,
    New,
    Popular,
}

impl QuickFilter {
    pub const ALL: [Self; 3] = [Self::All, Self::New, Self::Popular];

    #[must_use]
    pub const fn sort_key(self) -> Option<SortKey> {
        match self {
            Self::All => None,
            Self::New => Some(SortKey::Added),
            Self::Popular => Some(SortKey::Rating),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::New => "new",
            Self::Popular => "popular",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "Todos",
            Self::New => "Lançamentos",
            Self::Popular => "Populares",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "new" => Some(Self::New),
            "popular" => Some(Self::Popular),
            _ => None,
        }
    }
}

/// The single active way results are selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchMode {
    FreeText(String),
    Quick(QuickFilter),
    Modal {
        genres: Vec<Slug>,
        platforms: Vec<Slug>,
    },
}

impl Default for SearchMode {
    fn default() -> Self {
        Self::Quick(QuickFilter::Popular)
    }
}

/// Page navigation request from the pagination controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTarget {
    Previous,
    Next,
    Number(u32),
}

/// An issued search request.
///
/// Must be passed back to [`SearchController::complete`] with the outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a ticket must be run and completed or the results stay loading"]
pub struct SearchTicket {
    seq: u64,
    params: SearchParams,
}

impl SearchTicket {
    #[must_use]
    pub const fn seq(&self) -> u64 {
        self.seq
    }

    #[must_use]
    pub const fn params(&self) -> &SearchParams {
        &self.params
    }
}

/// What the results area shows.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResultsView {
    #[default]
    Idle,
    Loading,
    Results(Vec<GameCard>),
    Empty(String),
    Failed(String),
}

impl ResultsView {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Whether the last search failed and can be retried.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    #[must_use]
    pub fn cards(&self) -> &[GameCard] {
        match self {
            Self::Results(cards) => cards,
            _ => &[],
        }
    }

    /// Message shown instead of cards, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Empty(message) | Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Outcome of handing a completed request back to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The ticket was current and the results view was replaced.
    Applied,
    /// A newer search was issued since; the outcome was discarded.
    Stale,
}

/// Genre and platform choices for the filter dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub genres: Vec<Genre>,
    pub platforms: Vec<Platform>,
    pub genres_error: Option<String>,
    pub platforms_error: Option<String>,
}

impl FilterOptions {
    /// Fetch both lists. A failed list stays empty with an error message
    /// and a `danger` notification.
    pub async fn load<C: CatalogService>(catalog: &C, notifier: &dyn Notifier) -> Self {
        let (genres, platforms) = tokio::join!(catalog.get_genres(), catalog.get_platforms());
        let mut options = Self::default();

        match genres {
            Ok(genres) => options.genres = genres,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load genres");
                notifier.notify(GENRES_FAILED_TOAST, Severity::Danger);
                options.genres_error = Some(GENRES_FAILED_TEXT.to_string());
            }
        }

        match platforms {
            Ok(platforms) => options.platforms = platforms,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load platforms");
                notifier.notify(PLATFORMS_FAILED_TOAST, Severity::Danger);
                options.platforms_error = Some(PLATFORMS_FAILED_TEXT.to_string());
            }
        }

        options
    }
}

/// State machine behind the catalog page.
pub struct SearchController {
    mode: SearchMode,
    page: u32,
    page_size: u32,
    last_issued: u64,
    has_previous: bool,
    has_next: bool,
    results: ResultsView,
    pagination: Option<Pagination>,
    filter_options: FilterOptions,
    notifier: Arc<dyn Notifier>,
}

impl SearchController {
    #[must_use]
    pub fn new(page_size: u32, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            mode: SearchMode::default(),
            page: 1,
            page_size: page_size.max(1),
            last_issued: 0,
            has_previous: false,
            has_next: false,
            results: ResultsView::Idle,
            pagination: None,
            filter_options: FilterOptions::default(),
            notifier,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> &SearchMode {
        &self.mode
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    #[must_use]
    pub const fn results(&self) -> &ResultsView {
        &self.results
    }

    /// Rendered result cards, for refreshing their favorite icons.
    pub fn cards_mut(&mut self) -> Option<&mut Vec<GameCard>> {
        match &mut self.results {
            ResultsView::Results(cards) => Some(cards),
            _ => None,
        }
    }

    #[must_use]
    pub const fn pagination(&self) -> Option<&Pagination> {
        self.pagination.as_ref()
    }

    #[must_use]
    pub const fn filter_options(&self) -> &FilterOptions {
        &self.filter_options
    }

    pub fn set_filter_options(&mut self, options: FilterOptions) {
        self.filter_options = options;
    }

    /// Whether any search has been issued yet.
    #[must_use]
    pub const fn has_searched(&self) -> bool {
        self.last_issued > 0
    }

    /// Current free-text query, empty outside free-text mode.
    #[must_use]
    pub fn query(&self) -> &str {
        match &self.mode {
            SearchMode::FreeText(query) => query,
            _ => "",
        }
    }

    /// Quick filter button to highlight.
    ///
    /// Unfiltered browsing falls back to popular ordering, so it highlights
    /// `Popular`.
    #[must_use]
    pub fn active_quick_filter(&self) -> Option<QuickFilter> {
        match &self.mode {
            SearchMode::Quick(filter) => Some(*filter),
            SearchMode::Modal { genres, platforms } if genres.is_empty() && platforms.is_empty() => {
                Some(QuickFilter::Popular)
            }
            _ => None,
        }
    }

    /// Whether `slug` is a selected genre in the filter dialog.
    #[must_use]
    pub fn is_genre_selected(&self, slug: &Slug) -> bool {
        matches!(&self.mode, SearchMode::Modal { genres, .. } if genres.contains(slug))
    }

    /// Whether `slug` is a selected platform in the filter dialog.
    #[must_use]
    pub fn is_platform_selected(&self, slug: &Slug) -> bool {
        matches!(&self.mode, SearchMode::Modal { platforms, .. } if platforms.contains(slug))
    }

    /// The request the current mode and page produce.
    #[must_use]
    pub fn params(&self) -> SearchParams {
        let mut params = SearchParams {
            page: self.page,
            ..SearchParams::new(self.page_size)
        };

        match &self.mode {
            SearchMode::FreeText(query) => params.search = Some(query.clone()),
            SearchMode::Quick(filter) => params.ordering = filter.sort_key(),
            SearchMode::Modal { genres, platforms } => {
                params.genres.clone_from(genres);
                params.platforms.clone_from(platforms);
                if genres.is_empty() && platforms.is_empty() {
                    params.ordering = Some(SortKey::Rating);
                }
            }
        }

        params
    }

    /// First load of the page: popular games.
    pub fn initial_load(&mut self) -> SearchTicket {
        self.enter(SearchMode::Quick(QuickFilter::Popular))
    }

    /// Search by text. A blank query goes back to popular games.
    pub fn submit_free_text(&mut self, text: &str) -> SearchTicket {
        let query = text.trim();
        if query.is_empty() {
            self.enter(SearchMode::Quick(QuickFilter::Popular))
        } else {
            self.enter(SearchMode::FreeText(query.to_string()))
        }
    }

    pub fn select_quick_filter(&mut self, filter: QuickFilter) -> SearchTicket {
        self.enter(SearchMode::Quick(filter))
    }

    /// Filter by genres and platforms. Duplicates and blank slugs are dropped.
    pub fn apply_filters(&mut self, genres: Vec<Slug>, platforms: Vec<Slug>) -> SearchTicket {
        self.enter(SearchMode::Modal {
            genres: dedup_slugs(genres),
            platforms: dedup_slugs(platforms),
        })
    }

    /// Drop every filter and the query, back to the default listing.
    pub fn clear_filters(&mut self) -> SearchTicket {
        self.enter(SearchMode::default())
    }

    /// Move to another page of the current search.
    ///
    /// Returns `None` when the target is not available: no previous or next
    /// page according to the catalog, or a number that is the current page
    /// or not offered by the pagination controls.
    pub fn paginate(&mut self, target: PageTarget) -> Option<SearchTicket> {
        let page = match target {
            PageTarget::Previous if self.has_previous && self.page > 1 => self.page - 1,
            PageTarget::Next if self.has_next => self.page.saturating_add(1),
            PageTarget::Number(page)
                if self
                    .pagination
                    .as_ref()
                    .is_some_and(|pagination| pagination.is_navigable(page)) =>
            {
                page
            }
            _ => {
                tracing::debug!(?target, page = self.page, "Pagination request ignored");
                return None;
            }
        };

        self.page = page;
        Some(self.begin())
    }

    /// Re-run the current search, for example after a failure.
    pub fn retry(&mut self) -> SearchTicket {
        self.begin()
    }

    /// Apply the outcome of `ticket`.
    pub fn complete(
        &mut self,
        ticket: SearchTicket,
        outcome: Result<GamePage, CatalogError>,
    ) -> Completion {
        if ticket.seq != self.last_issued {
            tracing::info!(
                seq = ticket.seq,
                latest = self.last_issued,
                "Discarding stale search response"
            );
            return Completion::Stale;
        }

        match outcome {
            Ok(page) => {
                self.has_previous = page.previous.is_some();
                self.has_next = page.next.is_some();
                self.pagination = Pagination::build(
                    page.count,
                    ticket.params.page,
                    ticket.params.page_size,
                    self.has_previous,
                    self.has_next,
                );

                if page.results.is_empty() {
                    self.results = ResultsView::Empty(NO_RESULTS_TEXT.to_string());
                } else {
                    self.results =
                        ResultsView::Results(page.results.iter().map(GameCard::from_game).collect());
                }
                tracing::debug!(
                    seq = ticket.seq,
                    count = page.count,
                    shown = self.results.cards().len(),
                    "Search applied"
                );
            }
            Err(e) => {
                tracing::warn!(seq = ticket.seq, error = %e, "Search failed");
                self.has_previous = false;
                self.has_next = false;
                self.pagination = None;
                self.results = ResultsView::Failed(SEARCH_FAILED_TEXT.to_string());
                self.notifier.notify(SEARCH_FAILED_TOAST, Severity::Danger);
            }
        }

        Completion::Applied
    }

    /// Run `ticket` against `catalog` and apply the outcome.
    pub async fn perform<C: CatalogService>(&mut self, catalog: &C, ticket: SearchTicket) -> Completion {
        let outcome = catalog.search_games(&ticket.params).await;
        self.complete(ticket, outcome)
    }

    fn enter(&mut self, mode: SearchMode) -> SearchTicket {
        self.mode = mode;
        self.page = 1;
        self.begin()
    }

    fn begin(&mut self) -> SearchTicket {
        self.last_issued += 1;
        self.results = ResultsView::Loading;
        self.pagination = None;
        self.has_previous = false;
        self.has_next = false;

        let ticket = SearchTicket {
            seq: self.last_issued,
            params: self.params(),
        };
        tracing::debug!(seq = ticket.seq, params = ?ticket.params, "Search issued");
        ticket
    }
}

impl std::fmt::Debug for SearchController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchController")
            .field("mode", &self.mode)
            .field("page", &self.page)
            .field("page_size", &self.page_size)
            .field("last_issued", &self.last_issued)
            .field("results", &self.results)
            .finish_non_exhaustive()
    }
}

fn dedup_slugs(slugs: Vec<Slug>) -> Vec<Slug> {
    let mut unique: Vec<Slug> = Vec::with_capacity(slugs.len());
    for slug in slugs {
        if !slug.is_empty() && !unique.contains(&slug) {
            unique.push(slug);
        }
    }
    unique
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::Game;
    use crate::notify::ToastQueue;

    fn controller() -> (SearchController, ToastQueue) {
        let toasts = ToastQueue::new();
        (
            SearchController::new(DEFAULT_PAGE_SIZE, Arc::new(toasts.clone())),
            toasts,
        )
    }

    fn page(ids: &[u64], count: u64, next: bool, previous: bool) -> GamePage {
        GamePage {
            count,
            next: next.then(|| "https://api.rawg.io/api/games?page=next".to_string()),
            previous: previous.then(|| "https://api.rawg.io/api/games?page=prev".to_string()),
            results: ids
                .iter()
                .map(|&id| Game {
                    id,
                    name: Some(format!("Game {id}")),
                    background_image: None,
                    released: None,
                    rating: Some(4.0),
                    genres: Vec::new(),
                    platforms: Vec::new(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_initial_load_is_popular() {
        let (mut search, _) = controller();
        let ticket = search.initial_load();

        assert!(search.results().is_loading());
        assert_eq!(ticket.params().ordering, Some(SortKey::Rating));
        assert_eq!(ticket.params().page, 1);
        assert_eq!(ticket.params().page_size, 21);
        assert_eq!(search.active_quick_filter(), Some(QuickFilter::Popular));
    }

    #[test]
    fn test_free_text_drops_filters() {
        let (mut search, _) = controller();
        let _ = search.apply_filters(vec![Slug::from("action")], vec![Slug::from("pc")]);
        let ticket = search.submit_free_text("  zelda ");

        let params = ticket.params();
        assert_eq!(params.search.as_deref(), Some("zelda"));
        assert!(params.genres.is_empty());
        assert!(params.platforms.is_empty());
        assert!(params.ordering.is_none());
        assert_eq!(search.query(), "zelda");
        assert!(!search.is_genre_selected(&Slug::from("action")));
    }

    #[test]
    fn test_quick_filter_drops_query() {
        let (mut search, _) = controller();
        let _ = search.submit_free_text("zelda");
        let ticket = search.select_quick_filter(QuickFilter::New);

        assert!(ticket.params().search.is_none());
        assert_eq!(ticket.params().ordering, Some(SortKey::Added));
        assert_eq!(search.query(), "");

        let ticket = search.select_quick_filter(QuickFilter::All);
        assert!(ticket.params().ordering.is_none());
    }

    #[test]
    fn test_empty_modal_falls_back_to_rating() {
        let (mut search, _) = controller();
        let ticket = search.apply_filters(Vec::new(), Vec::new());
        assert_eq!(ticket.params().ordering, Some(SortKey::Rating));
        assert_eq!(search.active_quick_filter(), Some(QuickFilter::Popular));
    }

    #[test]
    fn test_modal_filters_dedupe() {
        let (mut search, _) = controller();
        let ticket = search.apply_filters(
            vec![Slug::from("rpg"), Slug::from("rpg"), Slug::from(" ")],
            vec![Slug::from("pc")],
        );
        assert_eq!(ticket.params().genres, vec![Slug::from("rpg")]);
        assert!(ticket.params().ordering.is_none());
        assert!(search.is_platform_selected(&Slug::from("pc")));
        assert_eq!(search.active_quick_filter(), None);
    }

    #[test]
    fn test_entering_mode_resets_page() {
        let (mut search, _) = controller();
        let ticket = search.initial_load();
        search.complete(ticket, Ok(page(&[1], 100, true, false)));
        let ticket = search.paginate(PageTarget::Next).unwrap();
        assert_eq!(ticket.params().page, 2);

        let ticket = search.select_quick_filter(QuickFilter::All);
        assert_eq!(ticket.params().page, 1);
    }

    #[test]
    fn test_empty_results_show_message_without_pagination() {
        let (mut search, _) = controller();
        let ticket = search.submit_free_text("nothing matches");
        assert_eq!(search.complete(ticket, Ok(page(&[], 0, false, false))), Completion::Applied);

        assert_eq!(search.results().message(), Some(NO_RESULTS_TEXT));
        assert!(search.pagination().is_none());
    }

    #[test]
    fn test_failure_shows_error_and_notifies() {
        let (mut search, toasts) = controller();
        let ticket = search.initial_load();
        search.complete(
            ticket,
            Err(CatalogError::Api {
                status: 500,
                message: "boom".to_string(),
            }),
        );

        assert!(!search.results().is_loading());
        assert_eq!(search.results().message(), Some(SEARCH_FAILED_TEXT));
        assert!(search.pagination().is_none());
        let toasts = toasts.drain();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].severity, Severity::Danger);
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let (mut search, _) = controller();
        let slow = search.submit_free_text("first");
        let fast = search.submit_free_text("second");

        assert_eq!(search.complete(fast, Ok(page(&[2], 1, false, false))), Completion::Applied);
        assert_eq!(search.complete(slow, Ok(page(&[1], 1, false, false))), Completion::Stale);

        assert_eq!(search.results().cards()[0].id().as_str(), "2");
    }

    #[test]
    fn test_pagination_follows_tokens() {
        let (mut search, _) = controller();
        let ticket = search.initial_load();
        search.complete(ticket, Ok(page(&[1, 2], 210, true, false)));

        assert!(search.paginate(PageTarget::Previous).is_none());
        assert!(search.paginate(PageTarget::Number(1)).is_none());

        let ticket = search.paginate(PageTarget::Number(4)).unwrap();
        assert_eq!(ticket.params().page, 4);
        assert_eq!(ticket.params().ordering, Some(SortKey::Rating));
        // Controls are gone until the page arrives
        assert!(search.paginate(PageTarget::Next).is_none());

        search.complete(ticket, Ok(page(&[3], 210, true, true)));
        let ticket = search.paginate(PageTarget::Previous).unwrap();
        assert_eq!(ticket.params().page, 3);
    }

    #[test]
    fn test_quick_filter_parse() {
        assert_eq!(QuickFilter::parse("Popular"), Some(QuickFilter::Popular));
        assert_eq!(QuickFilter::parse("new"), Some(QuickFilter::New));
        assert_eq!(QuickFilter::parse("best"), None);
    }
}
