//! Integration tests for the JM Games storefront.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process scenarios (no network)
//! cargo test -p jm-games-integration-tests
//!
//! # Live HTTP scenarios against a running storefront
//! STOREFRONT_BASE_URL=http://localhost:3000 cargo test -p jm-games-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `shopper_flows` - cart, favorites and search driven through the view binder
//! - `persistence` - shopper state surviving a restart
//! - `storefront_http` - HTTP routes of a running server

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use jm_games_core::ProductId;
use jm_games_storefront::binding::ViewBinder;
use jm_games_storefront::cart::CartEngine;
use jm_games_storefront::catalog::{
    CatalogError, CatalogService, Game, GameDetails, GamePage, Genre, Platform, Screenshot,
    SearchParams,
};
use jm_games_storefront::favorites::FavoritesEngine;
use jm_games_storefront::notify::{Notifier, ToastQueue};
use jm_games_storefront::search::{DEFAULT_PAGE_SIZE, SearchController};
use jm_games_storefront::storage::PersistentStore;

/// A listed game with only the fields the storefront reads.
#[must_use]
pub fn game(id: u64, name: &str) -> Game {
    Game {
        id,
        name: Some(name.to_string()),
        background_image: Some(format!("https://media.rawg.io/media/games/{id}.jpg")),
        released: Some("2020-01-01".to_string()),
        rating: Some(4.0),
        genres: Vec::new(),
        platforms: Vec::new(),
    }
}

/// One results page holding `games`, with `count` results in total.
#[must_use]
pub fn page_of(games: Vec<Game>, count: u64, has_next: bool) -> GamePage {
    GamePage {
        count,
        next: has_next.then(|| "https://api.rawg.io/api/games?page=2".to_string()),
        previous: None,
        results: games,
    }
}

/// In-memory catalog returning canned responses.
///
/// Every search is recorded so tests can assert on the parameters sent.
#[derive(Debug, Default)]
pub struct MockCatalog {
    pub page: Mutex<Option<GamePage>>,
    pub genres: Vec<Genre>,
    pub platforms: Vec<Platform>,
    pub details: HashMap<String, GameDetails>,
    pub searches: Mutex<Vec<SearchParams>>,
}

impl MockCatalog {
    /// A catalog whose searches all return `page`.
    #[must_use]
    pub fn with_page(page: GamePage) -> Self {
        Self {
            page: Mutex::new(Some(page)),
            ..Self::default()
        }
    }

    /// Parameters of every search received so far.
    #[must_use]
    pub fn searches(&self) -> Vec<SearchParams> {
        self.searches
            .lock()
            .map(|searches| searches.clone())
            .unwrap_or_default()
    }
}

impl CatalogService for MockCatalog {
    async fn search_games(&self, params: &SearchParams) -> Result<GamePage, CatalogError> {
        if let Ok(mut searches) = self.searches.lock() {
            searches.push(params.clone());
        }
        self.page
            .lock()
            .ok()
            .and_then(|page| page.clone())
            .ok_or_else(|| CatalogError::Api {
                status: 503,
                message: "catalog unavailable".to_string(),
            })
    }

    async fn get_genres(&self) -> Result<Vec<Genre>, CatalogError> {
        Ok(self.genres.clone())
    }

    async fn get_platforms(&self) -> Result<Vec<Platform>, CatalogError> {
        Ok(self.platforms.clone())
    }

    async fn get_game_details(&self, id: &ProductId) -> Result<GameDetails, CatalogError> {
        self.details
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| CatalogError::Api {
                status: 404,
                message: "Not found.".to_string(),
            })
    }

    async fn get_game_screenshots(&self, _id: &ProductId) -> Result<Vec<Screenshot>, CatalogError> {
        Ok(Vec::new())
    }
}

/// A shopper session wired the way the server wires it.
pub struct Session {
    pub binder: ViewBinder,
    pub toasts: ToastQueue,
}

impl Session {
    /// Restore a session from `store`.
    #[must_use]
    pub fn open(store: &PersistentStore) -> Self {
        let toasts = ToastQueue::new();
        let notifier: Arc<dyn Notifier> = Arc::new(toasts.clone());
        let cart = CartEngine::load(store.clone(), Arc::clone(&notifier));
        let favorites = FavoritesEngine::load(store.clone(), Arc::clone(&notifier));
        let search = SearchController::new(DEFAULT_PAGE_SIZE, Arc::clone(&notifier));
        Self {
            binder: ViewBinder::new(cart, favorites, search, notifier),
            toasts,
        }
    }
}

/// Base URL of a running storefront (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}
