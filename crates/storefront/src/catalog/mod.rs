//! Game catalog collaborator.
//!
//! [`CatalogService`] is the seam the search controller and detail page
//! talk through; [`RawgClient`] implements it against the RAWG REST API.

mod cache;
mod rawg;
pub mod types;

use std::future::Future;

use jm_games_core::ProductId;
use thiserror::Error;

pub use rawg::RawgClient;
pub use types::{
    Clip, Company, Game, GameDetails, GamePage, Genre, Platform, PlatformEntry, Screenshot,
    SearchParams, SortKey,
};

/// Errors that can occur when talking to the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// JSON parsing failed.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// A game lookup was attempted without an id.
    #[error("Game id is required")]
    MissingId,
}

impl CatalogError {
    /// Whether the API reported the resource as missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }
}

/// Read access to the game catalog.
pub trait CatalogService: Send + Sync {
    /// One page of games matching `params`.
    fn search_games(
        &self,
        params: &SearchParams,
    ) -> impl Future<Output = Result<GamePage, CatalogError>> + Send;

    /// All genres.
    fn get_genres(&self) -> impl Future<Output = Result<Vec<Genre>, CatalogError>> + Send;

    /// All platforms.
    fn get_platforms(&self) -> impl Future<Output = Result<Vec<Platform>, CatalogError>> + Send;

    /// Full record for one game.
    fn get_game_details(
        &self,
        id: &ProductId,
    ) -> impl Future<Output = Result<GameDetails, CatalogError>> + Send;

    /// Screenshots for one game.
    fn get_game_screenshots(
        &self,
        id: &ProductId,
    ) -> impl Future<Output = Result<Vec<Screenshot>, CatalogError>> + Send;
}
