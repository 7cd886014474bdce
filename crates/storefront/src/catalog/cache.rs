//! Cache types for RAWG API responses.

use jm_games_core::ProductId;

use super::types::{GameDetails, Genre, Platform, Screenshot};

/// Cache key for reference data and game records.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Genres,
    Platforms,
    Details(ProductId),
    Screenshots(ProductId),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Genres(Vec<Genre>),
    Platforms(Vec<Platform>),
    Details(Box<GameDetails>),
    Screenshots(Vec<Screenshot>),
}
