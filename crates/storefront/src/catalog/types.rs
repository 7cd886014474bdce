//! RAWG wire types and search parameters.

use jm_games_core::{Slug, simulated_price};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Sort order accepted by the `ordering` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Rating,
    Added,
    Released,
}

impl SortKey {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rating => "-rating",
            Self::Added => "-added",
            Self::Released => "-released",
        }
    }

    /// Parse an `ordering` value.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "-rating" => Some(Self::Rating),
            "-added" => Some(Self::Added),
            "-released" => Some(Self::Released),
            _ => None,
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query for the `games` endpoint.
///
/// Empty fields are left out of the request entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub search: Option<String>,
    pub genres: Vec<Slug>,
    pub platforms: Vec<Slug>,
    pub ordering: Option<SortKey>,
    pub page: u32,
    pub page_size: u32,
}

impl SearchParams {
    /// First page of `page_size` with no filters.
    #[must_use]
    pub const fn new(page_size: u32) -> Self {
        Self {
            search: None,
            genres: Vec::new(),
            platforms: Vec::new(),
            ordering: None,
            page: 1,
            page_size,
        }
    }

    /// Query string pairs, without the API key.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        if !self.genres.is_empty() {
            pairs.push(("genres", join_slugs(&self.genres)));
        }
        if !self.platforms.is_empty() {
            pairs.push(("platforms", join_slugs(&self.platforms)));
        }
        if let Some(ordering) = self.ordering {
            pairs.push(("ordering", ordering.as_str().to_string()));
        }
        pairs.push(("page", self.page.to_string()));
        pairs.push(("page_size", self.page_size.to_string()));
        pairs
    }
}

fn join_slugs(slugs: &[Slug]) -> String {
    slugs.iter().map(Slug::as_str).collect::<Vec<_>>().join(",")
}

/// One page of `games` results.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GamePage {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub results: Vec<Game>,
}

/// A game as listed in search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub background_image: Option<String>,
    #[serde(default)]
    pub released: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub genres: Vec<Genre>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub platforms: Vec<PlatformEntry>,
}

impl Game {
    /// Price shown for the game; the catalog itself carries none.
    #[must_use]
    pub fn price(&self) -> Decimal {
        simulated_price(self.id)
    }
}

/// A genre, from the `genres` endpoint or embedded in a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub slug: Slug,
    pub name: String,
}

/// A platform, from the `platforms` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub id: u64,
    pub slug: Slug,
    pub name: String,
}

/// Platform wrapper used inside game payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformEntry {
    pub platform: Platform,
}

/// Developer or publisher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: u64,
    pub name: String,
}

/// Gameplay video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clip {
    #[serde(default)]
    pub clip: Option<String>,
}

/// Full record from `games/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameDetails {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description_raw: Option<String>,
    #[serde(default)]
    pub released: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub background_image: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub clip: Option<Clip>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub genres: Vec<Genre>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub platforms: Vec<PlatformEntry>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub developers: Vec<Company>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub publishers: Vec<Company>,
}

impl GameDetails {
    #[must_use]
    pub fn price(&self) -> Decimal {
        simulated_price(self.id)
    }

    /// URL of the gameplay clip, when the game has one.
    #[must_use]
    pub fn clip_url(&self) -> Option<&str> {
        self.clip
            .as_ref()
            .and_then(|clip| clip.clip.as_deref())
            .filter(|url| !url.is_empty())
    }
}

/// A screenshot from `games/{id}/screenshots`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screenshot {
    pub image: String,
}

/// Envelope of list endpoints; only `results` is used.
#[derive(Debug, Deserialize)]
pub(crate) struct ListResponse<T> {
    #[serde(
        default = "Vec::new",
        deserialize_with = "null_as_empty",
        bound(deserialize = "T: Deserialize<'de>")
    )]
    pub results: Vec<T>,
}

/// Error body returned by the API.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
