//! RAWG REST API client.
//!
//! Reference data (genres, platforms) and per-game records are cached with
//! `moka`; search pages are always fetched fresh.

use std::sync::Arc;

use jm_games_core::ProductId;
use moka::future::Cache;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::cache::{CacheKey, CacheValue};
use super::types::{
    ErrorBody, GameDetails, GamePage, Genre, ListResponse, Platform, Screenshot, SearchParams,
};
use super::{CatalogError, CatalogService};
use crate::config::CatalogConfig;

/// Client for the RAWG games database.
///
/// Cheaply cloneable; clones share the HTTP pool and cache.
#[derive(Clone)]
pub struct RawgClient {
    inner: Arc<RawgClientInner>,
}

struct RawgClientInner {
    client: reqwest::Client,
    base_url: Url,
    api_key: SecretString,
    cache: Cache<CacheKey, CacheValue>,
}

impl RawgClient {
    /// Create a new RAWG client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.cache_ttl)
            .build();

        let client = reqwest::Client::builder()
            .user_agent(concat!("jm-games-storefront/", env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(RawgClientInner {
                client,
                base_url: config.base_url.clone(),
                api_key: config.api_key.clone(),
                cache,
            }),
        })
    }

    /// Build the URL for `segments` under the base URL, with the API key.
    fn endpoint(&self, segments: &[&str], params: &[(&str, String)]) -> Result<Url, CatalogError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| CatalogError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        url.query_pairs_mut()
            .append_pair("key", self.inner.api_key.expose_secret())
            .extend_pairs(params);
        Ok(url)
    }

    /// GET `url` and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, CatalogError> {
        let path = url.path().to_string();

        // reqwest errors embed the URL, which carries the API key
        let response = self
            .inner
            .client
            .get(url)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(CatalogError::RateLimited(retry_after));
        }

        let body = response
            .text()
            .await
            .map_err(reqwest::Error::without_url)?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                path = %path,
                body = %body.chars().take(500).collect::<String>(),
                "RAWG API returned non-success status"
            );
            return Err(api_error(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                path = %path,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse RAWG response"
            );
            CatalogError::Parse(e)
        })
    }
}

impl CatalogService for RawgClient {
    #[instrument(skip(self, params), fields(page = params.page, ordering = ?params.ordering))]
    async fn search_games(&self, params: &SearchParams) -> Result<GamePage, CatalogError> {
        let url = self.endpoint(&["games"], &params.query_pairs())?;
        let page: GamePage = self.get_json(url).await?;
        debug!(count = page.count, results = page.results.len(), "Search page fetched");
        Ok(page)
    }

    #[instrument(skip(self))]
    async fn get_genres(&self) -> Result<Vec<Genre>, CatalogError> {
        if let Some(CacheValue::Genres(genres)) = self.inner.cache.get(&CacheKey::Genres).await {
            debug!("Cache hit for genres");
            return Ok(genres);
        }

        let url = self.endpoint(&["genres"], &[])?;
        let list: ListResponse<Genre> = self.get_json(url).await?;

        self.inner
            .cache
            .insert(CacheKey::Genres, CacheValue::Genres(list.results.clone()))
            .await;

        Ok(list.results)
    }

    #[instrument(skip(self))]
    async fn get_platforms(&self) -> Result<Vec<Platform>, CatalogError> {
        if let Some(CacheValue::Platforms(platforms)) =
            self.inner.cache.get(&CacheKey::Platforms).await
        {
            debug!("Cache hit for platforms");
            return Ok(platforms);
        }

        let url = self.endpoint(&["platforms"], &[])?;
        let list: ListResponse<Platform> = self.get_json(url).await?;

        self.inner
            .cache
            .insert(
                CacheKey::Platforms,
                CacheValue::Platforms(list.results.clone()),
            )
            .await;

        Ok(list.results)
    }

    #[instrument(skip(self), fields(game_id = %id))]
    async fn get_game_details(&self, id: &ProductId) -> Result<GameDetails, CatalogError> {
        if id.is_empty() {
            return Err(CatalogError::MissingId);
        }

        let cache_key = CacheKey::Details(id.clone());
        if let Some(CacheValue::Details(details)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for game details");
            return Ok(*details);
        }

        let url = self.endpoint(&["games", id.as_str()], &[])?;
        let details: GameDetails = self.get_json(url).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Details(Box::new(details.clone())))
            .await;

        Ok(details)
    }

    #[instrument(skip(self), fields(game_id = %id))]
    async fn get_game_screenshots(&self, id: &ProductId) -> Result<Vec<Screenshot>, CatalogError> {
        if id.is_empty() {
            return Err(CatalogError::MissingId);
        }

        let cache_key = CacheKey::Screenshots(id.clone());
        if let Some(CacheValue::Screenshots(shots)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for screenshots");
            return Ok(shots);
        }

        let url = self.endpoint(&["games", id.as_str(), "screenshots"], &[])?;
        let list: ListResponse<Screenshot> = self.get_json(url).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Screenshots(list.results.clone()))
            .await;

        Ok(list.results)
    }
}

impl std::fmt::Debug for RawgClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawgClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

/// Build an API error, preferring the body's `detail` message.
fn api_error(status: StatusCode, body: &str) -> CatalogError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|err| err.detail.or(err.error))
        .filter(|message| !message.is_empty())
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| body.chars().take(200).collect());

    CatalogError::Api {
        status: status.as_u16(),
        message,
    }
}
