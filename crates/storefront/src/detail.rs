//! Game detail page: one game's record, media and related games.

use jm_games_core::{PLACEHOLDER_IMAGE, Price, Product, ProductId};

use crate::affordance::{AffordanceBoard, AffordanceSurface, HeartButton, HeartIcon};
use crate::catalog::{CatalogError, CatalogService, GameDetails, Screenshot, SearchParams, SortKey};
use crate::search::card::{self, GameCard, UNKNOWN_NAME};

/// Related games fetched per detail page.
pub const RELATED_PAGE_SIZE: u32 = 16;

/// Screenshots shown inline; the rest are in the gallery dialog.
pub const INLINE_SCREENSHOTS: usize = 4;

/// Shown when a game has no genres to look up related games by.
pub const NO_GENRES_TEXT: &str =
    "Nenhum gênero encontrado para este jogo, impossível buscar relacionados.";

/// Shown when the related-games lookup returns nothing else.
pub const NO_RELATED_TEXT: &str = "Nenhum jogo relacionado encontrado.";

/// Shown when the related-games lookup fails.
pub const RELATED_FAILED_TEXT: &str = "Ocorreu um erro ao carregar jogos relacionados.";

/// Notification raised when a detail page cannot be loaded.
pub const DETAIL_FAILED_TOAST: &str =
    "Ocorreu um erro ao carregar os detalhes do jogo ou jogos relacionados.";

const DESCRIPTION_LIMIT: usize = 1000;
const NO_DESCRIPTION_TEXT: &str = "Sem descrição detalhada.";

/// Everything the detail page renders.
#[derive(Debug, Clone)]
pub struct GameDetailPage {
    pub details: GameDetails,
    pub product: Product,
    pub screenshots: Vec<Screenshot>,
    pub related: Vec<GameCard>,
    pub related_message: Option<String>,
    affordances: AffordanceBoard,
}

impl GameDetailPage {
    /// Load the game, its screenshots and related games.
    ///
    /// Related games share the game's genres, ordered by rating, with the
    /// game itself left out. Missing screenshots or a failed related lookup
    /// degrade the page instead of failing it.
    ///
    /// # Errors
    ///
    /// Returns an error if the game record cannot be fetched.
    #[tracing::instrument(skip(catalog), fields(game_id = %id))]
    pub async fn load<C: CatalogService>(catalog: &C, id: &ProductId) -> Result<Self, CatalogError> {
        if id.is_empty() {
            return Err(CatalogError::MissingId);
        }

        let (details, screenshots) =
            tokio::join!(catalog.get_game_details(id), catalog.get_game_screenshots(id));
        let details = details?;
        let screenshots = screenshots.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load screenshots");
            Vec::new()
        });

        let (related, related_message) = if details.genres.is_empty() {
            (Vec::new(), Some(NO_GENRES_TEXT.to_string()))
        } else {
            let params = SearchParams {
                genres: details.genres.iter().map(|genre| genre.slug.clone()).collect(),
                ordering: Some(SortKey::Rating),
                ..SearchParams::new(RELATED_PAGE_SIZE)
            };
            match catalog.search_games(&params).await {
                Ok(page) => {
                    let related: Vec<GameCard> = page
                        .results
                        .iter()
                        .filter(|game| game.id != details.id)
                        .map(GameCard::from_game)
                        .collect();
                    let message = related.is_empty().then(|| NO_RELATED_TEXT.to_string());
                    (related, message)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to load related games");
                    (Vec::new(), Some(RELATED_FAILED_TEXT.to_string()))
                }
            }
        };

        let product = Product::new(
            details.id,
            details
                .name
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .unwrap_or(UNKNOWN_NAME),
            details.price(),
            details
                .background_image
                .as_deref()
                .filter(|image| !image.is_empty())
                .unwrap_or(PLACEHOLDER_IMAGE),
        );

        let mut affordances = AffordanceBoard::new();
        affordances.push(product.id.clone());

        Ok(Self {
            details,
            product,
            screenshots,
            related,
            related_message,
            affordances,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.product.name
    }

    /// Heart icon of the headline toggle.
    #[must_use]
    pub fn icon(&self) -> HeartIcon {
        self.affordances
            .icon_for(&self.product.id)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn heart(&self) -> HeartButton {
        HeartButton::new(self.product.clone(), self.icon())
    }

    /// Plain-text description, cut at 1000 characters.
    #[must_use]
    pub fn description(&self) -> String {
        let Some(raw) = self
            .details
            .description_raw
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
        else {
            return NO_DESCRIPTION_TEXT.to_string();
        };

        let mut chars = raw.chars();
        let head: String = chars.by_ref().take(DESCRIPTION_LIMIT).collect();
        if chars.next().is_some() {
            format!("{head}...")
        } else {
            head
        }
    }

    #[must_use]
    pub fn price_display(&self) -> String {
        Price::from_amount(self.product.unit_price).display()
    }

    #[must_use]
    pub fn released_display(&self) -> &str {
        self.details.released.as_deref().unwrap_or("N/A")
    }

    #[must_use]
    pub fn rating_display(&self) -> String {
        match self.details.rating {
            Some(rating) if rating > 0.0 => format!("{rating} / 5"),
            _ => "N/A".to_string(),
        }
    }

    #[must_use]
    pub fn stars(&self) -> String {
        card::stars(self.details.rating)
    }

    #[must_use]
    pub fn genre_names(&self) -> Vec<&str> {
        self.details.genres.iter().map(|g| g.name.as_str()).collect()
    }

    #[must_use]
    pub fn platform_names(&self) -> Vec<&str> {
        self.details
            .platforms
            .iter()
            .map(|p| p.platform.name.as_str())
            .collect()
    }

    #[must_use]
    pub fn developers_display(&self) -> String {
        join_names(self.details.developers.iter().map(|c| c.name.as_str()))
    }

    #[must_use]
    pub fn publishers_display(&self) -> String {
        join_names(self.details.publishers.iter().map(|c| c.name.as_str()))
    }

    #[must_use]
    pub fn website(&self) -> Option<&str> {
        self.details.website.as_deref().filter(|url| !url.is_empty())
    }

    #[must_use]
    pub fn clip_url(&self) -> Option<&str> {
        self.details.clip_url()
    }

    /// Screenshots shown inline under the main media.
    #[must_use]
    pub fn inline_screenshots(&self) -> &[Screenshot] {
        let end = self.screenshots.len().min(INLINE_SCREENSHOTS);
        self.screenshots.get(..end).unwrap_or_default()
    }
}

impl AffordanceSurface for GameDetailPage {
    fn rendered_product_ids(&self) -> Vec<ProductId> {
        let mut ids = self.affordances.rendered_product_ids();
        ids.extend(self.related.rendered_product_ids());
        ids
    }

    fn set_favorited(&mut self, id: &ProductId, favorited: bool) {
        self.affordances.set_favorited(id, favorited);
        self.related.set_favorited(id, favorited);
    }
}

fn join_names<'a>(names: impl Iterator<Item = &'a str>) -> String {
    let joined = names.collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        "N/A".to_string()
    } else {
        joined
    }
}
