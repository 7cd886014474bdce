//! Result cards: one catalog game ready to render.

use jm_games_core::{PLACEHOLDER_IMAGE, Price, Product, ProductId};
use serde::Serialize;

use crate::affordance::{AffordanceSurface, FavoriteAffordance, HeartButton, HeartIcon};
use crate::catalog::Game;

/// Name shown for games the catalog returns without one.
pub const UNKNOWN_NAME: &str = "Nome Desconhecido";

/// A game card with its cart data and favorite toggle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameCard {
    pub product: Product,
    pub released: Option<String>,
    pub rating: Option<f64>,
    pub favorite: FavoriteAffordance,
}

impl GameCard {
    /// Build the card for a listed game. Its heart icon starts stale.
    #[must_use]
    pub fn from_game(game: &Game) -> Self {
        let name = game
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_NAME);
        let image = game
            .background_image
            .as_deref()
            .filter(|image| !image.is_empty())
            .unwrap_or(PLACEHOLDER_IMAGE);

        Self {
            product: Product::new(game.id, name, game.price(), image),
            released: game.released.clone(),
            rating: game.rating,
            favorite: FavoriteAffordance::new(game.id),
        }
    }

    #[must_use]
    pub const fn id(&self) -> &ProductId {
        &self.product.id
    }

    #[must_use]
    pub const fn icon(&self) -> HeartIcon {
        self.favorite.icon
    }

    #[must_use]
    pub fn heart(&self) -> HeartButton {
        HeartButton::new(self.product.clone(), self.icon())
    }

    #[must_use]
    pub fn price_display(&self) -> String {
        Price::from_amount(self.product.unit_price).display()
    }

    #[must_use]
    pub fn released_display(&self) -> &str {
        self.released.as_deref().unwrap_or("N/A")
    }

    #[must_use]
    pub fn rating_display(&self) -> String {
        rating_display(self.rating)
    }

    #[must_use]
    pub fn stars(&self) -> String {
        stars(self.rating)
    }

    #[must_use]
    pub fn detail_href(&self) -> String {
        format!("/games/{}", self.product.id)
    }
}

impl AffordanceSurface for Vec<GameCard> {
    fn rendered_product_ids(&self) -> Vec<ProductId> {
        self.iter().map(|card| card.product.id.clone()).collect()
    }

    fn set_favorited(&mut self, id: &ProductId, favorited: bool) {
        for card in self.iter_mut().filter(|card| &card.product.id == id) {
            card.favorite.icon = HeartIcon::from_favorited(favorited);
        }
    }
}

/// `4.47` style rating, or `N/A` for unrated games.
#[must_use]
pub fn rating_display(rating: Option<f64>) -> String {
    match rating {
        Some(rating) if rating > 0.0 => format!("{rating}"),
        _ => "N/A".to_string(),
    }
}

/// One star per rating point, rounded.
#[must_use]
pub fn stars(rating: Option<f64>) -> String {
    let rating = rating.unwrap_or(0.0).round().clamp(0.0, 5.0);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to 0..=5
    let count = rating as usize;
    "⭐".repeat(count)
}
