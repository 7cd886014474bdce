//! Favorite-toggle affordances rendered on a page.
//!
//! Every heart icon shown next to a game is a [`FavoriteAffordance`]. Icon
//! state is written only from the favorites engine's membership answer,
//! never flipped locally, so a rendered icon cannot drift from storage.

use jm_games_core::{Product, ProductId};
use serde::Serialize;

/// Heart icon state of a favorite toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeartIcon {
    #[default]
    Outline,
    Filled,
}

impl HeartIcon {
    #[must_use]
    pub const fn from_favorited(favorited: bool) -> Self {
        if favorited { Self::Filled } else { Self::Outline }
    }

    #[must_use]
    pub const fn is_filled(self) -> bool {
        matches!(self, Self::Filled)
    }

    /// Bootstrap Icons class for this state.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Outline => "bi-heart",
            Self::Filled => "bi-heart-fill",
        }
    }

    /// Accessible label describing what pressing the toggle does.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Outline => "Adicionar aos favoritos",
            Self::Filled => "Remover dos favoritos",
        }
    }
}

/// A single favorite toggle bound to one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FavoriteAffordance {
    pub product_id: ProductId,
    pub icon: HeartIcon,
}

impl FavoriteAffordance {
    /// A freshly rendered toggle; its icon is stale until refreshed.
    #[must_use]
    pub fn new(product_id: impl Into<ProductId>) -> Self {
        Self {
            product_id: product_id.into(),
            icon: HeartIcon::Outline,
        }
    }
}

/// A heart toggle as drawn: the product it submits and its icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeartButton {
    pub product: Product,
    pub icon: HeartIcon,
}

impl HeartButton {
    #[must_use]
    pub const fn new(product: Product, icon: HeartIcon) -> Self {
        Self { product, icon }
    }
}

/// Anything that currently displays favorite toggles.
///
/// The favorites engine enumerates the rendered products and writes back
/// each icon from its membership set.
pub trait AffordanceSurface {
    /// Products that have a toggle on this surface, in render order.
    fn rendered_product_ids(&self) -> Vec<ProductId>;

    /// Set the icon of every toggle bound to `id`.
    fn set_favorited(&mut self, id: &ProductId, favorited: bool);
}

/// Toggles rendered outside a result grid, such as a detail page header.
#[derive(Debug, Clone, Default)]
pub struct AffordanceBoard {
    affordances: Vec<FavoriteAffordance>,
}

impl AffordanceBoard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Render a toggle for `id`.
    pub fn push(&mut self, id: impl Into<ProductId>) {
        self.affordances.push(FavoriteAffordance::new(id));
    }

    pub fn clear(&mut self) {
        self.affordances.clear();
    }

    /// Icon of the first toggle bound to `id`.
    #[must_use]
    pub fn icon_for(&self, id: &ProductId) -> Option<HeartIcon> {
        self.affordances
            .iter()
            .find(|affordance| &affordance.product_id == id)
            .map(|affordance| affordance.icon)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FavoriteAffordance> {
        self.affordances.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.affordances.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.affordances.is_empty()
    }
}

impl AffordanceSurface for AffordanceBoard {
    fn rendered_product_ids(&self) -> Vec<ProductId> {
        self.affordances
            .iter()
            .map(|affordance| affordance.product_id.clone())
            .collect()
    }

    fn set_favorited(&mut self, id: &ProductId, favorited: bool) {
        for affordance in self
            .affordances
            .iter_mut()
            .filter(|affordance| &affordance.product_id == id)
        {
            affordance.icon = HeartIcon::from_favorited(favorited);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_affordance_starts_outline() {
        let affordance = FavoriteAffordance::new(3498_u64);
        assert_eq!(affordance.icon, HeartIcon::Outline);
        assert_eq!(affordance.product_id.as_str(), "3498");
    }

    #[test]
    fn test_set_favorited_updates_every_matching_toggle() {
        let mut board = AffordanceBoard::new();
        board.push("1");
        board.push("2");
        board.push("1");

        board.set_favorited(&ProductId::from("1"), true);

        let filled: Vec<_> = board.iter().map(|a| a.icon.is_filled()).collect();
        assert_eq!(filled, vec![true, false, true]);
    }

    #[test]
    fn test_icon_for_unknown_product() {
        let board = AffordanceBoard::new();
        assert_eq!(board.icon_for(&ProductId::from("9")), None);
        assert!(board.is_empty());
    }

    #[test]
    fn test_css_class() {
        assert_eq!(HeartIcon::from_favorited(true).css_class(), "bi-heart-fill");
        assert_eq!(HeartIcon::from_favorited(false).css_class(), "bi-heart");
    }
}
