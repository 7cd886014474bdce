//! View binding: shopper interactions in, engine calls out.
//!
//! [`ViewBinder`] validates raw affordance data at the boundary, routes each
//! [`UiEvent`] to the cart, favorites or search component, and rewrites heart
//! icons on every rendered surface after membership changes or a new result
//! set lands.

use std::sync::Arc;

use jm_games_core::{Product, ProductError, ProductId, Severity, Slug};
use serde::Deserialize;

use crate::affordance::AffordanceSurface;
use crate::cart::CartEngine;
use crate::catalog::{CatalogError, CatalogService, GamePage};
use crate::detail::{DETAIL_FAILED_TOAST, GameDetailPage};
use crate::favorites::FavoritesEngine;
use crate::notify::Notifier;
use crate::search::card::GameCard;
use crate::search::{Completion, PageTarget, QuickFilter, SearchController, SearchTicket};

const INVALID_CART_DATA_TOAST: &str = "Erro: Dados do produto inválidos para o carrinho.";
const INVALID_FAVORITE_DATA_TOAST: &str = "Erro: Dados do produto inválidos para favoritos.";
const MISSING_GAME_ID_TOAST: &str =
    "ERRO: ID do jogo não especificado. Volte para a página inicial e tente novamente.";

/// Raw attributes carried by an add-to-cart or favorite affordance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AffordanceData {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl AffordanceData {
    /// Validate into a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the id, name or price is missing or malformed.
    pub fn product(&self) -> Result<Product, ProductError> {
        Product::parse(
            self.id.as_deref(),
            self.name.as_deref(),
            self.price.as_deref(),
            self.image.as_deref(),
        )
    }
}

impl From<&Product> for AffordanceData {
    fn from(product: &Product) -> Self {
        Self {
            id: Some(product.id.to_string()),
            name: Some(product.name.clone()),
            price: Some(product.unit_price.to_string()),
            image: Some(product.image_ref.clone()),
        }
    }
}

/// A shopper interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    AddToCart(AffordanceData),
    ToggleFavorite(AffordanceData),
    RemoveCartLine(ProductId),
    /// Quantity field change, with the field's raw text.
    UpdateQuantity { id: ProductId, raw: String },
    RemoveFavorite(ProductId),
    ClearCart,
    ClearFavorites,
    /// Search form submit or Enter in the search field.
    SubmitSearch(String),
    QuickFilter(QuickFilter),
    ApplyFilters { genres: Vec<Slug>, platforms: Vec<Slug> },
    ClearFilters,
    Paginate(PageTarget),
    RetrySearch,
}

/// What is left to do after [`ViewBinder::dispatch`].
#[derive(Debug)]
#[must_use]
pub enum Dispatch {
    /// The event was fully handled.
    Done,
    /// A catalog search must run and be passed to
    /// [`ViewBinder::complete_search`].
    Search(SearchTicket),
}

/// Routes shopper interactions to the engines and keeps heart icons in sync.
pub struct ViewBinder {
    cart: CartEngine,
    favorites: FavoritesEngine,
    search: SearchController,
    detail: Option<GameDetailPage>,
    notifier: Arc<dyn Notifier>,
}

impl ViewBinder {
    #[must_use]
    pub fn new(
        cart: CartEngine,
        favorites: FavoritesEngine,
        search: SearchController,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            cart,
            favorites,
            search,
            detail: None,
            notifier,
        }
    }

    #[must_use]
    pub const fn cart(&self) -> &CartEngine {
        &self.cart
    }

    #[must_use]
    pub const fn favorites(&self) -> &FavoritesEngine {
        &self.favorites
    }

    #[must_use]
    pub const fn search(&self) -> &SearchController {
        &self.search
    }

    pub const fn search_mut(&mut self) -> &mut SearchController {
        &mut self.search
    }

    #[must_use]
    pub const fn detail(&self) -> Option<&GameDetailPage> {
        self.detail.as_ref()
    }

    /// Handle one interaction.
    ///
    /// Cart and favorites events complete synchronously. Search events
    /// return a ticket; the caller runs it and hands the outcome back.
    pub fn dispatch(&mut self, event: UiEvent) -> Dispatch {
        tracing::debug!(?event, "Dispatching UI event");
        match event {
            UiEvent::AddToCart(data) => {
                self.add_to_cart(&data);
                Dispatch::Done
            }
            UiEvent::ToggleFavorite(data) => {
                let _ = self.toggle_favorite(&data);
                Dispatch::Done
            }
            UiEvent::RemoveCartLine(id) => {
                self.cart.remove_item(id);
                Dispatch::Done
            }
            UiEvent::UpdateQuantity { id, raw } => {
                self.cart.update_quantity(id, &raw);
                Dispatch::Done
            }
            UiEvent::RemoveFavorite(id) => {
                self.favorites.remove(&id);
                let mut surfaces = Surfaces {
                    cards: self.search.cards_mut(),
                    detail: self.detail.as_mut(),
                };
                self.favorites.sync_affordances(&id, &mut surfaces);
                Dispatch::Done
            }
            UiEvent::ClearCart => {
                self.cart.clear();
                Dispatch::Done
            }
            UiEvent::ClearFavorites => {
                let mut surfaces = Surfaces {
                    cards: self.search.cards_mut(),
                    detail: self.detail.as_mut(),
                };
                self.favorites.clear(&mut surfaces);
                Dispatch::Done
            }
            UiEvent::SubmitSearch(text) => Dispatch::Search(self.search.submit_free_text(&text)),
            UiEvent::QuickFilter(filter) => {
                Dispatch::Search(self.search.select_quick_filter(filter))
            }
            UiEvent::ApplyFilters { genres, platforms } => {
                Dispatch::Search(self.search.apply_filters(genres, platforms))
            }
            UiEvent::ClearFilters => Dispatch::Search(self.search.clear_filters()),
            UiEvent::Paginate(target) => self
                .search
                .paginate(target)
                .map_or(Dispatch::Done, Dispatch::Search),
            UiEvent::RetrySearch => Dispatch::Search(self.search.retry()),
        }
    }

    /// Apply a search outcome and refresh the icons of the new cards.
    pub fn complete_search(
        &mut self,
        ticket: SearchTicket,
        outcome: Result<GamePage, CatalogError>,
    ) -> Completion {
        let completion = self.search.complete(ticket, outcome);
        if completion == Completion::Applied
            && let Some(cards) = self.search.cards_mut()
        {
            self.favorites.refresh_all_affordances(cards);
        }
        completion
    }

    /// Dispatch `event` and, when it starts a search, run it to completion.
    pub async fn run<C: CatalogService>(
        &mut self,
        catalog: &C,
        event: UiEvent,
    ) -> Option<Completion> {
        match self.dispatch(event) {
            Dispatch::Done => None,
            Dispatch::Search(ticket) => {
                let outcome = catalog.search_games(ticket.params()).await;
                Some(self.complete_search(ticket, outcome))
            }
        }
    }

    /// Show a loaded detail page, or report why it could not be loaded.
    ///
    /// Returns whether a page is now shown.
    pub fn show_detail(&mut self, outcome: Result<GameDetailPage, CatalogError>) -> bool {
        match outcome {
            Ok(mut page) => {
                self.favorites.refresh_all_affordances(&mut page);
                self.detail = Some(page);
                true
            }
            Err(CatalogError::MissingId) => {
                self.detail = None;
                self.notifier.notify(MISSING_GAME_ID_TOAST, Severity::Danger);
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load game details");
                self.detail = None;
                self.notifier.notify(DETAIL_FAILED_TOAST, Severity::Danger);
                false
            }
        }
    }

    /// Load the detail page for `id` and show it.
    pub async fn open_detail<C: CatalogService>(&mut self, catalog: &C, id: &ProductId) -> bool {
        let outcome = GameDetailPage::load(catalog, id).await;
        self.show_detail(outcome)
    }

    /// Leave the detail page; its toggles are no longer rendered.
    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    fn add_to_cart(&mut self, data: &AffordanceData) {
        let product = match data.product() {
            Ok(product) => product,
            Err(e) => {
                tracing::warn!(error = %e, ?data, "Rejected add-to-cart affordance");
                self.notifier
                    .notify(INVALID_CART_DATA_TOAST, Severity::Danger);
                return;
            }
        };

        if let Err(e) = self.cart.add_item(product) {
            tracing::warn!(error = %e, "Cart rejected product");
            self.notifier
                .notify(INVALID_CART_DATA_TOAST, Severity::Danger);
        }
    }

    /// Toggle the favorite carried by a heart affordance.
    ///
    /// Returns the validated product and whether it is now favorited, or
    /// `None` after showing the invalid-data toast.
    pub fn toggle_favorite(&mut self, data: &AffordanceData) -> Option<(Product, bool)> {
        let product = match data.product() {
            Ok(product) => product,
            Err(e) => {
                tracing::warn!(error = %e, ?data, "Rejected favorite affordance");
                self.notifier
                    .notify(INVALID_FAVORITE_DATA_TOAST, Severity::Danger);
                return None;
            }
        };

        match self.favorites.toggle(product.clone()) {
            Ok(favorited) => {
                self.surfaces().set_favorited(&product.id, favorited);
                Some((product, favorited))
            }
            Err(e) => {
                tracing::warn!(error = %e, ?data, "Favorites rejected product");
                self.notifier
                    .notify(INVALID_FAVORITE_DATA_TOAST, Severity::Danger);
                None
            }
        }
    }

    fn surfaces(&mut self) -> Surfaces<'_> {
        Surfaces {
            cards: self.search.cards_mut(),
            detail: self.detail.as_mut(),
        }
    }
}

impl std::fmt::Debug for ViewBinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewBinder")
            .field("cart", &self.cart)
            .field("favorites", &self.favorites)
            .field("search", &self.search)
            .field("detail_open", &self.detail.is_some())
            .finish_non_exhaustive()
    }
}

/// Every surface currently rendering heart toggles.
struct Surfaces<'a> {
    cards: Option<&'a mut Vec<GameCard>>,
    detail: Option<&'a mut GameDetailPage>,
}

impl AffordanceSurface for Surfaces<'_> {
    fn rendered_product_ids(&self) -> Vec<ProductId> {
        let mut ids = self
            .cards
            .as_deref()
            .map(|cards| cards.rendered_product_ids())
            .unwrap_or_default();
        if let Some(detail) = self.detail.as_deref() {
            ids.extend(detail.rendered_product_ids());
        }
        ids
    }

    fn set_favorited(&mut self, id: &ProductId, favorited: bool) {
        if let Some(cards) = self.cards.as_deref_mut() {
            cards.set_favorited(id, favorited);
        }
        if let Some(detail) = self.detail.as_deref_mut() {
            detail.set_favorited(id, favorited);
        }
    }
}
