//! Favorites engine: the shopper's favorited products, persisted under
//! [`keys::FAVORITES`].
//!
//! Membership is the only state. Heart icons on any [`AffordanceSurface`]
//! are written from [`FavoritesEngine::is_favorited`] and never flipped on
//! their own.

use std::sync::Arc;

use jm_games_core::{FavoriteEntry, Product, ProductId, Severity};
use serde::Serialize;

use crate::affordance::AffordanceSurface;
use crate::cart::EngineError;
use crate::notify::Notifier;
use crate::storage::{PersistentStore, keys};

/// Text shown when there are no favorites.
pub const EMPTY_FAVORITES_TEXT: &str = "Nenhum item favorito ainda.";

/// Everything a favorites view needs to draw its list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FavoritesSnapshot {
    pub entries: Vec<FavoriteEntry>,
    pub count: usize,
}

impl FavoritesSnapshot {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Placeholder shown in the drawer while there are no favorites.
    #[must_use]
    pub const fn empty_text(&self) -> &'static str {
        EMPTY_FAVORITES_TEXT
    }
}

/// Render target for the favorites list.
pub trait FavoritesView: Send {
    fn render(&mut self, snapshot: &FavoritesSnapshot);
}

/// The shopper's favorites.
pub struct FavoritesEngine {
    entries: Vec<FavoriteEntry>,
    store: PersistentStore,
    notifier: Arc<dyn Notifier>,
    view: Option<Box<dyn FavoritesView>>,
}

impl FavoritesEngine {
    /// Load persisted favorites, dropping undecodable entries, blank and
    /// duplicate ids, and prices out of range.
    pub fn load(store: PersistentStore, notifier: Arc<dyn Notifier>) -> Self {
        let stored: Vec<serde_json::Value> = store.load(keys::FAVORITES, Vec::new());
        let mut entries: Vec<FavoriteEntry> = Vec::with_capacity(stored.len());
        for raw in stored {
            let entry: FavoriteEntry = match serde_json::from_value(raw) {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(error = %e, "Dropping undecodable stored favorite");
                    continue;
                }
            };
            if entry.product_id.is_empty()
                || entries.iter().any(|e| e.product_id == entry.product_id)
                || entry
                    .unit_price
                    .is_some_and(|price| Product::check_price(price).is_err())
            {
                tracing::warn!(product_id = %entry.product_id, "Dropping invalid stored favorite");
                continue;
            }
            entries.push(entry);
        }
        tracing::debug!(entries = entries.len(), "Favorites loaded");

        Self {
            entries,
            store,
            notifier,
            view: None,
        }
    }

    /// Attach a view and draw the current state into it.
    pub fn attach_view(&mut self, view: impl FavoritesView + 'static) {
        self.view = Some(Box::new(view));
        self.render();
    }

    #[must_use]
    pub fn entries(&self) -> &[FavoriteEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `id` is a favorite. Numeric and string ids compare equal.
    #[must_use]
    pub fn is_favorited(&self, id: impl Into<ProductId>) -> bool {
        let id = id.into();
        self.entries.iter().any(|entry| entry.product_id == id)
    }

    /// Flip membership of `product` and return whether it is now favorited.
    ///
    /// Callers set icon state from the returned value.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MissingIdentity`] if the product id is empty.
    /// Favorites are not touched in that case.
    pub fn toggle(&mut self, product: Product) -> Result<bool, EngineError> {
        if product.id.is_empty() {
            return Err(EngineError::MissingIdentity);
        }

        if let Some(index) = self
            .entries
            .iter()
            .position(|entry| entry.product_id == product.id)
        {
            let entry = self.entries.remove(index);
            self.commit();
            self.notifier.notify(
                &format!("\"{}\" removido dos favoritos.", entry.name),
                Severity::Info,
            );
            Ok(false)
        } else {
            let name = product.name.clone();
            self.entries.push(FavoriteEntry::from(product));
            self.commit();
            self.notifier.notify(
                &format!("\"{name}\" adicionado aos favoritos!"),
                Severity::Success,
            );
            Ok(true)
        }
    }

    /// Remove `id` if present. Removing an absent product does nothing.
    pub fn remove(&mut self, id: impl Into<ProductId>) {
        let id = id.into();
        let Some(index) = self.entries.iter().position(|entry| entry.product_id == id) else {
            tracing::debug!(product_id = %id, "Remove ignored, product not favorited");
            return;
        };

        let entry = self.entries.remove(index);
        self.commit();
        self.notifier.notify(
            &format!("\"{}\" removido dos favoritos.", entry.name),
            Severity::Info,
        );
    }

    /// Empty the list and reset every icon on `surface`.
    pub fn clear(&mut self, surface: &mut dyn AffordanceSurface) {
        self.entries.clear();
        self.commit();
        self.refresh_all_affordances(surface);
        self.notifier.notify("Lista de favoritos limpa.", Severity::Info);
    }

    /// Rewrite every icon on `surface` from current membership.
    pub fn refresh_all_affordances(&self, surface: &mut dyn AffordanceSurface) {
        for id in surface.rendered_product_ids() {
            let favorited = self.is_favorited(&id);
            surface.set_favorited(&id, favorited);
        }
    }

    /// Rewrite the icons bound to `id` on `surface`.
    pub fn sync_affordances(&self, id: &ProductId, surface: &mut dyn AffordanceSurface) {
        surface.set_favorited(id, self.is_favorited(id));
    }

    #[must_use]
    pub fn snapshot(&self) -> FavoritesSnapshot {
        FavoritesSnapshot {
            entries: self.entries.clone(),
            count: self.entries.len(),
        }
    }

    /// Redraw the attached view. Does nothing when no view is attached.
    pub fn render(&mut self) {
        let snapshot = self.snapshot();
        if let Some(view) = self.view.as_mut() {
            view.render(&snapshot);
        }
    }

    fn commit(&mut self) {
        if let Err(e) = self.store.save(keys::FAVORITES, &self.entries) {
            self.notifier.notify(
                &format!(
                    "Não foi possível salvar os favoritos ({e}). As alterações valem só para esta sessão."
                ),
                Severity::Warning,
            );
        }
        self.render();
    }
}

impl std::fmt::Debug for FavoritesEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesEngine")
            .field("entries", &self.entries)
            .field("store", &self.store)
            .field("view_attached", &self.view.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::affordance::{AffordanceBoard, HeartIcon};
    use crate::notify::ToastQueue;
    use crate::storage::MemoryStore;
    use crate::view::SnapshotSlot;
    use rust_decimal::Decimal;

    fn product(id: u64, name: &str) -> Product {
        Product::new(id, name, Decimal::new(148, 0), "/img.png")
    }

    fn engine() -> (FavoritesEngine, PersistentStore, ToastQueue) {
        let store = PersistentStore::new(MemoryStore::new());
        let toasts = ToastQueue::new();
        let favorites = FavoritesEngine::load(store.clone(), Arc::new(toasts.clone()));
        (favorites, store, toasts)
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let (mut favorites, _, toasts) = engine();

        assert!(favorites.toggle(product(3498, "GTA V")).unwrap());
        assert!(favorites.is_favorited(3498_u64));
        assert!(favorites.is_favorited("3498"));

        assert!(!favorites.toggle(product(3498, "GTA V")).unwrap());
        assert!(!favorites.is_favorited("3498"));

        let messages: Vec<_> = toasts.drain().into_iter().map(|t| t.message).collect();
        assert_eq!(
            messages,
            vec![
                "\"GTA V\" adicionado aos favoritos!",
                "\"GTA V\" removido dos favoritos."
            ]
        );
    }

    #[test]
    fn test_no_duplicate_entries() {
        let (mut favorites, _, _) = engine();
        favorites.toggle(product(1, "A")).unwrap();
        favorites.toggle(Product::new("1", "A", Decimal::ONE, "x")).unwrap();
        favorites.toggle(product(1, "A")).unwrap();
        assert_eq!(favorites.len(), 1);
    }

    #[test]
    fn test_remove_absent_is_silent() {
        let (mut favorites, _, toasts) = engine();
        favorites.remove("7");
        assert!(toasts.is_empty());
    }

    #[test]
    fn test_clear_resets_affordances() {
        let (mut favorites, store, toasts) = engine();
        favorites.toggle(product(1, "A")).unwrap();
        favorites.toggle(product(2, "B")).unwrap();
        let _ = toasts.drain();

        let mut board = AffordanceBoard::new();
        board.push(1_u64);
        board.push(2_u64);
        favorites.refresh_all_affordances(&mut board);
        assert!(board.iter().all(|a| a.icon == HeartIcon::Filled));

        favorites.clear(&mut board);

        assert!(board.iter().all(|a| a.icon == HeartIcon::Outline));
        let stored: Vec<FavoriteEntry> = store.load(keys::FAVORITES, vec![]);
        assert!(stored.is_empty());
        assert_eq!(toasts.drain().len(), 1);
    }

    #[test]
    fn test_sync_affordances_follows_membership() {
        let (mut favorites, _, _) = engine();
        let mut board = AffordanceBoard::new();
        board.push("5");

        favorites.toggle(product(5, "E")).unwrap();
        favorites.sync_affordances(&ProductId::from(5_u64), &mut board);
        assert_eq!(board.icon_for(&ProductId::from("5")), Some(HeartIcon::Filled));

        favorites.remove("5");
        favorites.sync_affordances(&ProductId::from("5"), &mut board);
        assert_eq!(board.icon_for(&ProductId::from("5")), Some(HeartIcon::Outline));
    }

    #[test]
    fn test_state_survives_reload() {
        let (mut favorites, store, _) = engine();
        favorites.toggle(product(10, "J")).unwrap();
        favorites.toggle(product(20, "K")).unwrap();

        let reloaded = FavoritesEngine::load(store, Arc::new(ToastQueue::new()));
        assert_eq!(reloaded.entries(), favorites.entries());
    }

    #[test]
    fn test_load_drops_duplicates() {
        let backend = MemoryStore::new();
        crate::storage::KeyValueStore::set(
            &backend,
            keys::FAVORITES,
            r#"[
                {"productId": 1, "name": "A", "imageRef": "a"},
                {"productId": "1", "name": "A", "imageRef": "a"},
                {"productId": "", "name": "Blank", "imageRef": "b"}
            ]"#,
        )
        .unwrap();

        let favorites =
            FavoritesEngine::load(PersistentStore::new(backend), Arc::new(ToastQueue::new()));
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites.entries()[0].unit_price, None);
    }

    #[test]
    fn test_load_keeps_valid_entries_beside_bad_ones() {
        let backend = MemoryStore::new();
        crate::storage::KeyValueStore::set(
            &backend,
            keys::FAVORITES,
            r#"[
                {"productId": 1, "name": "A", "unitPrice": 7.922816251426434e28, "imageRef": "a"},
                {"productId": 2, "imageRef": "b"},
                {"productId": 3, "name": "C", "unitPrice": 59.9, "imageRef": "c"}
            ]"#,
        )
        .unwrap();

        let favorites =
            FavoritesEngine::load(PersistentStore::new(backend), Arc::new(ToastQueue::new()));
        assert_eq!(favorites.len(), 1);
        assert!(favorites.is_favorited("3"));
    }

    #[test]
    fn test_toggle_without_identity_is_rejected() {
        let (mut favorites, store, toasts) = engine();

        let err = favorites
            .toggle(Product::new(" ", "Nameless", Decimal::ONE, "x"))
            .unwrap_err();

        assert_eq!(err, EngineError::MissingIdentity);
        assert!(favorites.is_empty());
        assert!(toasts.drain().is_empty());
        let stored: Vec<FavoriteEntry> = store.load(keys::FAVORITES, Vec::new());
        assert!(stored.is_empty());
    }

    #[test]
    fn test_failed_write_warns_and_keeps_memory() {
        let toasts = ToastQueue::new();
        let mut favorites = FavoritesEngine::load(
            PersistentStore::new(MemoryStore::with_quota(1)),
            Arc::new(toasts.clone()),
        );

        assert!(favorites.toggle(product(1, "A")).unwrap());
        assert!(favorites.is_favorited("1"));
        let severities: Vec<_> = toasts.drain().into_iter().map(|t| t.severity).collect();
        assert_eq!(severities, vec![Severity::Warning, Severity::Success]);
    }

    #[test]
    fn test_view_receives_every_change() {
        let (mut favorites, _, _) = engine();
        let slot = SnapshotSlot::new();
        favorites.attach_view(slot.clone());

        favorites.toggle(product(1, "A")).unwrap();
        favorites.toggle(product(2, "B")).unwrap();
        favorites.remove("1");

        assert_eq!(slot.render_count(), 4);
        assert_eq!(slot.latest().unwrap().count, 1);
    }
}
