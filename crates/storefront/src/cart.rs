//! Cart engine: the shopper's line items, persisted under [`keys::CART`].
//!
//! The in-memory line list is authoritative for the session. Every mutation
//! is persisted, re-rendered to the attached [`CartView`] and confirmed with
//! exactly one notification. A failed write is reported as a warning and the
//! in-memory state is kept.

use std::sync::Arc;

use jm_games_core::{CartLine, Price, Product, ProductId, Severity};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::notify::Notifier;
use crate::storage::{PersistentStore, keys};

/// Text shown when the cart has no lines.
pub const EMPTY_CART_TEXT: &str = "Seu carrinho está vazio.";

/// Errors returned by the cart and favorites engines.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The product carries no identity to key a line on.
    #[error("product has no identity")]
    MissingIdentity,
}

/// Everything a cart view needs to draw the drawer and header badge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CartSnapshot {
    pub lines: Vec<CartLine>,
    pub total: Decimal,
    pub item_count: u32,
}

impl CartSnapshot {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total formatted for display, rounded to two decimals.
    #[must_use]
    pub fn total_display(&self) -> String {
        Price::from_amount(self.total).display()
    }

    /// Placeholder shown in the drawer while the cart is empty.
    #[must_use]
    pub const fn empty_text(&self) -> &'static str {
        EMPTY_CART_TEXT
    }

    /// The header badge is hidden while the cart is empty.
    #[must_use]
    pub const fn badge_visible(&self) -> bool {
        self.item_count > 0
    }
}

/// Render target for the cart.
pub trait CartView: Send {
    fn render(&mut self, snapshot: &CartSnapshot);
}

/// The shopper's cart.
pub struct CartEngine {
    lines: Vec<CartLine>,
    store: PersistentStore,
    notifier: Arc<dyn Notifier>,
    view: Option<Box<dyn CartView>>,
}

impl CartEngine {
    /// Load the persisted cart.
    ///
    /// Missing or malformed state loads as an empty cart. Lines that fail to
    /// decode, have no identity, a zero quantity or an out-of-range price are
    /// dropped one by one and duplicate lines merged.
    pub fn load(store: PersistentStore, notifier: Arc<dyn Notifier>) -> Self {
        let stored: Vec<serde_json::Value> = store.load(keys::CART, Vec::new());
        let lines = normalize(stored);
        tracing::debug!(lines = lines.len(), "Cart loaded");

        Self {
            lines,
            store,
            notifier,
            view: None,
        }
    }

    /// Attach a view and draw the current state into it.
    pub fn attach_view(&mut self, view: impl CartView + 'static) {
        self.view = Some(Box::new(view));
        self.render();
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn line(&self, id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.product_id == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0_u32, |count, line| count.saturating_add(line.quantity))
    }

    /// Add one unit of `product`, creating its line if needed.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MissingIdentity`] if the product id is empty.
    /// The cart is not touched in that case.
    pub fn add_item(&mut self, product: Product) -> Result<(), EngineError> {
        if product.id.is_empty() {
            return Err(EngineError::MissingIdentity);
        }

        let name = product.name.clone();
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.product_id == product.id)
        {
            line.quantity = line.quantity.saturating_add(1);
        } else {
            self.lines.push(CartLine::new(product));
        }

        self.commit();
        self.notifier.notify(
            &format!("\"{name}\" adicionado ao carrinho!"),
            Severity::Success,
        );
        Ok(())
    }

    /// Remove the line for `id`. Removing an absent product does nothing.
    pub fn remove_item(&mut self, id: impl Into<ProductId>) {
        let id = id.into();
        let Some(index) = self.lines.iter().position(|line| line.product_id == id) else {
            tracing::debug!(product_id = %id, "Remove ignored, product not in cart");
            return;
        };

        let line = self.lines.remove(index);
        self.commit();
        self.notifier.notify(
            &format!("\"{}\" removido do carrinho.", line.name),
            Severity::Info,
        );
    }

    /// Set the quantity of `id` from raw input.
    ///
    /// Input is read as an integer the way a quantity field is: leading
    /// digits count and anything non-numeric is zero. A quantity of zero or
    /// less removes the line. Unknown products are ignored.
    pub fn update_quantity(&mut self, id: impl Into<ProductId>, raw: &str) {
        self.set_quantity(id, parse_quantity(raw));
    }

    /// Set the quantity of `id`; zero or less removes the line.
    pub fn set_quantity(&mut self, id: impl Into<ProductId>, quantity: i64) {
        let id = id.into();
        if quantity <= 0 {
            self.remove_item(id);
            return;
        }

        let Some(line) = self.lines.iter_mut().find(|line| line.product_id == id) else {
            tracing::debug!(product_id = %id, "Quantity update ignored, product not in cart");
            return;
        };

        line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        self.commit();
    }

    /// `Σ unit_price × quantity`, unrounded and saturating at `Decimal::MAX`.
    #[must_use]
    pub fn compute_total(&self) -> Decimal {
        self.lines
            .iter()
            .map(CartLine::subtotal)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.commit();
        self.notifier.notify("Carrinho limpo.", Severity::Info);
    }

    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            lines: self.lines.clone(),
            total: self.compute_total(),
            item_count: self.item_count(),
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
        if let Err(e) = self.store.save(keys::CART, &self.lines) {
            self.notifier.notify(
                &format!(
                    "Não foi possível salvar o carrinho ({e}). As alterações valem só para esta sessão."
                ),
                Severity::Warning,
            );
        }
        self.render();
    }
}

impl std::fmt::Debug for CartEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartEngine")
            .field("lines", &self.lines)
            .field("store", &self.store)
            .field("view_attached", &self.view.is_some())
            .finish_non_exhaustive()
    }
}

/// Read a quantity field: optional sign then leading digits, else zero.
fn parse_quantity(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (negative, rest) = trimmed
        .strip_prefix('-')
        .map(|rest| (true, rest))
        .or_else(|| trimmed.strip_prefix('+').map(|rest| (false, rest)))
        .unwrap_or((false, trimmed));

    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = rest.get(..end).unwrap_or_default();
    if digits.is_empty() {
        return 0;
    }

    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    if negative { -magnitude } else { magnitude }
}

fn normalize(stored: Vec<serde_json::Value>) -> Vec<CartLine> {
    let mut lines: Vec<CartLine> = Vec::with_capacity(stored.len());
    for raw in stored {
        let line: CartLine = match serde_json::from_value(raw) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "Dropping undecodable stored cart line");
                continue;
            }
        };
        if line.product_id.is_empty()
            || line.quantity == 0
            || Product::check_price(line.unit_price).is_err()
        {
            tracing::warn!(product_id = %line.product_id, "Dropping invalid stored cart line");
            continue;
        }
        if let Some(existing) = lines.iter_mut().find(|l| l.product_id == line.product_id) {
            existing.quantity = existing.quantity.saturating_add(line.quantity);
        } else {
            lines.push(line);
        }
    }
    lines
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::notify::{Toast, ToastQueue};
    use crate::storage::MemoryStore;
    use crate::view::SnapshotSlot;

    fn product(id: &str, name: &str, price: i64) -> Product {
        Product::new(id, name, Decimal::new(price, 2), "/img.png")
    }

    fn engine() -> (CartEngine, PersistentStore, ToastQueue) {
        let store = PersistentStore::new(MemoryStore::new());
        let toasts = ToastQueue::new();
        let cart = CartEngine::load(store.clone(), Arc::new(toasts.clone()));
        (cart, store, toasts)
    }

    #[test]
    fn test_add_creates_line_then_increments() {
        let (mut cart, _, toasts) = engine();
        cart.add_item(product("1", "Portal 2", 10_00)).unwrap();
        cart.add_item(product("1", "Portal 2", 10_00)).unwrap();

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
        assert_eq!(
            toasts.drain(),
            vec![
                Toast {
                    message: "\"Portal 2\" adicionado ao carrinho!".to_string(),
                    severity: Severity::Success,
                };
                2
            ]
        );
    }

    #[test]
    fn test_add_without_identity_is_rejected() {
        let (mut cart, _, toasts) = engine();
        let err = cart.add_item(product("  ", "Nameless", 1_00)).unwrap_err();

        assert_eq!(err, EngineError::MissingIdentity);
        assert!(cart.is_empty());
        assert!(toasts.is_empty());
    }

    #[test]
    fn test_total_is_exact() {
        let (mut cart, _, _) = engine();
        cart.add_item(product("1", "A", 49_99)).unwrap();
        cart.add_item(product("1", "A", 49_99)).unwrap();
        cart.add_item(product("1", "A", 49_99)).unwrap();
        cart.add_item(product("2", "B", 10_01)).unwrap();

        assert_eq!(cart.compute_total(), Decimal::new(159_98, 2));
        assert_eq!(cart.snapshot().total_display(), "R$ 159.98");
        assert_eq!(cart.item_count(), 4);
    }

    #[test]
    fn test_update_quantity_parses_raw_input() {
        let (mut cart, _, _) = engine();
        cart.add_item(product("1", "A", 1_00)).unwrap();

        cart.update_quantity("1", "5");
        assert_eq!(cart.lines()[0].quantity, 5);

        cart.update_quantity("1", " 3 unidades");
        assert_eq!(cart.lines()[0].quantity, 3);
    }

    #[test]
    fn test_update_quantity_to_zero_or_garbage_removes() {
        let (mut cart, _, toasts) = engine();
        cart.add_item(product("1", "A", 1_00)).unwrap();
        cart.add_item(product("2", "B", 1_00)).unwrap();
        let _ = toasts.drain();

        cart.update_quantity("1", "0");
        cart.update_quantity("2", "abc");

        assert!(cart.is_empty());
        let messages: Vec<_> = toasts.drain().into_iter().map(|t| t.message).collect();
        assert_eq!(
            messages,
            vec!["\"A\" removido do carrinho.", "\"B\" removido do carrinho."]
        );
    }

    #[test]
    fn test_negative_quantity_removes() {
        let (mut cart, _, _) = engine();
        cart.add_item(product("1", "A", 1_00)).unwrap();
        cart.update_quantity("1", "-2");
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_absent_is_silent() {
        let (mut cart, _, toasts) = engine();
        cart.remove_item("404");
        assert!(toasts.is_empty());
    }

    #[test]
    fn test_clear_persists_and_notifies_once() {
        let (mut cart, store, toasts) = engine();
        cart.add_item(product("1", "A", 1_00)).unwrap();
        let _ = toasts.drain();

        cart.clear();

        let stored: Vec<CartLine> = store.load(keys::CART, vec![]);
        assert!(stored.is_empty());
        assert_eq!(toasts.drain().len(), 1);
    }

    #[test]
    fn test_state_survives_reload() {
        let (mut cart, store, _) = engine();
        cart.add_item(product("1", "A", 49_99)).unwrap();
        cart.update_quantity("1", "3");

        let reloaded = CartEngine::load(store, Arc::new(ToastQueue::new()));
        assert_eq!(reloaded.lines(), cart.lines());
        assert_eq!(reloaded.compute_total(), Decimal::new(149_97, 2));
    }

    #[test]
    fn test_failed_write_warns_and_keeps_memory() {
        let store = PersistentStore::new(MemoryStore::unavailable());
        let toasts = ToastQueue::new();
        let mut cart = CartEngine::load(store, Arc::new(toasts.clone()));

        cart.add_item(product("1", "A", 1_00)).unwrap();

        assert_eq!(cart.lines().len(), 1);
        let severities: Vec<_> = toasts.drain().into_iter().map(|t| t.severity).collect();
        assert_eq!(severities, vec![Severity::Warning, Severity::Success]);
    }

    #[test]
    fn test_view_receives_every_change() {
        let (mut cart, _, _) = engine();
        let slot = SnapshotSlot::new();
        cart.attach_view(slot.clone());
        assert!(slot.latest().unwrap().is_empty());

        cart.add_item(product("1", "A", 2_50)).unwrap();
        let snapshot = slot.latest().unwrap();
        assert_eq!(snapshot.item_count, 1);
        assert!(snapshot.badge_visible());
    }

    #[test]
    fn test_huge_price_never_panics() {
        let (mut cart, _, _) = engine();
        cart.add_item(Product::new("1", "Huge", Decimal::MAX, "/img.png"))
            .unwrap();
        cart.add_item(Product::new("1", "Huge", Decimal::MAX, "/img.png"))
            .unwrap();
        cart.update_quantity("1", "7");

        assert_eq!(cart.compute_total(), Decimal::MAX);
        assert_eq!(cart.item_count(), 7);
    }

    #[test]
    fn test_load_keeps_valid_lines_beside_bad_ones() {
        let backend = MemoryStore::new();
        crate::storage::KeyValueStore::set(
            &backend,
            keys::CART,
            r#"[
                {"productId": "1", "name": "A", "unitPrice": 7.922816251426434e28, "imageRef": "a", "quantity": 1},
                {"productId": "2", "name": "B", "unitPrice": "not a price", "imageRef": "b", "quantity": 1},
                {"productId": "3", "name": "C", "unitPrice": 2000000, "imageRef": "c", "quantity": 1},
                {"productId": "4", "name": "D", "unitPrice": 49.99, "imageRef": "d", "quantity": 2}
            ]"#,
        )
        .unwrap();

        let cart = CartEngine::load(PersistentStore::new(backend), Arc::new(ToastQueue::new()));
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].product_id, ProductId::from("4"));
        assert_eq!(cart.compute_total(), Decimal::new(99_98, 2));
    }

    #[test]
    fn test_load_normalizes_stored_lines() {
        let backend = MemoryStore::new();
        crate::storage::KeyValueStore::set(
            &backend,
            keys::CART,
            r#"[
                {"productId": 1, "name": "A", "unitPrice": 1.5, "imageRef": "a", "quantity": 1},
                {"productId": "1", "name": "A", "unitPrice": 1.5, "imageRef": "a", "quantity": 2},
                {"productId": "2", "name": "B", "unitPrice": 3, "imageRef": "b", "quantity": 0}
            ]"#,
        )
        .unwrap();

        let cart = CartEngine::load(PersistentStore::new(backend), Arc::new(ToastQueue::new()));
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 3);
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("7"), 7);
        assert_eq!(parse_quantity("  12abc"), 12);
        assert_eq!(parse_quantity("2.9"), 2);
        assert_eq!(parse_quantity("-4"), -4);
        assert_eq!(parse_quantity(""), 0);
        assert_eq!(parse_quantity("abc"), 0);
        assert_eq!(parse_quantity("99999999999999999999999"), i64::MAX);
    }
}
