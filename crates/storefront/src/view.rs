//! Shared render targets for the engines.

use std::sync::{Arc, Mutex};

use crate::cart::{CartSnapshot, CartView};
use crate::favorites::{FavoritesSnapshot, FavoritesView};

/// Holds the last snapshot an engine rendered.
///
/// Clones share the slot, so the engine can own one clone while page
/// handlers read from another.
#[derive(Debug)]
pub struct SnapshotSlot<T> {
    latest: Arc<Mutex<Option<T>>>,
    renders: Arc<Mutex<usize>>,
}

impl<T> SnapshotSlot<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            latest: Arc::new(Mutex::new(None)),
            renders: Arc::new(Mutex::new(0)),
        }
    }

    /// Number of renders received so far.
    #[must_use]
    pub fn render_count(&self) -> usize {
        self.renders.lock().map_or(0, |count| *count)
    }

    fn store(&self, snapshot: T) {
        if let Ok(mut latest) = self.latest.lock() {
            *latest = Some(snapshot);
        }
        if let Ok(mut count) = self.renders.lock() {
            *count += 1;
        }
    }
}

impl<T: Clone> SnapshotSlot<T> {
    /// The most recently rendered snapshot, if any render happened.
    #[must_use]
    pub fn latest(&self) -> Option<T> {
        self.latest.lock().ok().and_then(|latest| latest.clone())
    }
}

impl<T> Clone for SnapshotSlot<T> {
    fn clone(&self) -> Self {
        Self {
            latest: Arc::clone(&self.latest),
            renders: Arc::clone(&self.renders),
        }
    }
}

impl<T> Default for SnapshotSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl CartView for SnapshotSlot<CartSnapshot> {
    fn render(&mut self, snapshot: &CartSnapshot) {
        self.store(snapshot.clone());
    }
}

impl FavoritesView for SnapshotSlot<FavoritesSnapshot> {
    fn render(&mut self, snapshot: &FavoritesSnapshot) {
        self.store(snapshot.clone());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_empty_slot() {
        let slot: SnapshotSlot<CartSnapshot> = SnapshotSlot::new();
        assert!(slot.latest().is_none());
        assert_eq!(slot.render_count(), 0);
    }

    #[test]
    fn test_clones_see_renders() {
        let slot: SnapshotSlot<CartSnapshot> = SnapshotSlot::new();
        let mut writer = slot.clone();

        writer.render(&CartSnapshot {
            lines: Vec::new(),
            total: Decimal::ZERO,
            item_count: 0,
        });

        assert_eq!(slot.render_count(), 1);
        assert_eq!(slot.latest().unwrap().total, Decimal::ZERO);
    }
}
