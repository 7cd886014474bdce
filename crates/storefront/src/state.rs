//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::binding::ViewBinder;
use crate::cart::{CartEngine, CartSnapshot};
use crate::catalog::{CatalogError, RawgClient};
use crate::config::StorefrontConfig;
use crate::favorites::{FavoritesEngine, FavoritesSnapshot};
use crate::notify::{Notifier, Toast, ToastQueue};
use crate::search::SearchController;
use crate::storage::{FileStore, PersistentStore};
use crate::view::SnapshotSlot;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. It holds the one shopper
/// session this storefront serves: the engines behind a [`ViewBinder`], the
/// catalog client, and the render targets the engines draw into.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: RawgClient,
    binder: Mutex<ViewBinder>,
    toasts: ToastQueue,
    cart_view: SnapshotSlot<CartSnapshot>,
    favorites_view: SnapshotSlot<FavoritesSnapshot>,
}

impl AppState {
    /// Create the application state, persisting shopper data under
    /// `config.data_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, CatalogError> {
        let catalog = RawgClient::new(&config.catalog)?;
        let store = PersistentStore::new(FileStore::new(&config.data_dir));
        Ok(Self::with_parts(config, catalog, store))
    }

    /// Create the application state from already-built parts.
    #[must_use]
    pub fn with_parts(config: StorefrontConfig, catalog: RawgClient, store: PersistentStore) -> Self {
        let toasts = ToastQueue::new();
        let notifier: Arc<dyn Notifier> = Arc::new(toasts.clone());

        let cart_view = SnapshotSlot::new();
        let favorites_view = SnapshotSlot::new();

        let mut cart = CartEngine::load(store.clone(), Arc::clone(&notifier));
        cart.attach_view(cart_view.clone());
        let mut favorites = FavoritesEngine::load(store, Arc::clone(&notifier));
        favorites.attach_view(favorites_view.clone());
        let search = SearchController::new(config.catalog.page_size, Arc::clone(&notifier));

        tracing::info!(
            cart_lines = cart.lines().len(),
            favorites = favorites.len(),
            "Shopper state restored"
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                binder: Mutex::new(ViewBinder::new(cart, favorites, search, notifier)),
                toasts,
                cart_view,
                favorites_view,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the RAWG catalog client.
    #[must_use]
    pub fn catalog(&self) -> &RawgClient {
        &self.inner.catalog
    }

    /// Lock the shopper session.
    ///
    /// Do not hold the guard across catalog calls; search tickets exist so
    /// the lock can be released while a request is in flight.
    pub async fn binder(&self) -> MutexGuard<'_, ViewBinder> {
        self.inner.binder.lock().await
    }

    /// Queue for raising notifications outside the engines.
    #[must_use]
    pub fn notifier(&self) -> &ToastQueue {
        &self.inner.toasts
    }

    /// Take every pending toast for display.
    #[must_use]
    pub fn drain_toasts(&self) -> Vec<Toast> {
        self.inner.toasts.drain()
    }

    /// What the cart last rendered.
    #[must_use]
    pub fn cart_snapshot(&self) -> CartSnapshot {
        self.inner.cart_view.latest().unwrap_or_default()
    }

    /// What the favorites list last rendered.
    #[must_use]
    pub fn favorites_snapshot(&self) -> FavoritesSnapshot {
        self.inner.favorites_view.latest().unwrap_or_default()
    }
}
