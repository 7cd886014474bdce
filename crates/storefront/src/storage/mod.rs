//! Durable key-value storage for shopper state.
//!
//! # Architecture
//!
//! - [`KeyValueStore`] is the raw backend: one JSON document per key, the
//!   equivalent of a browser's per-origin storage
//! - [`FileStore`] keeps each key in `<root>/<key>.json`
//! - [`MemoryStore`] keeps keys in process, with an optional byte quota
//! - [`PersistentStore`] is the adapter the engines use: loads never fail,
//!   saves report failures without touching in-memory state
//!
//! # Example
//!
//! ```rust,ignore
//! use jm_games_storefront::storage::{FileStore, PersistentStore, keys};
//!
//! let store = PersistentStore::new(FileStore::new(".jm-games"));
//! let lines: Vec<CartLine> = store.load(keys::CART, Vec::new());
//! store.save(keys::CART, &lines)?;
//! ```

pub mod fs;
pub mod memory;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use fs::FileStore;
pub use memory::MemoryStore;

/// Storage keys for persisted shopper state.
pub mod keys {
    /// Key holding the array of cart lines.
    pub const CART: &str = "carrinhoJM";

    /// Key holding the array of favorite entries.
    pub const FAVORITES: &str = "favoritosJM";
}

/// Errors that can occur when reading or writing storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be encoded as JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Writing the value would exceed the store's quota.
    #[error("Quota exceeded: {needed} bytes needed, {available} available")]
    QuotaExceeded { needed: usize, available: usize },

    /// Key is empty or contains characters not allowed in a key.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Storage is disabled or unreachable.
    #[error("Storage unavailable")]
    Unavailable,
}

/// Raw string storage, one document per key.
///
/// Implementations must be safe to share between the cart and favorites
/// engines; writes replace the whole document for a key.
pub trait KeyValueStore: Send + Sync {
    /// Read the document stored at `key`, `None` if the key was never written.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the document stored at `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// JSON adapter over a shared [`KeyValueStore`].
///
/// Cheaply cloneable; all clones write to the same backend.
#[derive(Clone)]
pub struct PersistentStore {
    backend: Arc<dyn KeyValueStore>,
}

impl PersistentStore {
    /// Wrap a backend.
    #[must_use]
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Wrap a backend that is already shared.
    #[must_use]
    pub fn from_shared(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Load and decode the value at `key`.
    ///
    /// Returns `default` when the key is missing, the backend cannot be
    /// read, or the stored JSON does not decode. Never fails.
    pub fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let raw = match self.backend.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return default,
            Err(e) => {
                tracing::warn!(key, error = %e, "Storage read failed, using default");
                return default;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "Stored JSON is malformed, using default");
                default
            }
        }
    }

    /// Encode `value` as JSON and write it to `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails or the backend rejects the write.
    /// Callers keep their in-memory state either way.
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(value)?;
        self.backend.set(key, &json).inspect_err(|e| {
            tracing::warn!(key, error = %e, "Storage write failed");
        })
    }
}

impl std::fmt::Debug for PersistentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistentStore").finish_non_exhaustive()
    }
}

/// Validate that a key is usable as a file stem and map key.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
