//! In-process store with an optional byte quota.

use std::collections::HashMap;
use std::sync::Mutex;

use super::{KeyValueStore, StorageError, validate_key};

/// In-memory key-value store.
///
/// Used for tests and for sessions that should not touch disk. A quota
/// limits the total bytes held across all keys, mirroring the quota a
/// browser applies to local storage.
#[derive(Debug)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
    available: bool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            quota: None,
            available: true,
        }
    }

    /// A store that rejects writes once `bytes` would be exceeded.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            quota: Some(bytes),
            ..Self::new()
        }
    }

    /// A store that fails every read and write, like disabled storage.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    /// Number of keys currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().map_or(0, |entries| entries.len())
    }

    /// Whether no key is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if !self.available {
            return Err(StorageError::Unavailable);
        }
        validate_key(key)?;
        let entries = self.entries.lock().map_err(|_| StorageError::Unavailable)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if !self.available {
            return Err(StorageError::Unavailable);
        }
        validate_key(key)?;
        let mut entries = self.entries.lock().map_err(|_| StorageError::Unavailable)?;

        if let Some(quota) = self.quota {
            let used: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = key.len() + value.len();
            let available = quota.saturating_sub(used);
            if needed > available {
                return Err(StorageError::QuotaExceeded { needed, available });
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get() {
        let store = MemoryStore::new();
        store.set("carrinhoJM", "[]").unwrap();
        assert_eq!(store.get("carrinhoJM").unwrap().as_deref(), Some("[]"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_quota_counts_other_keys() {
        let store = MemoryStore::with_quota(20);
        store.set("a", "0123456789").unwrap();

        let err = store.set("b", "0123456789").unwrap_err();
        assert!(matches!(
            err,
            StorageError::QuotaExceeded {
                needed: 11,
                available: 9
            }
        ));

        // Replacing a key frees its previous size
        store.set("a", "0123456789012345678").unwrap();
    }

    #[test]
    fn test_failed_write_keeps_previous_value() {
        let store = MemoryStore::with_quota(8);
        store.set("k", "[1]").unwrap();
        assert!(store.set("k", "[1,2,3,4,5,6]").is_err());
        assert_eq!(store.get("k").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn test_unavailable_store() {
        let store = MemoryStore::unavailable();
        assert!(matches!(store.get("k"), Err(StorageError::Unavailable)));
        assert!(matches!(store.set("k", "v"), Err(StorageError::Unavailable)));
        assert!(store.is_empty());
    }
}
