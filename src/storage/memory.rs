//! In-memory [`KeyValueStore`].

use super::KeyValueStore;
use crate::error::{StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// A thread-safe in-memory store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> StorageError {
    StorageError::Backend("in-memory store lock poisoned".to_string())
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let store = InMemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));
        assert_eq!(store.len(), 1);

        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_clones_share_state() {
        let store = InMemoryStore::new();
        let other = store.clone();
        store.set("shared", "yes").unwrap();
        assert_eq!(other.get("shared").unwrap().as_deref(), Some("yes"));
    }
}
