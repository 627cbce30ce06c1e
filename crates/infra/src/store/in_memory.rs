use std::collections::HashMap;
use std::sync::RwLock;

use shopledger_ledger::{KeyValueStore, StorageKey, StoreError};

/// In-memory store for tests/dev. Nothing survives the process.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<HashMap<StorageKey, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently holding a value.
    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: StorageKey) -> Result<Option<String>, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.get(&key).cloned())
    }

    fn put(&self, key: StorageKey, value: &str) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        map.insert(key, value.to_string());
        Ok(())
    }
}
