//! In-process store.

use super::{RoomStore, StoreError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, instrument};

/// Store kept in memory. Clones share the same map, so several clients in
/// one process see each other's rooms.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        // A panicking writer cannot leave a half-written String behind.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RoomStore for MemoryStore {
    #[instrument(skip(self))]
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self.entries().get(key).cloned();
        if value.is_none() {
            debug!("Key not found");
        }
        Ok(value)
    }

    #[instrument(skip(self, value))]
    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries().insert(key.to_string(), value.to_string());
        debug!(bytes = value.len(), "Key written");
        Ok(())
    }

    #[instrument(skip(self))]
    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries().remove(key);
        debug!("Key removed");
        Ok(())
    }
}
