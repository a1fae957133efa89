use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::error::CoreError;

/// String key-value store the draft snapshot is written to.
///
/// Implementations must be safe to share between the controller and the auth
/// service; all methods take `&self`.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError>;

    /// Writes several entries as one update. Stores that persist should
    /// override this so a crash never leaves half the batch applied.
    fn set_many(&self, entries: &[(&str, String)]) -> Result<(), CoreError> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }

    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), CoreError>;

    fn keys(&self) -> Result<Vec<String>, CoreError>;
}

/// In-process store used by tests and as the fallback when no data dir exists.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<BTreeMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        let entries = self.entries.read().map_err(lock_poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut entries = self.entries.write().map_err(lock_poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn set_many(&self, batch: &[(&str, String)]) -> Result<(), CoreError> {
        let mut entries = self.entries.write().map_err(lock_poisoned)?;
        for (key, value) in batch {
            entries.insert(key.to_string(), value.clone());
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        let mut entries = self.entries.write().map_err(lock_poisoned)?;
        entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, CoreError> {
        let entries = self.entries.read().map_err(lock_poisoned)?;
        Ok(entries.keys().cloned().collect())
    }
}

fn lock_poisoned<T>(_: T) -> CoreError {
    CoreError::Storage("store lock poisoned".into())
}
