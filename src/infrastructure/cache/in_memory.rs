//! In-memory item bag backend

use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::cache::{CacheBackend, CacheEntry};
use crate::domain::CacheError;

/// Thread-safe key/value bag
///
/// Serves as the per-request item bag and the per-session bag. Nothing
/// expires: the bag lives exactly as long as the request or session that
/// owns it.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl InMemoryBackend {
    /// Creates an empty bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if an entry is stored under `key`
    pub fn contains(&self, key: &str) -> Result<bool, CacheError> {
        let entries = self.entries.read().map_err(|e| {
            CacheError::backend(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(entries.contains_key(key))
    }

    /// Number of stored entries
    pub fn len(&self) -> Result<usize, CacheError> {
        let entries = self.entries.read().map_err(|e| {
            CacheError::backend(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(entries.len())
    }

    pub fn is_empty(&self) -> Result<bool, CacheError> {
        Ok(self.len()? == 0)
    }

    /// Drops every entry, e.g. when the owning session is abandoned
    pub fn clear(&self) -> Result<(), CacheError> {
        let mut entries = self.entries.write().map_err(|e| {
            CacheError::backend(format!("Failed to acquire write lock: {}", e))
        })?;

        entries.clear();
        Ok(())
    }
}

impl CacheBackend for InMemoryBackend {
    fn get(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        let entries = self.entries.read().map_err(|e| {
            CacheError::backend(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, entry: CacheEntry) -> Result<(), CacheError> {
        let mut entries = self.entries.write().map_err(|e| {
            CacheError::backend(format!("Failed to acquire write lock: {}", e))
        })?;

        entries.insert(key.to_string(), entry);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        let mut entries = self.entries.write().map_err(|e| {
            CacheError::backend(format!("Failed to acquire write lock: {}", e))
        })?;

        entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        let entries = self.entries.read().map_err(|e| {
            CacheError::backend(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(entries.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let backend = InMemoryBackend::new();
        backend.set("k", CacheEntry::new("k", 1_i32, None)).unwrap();

        let entry = backend.get("k").unwrap().unwrap();
        assert_eq!(entry.value::<i32>(), Some(&1));
        assert!(backend.contains("k").unwrap());
    }

    #[test]
    fn test_get_missing() {
        let backend = InMemoryBackend::new();
        assert!(backend.get("missing").unwrap().is_none());
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let backend = InMemoryBackend::new();
        backend.remove("missing").unwrap();
        assert!(backend.is_empty().unwrap());
    }

    #[test]
    fn test_keys_and_clear() {
        let backend = InMemoryBackend::new();
        backend.set("a", CacheEntry::new("a", 1_i32, None)).unwrap();
        backend.set("b", CacheEntry::new("b", 2_i32, None)).unwrap();

        let mut keys = backend.keys().unwrap();
        keys.sort();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);

        backend.clear().unwrap();
        assert_eq!(backend.len().unwrap(), 0);
    }

    #[test]
    fn test_poisoned_lock_is_reported() {
        let backend = std::sync::Arc::new(InMemoryBackend::new());
        let holder = backend.clone();

        let _ = std::thread::spawn(move || {
            let _guard = holder.entries.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();

        assert!(matches!(backend.contains("k"), Err(CacheError::Backend { .. })));
        assert!(matches!(backend.len(), Err(CacheError::Backend { .. })));
        assert!(matches!(backend.is_empty(), Err(CacheError::Backend { .. })));
        assert!(matches!(backend.get("k"), Err(CacheError::Backend { .. })));
    }
}
