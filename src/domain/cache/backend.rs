//! Backend capability required from every storage scope

use super::entry::CacheEntry;
use crate::domain::CacheError;

#[cfg(test)]
use mockall::automock;

/// Minimal dictionary-like store the cache protocol delegates to
///
/// Keys are already-resolved storage keys. Implementations own eviction,
/// expiration and thread-safety; the protocol never assumes any ordering of
/// [`keys`](CacheBackend::keys).
#[cfg_attr(test, automock)]
pub trait CacheBackend: Send + Sync {
    /// Returns the entry stored under `key`
    fn get(&self, key: &str) -> Result<Option<CacheEntry>, CacheError>;

    /// Stores `entry` under `key`, replacing any previous entry
    fn set(&self, key: &str, entry: CacheEntry) -> Result<(), CacheError>;

    /// Removes the entry under `key`; absent keys are not an error
    fn remove(&self, key: &str) -> Result<(), CacheError>;

    /// Enumerates the keys currently resident in the store
    fn keys(&self) -> Result<Vec<String>, CacheError>;

    /// Returns true if the store hands out detached copies of its entries
    ///
    /// Touching such a copy does not reach the resident entry, so every hit
    /// is stored again with [`set`](CacheBackend::set). A removal that
    /// completes between the hit's read and that write is undone; this is
    /// the one race accepted besides concurrent population. Stores holding
    /// [`CacheEntry`] values directly keep the default.
    fn requires_write_back(&self) -> bool {
        false
    }
}
