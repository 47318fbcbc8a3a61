//! Cache domain - key resolution, entries and the fetch-or-populate protocol

mod backend;
mod entry;
mod key;
mod protocol;
mod scope;

pub use backend::CacheBackend;
pub use entry::{CacheEntry, EntryInfo, TypeTag};
pub use key::{normalize_group, resolve_key, GROUP_SEPARATOR};
pub use protocol::{Cache, ItemFactory, KeyFactory, Populate};
pub use scope::CacheScope;

#[cfg(test)]
pub use backend::MockCacheBackend;
