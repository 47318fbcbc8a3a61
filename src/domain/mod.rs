//! Domain layer - Cache protocol and its building blocks

pub mod cache;
pub mod error;

pub use cache::{
    normalize_group, resolve_key, Cache, CacheBackend, CacheEntry, CacheScope, EntryInfo,
    Populate, TypeTag,
};
pub use error::CacheError;
