//! Scoped Cache
//!
//! A uniform fetch-or-populate caching API over interchangeable storage scopes:
//! - Request-lifetime item bags
//! - Session-lifetime bags
//! - A process-wide expiring application cache
//!
//! ```no_run
//! use scoped_cache::{Cache, ScopedCache};
//!
//! # fn main() -> Result<(), scoped_cache::CacheError> {
//! let cache = ScopedCache::shared();
//! let greeting: String = cache.fetch_with("greeting", Some("en"), |_, _| "hello".to_string())?;
//! assert_eq!(greeting, "hello");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::{Cache, CacheBackend, CacheEntry, CacheError, CacheScope, Populate};
pub use infrastructure::cache::{
    CacheFactory, InMemoryBackend, ScopedCache, SharedBackend, SharedCacheConfig,
};
pub use infrastructure::logging::init_logging;
