//! Process-wide expiring cache backend using moka

use std::time::Duration;

use moka::sync::Cache as MokaCache;

use crate::domain::cache::{CacheBackend, CacheEntry};
use crate::domain::CacheError;

/// Configuration for the shared cache
#[derive(Debug, Clone, PartialEq)]
pub struct SharedCacheConfig {
    /// Maximum number of entries
    pub max_capacity: u64,
    /// Time-to-live measured from insertion or replacement
    pub time_to_live: Option<Duration>,
    /// Entries not accessed for this duration are evicted
    pub time_to_idle: Option<Duration>,
}

impl Default for SharedCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
            time_to_live: Some(Duration::from_secs(3600)), // 1 hour
            time_to_idle: None,
        }
    }
}

impl SharedCacheConfig {
    pub fn with_max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = capacity;
        self
    }

    pub fn with_time_to_live(mut self, ttl: Duration) -> Self {
        self.time_to_live = Some(ttl);
        self
    }

    /// Disables time-to-live expiry
    pub fn without_time_to_live(mut self) -> Self {
        self.time_to_live = None;
        self
    }

    pub fn with_time_to_idle(mut self, tti: Duration) -> Self {
        self.time_to_idle = Some(tti);
        self
    }
}

/// Application-wide cache shared by every request and session
///
/// Eviction and expiry are entirely moka's business. Reads never re-insert,
/// so time-to-live counts from the last store.
#[derive(Debug)]
pub struct SharedBackend {
    cache: MokaCache<String, CacheEntry>,
    config: SharedCacheConfig,
}

impl SharedBackend {
    /// Creates a shared cache with default configuration
    pub fn new() -> Self {
        Self::with_config(SharedCacheConfig::default())
    }

    /// Creates a shared cache with the given configuration
    pub fn with_config(config: SharedCacheConfig) -> Self {
        let mut builder = MokaCache::builder()
            .max_capacity(config.max_capacity)
            .eviction_listener(|key, entry: CacheEntry, cause| {
                if cause.was_evicted() {
                    tracing::debug!(
                        key = %key,
                        entry_type = entry.type_tag().name(),
                        cause = ?cause,
                        "Shared cache entry evicted"
                    );
                }
            });

        if let Some(ttl) = config.time_to_live {
            builder = builder.time_to_live(ttl);
        }

        if let Some(tti) = config.time_to_idle {
            builder = builder.time_to_idle(tti);
        }

        Self {
            cache: builder.build(),
            config,
        }
    }

    pub fn config(&self) -> &SharedCacheConfig {
        &self.config
    }

    /// Approximate number of resident entries
    pub fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }

    /// Drops every entry
    pub fn clear(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks();
    }
}

impl Default for SharedBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheBackend for SharedBackend {
    fn get(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        Ok(self.cache.get(key))
    }

    fn set(&self, key: &str, entry: CacheEntry) -> Result<(), CacheError> {
        self.cache.insert(key.to_string(), entry);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.cache.invalidate(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        // Sync pending writes so freshly inserted entries are enumerable
        self.cache.run_pending_tasks();

        Ok(self
            .cache
            .iter()
            .map(|(key, _)| key.as_ref().clone())
            .collect())
    }
}
