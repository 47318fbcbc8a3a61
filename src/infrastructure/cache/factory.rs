//! Backend factory for runtime selection by scope

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::in_memory::InMemoryBackend;
use super::provider::provider;
use super::shared::{SharedBackend, SharedCacheConfig};
use crate::config::CacheSettings;
use crate::domain::cache::{CacheBackend, CacheScope};
use crate::domain::CacheError;

impl From<&CacheSettings> for SharedCacheConfig {
    fn from(settings: &CacheSettings) -> Self {
        Self {
            max_capacity: settings.max_capacity,
            time_to_live: settings.time_to_live_secs.map(Duration::from_secs),
            time_to_idle: settings.time_to_idle_secs.map(Duration::from_secs),
        }
    }
}

/// Factory for creating cache backends
#[derive(Debug, Default)]
pub struct CacheFactory;

impl CacheFactory {
    /// Creates a new cache factory
    pub fn new() -> Self {
        Self
    }

    /// Creates a fresh backend suitable for `scope`
    ///
    /// Request and session scopes get an item bag; the shared scope gets an
    /// expiring cache configured from `settings`.
    pub fn create(&self, scope: CacheScope, settings: &CacheSettings) -> Arc<dyn CacheBackend> {
        debug!(scope = %scope, "Creating cache backend");

        match scope {
            CacheScope::Request | CacheScope::Session => Arc::new(InMemoryBackend::new()),
            CacheScope::Shared => Arc::new(SharedBackend::with_config(settings.into())),
        }
    }

    /// Points the process-wide shared scope at a backend built from `settings`
    ///
    /// Entries held by the previous shared backend are no longer reachable.
    pub fn install_shared(&self, settings: &CacheSettings) -> Result<(), CacheError> {
        let backend = self.create(CacheScope::Shared, settings);

        provider(CacheScope::Shared).set_factory(move || Some(backend.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::Cache;
    use crate::infrastructure::cache::ScopedCache;

    #[test]
    fn test_shared_config_from_settings() {
        let settings = CacheSettings {
            max_capacity: 50,
            time_to_live_secs: None,
            time_to_idle_secs: Some(30),
        };

        let config = SharedCacheConfig::from(&settings);

        assert_eq!(config.max_capacity, 50);
        assert_eq!(config.time_to_live, None);
        assert_eq!(config.time_to_idle, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_create_per_scope() {
        let factory = CacheFactory::new();
        let settings = CacheSettings::default();

        for scope in CacheScope::ALL {
            let cache = ScopedCache::with_backend(scope, factory.create(scope, &settings));
            cache.store("k", 1_i32, None).unwrap();
            assert_eq!(cache.fetch::<i32>("k", None).unwrap(), 1);
        }
    }

    #[test]
    fn test_created_backends_are_distinct() {
        let factory = CacheFactory::new();
        let settings = CacheSettings::default();

        let first = ScopedCache::with_backend(
            CacheScope::Request,
            factory.create(CacheScope::Request, &settings),
        );
        let second = ScopedCache::with_backend(
            CacheScope::Request,
            factory.create(CacheScope::Request, &settings),
        );

        first.store("k", 1_i32, None).unwrap();
        assert_eq!(second.fetch::<i32>("k", None).unwrap(), 0);
    }

    #[test]
    fn test_install_shared() {
        let factory = CacheFactory::new();
        factory.install_shared(&CacheSettings::default()).unwrap();

        let cache = ScopedCache::shared();
        cache.store("installed", true, Some("factory-test")).unwrap();
        assert!(cache.fetch::<bool>("installed", Some("factory-test")).unwrap());
    }
}
