//! Cache adapter bound to a storage scope

use std::fmt;
use std::sync::Arc;

use super::provider::{provider, BackendProvider};
use crate::domain::cache::{Cache, CacheBackend, CacheScope};
use crate::domain::CacheError;

enum BackendSource {
    Provider(&'static BackendProvider),
    Fixed(Arc<dyn CacheBackend>),
}

/// [`Cache`] implementation for one storage scope
///
/// Adapters built with [`request`](Self::request), [`session`](Self::session)
/// or [`shared`](Self::shared) ask the scope's process-wide provider for a
/// backend before every operation. Prefer [`with_backend`](Self::with_backend)
/// when the backend is already at hand.
pub struct ScopedCache {
    scope: CacheScope,
    source: BackendSource,
}

impl ScopedCache {
    /// Cache over the current request's item bag
    pub fn request() -> Self {
        Self::for_scope(CacheScope::Request)
    }

    /// Cache over the current session's bag
    pub fn session() -> Self {
        Self::for_scope(CacheScope::Session)
    }

    /// Cache over the process-wide application cache
    pub fn shared() -> Self {
        Self::for_scope(CacheScope::Shared)
    }

    /// Cache over the process-wide provider of `scope`
    pub fn for_scope(scope: CacheScope) -> Self {
        Self::from_provider(provider(scope))
    }

    /// Cache over a specific provider
    pub fn from_provider(provider: &'static BackendProvider) -> Self {
        Self {
            scope: provider.scope(),
            source: BackendSource::Provider(provider),
        }
    }

    /// Cache over an explicit backend, bypassing any provider
    pub fn with_backend(scope: CacheScope, backend: Arc<dyn CacheBackend>) -> Self {
        Self {
            scope,
            source: BackendSource::Fixed(backend),
        }
    }

    pub fn scope(&self) -> CacheScope {
        self.scope
    }
}

impl Cache for ScopedCache {
    fn backend(&self) -> Result<Arc<dyn CacheBackend>, CacheError> {
        match &self.source {
            BackendSource::Provider(provider) => provider.backend(),
            BackendSource::Fixed(backend) => Ok(backend.clone()),
        }
    }
}

impl fmt::Debug for ScopedCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = match self.source {
            BackendSource::Provider(_) => "provider",
            BackendSource::Fixed(_) => "fixed",
        };

        f.debug_struct("ScopedCache")
            .field("scope", &self.scope)
            .field("source", &source)
            .finish()
    }
}
