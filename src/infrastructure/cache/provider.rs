//! Process-wide, replaceable backend factories per cache scope

use std::fmt;
use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;
use tracing::debug;

use super::shared::SharedBackend;
use crate::domain::cache::{CacheBackend, CacheScope};
use crate::domain::CacheError;

/// Produces the live backend for the current request, session or process
///
/// Returning `None` means no backend is reachable from the calling context.
pub type BackendFactory = Arc<dyn Fn() -> Option<Arc<dyn CacheBackend>> + Send + Sync>;

/// Holder of a scope's backend factory
///
/// The lock guards only the factory pointer. The factory itself runs after
/// the lock is released, so a slow host lookup never blocks reconfiguration.
pub struct BackendProvider {
    scope: CacheScope,
    initial: Option<BackendFactory>,
    factory: Mutex<Option<BackendFactory>>,
}

impl BackendProvider {
    /// Creates a provider with no factory installed
    pub fn new(scope: CacheScope) -> Self {
        Self {
            scope,
            initial: None,
            factory: Mutex::new(None),
        }
    }

    /// Creates a provider whose initial factory is `factory`
    ///
    /// [`reset`](Self::reset) restores this factory.
    pub fn with_factory<F>(scope: CacheScope, factory: F) -> Self
    where
        F: Fn() -> Option<Arc<dyn CacheBackend>> + Send + Sync + 'static,
    {
        let factory: BackendFactory = Arc::new(factory);

        Self {
            scope,
            initial: Some(factory.clone()),
            factory: Mutex::new(Some(factory)),
        }
    }

    pub fn scope(&self) -> CacheScope {
        self.scope
    }

    /// Replaces the factory used by subsequent operations
    pub fn set_factory<F>(&self, factory: F) -> Result<(), CacheError>
    where
        F: Fn() -> Option<Arc<dyn CacheBackend>> + Send + Sync + 'static,
    {
        self.replace(Some(Arc::new(factory)))?;
        debug!(scope = %self.scope, "Cache backend factory installed");
        Ok(())
    }

    /// Restores the initial factory
    pub fn reset(&self) -> Result<(), CacheError> {
        self.replace(self.initial.clone())?;
        debug!(scope = %self.scope, "Cache backend factory reset");
        Ok(())
    }

    /// Returns true if a factory is currently installed
    pub fn is_configured(&self) -> Result<bool, CacheError> {
        let guard = self.factory.lock().map_err(|e| {
            CacheError::backend(format!("Failed to acquire factory lock: {}", e))
        })?;

        Ok(guard.is_some())
    }

    /// Obtains the live backend from the current factory
    pub fn backend(&self) -> Result<Arc<dyn CacheBackend>, CacheError> {
        let factory = {
            let guard = self.factory.lock().map_err(|e| {
                CacheError::backend(format!("Failed to acquire factory lock: {}", e))
            })?;

            guard.clone()
        };

        let factory = factory.ok_or(CacheError::context_unavailable(self.scope))?;

        factory().ok_or(CacheError::context_unavailable(self.scope))
    }

    fn replace(&self, factory: Option<BackendFactory>) -> Result<(), CacheError> {
        let mut guard = self.factory.lock().map_err(|e| {
            CacheError::backend(format!("Failed to acquire factory lock: {}", e))
        })?;

        *guard = factory;
        Ok(())
    }
}

impl fmt::Debug for BackendProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendProvider")
            .field("scope", &self.scope)
            .field("configured", &self.is_configured().ok())
            .finish()
    }
}

static REQUEST_PROVIDER: Lazy<BackendProvider> =
    Lazy::new(|| BackendProvider::new(CacheScope::Request));

static SESSION_PROVIDER: Lazy<BackendProvider> =
    Lazy::new(|| BackendProvider::new(CacheScope::Session));

static SHARED_PROVIDER: Lazy<BackendProvider> = Lazy::new(|| {
    let shared: Arc<dyn CacheBackend> = Arc::new(SharedBackend::new());
    BackendProvider::with_factory(CacheScope::Shared, move || Some(shared.clone()))
});

/// Returns the process-wide provider of `scope`
///
/// Request and session providers start unconfigured; the host installs a
/// factory that reaches its current request or session. The shared provider
/// starts with a default process-wide [`SharedBackend`].
pub fn provider(scope: CacheScope) -> &'static BackendProvider {
    match scope {
        CacheScope::Request => &REQUEST_PROVIDER,
        CacheScope::Session => &SESSION_PROVIDER,
        CacheScope::Shared => &SHARED_PROVIDER,
    }
}

/// Installs the backend factory of a process-wide scope
pub fn set_backend_factory<F>(scope: CacheScope, factory: F) -> Result<(), CacheError>
where
    F: Fn() -> Option<Arc<dyn CacheBackend>> + Send + Sync + 'static,
{
    provider(scope).set_factory(factory)
}

/// Restores the initial backend factory of a process-wide scope
pub fn reset_backend_factory(scope: CacheScope) -> Result<(), CacheError> {
    provider(scope).reset()
}
