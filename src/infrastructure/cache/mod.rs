//! Cache infrastructure - Backends, providers and the scoped adapter

mod factory;
mod in_memory;
mod provider;
mod scoped;
mod shared;

pub use factory::CacheFactory;
pub use in_memory::InMemoryBackend;
pub use provider::{
    provider, reset_backend_factory, set_backend_factory, BackendFactory, BackendProvider,
};
pub use scoped::ScopedCache;
pub use shared::{SharedBackend, SharedCacheConfig};
