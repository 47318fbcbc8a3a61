//! Infrastructure layer - Concrete backends and logging

pub mod cache;
pub mod logging;
