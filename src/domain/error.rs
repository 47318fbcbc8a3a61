use thiserror::Error;

use super::cache::CacheScope;

/// Errors surfaced by the cache protocol and its backends
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Invalid key: {message}")]
    InvalidKey { message: String },

    #[error("Invalid argument: {message}")]
    Argument { message: String },

    #[error("Cache context unavailable: no {scope} backend could be obtained")]
    ContextUnavailable { scope: CacheScope },

    #[error("Backend error: {message}")]
    Backend { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl CacheError {
    pub fn invalid_key(message: impl Into<String>) -> Self {
        Self::InvalidKey {
            message: message.into(),
        }
    }

    pub fn argument(message: impl Into<String>) -> Self {
        Self::Argument {
            message: message.into(),
        }
    }

    pub fn context_unavailable(scope: CacheScope) -> Self {
        Self::ContextUnavailable { scope }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_key_error() {
        let error = CacheError::invalid_key("key must not be empty");
        assert_eq!(error.to_string(), "Invalid key: key must not be empty");
    }

    #[test]
    fn test_argument_error() {
        let error = CacheError::argument("missing key factory");
        assert_eq!(error.to_string(), "Invalid argument: missing key factory");
    }

    #[test]
    fn test_context_unavailable_error() {
        let error = CacheError::context_unavailable(CacheScope::Session);
        assert_eq!(
            error.to_string(),
            "Cache context unavailable: no session backend could be obtained"
        );
    }
}
