//! Storage scopes a cache can be bound to

use crate::domain::CacheError;

/// Lifetime scope of the backing store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheScope {
    /// Transient item bag of a single request
    Request,
    /// Key/value bag of a user session
    Session,
    /// Process-wide expiring application cache
    Shared,
}

impl CacheScope {
    pub const ALL: [CacheScope; 3] = [CacheScope::Request, CacheScope::Session, CacheScope::Shared];
}

impl std::fmt::Display for CacheScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheScope::Request => write!(f, "request"),
            CacheScope::Session => write!(f, "session"),
            CacheScope::Shared => write!(f, "shared"),
        }
    }
}

impl std::str::FromStr for CacheScope {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "request" => Ok(CacheScope::Request),
            "session" => Ok(CacheScope::Session),
            "shared" | "application" | "app" => Ok(CacheScope::Shared),
            _ => Err(CacheError::configuration(format!(
                "Unknown cache scope: {}. Valid scopes: request, session, shared",
                s
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_scope_from_str() {
        assert_eq!("request".parse::<CacheScope>().unwrap(), CacheScope::Request);
        assert_eq!("SESSION".parse::<CacheScope>().unwrap(), CacheScope::Session);
        assert_eq!("shared".parse::<CacheScope>().unwrap(), CacheScope::Shared);
        assert_eq!("application".parse::<CacheScope>().unwrap(), CacheScope::Shared);
    }

    #[test]
    fn test_cache_scope_from_str_invalid() {
        let result = "cookie".parse::<CacheScope>();
        assert!(matches!(result, Err(CacheError::Configuration { .. })));
    }

    #[test]
    fn test_cache_scope_display_round_trips() {
        for scope in CacheScope::ALL {
            assert_eq!(scope.to_string().parse::<CacheScope>().unwrap(), scope);
        }
    }
}
