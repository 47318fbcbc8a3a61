//! Storage key resolution for `(key, group)` pairs

use crate::domain::CacheError;

/// Separator placed between a group and a key in a resolved key.
///
/// The separator is not escaped, so `("a_b", Some("c"))` and `("b", Some("c_a"))`
/// both resolve to `"c_a_b"`. Callers that mix underscores into groups and keys
/// must keep their naming collision-free themselves.
pub const GROUP_SEPARATOR: char = '_';

/// Treats an empty or whitespace-only group as no group at all
pub fn normalize_group(group: Option<&str>) -> Option<&str> {
    group.filter(|g| !g.trim().is_empty())
}

/// Resolves a logical key and optional group into the single key used by a backend
///
/// Ungrouped keys are returned unchanged and share the flat namespace with
/// grouped composites.
pub fn resolve_key(key: &str, group: Option<&str>) -> Result<String, CacheError> {
    if key.is_empty() {
        return Err(CacheError::invalid_key("cache key must not be empty"));
    }

    match normalize_group(group) {
        Some(group) => Ok(format!("{}{}{}", group, GROUP_SEPARATOR, key)),
        None => Ok(key.to_string()),
    }
}
