//! Cache entry record and its type tag

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::key::{normalize_group, resolve_key};
use crate::domain::CacheError;

/// Runtime tag identifying the value type held by an entry
#[derive(Debug, Clone, Copy)]
pub struct TypeTag {
    id: TypeId,
    name: &'static str,
}

impl TypeTag {
    /// Returns the tag for `T`
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Returns true if this tag was built for `T`
    pub fn is<T: Any>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    /// Human-readable type name, for diagnostics only
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeTag {}

impl Hash for TypeTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A cached value together with its key, group and access timestamps
///
/// Clones share the payload and the access timestamp, so touching an entry
/// read out of a backend also touches the resident one.
#[derive(Clone)]
pub struct CacheEntry {
    key: String,
    group: Option<String>,
    tag: TypeTag,
    value: Arc<dyn Any + Send + Sync>,
    created: DateTime<Utc>,
    last_accessed: Arc<AtomicI64>,
}

impl CacheEntry {
    /// Creates an entry stamped with the current time
    ///
    /// Blank groups are stored as `None`.
    pub fn new<T>(key: impl Into<String>, value: T, group: Option<&str>) -> Self
    where
        T: Any + Send + Sync,
    {
        // Whole microseconds, the resolution of the access cell
        let micros = Utc::now().timestamp_micros();
        let created = DateTime::from_timestamp_micros(micros).unwrap_or_default();

        Self {
            key: key.into(),
            group: normalize_group(group).map(str::to_string),
            tag: TypeTag::of::<T>(),
            value: Arc::new(value),
            created,
            last_accessed: Arc::new(AtomicI64::new(micros)),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn type_tag(&self) -> TypeTag {
        self.tag
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    pub fn last_accessed(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_micros(self.last_accessed.load(Ordering::Acquire))
            .unwrap_or(self.created)
    }

    /// Returns true if the entry holds a value of type `T`
    pub fn is<T: Any>(&self) -> bool {
        self.tag.is::<T>()
    }

    /// Borrows the value if the entry holds a `T`
    pub fn value<T: Any>(&self) -> Option<&T> {
        if !self.is::<T>() {
            return None;
        }

        self.value.downcast_ref::<T>()
    }

    /// Returns true if the entry belongs to `group` (blank means ungrouped)
    pub fn belongs_to(&self, group: Option<&str>) -> bool {
        self.group.as_deref() == normalize_group(group)
    }

    /// Records an access at `now`; earlier timestamps are ignored
    ///
    /// Visible through every clone of this entry.
    pub fn touch(&self, now: DateTime<Utc>) {
        self.last_accessed
            .fetch_max(now.timestamp_micros(), Ordering::AcqRel);
    }

    /// Key under which this entry is addressed in a backend
    pub fn resolved_key(&self) -> Result<String, CacheError> {
        resolve_key(&self.key, self.group.as_deref())
    }

    /// Serializable snapshot of the entry metadata
    pub fn info(&self) -> EntryInfo {
        EntryInfo {
            key: self.key.clone(),
            group: self.group.clone(),
            type_name: self.tag.name(),
            created: self.created,
            last_accessed: self.last_accessed(),
        }
    }
}

impl fmt::Debug for CacheEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry")
            .field("key", &self.key)
            .field("group", &self.group)
            .field("type", &self.tag.name())
            .field("created", &self.created)
            .field("last_accessed", &self.last_accessed())
            .finish_non_exhaustive()
    }
}

/// Entry metadata without the payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryInfo {
    pub key: String,
    pub group: Option<String>,
    pub type_name: &'static str,
    pub created: DateTime<Utc>,
    pub last_accessed: DateTime<Utc>,
}
