//! Fetch-or-populate protocol shared by every storage scope

use std::any::Any;
use std::sync::Arc;

use chrono::Utc;

use super::backend::CacheBackend;
use super::entry::CacheEntry;
use super::key::{normalize_group, resolve_key};
use crate::domain::CacheError;

/// Derives the key of a value from `(group, value, index)`
pub type KeyFactory<'a, T> = Box<dyn Fn(Option<&str>, &T, usize) -> String + 'a>;

/// Produces the values of a group when a bulk fetch finds nothing cached
pub type ItemFactory<'a, T> = Box<dyn FnOnce(Option<&str>) -> Vec<T> + 'a>;

/// Optional population strategy for [`Cache::fetch_all`]
///
/// An item factory can only be used together with a key factory, since every
/// produced value needs a key to be stored under.
pub struct Populate<'a, T> {
    key_factory: Option<KeyFactory<'a, T>>,
    item_factory: Option<ItemFactory<'a, T>>,
}

impl<'a, T> Default for Populate<'a, T> {
    fn default() -> Self {
        Self {
            key_factory: None,
            item_factory: None,
        }
    }
}

impl<'a, T> Populate<'a, T> {
    /// No population: a cold group yields an empty result
    pub fn none() -> Self {
        Self::default()
    }

    /// Sets the key factory
    pub fn with_key_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(Option<&str>, &T, usize) -> String + 'a,
    {
        self.key_factory = Some(Box::new(factory));
        self
    }

    /// Sets the item factory
    pub fn with_item_factory<F>(mut self, factory: F) -> Self
    where
        F: FnOnce(Option<&str>) -> Vec<T> + 'a,
    {
        self.item_factory = Some(Box::new(factory));
        self
    }
}

/// Uniform caching API over a [`CacheBackend`]
///
/// Implementors only say where their backend comes from. Every operation is
/// provided here once, so all scopes share identical semantics:
///
/// - keys are resolved before the backend is obtained, so an empty key is
///   reported even when no backend is available;
/// - an entry holding a different value type is treated as absent;
/// - concurrent misses on the same key are not serialised, both callers may
///   run their factory and the last write wins.
pub trait Cache {
    /// Returns the live backend for the next operation
    fn backend(&self) -> Result<Arc<dyn CacheBackend>, CacheError>;

    /// Returns the cached `T`, or `T::default()` when nothing usable is cached
    ///
    /// A miss is indistinguishable from a hit on a value equal to the default.
    fn fetch<T>(&self, key: &str, group: Option<&str>) -> Result<T, CacheError>
    where
        T: Any + Clone + Default + Send + Sync,
    {
        let resolved = resolve_key(key, group)?;
        let backend = self.backend()?;

        Ok(read_hit::<T>(backend.as_ref(), &resolved)?.unwrap_or_default())
    }

    /// Returns the cached `T`, computing and storing it with `factory` on a miss
    fn fetch_with<T, F>(&self, key: &str, group: Option<&str>, factory: F) -> Result<T, CacheError>
    where
        T: Any + Clone + Send + Sync,
        F: FnOnce(&str, Option<&str>) -> T,
    {
        let group = normalize_group(group);
        let resolved = resolve_key(key, group)?;
        let backend = self.backend()?;

        if let Some(value) = read_hit::<T>(backend.as_ref(), &resolved)? {
            return Ok(value);
        }

        let value = factory(key, group);
        backend.set(&resolved, CacheEntry::new(key, value.clone(), group))?;

        Ok(value)
    }

    /// Returns every cached `T` of `group`, populating the group when it is cold
    fn fetch_all<T>(&self, group: Option<&str>, populate: Populate<'_, T>) -> Result<Vec<T>, CacheError>
    where
        T: Any + Clone + Send + Sync,
    {
        let Populate {
            key_factory,
            item_factory,
        } = populate;

        if item_factory.is_some() && key_factory.is_none() {
            return Err(CacheError::argument(
                "A key factory must be provided if an item factory is set",
            ));
        }

        let group = normalize_group(group);
        let backend = self.backend()?;
        let members = scan::<T>(backend.as_ref(), group)?;

        if !members.is_empty() {
            let now = Utc::now();
            let write_back = backend.requires_write_back();
            let mut values = Vec::with_capacity(members.len());

            for (resolved, entry) in members {
                entry.touch(now);

                if let Some(value) = entry.value::<T>() {
                    values.push(value.clone());
                }

                if write_back {
                    backend.set(&resolved, entry)?;
                }
            }

            return Ok(values);
        }

        match (item_factory, key_factory) {
            (Some(item_factory), Some(key_factory)) => {
                let values = item_factory(group);
                let entries = derive_entries(&*key_factory, values.iter().cloned(), group)?;

                for (resolved, entry) in entries {
                    backend.set(&resolved, entry)?;
                }

                Ok(values)
            }
            _ => Ok(Vec::new()),
        }
    }

    /// Stores `value`, replacing whatever was cached under the same key
    fn store<T>(&self, key: &str, value: T, group: Option<&str>) -> Result<(), CacheError>
    where
        T: Any + Send + Sync,
    {
        let group = normalize_group(group);
        let resolved = resolve_key(key, group)?;
        let backend = self.backend()?;

        backend.set(&resolved, CacheEntry::new(key, value, group))
    }

    /// Stores every value under the key derived for it, in iteration order
    ///
    /// All keys are derived and validated before the first write.
    fn store_all<T, K, I>(&self, key_factory: K, values: I, group: Option<&str>) -> Result<(), CacheError>
    where
        T: Any + Send + Sync,
        K: Fn(Option<&str>, &T, usize) -> String,
        I: IntoIterator<Item = T>,
    {
        let group = normalize_group(group);
        let backend = self.backend()?;
        let entries = derive_entries(&key_factory, values, group)?;

        for (resolved, entry) in entries {
            backend.set(&resolved, entry)?;
        }

        Ok(())
    }

    /// Removes a single entry; removing an absent key is a no-op
    fn remove(&self, key: &str, group: Option<&str>) -> Result<(), CacheError> {
        let resolved = resolve_key(key, group)?;
        let backend = self.backend()?;

        backend.remove(&resolved)
    }

    /// Removes every cached `T` of `group`
    ///
    /// Every matching entry must resolve to a valid key before the first
    /// removal, otherwise nothing is removed.
    fn remove_all<T>(&self, group: Option<&str>) -> Result<(), CacheError>
    where
        T: Any,
    {
        let group = normalize_group(group);
        let backend = self.backend()?;
        let keys = scan::<T>(backend.as_ref(), group)?
            .into_iter()
            .map(|(_, entry)| entry.resolved_key())
            .collect::<Result<Vec<_>, _>>()?;

        for key in keys {
            backend.remove(&key)?;
        }

        Ok(())
    }
}

fn read_hit<T>(backend: &dyn CacheBackend, resolved: &str) -> Result<Option<T>, CacheError>
where
    T: Any + Clone,
{
    let Some(entry) = backend.get(resolved)? else {
        return Ok(None);
    };

    let Some(value) = entry.value::<T>().cloned() else {
        return Ok(None);
    };

    entry.touch(Utc::now());

    if backend.requires_write_back() {
        backend.set(resolved, entry)?;
    }

    Ok(Some(value))
}

/// Collects `(slot key, entry)` for every `T` entry of `group`, in backend order
fn scan<T: Any>(backend: &dyn CacheBackend, group: Option<&str>) -> Result<Vec<(String, CacheEntry)>, CacheError> {
    let mut members = Vec::new();

    for key in backend.keys()? {
        // Entries may be evicted between enumeration and lookup.
        let Some(entry) = backend.get(&key)? else {
            continue;
        };

        if entry.is::<T>() && entry.belongs_to(group) {
            members.push((key, entry));
        }
    }

    Ok(members)
}

fn derive_entries<T, I>(
    key_factory: &dyn Fn(Option<&str>, &T, usize) -> String,
    values: I,
    group: Option<&str>,
) -> Result<Vec<(String, CacheEntry)>, CacheError>
where
    T: Any + Send + Sync,
    I: IntoIterator<Item = T>,
{
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            let key = key_factory(group, &value, index);
            let resolved = resolve_key(&key, group)?;

            Ok((resolved, CacheEntry::new(key, value, group)))
        })
        .collect()
}
