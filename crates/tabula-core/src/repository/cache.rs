use crate::{Error, Model};
use lru::LruCache;
use std::{
    num::NonZeroUsize,
    sync::{Arc, Mutex},
};

///
/// IdentityCache
///
/// Bounded map from row id to the shared instance for that row, keyed
/// `"{path}@{id}"`. A capacity of zero disables caching entirely.
///

pub struct IdentityCache<T> {
    entries: Option<Mutex<LruCache<String, Arc<T>>>>,
}

impl<T: Model> IdentityCache<T> {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: NonZeroUsize::new(capacity).map(|cap| Mutex::new(LruCache::new(cap))),
        }
    }

    #[must_use]
    pub fn key(id: i64) -> String {
        format!("{}@{id}", T::PATH)
    }

    /// Entities without an id are not cached.
    pub fn put(&self, entity: Arc<T>) -> Result<(), Error> {
        let (Some(entries), Some(id)) = (&self.entries, entity.id()) else {
            return Ok(());
        };
        entries
            .lock()
            .map_err(|_| Error::Poisoned)?
            .put(Self::key(id), entity);

        Ok(())
    }

    pub fn get(&self, id: i64) -> Result<Option<Arc<T>>, Error> {
        let Some(entries) = &self.entries else {
            return Ok(None);
        };
        let mut entries = entries.lock().map_err(|_| Error::Poisoned)?;

        Ok(entries.get(&Self::key(id)).cloned())
    }

    pub fn remove(&self, id: i64) -> Result<Option<Arc<T>>, Error> {
        let Some(entries) = &self.entries else {
            return Ok(None);
        };
        let mut entries = entries.lock().map_err(|_| Error::Poisoned)?;

        Ok(entries.pop(&Self::key(id)))
    }

    pub fn len(&self) -> Result<usize, Error> {
        match &self.entries {
            Some(entries) => Ok(entries.lock().map_err(|_| Error::Poisoned)?.len()),
            None => Ok(0),
        }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.entries.is_some()
    }
}
