//! Module: repository
//! Responsibility: per-model persistence operations and the identity cache.
//! Does not own: column mapping, which the generated model adapter supplies.
//!
//! Invariants:
//! - `find` always reads storage; only `get_entity` reads the cache.
//! - `get_or_find_entity` never populates the cache on a miss.
//! - Writes bind mutable columns only and address rows by primary key.
//! - A deleted row's id never stays in the cache.

mod cache;


pub use cache::IdentityCache;

use crate::{
    AdapterHolder, ConnectionHandle, Error, Model, ModelAdapter, TypeAdapters,
    query::{self, Insert, Update},
};
use rusqlite::{Params, Row};
use std::sync::Arc;

///
/// Repository
///
/// The storage half of every generated repository.
///

pub struct Repository<T: Model> {
    connection: ConnectionHandle,
    adapters: Arc<AdapterHolder>,
    adapter: Arc<dyn ModelAdapter<T>>,
    cache: IdentityCache<T>,
}

impl<T: Model> Repository<T> {
    pub fn new(
        connection: &ConnectionHandle,
        adapters: &Arc<AdapterHolder>,
        cache_size: usize,
    ) -> Result<Self, Error> {
        Ok(Self {
            connection: connection.clone(),
            adapters: adapters.clone(),
            adapter: adapters.model_adapter::<T>()?,
            cache: IdentityCache::new(cache_size),
        })
    }

    #[must_use]
    pub const fn connection(&self) -> &ConnectionHandle {
        &self.connection
    }

    #[must_use]
    pub fn table_name(&self) -> &'static str {
        self.adapter.table_name()
    }

    #[must_use]
    pub fn type_adapters(&self) -> &TypeAdapters {
        self.adapters.type_adapters()
    }

    #[must_use]
    pub const fn cache(&self) -> &IdentityCache<T> {
        &self.cache
    }

    pub fn find(&self, id: i64) -> Result<Option<T>, Error> {
        let statement = query::select_by_id(self.table_name(), id);

        Ok(self
            .select(&statement.sql, rusqlite::params_from_iter(statement.params.iter()))?
            .into_iter()
            .next())
    }

    /// Run a `SELECT *` style query and load every row into a fresh entity.
    /// Results bypass the identity cache.
    pub fn select<P: Params>(&self, sql: &str, params: P) -> Result<Vec<T>, Error> {
        self.connection.log_statement(sql);
        self.connection.with(|conn| {
            let mut stmt = conn.prepare(sql)?;
            let mut rows = stmt.query(params)?;
            let mut entities = Vec::new();

            while let Some(row) = rows.next()? {
                let mut entity = T::default();
                self.load(&mut entity, row)?;
                entities.push(entity);
            }

            Ok(entities)
        })
    }

    pub fn create(&self, entity: &mut T) -> Result<i64, Error> {
        let values = self.adapter.values(entity, self.type_adapters())?;
        let statement = Insert::new(self.table_name()).pairs(values).build()?;

        self.connection.log_statement(&statement.sql);
        let id = self.connection.with(|conn| {
            statement.execute(conn)?;
            Ok(conn.last_insert_rowid())
        })?;
        entity.set_id(Some(id));

        Ok(id)
    }

    /// Returns the number of rows changed.
    pub fn update(&self, entity: &T) -> Result<usize, Error> {
        let id = entity.id().ok_or(Error::MissingId(T::PATH))?;
        let values = self.adapter.values(entity, self.type_adapters())?;
        if values.is_empty() {
            return Ok(0);
        }
        let statement = Update::new(self.table_name(), id).pairs(values).build()?;

        self.connection.log_statement(&statement.sql);
        self.connection
            .with(|conn| Ok(statement.execute(conn)?))
    }

    pub fn create_or_update(&self, entity: &mut T) -> Result<i64, Error> {
        match entity.id() {
            Some(id) => {
                self.update(entity)?;
                Ok(id)
            }
            None => self.create(entity),
        }
    }

    /// Returns the number of rows removed. The cached instance for the id is
    /// evicted with the row.
    pub fn delete(&self, entity: &T) -> Result<usize, Error> {
        let id = entity.id().ok_or(Error::MissingId(T::PATH))?;
        let statement = query::delete(self.table_name(), id);

        self.connection.log_statement(&statement.sql);
        let removed = self
            .connection
            .with(|conn| Ok(statement.execute(conn)?))?;
        self.cache.remove(id)?;

        Ok(removed)
    }

    pub fn load(&self, entity: &mut T, row: &Row<'_>) -> Result<(), Error> {
        self.adapter.load(entity, row, self.type_adapters())
    }
}

///
/// ModelRepository
///
/// The repository contract handed out by the database. Generated
/// repositories only provide `base`; user override traits extend it with
/// default-bodied methods.
///

pub trait ModelRepository<T: Model>: Send + Sync {
    fn base(&self) -> &Repository<T>;

    fn find(&self, id: i64) -> Result<Option<T>, Error> {
        self.base().find(id)
    }

    fn create(&self, entity: &mut T) -> Result<i64, Error> {
        self.base().create(entity)
    }

    fn update(&self, entity: &T) -> Result<usize, Error> {
        self.base().update(entity)
    }

    fn create_or_update(&self, entity: &mut T) -> Result<i64, Error> {
        self.base().create_or_update(entity)
    }

    fn delete(&self, entity: &T) -> Result<usize, Error> {
        self.base().delete(entity)
    }

    fn load(&self, entity: &mut T, row: &Row<'_>) -> Result<(), Error> {
        self.base().load(entity, row)
    }

    fn put_entity(&self, entity: Arc<T>) -> Result<(), Error> {
        self.base().cache().put(entity)
    }

    fn get_entity(&self, id: i64) -> Result<Option<Arc<T>>, Error> {
        self.base().cache().get(id)
    }

    fn remove_entity(&self, entity: &T) -> Result<(), Error> {
        if let Some(id) = entity.id() {
            self.base().cache().remove(id)?;
        }

        Ok(())
    }

    /// Cached instance if present, otherwise a fresh storage read that is
    /// not added to the cache.
    fn get_or_find_entity(&self, id: i64) -> Result<Option<Arc<T>>, Error> {
        if let Some(entity) = self.get_entity(id)? {
            return Ok(Some(entity));
        }

        Ok(self.find(id)?.map(Arc::new))
    }

    /// Create or update, then cache the stored instance.
    fn save(&self, mut entity: T) -> Result<Arc<T>, Error> {
        self.create_or_update(&mut entity)?;
        let entity = Arc::new(entity);
        self.put_entity(entity.clone())?;

        Ok(entity)
    }

    /// Delete the row, evict it, and clear the entity's id.
    fn remove(&self, entity: &mut T) -> Result<(), Error> {
        self.delete(entity)?;
        self.remove_entity(entity)?;
        entity.set_id(None);

        Ok(())
    }

    /// Load a row and cache the result.
    fn load_entity(&self, mut entity: T, row: &Row<'_>) -> Result<Arc<T>, Error> {
        self.load(&mut entity, row)?;
        let entity = Arc::new(entity);
        self.put_entity(entity.clone())?;

        Ok(entity)
    }
}
