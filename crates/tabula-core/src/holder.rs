//! Module: holder
//! Responsibility: runtime registries that the generated factory functions populate.
//! Does not own: construction order; the generated `REGISTRATION` decides that.

use crate::{
    Error, Migration, Model, ModelAdapter, ModelRepository, TableSchema, TypeAdapter,
    TypeAdapters,
};
use std::{
    any::{Any, TypeId, type_name},
    collections::{BTreeMap, HashMap},
    fmt,
    sync::Arc,
};

///
/// AdapterHolder
///
/// Migrations by version, model adapters by model type, and the type adapter
/// table shared by every repository.
///

pub struct AdapterHolder {
    migrations: BTreeMap<u32, Migration>,
    model_adapters: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    schemas: Vec<Arc<dyn TableSchema>>,
    type_adapters: TypeAdapters,
}

impl AdapterHolder {
    /// Holder with the built-in type adapters and nothing else.
    #[must_use]
    pub fn new() -> Self {
        Self {
            migrations: BTreeMap::new(),
            model_adapters: HashMap::new(),
            schemas: Vec::new(),
            type_adapters: TypeAdapters::with_builtins(),
        }
    }

    pub fn add_migration(&mut self, version: u32, migration: Migration) -> Result<(), Error> {
        if self.migrations.contains_key(&version) {
            return Err(Error::DuplicateMigration(version));
        }
        self.migrations.insert(version, migration);

        Ok(())
    }

    pub fn add_model_adapter<T, A>(&mut self, adapter: A)
    where
        T: Model,
        A: ModelAdapter<T> + 'static,
    {
        let adapter = Arc::new(adapter);
        let schema: Arc<dyn TableSchema> = adapter.clone();
        let adapter: Arc<dyn ModelAdapter<T>> = adapter;

        if self
            .model_adapters
            .insert(TypeId::of::<T>(), Box::new(adapter))
            .is_some()
        {
            self.schemas.retain(|s| s.table_name() != schema.table_name());
        }
        self.schemas.push(schema);
    }

    pub fn add_type_adapter<D, S, A>(&mut self, adapter: A)
    where
        D: 'static,
        S: 'static,
        A: TypeAdapter<D, S> + 'static,
    {
        self.type_adapters.register::<D, S, A>(adapter);
    }

    #[must_use]
    pub const fn migrations(&self) -> &BTreeMap<u32, Migration> {
        &self.migrations
    }

    /// Every registered table, in registration order.
    #[must_use]
    pub fn schemas(&self) -> &[Arc<dyn TableSchema>] {
        &self.schemas
    }

    #[must_use]
    pub const fn type_adapters(&self) -> &TypeAdapters {
        &self.type_adapters
    }

    pub fn model_adapter<T: Model>(&self) -> Result<Arc<dyn ModelAdapter<T>>, Error> {
        self.model_adapters
            .get(&TypeId::of::<T>())
            .and_then(|erased| erased.downcast_ref::<Arc<dyn ModelAdapter<T>>>())
            .cloned()
            .ok_or(Error::ModelAdapterNotFound(T::PATH))
    }
}

impl Default for AdapterHolder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AdapterHolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tables: Vec<_> = self.schemas.iter().map(|s| s.table_name()).collect();

        f.debug_struct("AdapterHolder")
            .field("migrations", &self.migrations.keys().collect::<Vec<_>>())
            .field("tables", &tables)
            .field("type_adapters", &self.type_adapters)
            .finish()
    }
}

///
/// RepositoryHolder
///
/// Repositories by model type, plus the same instances by their concrete
/// type so override trait methods stay reachable.
///

#[derive(Default)]
pub struct RepositoryHolder {
    repositories: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    concrete: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl RepositoryHolder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_repository<T, R>(&mut self, repository: R)
    where
        T: Model,
        R: ModelRepository<T> + 'static,
    {
        let repository = Arc::new(repository);
        let erased: Arc<dyn ModelRepository<T>> = repository.clone();

        self.repositories.insert(TypeId::of::<T>(), Box::new(erased));
        self.concrete.insert(TypeId::of::<R>(), repository);
    }

    pub fn repository<T: Model>(&self) -> Result<Arc<dyn ModelRepository<T>>, Error> {
        self.repositories
            .get(&TypeId::of::<T>())
            .and_then(|erased| erased.downcast_ref::<Arc<dyn ModelRepository<T>>>())
            .cloned()
            .ok_or(Error::RepositoryNotFound(T::PATH))
    }

    /// The registered repository of concrete type `R`.
    pub fn repository_as<R: Send + Sync + 'static>(&self) -> Result<Arc<R>, Error> {
        self.concrete
            .get(&TypeId::of::<R>())
            .cloned()
            .and_then(|erased| erased.downcast::<R>().ok())
            .ok_or(Error::RepositoryNotFound(type_name::<R>()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.repositories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }
}

impl fmt::Debug for RepositoryHolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepositoryHolder")
            .field("len", &self.repositories.len())
            .finish()
    }
}
