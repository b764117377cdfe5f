//! ## Crate layout
//! - `build`: build-script code generation (`tabula::build!()`).
//! - `core`: runtime contract, type adapters, migrations, repositories and
//!   the database lifecycle.
//! - `schema`: element model, registry and validators used by the build.
//!
//! Attributes: `#[table]`, `#[getter_for]`, `#[setter_for]`, `#[migration]`,
//! `#[type_adapter]` and `#[repository_for]`. `#[column]` and
//! `#[foreign_key]` are field markers read inside `#[table]` structs.
//!
//! Generated code only names paths under `::tabula`, so user crates need no
//! direct dependency on `tabula-core` or `rusqlite`.

pub use tabula_build as build;
pub use tabula_core as core;
pub use tabula_schema as schema;

pub use tabula_core::{
    AdapterHolder, ConnectionHandle, DEFAULT_CACHE_SIZE, Database, DatabaseConfig, Error,
    ID_COLUMN, LifecycleState, LogLevel, Migration, Model, ModelAdapter, ModelRepository,
    Registration, Repository, RepositoryHolder, TableSchema, TypeAdapter, TypeAdapterError,
    TypeAdapters, VERSION, adapter, db, query, repository,
};
pub use tabula_build::build;
pub use tabula_derive::{getter_for, migration, repository_for, setter_for, table, type_adapter};

/// re-exports
///
/// generated code reaches the SQLite types through here
pub mod __reexports {
    pub use tabula_core::__reexports::rusqlite;
}

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::{
        Database, DatabaseConfig, Error, LogLevel, Migration, Model as _, ModelRepository,
        TypeAdapter, TypeAdapterError, getter_for, migration, repository_for, setter_for, table,
        type_adapter,
    };
}
