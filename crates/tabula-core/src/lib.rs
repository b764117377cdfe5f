//! ## Crate layout
//! - `adapter`: type adapters between Rust values and SQLite storage primitives.
//! - `db`: database lifecycle, configuration, and the shared connection handle.
//! - `error`: runtime error type shared by generated and hand-written code.
//! - `holder`: registries the generated factory functions populate at init.
//! - `migration`: versioned schema migrations with optional hooks.
//! - `model`: traits every generated model adapter implements.
//! - `query`: minimal statement builders used by repositories.
//! - `repository`: per-model repositories with an LRU identity cache.

pub mod adapter;
pub mod db;
pub mod error;
pub mod holder;
pub mod migration;
pub mod model;
pub mod query;
pub mod repository;

#[cfg(test)]
mod fixtures;

pub use adapter::{TypeAdapter, TypeAdapterError, TypeAdapters};
pub use db::{ConnectionHandle, Database, DatabaseConfig, LifecycleState, LogLevel, Registration};
pub use error::Error;
pub use holder::{AdapterHolder, RepositoryHolder};
pub use migration::Migration;
pub use model::{ID_COLUMN, Model, ModelAdapter, TableSchema};
pub use repository::{ModelRepository, Repository};

///
/// Consts
///

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Identity cache capacity used when the configuration does not set one.
pub const DEFAULT_CACHE_SIZE: usize = 1024;

/// re-exports
///
/// generated code reaches the SQLite types through here so the user crate
/// does not need its own rusqlite dependency
pub mod __reexports {
    pub use rusqlite;
}
