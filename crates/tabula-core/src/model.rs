//! Traits implemented by user models and by the generated model adapters.

use crate::{Error, adapter::TypeAdapters};
use rusqlite::{Row, types::Value};

/// Auto-increment integer primary key present on every table.
pub const ID_COLUMN: &str = "id_column";

///
/// Model
///
/// A persistable struct. The generated adapter implements this for every
/// `#[table]` struct; `PATH` is its fully-qualified path and prefixes
/// identity cache keys.
///

pub trait Model: Default + Send + Sync + 'static {
    const PATH: &'static str;

    fn id(&self) -> Option<i64>;

    fn set_id(&mut self, id: Option<i64>);
}

///
/// TableSchema
///
/// Object-safe view of a model adapter used by the lifecycle to create
/// tables without knowing the model type.
///

pub trait TableSchema: Send + Sync {
    fn table_name(&self) -> &'static str;

    /// `CREATE TABLE IF NOT EXISTS ...` statement for this table.
    fn schema(&self) -> &'static str;
}

///
/// ModelAdapter
///

pub trait ModelAdapter<T: Model>: TableSchema {
    /// Populate `entity` from a row selected with `SELECT *`.
    fn load(&self, entity: &mut T, row: &Row<'_>, types: &TypeAdapters) -> Result<(), Error>;

    /// Mutable column values in declaration order, primary key excluded.
    fn values(&self, entity: &T, types: &TypeAdapters)
    -> Result<Vec<(&'static str, Value)>, Error>;
}
