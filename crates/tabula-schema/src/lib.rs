//! ## Crate layout
//! - `attr`: argument parsing for the tabula attributes.
//! - `decl`: annotated declarations as discovered in source, with their scope.
//! - `diagnostic`: located errors and warnings collected during a build.
//! - `node`: element descriptors for tables, columns, adapters, migrations and repositories.
//! - `registry`: the per-build index of every registered element.
//! - `types`: Rust type inspection and SQLite storage classes.
//! - `validate`: one validator per attribute kind.

pub mod attr;
pub mod decl;
pub mod diagnostic;
pub mod node;
pub mod registry;
pub mod types;
pub mod validate;

/// Maximum length for table and column identifiers.
pub const MAX_NAME_LEN: usize = 64;

/// Primary key column present on every table.
pub const ID_COLUMN: &str = "id_column";

/// Field backing the primary key on every `#[table]` struct.
pub const ID_FIELD: &str = "id";

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        decl::{Annotation, Declaration, Declarations, Item, Owner, Scope},
        diagnostic::{Diagnostic, Diagnostics, Level, Location},
        err,
        node::*,
        registry::Registry,
        types::SqlType,
        validate::Validator,
    };
}
