//! Module: validate
//! Responsibility: structural rules for each attribute kind.
//! Does not own: registration; a step registers only what its validator accepted.
//!
//! Every validator reports through the shared `Diagnostics` and returns
//! whether the declaration may be registered. None of them abort the build.

mod accessor;
mod column;
mod migration;
mod repository;
mod table;
mod type_adapter;

#[cfg(test)]
mod tests;

pub use accessor::{AccessorKind, AccessorValidator};
pub use column::ColumnValidator;
pub use migration::MigrationValidator;
pub use repository::RepositoryValidator;
pub use table::TableValidator;
pub use type_adapter::{TypeAdapterValidator, adapter_types};

use crate::{decl::Declaration, diagnostic::Diagnostics, registry::Registry};

///
/// Validator
///

pub trait Validator {
    fn validate(&self, registry: &Registry, decl: &Declaration, diagnostics: &mut Diagnostics)
    -> bool;
}

/// Report an attribute placed on an item kind it does not support.
pub(crate) fn not_applicable(decl: &Declaration, diagnostics: &mut Diagnostics) -> bool {
    crate::err!(
        diagnostics,
        &decl.location,
        "{} not applicable to this kind of declaration ({} `{}`)",
        decl.annotation,
        decl.item.kind(),
        decl.ident
    );

    false
}
