//! Module: registry
//! Responsibility: index of every element discovered in one build.
//! Does not own: validation; callers validate before adding.
//!
//! Invariants:
//! - Column names are unique per enclosing table; re-adding one is a no-op.
//! - One type adapter per deserialized type key; later additions replace earlier ones.
//! - Iteration order is insertion order (migrations: version order).

use crate::node::{
    ColumnElement, MigrationElement, ModelElement, RepositoryElement, TypeAdapterElement,
};
use indexmap::IndexMap;
use std::collections::BTreeMap;

///
/// Registry
///

#[derive(Clone, Debug, Default)]
pub struct Registry {
    migrations: BTreeMap<u32, MigrationElement>,
    type_adapters: IndexMap<String, TypeAdapterElement>,
    columns: IndexMap<String, Vec<ColumnElement>>,
    models: IndexMap<String, ModelElement>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    //
    // migrations
    //

    /// Returns the element previously registered for the same version, if any.
    pub fn add_migration_element(&mut self, element: MigrationElement) -> Option<MigrationElement> {
        self.migrations.insert(element.version, element)
    }

    #[must_use]
    pub fn get_migration_element(&self, version: u32) -> Option<&MigrationElement> {
        self.migrations.get(&version)
    }

    pub fn migration_elements(&self) -> impl Iterator<Item = &MigrationElement> {
        self.migrations.values()
    }

    //
    // type adapters
    //

    pub fn add_type_adapter_element(
        &mut self,
        element: TypeAdapterElement,
    ) -> Option<TypeAdapterElement> {
        self.type_adapters.insert(element.key.clone(), element)
    }

    #[must_use]
    pub fn get_type_adapter_element(&self, key: &str) -> Option<&TypeAdapterElement> {
        self.type_adapters.get(key)
    }

    pub fn type_adapter_elements(&self) -> impl Iterator<Item = &TypeAdapterElement> {
        self.type_adapters.values()
    }

    //
    // columns
    //

    /// Returns `false` when the table already has a column with this name.
    pub fn add_column_element(&mut self, element: ColumnElement) -> bool {
        let columns = self.columns.entry(element.enclosing.clone()).or_default();
        if columns.iter().any(|c| c.name == element.name) {
            return false;
        }
        columns.push(element);

        true
    }

    #[must_use]
    pub fn get_column_elements(&self, enclosing: &str) -> &[ColumnElement] {
        self.columns.get(enclosing).map_or(&[], Vec::as_slice)
    }

    pub fn get_column_element_mut(
        &mut self,
        enclosing: &str,
        name: &str,
    ) -> Option<&mut ColumnElement> {
        self.columns
            .get_mut(enclosing)?
            .iter_mut()
            .find(|c| c.name == name)
    }

    //
    // models
    //

    pub fn add_model_element(&mut self, element: ModelElement) -> Option<ModelElement> {
        self.models.insert(element.qualified.clone(), element)
    }

    #[must_use]
    pub fn get_model_element(&self, qualified: &str) -> Option<&ModelElement> {
        self.models.get(qualified)
    }

    #[must_use]
    pub fn get_model_element_by_table(&self, table: &str) -> Option<&ModelElement> {
        self.models.values().find(|m| m.table == table)
    }

    pub fn model_elements(&self) -> impl Iterator<Item = &ModelElement> {
        self.models.values()
    }

    /// Attach a repository override to its model. Returns `false` if the
    /// model is unknown.
    pub fn set_repository_element(&mut self, element: RepositoryElement) -> bool {
        match self.models.get_mut(&element.model) {
            Some(model) => {
                model.repository = Some(element);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{diagnostic::Location, node::ColumnStorage, types::SqlType};
    use syn::parse_quote;

    fn column(enclosing: &str, name: &str) -> ColumnElement {
        ColumnElement {
            enclosing: enclosing.to_string(),
            field: name.to_string(),
            name: name.to_string(),
            visible: true,
            ty: parse_quote!(String),
            nullable: false,
            sql_type: SqlType::Text,
            storage: ColumnStorage::Direct,
            getter: None,
            setter: None,
            foreign_key: None,
            location: Location::default(),
        }
    }

    fn migration(version: u32, qualified: &str) -> MigrationElement {
        MigrationElement {
            version,
            qualified: qualified.to_string(),
            location: Location::default(),
        }
    }

    #[test]
    fn column_registration_is_idempotent_per_table() {
        let mut registry = Registry::new();

        assert!(registry.add_column_element(column("crate::Note", "title")));
        assert!(!registry.add_column_element(column("crate::Note", "title")));
        assert!(registry.add_column_element(column("crate::Tag", "title")));

        assert_eq!(registry.get_column_elements("crate::Note").len(), 1);
        assert!(registry.get_column_elements("crate::Missing").is_empty());
    }

    #[test]
    fn columns_keep_declaration_order() {
        let mut registry = Registry::new();
        for name in ["title", "body", "date"] {
            registry.add_column_element(column("crate::Note", name));
        }

        let names: Vec<_> = registry
            .get_column_elements("crate::Note")
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, ["title", "body", "date"]);
    }

    #[test]
    fn migrations_iterate_by_version() {
        let mut registry = Registry::new();
        registry.add_migration_element(migration(3, "crate::c"));
        registry.add_migration_element(migration(1, "crate::a"));

        let prior = registry.add_migration_element(migration(3, "crate::d"));
        assert_eq!(prior.map(|m| m.qualified), Some("crate::c".to_string()));

        let versions: Vec<_> = registry.migration_elements().map(|m| m.version).collect();
        assert_eq!(versions, [1, 3]);
        assert!(registry.get_migration_element(2).is_none());
    }

    #[test]
    fn user_adapter_replaces_builtin() {
        let mut registry = Registry::new();
        for builtin in TypeAdapterElement::builtins() {
            registry.add_type_adapter_element(builtin);
        }
        let mut custom = TypeAdapterElement::builtins().remove(0);
        custom.adapter = "crate::adapters::YesNo".to_string();
        custom.builtin = false;

        let prior = registry.add_type_adapter_element(custom).unwrap();

        assert!(prior.builtin);
        assert_eq!(
            registry.get_type_adapter_element("bool").unwrap().adapter,
            "crate::adapters::YesNo"
        );
        assert_eq!(registry.type_adapter_elements().count(), 4);
    }

    #[test]
    fn repository_needs_a_known_model() {
        let mut registry = Registry::new();
        let repository = RepositoryElement {
            ident: "NoteQueries".to_string(),
            qualified: "crate::NoteQueries".to_string(),
            model: "crate::Note".to_string(),
            location: Location::default(),
        };
        assert!(!registry.set_repository_element(repository.clone()));

        registry.add_model_element(ModelElement {
            ident: "Note".to_string(),
            qualified: "crate::Note".to_string(),
            table: "notes".to_string(),
            location: Location::default(),
            repository: None,
        });

        assert!(registry.set_repository_element(repository));
        assert!(registry.get_model_element("crate::Note").unwrap().repository.is_some());
        assert!(registry.get_model_element_by_table("notes").is_some());
    }
}
