//! Module: step::model_adapter
//! Responsibility: register tables and their columns, bind accessors, emit
//! one model adapter per valid table.
//! Does not own: repository or holder emission.
//!
//! Order within the step:
//! 1. every `#[table]` is validated and registered, so foreign keys and
//!    accessors can see all tables;
//! 2. columns are registered, storage resolved adapter-first, then by
//!    primitive type;
//! 3. getters and setters are validated and bound to their columns;
//! 4. private fields without both accessors fail their model;
//! 5. surviving models are emitted.

use crate::{
    codegen::{self, ModelNames},
    step::{BuildContext, ProcessingStep, Round},
};
use syn::{Type, Visibility};
use tabula_schema::{
    attr::{self, ForeignKeyArgs},
    prelude::*,
    types::{option_inner, scoped_type_key, type_key},
    validate::{AccessorKind, AccessorValidator, ColumnValidator, TableValidator},
};

///
/// ModelAdapterStep
///

pub struct ModelAdapterStep;

impl ProcessingStep for ModelAdapterStep {
    fn name(&self) -> &'static str {
        "model_adapter"
    }

    fn process(&mut self, round: &Round<'_>, context: &mut BuildContext) {
        if round.processing_over {
            return;
        }

        let models = register_models(round, context);
        for model in &models {
            register_columns(round, context, model);
        }
        check_foreign_keys(context, &models);

        bind_accessors(round, context, AccessorValidator::getter());
        bind_accessors(round, context, AccessorValidator::setter());

        for model in &models {
            check_visibility(context, model);
        }

        for model in &models {
            if context.is_failed(&model.qualified) {
                continue;
            }
            let columns = context.registry.get_column_elements(&model.qualified);
            let names = ModelNames::of(&context.registry, model);
            let tokens = codegen::model_adapter::generate(model, columns, &names);

            context.emit(format!("model_adapter {}", model.qualified), tokens);
        }
    }
}

fn register_models(round: &Round<'_>, context: &mut BuildContext) -> Vec<ModelElement> {
    let mut models = Vec::new();

    for decl in round.declarations.annotated_with(Annotation::Table) {
        if !TableValidator.validate(&context.registry, decl, &mut context.diagnostics) {
            continue;
        }
        let Ok(table) = attr::sql_name_arg(&decl.attr) else {
            continue;
        };

        let model = ModelElement {
            ident: decl.ident.clone(),
            qualified: decl.qualified(),
            table,
            location: decl.location.clone(),
            repository: None,
        };
        context.registry.add_model_element(model.clone());
        models.push(model);
    }

    models
}

fn register_columns(round: &Round<'_>, context: &mut BuildContext, model: &ModelElement) {
    for decl in round.declarations.fields_of(&model.qualified, Annotation::Column) {
        if !ColumnValidator.validate(&context.registry, decl, &mut context.diagnostics) {
            context.fail_model(&model.qualified);
            continue;
        }
        match column_element(round, context, model, decl) {
            Some(column) => {
                context.registry.add_column_element(column);
            }
            None => context.fail_model(&model.qualified),
        }
    }
}

fn column_element(
    round: &Round<'_>,
    context: &mut BuildContext,
    model: &ModelElement,
    decl: &Declaration,
) -> Option<ColumnElement> {
    let Item::Field { field, .. } = &decl.item else {
        return None;
    };
    let name = attr::sql_name_arg(&decl.attr).ok()?;
    let loc = &decl.location;

    let inner = option_inner(&field.ty);
    let value_ty = inner.unwrap_or(&field.ty);
    let key = scoped_type_key(value_ty, &decl.scope);

    let (sql_type, storage) = if let Some(adapter) = adapter_for(&context.registry, value_ty, &decl.scope) {
        (
            adapter.sql_type,
            ColumnStorage::Adapted {
                deserialized: value_ty.clone(),
                serialized: adapter.serialized.clone(),
            },
        )
    } else if let Some(sql_type) = SqlType::of_primitive(&key) {
        (sql_type, ColumnStorage::Direct)
    } else {
        err!(
            context.diagnostics,
            loc,
            "column '{name}' of {} has type `{key}`, which has no storage primitive; declare a #[type_adapter] for it",
            model.ident
        );
        return None;
    };

    let mut foreign_key = None;
    for fk in round.declarations.fields_of(&model.qualified, Annotation::ForeignKey) {
        if fk.ident != decl.ident {
            continue;
        }
        match ForeignKeyArgs::parse(&fk.attr) {
            Ok(parsed) => foreign_key = Some(parsed),
            Err(e) => {
                err!(
                    context.diagnostics,
                    &fk.location,
                    "invalid #[foreign_key] on {}.{}: {e}",
                    model.ident,
                    decl.ident
                );
                return None;
            }
        }
    }

    Some(ColumnElement {
        enclosing: model.qualified.clone(),
        field: decl.ident.clone(),
        name,
        visible: !matches!(field.vis, Visibility::Inherited),
        ty: field.ty.clone(),
        nullable: inner.is_some(),
        sql_type,
        storage,
        getter: None,
        setter: None,
        foreign_key,
        location: decl.location.clone(),
    })
}

/// Adapter for `ty` as written in `scope`: its scoped key, then the bare
/// name behind each glob import, then the short key of a type a glob may
/// have brought in from another crate.
fn adapter_for<'r>(registry: &'r Registry, ty: &Type, scope: &Scope) -> Option<&'r TypeAdapterElement> {
    let mut keys = vec![scoped_type_key(ty, scope)];
    if let Type::Path(path) = ty
        && path.qself.is_none()
    {
        let globbed = scope.glob_candidates(&path.path);
        if !globbed.is_empty() {
            keys.extend(globbed);
            keys.push(type_key(ty));
        }
    }

    keys.iter().find_map(|key| registry.get_type_adapter_element(key))
}

/// Warn about references to tables the build does not know. They may still
/// come from a migration.
fn check_foreign_keys(context: &mut BuildContext, models: &[ModelElement]) {
    let mut unknown = Vec::new();
    for model in models {
        for column in context.registry.get_column_elements(&model.qualified) {
            if let Some(fk) = &column.foreign_key
                && context.registry.get_model_element_by_table(&fk.table).is_none()
            {
                unknown.push((column.location.clone(), format!(
                    "foreign key {}.{} references table '{}', which is not a #[table] struct",
                    model.ident, column.field, fk.table
                )));
            }
        }
    }

    for (location, message) in unknown {
        context.diagnostics.warning(Some(&location), message);
    }
}

fn bind_accessors(round: &Round<'_>, context: &mut BuildContext, validator: AccessorValidator) {
    let annotation = validator.kind.annotation();

    for decl in round.declarations.annotated_with(annotation) {
        let valid = validator.validate(&context.registry, decl, &mut context.diagnostics);
        let Some(owner) = decl.enclosing().map(ToString::to_string) else {
            continue;
        };
        if !valid {
            if context.registry.get_model_element(&owner).is_some() {
                context.fail_model(&owner);
            }
            continue;
        }
        if let Item::Method { method, .. } = &decl.item
            && matches!(method.vis, Visibility::Inherited)
        {
            let message = format!(
                "{annotation} method `{}` must be visible to the crate (pub or pub(crate))",
                decl.ident
            );
            context.diagnostics.error(Some(&decl.location), message);
            context.fail_model(&owner);
            continue;
        }
        let Ok(name) = attr::name_arg(&decl.attr) else {
            continue;
        };
        let Some(column) = context.registry.get_column_element_mut(&owner, &name) else {
            continue;
        };

        let slot = match validator.kind {
            AccessorKind::Getter => &mut column.getter,
            AccessorKind::Setter => &mut column.setter,
        };
        if let Some(previous) = slot {
            let message = format!(
                "duplicate #[{}(\"{name}\")]: `{previous}` and `{}`",
                annotation.name(),
                decl.ident
            );
            context.diagnostics.error(Some(&decl.location), message);
            context.fail_model(&owner);
            continue;
        }
        *slot = Some(decl.ident.clone());
    }
}

fn check_visibility(context: &mut BuildContext, model: &ModelElement) {
    let mut hidden = Vec::new();
    for column in context.registry.get_column_elements(&model.qualified) {
        if !column.visible && (column.getter.is_none() || column.setter.is_none()) {
            hidden.push((
                column.location.clone(),
                format!(
                    "column '{}' of {} is a private field; make `{}` visible to the crate or add both #[getter_for(\"{0}\")] and #[setter_for(\"{0}\")]",
                    column.name, model.ident, column.field
                ),
            ));
        }
    }

    if !hidden.is_empty() {
        context.fail_model(&model.qualified);
    }
    for (location, message) in hidden {
        context.diagnostics.error(Some(&location), message);
    }
}
