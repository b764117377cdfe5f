use crate::{
    ID_FIELD, attr,
    prelude::*,
    types::{option_inner, type_key},
    validate::not_applicable,
};
use syn::{Fields, Visibility};

///
/// TableValidator
///

pub struct TableValidator;

impl Validator for TableValidator {
    fn validate(&self, registry: &Registry, decl: &Declaration, diagnostics: &mut Diagnostics) -> bool {
        let Item::Struct(item) = &decl.item else {
            return not_applicable(decl, diagnostics);
        };
        let loc = &decl.location;
        let mut valid = true;

        match attr::sql_name_arg(&decl.attr) {
            Ok(table) => {
                let qualified = decl.qualified();
                if let Some(other) = registry
                    .get_model_element_by_table(&table)
                    .filter(|other| other.qualified != qualified)
                {
                    err!(
                        diagnostics,
                        loc,
                        "duplicate table name '{table}' on {qualified} and {}",
                        other.qualified
                    );
                    valid = false;
                }
            }
            Err(e) => {
                err!(diagnostics, loc, "invalid #[table] name on {}: {e}", decl.ident);
                valid = false;
            }
        }

        if !item.generics.params.is_empty() {
            err!(diagnostics, loc, "#[table] struct {} cannot be generic", decl.ident);
            valid = false;
        }

        let Fields::Named(fields) = &item.fields else {
            err!(diagnostics, loc, "#[table] struct {} needs named fields", decl.ident);
            return false;
        };

        match fields.named.iter().find(|f| f.ident.as_ref().is_some_and(|i| i == ID_FIELD)) {
            None => {
                err!(
                    diagnostics,
                    loc,
                    "#[table] struct {} needs an `{ID_FIELD}: Option<i64>` field",
                    decl.ident
                );
                valid = false;
            }
            Some(id) => {
                if option_inner(&id.ty).map(type_key).as_deref() != Some("i64") {
                    err!(
                        diagnostics,
                        loc,
                        "field `{ID_FIELD}` of {} must have type Option<i64>",
                        decl.ident
                    );
                    valid = false;
                }
                if matches!(id.vis, Visibility::Inherited) {
                    err!(
                        diagnostics,
                        loc,
                        "field `{ID_FIELD}` of {} must be visible to the crate (pub or pub(crate))",
                        decl.ident
                    );
                    valid = false;
                }
            }
        }

        valid
    }
}
