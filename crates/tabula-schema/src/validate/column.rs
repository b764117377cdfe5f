use crate::{ID_COLUMN, ID_FIELD, attr, prelude::*, validate::not_applicable};

///
/// ColumnValidator
///

pub struct ColumnValidator;

impl Validator for ColumnValidator {
    fn validate(&self, registry: &Registry, decl: &Declaration, diagnostics: &mut Diagnostics) -> bool {
        let Item::Field { owner, .. } = &decl.item else {
            return not_applicable(decl, diagnostics);
        };
        let loc = &decl.location;

        if !owner.is_table {
            err!(
                diagnostics,
                loc,
                "#[column] fields can only be enclosed by #[table] structs ({} `{}`)",
                owner.kind,
                owner.ident
            );
            return false;
        }

        let name = match attr::sql_name_arg(&decl.attr) {
            Ok(name) => name,
            Err(e) => {
                err!(diagnostics, loc, "invalid #[column] name on {}.{}: {e}", owner.ident, decl.ident);
                return false;
            }
        };

        if name == ID_COLUMN || decl.ident == ID_FIELD {
            err!(
                diagnostics,
                loc,
                "{}.{} cannot be a #[column]: `{ID_FIELD}` / `{ID_COLUMN}` are the primary key",
                owner.ident,
                decl.ident
            );
            return false;
        }

        if registry
            .get_column_elements(&owner.qualified)
            .iter()
            .any(|c| c.name == name)
        {
            err!(diagnostics, loc, "duplicate column name: {name}");
            return false;
        }

        true
    }
}
