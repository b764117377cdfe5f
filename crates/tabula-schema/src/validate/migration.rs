use crate::{attr::MigrationArgs, prelude::*, validate::not_applicable};
use syn::{ReturnType, Type};

///
/// MigrationValidator
///

pub struct MigrationValidator;

impl Validator for MigrationValidator {
    fn validate(&self, registry: &Registry, decl: &Declaration, diagnostics: &mut Diagnostics) -> bool {
        let Item::Fn(item) = &decl.item else {
            return not_applicable(decl, diagnostics);
        };
        let loc = &decl.location;

        let args = match MigrationArgs::parse(&decl.attr) {
            Ok(args) => args,
            Err(e) => {
                err!(diagnostics, loc, "invalid #[migration] arguments on `{}`: {e}", decl.ident);
                return false;
            }
        };

        let mut valid = true;
        if !item.sig.inputs.is_empty()
            || item.sig.asyncness.is_some()
            || !item.sig.generics.params.is_empty()
            || !returns_migration(&item.sig.output)
        {
            err!(
                diagnostics,
                loc,
                "#[migration] functions should be plain `fn() -> Migration` (`{}`)",
                decl.ident
            );
            valid = false;
        }

        if let Some(prev) = registry.get_migration_element(args.version) {
            err!(
                diagnostics,
                loc,
                "Found two migrations with the same version: \n\t- {};\n\t- {}\nEach of your migrations needs to have a unique version.",
                prev.qualified,
                decl.qualified()
            );
            valid = false;
        }

        valid
    }
}

fn returns_migration(output: &ReturnType) -> bool {
    let ReturnType::Type(_, ty) = output else {
        return false;
    };
    let Type::Path(path) = ty.as_ref() else {
        return false;
    };

    path.path
        .segments
        .last()
        .is_some_and(|segment| segment.ident == "Migration" && segment.arguments.is_none())
}
