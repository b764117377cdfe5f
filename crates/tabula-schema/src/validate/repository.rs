use crate::{attr, prelude::*, validate::not_applicable};
use syn::{GenericArgument, PathArguments, TraitItem, Type, TypeParamBound};

///
/// RepositoryValidator
///

pub struct RepositoryValidator;

impl Validator for RepositoryValidator {
    fn validate(&self, registry: &Registry, decl: &Declaration, diagnostics: &mut Diagnostics) -> bool {
        let Item::Trait(item) = &decl.item else {
            return not_applicable(decl, diagnostics);
        };
        let loc = &decl.location;

        let model = match attr::model_path_arg(&decl.attr) {
            Ok(path) => decl
                .scope
                .resolve_with(&path, |model| registry.get_model_element(model).is_some()),
            Err(e) => {
                err!(diagnostics, loc, "invalid #[repository_for] argument on {}: {e}", decl.ident);
                return false;
            }
        };

        let mut valid = true;
        if registry.get_model_element(&model).is_none() {
            let globs = if decl.scope.globs().is_empty() {
                String::new()
            } else {
                format!(" (glob imports searched: {})", decl.scope.globs().join(", "))
            };
            err!(
                diagnostics,
                loc,
                "#[repository_for] on {} references `{model}`, which is not a #[table] struct{globs}",
                decl.ident
            );
            valid = false;
        }

        if !item.generics.params.is_empty() {
            err!(diagnostics, loc, "#[repository_for] trait {} cannot be generic", decl.ident);
            valid = false;
        }

        for trait_item in &item.items {
            if let TraitItem::Fn(method) = trait_item
                && method.default.is_none()
            {
                err!(
                    diagnostics,
                    loc,
                    "#[repository_for] trait {} should provide a default body for `{}`",
                    decl.ident,
                    method.sig.ident
                );
                valid = false;
            }
        }

        let extends_model_repository = item.supertraits.iter().any(|bound| {
            let TypeParamBound::Trait(bound) = bound else {
                return false;
            };
            let Some(segment) = bound.path.segments.last() else {
                return false;
            };
            if segment.ident != "ModelRepository" {
                return false;
            }
            let PathArguments::AngleBracketed(args) = &segment.arguments else {
                return false;
            };

            matches!(
                args.args.first(),
                Some(GenericArgument::Type(Type::Path(ty)))
                    if decl.scope.resolve_with(&ty.path, |path| path == model) == model
            )
        });
        if !extends_model_repository {
            let short = model.rsplit("::").next().unwrap_or(&model);
            err!(
                diagnostics,
                loc,
                "#[repository_for] trait {} should extend ModelRepository<{short}>",
                decl.ident
            );
            valid = false;
        }

        valid
    }
}
