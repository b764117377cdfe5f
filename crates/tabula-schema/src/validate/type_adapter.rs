use crate::{
    prelude::*,
    types::{SqlType, scoped_type_key, type_key},
    validate::not_applicable,
};
use syn::{GenericArgument, Path, PathArguments, Type};

/// `(D, S)` of a `TypeAdapter<D, S>` trait path.
#[must_use]
pub fn adapter_types(path: &Path) -> Option<(&Type, &Type)> {
    let segment = path.segments.last()?;
    if segment.ident != "TypeAdapter" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    let mut types = args.args.iter().filter_map(|arg| match arg {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    });

    match (types.next(), types.next(), types.next()) {
        (Some(d), Some(s), None) => Some((d, s)),
        _ => None,
    }
}

///
/// TypeAdapterValidator
///

pub struct TypeAdapterValidator;

impl Validator for TypeAdapterValidator {
    fn validate(&self, registry: &Registry, decl: &Declaration, diagnostics: &mut Diagnostics) -> bool {
        let Item::Impl(item) = &decl.item else {
            return not_applicable(decl, diagnostics);
        };
        let loc = &decl.location;

        let types = item
            .trait_
            .as_ref()
            .and_then(|(negative, path, _)| negative.is_none().then_some(path))
            .and_then(adapter_types);
        let Some((deserialized, serialized)) = types else {
            err!(
                diagnostics,
                loc,
                "#[type_adapter] should be placed on `impl TypeAdapter<D, S> for {}`",
                decl.ident
            );
            return false;
        };

        let mut valid = true;
        if !item.generics.params.is_empty() || !matches!(item.self_ty.as_ref(), Type::Path(_)) {
            err!(
                diagnostics,
                loc,
                "#[type_adapter] {} must be a concrete, non-generic type",
                decl.ident
            );
            valid = false;
        }

        let storage = type_key(serialized);
        if SqlType::of_primitive(&storage).is_none() {
            err!(
                diagnostics,
                loc,
                "#[type_adapter] {} serializes to `{storage}`, which is not a storage primitive \
                 (i8, i16, i32, i64, u8, u16, u32, f32, f64, String, Vec<u8>)",
                decl.ident
            );
            valid = false;
        }

        let key = scoped_type_key(deserialized, &decl.scope);
        if let Some(prev) = registry
            .get_type_adapter_element(&key)
            .filter(|prev| !prev.builtin)
        {
            err!(
                diagnostics,
                loc,
                "duplicate #[type_adapter] for `{key}`: {} and {}",
                prev.adapter,
                decl.qualified()
            );
            valid = false;
        }

        valid
    }
}
