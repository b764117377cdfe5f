use crate::step::{BuildContext, ProcessingStep, Round};
use syn::Type;
use tabula_schema::{
    prelude::*,
    types::{scoped_type_key, type_key},
    validate::{TypeAdapterValidator, adapter_types},
};

///
/// TypeAdapterStep
/// Seeds the built-in adapters, then registers `#[type_adapter]` impls.
/// A user adapter for a built-in type replaces the built-in.
///

#[derive(Default)]
pub struct TypeAdapterStep {
    seeded: bool,
}

impl ProcessingStep for TypeAdapterStep {
    fn name(&self) -> &'static str {
        "type_adapter"
    }

    fn process(&mut self, round: &Round<'_>, context: &mut BuildContext) {
        if !self.seeded {
            for builtin in TypeAdapterElement::builtins() {
                context.registry.add_type_adapter_element(builtin);
            }
            self.seeded = true;
        }

        for decl in round.declarations.annotated_with(Annotation::TypeAdapter) {
            if !TypeAdapterValidator.validate(&context.registry, decl, &mut context.diagnostics) {
                continue;
            }
            let Item::Impl(item) = &decl.item else {
                continue;
            };
            let Some((_, trait_path, _)) = &item.trait_ else {
                continue;
            };
            let Some((deserialized, serialized)) = adapter_types(trait_path) else {
                continue;
            };
            let Type::Path(self_ty) = item.self_ty.as_ref() else {
                continue;
            };

            let storage = type_key(serialized);
            let Some(sql_type) = SqlType::of_primitive(&storage) else {
                continue;
            };

            context.registry.add_type_adapter_element(TypeAdapterElement {
                adapter: decl.scope.resolve(&self_ty.path),
                deserialized: deserialized.clone(),
                serialized: serialized.clone(),
                key: scoped_type_key(deserialized, &decl.scope),
                sql_type,
                builtin: false,
                location: Some(decl.location.clone()),
            });
        }
    }
}
