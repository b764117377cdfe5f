use crate::{attr, prelude::*, validate::not_applicable};
use syn::{FnArg, ReturnType};

///
/// AccessorKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AccessorKind {
    Getter,
    Setter,
}

impl AccessorKind {
    #[must_use]
    pub const fn annotation(self) -> Annotation {
        match self {
            Self::Getter => Annotation::GetterFor,
            Self::Setter => Annotation::SetterFor,
        }
    }
}

///
/// AccessorValidator
/// Shared by `#[getter_for]` and `#[setter_for]`.
///

pub struct AccessorValidator {
    pub kind: AccessorKind,
}

impl AccessorValidator {
    #[must_use]
    pub const fn getter() -> Self {
        Self {
            kind: AccessorKind::Getter,
        }
    }

    #[must_use]
    pub const fn setter() -> Self {
        Self {
            kind: AccessorKind::Setter,
        }
    }
}

impl Validator for AccessorValidator {
    fn validate(&self, registry: &Registry, decl: &Declaration, diagnostics: &mut Diagnostics) -> bool {
        let Item::Method {
            owner,
            trait_impl,
            method,
        } = &decl.item
        else {
            return not_applicable(decl, diagnostics);
        };
        let loc = &decl.location;
        let annotation = self.kind.annotation();

        let model = owner
            .as_deref()
            .filter(|_| !trait_impl)
            .and_then(|owner| registry.get_model_element(owner));
        let Some(model) = model else {
            err!(
                diagnostics,
                loc,
                "{annotation} methods can only be enclosed by an inherent impl of a #[table] struct (`{}`)",
                decl.ident
            );
            return false;
        };

        let column = match attr::name_arg(&decl.attr) {
            Ok(column) => column,
            Err(e) => {
                err!(diagnostics, loc, "invalid {annotation} argument on `{}`: {e}", decl.ident);
                return false;
            }
        };

        if !registry
            .get_column_elements(&model.qualified)
            .iter()
            .any(|c| c.name == column)
        {
            err!(
                diagnostics,
                loc,
                "#[{}(\"{column}\")] found without a #[column] field for \"{column}\".",
                annotation.name()
            );
            return false;
        }

        let receiver = method.sig.inputs.first().and_then(|arg| match arg {
            FnArg::Receiver(receiver) if receiver.reference.is_some() => {
                Some(receiver.mutability.is_some())
            }
            _ => None,
        });
        let arity = method.sig.inputs.len();
        let returns = !matches!(method.sig.output, ReturnType::Default);

        let (shape_ok, expected) = match self.kind {
            AccessorKind::Getter => (receiver == Some(false) && arity == 1 && returns, "fn(&self) -> T"),
            AccessorKind::Setter => (receiver == Some(true) && arity == 2, "fn(&mut self, value: T)"),
        };
        if !shape_ok {
            err!(
                diagnostics,
                loc,
                "{annotation} method `{}` should have the signature `{expected}`",
                decl.ident
            );
            return false;
        }

        true
    }
}
