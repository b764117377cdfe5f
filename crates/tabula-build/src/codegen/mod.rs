//! Token generators. Every path in generated code is absolute (`crate::`,
//! `::tabula::`, `::core::`) so the output can be included anywhere in the
//! user crate.

pub mod ddl;
pub mod holder;
pub mod model_adapter;
pub mod repository;

use convert_case::{Case, Casing};
use proc_macro2::{Ident, TokenStream};
use quote::{ToTokens, format_ident, quote};
use syn::Type;
use tabula_schema::{prelude::*, types::type_key};

///
/// ModelNames
/// Identifiers generated for one model. Models sharing an ident are told
/// apart by their module path.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ModelNames {
    pub adapter: Ident,
    pub repository: Ident,
    pub schema: Ident,
}

impl ModelNames {
    #[must_use]
    pub fn of(registry: &Registry, model: &ModelElement) -> Self {
        let clash = registry
            .model_elements()
            .any(|other| other.ident == model.ident && other.qualified != model.qualified);
        let base = if clash {
            model
                .qualified
                .trim_start_matches("crate::")
                .replace("::", "_")
                .to_case(Case::Pascal)
        } else {
            model.ident.clone()
        };

        Self {
            adapter: format_ident!("{base}ModelAdapter"),
            repository: format_ident!("{base}Repository"),
            schema: format_ident!("{}_SCHEMA", base.to_case(Case::UpperSnake)),
        }
    }
}

/// Tokens for a `crate::...` path string.
#[must_use]
pub fn path(qualified: &str) -> TokenStream {
    match syn::parse_str::<syn::Path>(qualified) {
        Ok(path) => path.to_token_stream(),
        Err(e) => {
            let message = format!("tabula: invalid path `{qualified}`: {e}");
            quote!(::core::compile_error!(#message))
        }
    }
}

/// Canonical storage type for a serialized type, as seen from the crate root.
#[must_use]
pub fn storage(serialized: &Type) -> TokenStream {
    let key = type_key(serialized);
    match syn::parse_str::<Type>(&key) {
        Ok(ty) => ty.to_token_stream(),
        Err(_) => serialized.to_token_stream(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(ident: &str, qualified: &str) -> ModelElement {
        ModelElement {
            ident: ident.to_string(),
            qualified: qualified.to_string(),
            table: ident.to_lowercase(),
            location: Location::default(),
            repository: None,
        }
    }

    #[test]
    fn names_use_the_ident_when_unique() {
        let mut registry = Registry::new();
        let note = model("NoteTag", "crate::model::NoteTag");
        registry.add_model_element(note.clone());

        let names = ModelNames::of(&registry, &note);
        assert_eq!(names.adapter, "NoteTagModelAdapter");
        assert_eq!(names.repository, "NoteTagRepository");
        assert_eq!(names.schema, "NOTE_TAG_SCHEMA");
    }

    #[test]
    fn clashing_idents_are_qualified() {
        let mut registry = Registry::new();
        let a = model("Note", "crate::drafts::Note");
        let b = model("Note", "crate::archive::Note");
        registry.add_model_element(a.clone());
        registry.add_model_element(b);

        let names = ModelNames::of(&registry, &a);
        assert_eq!(names.adapter, "DraftsNoteModelAdapter");
        assert_eq!(names.schema, "DRAFTS_NOTE_SCHEMA");
    }

    #[test]
    fn storage_types_are_canonical() {
        assert_eq!(storage(&syn::parse_quote!(std::string::String)).to_string(), "String");
        assert_eq!(storage(&syn::parse_quote!(Vec<u8>)).to_string(), "Vec < u8 >");
    }
}
