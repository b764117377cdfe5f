use crate::codegen::{self, ModelNames};
use proc_macro2::TokenStream;
use quote::quote;
use tabula_schema::prelude::*;

/// Repository struct for one model, implementing `ModelRepository` and the
/// model's `#[repository_for]` trait when there is one.
#[must_use]
pub fn generate(model: &ModelElement, names: &ModelNames) -> TokenStream {
    let repository = &names.repository;
    let model_path = codegen::path(&model.qualified);
    let overrides = model.repository.as_ref().map(|element| {
        let path = codegen::path(&element.qualified);
        quote!(impl #path for #repository {})
    });

    quote! {
        pub struct #repository {
            base: ::tabula::Repository<#model_path>,
        }

        impl #repository {
            pub fn new(
                connection: &::tabula::ConnectionHandle,
                adapters: &::std::sync::Arc<::tabula::AdapterHolder>,
                cache_size: usize,
            ) -> ::core::result::Result<Self, ::tabula::Error> {
                ::core::result::Result::Ok(Self {
                    base: ::tabula::Repository::new(connection, adapters, cache_size)?,
                })
            }
        }

        impl ::tabula::ModelRepository<#model_path> for #repository {
            fn base(&self) -> &::tabula::Repository<#model_path> {
                &self.base
            }
        }

        #overrides
    }
}
