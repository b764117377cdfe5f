use crate::codegen::{self, ModelNames};
use proc_macro2::TokenStream;
use quote::quote;
use tabula_schema::prelude::*;

/// `adapter_holder()`: migrations in version order, user type adapters,
/// then one model adapter per model.
#[must_use]
pub fn adapter_holder(registry: &Registry, models: &[&ModelElement]) -> TokenStream {
    let migrations = registry.migration_elements().map(|migration| {
        let version = migration.version;
        let function = codegen::path(&migration.qualified);
        quote!(holder.add_migration(#version, #function())?;)
    });

    let type_adapters = registry
        .type_adapter_elements()
        .filter(|element| !element.builtin)
        .map(|element| {
            let adapter = codegen::path(&element.adapter);
            let storage = codegen::storage(&element.serialized);
            quote! {
                holder.add_type_adapter::<_, #storage, _>(
                    <#adapter as ::core::default::Default>::default(),
                );
            }
        });

    let model_adapters = models.iter().map(|model| {
        let adapter = ModelNames::of(registry, model).adapter;
        let model_path = codegen::path(&model.qualified);
        quote!(holder.add_model_adapter::<#model_path, _>(#adapter);)
    });

    quote! {
        #[allow(unused_mut)]
        pub fn adapter_holder() -> ::core::result::Result<::tabula::AdapterHolder, ::tabula::Error> {
            let mut holder = ::tabula::AdapterHolder::new();
            #(#migrations)*
            #(#type_adapters)*
            #(#model_adapters)*

            ::core::result::Result::Ok(holder)
        }
    }
}

/// `repository_holder(..)` plus the `REGISTRATION` handed to `Database::init`.
#[must_use]
pub fn repository_holder(registry: &Registry, models: &[&ModelElement]) -> TokenStream {
    let repositories = models.iter().map(|model| {
        let repository = ModelNames::of(registry, model).repository;
        let model_path = codegen::path(&model.qualified);
        quote! {
            holder.add_repository::<#model_path, _>(
                #repository::new(connection, adapters, cache_size)?,
            );
        }
    });

    quote! {
        #[allow(unused_mut, unused_variables)]
        pub fn repository_holder(
            connection: &::tabula::ConnectionHandle,
            adapters: &::std::sync::Arc<::tabula::AdapterHolder>,
            cache_size: usize,
        ) -> ::core::result::Result<::tabula::RepositoryHolder, ::tabula::Error> {
            let mut holder = ::tabula::RepositoryHolder::new();
            #(#repositories)*

            ::core::result::Result::Ok(holder)
        }

        pub const REGISTRATION: ::tabula::Registration = ::tabula::Registration {
            adapter_holder,
            repository_holder,
        };
    }
}
