use crate::codegen::{self, ModelNames, ddl};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use tabula_schema::prelude::*;

/// Schema constant, `Model` impl and model adapter for one table.
#[must_use]
pub fn generate(model: &ModelElement, columns: &[ColumnElement], names: &ModelNames) -> TokenStream {
    let ModelNames { adapter, schema, .. } = names;
    let model_path = codegen::path(&model.qualified);
    let qualified = &model.qualified;
    let table = &model.table;
    let create = ddl::create_table(model, columns);

    let loads = columns.iter().map(load);
    let values = columns.iter().map(value);
    let uses_types = columns
        .iter()
        .any(|c| matches!(c.storage, ColumnStorage::Adapted { .. }));
    let silence = (!uses_types).then(|| quote!(let _ = types;));

    quote! {
        pub const #schema: &str = #create;

        impl ::tabula::Model for #model_path {
            const PATH: &'static str = #qualified;

            fn id(&self) -> ::core::option::Option<i64> {
                self.id
            }

            fn set_id(&mut self, id: ::core::option::Option<i64>) {
                self.id = id;
            }
        }

        pub struct #adapter;

        impl ::tabula::TableSchema for #adapter {
            fn table_name(&self) -> &'static str {
                #table
            }

            fn schema(&self) -> &'static str {
                #schema
            }
        }

        impl ::tabula::ModelAdapter<#model_path> for #adapter {
            fn load(
                &self,
                entity: &mut #model_path,
                row: &::tabula::__reexports::rusqlite::Row<'_>,
                types: &::tabula::TypeAdapters,
            ) -> ::core::result::Result<(), ::tabula::Error> {
                #silence
                ::tabula::Model::set_id(entity, row.get(::tabula::ID_COLUMN)?);
                #(#loads)*

                ::core::result::Result::Ok(())
            }

            fn values(
                &self,
                entity: &#model_path,
                types: &::tabula::TypeAdapters,
            ) -> ::core::result::Result<
                ::std::vec::Vec<(&'static str, ::tabula::__reexports::rusqlite::types::Value)>,
                ::tabula::Error,
            > {
                #silence
                ::core::result::Result::Ok(::std::vec![#(#values),*])
            }
        }
    }
}

/// Statement reading one column into the entity.
fn load(column: &ColumnElement) -> TokenStream {
    let name = &column.name;
    let read = match &column.storage {
        ColumnStorage::Direct => quote!(row.get(#name)?),
        ColumnStorage::Adapted { serialized, .. } => {
            let storage = codegen::storage(serialized);
            if column.nullable {
                quote!(types.deserialize::<_, #storage>(row.get(#name)?)?)
            } else {
                quote!(types.deserialize_required::<_, #storage>(row.get(#name)?)?)
            }
        }
    };

    match &column.setter {
        Some(setter) => {
            let setter = format_ident!("{}", setter);
            quote!(entity.#setter(#read);)
        }
        None => {
            let field = format_ident!("{}", column.field);
            quote!(entity.#field = #read;)
        }
    }
}

/// `(column, Value)` pair for one column.
fn value(column: &ColumnElement) -> TokenStream {
    let name = &column.name;
    let owned = match &column.getter {
        Some(getter) => {
            let getter = format_ident!("{}", getter);
            quote!(entity.#getter())
        }
        None => {
            let field = format_ident!("{}", column.field);
            quote!(::core::clone::Clone::clone(&entity.#field))
        }
    };

    let value = match &column.storage {
        ColumnStorage::Direct => owned,
        ColumnStorage::Adapted { serialized, .. } => {
            let storage = codegen::storage(serialized);
            let borrowed = match &column.getter {
                Some(_) => quote!(&#owned),
                None => {
                    let field = format_ident!("{}", column.field);
                    quote!(&entity.#field)
                }
            };
            if column.nullable {
                quote!(types.serialize::<_, #storage>(::core::option::Option::as_ref(#borrowed))?)
            } else {
                quote!(types.serialize_required::<_, #storage>(#borrowed)?)
            }
        }
    };

    quote! {
        (#name, ::tabula::__reexports::rusqlite::types::Value::from(#value))
    }
}
