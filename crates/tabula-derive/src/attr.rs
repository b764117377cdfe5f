use proc_macro2::{Span, TokenStream};
use quote::{ToTokens, quote};
use syn::{
    Attribute, Fields, ItemFn, ItemImpl, ItemStruct, ItemTrait, LitInt, LitStr, Path, Token,
    parse::{Parse, ParseStream},
};

/// Field markers consumed by `#[table]`.
const FIELD_MARKERS: [&str; 2] = ["column", "foreign_key"];

fn is_field_marker(attr: &Attribute) -> bool {
    attr.path()
        .segments
        .last()
        .is_some_and(|segment| FIELD_MARKERS.iter().any(|m| segment.ident == *m))
}

/// Error tokens followed by the untouched item, so one mistake does not
/// cascade into unresolved-name errors.
fn fail(err: &syn::Error, item: impl ToTokens) -> TokenStream {
    let err = err.to_compile_error();
    quote!(#err #item)
}

//
// table
//

pub fn table(args: TokenStream, input: TokenStream) -> TokenStream {
    let mut item: ItemStruct = match syn::parse2(input.clone()) {
        Ok(item) => item,
        Err(_) => {
            let err = syn::Error::new(Span::call_site(), "#[table] can only be placed on a struct");
            return fail(&err, input);
        }
    };

    if let Fields::Named(fields) = &mut item.fields {
        for field in &mut fields.named {
            field.attrs.retain(|attr| !is_field_marker(attr));
        }
    }

    match syn::parse2::<LitStr>(args) {
        Ok(_) => item.into_token_stream(),
        Err(err) => fail(&err, item),
    }
}

//
// getter_for / setter_for
//

pub fn accessor(args: TokenStream, input: TokenStream) -> TokenStream {
    match syn::parse2::<LitStr>(args) {
        Ok(_) => input,
        Err(err) => fail(&err, input),
    }
}

//
// migration
//

///
/// MigrationArgs
/// `version = <u32>`
///

struct MigrationArgs;

impl Parse for MigrationArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let key: syn::Ident = input.parse()?;
        if key != "version" {
            return Err(syn::Error::new(key.span(), "expected `version = <number>`"));
        }
        input.parse::<Token![=]>()?;
        input.parse::<LitInt>()?.base10_parse::<u32>()?;

        Ok(Self)
    }
}

pub fn migration(args: TokenStream, input: TokenStream) -> TokenStream {
    if syn::parse2::<ItemFn>(input.clone()).is_err() {
        let err = syn::Error::new(Span::call_site(), "#[migration] can only be placed on a function");
        return fail(&err, input);
    }

    match syn::parse2::<MigrationArgs>(args) {
        Ok(_) => input,
        Err(err) => fail(&err, input),
    }
}

//
// type_adapter
//

pub fn type_adapter(args: TokenStream, input: TokenStream) -> TokenStream {
    if !args.is_empty() {
        let err = syn::Error::new(Span::call_site(), "#[type_adapter] takes no arguments");
        return fail(&err, input);
    }

    match syn::parse2::<ItemImpl>(input.clone()) {
        Ok(item) if item.trait_.is_some() => input,
        _ => {
            let err = syn::Error::new(
                Span::call_site(),
                "#[type_adapter] should be placed on `impl TypeAdapter<D, S> for Adapter`",
            );
            fail(&err, input)
        }
    }
}

//
// repository_for
//

pub fn repository_for(args: TokenStream, input: TokenStream) -> TokenStream {
    if syn::parse2::<ItemTrait>(input.clone()).is_err() {
        let err = syn::Error::new(Span::call_site(), "#[repository_for] can only be placed on a trait");
        return fail(&err, input);
    }

    match syn::parse2::<Path>(args) {
        Ok(_) => input,
        Err(err) => fail(&err, input),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_compile_error(tokens: &TokenStream) -> bool {
        tokens.to_string().contains("compile_error")
    }

    #[test]
    fn table_strips_field_markers() {
        let out = table(
            quote!("notes"),
            quote! {
                #[derive(Default)]
                pub struct Note {
                    pub id: Option<i64>,
                    #[column("note")]
                    #[foreign_key(table = "notes")]
                    #[serde(default)]
                    pub note: i64,
                }
            },
        );
        let item: ItemStruct = syn::parse2(out).unwrap();
        let Fields::Named(fields) = &item.fields else {
            panic!("named fields expected");
        };

        assert_eq!(item.attrs.len(), 1);
        assert_eq!(fields.named[1].attrs.len(), 1);
        assert!(fields.named[1].attrs[0].path().is_ident("serde"));
    }

    #[test]
    fn table_needs_a_name_literal() {
        let out = table(quote!(notes), quote!(pub struct Note {}));

        assert!(has_compile_error(&out));
        assert!(out.to_string().contains("struct Note"));
    }

    #[test]
    fn table_rejects_non_structs() {
        assert!(has_compile_error(&table(quote!("colors"), quote!(enum Color { Red }))));
    }

    #[test]
    fn migration_checks_version() {
        let item = quote!(fn first() -> Migration { Migration::new() });

        assert!(!has_compile_error(&migration(quote!(version = 1), item.clone())));
        assert!(has_compile_error(&migration(quote!(version = -1), item.clone())));
        assert!(has_compile_error(&migration(quote!(number = 1), item)));
    }

    #[test]
    fn type_adapter_needs_a_trait_impl() {
        let ok = quote!(impl TypeAdapter<bool, i64> for Flag {});
        let inherent = quote!(impl Flag {});

        assert!(!has_compile_error(&type_adapter(TokenStream::new(), ok)));
        assert!(has_compile_error(&type_adapter(TokenStream::new(), inherent)));
    }

    #[test]
    fn markers_pass_items_through() {
        let method = quote!(pub fn title(&self) -> String { String::new() });
        let queries = quote!(pub trait NoteQueries: ModelRepository<Note> {});

        assert_eq!(accessor(quote!("title"), method.clone()).to_string(), method.to_string());
        assert_eq!(
            repository_for(quote!(crate::model::Note), queries.clone()).to_string(),
            queries.to_string()
        );
        assert!(has_compile_error(&accessor(quote!(title), method)));
    }
}
