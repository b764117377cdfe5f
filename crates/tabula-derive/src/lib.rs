//! Attribute macros marking tabula declarations.
//!
//! The macros only check argument shape and, for `#[table]`, strip the
//! field-level `#[column]` and `#[foreign_key]` markers. Everything else
//! is read from source by `tabula-build`.

use proc_macro::TokenStream;

mod attr;

#[proc_macro_attribute]
pub fn table(args: TokenStream, input: TokenStream) -> TokenStream {
    attr::table(args.into(), input.into()).into()
}

#[proc_macro_attribute]
pub fn getter_for(args: TokenStream, input: TokenStream) -> TokenStream {
    attr::accessor(args.into(), input.into()).into()
}

#[proc_macro_attribute]
pub fn setter_for(args: TokenStream, input: TokenStream) -> TokenStream {
    attr::accessor(args.into(), input.into()).into()
}

#[proc_macro_attribute]
pub fn migration(args: TokenStream, input: TokenStream) -> TokenStream {
    attr::migration(args.into(), input.into()).into()
}

#[proc_macro_attribute]
pub fn type_adapter(args: TokenStream, input: TokenStream) -> TokenStream {
    attr::type_adapter(args.into(), input.into()).into()
}

#[proc_macro_attribute]
pub fn repository_for(args: TokenStream, input: TokenStream) -> TokenStream {
    attr::repository_for(args.into(), input.into()).into()
}
