use super::*;
use crate::{prelude::*, types::SqlType};
use pretty_assertions::assert_eq;
use syn::{Attribute, parse_quote};

//
// helpers
//

fn scope() -> Scope {
    let mut scope = Scope::new("crate::repos");
    scope.add_use("Note", "crate::model::Note");
    scope
}

fn decl(annotation: Annotation, attr: Attribute, ident: &str, item: Item) -> Declaration {
    Declaration {
        annotation,
        attr,
        ident: ident.to_string(),
        scope: scope(),
        location: Location::new("src/lib.rs", 3, 0),
        item,
    }
}

fn note_owner(is_table: bool) -> Owner {
    Owner {
        ident: "Note".to_string(),
        qualified: "crate::model::Note".to_string(),
        kind: "struct",
        is_table,
    }
}

fn registry_with_note(columns: &[&str]) -> Registry {
    let mut registry = Registry::new();
    registry.add_model_element(ModelElement {
        ident: "Note".to_string(),
        qualified: "crate::model::Note".to_string(),
        table: "notes".to_string(),
        location: Location::default(),
        repository: None,
    });
    for name in columns {
        registry.add_column_element(ColumnElement {
            enclosing: "crate::model::Note".to_string(),
            field: (*name).to_string(),
            name: (*name).to_string(),
            visible: true,
            ty: parse_quote!(String),
            nullable: false,
            sql_type: SqlType::Text,
            storage: ColumnStorage::Direct,
            getter: None,
            setter: None,
            foreign_key: None,
            location: Location::default(),
        });
    }

    registry
}

fn run(validator: &dyn Validator, registry: &Registry, decl: &Declaration) -> (bool, Vec<String>) {
    let mut diagnostics = Diagnostics::new();
    let valid = validator.validate(registry, decl, &mut diagnostics);
    let messages = diagnostics
        .error_messages()
        .into_iter()
        .map(ToString::to_string)
        .collect();

    (valid, messages)
}

fn column_decl(ident: &str, name: &str, is_table: bool) -> Declaration {
    let field: syn::Field = syn::parse_quote!(pub title: Option<String>);

    decl(
        Annotation::Column,
        parse_quote!(#[column(#name)]),
        ident,
        Item::Field {
            owner: note_owner(is_table),
            field,
        },
    )
}

fn method_decl(annotation: Annotation, column: &str, method: syn::ImplItemFn) -> Declaration {
    let attr: Attribute = match annotation {
        Annotation::GetterFor => parse_quote!(#[getter_for(#column)]),
        _ => parse_quote!(#[setter_for(#column)]),
    };
    let ident = method.sig.ident.to_string();

    decl(
        annotation,
        attr,
        &ident,
        Item::Method {
            owner: Some("crate::model::Note".to_string()),
            trait_impl: false,
            method,
        },
    )
}

//
// table
//

#[test]
fn table_accepts_struct_with_optional_id() {
    let item: syn::ItemStruct = parse_quote! {
        pub struct Note { pub id: Option<i64>, pub body: String }
    };
    let d = decl(Annotation::Table, parse_quote!(#[table("notes")]), "Note", Item::Struct(item));

    assert_eq!(run(&TableValidator, &Registry::new(), &d), (true, vec![]));
}

#[test]
fn table_requires_visible_optional_id() {
    let missing: syn::ItemStruct = parse_quote!(struct Note { body: String });
    let d = decl(Annotation::Table, parse_quote!(#[table("notes")]), "Note", Item::Struct(missing));
    let (valid, messages) = run(&TableValidator, &Registry::new(), &d);
    assert!(!valid);
    assert_eq!(messages, ["#[table] struct Note needs an `id: Option<i64>` field"]);

    let wrong: syn::ItemStruct = parse_quote!(struct Note { id: i64 });
    let d = decl(Annotation::Table, parse_quote!(#[table("notes")]), "Note", Item::Struct(wrong));
    let (valid, messages) = run(&TableValidator, &Registry::new(), &d);
    assert!(!valid);
    assert_eq!(messages.len(), 2);
}

#[test]
fn table_names_are_unique() {
    let item: syn::ItemStruct = parse_quote!(pub struct Memo { pub id: Option<i64> });
    let mut d = decl(Annotation::Table, parse_quote!(#[table("notes")]), "Memo", Item::Struct(item));
    d.scope = Scope::new("crate::model");

    let (valid, messages) = run(&TableValidator, &registry_with_note(&[]), &d);

    assert!(!valid);
    assert_eq!(
        messages,
        ["duplicate table name 'notes' on crate::model::Memo and crate::model::Note"]
    );
}

#[test]
fn table_on_function_is_not_applicable() {
    let item: syn::ItemFn = parse_quote!(fn notes() {});
    let d = decl(Annotation::Table, parse_quote!(#[table("notes")]), "notes", Item::Fn(item));

    let (valid, messages) = run(&TableValidator, &Registry::new(), &d);

    assert!(!valid);
    assert_eq!(
        messages,
        ["#[table] not applicable to this kind of declaration (function `notes`)"]
    );
}

//
// column
//

#[test]
fn column_outside_table_is_rejected() {
    let d = column_decl("title", "title", false);

    let (valid, messages) = run(&ColumnValidator, &Registry::new(), &d);

    assert!(!valid);
    assert_eq!(
        messages,
        ["#[column] fields can only be enclosed by #[table] structs (struct `Note`)"]
    );
}

#[test]
fn duplicate_column_is_rejected() {
    let registry = registry_with_note(&["title"]);

    let (valid, messages) = run(&ColumnValidator, &registry, &column_decl("heading", "title", true));

    assert!(!valid);
    assert_eq!(messages, ["duplicate column name: title"]);
    assert!(run(&ColumnValidator, &registry, &column_decl("body", "body", true)).0);
}

#[test]
fn primary_key_cannot_be_a_column() {
    let (valid, _) = run(&ColumnValidator, &registry_with_note(&[]), &column_decl("key", "id_column", true));

    assert!(!valid);
}

//
// accessors
//

#[test]
fn getter_without_column_is_a_hard_error() {
    let method: syn::ImplItemFn = parse_quote!(pub fn title(&self) -> String { String::new() });
    let d = method_decl(Annotation::GetterFor, "title", method);

    let (valid, messages) = run(&AccessorValidator::getter(), &registry_with_note(&["body"]), &d);

    assert!(!valid);
    assert_eq!(
        messages,
        ["#[getter_for(\"title\")] found without a #[column] field for \"title\"."]
    );
}

#[test]
fn accessors_check_their_signature() {
    let registry = registry_with_note(&["title"]);

    let getter: syn::ImplItemFn = parse_quote!(fn title(&self) -> String { String::new() });
    assert!(run(&AccessorValidator::getter(), &registry, &method_decl(Annotation::GetterFor, "title", getter)).0);

    let setter: syn::ImplItemFn = parse_quote!(fn set_title(&mut self, title: String) {});
    assert!(run(&AccessorValidator::setter(), &registry, &method_decl(Annotation::SetterFor, "title", setter)).0);

    let bad_setter: syn::ImplItemFn = parse_quote!(fn set_title(&self) {});
    let (valid, messages) = run(
        &AccessorValidator::setter(),
        &registry,
        &method_decl(Annotation::SetterFor, "title", bad_setter),
    );
    assert!(!valid);
    assert_eq!(
        messages,
        ["#[setter_for] method `set_title` should have the signature `fn(&mut self, value: T)`"]
    );
}

#[test]
fn accessor_outside_model_is_rejected() {
    let method: syn::ImplItemFn = parse_quote!(fn title(&self) -> String { String::new() });
    let mut d = method_decl(Annotation::GetterFor, "title", method);
    if let Item::Method { owner, .. } = &mut d.item {
        *owner = Some("crate::model::Other".to_string());
    }

    assert!(!run(&AccessorValidator::getter(), &registry_with_note(&["title"]), &d).0);
}

//
// migrations
//

#[test]
fn migration_must_be_a_function() {
    let item: syn::ItemStruct = parse_quote!(struct AddTags;);
    let d = decl(
        Annotation::Migration,
        parse_quote!(#[migration(version = 1)]),
        "AddTags",
        Item::Struct(item),
    );

    let (valid, messages) = run(&MigrationValidator, &Registry::new(), &d);

    assert!(!valid);
    assert!(messages[0].contains("not applicable to this kind of declaration"));
}

#[test]
fn migration_must_return_migration() {
    let item: syn::ItemFn = parse_quote!(fn add_tags() -> String { String::new() });
    let d = decl(Annotation::Migration, parse_quote!(#[migration(version = 1)]), "add_tags", Item::Fn(item));

    assert!(!run(&MigrationValidator, &Registry::new(), &d).0);
}

#[test]
fn duplicate_migration_version_names_both() {
    let mut registry = Registry::new();
    registry.add_migration_element(MigrationElement {
        version: 2,
        qualified: "crate::repos::add_tags".to_string(),
        location: Location::default(),
    });
    let item: syn::ItemFn = parse_quote!(fn add_colors() -> Migration { Migration::new() });
    let d = decl(Annotation::Migration, parse_quote!(#[migration(version = 2)]), "add_colors", Item::Fn(item));

    let (valid, messages) = run(&MigrationValidator, &registry, &d);

    assert!(!valid);
    assert_eq!(
        messages,
        ["Found two migrations with the same version: \n\t- crate::repos::add_tags;\n\t- crate::repos::add_colors\nEach of your migrations needs to have a unique version."]
    );
}

//
// type adapters
//

fn adapter_decl(item: syn::ItemImpl) -> Declaration {
    decl(Annotation::TypeAdapter, parse_quote!(#[type_adapter]), "ColorAdapter", Item::Impl(item))
}

#[test]
fn adapter_must_serialize_to_a_primitive() {
    let ok: syn::ItemImpl = parse_quote!(impl TypeAdapter<Color, String> for ColorAdapter {});
    assert!(run(&TypeAdapterValidator, &Registry::new(), &adapter_decl(ok)).0);

    let bad: syn::ItemImpl = parse_quote!(impl TypeAdapter<Color, Rgb> for ColorAdapter {});
    let (valid, messages) = run(&TypeAdapterValidator, &Registry::new(), &adapter_decl(bad));
    assert!(!valid);
    assert!(messages[0].contains("serializes to `Rgb`"));
}

#[test]
fn adapter_needs_the_trait() {
    let inherent: syn::ItemImpl = parse_quote!(impl ColorAdapter {});

    assert!(!run(&TypeAdapterValidator, &Registry::new(), &adapter_decl(inherent)).0);
}

#[test]
fn adapter_may_shadow_builtin_but_not_another_user_adapter() {
    let mut registry = Registry::new();
    for builtin in TypeAdapterElement::builtins() {
        registry.add_type_adapter_element(builtin);
    }
    let shadow: syn::ItemImpl = parse_quote!(impl TypeAdapter<bool, String> for YesNo {});
    assert!(run(&TypeAdapterValidator, &registry, &adapter_decl(shadow.clone())).0);

    let mut custom = TypeAdapterElement::builtins().remove(0);
    custom.builtin = false;
    custom.adapter = "crate::repos::OnOff".to_string();
    registry.add_type_adapter_element(custom);

    let (valid, messages) = run(&TypeAdapterValidator, &registry, &adapter_decl(shadow));
    assert!(!valid);
    assert_eq!(
        messages,
        ["duplicate #[type_adapter] for `bool`: crate::repos::OnOff and crate::repos::ColorAdapter"]
    );
}

//
// repositories
//

fn repository_decl(item: syn::ItemTrait) -> Declaration {
    decl(
        Annotation::RepositoryFor,
        parse_quote!(#[repository_for(Note)]),
        "NoteQueries",
        Item::Trait(item),
    )
}

#[test]
fn repository_trait_resolves_imported_model() {
    let item: syn::ItemTrait = parse_quote! {
        pub trait NoteQueries: ModelRepository<Note> {
            fn pinned(&self) -> Vec<Note> { Vec::new() }
        }
    };

    assert_eq!(
        run(&RepositoryValidator, &registry_with_note(&[]), &repository_decl(item)),
        (true, vec![])
    );
}

#[test]
fn repository_methods_need_default_bodies() {
    let item: syn::ItemTrait = parse_quote! {
        pub trait NoteQueries: ModelRepository<Note> {
            fn pinned(&self) -> Vec<Note>;
        }
    };

    let (valid, messages) = run(&RepositoryValidator, &registry_with_note(&[]), &repository_decl(item));

    assert!(!valid);
    assert_eq!(
        messages,
        ["#[repository_for] trait NoteQueries should provide a default body for `pinned`"]
    );
}

#[test]
fn repository_must_extend_model_repository_of_its_model() {
    let item: syn::ItemTrait = parse_quote! {
        pub trait NoteQueries: ModelRepository<crate::model::Tag> {}
    };

    let (valid, messages) = run(&RepositoryValidator, &registry_with_note(&[]), &repository_decl(item));

    assert!(!valid);
    assert_eq!(
        messages,
        ["#[repository_for] trait NoteQueries should extend ModelRepository<Note>"]
    );
}

#[test]
fn repository_must_be_a_trait() {
    let item: syn::ItemStruct = parse_quote!(struct NoteQueries;);
    let d = decl(
        Annotation::RepositoryFor,
        parse_quote!(#[repository_for(Note)]),
        "NoteQueries",
        Item::Struct(item),
    );

    assert!(!run(&RepositoryValidator, &registry_with_note(&[]), &d).0);
}
