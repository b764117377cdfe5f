//! Argument parsing for the tabula attributes.
//!
//! `#[table("notes")]`, `#[column("title")]`, `#[getter_for("title")]` and
//! `#[setter_for("title")]` take one string literal; `#[repository_for(Note)]`
//! takes a path; the rest take `key = value` lists parsed with darling.

use crate::{
    ID_COLUMN, MAX_NAME_LEN,
    node::{ForeignKey, ForeignKeyAction},
};
use darling::FromMeta;
use syn::{Attribute, LitStr, Meta, Path};

/// The single string literal argument of a naming attribute.
pub fn name_arg(attr: &Attribute) -> Result<String, String> {
    let lit: LitStr = attr
        .parse_args()
        .map_err(|e| format!("expected a single string literal: {e}"))?;

    Ok(lit.value())
}

/// Like `name_arg`, also checking the name is a usable SQL identifier.
pub fn sql_name_arg(attr: &Attribute) -> Result<String, String> {
    let name = name_arg(attr)?;
    check_sql_name(&name)?;

    Ok(name)
}

/// SQLite keywords the parser never accepts as a bare table or column name.
/// Generated DDL and DML leave identifiers unquoted.
const RESERVED_WORDS: &[&str] = &[
    "ADD", "ALL", "ALTER", "AND", "AS", "AUTOINCREMENT", "BETWEEN", "CASE", "CHECK", "COLLATE",
    "COMMIT", "CONSTRAINT", "CREATE", "DEFAULT", "DEFERRABLE", "DELETE", "DISTINCT", "DROP",
    "ELSE", "ESCAPE", "EXCEPT", "EXISTS", "FILTER", "FOREIGN", "FROM", "GROUP", "HAVING", "IN",
    "INDEX", "INDEXED", "INSERT", "INTERSECT", "INTO", "IS", "ISNULL", "JOIN", "LIMIT", "NOT",
    "NOTHING", "NOTNULL", "NULL", "ON", "OR", "ORDER", "OVER", "PRIMARY", "REFERENCES",
    "RETURNING", "SELECT", "SET", "TABLE", "THEN", "TO", "TRANSACTION", "UNION", "UNIQUE",
    "UPDATE", "USING", "VALUES", "WHEN", "WHERE", "WINDOW",
];

pub fn check_sql_name(name: &str) -> Result<(), String> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err("name is empty".to_string());
    };
    if !(first.is_ascii_alphabetic() || first == '_')
        || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(format!("'{name}' is not a valid SQL identifier"));
    }
    if RESERVED_WORDS.iter().any(|word| word.eq_ignore_ascii_case(name)) {
        return Err(format!("'{name}' is a reserved SQL keyword"));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(format!(
            "'{name}' exceeds the maximum length of {MAX_NAME_LEN}"
        ));
    }

    Ok(())
}

///
/// MigrationArgs
///

#[derive(Debug, FromMeta)]
pub struct MigrationArgs {
    pub version: u32,
}

impl MigrationArgs {
    pub fn parse(attr: &Attribute) -> Result<Self, String> {
        Self::from_meta(&attr.meta).map_err(|e| e.to_string())
    }
}

///
/// ForeignKeyArgs
///

#[derive(Debug, FromMeta)]
pub struct ForeignKeyArgs {
    pub table: String,

    #[darling(default)]
    pub column: Option<String>,

    #[darling(default)]
    pub on_delete: Option<ForeignKeyAction>,

    #[darling(default)]
    pub on_update: Option<ForeignKeyAction>,
}

impl ForeignKeyArgs {
    pub fn parse(attr: &Attribute) -> Result<ForeignKey, String> {
        let args = Self::from_meta(&attr.meta).map_err(|e| e.to_string())?;
        check_sql_name(&args.table)?;
        let column = args.column.unwrap_or_else(|| ID_COLUMN.to_string());
        check_sql_name(&column)?;

        Ok(ForeignKey {
            table: args.table,
            column,
            on_delete: args.on_delete,
            on_update: args.on_update,
        })
    }
}

/// The model path named by `#[repository_for(Model)]`.
pub fn model_path_arg(attr: &Attribute) -> Result<Path, String> {
    match &attr.meta {
        Meta::List(_) => attr
            .parse_args::<Path>()
            .map_err(|e| format!("expected a model path: {e}")),
        _ => Err("expected a model path, as in #[repository_for(Note)]".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn names_are_string_literals() {
        let attr: Attribute = parse_quote!(#[table("notes")]);
        assert_eq!(sql_name_arg(&attr).unwrap(), "notes");

        let attr: Attribute = parse_quote!(#[table(notes)]);
        assert!(name_arg(&attr).is_err());

        let attr: Attribute = parse_quote!(#[column("two words")]);
        assert!(sql_name_arg(&attr).is_err());
    }

    #[test]
    fn reserved_keywords_are_not_names() {
        assert_eq!(
            check_sql_name("order"),
            Err("'order' is a reserved SQL keyword".to_string())
        );
        assert!(check_sql_name("Group").is_err());
        assert!(check_sql_name("ordered").is_ok());
        assert!(check_sql_name("key").is_ok());
    }

    #[test]
    fn migration_version_is_required() {
        let attr: Attribute = parse_quote!(#[migration(version = 3)]);
        assert_eq!(MigrationArgs::parse(&attr).unwrap().version, 3);

        let attr: Attribute = parse_quote!(#[migration]);
        assert!(MigrationArgs::parse(&attr).is_err());
    }

    #[test]
    fn foreign_key_defaults_to_primary_key() {
        let attr: Attribute = parse_quote!(#[foreign_key(table = "notes", on_delete = "cascade")]);
        let fk = ForeignKeyArgs::parse(&attr).unwrap();

        assert_eq!(
            fk.to_string(),
            "REFERENCES notes(id_column) ON DELETE CASCADE"
        );
    }

    #[test]
    fn foreign_key_rejects_unknown_action() {
        let attr: Attribute = parse_quote!(#[foreign_key(table = "notes", on_delete = "explode")]);

        assert!(ForeignKeyArgs::parse(&attr).is_err());
    }

    #[test]
    fn repository_names_a_path() {
        let attr: Attribute = parse_quote!(#[repository_for(crate::model::Note)]);
        let path = model_path_arg(&attr).unwrap();

        assert_eq!(path.segments.len(), 3);
        assert!(model_path_arg(&parse_quote!(#[repository_for])).is_err());
    }
}
