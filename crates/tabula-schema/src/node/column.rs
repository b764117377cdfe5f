use crate::{ID_COLUMN, diagnostic::Location, types::SqlType};
use darling::FromMeta;
use std::fmt::{self, Display};
use syn::Type;

///
/// ColumnElement
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ColumnElement {
    /// Qualified path of the enclosing table struct.
    pub enclosing: String,
    pub field: String,
    pub name: String,
    /// Whether generated code may touch the field directly.
    pub visible: bool,

    /// Declared field type, `Option` included.
    pub ty: Type,
    pub nullable: bool,
    pub sql_type: SqlType,
    pub storage: ColumnStorage,

    pub getter: Option<String>,
    pub setter: Option<String>,
    pub foreign_key: Option<ForeignKey>,
    pub location: Location,
}

impl ColumnElement {
    /// Column definition as it appears inside `CREATE TABLE (...)`.
    #[must_use]
    pub fn definition(&self) -> String {
        let mut def = format!("{} {}", self.name, self.sql_type);
        if !self.nullable {
            def.push_str(" NOT NULL");
        }
        if let Some(fk) = &self.foreign_key {
            def.push(' ');
            def.push_str(&fk.to_string());
        }

        def
    }
}

///
/// ColumnStorage
/// How a field value reaches SQLite.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ColumnStorage {
    /// rusqlite reads and writes the field type itself.
    Direct,

    /// Routed through the type adapter registered for `deserialized`.
    Adapted { deserialized: Type, serialized: Type },
}

///
/// ForeignKey
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ForeignKey {
    pub table: String,
    pub column: String,
    pub on_delete: Option<ForeignKeyAction>,
    pub on_update: Option<ForeignKeyAction>,
}

impl ForeignKey {
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: ID_COLUMN.to_string(),
            on_delete: None,
            on_update: None,
        }
    }
}

impl Display for ForeignKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "REFERENCES {}({})", self.table, self.column)?;
        if let Some(action) = self.on_delete {
            write!(f, " ON DELETE {action}")?;
        }
        if let Some(action) = self.on_update {
            write!(f, " ON UPDATE {action}")?;
        }

        Ok(())
    }
}

///
/// ForeignKeyAction
///

#[derive(Clone, Copy, Debug, Eq, FromMeta, PartialEq)]
pub enum ForeignKeyAction {
    #[darling(rename = "no_action")]
    NoAction,
    #[darling(rename = "restrict")]
    Restrict,
    #[darling(rename = "set_null")]
    SetNull,
    #[darling(rename = "set_default")]
    SetDefault,
    #[darling(rename = "cascade")]
    Cascade,
}

impl Display for ForeignKeyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NoAction => "NO ACTION",
            Self::Restrict => "RESTRICT",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
            Self::Cascade => "CASCADE",
        })
    }
}
