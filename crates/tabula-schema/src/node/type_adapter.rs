use crate::{diagnostic::Location, types::SqlType};
use syn::{Type, parse_quote};

///
/// TypeAdapterElement
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TypeAdapterElement {
    /// Path of the adapter type, usable from generated code.
    pub adapter: String,
    pub deserialized: Type,
    pub serialized: Type,
    /// `types::scoped_type_key` of `deserialized`; builtins use the short key.
    pub key: String,
    pub sql_type: SqlType,
    pub builtin: bool,
    pub location: Option<Location>,
}

impl TypeAdapterElement {
    /// Adapters the runtime registers on its own.
    #[must_use]
    pub fn builtins() -> Vec<Self> {
        vec![
            Self::builtin("BoolAdapter", "bool", parse_quote!(bool)),
            Self::builtin(
                "SystemTimeAdapter",
                "SystemTime",
                parse_quote!(std::time::SystemTime),
            ),
            Self::builtin(
                "DateTimeAdapter",
                "DateTime<Utc>",
                parse_quote!(chrono::DateTime<chrono::Utc>),
            ),
            Self::builtin(
                "NaiveDateAdapter",
                "NaiveDate",
                parse_quote!(chrono::NaiveDate),
            ),
        ]
    }

    fn builtin(adapter: &str, key: &str, deserialized: Type) -> Self {
        Self {
            adapter: format!("::tabula::adapter::{adapter}"),
            deserialized,
            serialized: parse_quote!(i64),
            key: key.to_string(),
            sql_type: SqlType::Integer,
            builtin: true,
            location: None,
        }
    }
}
