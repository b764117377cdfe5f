use crate::decl::Scope;
use quote::ToTokens;
use std::fmt::{self, Display};
use syn::{GenericArgument, PathArguments, PathSegment, Type, TypePath};

/// Names usable without a `use`; they never resolve into the crate.
const PRELUDE: &[&str] = &[
    "bool", "char", "str", "String", "Vec", "Option", "Box", "i8", "i16", "i32", "i64", "i128",
    "isize", "u8", "u16", "u32", "u64", "u128", "usize", "f32", "f64",
];

///
/// SqlType
/// SQLite storage class of a column.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SqlType {
    Integer,
    Real,
    Text,
    Blob,
}

impl SqlType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Real => "REAL",
            Self::Text => "TEXT",
            Self::Blob => "BLOB",
        }
    }

    /// Storage class of a type rusqlite reads and writes natively.
    #[must_use]
    pub fn of_primitive(key: &str) -> Option<Self> {
        match key {
            "i8" | "i16" | "i32" | "i64" | "u8" | "u16" | "u32" => Some(Self::Integer),
            "f32" | "f64" => Some(Self::Real),
            "String" => Some(Self::Text),
            "Vec<u8>" => Some(Self::Blob),
            _ => None,
        }
    }
}

impl Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `T` for `Option<T>`, otherwise `None`.
#[must_use]
pub fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(inner) if args.args.len() == 1 => Some(inner),
        _ => None,
    }
}

/// Lookup key for a type: every path reduced to its last segment, generic
/// arguments kept, whitespace removed. `std::time::SystemTime` and
/// `SystemTime` share the key `SystemTime`.
#[must_use]
pub fn type_key(ty: &Type) -> String {
    key_of(ty, &|_| None)
}

/// Lookup key for a type as written in `scope`. Types defined in the crate
/// key on their full `crate::` path, so two same-named crate types never
/// share an adapter; prelude and external types keep their [`type_key`].
#[must_use]
pub fn scoped_type_key(ty: &Type, scope: &Scope) -> String {
    key_of(ty, &|path| crate_path(path, scope))
}

fn crate_path(path: &TypePath, scope: &Scope) -> Option<String> {
    if path.qself.is_some() || path.path.leading_colon.is_some() {
        return None;
    }
    if let Some(ident) = path.path.get_ident()
        && PRELUDE.contains(&ident.to_string().as_str())
    {
        return None;
    }

    let resolved = scope.resolve(&path.path);
    resolved.starts_with("crate::").then_some(resolved)
}

fn key_of(ty: &Type, crate_path: &dyn Fn(&TypePath) -> Option<String>) -> String {
    match ty {
        Type::Path(path) if path.qself.is_none() => path
            .path
            .segments
            .last()
            .map(|segment| {
                let head = crate_path(path).unwrap_or_else(|| segment.ident.to_string());
                with_arguments(head, segment, crate_path)
            })
            .unwrap_or_default(),
        Type::Reference(reference) => format!("&{}", key_of(&reference.elem, crate_path)),
        Type::Paren(paren) => key_of(&paren.elem, crate_path),
        Type::Group(group) => key_of(&group.elem, crate_path),
        other => compact(other),
    }
}

fn with_arguments(
    mut key: String,
    segment: &PathSegment,
    crate_path: &dyn Fn(&TypePath) -> Option<String>,
) -> String {
    if let PathArguments::AngleBracketed(args) = &segment.arguments {
        let args: Vec<String> = args
            .args
            .iter()
            .map(|arg| match arg {
                GenericArgument::Type(ty) => key_of(ty, crate_path),
                other => compact(other),
            })
            .collect();
        key.push('<');
        key.push_str(&args.join(","));
        key.push('>');
    }

    key
}

fn compact(tokens: &impl ToTokens) -> String {
    tokens
        .to_token_stream()
        .to_string()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}
