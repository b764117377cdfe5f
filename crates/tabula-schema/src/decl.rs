//! Module: decl
//! Responsibility: annotated items as found in source, before validation.
//! Does not own: discovery (the build crate walks files) or any semantic checks.

use crate::diagnostic::Location;
use std::{collections::BTreeMap, fmt};
use syn::{Attribute, Field, ImplItemFn, ItemFn, ItemImpl, ItemStruct, ItemTrait, Path};

///
/// Annotation
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Annotation {
    Table,
    Column,
    ForeignKey,
    GetterFor,
    SetterFor,
    Migration,
    TypeAdapter,
    RepositoryFor,
}

impl Annotation {
    pub const ALL: [Self; 8] = [
        Self::Table,
        Self::Column,
        Self::ForeignKey,
        Self::GetterFor,
        Self::SetterFor,
        Self::Migration,
        Self::TypeAdapter,
        Self::RepositoryFor,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Column => "column",
            Self::ForeignKey => "foreign_key",
            Self::GetterFor => "getter_for",
            Self::SetterFor => "setter_for",
            Self::Migration => "migration",
            Self::TypeAdapter => "type_adapter",
            Self::RepositoryFor => "repository_for",
        }
    }

    /// Match an attribute by its last path segment, so both `#[table]` and
    /// `#[tabula::table]` are recognised.
    #[must_use]
    pub fn of(attr: &Attribute) -> Option<Self> {
        let ident = attr.path().segments.last()?.ident.to_string();

        Self::ALL.into_iter().find(|a| a.name() == ident)
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#[{}]", self.name())
    }
}

///
/// Scope
///
/// Module path of a declaration plus the `use` imports visible in it.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Scope {
    module: String,
    uses: BTreeMap<String, String>,
    globs: Vec<String>,
}

impl Scope {
    #[must_use]
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            uses: BTreeMap::new(),
            globs: Vec::new(),
        }
    }

    #[must_use]
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Child module scope; imports are not inherited.
    #[must_use]
    pub fn child(&self, ident: &str) -> Self {
        Self::new(format!("{}::{ident}", self.module))
    }

    /// Record `use <path> as <alias>;`.
    pub fn add_use(&mut self, alias: impl Into<String>, path: impl Into<String>) {
        self.uses.insert(alias.into(), path.into());
    }

    /// Record `use <module>::*;`.
    pub fn add_glob(&mut self, module: impl Into<String>) {
        self.globs.push(module.into());
    }

    #[must_use]
    pub fn globs(&self) -> &[String] {
        &self.globs
    }

    /// Whether a bare `ident` is covered by an explicit `use` or child module.
    #[must_use]
    pub fn imports(&self, ident: &str) -> bool {
        self.uses.contains_key(ident)
    }

    #[must_use]
    pub fn qualify(&self, ident: &str) -> String {
        format!("{}::{ident}", self.module)
    }

    /// Fully-qualified `crate::...` form of `path` as seen from this scope.
    /// Paths into other crates come back as written. Generic arguments are
    /// dropped.
    #[must_use]
    pub fn resolve(&self, path: &Path) -> String {
        let segments: Vec<String> = path.segments.iter().map(|s| s.ident.to_string()).collect();

        self.resolve_segments(&segments)
    }

    /// [`Scope::resolve`], falling back to the glob imports for a bare name
    /// no explicit `use` covers. The first candidate `known` accepts wins;
    /// with none, the plain resolution is returned.
    #[must_use]
    pub fn resolve_with(&self, path: &Path, known: impl Fn(&str) -> bool) -> String {
        let resolved = self.resolve(path);
        if known(&resolved) {
            return resolved;
        }

        self.glob_candidates(path)
            .into_iter()
            .find(|candidate| known(candidate))
            .unwrap_or(resolved)
    }

    /// `<glob>::<ident>` for every glob import, when `path` is a bare name
    /// no explicit `use` covers.
    #[must_use]
    pub fn glob_candidates(&self, path: &Path) -> Vec<String> {
        let Some(ident) = path.get_ident().map(ToString::to_string) else {
            return Vec::new();
        };
        if self.imports(&ident) {
            return Vec::new();
        }

        self.globs.iter().map(|glob| format!("{glob}::{ident}")).collect()
    }

    #[must_use]
    pub fn resolve_segments(&self, segments: &[String]) -> String {
        let Some((first, rest)) = segments.split_first() else {
            return self.module.clone();
        };

        let base = match first.as_str() {
            "crate" => "crate".to_string(),
            "self" => self.module.clone(),
            "super" => {
                let mut module = parent(&self.module).to_string();
                let mut rest = rest;
                while let Some(("super", tail)) = rest.split_first().map(|(h, t)| (h.as_str(), t)) {
                    module = parent(&module).to_string();
                    rest = tail;
                }
                return join(&module, rest);
            }
            other => match self.uses.get(other) {
                Some(imported) => imported.clone(),
                // `chrono::NaiveDate`: an extern crate path
                None if !rest.is_empty() => other.to_string(),
                None => self.qualify(other),
            },
        };

        join(&base, rest)
    }
}

fn parent(module: &str) -> &str {
    module.rsplit_once("::").map_or(module, |(parent, _)| parent)
}

fn join(base: &str, rest: &[String]) -> String {
    let mut path = base.to_string();
    for segment in rest {
        path.push_str("::");
        path.push_str(segment);
    }

    path
}

///
/// Owner
/// The item enclosing an annotated field.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Owner {
    pub ident: String,
    pub qualified: String,
    pub kind: &'static str,
    pub is_table: bool,
}

///
/// Item
///

#[derive(Clone, Debug)]
pub enum Item {
    Struct(ItemStruct),
    Field {
        owner: Owner,
        field: Field,
    },
    Fn(ItemFn),
    Method {
        /// Qualified self type of the enclosing impl, if it is a plain path.
        owner: Option<String>,
        trait_impl: bool,
        method: ImplItemFn,
    },
    Impl(ItemImpl),
    Trait(ItemTrait),
    Other(&'static str),
}

impl Item {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Struct(_) => "struct",
            Self::Field { .. } => "field",
            Self::Fn(_) => "function",
            Self::Method { .. } => "method",
            Self::Impl(_) => "impl block",
            Self::Trait(_) => "trait",
            Self::Other(kind) => kind,
        }
    }
}

///
/// Declaration
///
/// One annotation occurrence on one item.
///

#[derive(Clone, Debug)]
pub struct Declaration {
    pub annotation: Annotation,
    pub attr: Attribute,
    pub ident: String,
    pub scope: Scope,
    pub location: Location,
    pub item: Item,
}

impl Declaration {
    #[must_use]
    pub fn qualified(&self) -> String {
        self.scope.qualify(&self.ident)
    }

    /// Qualified name of the enclosing type for fields and methods.
    #[must_use]
    pub fn enclosing(&self) -> Option<&str> {
        match &self.item {
            Item::Field { owner, .. } => Some(&owner.qualified),
            Item::Method { owner, .. } => owner.as_deref(),
            _ => None,
        }
    }
}

///
/// Declarations
/// Everything one discovery round produced, in source order.
///

#[derive(Clone, Debug, Default)]
pub struct Declarations {
    decls: Vec<Declaration>,
}

impl Declarations {
    #[must_use]
    pub const fn new(decls: Vec<Declaration>) -> Self {
        Self { decls }
    }

    pub fn annotated_with(&self, annotation: Annotation) -> impl Iterator<Item = &Declaration> {
        self.decls.iter().filter(move |d| d.annotation == annotation)
    }

    /// Field declarations of `owner` carrying `annotation`, in field order.
    pub fn fields_of<'a>(
        &'a self,
        owner: &'a str,
        annotation: Annotation,
    ) -> impl Iterator<Item = &'a Declaration> {
        self.annotated_with(annotation)
            .filter(move |d| matches!(&d.item, Item::Field { owner: o, .. } if o.qualified == owner))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.decls.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}
