//! Module: scan
//! Responsibility: turn source files into annotated declarations.
//! Does not own: validation; malformed attribute arguments are reported later.
//!
//! Module paths come from file locations (`src/model.rs` is `crate::model`,
//! `src/a/mod.rs` is `crate::a`) plus inline `mod` blocks. `#[path]`
//! attributes are not followed.

use crate::BuildError;
use ignore::WalkBuilder;
use std::{
    fs,
    path::{Path, PathBuf},
};
use syn::{ImplItem, Type, UseTree, spanned::Spanned};
use tabula_schema::prelude::*;

///
/// SourceScanner
///

pub struct SourceScanner {
    root: PathBuf,
}

impl SourceScanner {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Every `.rs` file under the root, sorted, skipping `src/bin`.
    pub fn files(&self) -> Result<Vec<PathBuf>, BuildError> {
        let mut files = Vec::new();
        for entry in WalkBuilder::new(&self.root).build() {
            let entry = entry.map_err(|source| BuildError::Walk {
                path: self.root.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "rs")
                && !path.strip_prefix(&self.root).is_ok_and(|rel| rel.starts_with("bin"))
            {
                files.push(path.to_path_buf());
            }
        }
        files.sort();

        Ok(files)
    }

    pub fn scan(&self) -> Result<(Declarations, Vec<PathBuf>), BuildError> {
        let files = self.files()?;
        let mut decls = Vec::new();

        for path in &files {
            let source = fs::read_to_string(path).map_err(|source| BuildError::Io {
                path: path.clone(),
                source,
            })?;
            let relative = path.strip_prefix(&self.root).unwrap_or(path);
            decls.extend(scan_source(path, &module_path(relative), &source)?);
        }

        Ok((Declarations::new(decls), files))
    }
}

/// `crate::...` module path of a file relative to the source root.
#[must_use]
pub fn module_path(relative: &Path) -> String {
    let mut segments = vec!["crate".to_string()];
    let components: Vec<String> = relative
        .with_extension("")
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    for (i, component) in components.iter().enumerate() {
        let last = i + 1 == components.len();
        if last && (component == "mod" || (i == 0 && (component == "lib" || component == "main"))) {
            break;
        }
        segments.push(component.clone());
    }

    segments.join("::")
}

/// Parse one file and collect its annotated declarations.
pub fn scan_source(file: &Path, module: &str, source: &str) -> Result<Vec<Declaration>, BuildError> {
    let parsed = syn::parse_file(source).map_err(|source| BuildError::Parse {
        path: file.to_path_buf(),
        source,
    })?;
    let mut collector = Collector {
        file,
        decls: Vec::new(),
    };
    collector.items(&parsed.items, Scope::new(module));

    Ok(collector.decls)
}

///
/// Collector
///

struct Collector<'a> {
    file: &'a Path,
    decls: Vec<Declaration>,
}

impl Collector<'_> {
    fn items(&mut self, items: &[syn::Item], mut scope: Scope) {
        // Phase 1: child modules and imports, so later items resolve
        // regardless of order
        for item in items {
            if let syn::Item::Mod(module) = item {
                let ident = module.ident.to_string();
                let path = scope.qualify(&ident);
                scope.add_use(ident, path);
            }
        }
        for item in items {
            if let syn::Item::Use(item) = item {
                let mut imports = Imports::default();
                collect_uses(&item.tree, &mut Vec::new(), &mut imports);
                for (alias, segments) in imports.names {
                    let resolved = scope.resolve_segments(&segments);
                    scope.add_use(alias, resolved);
                }
                for segments in imports.globs {
                    let resolved = scope.resolve_segments(&segments);
                    scope.add_glob(resolved);
                }
            }
        }

        // Phase 2: annotated items
        for item in items {
            match item {
                syn::Item::Mod(module) => {
                    if let Some((_, content)) = &module.content {
                        self.items(content, scope.child(&module.ident.to_string()));
                    }
                }
                syn::Item::Struct(item) => self.structure(item, &scope),
                syn::Item::Enum(item) => self.enumeration(item, &scope),
                syn::Item::Fn(item) => {
                    self.push_all(&item.attrs, &item.sig.ident.to_string(), &scope, || {
                        Item::Fn(item.clone())
                    });
                }
                syn::Item::Impl(item) => self.implementation(item, &scope),
                syn::Item::Trait(item) => {
                    self.push_all(&item.attrs, &item.ident.to_string(), &scope, || {
                        Item::Trait(item.clone())
                    });
                    for trait_item in &item.items {
                        if let syn::TraitItem::Fn(method) = trait_item {
                            self.push_all(&method.attrs, &method.sig.ident.to_string(), &scope, || {
                                Item::Other("trait method")
                            });
                        }
                    }
                }
                syn::Item::Const(item) => {
                    self.push_all(&item.attrs, &item.ident.to_string(), &scope, || Item::Other("const"));
                }
                syn::Item::Static(item) => {
                    self.push_all(&item.attrs, &item.ident.to_string(), &scope, || Item::Other("static"));
                }
                syn::Item::Type(item) => {
                    self.push_all(&item.attrs, &item.ident.to_string(), &scope, || {
                        Item::Other("type alias")
                    });
                }
                syn::Item::Union(item) => {
                    self.push_all(&item.attrs, &item.ident.to_string(), &scope, || Item::Other("union"));
                }
                _ => {}
            }
        }
    }

    fn structure(&mut self, item: &syn::ItemStruct, scope: &Scope) {
        let ident = item.ident.to_string();
        let is_table = item
            .attrs
            .iter()
            .any(|attr| Annotation::of(attr) == Some(Annotation::Table));
        self.push_all(&item.attrs, &ident, scope, || Item::Struct(item.clone()));

        let owner = Owner {
            ident: ident.clone(),
            qualified: scope.qualify(&ident),
            kind: "struct",
            is_table,
        };
        self.fields(item.fields.iter(), &owner, scope);
    }

    fn enumeration(&mut self, item: &syn::ItemEnum, scope: &Scope) {
        let ident = item.ident.to_string();
        self.push_all(&item.attrs, &ident, scope, || Item::Other("enum"));

        let owner = Owner {
            ident: ident.clone(),
            qualified: scope.qualify(&ident),
            kind: "enum",
            is_table: false,
        };
        for variant in &item.variants {
            self.fields(variant.fields.iter(), &owner, scope);
        }
    }

    fn fields<'f>(&mut self, fields: impl Iterator<Item = &'f syn::Field>, owner: &Owner, scope: &Scope) {
        for (index, field) in fields.enumerate() {
            let ident = field
                .ident
                .as_ref()
                .map_or_else(|| index.to_string(), ToString::to_string);
            self.push_all(&field.attrs, &ident, scope, || Item::Field {
                owner: owner.clone(),
                field: field.clone(),
            });
        }
    }

    fn implementation(&mut self, item: &syn::ItemImpl, scope: &Scope) {
        let self_path = match item.self_ty.as_ref() {
            Type::Path(ty) if ty.qself.is_none() => Some(&ty.path),
            _ => None,
        };
        let ident = self_path
            .and_then(|path| path.segments.last())
            .map_or_else(|| "impl".to_string(), |segment| segment.ident.to_string());
        let owner = self_path.map(|path| scope.resolve(path));

        self.push_all(&item.attrs, &ident, scope, || Item::Impl(item.clone()));

        for impl_item in &item.items {
            if let ImplItem::Fn(method) = impl_item {
                self.push_all(&method.attrs, &method.sig.ident.to_string(), scope, || {
                    Item::Method {
                        owner: owner.clone(),
                        trait_impl: item.trait_.is_some(),
                        method: method.clone(),
                    }
                });
            }
        }
    }

    fn push_all(&mut self, attrs: &[syn::Attribute], ident: &str, scope: &Scope, item: impl Fn() -> Item) {
        for attr in attrs {
            let Some(annotation) = Annotation::of(attr) else {
                continue;
            };
            let start = attr.span().start();

            self.decls.push(Declaration {
                annotation,
                attr: attr.clone(),
                ident: ident.to_string(),
                scope: scope.clone(),
                location: Location::new(self.file, start.line, start.column),
                item: item(),
            });
        }
    }
}

///
/// Imports
/// One flattened `use` item: `(alias, path segments)` pairs and glob
/// module paths.
///

#[derive(Default)]
struct Imports {
    names: Vec<(String, Vec<String>)>,
    globs: Vec<Vec<String>>,
}

fn collect_uses(tree: &UseTree, prefix: &mut Vec<String>, out: &mut Imports) {
    match tree {
        UseTree::Path(path) => {
            prefix.push(path.ident.to_string());
            collect_uses(&path.tree, prefix, out);
            prefix.pop();
        }
        UseTree::Name(name) => {
            if name.ident == "self" {
                if let Some(last) = prefix.last() {
                    out.names.push((last.clone(), prefix.clone()));
                }
            } else {
                let mut segments = prefix.clone();
                segments.push(name.ident.to_string());
                out.names.push((name.ident.to_string(), segments));
            }
        }
        UseTree::Rename(rename) => {
            let mut segments = prefix.clone();
            segments.push(rename.ident.to_string());
            out.names.push((rename.rename.to_string(), segments));
        }
        UseTree::Group(group) => {
            for tree in &group.items {
                collect_uses(tree, prefix, out);
            }
        }
        UseTree::Glob(_) => out.globs.push(prefix.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SOURCE: &str = r#"
        use crate::model::Note as Memo;
        use super::{adapters::{self, ColorAdapter}};

        #[table("notes")]
        pub struct Note {
            pub id: Option<i64>,
            #[column("title")]
            pub title: Option<String>,
        }

        impl Note {
            #[getter_for("title")]
            pub fn title(&self) -> Option<String> { self.title.clone() }
        }

        mod inner {
            #[migration(version = 1)]
            fn first() -> Migration { Migration::new() }
        }
    "#;

    fn scan() -> Vec<Declaration> {
        scan_source(Path::new("src/store/model.rs"), "crate::store::model", SOURCE).unwrap()
    }

    #[test]
    fn module_paths_follow_files() {
        assert_eq!(module_path(Path::new("lib.rs")), "crate");
        assert_eq!(module_path(Path::new("model.rs")), "crate::model");
        assert_eq!(module_path(Path::new("store/mod.rs")), "crate::store");
        assert_eq!(module_path(Path::new("store/lib.rs")), "crate::store::lib");
    }

    #[test]
    fn collects_each_annotation_with_location() {
        let decls = scan();
        let found: Vec<_> = decls.iter().map(|d| (d.annotation, d.ident.as_str())).collect();

        assert_eq!(
            found,
            [
                (Annotation::Table, "Note"),
                (Annotation::Column, "title"),
                (Annotation::GetterFor, "title"),
                (Annotation::Migration, "first"),
            ]
        );
        assert_eq!(decls[0].location.line, 5);
        assert_eq!(decls[0].location.file, PathBuf::from("src/store/model.rs"));
    }

    #[test]
    fn fields_know_their_table() {
        let decls = scan();
        let Item::Field { owner, .. } = &decls[1].item else {
            panic!("expected a field");
        };

        assert!(owner.is_table);
        assert_eq!(owner.qualified, "crate::store::model::Note");
        assert_eq!(decls[2].enclosing(), Some("crate::store::model::Note"));
    }

    #[test]
    fn inline_modules_and_imports_are_scoped() {
        let decls = scan();

        assert_eq!(decls[3].qualified(), "crate::store::model::inner::first");

        let scope = &decls[0].scope;
        assert_eq!(
            scope.resolve(&syn::parse_quote!(Memo)),
            "crate::model::Note"
        );
        assert_eq!(
            scope.resolve(&syn::parse_quote!(ColorAdapter)),
            "crate::store::adapters::ColorAdapter"
        );
        assert_eq!(
            scope.resolve(&syn::parse_quote!(adapters::Other)),
            "crate::store::adapters::Other"
        );
    }

    #[test]
    fn syntax_errors_are_reported_with_path() {
        let err = scan_source(Path::new("src/broken.rs"), "crate::broken", "struct {").unwrap_err();

        assert!(matches!(err, BuildError::Parse { .. }));
        assert!(err.to_string().contains("src/broken.rs"));
    }
}
