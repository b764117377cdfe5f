//! Build-time code generation for tabula.
//!
//! ## Crate layout
//! - `codegen`: token generators for adapters, repositories and holders.
//! - `config`: `tabula.toml` settings.
//! - `scan`: walks the source tree and collects annotated declarations.
//! - `step`: the ordered processing steps and the round driver.
//!
//! A build script calls `tabula_build::build!()`; the library then
//! `include!`s `OUT_DIR/tabula.rs` and passes `REGISTRATION` to
//! `Database::init`.

mod macros;

pub mod codegen;
pub mod config;
pub mod scan;
pub mod step;

pub use config::BuildConfig;

use crate::{scan::SourceScanner, step::Pipeline};
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tabula_schema::prelude::*;
use thiserror::Error as ThisError;

///
/// BuildError
///

#[derive(Debug, ThisError)]
pub enum BuildError {
    #[error("environment variable {0} is not set")]
    Env(&'static str),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to walk {}: {source}", .path.display())]
    Walk {
        path: PathBuf,
        source: ignore::Error,
    },

    #[error("failed to parse {}:{}: {source}", .path.display(), .source.span().start().line)]
    Parse { path: PathBuf, source: syn::Error },

    #[error("invalid {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("{count} error(s) in tabula declarations\n{0}", count = .0.error_count())]
    Validation(Diagnostics),
}

///
/// Generated
///

#[derive(Debug)]
pub struct Generated {
    /// Rust source to `include!`.
    pub source: String,

    /// Warnings reported during the build. Errors fail it instead.
    pub diagnostics: Diagnostics,

    pub registry: Registry,

    /// Files scanned, for `cargo:rerun-if-changed`.
    pub files: Vec<PathBuf>,
}

///
/// Builder
///

#[derive(Clone, Debug)]
pub struct Builder {
    manifest_dir: PathBuf,
    out_dir: Option<PathBuf>,
    config: BuildConfig,
}

impl Builder {
    /// Builder for the crate at `manifest_dir`, reading its `tabula.toml`
    /// if present.
    pub fn new(manifest_dir: impl Into<PathBuf>) -> Result<Self, BuildError> {
        let manifest_dir = manifest_dir.into();
        let config = BuildConfig::load(&manifest_dir)?;

        Ok(Self {
            manifest_dir,
            out_dir: None,
            config,
        })
    }

    /// Builder configured from the cargo build-script environment.
    pub fn from_env() -> Result<Self, BuildError> {
        let manifest_dir = env::var_os("CARGO_MANIFEST_DIR").ok_or(BuildError::Env("CARGO_MANIFEST_DIR"))?;
        let out_dir = env::var_os("OUT_DIR").ok_or(BuildError::Env("OUT_DIR"))?;

        Ok(Self::new(manifest_dir)?.out_dir(out_dir))
    }

    #[must_use]
    pub fn out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.out_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn config(mut self, config: BuildConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn source_dir(&self) -> PathBuf {
        self.manifest_dir.join(&self.config.source_dir)
    }

    #[must_use]
    pub fn output_path(&self) -> Option<PathBuf> {
        self.out_dir.as_ref().map(|dir| dir.join(&self.config.output))
    }

    /// Scan the source tree and run every processing step.
    pub fn generate(&self) -> Result<Generated, BuildError> {
        let (declarations, files) = SourceScanner::new(self.source_dir()).scan()?;
        let mut generated = run(&declarations)?;
        generated.files = files;

        Ok(generated)
    }

    /// `generate`, then write the source into the output directory.
    pub fn write(&self) -> Result<Generated, BuildError> {
        let path = self.output_path().ok_or(BuildError::Env("OUT_DIR"))?;
        let generated = self.generate()?;
        write_file(&path, &generated.source)?;

        Ok(generated)
    }
}

/// Generate from in-memory `(path, source)` pairs. Paths are relative to
/// the source root, as in `("model.rs", "...")`.
pub fn generate_from_sources(sources: &[(&str, &str)]) -> Result<Generated, BuildError> {
    let mut decls = Vec::new();
    for (path, source) in sources {
        let path = Path::new(path);
        decls.extend(scan::scan_source(path, &scan::module_path(path), source)?);
    }

    run(&Declarations::new(decls))
}

fn run(declarations: &Declarations) -> Result<Generated, BuildError> {
    let context = Pipeline::new().run(declarations);
    let source = context.render();
    let diagnostics = context.diagnostics.result().map_err(BuildError::Validation)?;

    Ok(Generated {
        source,
        diagnostics,
        registry: context.registry,
        files: Vec::new(),
    })
}

fn write_file(path: &Path, contents: &str) -> Result<(), BuildError> {
    let io = |source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io)?;
    }

    fs::write(path, contents).map_err(io)
}
