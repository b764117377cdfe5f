use crate::BuildError;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// File read from the crate root, next to `Cargo.toml`.
pub const CONFIG_FILE: &str = "tabula.toml";

///
/// BuildConfig
///
/// ```toml
/// source_dir = "src"
/// output = "tabula.rs"
/// ```
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Directory scanned for declarations, relative to the manifest.
    pub source_dir: PathBuf,

    /// File name written inside `OUT_DIR`.
    pub output: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("src"),
            output: "tabula.rs".to_string(),
        }
    }
}

impl BuildConfig {
    /// Defaults when `tabula.toml` is absent.
    pub fn load(manifest_dir: &Path) -> Result<Self, BuildError> {
        let path = manifest_dir.join(CONFIG_FILE);
        if !path.is_file() {
            return Ok(Self::default());
        }

        let text = fs::read_to_string(&path).map_err(|source| BuildError::Io {
            path: path.clone(),
            source,
        })?;

        toml::from_str(&text).map_err(|source| BuildError::Config { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();

        assert_eq!(BuildConfig::load(dir.path()).unwrap(), BuildConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "source_dir = \"lib\"\n").unwrap();

        let config = BuildConfig::load(dir.path()).unwrap();
        assert_eq!(config.source_dir, PathBuf::from("lib"));
        assert_eq!(config.output, "tabula.rs");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "sources = \"lib\"\n").unwrap();

        let err = BuildConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, BuildError::Config { .. }));
    }
}
