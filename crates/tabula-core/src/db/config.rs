use crate::DEFAULT_CACHE_SIZE;
use serde::Deserialize;
use std::path::{Path, PathBuf};

///
/// LogLevel
///
/// `Basic` logs lifecycle events; `Full` also logs every statement under
/// the `tabula::query` target.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Ord, PartialEq, PartialOrd)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    #[default]
    None,
    Basic,
    Full,
}

impl LogLevel {
    /// Whether messages at `level` are emitted under this setting.
    #[must_use]
    pub fn logs(self, level: Self) -> bool {
        level != Self::None && self >= level
    }
}

///
/// DatabaseConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    /// File path, or `:memory:` for a private in-memory database.
    pub path: PathBuf,
    pub version: u32,
    pub cache_size: usize,
    pub log_level: LogLevel,
}

impl DatabaseConfig {
    #[must_use]
    pub fn new(path: impl AsRef<Path>, version: u32) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            version,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_cache_size(mut self, cache_size: usize) -> Self {
        self.cache_size = cache_size;
        self
    }

    #[must_use]
    pub const fn with_log_level(mut self, log_level: LogLevel) -> Self {
        self.log_level = log_level;
        self
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(":memory:"),
            version: 1,
            cache_size: DEFAULT_CACHE_SIZE,
            log_level: LogLevel::None,
        }
    }
}
