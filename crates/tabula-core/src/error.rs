use crate::adapter::TypeAdapterError;
use thiserror::Error as ThisError;

///
/// Error
///
/// Runtime error surfaced by the lifecycle, holders and repositories.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("database is not initialized")]
    NotInitialized,

    #[error("database version must be at least 1, got {0}")]
    InvalidVersion(u32),

    #[error("failed to instantiate {holder}: {source}")]
    Registration {
        holder: &'static str,
        #[source]
        source: Box<Self>,
    },

    #[error("found two migrations with the same version: {0}")]
    DuplicateMigration(u32),

    #[error("migration {version} failed while migrating {direction}: {source}")]
    Migration {
        version: u32,
        direction: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("no model adapter registered for '{0}'")]
    ModelAdapterNotFound(&'static str),

    #[error("no repository registered for '{0}'")]
    RepositoryNotFound(&'static str),

    #[error("no type adapter registered for '{0}'")]
    TypeAdapterNotFound(&'static str),

    #[error("entity of type '{0}' has no id")]
    MissingId(&'static str),

    #[error("malformed query: {0}")]
    MalformedQuery(String),

    #[error("database lock poisoned")]
    Poisoned,

    #[error(transparent)]
    TypeAdapter(#[from] TypeAdapterError),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

impl Error {
    /// Wrap a factory failure with the holder it was building.
    pub(crate) fn registration(holder: &'static str, source: Self) -> Self {
        Self::Registration {
            holder,
            source: Box::new(source),
        }
    }
}
