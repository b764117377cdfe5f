//! Module: db
//! Responsibility: one-time database initialisation and access to the ready holders.
//! Does not own: schema DDL or migration content, which come from generated code.
//!
//! Invariants:
//! - State only moves Uninitialized -> Initializing -> Ready, or back to
//!   Uninitialized when initialisation fails or the database is closed.
//! - A second `init` while ready is a logged no-op.

mod config;
pub mod lifecycle;

#[cfg(test)]
mod tests;

pub use config::{DatabaseConfig, LogLevel};
pub use lifecycle::LifecycleEvent;

use crate::{AdapterHolder, Error, Model, ModelRepository, RepositoryHolder};
use rusqlite::Connection;
use std::{
    fmt,
    sync::{Arc, Mutex},
};
use tracing::{info, warn};

///
/// ConnectionHandle
///
/// The single connection shared by every repository.
///

#[derive(Clone)]
pub struct ConnectionHandle {
    inner: Arc<Mutex<Connection>>,
    log_level: LogLevel,
}

impl ConnectionHandle {
    #[must_use]
    pub fn new(conn: Connection, log_level: LogLevel) -> Self {
        Self {
            inner: Arc::new(Mutex::new(conn)),
            log_level,
        }
    }

    /// Run `f` with exclusive access to the connection.
    pub fn with<R>(&self, f: impl FnOnce(&mut Connection) -> Result<R, Error>) -> Result<R, Error> {
        let mut conn = self.inner.lock().map_err(|_| Error::Poisoned)?;

        f(&mut conn)
    }

    #[must_use]
    pub const fn log_level(&self) -> LogLevel {
        self.log_level
    }

    /// Log `sql` under `tabula::query` when the level is `Full`.
    pub fn log_statement(&self, sql: &str) {
        lifecycle::log_statement(self.log_level, sql);
    }
}

impl fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("log_level", &self.log_level)
            .finish_non_exhaustive()
    }
}

/// Builds the adapter holder: migrations, model adapters, user type adapters.
pub type AdapterHolderFactory = fn() -> Result<AdapterHolder, Error>;

/// Builds the repository holder over an initialised connection.
pub type RepositoryHolderFactory =
    fn(&ConnectionHandle, &Arc<AdapterHolder>, usize) -> Result<RepositoryHolder, Error>;

///
/// Registration
///
/// Factory table emitted by the build step as `REGISTRATION`.
///

#[derive(Clone, Copy)]
pub struct Registration {
    pub adapter_holder: AdapterHolderFactory,
    pub repository_holder: RepositoryHolderFactory,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration").finish_non_exhaustive()
    }
}

///
/// LifecycleState
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LifecycleState {
    Uninitialized,
    Initializing,
    Ready,
}

///
/// Context
/// Everything a ready database hands out.
///

struct Context {
    connection: ConnectionHandle,
    adapters: Arc<AdapterHolder>,
    repositories: RepositoryHolder,
    event: LifecycleEvent,
}

enum State {
    Uninitialized,
    Initializing,
    Ready(Arc<Context>),
}

///
/// Database
///

pub struct Database {
    init_lock: Mutex<()>,
    state: Mutex<State>,
}

impl Database {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            init_lock: Mutex::new(()),
            state: Mutex::new(State::Uninitialized),
        }
    }

    /// Instantiate the generated holders and bring the database to `config.version`.
    pub fn init(&self, config: &DatabaseConfig, registration: &Registration) -> Result<(), Error> {
        let _guard = self.init_lock.lock().map_err(|_| Error::Poisoned)?;

        if matches!(*self.lock_state()?, State::Ready(_)) {
            if config.log_level.logs(LogLevel::Basic) {
                info!("already initialized");
            }
            return Ok(());
        }

        *self.lock_state()? = State::Initializing;

        match Self::initialize(config, registration) {
            Ok(context) => {
                *self.lock_state()? = State::Ready(Arc::new(context));
                Ok(())
            }
            Err(err) => {
                if config.log_level.logs(LogLevel::Basic) {
                    warn!(error = %err, "initialization failed");
                }
                *self.lock_state()? = State::Uninitialized;
                Err(err)
            }
        }
    }

    fn initialize(config: &DatabaseConfig, registration: &Registration) -> Result<Context, Error> {
        let adapters = (registration.adapter_holder)()
            .map_err(|err| Error::registration("adapter holder", err))?;
        let adapters = Arc::new(adapters);

        let mut conn = Connection::open(&config.path)?;
        let event = lifecycle::open(&mut conn, &adapters, config.version, config.log_level)?;
        let connection = ConnectionHandle::new(conn, config.log_level);

        let repositories = (registration.repository_holder)(&connection, &adapters, config.cache_size)
            .map_err(|err| Error::registration("repository holder", err))?;

        Ok(Context {
            connection,
            adapters,
            repositories,
            event,
        })
    }

    /// Drop the connection and holders; a later `init` starts over.
    pub fn close(&self) -> Result<(), Error> {
        let _guard = self.init_lock.lock().map_err(|_| Error::Poisoned)?;
        *self.lock_state()? = State::Uninitialized;

        Ok(())
    }

    pub fn state(&self) -> Result<LifecycleState, Error> {
        Ok(match *self.lock_state()? {
            State::Uninitialized => LifecycleState::Uninitialized,
            State::Initializing => LifecycleState::Initializing,
            State::Ready(_) => LifecycleState::Ready,
        })
    }

    /// What the last successful `init` did to the schema.
    pub fn event(&self) -> Result<LifecycleEvent, Error> {
        Ok(self.context()?.event)
    }

    pub fn connection(&self) -> Result<ConnectionHandle, Error> {
        Ok(self.context()?.connection.clone())
    }

    pub fn adapters(&self) -> Result<Arc<AdapterHolder>, Error> {
        Ok(self.context()?.adapters.clone())
    }

    pub fn repository<T: Model>(&self) -> Result<Arc<dyn ModelRepository<T>>, Error> {
        self.context()?.repositories.repository::<T>()
    }

    /// A repository by its concrete generated type, for override traits.
    pub fn repository_as<R: Send + Sync + 'static>(&self) -> Result<Arc<R>, Error> {
        self.context()?.repositories.repository_as::<R>()
    }

    pub fn table_name<T: Model>(&self) -> Result<&'static str, Error> {
        Ok(self.context()?.adapters.model_adapter::<T>()?.table_name())
    }

    fn context(&self) -> Result<Arc<Context>, Error> {
        match &*self.lock_state()? {
            State::Ready(context) => Ok(context.clone()),
            State::Uninitialized | State::Initializing => Err(Error::NotInitialized),
        }
    }

    fn lock_state(&self) -> Result<std::sync::MutexGuard<'_, State>, Error> {
        self.state.lock().map_err(|_| Error::Poisoned)
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("state", &self.state().ok())
            .finish_non_exhaustive()
    }
}
