//! Module: db::lifecycle
//! Responsibility: bring an open connection to the configured schema version.
//! Does not own: holder construction or the init state machine.
//!
//! Invariants:
//! - `PRAGMA user_version` records the version the schema was brought to.
//! - Every lifecycle transaction commits fully or not at all; a scoped
//!   transaction dropped without commit rolls back.
//! - Up migrations run in ascending version order, down migrations descending.

use crate::{
    AdapterHolder, Error, LogLevel,
    migration::{Direction, Migration},
};
use rusqlite::Connection;
use std::ops::Bound::{Excluded, Included, Unbounded};
use tracing::{debug, info};

/// Pragmas executed on every open.
pub const PRAGMAS: &[&str] = &["PRAGMA foreign_keys=ON;"];

///
/// LifecycleEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LifecycleEvent {
    Created { version: u32 },
    Upgraded { from: u32, to: u32 },
    Downgraded { from: u32, to: u32 },
    Opened { version: u32 },
}

/// Read the schema version stored in the database file.
pub fn user_version(conn: &Connection) -> rusqlite::Result<u32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
}

/// Create, upgrade, downgrade or just open the database so that it ends at `version`.
pub fn open(
    conn: &mut Connection,
    holder: &AdapterHolder,
    version: u32,
    log_level: LogLevel,
) -> Result<LifecycleEvent, Error> {
    if version == 0 {
        return Err(Error::InvalidVersion(version));
    }

    let current = user_version(conn)?;
    execute_pragmas(conn, log_level)?;

    let event = if current == 0 {
        on_create(conn, holder, version, log_level)?
    } else if current < version {
        on_upgrade(conn, holder, current, version, log_level)?
    } else if current > version {
        on_downgrade(conn, holder, current, version, log_level)?
    } else {
        LifecycleEvent::Opened { version }
    };

    if log_level.logs(LogLevel::Basic) {
        info!(?event, "database ready");
    }

    Ok(event)
}

fn execute_pragmas(conn: &Connection, log_level: LogLevel) -> Result<(), Error> {
    for pragma in PRAGMAS {
        log_statement(log_level, pragma);
        conn.execute_batch(pragma)?;
    }

    Ok(())
}

fn on_create(
    conn: &mut Connection,
    holder: &AdapterHolder,
    version: u32,
    log_level: LogLevel,
) -> Result<LifecycleEvent, Error> {
    if log_level.logs(LogLevel::Basic) {
        info!(version, tables = holder.schemas().len(), "creating database");
    }

    // Phase 1: tables
    let tx = conn.transaction()?;
    create_tables(&tx, holder, log_level)?;
    tx.commit()?;

    // Phase 2: every migration up to the target, then the version stamp
    let tx = conn.transaction()?;
    let pending = holder.migrations().range((Unbounded, Included(version)));
    for (&v, migration) in pending {
        apply(&tx, v, migration, Direction::Up, log_level)?;
    }
    tx.pragma_update(None, "user_version", version)?;
    tx.commit()?;

    Ok(LifecycleEvent::Created { version })
}

fn on_upgrade(
    conn: &mut Connection,
    holder: &AdapterHolder,
    from: u32,
    to: u32,
    log_level: LogLevel,
) -> Result<LifecycleEvent, Error> {
    if log_level.logs(LogLevel::Basic) {
        info!(from, to, "upgrading database");
    }

    let tx = conn.transaction()?;
    create_tables(&tx, holder, log_level)?;
    for (&v, migration) in holder.migrations().range((Excluded(from), Included(to))) {
        apply(&tx, v, migration, Direction::Up, log_level)?;
    }
    tx.pragma_update(None, "user_version", to)?;
    tx.commit()?;

    Ok(LifecycleEvent::Upgraded { from, to })
}

fn on_downgrade(
    conn: &mut Connection,
    holder: &AdapterHolder,
    from: u32,
    to: u32,
    log_level: LogLevel,
) -> Result<LifecycleEvent, Error> {
    if log_level.logs(LogLevel::Basic) {
        info!(from, to, "downgrading database");
    }

    let tx = conn.transaction()?;
    for (&v, migration) in holder.migrations().range((Excluded(to), Included(from))).rev() {
        apply(&tx, v, migration, Direction::Down, log_level)?;
    }
    tx.pragma_update(None, "user_version", to)?;
    tx.commit()?;

    Ok(LifecycleEvent::Downgraded { from, to })
}

fn create_tables(conn: &Connection, holder: &AdapterHolder, log_level: LogLevel) -> Result<(), Error> {
    for schema in holder.schemas() {
        log_statement(log_level, schema.schema());
        conn.execute_batch(schema.schema())?;
    }

    Ok(())
}

fn apply(
    conn: &Connection,
    version: u32,
    migration: &Migration,
    direction: Direction,
    log_level: LogLevel,
) -> Result<(), Error> {
    if log_level.logs(LogLevel::Basic) {
        info!(version, direction = direction.as_str(), "running migration");
    }

    migration
        .apply(conn, direction, |sql| log_statement(log_level, sql))
        .map_err(|source| Error::Migration {
            version,
            direction: direction.as_str(),
            source,
        })
}

pub(crate) fn log_statement(log_level: LogLevel, sql: &str) {
    if log_level.logs(LogLevel::Full) {
        debug!(target: "tabula::query", "{sql}");
    }
}
