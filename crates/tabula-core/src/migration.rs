//! Versioned schema migrations.
//!
//! A migration is a value: ordered up/down statements plus four optional
//! hooks run around them. The lifecycle decides which versions run and in
//! which transaction; this module only knows how to execute one step.

use rusqlite::Connection;
use std::fmt;

/// Callback run against the lifecycle transaction's connection.
pub type Hook = Box<dyn Fn(&Connection) -> rusqlite::Result<()> + Send + Sync>;

///
/// Direction
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

///
/// Migration
///

#[derive(Default)]
pub struct Migration {
    up: Vec<String>,
    down: Vec<String>,
    before_up: Option<Hook>,
    after_up: Option<Hook>,
    before_down: Option<Hook>,
    after_down: Option<Hook>,
}

impl Migration {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn up<I, S>(mut self, statements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.up.extend(statements.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn down<I, S>(mut self, statements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.down.extend(statements.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn before_up<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Connection) -> rusqlite::Result<()> + Send + Sync + 'static,
    {
        self.before_up = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn after_up<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Connection) -> rusqlite::Result<()> + Send + Sync + 'static,
    {
        self.after_up = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn before_down<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Connection) -> rusqlite::Result<()> + Send + Sync + 'static,
    {
        self.before_down = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn after_down<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Connection) -> rusqlite::Result<()> + Send + Sync + 'static,
    {
        self.after_down = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn up_statements(&self) -> &[String] {
        &self.up
    }

    #[must_use]
    pub fn down_statements(&self) -> &[String] {
        &self.down
    }

    /// Run one direction of this migration: before hook, statements, after hook.
    /// `on_statement` sees every statement before it executes.
    pub fn apply(
        &self,
        conn: &Connection,
        direction: Direction,
        mut on_statement: impl FnMut(&str),
    ) -> rusqlite::Result<()> {
        let (before, statements, after) = match direction {
            Direction::Up => (&self.before_up, &self.up, &self.after_up),
            Direction::Down => (&self.before_down, &self.down, &self.after_down),
        };

        if let Some(hook) = before {
            hook(conn)?;
        }
        for statement in statements {
            on_statement(statement);
            conn.execute_batch(statement)?;
        }
        if let Some(hook) = after {
            hook(conn)?;
        }

        Ok(())
    }
}

impl fmt::Debug for Migration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Migration")
            .field("up", &self.up)
            .field("down", &self.down)
            .field("before_up", &self.before_up.is_some())
            .field("after_up", &self.after_up.is_some())
            .field("before_down", &self.before_down.is_some())
            .field("after_down", &self.after_down.is_some())
            .finish()
    }
}
