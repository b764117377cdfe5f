//! Minimal statement builders for primary-key addressed writes and reads.
//!
//! Repositories never splice values into SQL; every value is bound as a
//! positional parameter. Identifiers come from generated code only.


use crate::{Error, ID_COLUMN};
use rusqlite::{Connection, params_from_iter, types::Value};

///
/// Statement
///

#[derive(Clone, Debug, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    pub fn execute(&self, conn: &Connection) -> rusqlite::Result<usize> {
        conn.execute(&self.sql, params_from_iter(self.params.iter()))
    }
}

///
/// Insert
///

#[derive(Debug, Default)]
pub struct Insert<'a> {
    table: &'a str,
    columns: Vec<&'a str>,
    values: Vec<Value>,
}

impl<'a> Insert<'a> {
    #[must_use]
    pub fn new(table: &'a str) -> Self {
        Self {
            table,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn columns(mut self, columns: impl IntoIterator<Item = &'a str>) -> Self {
        self.columns.extend(columns);
        self
    }

    #[must_use]
    pub fn values(mut self, values: impl IntoIterator<Item = Value>) -> Self {
        self.values.extend(values);
        self
    }

    /// Split `(column, value)` pairs into the column and value lists.
    #[must_use]
    pub fn pairs(self, pairs: Vec<(&'a str, Value)>) -> Self {
        let (columns, values): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();
        self.columns(columns).values(values)
    }

    pub fn build(self) -> Result<Statement, Error> {
        if self.columns.len() != self.values.len() {
            return Err(Error::MalformedQuery(format!(
                "insert into '{}' has {} columns but {} values",
                self.table,
                self.columns.len(),
                self.values.len()
            )));
        }

        let sql = if self.columns.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES", self.table)
        } else {
            let placeholders: Vec<_> = (1..=self.values.len()).map(|i| format!("?{i}")).collect();
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                self.table,
                self.columns.join(", "),
                placeholders.join(", ")
            )
        };

        Ok(Statement {
            sql,
            params: self.values,
        })
    }
}

///
/// Update
///

#[derive(Debug)]
pub struct Update<'a> {
    table: &'a str,
    id: i64,
    columns: Vec<&'a str>,
    values: Vec<Value>,
}

impl<'a> Update<'a> {
    #[must_use]
    pub const fn new(table: &'a str, id: i64) -> Self {
        Self {
            table,
            id,
            columns: Vec::new(),
            values: Vec::new(),
        }
    }

    #[must_use]
    pub fn pairs(mut self, pairs: Vec<(&'a str, Value)>) -> Self {
        for (column, value) in pairs {
            self.columns.push(column);
            self.values.push(value);
        }
        self
    }

    pub fn build(self) -> Result<Statement, Error> {
        if self.columns.is_empty() {
            return Err(Error::MalformedQuery(format!(
                "update of '{}' sets no columns",
                self.table
            )));
        }

        let assignments: Vec<_> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{column} = ?{}", i + 1))
            .collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE {ID_COLUMN} = ?{}",
            self.table,
            assignments.join(", "),
            self.columns.len() + 1
        );

        let mut params = self.values;
        params.push(Value::Integer(self.id));

        Ok(Statement { sql, params })
    }
}

/// `DELETE` of one row by primary key.
#[must_use]
pub fn delete(table: &str, id: i64) -> Statement {
    Statement {
        sql: format!("DELETE FROM {table} WHERE {ID_COLUMN} = ?1"),
        params: vec![Value::Integer(id)],
    }
}

/// `SELECT *` of one row by primary key.
#[must_use]
pub fn select_by_id(table: &str, id: i64) -> Statement {
    Statement {
        sql: format!("SELECT * FROM {table} WHERE {ID_COLUMN} = ?1"),
        params: vec![Value::Integer(id)],
    }
}
