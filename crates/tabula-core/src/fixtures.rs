//! Hand-written equivalents of what the build step generates, for unit tests.

use crate::{
    AdapterHolder, ConnectionHandle, Error, ID_COLUMN, Migration, Model, ModelAdapter,
    ModelRepository, Repository, RepositoryHolder, TableSchema, TypeAdapters, db::Registration,
};
use rusqlite::{Row, types::Value};
use std::{sync::Arc, time::SystemTime};

pub(crate) const NOTES_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS notes (id_column INTEGER PRIMARY KEY AUTOINCREMENT, title TEXT, body TEXT NOT NULL, date INTEGER, pinned INTEGER NOT NULL)";

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Note {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub body: String,
    pub date: Option<SystemTime>,
    pub pinned: bool,
}

impl Note {
    pub fn new(title: &str, body: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            body: body.to_string(),
            ..Self::default()
        }
    }
}

impl Model for Note {
    const PATH: &'static str = "crate::fixtures::Note";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }
}

pub(crate) struct NoteModelAdapter;

impl TableSchema for NoteModelAdapter {
    fn table_name(&self) -> &'static str {
        "notes"
    }

    fn schema(&self) -> &'static str {
        NOTES_SCHEMA
    }
}

impl ModelAdapter<Note> for NoteModelAdapter {
    fn load(&self, entity: &mut Note, row: &Row<'_>, types: &TypeAdapters) -> Result<(), Error> {
        entity.set_id(row.get(ID_COLUMN)?);
        entity.title = row.get("title")?;
        entity.body = row.get("body")?;
        entity.date = types.deserialize::<SystemTime, i64>(row.get("date")?)?;
        entity.pinned = types.deserialize_required::<bool, i64>(row.get("pinned")?)?;

        Ok(())
    }

    fn values(&self, entity: &Note, types: &TypeAdapters) -> Result<Vec<(&'static str, Value)>, Error> {
        Ok(vec![
            ("title", Value::from(entity.title.clone())),
            ("body", Value::from(entity.body.clone())),
            (
                "date",
                Value::from(types.serialize::<SystemTime, i64>(entity.date.as_ref())?),
            ),
            (
                "pinned",
                Value::from(types.serialize_required::<bool, i64>(&entity.pinned)?),
            ),
        ])
    }
}

pub(crate) struct NoteRepository {
    pub base: Repository<Note>,
}

impl ModelRepository<Note> for NoteRepository {
    fn base(&self) -> &Repository<Note> {
        &self.base
    }
}

pub(crate) fn adapter_holder() -> Result<AdapterHolder, Error> {
    let mut holder = AdapterHolder::new();
    holder.add_migration(
        1,
        Migration::new()
            .up(["CREATE TABLE tags (id_column INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL)"])
            .down(["DROP TABLE tags"]),
    )?;
    holder.add_model_adapter::<Note, _>(NoteModelAdapter);

    Ok(holder)
}

pub(crate) fn repository_holder(
    connection: &ConnectionHandle,
    adapters: &Arc<AdapterHolder>,
    cache_size: usize,
) -> Result<RepositoryHolder, Error> {
    let mut holder = RepositoryHolder::new();
    holder.add_repository::<Note, _>(NoteRepository {
        base: Repository::new(connection, adapters, cache_size)?,
    });

    Ok(holder)
}

pub(crate) const REGISTRATION: Registration = Registration {
    adapter_holder,
    repository_holder,
};
