use chrono::NaiveDate;
use std::time::SystemTime;
use tabula::{getter_for, setter_for, table};

///
/// Note
///

#[table("notes")]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Note {
    pub id: Option<i64>,

    #[column("title")]
    pub title: Option<String>,

    #[column("body")]
    pub body: String,

    // private so edits always go through the accessors
    #[column("date")]
    date: Option<SystemTime>,
}

impl Note {
    #[must_use]
    pub fn new(title: &str, body: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            body: body.to_string(),
            ..Self::default()
        }
    }

    #[must_use]
    #[getter_for("date")]
    pub const fn date(&self) -> Option<SystemTime> {
        self.date
    }

    #[setter_for("date")]
    pub fn set_date(&mut self, date: Option<SystemTime>) {
        self.date = date;
    }
}

///
/// Color
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Color {
    #[default]
    Grey,
    Red,
    Green,
    Blue,
}

///
/// Tag
///

#[table("tags")]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tag {
    pub id: Option<i64>,

    #[column("name")]
    pub name: String,

    #[column("color")]
    pub color: Option<Color>,

    #[column("created")]
    pub created: Option<NaiveDate>,

    #[column("archived")]
    pub archived: bool,
}

///
/// NoteTag
///

#[table("note_tags")]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NoteTag {
    pub id: Option<i64>,

    #[column("note")]
    #[foreign_key(table = "notes", on_delete = "cascade")]
    pub note: i64,

    #[column("tag")]
    #[foreign_key(table = "tags", on_delete = "cascade")]
    pub tag: i64,
}
