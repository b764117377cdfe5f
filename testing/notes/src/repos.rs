use crate::{
    generated::TagModelAdapter,
    model::{Note, Tag},
};
use std::time::SystemTime;
use tabula::{Error, ModelAdapter, ModelRepository, repository_for};

///
/// NoteQueries
///

#[repository_for(Note)]
pub trait NoteQueries: ModelRepository<Note> {
    fn titled(&self, title: &str) -> Result<Vec<Note>, Error> {
        let base = self.base();
        let sql = format!(
            "SELECT * FROM {} WHERE title = ?1 ORDER BY id_column",
            base.table_name()
        );

        base.select(&sql, [title])
    }

    /// Stamp the note with the current time and store it.
    fn touch(&self, note: &mut Note) -> Result<usize, Error> {
        note.set_date(Some(SystemTime::now()));
        self.update(note)
    }

    fn tags_of(&self, note: &Note) -> Result<Vec<Tag>, Error> {
        let Some(id) = note.id else {
            return Ok(Vec::new());
        };
        let base = self.base();
        let sql = "SELECT tags.* FROM tags \
                   JOIN note_tags ON note_tags.tag = tags.id_column \
                   WHERE note_tags.note = ?1 ORDER BY tags.id_column";

        base.connection().log_statement(sql);
        base.connection().with(|conn| {
            let mut stmt = conn.prepare(sql)?;
            let mut rows = stmt.query([id])?;
            let mut tags = Vec::new();
            while let Some(row) = rows.next()? {
                let mut tag = Tag::default();
                TagModelAdapter.load(&mut tag, row, base.type_adapters())?;
                tags.push(tag);
            }

            Ok(tags)
        })
    }
}
