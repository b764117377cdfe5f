use tabula::{Migration, migration};

#[migration(version = 2)]
#[must_use]
pub fn index_note_titles() -> Migration {
    Migration::new()
        .up(["CREATE INDEX IF NOT EXISTS notes_title ON notes(title)"])
        .down(["DROP INDEX IF EXISTS notes_title"])
}

#[migration(version = 3)]
#[must_use]
pub fn seed_inbox_tag() -> Migration {
    Migration::new()
        .up(["INSERT INTO tags (name, color, archived) VALUES ('inbox', 'blue', 0)"])
        .down(["DELETE FROM tags WHERE name = 'inbox'"])
}
