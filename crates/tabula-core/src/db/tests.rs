use super::*;
use crate::{
    Migration,
    fixtures::{self, NOTES_SCHEMA, Note, REGISTRATION},
};
use std::sync::Mutex as StdMutex;
use tempfile::TempDir;

type Journal = Arc<StdMutex<Vec<String>>>;

fn record(journal: &Journal, entry: String) -> impl Fn(&Connection) -> rusqlite::Result<()> + use<> {
    let journal = journal.clone();
    move |_| {
        journal.lock().unwrap().push(entry.clone());
        Ok(())
    }
}

fn recorded_migration(journal: &Journal, version: u32) -> Migration {
    Migration::new()
        .up([format!("CREATE TABLE t{version} (x INTEGER)")])
        .down([format!("DROP TABLE t{version}")])
        .before_up(record(journal, format!("before_up:{version}")))
        .after_up(record(journal, format!("after_up:{version}")))
        .before_down(record(journal, format!("before_down:{version}")))
        .after_down(record(journal, format!("after_down:{version}")))
}

fn holder(journal: &Journal, versions: &[u32]) -> AdapterHolder {
    let mut holder = AdapterHolder::new();
    holder.add_model_adapter::<Note, _>(fixtures::NoteModelAdapter);
    for &version in versions {
        holder
            .add_migration(version, recorded_migration(journal, version))
            .unwrap();
    }

    holder
}

fn journal() -> Journal {
    Arc::new(StdMutex::new(Vec::new()))
}

fn entries(journal: &Journal) -> Vec<String> {
    std::mem::take(&mut *journal.lock().unwrap())
}

fn table_exists(conn: &Connection, table: &str) -> bool {
    conn.query_row(
        "SELECT count(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [table],
        |row| row.get::<_, i64>(0),
    )
    .unwrap()
        == 1
}

fn open_at(dir: &TempDir, holder: &AdapterHolder, version: u32) -> (Connection, LifecycleEvent) {
    let mut conn = Connection::open(dir.path().join("notes.db")).unwrap();
    let event = lifecycle::open(&mut conn, holder, version, LogLevel::Full).unwrap();

    (conn, event)
}

#[test]
fn fresh_install_creates_tables_then_runs_every_migration() {
    let dir = tempfile::tempdir().unwrap();
    let journal = journal();
    let mut holder = holder(&journal, &[1, 2, 3]);

    // migrations see the model tables already created
    let seen = journal.clone();
    holder
        .add_migration(
            0,
            Migration::new().before_up(move |conn| {
                let exists: i64 = conn.query_row(
                    "SELECT count(*) FROM sqlite_master WHERE name = 'notes'",
                    [],
                    |row| row.get(0),
                )?;
                seen.lock().unwrap().push(format!("notes_exists:{exists}"));
                Ok(())
            }),
        )
        .unwrap();

    let (conn, event) = open_at(&dir, &holder, 3);

    assert_eq!(event, LifecycleEvent::Created { version: 3 });
    assert_eq!(
        entries(&journal),
        [
            "notes_exists:1",
            "before_up:1",
            "after_up:1",
            "before_up:2",
            "after_up:2",
            "before_up:3",
            "after_up:3",
        ]
    );
    assert_eq!(lifecycle::user_version(&conn).unwrap(), 3);
}

#[test]
fn fresh_install_skips_migrations_above_target() {
    let dir = tempfile::tempdir().unwrap();
    let journal = journal();
    let holder = holder(&journal, &[1, 2, 3]);

    let (conn, _) = open_at(&dir, &holder, 2);

    assert_eq!(
        entries(&journal),
        ["before_up:1", "after_up:1", "before_up:2", "after_up:2"]
    );
    assert!(!table_exists(&conn, "t3"));
}

#[test]
fn upgrade_runs_only_newer_migrations_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let journal = journal();
    let holder = holder(&journal, &[1, 2, 3]);
    drop(open_at(&dir, &holder, 1));
    entries(&journal);

    let (conn, event) = open_at(&dir, &holder, 3);

    assert_eq!(event, LifecycleEvent::Upgraded { from: 1, to: 3 });
    assert_eq!(
        entries(&journal),
        ["before_up:2", "after_up:2", "before_up:3", "after_up:3"]
    );
    assert!(table_exists(&conn, "t2"));
    assert!(table_exists(&conn, "t3"));
}

#[test]
fn downgrade_runs_down_migrations_in_reverse() {
    let dir = tempfile::tempdir().unwrap();
    let journal = journal();
    let holder = holder(&journal, &[1, 2, 3]);
    drop(open_at(&dir, &holder, 3));
    entries(&journal);

    let (conn, event) = open_at(&dir, &holder, 1);

    assert_eq!(event, LifecycleEvent::Downgraded { from: 3, to: 1 });
    assert_eq!(
        entries(&journal),
        ["before_down:3", "after_down:3", "before_down:2", "after_down:2"]
    );
    assert!(table_exists(&conn, "t1"));
    assert!(!table_exists(&conn, "t2"));
    assert_eq!(lifecycle::user_version(&conn).unwrap(), 1);
}

#[test]
fn matching_version_only_opens() {
    let dir = tempfile::tempdir().unwrap();
    let journal = journal();
    let holder = holder(&journal, &[1]);
    drop(open_at(&dir, &holder, 1));
    entries(&journal);

    let (conn, event) = open_at(&dir, &holder, 1);

    assert_eq!(event, LifecycleEvent::Opened { version: 1 });
    assert!(entries(&journal).is_empty());
    let foreign_keys: i64 = conn
        .pragma_query_value(None, "foreign_keys", |row| row.get(0))
        .unwrap();
    assert_eq!(foreign_keys, 1);
}

#[test]
fn failed_upgrade_rolls_back_everything() {
    let dir = tempfile::tempdir().unwrap();
    let journal = journal();
    let mut holder = holder(&journal, &[1, 2]);
    drop(open_at(&dir, &holder, 1));
    holder
        .add_migration(3, Migration::new().up(["CREATE TABLE broken ("]))
        .unwrap();

    let mut conn = Connection::open(dir.path().join("notes.db")).unwrap();
    let err = lifecycle::open(&mut conn, &holder, 3, LogLevel::None).unwrap_err();

    assert!(matches!(err, Error::Migration { version: 3, direction: "up", .. }));
    assert_eq!(lifecycle::user_version(&conn).unwrap(), 1);
    assert!(!table_exists(&conn, "t2"));
}

#[test]
fn failing_hook_aborts_the_migration() {
    let dir = tempfile::tempdir().unwrap();
    let mut holder = AdapterHolder::new();
    holder
        .add_migration(
            1,
            Migration::new()
                .up(["CREATE TABLE t1 (x INTEGER)"])
                .after_up(|_| Err(rusqlite::Error::InvalidQuery)),
        )
        .unwrap();

    let mut conn = Connection::open(dir.path().join("notes.db")).unwrap();
    assert!(lifecycle::open(&mut conn, &holder, 1, LogLevel::None).is_err());
    assert!(!table_exists(&conn, "t1"));
    assert_eq!(lifecycle::user_version(&conn).unwrap(), 0);
}

#[test]
fn version_zero_is_rejected() {
    let mut conn = Connection::open_in_memory().unwrap();
    let err = lifecycle::open(&mut conn, &AdapterHolder::new(), 0, LogLevel::None).unwrap_err();

    assert!(matches!(err, Error::InvalidVersion(0)));
}

#[test]
fn tables_have_primary_key_first() {
    let dir = tempfile::tempdir().unwrap();
    let (conn, _) = open_at(&dir, &holder(&journal(), &[]), 1);

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('notes')").unwrap();
    let columns: Vec<String> = stmt
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    assert!(NOTES_SCHEMA.starts_with("CREATE TABLE IF NOT EXISTS notes"));
    assert_eq!(columns, ["id_column", "title", "body", "date", "pinned"]);
}

#[test]
fn init_is_idempotent() {
    let db = Database::new();
    let config = DatabaseConfig::default().with_log_level(LogLevel::Basic);

    db.init(&config, &REGISTRATION).unwrap();
    let first = db.repository::<Note>().unwrap();
    db.init(&config, &REGISTRATION).unwrap();

    assert_eq!(db.state().unwrap(), LifecycleState::Ready);
    assert_eq!(db.event().unwrap(), LifecycleEvent::Created { version: 1 });
    assert!(Arc::ptr_eq(&first, &db.repository::<Note>().unwrap()));
    assert_eq!(db.table_name::<Note>().unwrap(), "notes");
}

#[test]
fn ready_database_serves_repositories() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::new();
    db.init(&DatabaseConfig::new(dir.path().join("app.db"), 1), &REGISTRATION)
        .unwrap();

    let notes = db.repository::<Note>().unwrap();
    let saved = notes.save(Note::new("hello", "world")).unwrap();

    assert_eq!(
        notes.find(saved.id.unwrap()).unwrap().unwrap().body,
        "world"
    );
}

#[test]
fn concrete_repository_is_the_registered_instance() {
    let db = Database::new();
    db.init(&DatabaseConfig::default(), &REGISTRATION).unwrap();

    let concrete = db.repository_as::<fixtures::NoteRepository>().unwrap();
    let mut note = Note::new("typed", "access");
    concrete.create(&mut note).unwrap();

    let erased = db.repository::<Note>().unwrap();
    assert!(erased.find(note.id.unwrap()).unwrap().is_some());
    assert!(matches!(
        db.repository_as::<String>(),
        Err(Error::RepositoryNotFound(_))
    ));
}

#[test]
fn uninitialized_database_refuses_access() {
    let db = Database::new();

    assert_eq!(db.state().unwrap(), LifecycleState::Uninitialized);
    assert!(matches!(db.repository::<Note>(), Err(Error::NotInitialized)));
    assert!(matches!(db.connection(), Err(Error::NotInitialized)));
}

#[test]
fn failing_factory_leaves_database_uninitialized() {
    fn broken() -> Result<AdapterHolder, Error> {
        Err(Error::DuplicateMigration(2))
    }
    let registration = Registration {
        adapter_holder: broken,
        repository_holder: fixtures::repository_holder,
    };
    let db = Database::new();

    let err = db
        .init(&DatabaseConfig::default(), &registration)
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Registration { holder: "adapter holder", .. }
    ));
    assert_eq!(db.state().unwrap(), LifecycleState::Uninitialized);

    db.init(&DatabaseConfig::default(), &REGISTRATION).unwrap();
    assert_eq!(db.state().unwrap(), LifecycleState::Ready);
}

#[test]
fn close_allows_reinitialization() {
    let db = Database::new();
    db.init(&DatabaseConfig::default(), &REGISTRATION).unwrap();

    db.close().unwrap();
    assert_eq!(db.state().unwrap(), LifecycleState::Uninitialized);

    db.init(&DatabaseConfig::default(), &REGISTRATION).unwrap();
    assert_eq!(db.state().unwrap(), LifecycleState::Ready);
}

#[test]
fn config_reads_from_toml_with_defaults() {
    let config: DatabaseConfig = toml::from_str(
        r#"
        path = "notes.db"
        version = 4
        log_level = "full"
        "#,
    )
    .unwrap();

    assert_eq!(config.path, std::path::PathBuf::from("notes.db"));
    assert_eq!(config.version, 4);
    assert_eq!(config.cache_size, crate::DEFAULT_CACHE_SIZE);
    assert_eq!(config.log_level, LogLevel::Full);
}

#[test]
fn log_levels_are_ordered() {
    assert!(LogLevel::Full.logs(LogLevel::Basic));
    assert!(LogLevel::Basic.logs(LogLevel::Basic));
    assert!(!LogLevel::Basic.logs(LogLevel::Full));
    assert!(!LogLevel::None.logs(LogLevel::Basic));
    assert!(!LogLevel::Full.logs(LogLevel::None));
}
