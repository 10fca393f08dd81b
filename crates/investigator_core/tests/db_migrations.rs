use investigator_core::db::migrations::latest_version;
use investigator_core::db::{open_db, open_db_in_memory, DbError};
use investigator_core::{RepoError, SqliteCharacterRepository, SqliteSkillCatalogRepository};
use rusqlite::Connection;

const TABLES: [&str; 10] = [
    "characters",
    "character_info",
    "character_attributes",
    "character_stats",
    "skills",
    "character_skills",
    "custom_skills",
    "character_custom_skills",
    "items",
    "notes",
];

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    for table in TABLES {
        assert_table_exists(&conn, table);
    }
}

#[test]
fn base_skill_catalog_is_seeded() {
    let conn = open_db_in_memory().unwrap();

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM skills;", [], |row| row.get(0))
        .unwrap();
    assert!(count > 30, "expected seeded catalog, got {count} rows");

    let wealth_default: i64 = conn
        .query_row(
            "SELECT default_value FROM skills WHERE name = 'Finanzkraft';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(wealth_default, 0);
}

#[test]
fn foreign_keys_are_enforced() {
    let conn = open_db_in_memory().unwrap();

    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);

    let orphan = conn.execute(
        "INSERT INTO notes (character_id, text) VALUES (42, 'orphan');",
        [],
    );
    assert!(orphan.is_err());
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("investigators.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "characters");

    let seeded: i64 = conn_second
        .query_row(
            "SELECT COUNT(*) FROM skills WHERE name = 'Finanzkraft';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(seeded, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn repositories_reject_unmigrated_connection() {
    let mut conn = Connection::open_in_memory().unwrap();

    let catalog_err = SqliteSkillCatalogRepository::try_new(&conn)
        .err()
        .expect("catalog repo must reject");
    assert!(matches!(
        catalog_err,
        RepoError::UninitializedConnection {
            actual_version: 0,
            ..
        }
    ));

    let character_err = SqliteCharacterRepository::try_new(&mut conn)
        .err()
        .expect("character repo must reject");
    assert!(matches!(
        character_err,
        RepoError::UninitializedConnection { .. }
    ));
}

#[test]
fn repositories_reject_connection_missing_table() {
    let mut conn = open_db_in_memory().unwrap();
    conn.execute_batch("PRAGMA foreign_keys = OFF; DROP TABLE notes;")
        .unwrap();

    let err = SqliteCharacterRepository::try_new(&mut conn)
        .err()
        .expect("missing table must be rejected");
    assert!(matches!(err, RepoError::MissingRequiredTable("notes")));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
