//! Connection readiness checks shared by repositories.

use crate::db::migrations::latest_version;
use crate::repo::{RepoError, RepoResult};
use rusqlite::Connection;

/// Tables (and the columns repositories read) that must exist before use.
const REQUIRED_SCHEMA: &[(&str, &[&str])] = &[
    ("characters", &["id", "created_by"]),
    (
        "character_info",
        &[
            "character_id",
            "name",
            "profession",
            "age",
            "gender",
            "residence",
            "birthplace",
        ],
    ),
    (
        "character_attributes",
        &[
            "character_id",
            "st",
            "ge",
            "ma",
            "ko",
            "er",
            "bi",
            "gr",
            "intl",
            "bw",
        ],
    ),
    (
        "character_stats",
        &[
            "character_id",
            "max_tp",
            "tp",
            "max_sta",
            "sta",
            "max_mp",
            "mp",
            "max_luck",
            "luck",
        ],
    ),
    ("skills", &["name", "default_value"]),
    ("character_skills", &["id", "character_id", "skill_name", "value"]),
    ("custom_skills", &["id", "name", "category", "default_value"]),
    (
        "character_custom_skills",
        &["id", "character_id", "name", "category", "value"],
    ),
    (
        "items",
        &["id", "character_id", "name", "description", "count"],
    ),
    ("notes", &["id", "character_id", "text"]),
];

/// Rejects connections that were not opened through `db::open_db*`.
pub(crate) fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &(table, columns) in REQUIRED_SCHEMA {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
