//! Embedded schema migrations for the character store.
//!
//! # Invariants
//! - Versions start at 1 and increase by one per step.
//! - All pending steps run in one transaction; a failing step leaves the
//!   database at its previous version.
//! - The highest applied version is mirrored to `PRAGMA user_version`.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

struct Step {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const STEPS: &[Step] = &[
    Step {
        version: 1,
        name: "character_tables",
        sql: include_str!("0001_init.sql"),
    },
    Step {
        version: 2,
        name: "base_skill_catalog",
        sql: include_str!("0002_skill_catalog.sql"),
    },
];

/// Highest schema version this binary can produce.
pub fn latest_version() -> u32 {
    STEPS.last().map_or(0, |step| step.version)
}

/// Names of the steps a database at `version` still needs, in order.
pub fn pending_steps(version: u32) -> Vec<&'static str> {
    STEPS
        .iter()
        .filter(|step| step.version > version)
        .map(|step| step.name)
        .collect()
}

/// Brings the connection's schema up to `latest_version()`.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file was written by a newer binary.
/// - `Sqlite` when a step fails; nothing of the batch is kept.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let to_version = latest_version();
    if from_version > to_version {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: to_version,
        });
    }
    if from_version == to_version {
        debug!("event=db_migrate module=db status=skipped version={from_version}");
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in STEPS.iter().filter(|step| step.version > from_version) {
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
        debug!(
            "event=db_migrate_step module=db status=ok version={} name={}",
            step.version, step.name
        );
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={}",
        from_version, to_version
    );
    Ok(())
}
