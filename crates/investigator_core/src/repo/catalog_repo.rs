//! Skill catalog repositories: the seeded base catalog and the shared
//! custom skill catalog.
//!
//! # Responsibility
//! - Read the base skill catalog (name -> default value).
//! - Register `(name, category)` custom skill pairs on first use and read
//!   their stored default back.
//!
//! # Invariants
//! - A `(name, category)` pair is registered at most once, guarded by a
//!   unique constraint; a conflicting insert means "already present".
//! - Registered defaults are never rewritten after first registration.

use crate::model::skill::{SkillCategory, SkillEntry};
use crate::repo::schema::ensure_connection_ready;
use crate::repo::{RepoError, RepoResult};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};

/// One registered custom skill in the shared catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomSkillDefinition {
    pub name: String,
    pub category: SkillCategory,
    pub default_value: i64,
}

/// Repository interface for catalog lookups.
pub trait SkillCatalogRepository {
    /// Base catalog skills ordered by name.
    fn list_available_skills(&self) -> RepoResult<Vec<SkillEntry>>;
    /// Registers a custom skill pair if absent and returns its stored default.
    fn register_custom_skill(&self, name: &str, category: SkillCategory) -> RepoResult<i64>;
    /// Stored default for a registered pair, `None` when never registered.
    fn custom_skill_default(&self, name: &str, category: SkillCategory)
        -> RepoResult<Option<i64>>;
    /// Registered custom skills, optionally restricted to one category.
    fn list_custom_skills(
        &self,
        category: Option<SkillCategory>,
    ) -> RepoResult<Vec<CustomSkillDefinition>>;
}

/// SQLite-backed skill catalog repository.
pub struct SqliteSkillCatalogRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSkillCatalogRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl SkillCatalogRepository for SqliteSkillCatalogRepository<'_> {
    fn list_available_skills(&self) -> RepoResult<Vec<SkillEntry>> {
        load_available_skills(self.conn)
    }

    fn register_custom_skill(&self, name: &str, category: SkillCategory) -> RepoResult<i64> {
        ensure_custom_skill_registered(self.conn, name, category)?;
        load_custom_skill_default(self.conn, name, category)?.ok_or_else(|| {
            RepoError::InvalidData(format!(
                "custom skill `{name}` in category `{}` missing after registration",
                category.as_str()
            ))
        })
    }

    fn custom_skill_default(
        &self,
        name: &str,
        category: SkillCategory,
    ) -> RepoResult<Option<i64>> {
        load_custom_skill_default(self.conn, name, category)
    }

    fn list_custom_skills(
        &self,
        category: Option<SkillCategory>,
    ) -> RepoResult<Vec<CustomSkillDefinition>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, category, default_value
             FROM custom_skills
             WHERE (?1 IS NULL OR category = ?1)
             ORDER BY category ASC, name ASC;",
        )?;
        let mut rows = stmt.query([category.map(SkillCategory::as_str)])?;
        let mut definitions = Vec::new();
        while let Some(row) = rows.next()? {
            let category_text: String = row.get("category")?;
            definitions.push(CustomSkillDefinition {
                name: row.get("name")?,
                category: parse_category(&category_text, "custom_skills.category")?,
                default_value: row.get("default_value")?,
            });
        }
        Ok(definitions)
    }
}

pub(crate) fn load_available_skills(conn: &Connection) -> RepoResult<Vec<SkillEntry>> {
    let mut stmt = conn.prepare("SELECT name, default_value FROM skills ORDER BY name ASC;")?;
    let mut rows = stmt.query([])?;
    let mut skills = Vec::new();
    while let Some(row) = rows.next()? {
        skills.push(SkillEntry {
            name: row.get("name")?,
            value: row.get("default_value")?,
        });
    }
    Ok(skills)
}

pub(crate) fn load_base_skill_default(conn: &Connection, name: &str) -> RepoResult<Option<i64>> {
    let value = conn
        .query_row(
            "SELECT default_value FROM skills WHERE name = ?1;",
            [name],
            |row| row.get(0),
        )
        .optional()?;
    Ok(value)
}

/// Insert-if-absent on `(name, category)`. An existing pair keeps its
/// stored default.
///
/// Accepts a plain connection or a transaction (via deref), so creation can
/// register pairs inside its own transaction.
pub(crate) fn ensure_custom_skill_registered(
    conn: &Connection,
    name: &str,
    category: SkillCategory,
) -> RepoResult<()> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO custom_skills (name, category, default_value)
         VALUES (?1, ?2, ?3);",
        params![name, category.as_str(), category.default_value()],
    )?;
    if inserted > 0 {
        debug!(
            "event=custom_skill_register module=repo status=ok category={} default_value={}",
            category.as_str(),
            category.default_value()
        );
    }
    Ok(())
}

fn load_custom_skill_default(
    conn: &Connection,
    name: &str,
    category: SkillCategory,
) -> RepoResult<Option<i64>> {
    let value = conn
        .query_row(
            "SELECT default_value FROM custom_skills WHERE name = ?1 AND category = ?2;",
            params![name, category.as_str()],
            |row| row.get(0),
        )
        .optional()?;
    Ok(value)
}

pub(crate) fn parse_category(value: &str, column: &str) -> RepoResult<SkillCategory> {
    SkillCategory::parse(value).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid skill category `{value}` in {column}"))
    })
}
