//! Character aggregate repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Write a new character (identity, info, attributes, derived stats,
//!   skills, custom skills) in one transaction.
//! - Reassemble a `Character` from its rows by id.
//! - Own item/note/skill sub-resource mutations and cascading deletion.
//!
//! # Invariants
//! - A failed insert leaves no row behind for the attempted character.
//! - Info, attribute and stat rows are mandatory; a missing one means the
//!   character does not exist.
//! - Item counts are clamped to at least 1 on edit.
//! - Stat updates are plain read-modify-write: concurrent increments on the
//!   same pool can lose an update.

use crate::model::character::{
    AttributeSet, Character, CharacterId, Info, Item, ItemId, NewCharacter, NewItem, Note, NoteId,
    UserId,
};
use crate::model::skill::{CustomSkillEntry, SkillCategory, SkillEntry};
use crate::model::stat::{StatBlock, StatKind, StatPool};
use crate::repo::catalog_repo::{
    ensure_custom_skill_registered, load_available_skills, load_base_skill_default,
    parse_category,
};
use crate::repo::schema::ensure_connection_ready;
use crate::repo::{RepoError, RepoResult};
use crate::rules::derive::derive_stats;
use crate::rules::dice::RandomSource;
use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

/// Lowest count an item can hold.
pub const MIN_ITEM_COUNT: i64 = 1;

/// Repository interface for the character aggregate.
pub trait CharacterRepository {
    /// Inserts a full character and returns its new id.
    ///
    /// Stats are derived here from the draft attributes and one draw from
    /// `source`.
    fn insert_character(
        &mut self,
        draft: &NewCharacter,
        created_by: UserId,
        source: &mut dyn RandomSource,
    ) -> RepoResult<CharacterId>;
    /// Loads one character, `None` when it does not exist.
    fn get_character(&self, character_id: CharacterId) -> RepoResult<Option<Character>>;
    /// Characters created by `user_id`, ordered by id.
    fn list_characters_owned_by(&self, user_id: UserId) -> RepoResult<Vec<Character>>;
    /// Every stored character, ordered by id.
    fn list_all_characters(&self) -> RepoResult<Vec<Character>>;
    /// User who created the character.
    fn character_owner(&self, character_id: CharacterId) -> RepoResult<UserId>;
    /// Deletes the character and, by cascade, everything it owns.
    fn delete_character(&self, character_id: CharacterId) -> RepoResult<()>;
    /// Base skill catalog ordered by name.
    fn list_available_skills(&self) -> RepoResult<Vec<SkillEntry>>;
    /// Base catalog default for one skill name.
    fn base_skill_default(&self, name: &str) -> RepoResult<Option<i64>>;

    fn add_item(&self, character_id: CharacterId, item: &NewItem) -> RepoResult<ItemId>;
    fn get_item(&self, character_id: CharacterId, item_id: ItemId) -> RepoResult<Item>;
    /// Writes `max(count, 1)` and returns the stored count.
    fn edit_item_count(
        &self,
        character_id: CharacterId,
        item_id: ItemId,
        count: i64,
    ) -> RepoResult<i64>;
    fn delete_item(&self, character_id: CharacterId, item_id: ItemId) -> RepoResult<()>;

    fn add_note(&self, character_id: CharacterId, text: &str) -> RepoResult<NoteId>;
    fn delete_note(&self, character_id: CharacterId, note_id: NoteId) -> RepoResult<()>;

    fn add_skill(&self, character_id: CharacterId, name: &str, value: i64) -> RepoResult<()>;
    fn edit_skill(&self, character_id: CharacterId, name: &str, value: i64) -> RepoResult<()>;

    /// Registers the pair in the shared catalog if needed, then adds the
    /// character's own row. Fails with `AlreadyHasSkill` when the character
    /// already holds a custom skill of that name.
    ///
    /// Registration and the duplicate check run in one transaction, so a
    /// rejected call leaves the shared catalog untouched: a pair first seen
    /// by a failing call is not registered.
    fn add_custom_skill(
        &mut self,
        character_id: CharacterId,
        name: &str,
        category: SkillCategory,
        value: i64,
    ) -> RepoResult<()>;
    fn edit_custom_skill(
        &self,
        character_id: CharacterId,
        name: &str,
        value: i64,
    ) -> RepoResult<()>;

    /// Current stat block of one character.
    fn load_stats(&self, character_id: CharacterId) -> RepoResult<StatBlock>;
    /// Overwrites the current value of one pool. Maxima are untouched.
    fn write_stat_current(
        &self,
        character_id: CharacterId,
        kind: StatKind,
        value: i64,
    ) -> RepoResult<()>;
}

/// SQLite-backed character repository.
pub struct SqliteCharacterRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteCharacterRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl CharacterRepository for SqliteCharacterRepository<'_> {
    fn insert_character(
        &mut self,
        draft: &NewCharacter,
        created_by: UserId,
        source: &mut dyn RandomSource,
    ) -> RepoResult<CharacterId> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute(
            "INSERT INTO characters (created_by) VALUES (?1);",
            [created_by],
        )?;
        let character_id = tx.last_insert_rowid();

        let info = &draft.info;
        tx.execute(
            "INSERT INTO character_info (
                character_id,
                name,
                profession,
                age,
                gender,
                residence,
                birthplace
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                character_id,
                info.name,
                info.profession,
                info.age,
                info.gender,
                info.residence,
                info.birthplace,
            ],
        )?;

        let attributes = &draft.attributes;
        tx.execute(
            "INSERT INTO character_attributes (
                character_id, st, ge, ma, ko, er, bi, gr, intl, bw
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
            params![
                character_id,
                attributes.st,
                attributes.ge,
                attributes.ma,
                attributes.ko,
                attributes.er,
                attributes.bi,
                attributes.gr,
                attributes.intelligence,
                attributes.bw,
            ],
        )?;

        let stats = derive_stats(attributes, source);
        tx.execute(
            "INSERT INTO character_stats (
                character_id, max_tp, tp, max_sta, sta, max_mp, mp, max_luck, luck
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                character_id,
                stats.tp.max,
                stats.tp.current,
                stats.sta.max,
                stats.sta.current,
                stats.mp.max,
                stats.mp.current,
                stats.luck.max,
                stats.luck.current,
            ],
        )?;

        for skill in &draft.custom_skills {
            ensure_custom_skill_registered(&tx, &skill.name, skill.category)?;
            tx.execute(
                "INSERT INTO character_custom_skills (character_id, name, category, value)
                 VALUES (?1, ?2, ?3, ?4);",
                params![
                    character_id,
                    skill.name,
                    skill.category.as_str(),
                    skill.value
                ],
            )?;
        }

        for skill in &draft.skills {
            tx.execute(
                "INSERT INTO character_skills (character_id, skill_name, value)
                 VALUES (?1, ?2, ?3);",
                params![character_id, skill.name, skill.value],
            )?;
        }

        tx.commit()?;
        info!(
            "event=character_insert module=repo status=ok character_id={} created_by={} skills={} custom_skills={}",
            character_id,
            created_by,
            draft.skills.len(),
            draft.custom_skills.len()
        );
        Ok(character_id)
    }

    fn get_character(&self, character_id: CharacterId) -> RepoResult<Option<Character>> {
        load_character(self.conn, character_id)
    }

    fn list_characters_owned_by(&self, user_id: UserId) -> RepoResult<Vec<Character>> {
        let ids = query_ids(
            self.conn,
            "SELECT id FROM characters WHERE created_by = ?1 ORDER BY id ASC;",
            Some(user_id),
        )?;
        load_characters(self.conn, &ids)
    }

    fn list_all_characters(&self) -> RepoResult<Vec<Character>> {
        let ids = query_ids(self.conn, "SELECT id FROM characters ORDER BY id ASC;", None)?;
        load_characters(self.conn, &ids)
    }

    fn character_owner(&self, character_id: CharacterId) -> RepoResult<UserId> {
        self.conn
            .query_row(
                "SELECT created_by FROM characters WHERE id = ?1;",
                [character_id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or(RepoError::CharacterNotFound(character_id))
    }

    fn delete_character(&self, character_id: CharacterId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM characters WHERE id = ?1;", [character_id])?;
        if changed == 0 {
            return Err(RepoError::CharacterNotFound(character_id));
        }
        info!(
            "event=character_delete module=repo status=ok character_id={}",
            character_id
        );
        Ok(())
    }

    fn list_available_skills(&self) -> RepoResult<Vec<SkillEntry>> {
        load_available_skills(self.conn)
    }

    fn base_skill_default(&self, name: &str) -> RepoResult<Option<i64>> {
        load_base_skill_default(self.conn, name)
    }

    fn add_item(&self, character_id: CharacterId, item: &NewItem) -> RepoResult<ItemId> {
        ensure_character_exists(self.conn, character_id)?;
        self.conn.execute(
            "INSERT INTO items (character_id, name, description, count)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                character_id,
                item.name,
                item.description,
                item.count.max(MIN_ITEM_COUNT)
            ],
        )?;
        let item_id = self.conn.last_insert_rowid();
        debug!(
            "event=item_add module=repo status=ok character_id={} item_id={}",
            character_id, item_id
        );
        Ok(item_id)
    }

    fn get_item(&self, character_id: CharacterId, item_id: ItemId) -> RepoResult<Item> {
        self.conn
            .query_row(
                "SELECT id, name, description, count
                 FROM items
                 WHERE id = ?1 AND character_id = ?2;",
                [item_id, character_id],
                |row| {
                    Ok(Item {
                        id: row.get("id")?,
                        name: row.get("name")?,
                        description: row.get("description")?,
                        count: row.get("count")?,
                    })
                },
            )
            .optional()?
            .ok_or(RepoError::ItemNotFound {
                character_id,
                item_id,
            })
    }

    fn edit_item_count(
        &self,
        character_id: CharacterId,
        item_id: ItemId,
        count: i64,
    ) -> RepoResult<i64> {
        let stored = count.max(MIN_ITEM_COUNT);
        let changed = self.conn.execute(
            "UPDATE items SET count = ?1 WHERE id = ?2 AND character_id = ?3;",
            [stored, item_id, character_id],
        )?;
        if changed == 0 {
            return Err(RepoError::ItemNotFound {
                character_id,
                item_id,
            });
        }
        Ok(stored)
    }

    fn delete_item(&self, character_id: CharacterId, item_id: ItemId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM items WHERE id = ?1 AND character_id = ?2;",
            [item_id, character_id],
        )?;
        if changed == 0 {
            return Err(RepoError::ItemNotFound {
                character_id,
                item_id,
            });
        }
        Ok(())
    }

    fn add_note(&self, character_id: CharacterId, text: &str) -> RepoResult<NoteId> {
        ensure_character_exists(self.conn, character_id)?;
        self.conn.execute(
            "INSERT INTO notes (character_id, text) VALUES (?1, ?2);",
            params![character_id, text],
        )?;
        let note_id = self.conn.last_insert_rowid();
        debug!(
            "event=note_add module=repo status=ok character_id={} note_id={} text_len={}",
            character_id,
            note_id,
            text.chars().count()
        );
        Ok(note_id)
    }

    fn delete_note(&self, character_id: CharacterId, note_id: NoteId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM notes WHERE id = ?1 AND character_id = ?2;",
            [note_id, character_id],
        )?;
        if changed == 0 {
            return Err(RepoError::NoteNotFound {
                character_id,
                note_id,
            });
        }
        Ok(())
    }

    fn add_skill(&self, character_id: CharacterId, name: &str, value: i64) -> RepoResult<()> {
        ensure_character_exists(self.conn, character_id)?;
        let held: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM character_skills WHERE character_id = ?1 AND skill_name = ?2
            );",
            params![character_id, name],
            |row| row.get(0),
        )?;
        if held == 1 {
            return Err(RepoError::AlreadyHasSkill {
                character_id,
                name: name.to_string(),
            });
        }

        self.conn.execute(
            "INSERT INTO character_skills (character_id, skill_name, value) VALUES (?1, ?2, ?3);",
            params![character_id, name, value],
        )?;
        Ok(())
    }

    fn edit_skill(&self, character_id: CharacterId, name: &str, value: i64) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE character_skills SET value = ?1 WHERE character_id = ?2 AND skill_name = ?3;",
            params![value, character_id, name],
        )?;
        if changed == 0 {
            return Err(RepoError::SkillNotFound {
                character_id,
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn add_custom_skill(
        &mut self,
        character_id: CharacterId,
        name: &str,
        category: SkillCategory,
        value: i64,
    ) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        ensure_character_exists(&tx, character_id)?;
        ensure_custom_skill_registered(&tx, name, category)?;

        let held: i64 = tx.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM character_custom_skills WHERE character_id = ?1 AND name = ?2
            );",
            params![character_id, name],
            |row| row.get(0),
        )?;
        if held == 1 {
            // dropping `tx` rolls back a registration made by this call
            return Err(RepoError::AlreadyHasSkill {
                character_id,
                name: name.to_string(),
            });
        }

        tx.execute(
            "INSERT INTO character_custom_skills (character_id, name, category, value)
             VALUES (?1, ?2, ?3, ?4);",
            params![character_id, name, category.as_str(), value],
        )?;
        tx.commit()?;
        debug!(
            "event=custom_skill_add module=repo status=ok character_id={} category={}",
            character_id,
            category.as_str()
        );
        Ok(())
    }

    fn edit_custom_skill(
        &self,
        character_id: CharacterId,
        name: &str,
        value: i64,
    ) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE character_custom_skills SET value = ?1 WHERE character_id = ?2 AND name = ?3;",
            params![value, character_id, name],
        )?;
        if changed == 0 {
            return Err(RepoError::SkillNotFound {
                character_id,
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn load_stats(&self, character_id: CharacterId) -> RepoResult<StatBlock> {
        load_stat_block(self.conn, character_id)?.ok_or(RepoError::CharacterNotFound(character_id))
    }

    fn write_stat_current(
        &self,
        character_id: CharacterId,
        kind: StatKind,
        value: i64,
    ) -> RepoResult<()> {
        let sql = format!(
            "UPDATE character_stats SET {} = ?1 WHERE character_id = ?2;",
            kind.current_column()
        );
        let changed = self.conn.execute(&sql, [value, character_id])?;
        if changed == 0 {
            return Err(RepoError::CharacterNotFound(character_id));
        }
        Ok(())
    }
}

fn ensure_character_exists(conn: &Connection, character_id: CharacterId) -> RepoResult<()> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM characters WHERE id = ?1);",
        [character_id],
        |row| row.get(0),
    )?;
    if exists == 1 {
        Ok(())
    } else {
        Err(RepoError::CharacterNotFound(character_id))
    }
}

fn query_ids(conn: &Connection, sql: &str, user_id: Option<UserId>) -> RepoResult<Vec<CharacterId>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = match user_id {
        Some(user_id) => stmt.query([user_id])?,
        None => stmt.query([])?,
    };
    let mut ids = Vec::new();
    while let Some(row) = rows.next()? {
        ids.push(row.get(0)?);
    }
    Ok(ids)
}

fn load_characters(conn: &Connection, ids: &[CharacterId]) -> RepoResult<Vec<Character>> {
    let mut characters = Vec::with_capacity(ids.len());
    for id in ids {
        let character = load_character(conn, *id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("character {id} is missing mandatory rows"))
        })?;
        characters.push(character);
    }
    Ok(characters)
}

fn load_character(conn: &Connection, character_id: CharacterId) -> RepoResult<Option<Character>> {
    let Some(info) = load_info(conn, character_id)? else {
        return Ok(None);
    };
    let Some(attributes) = load_attributes(conn, character_id)? else {
        return Ok(None);
    };
    let Some(stats) = load_stat_block(conn, character_id)? else {
        return Ok(None);
    };

    Ok(Some(Character {
        id: character_id,
        info,
        attributes,
        stats,
        skills: load_skills(conn, character_id)?,
        custom_skills: load_custom_skills(conn, character_id)?,
        items: load_items(conn, character_id)?,
        notes: load_notes(conn, character_id)?,
    }))
}

fn load_info(conn: &Connection, character_id: CharacterId) -> RepoResult<Option<Info>> {
    let info = conn
        .query_row(
            "SELECT name, profession, age, gender, residence, birthplace
             FROM character_info
             WHERE character_id = ?1;",
            [character_id],
            |row| {
                Ok(Info {
                    name: row.get("name")?,
                    profession: row.get("profession")?,
                    age: row.get("age")?,
                    gender: row.get("gender")?,
                    residence: row.get("residence")?,
                    birthplace: row.get("birthplace")?,
                })
            },
        )
        .optional()?;
    Ok(info)
}

fn load_attributes(
    conn: &Connection,
    character_id: CharacterId,
) -> RepoResult<Option<AttributeSet>> {
    let attributes = conn
        .query_row(
            "SELECT st, ge, ma, ko, er, bi, gr, intl, bw
             FROM character_attributes
             WHERE character_id = ?1;",
            [character_id],
            |row| {
                Ok(AttributeSet {
                    st: row.get("st")?,
                    ge: row.get("ge")?,
                    ma: row.get("ma")?,
                    ko: row.get("ko")?,
                    er: row.get("er")?,
                    bi: row.get("bi")?,
                    gr: row.get("gr")?,
                    intelligence: row.get("intl")?,
                    bw: row.get("bw")?,
                })
            },
        )
        .optional()?;
    Ok(attributes)
}

fn load_stat_block(conn: &Connection, character_id: CharacterId) -> RepoResult<Option<StatBlock>> {
    let stats = conn
        .query_row(
            "SELECT max_tp, tp, max_sta, sta, max_mp, mp, max_luck, luck
             FROM character_stats
             WHERE character_id = ?1;",
            [character_id],
            |row| {
                Ok(StatBlock {
                    tp: StatPool {
                        max: row.get("max_tp")?,
                        current: row.get("tp")?,
                    },
                    sta: StatPool {
                        max: row.get("max_sta")?,
                        current: row.get("sta")?,
                    },
                    mp: StatPool {
                        max: row.get("max_mp")?,
                        current: row.get("mp")?,
                    },
                    luck: StatPool {
                        max: row.get("max_luck")?,
                        current: row.get("luck")?,
                    },
                })
            },
        )
        .optional()?;
    Ok(stats)
}

fn load_skills(conn: &Connection, character_id: CharacterId) -> RepoResult<Vec<SkillEntry>> {
    let mut stmt = conn.prepare(
        "SELECT skill_name, value
         FROM character_skills
         WHERE character_id = ?1
         ORDER BY id ASC;",
    )?;
    let mut rows = stmt.query([character_id])?;
    let mut skills = Vec::new();
    while let Some(row) = rows.next()? {
        skills.push(SkillEntry {
            name: row.get("skill_name")?,
            value: row.get("value")?,
        });
    }
    Ok(skills)
}

fn load_custom_skills(
    conn: &Connection,
    character_id: CharacterId,
) -> RepoResult<Vec<CustomSkillEntry>> {
    let mut stmt = conn.prepare(
        "SELECT name, category, value
         FROM character_custom_skills
         WHERE character_id = ?1
         ORDER BY id ASC;",
    )?;
    let mut rows = stmt.query([character_id])?;
    let mut skills = Vec::new();
    while let Some(row) = rows.next()? {
        let category_text: String = row.get("category")?;
        skills.push(CustomSkillEntry {
            category: parse_category(&category_text, "character_custom_skills.category")?,
            name: row.get("name")?,
            value: row.get("value")?,
        });
    }
    Ok(skills)
}

fn load_items(conn: &Connection, character_id: CharacterId) -> RepoResult<Vec<Item>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, description, count
         FROM items
         WHERE character_id = ?1
         ORDER BY id ASC;",
    )?;
    let mut rows = stmt.query([character_id])?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        let item = Item {
            id: row.get("id")?,
            name: row.get("name")?,
            description: row.get("description")?,
            count: row.get("count")?,
        };
        if item.count < MIN_ITEM_COUNT {
            return Err(RepoError::InvalidData(format!(
                "invalid count `{}` in items.count",
                item.count
            )));
        }
        items.push(item);
    }
    Ok(items)
}

fn load_notes(conn: &Connection, character_id: CharacterId) -> RepoResult<Vec<Note>> {
    let mut stmt = conn.prepare(
        "SELECT id, text
         FROM notes
         WHERE character_id = ?1
         ORDER BY id ASC;",
    )?;
    let mut rows = stmt.query([character_id])?;
    let mut notes = Vec::new();
    while let Some(row) = rows.next()? {
        notes.push(Note {
            id: row.get("id")?,
            text: row.get("text")?,
        });
    }
    Ok(notes)
}
