//! Repository error type shared by character and catalog repositories.

use crate::db::DbError;
use crate::model::character::{CharacterId, ItemId, NoteId};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence and lookup errors for character storage.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Character identity row does not exist.
    CharacterNotFound(CharacterId),
    /// Item does not exist on the given character.
    ItemNotFound {
        character_id: CharacterId,
        item_id: ItemId,
    },
    /// Note does not exist on the given character.
    NoteNotFound {
        character_id: CharacterId,
        note_id: NoteId,
    },
    /// Character does not hold a skill with this name.
    SkillNotFound {
        character_id: CharacterId,
        name: String,
    },
    /// Character already holds a skill with this name.
    AlreadyHasSkill {
        character_id: CharacterId,
        name: String,
    },
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted data cannot be converted to a valid read model.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::CharacterNotFound(id) => write!(f, "character not found: {id}"),
            Self::ItemNotFound {
                character_id,
                item_id,
            } => write!(f, "item {item_id} not found on character {character_id}"),
            Self::NoteNotFound {
                character_id,
                note_id,
            } => write!(f, "note {note_id} not found on character {character_id}"),
            Self::SkillNotFound { character_id, name } => {
                write!(f, "skill `{name}` not found on character {character_id}")
            }
            Self::AlreadyHasSkill { character_id, name } => {
                write!(f, "character {character_id} already has skill `{name}`")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "character repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "character repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "character repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted character data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
