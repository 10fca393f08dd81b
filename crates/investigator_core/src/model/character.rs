//! Character aggregate root and its owned records.
//!
//! # Responsibility
//! - Define the read model reassembled by the aggregate store.
//! - Define the creation draft submitted by callers.
//!
//! # Invariants
//! - `id` is assigned by storage and never reused while the row exists.
//! - `stats` maxima equal their current values at creation time.
//!
//! # See also
//! - `repo::character_repo` for persistence of every field below.

use crate::model::skill::{CustomSkillEntry, SkillEntry};
use crate::model::stat::StatBlock;
use serde::{Deserialize, Serialize};

/// Storage-assigned character identity. Always positive.
pub type CharacterId = i64;
/// Identity of the (external) user who created a character.
pub type UserId = i64;
/// Storage-assigned item identity.
pub type ItemId = i64;
/// Storage-assigned note identity.
pub type NoteId = i64;

/// Free-text personal data. Blank/length checks belong to the form layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    pub name: String,
    pub profession: String,
    pub age: String,
    pub gender: String,
    pub residence: String,
    pub birthplace: String,
}

/// Point-buy attributes plus movement (`bw`), which is outside the pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct AttributeSet {
    pub st: i64,
    pub ge: i64,
    pub ma: i64,
    pub ko: i64,
    pub er: i64,
    pub bi: i64,
    pub gr: i64,
    #[serde(rename = "IN")]
    pub intelligence: i64,
    pub bw: i64,
}

impl AttributeSet {
    /// The eight pool attributes keyed by their sheet abbreviation.
    ///
    /// `BW` is excluded because it is not distributed from the pool.
    pub fn pool_values(&self) -> [(&'static str, i64); 8] {
        [
            ("ST", self.st),
            ("GE", self.ge),
            ("MA", self.ma),
            ("KO", self.ko),
            ("ER", self.er),
            ("BI", self.bi),
            ("GR", self.gr),
            ("IN", self.intelligence),
        ]
    }
}

/// Carried item. `count` is at least 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub count: i64,
}

/// Item fields submitted for insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub description: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub text: String,
}

/// Aggregate root: one investigator sheet and everything it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub info: Info,
    pub attributes: AttributeSet,
    pub stats: StatBlock,
    pub skills: Vec<SkillEntry>,
    pub custom_skills: Vec<CustomSkillEntry>,
    pub items: Vec<Item>,
    pub notes: Vec<Note>,
}

impl Character {
    /// Catalog skills this character does not hold yet, in catalog order.
    pub fn addable_skills(&self, available: &[SkillEntry]) -> Vec<SkillEntry> {
        available
            .iter()
            .filter(|candidate| !self.skills.iter().any(|held| held.name == candidate.name))
            .cloned()
            .collect()
    }

    pub fn has_custom_skill(&self, name: &str) -> bool {
        self.custom_skills.iter().any(|skill| skill.name == name)
    }
}

/// Creation submission, already decoded and shape-checked by the caller.
///
/// Stats are not part of the draft; they are derived at insert time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCharacter {
    pub info: Info,
    pub attributes: AttributeSet,
    pub skills: Vec<SkillEntry>,
    pub custom_skills: Vec<CustomSkillEntry>,
}
