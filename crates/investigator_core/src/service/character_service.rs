//! Character use-case service.
//!
//! # Responsibility
//! - Validate creation drafts against `CreationRules` before any write.
//! - Gate every post-creation operation on the caller's `Access`.
//! - Translate repository conditions into use-case errors.
//!
//! # Invariants
//! - An invalid draft never reaches storage.
//! - A denied caller never reaches storage.
//! - Item counts written through this service stay at or above 1.

use crate::config::CreationRules;
use crate::model::character::{
    Character, CharacterId, ItemId, NewCharacter, NewItem, NoteId, UserId,
};
use crate::model::skill::{SkillCategory, SkillEntry};
use crate::repo::character_repo::CharacterRepository;
use crate::repo::RepoError;
use crate::rules::attributes::check_attributes;
use crate::rules::dice::RandomSource;
use crate::rules::info::{check_info, check_item};
use crate::rules::skills::{check_skills, SkillCatalog};
use crate::rules::validation::ValidationErrors;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Caller's permission to act on one character or on the whole roster.
///
/// Produced by the host's authorization layer; the service only honors it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    Denied,
}

impl Access {
    pub(crate) fn require(self) -> Result<(), CharacterServiceError> {
        match self {
            Self::Granted => Ok(()),
            Self::Denied => Err(CharacterServiceError::Forbidden),
        }
    }
}

impl From<bool> for Access {
    fn from(value: bool) -> Self {
        if value {
            Self::Granted
        } else {
            Self::Denied
        }
    }
}

/// Account role as known by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Anonymous,
    Player,
    Gm,
}

impl Role {
    /// Only game masters may list every character.
    pub fn may_view_all(self) -> bool {
        matches!(self, Self::Gm)
    }

    pub fn view_all_access(self) -> Access {
        Access::from(self.may_view_all())
    }
}

/// Service error for character use-cases.
#[derive(Debug)]
pub enum CharacterServiceError {
    /// Submitted data breaks one or more rules.
    Validation(ValidationErrors),
    /// Caller may not act on the target.
    Forbidden,
    /// Character does not exist.
    NotFound(CharacterId),
    ItemNotFound {
        character_id: CharacterId,
        item_id: ItemId,
    },
    NoteNotFound {
        character_id: CharacterId,
        note_id: NoteId,
    },
    SkillNotFound {
        character_id: CharacterId,
        name: String,
    },
    /// Character already holds a skill with this name.
    AlreadyHasSkill {
        character_id: CharacterId,
        name: String,
    },
    /// Skill name is not in the base catalog.
    UnknownSkill(String),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for CharacterServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(errors) => write!(f, "{errors}"),
            Self::Forbidden => write!(f, "access denied"),
            Self::NotFound(id) => write!(f, "character not found: {id}"),
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
            Self::UnknownSkill(name) => write!(f, "unknown skill `{name}`"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CharacterServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(errors) => Some(errors),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for CharacterServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::CharacterNotFound(id) => Self::NotFound(id),
            RepoError::ItemNotFound {
                character_id,
                item_id,
            } => Self::ItemNotFound {
                character_id,
                item_id,
            },
            RepoError::NoteNotFound {
                character_id,
                note_id,
            } => Self::NoteNotFound {
                character_id,
                note_id,
            },
            RepoError::SkillNotFound { character_id, name } => {
                Self::SkillNotFound { character_id, name }
            }
            RepoError::AlreadyHasSkill { character_id, name } => {
                Self::AlreadyHasSkill { character_id, name }
            }
            other => Self::Repo(other),
        }
    }
}

impl From<ValidationErrors> for CharacterServiceError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

pub type ServiceResult<T> = Result<T, CharacterServiceError>;

/// Character service facade over repository implementations.
pub struct CharacterService<R: CharacterRepository> {
    repo: R,
    rules: CreationRules,
}

impl<R: CharacterRepository> CharacterService<R> {
    /// Creates a service using the provided repository and creation rules.
    pub fn new(repo: R, rules: CreationRules) -> Self {
        Self { repo, rules }
    }

    pub fn rules(&self) -> &CreationRules {
        &self.rules
    }

    /// Runs every creation check and returns the collected failures.
    pub fn validate_draft(&self, draft: &NewCharacter) -> ServiceResult<()> {
        let catalog = SkillCatalog::from_entries(&self.repo.list_available_skills()?);
        let mut errors = ValidationErrors::new();
        check_info(&draft.info, &mut errors);
        check_attributes(&draft.attributes, &self.rules, &mut errors);
        check_skills(
            &draft.skills,
            &draft.custom_skills,
            &catalog,
            &self.rules,
            &mut errors,
        );
        errors.into_result().map_err(CharacterServiceError::from)
    }

    /// Validates and stores a new character owned by `created_by`.
    pub fn create_character(
        &mut self,
        draft: &NewCharacter,
        created_by: UserId,
        source: &mut dyn RandomSource,
    ) -> ServiceResult<CharacterId> {
        if let Err(err) = self.validate_draft(draft) {
            if let CharacterServiceError::Validation(errors) = &err {
                info!(
                    "event=character_create module=service status=rejected created_by={} generic_errors={} field_errors={}",
                    created_by,
                    errors.generic.len(),
                    errors.fields.len()
                );
            }
            return Err(err);
        }

        self.repo
            .insert_character(draft, created_by, source)
            .map_err(|err| {
                warn!(
                    "event=character_create module=service status=error created_by={} error={}",
                    created_by, err
                );
                CharacterServiceError::from(err)
            })
    }

    pub fn get_character(
        &self,
        character_id: CharacterId,
        access: Access,
    ) -> ServiceResult<Character> {
        access.require()?;
        self.repo
            .get_character(character_id)?
            .ok_or(CharacterServiceError::NotFound(character_id))
    }

    /// Characters created by `user_id`. Callers only ever list their own.
    pub fn list_owned(&self, user_id: UserId) -> ServiceResult<Vec<Character>> {
        Ok(self.repo.list_characters_owned_by(user_id)?)
    }

    pub fn list_all(&self, access: Access) -> ServiceResult<Vec<Character>> {
        access.require()?;
        Ok(self.repo.list_all_characters()?)
    }

    /// Whether `user_id` created the character. Hosts use this to derive
    /// `Access` for non-GM callers.
    pub fn is_owner(&self, character_id: CharacterId, user_id: UserId) -> ServiceResult<bool> {
        Ok(self.repo.character_owner(character_id)? == user_id)
    }

    pub fn delete_character(&self, character_id: CharacterId, access: Access) -> ServiceResult<()> {
        access.require()?;
        Ok(self.repo.delete_character(character_id)?)
    }

    pub fn list_available_skills(&self) -> ServiceResult<Vec<SkillEntry>> {
        Ok(self.repo.list_available_skills()?)
    }

    /// Base catalog skills the character does not hold yet.
    pub fn addable_skills(
        &self,
        character_id: CharacterId,
        access: Access,
    ) -> ServiceResult<Vec<SkillEntry>> {
        let character = self.get_character(character_id, access)?;
        let available = self.repo.list_available_skills()?;
        Ok(character.addable_skills(&available))
    }

    pub fn add_item(
        &self,
        character_id: CharacterId,
        item: &NewItem,
        access: Access,
    ) -> ServiceResult<ItemId> {
        access.require()?;
        let mut errors = ValidationErrors::new();
        check_item(item, &mut errors);
        errors.into_result()?;
        Ok(self.repo.add_item(character_id, item)?)
    }

    /// Adds one to the item count and returns the stored count.
    pub fn increment_item(
        &self,
        character_id: CharacterId,
        item_id: ItemId,
        access: Access,
    ) -> ServiceResult<i64> {
        self.shift_item_count(character_id, item_id, 1, access)
    }

    /// Removes one from the item count, never going below 1.
    pub fn decrement_item(
        &self,
        character_id: CharacterId,
        item_id: ItemId,
        access: Access,
    ) -> ServiceResult<i64> {
        self.shift_item_count(character_id, item_id, -1, access)
    }

    fn shift_item_count(
        &self,
        character_id: CharacterId,
        item_id: ItemId,
        delta: i64,
        access: Access,
    ) -> ServiceResult<i64> {
        access.require()?;
        let item = self.repo.get_item(character_id, item_id)?;
        Ok(self
            .repo
            .edit_item_count(character_id, item_id, item.count.saturating_add(delta))?)
    }

    pub fn delete_item(
        &self,
        character_id: CharacterId,
        item_id: ItemId,
        access: Access,
    ) -> ServiceResult<()> {
        access.require()?;
        Ok(self.repo.delete_item(character_id, item_id)?)
    }

    pub fn add_note(
        &self,
        character_id: CharacterId,
        text: &str,
        access: Access,
    ) -> ServiceResult<NoteId> {
        access.require()?;
        Ok(self.repo.add_note(character_id, text)?)
    }

    pub fn delete_note(
        &self,
        character_id: CharacterId,
        note_id: NoteId,
        access: Access,
    ) -> ServiceResult<()> {
        access.require()?;
        Ok(self.repo.delete_note(character_id, note_id)?)
    }

    /// Adds a base catalog skill. The creation budget is not re-checked.
    pub fn add_skill(
        &self,
        character_id: CharacterId,
        name: &str,
        value: i64,
        access: Access,
    ) -> ServiceResult<()> {
        access.require()?;
        if self.repo.base_skill_default(name)?.is_none() {
            return Err(CharacterServiceError::UnknownSkill(name.to_string()));
        }
        Ok(self.repo.add_skill(character_id, name, value)?)
    }

    pub fn edit_skill(
        &self,
        character_id: CharacterId,
        name: &str,
        value: i64,
        access: Access,
    ) -> ServiceResult<()> {
        access.require()?;
        Ok(self.repo.edit_skill(character_id, name, value)?)
    }

    pub fn add_custom_skill(
        &mut self,
        character_id: CharacterId,
        name: &str,
        category: SkillCategory,
        value: i64,
        access: Access,
    ) -> ServiceResult<()> {
        access.require()?;
        Ok(self
            .repo
            .add_custom_skill(character_id, name, category, value)?)
    }

    pub fn edit_custom_skill(
        &self,
        character_id: CharacterId,
        name: &str,
        value: i64,
        access: Access,
    ) -> ServiceResult<()> {
        access.require()?;
        Ok(self.repo.edit_custom_skill(character_id, name, value)?)
    }
}
