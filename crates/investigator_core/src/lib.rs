//! Character aggregate engine for investigator sheets.
//! This crate is the single source of truth for creation rules and
//! persistence invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod rules;
pub mod service;

pub use config::{ConfigError, CreationRules, EngineConfig};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::character::{
    AttributeSet, Character, CharacterId, Info, Item, ItemId, NewCharacter, NewItem, Note, NoteId,
    UserId,
};
pub use model::skill::{CustomSkillEntry, SkillCategory, SkillEntry};
pub use model::stat::{StatBlock, StatKind, StatPool};
pub use repo::catalog_repo::{
    CustomSkillDefinition, SkillCatalogRepository, SqliteSkillCatalogRepository,
};
pub use repo::character_repo::{CharacterRepository, SqliteCharacterRepository};
pub use repo::{RepoError, RepoResult};
pub use rules::dice::{
    DiceError, DiceExpr, FixedFaces, RandomSource, SeededRandomSource, ThreadRandomSource,
};
pub use rules::validation::ValidationErrors;
pub use service::character_service::{
    Access, CharacterService, CharacterServiceError, Role, ServiceResult,
};
pub use service::stat_service::StatService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
