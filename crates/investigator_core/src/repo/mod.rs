//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for the character
//!   aggregate and the skill catalogs.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Character creation is a single all-or-nothing transaction.
//! - Repository APIs return semantic errors (`CharacterNotFound`,
//!   `AlreadyHasSkill`, ...) in addition to DB transport errors.

pub mod catalog_repo;
pub mod character_repo;
mod error;
mod schema;

pub use error::{RepoError, RepoResult};
