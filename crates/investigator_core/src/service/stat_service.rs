//! Stat mutation service.
//!
//! # Invariants
//! - Increment and decrement move `current` by exactly one.
//! - Neither floor nor ceiling is enforced: `current` may drop below 0 or
//!   exceed `max`.
//! - Each call reads the block and writes the pool back. Two concurrent
//!   calls on the same pool can lose an update.

use crate::model::character::CharacterId;
use crate::model::stat::{StatBlock, StatKind};
use crate::repo::character_repo::CharacterRepository;
use crate::service::character_service::{Access, ServiceResult};
use log::debug;

/// Stat service facade over repository implementations.
pub struct StatService<R: CharacterRepository> {
    repo: R,
}

impl<R: CharacterRepository> StatService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn stats(&self, character_id: CharacterId, access: Access) -> ServiceResult<StatBlock> {
        access.require()?;
        Ok(self.repo.load_stats(character_id)?)
    }

    /// Adds one to the pool's current value and returns the new value.
    pub fn increment(
        &self,
        character_id: CharacterId,
        kind: StatKind,
        access: Access,
    ) -> ServiceResult<i64> {
        self.shift(character_id, kind, 1, access)
    }

    /// Subtracts one from the pool's current value and returns the new value.
    pub fn decrement(
        &self,
        character_id: CharacterId,
        kind: StatKind,
        access: Access,
    ) -> ServiceResult<i64> {
        self.shift(character_id, kind, -1, access)
    }

    fn shift(
        &self,
        character_id: CharacterId,
        kind: StatKind,
        delta: i64,
        access: Access,
    ) -> ServiceResult<i64> {
        access.require()?;
        let mut stats = self.repo.load_stats(character_id)?;
        let pool = stats.pool_mut(kind);
        pool.current += delta;
        self.repo
            .write_stat_current(character_id, kind, pool.current)?;
        debug!(
            "event=stat_shift module=service status=ok character_id={} stat={} delta={} current={} max={}",
            character_id,
            kind.as_str(),
            delta,
            pool.current,
            pool.max
        );
        Ok(pool.current)
    }
}
