//! Skill budget checks for character creation.
//!
//! # Invariants
//! - A skill at its catalog (or category) default never counts as modified.
//! - At most `max_modified_skills` skills may differ from their default.
//! - A modified skill must take one of the permitted non-default values.
//! - The wealth skill may never be 0, even when 0 is its default.

use crate::config::CreationRules;
use crate::model::skill::{CustomSkillEntry, SkillEntry};
use crate::rules::validation::ValidationErrors;
use std::collections::BTreeMap;

pub const TOO_MANY_MODIFIED_MESSAGE: &str = "too many skills changed from their default";
pub const INVALID_SKILL_VALUE_MESSAGE: &str = "skill value is not permitted";
pub const UNKNOWN_SKILL_MESSAGE: &str = "unknown skill";
pub const ZERO_WEALTH_MESSAGE: &str = "wealth rating must not be 0";

/// Lookup of base skill name to default value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillCatalog {
    defaults: BTreeMap<String, i64>,
}

impl SkillCatalog {
    pub fn from_entries(entries: &[SkillEntry]) -> Self {
        Self {
            defaults: entries
                .iter()
                .map(|entry| (entry.name.clone(), entry.value))
                .collect(),
        }
    }

    pub fn default_of(&self, name: &str) -> Option<i64> {
        self.defaults.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.defaults.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defaults.is_empty()
    }
}

struct Budget<'a> {
    rules: &'a CreationRules,
    modified: usize,
    exhausted: bool,
}

impl Budget<'_> {
    /// Counts one non-default value and checks it, until the budget is spent.
    fn spend(&mut self, key: &str, value: i64, errors: &mut ValidationErrors) {
        if self.exhausted {
            return;
        }
        self.modified += 1;
        if self.modified > self.rules.max_modified_skills {
            errors.add_generic(TOO_MANY_MODIFIED_MESSAGE);
            self.exhausted = true;
            return;
        }
        errors.check_field(
            self.rules.permitted_skill_values.contains(&value),
            key,
            INVALID_SKILL_VALUE_MESSAGE,
        );
    }
}

/// Runs the skill budget checks over base and custom skills.
///
/// Base skills and custom skills share one modification budget. Field errors
/// are keyed by skill name.
pub fn check_skills(
    skills: &[SkillEntry],
    custom_skills: &[CustomSkillEntry],
    catalog: &SkillCatalog,
    rules: &CreationRules,
    errors: &mut ValidationErrors,
) {
    let mut budget = Budget {
        rules,
        modified: 0,
        exhausted: false,
    };

    for skill in skills {
        let Some(default) = catalog.default_of(&skill.name) else {
            errors.add_field(skill.name.as_str(), UNKNOWN_SKILL_MESSAGE);
            continue;
        };

        if skill.name == rules.wealth_skill && skill.value == 0 {
            errors.add_field(skill.name.as_str(), ZERO_WEALTH_MESSAGE);
        }

        if skill.value != default {
            budget.spend(&skill.name, skill.value, errors);
        }
    }

    for skill in custom_skills {
        if skill.value != skill.category.default_value() {
            budget.spend(&skill.name, skill.value, errors);
        }
    }
}
