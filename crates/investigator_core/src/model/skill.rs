//! Skill records: base catalog skills and categorised custom skills.
//!
//! # Invariants
//! - Every custom skill belongs to exactly one `SkillCategory`.
//! - A category's default value is fixed and shared by every custom skill
//!   registered under it.

use serde::{Deserialize, Serialize};

/// Closed set of categories a custom skill may be registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SkillCategory {
    #[serde(rename = "Muttersprache")]
    NativeLanguage,
    #[serde(rename = "Fremdsprache")]
    ForeignLanguage,
    #[serde(rename = "Handwerk")]
    Craft,
    #[serde(rename = "Naturwissenschaft")]
    Science,
    #[serde(rename = "Steuern")]
    Pilot,
    #[serde(rename = "Überlebenskunst")]
    Survival,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 6] = [
        Self::NativeLanguage,
        Self::ForeignLanguage,
        Self::Craft,
        Self::Science,
        Self::Pilot,
        Self::Survival,
    ];

    /// Stable category label as shown on the sheet and persisted in storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NativeLanguage => "Muttersprache",
            Self::ForeignLanguage => "Fremdsprache",
            Self::Craft => "Handwerk",
            Self::Science => "Naturwissenschaft",
            Self::Pilot => "Steuern",
            Self::Survival => "Überlebenskunst",
        }
    }

    /// Parses a submitted category label. Unknown labels yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == value.trim())
    }

    /// Default value of any custom skill registered under this category.
    pub fn default_value(self) -> i64 {
        match self {
            Self::NativeLanguage => 50,
            Self::ForeignLanguage => 1,
            Self::Craft => 5,
            Self::Science => 1,
            Self::Pilot => 1,
            Self::Survival => 10,
        }
    }
}

/// Looks up the default value for a raw category label.
///
/// Returns `None` for labels outside the fixed category set; validators use
/// that to reject the category.
pub fn default_for_category(label: &str) -> Option<i64> {
    SkillCategory::parse(label).map(SkillCategory::default_value)
}

/// A base catalog skill held by a character (or offered by the catalog).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillEntry {
    pub name: String,
    pub value: i64,
}

impl SkillEntry {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// A user-defined skill, scoped to a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomSkillEntry {
    pub category: SkillCategory,
    pub name: String,
    pub value: i64,
}

impl CustomSkillEntry {
    pub fn new(category: SkillCategory, name: impl Into<String>, value: i64) -> Self {
        Self {
            category,
            name: name.into(),
            value,
        }
    }
}
