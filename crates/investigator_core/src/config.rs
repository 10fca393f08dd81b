//! Engine configuration and creation rule parameters.
//!
//! # Responsibility
//! - Describe where the store lives and how logging is set up.
//! - Carry the point-buy and skill-budget parameters used by validators.
//!
//! # Invariants
//! - Every field has a default, so a partial JSON document is valid.
//! - Defaults reproduce the standard investigator creation rules.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const DEFAULT_ATTRIBUTE_POOL: [i64; 8] = [40, 50, 50, 50, 60, 60, 70, 80];
const DEFAULT_PERMITTED_ATTRIBUTE_VALUES: [i64; 5] = [40, 50, 60, 70, 80];
const DEFAULT_PERMITTED_SKILL_VALUES: [i64; 4] = [40, 50, 60, 70];
const DEFAULT_MAX_MODIFIED_SKILLS: usize = 9;
const DEFAULT_WEALTH_SKILL: &str = "Finanzkraft";
const DEFAULT_DATABASE_FILE: &str = "investigators.sqlite3";

/// Parameters of the character creation rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreationRules {
    /// Multiset that the eight pool attributes must consume exactly.
    pub attribute_pool: Vec<i64>,
    /// Values any single pool attribute may take.
    pub permitted_attribute_values: Vec<i64>,
    /// Values a skill may take when it differs from its default.
    pub permitted_skill_values: Vec<i64>,
    /// Upper bound of skills (base + custom) changed from their default.
    pub max_modified_skills: usize,
    /// Base skill that stands in for wealth; it may never be 0.
    pub wealth_skill: String,
}

impl Default for CreationRules {
    fn default() -> Self {
        Self {
            attribute_pool: DEFAULT_ATTRIBUTE_POOL.to_vec(),
            permitted_attribute_values: DEFAULT_PERMITTED_ATTRIBUTE_VALUES.to_vec(),
            permitted_skill_values: DEFAULT_PERMITTED_SKILL_VALUES.to_vec(),
            max_modified_skills: DEFAULT_MAX_MODIFIED_SKILLS,
            wealth_skill: DEFAULT_WEALTH_SKILL.to_string(),
        }
    }
}

/// Top-level configuration for hosts embedding the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub database_path: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling log files. `None` disables file logging.
    pub log_dir: Option<PathBuf>,
    pub rules: CreationRules,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_FILE),
            log_level: crate::logging::default_log_level().to_string(),
            log_dir: None,
            rules: CreationRules::default(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
        }
    }
}

impl EngineConfig {
    /// Parses a JSON document. Missing fields fall back to defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(ConfigError::Parse)
    }

    /// Reads and parses a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }
}
