//! Accumulator for validation failures.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Field-keyed and generic validation messages collected across checks.
///
/// Checks never short-circuit each other; callers inspect `is_valid()` once
/// all of them ran.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    pub generic: Vec<String>,
    pub fields: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.generic.is_empty() && self.fields.is_empty()
    }

    pub fn add_generic(&mut self, message: impl Into<String>) {
        self.generic.push(message.into());
    }

    /// Records a field error. The first message for a key wins.
    pub fn add_field(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(key.into())
            .or_insert_with(|| message.into());
    }

    pub fn check_field(&mut self, ok: bool, key: impl Into<String>, message: impl Into<String>) {
        if !ok {
            self.add_field(key, message);
        }
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Converts into `Err(self)` when any message was recorded.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "validation failed: {} generic, {} field error(s)",
            self.generic.len(),
            self.fields.len()
        )
    }
}

impl Error for ValidationErrors {}
