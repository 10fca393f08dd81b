//! Derived resource pools (TP, STA, MP, LUCK).

use serde::{Deserialize, Serialize};

/// Closed set of mutable resource pools on a character sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatKind {
    /// Hit points ("Trefferpunkte").
    Tp,
    /// Sanity ("Stabilität").
    Sta,
    /// Magic points.
    Mp,
    /// Luck.
    Luck,
}

impl StatKind {
    /// All kinds in sheet display order.
    pub const ALL: [StatKind; 4] = [Self::Tp, Self::Sta, Self::Mp, Self::Luck];

    /// Stable short name used by request handlers and templates.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tp => "TP",
            Self::Sta => "STA",
            Self::Mp => "MP",
            Self::Luck => "LUCK",
        }
    }

    /// Parses a submitted stat name. Unknown names yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "TP" => Some(Self::Tp),
            "STA" => Some(Self::Sta),
            "MP" => Some(Self::Mp),
            "LUCK" => Some(Self::Luck),
            _ => None,
        }
    }

    /// Column holding the current value in `character_stats`.
    pub(crate) fn current_column(self) -> &'static str {
        match self {
            Self::Tp => "tp",
            Self::Sta => "sta",
            Self::Mp => "mp",
            Self::Luck => "luck",
        }
    }
}

/// One resource pool. `max` is fixed at creation, `current` moves freely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatPool {
    pub max: i64,
    pub current: i64,
}

impl StatPool {
    /// Fresh pool with `current == max`.
    pub fn full(max: i64) -> Self {
        Self { max, current: max }
    }
}

/// The four derived pools of one character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBlock {
    pub tp: StatPool,
    pub sta: StatPool,
    pub mp: StatPool,
    pub luck: StatPool,
}

impl StatBlock {
    pub fn pool(&self, kind: StatKind) -> StatPool {
        match kind {
            StatKind::Tp => self.tp,
            StatKind::Sta => self.sta,
            StatKind::Mp => self.mp,
            StatKind::Luck => self.luck,
        }
    }

    pub fn pool_mut(&mut self, kind: StatKind) -> &mut StatPool {
        match kind {
            StatKind::Tp => &mut self.tp,
            StatKind::Sta => &mut self.sta,
            StatKind::Mp => &mut self.mp,
            StatKind::Luck => &mut self.luck,
        }
    }

    /// Current values keyed by stable stat name, in sheet order.
    pub fn current_values(&self) -> Vec<(&'static str, i64)> {
        StatKind::ALL
            .iter()
            .map(|kind| (kind.as_str(), self.pool(*kind).current))
            .collect()
    }
}
