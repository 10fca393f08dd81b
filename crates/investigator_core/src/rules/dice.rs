//! Injected randomness for dice rolls.
//!
//! # Responsibility
//! - Abstract the entropy source behind `RandomSource`, so derivation can be
//!   driven deterministically in tests.
//! - Parse and roll `NdS` / `NdSkhK` dice expressions.
//!
//! # Invariants
//! - A source returns faces in `1..=sides`.
//! - `keep_highest` never exceeds the number of dice rolled.
//! - An expression rolls at most `MAX_DICE` dice of at most `MAX_SIDES` sides.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiceError {
    /// Expression text is not `NdS` or `NdSkhK`, or exceeds the dice limits.
    InvalidExpression(String),
    /// Source produced a face outside `1..=sides`.
    FaceOutOfRange { face: u32, sides: u32 },
    /// Scripted source ran out of faces.
    Exhausted,
}

impl Display for DiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidExpression(text) => write!(f, "invalid dice expression `{text}`"),
            Self::FaceOutOfRange { face, sides } => {
                write!(f, "die face {face} is outside 1..={sides}")
            }
            Self::Exhausted => write!(f, "random source has no faces left"),
        }
    }
}

impl Error for DiceError {}

/// Supplier of uniformly random die faces.
pub trait RandomSource {
    /// Returns one face in `1..=sides`.
    fn face(&mut self, sides: u32) -> Result<u32, DiceError>;
}

/// Thread-local RNG backed source used in production.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandomSource;

impl RandomSource for ThreadRandomSource {
    fn face(&mut self, sides: u32) -> Result<u32, DiceError> {
        if sides == 0 {
            return Err(DiceError::FaceOutOfRange { face: 0, sides });
        }
        Ok(rand::thread_rng().gen_range(1..=sides))
    }
}

/// Seeded, reproducible source.
#[derive(Debug, Clone)]
pub struct SeededRandomSource {
    rng: StdRng,
}

impl SeededRandomSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandomSource {
    fn face(&mut self, sides: u32) -> Result<u32, DiceError> {
        if sides == 0 {
            return Err(DiceError::FaceOutOfRange { face: 0, sides });
        }
        Ok(self.rng.gen_range(1..=sides))
    }
}

/// Scripted source that replays the given faces in order.
#[derive(Debug, Clone, Default)]
pub struct FixedFaces {
    faces: VecDeque<u32>,
}

impl FixedFaces {
    pub fn new(faces: impl IntoIterator<Item = u32>) -> Self {
        Self {
            faces: faces.into_iter().collect(),
        }
    }
}

impl RandomSource for FixedFaces {
    fn face(&mut self, sides: u32) -> Result<u32, DiceError> {
        let face = self.faces.pop_front().ok_or(DiceError::Exhausted)?;
        if face == 0 || face > sides {
            return Err(DiceError::FaceOutOfRange { face, sides });
        }
        Ok(face)
    }
}

/// Most dice one expression may roll.
pub const MAX_DICE: u32 = 100;
/// Most sides one die may have.
pub const MAX_SIDES: u32 = 1000;

/// Parsed dice expression: roll `count` dice with `sides`, keep the highest
/// `keep_highest`, sum them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiceExpr {
    pub count: u32,
    pub sides: u32,
    pub keep_highest: u32,
}

impl Display for DiceExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}d{}kh{}", self.count, self.sides, self.keep_highest)
    }
}

impl DiceExpr {
    /// Parses `NdS` or `NdSkhK` (case-insensitive), e.g. `3d6kh3`.
    pub fn parse(text: &str) -> Result<Self, DiceError> {
        let invalid = || DiceError::InvalidExpression(text.to_string());
        let normalized = text.trim().to_ascii_lowercase();

        let (count_text, rest) = normalized.split_once('d').ok_or_else(invalid)?;
        let (sides_text, keep_text) = match rest.split_once("kh") {
            Some((sides, keep)) => (sides, Some(keep)),
            None => (rest, None),
        };

        let count: u32 = count_text.parse().map_err(|_| invalid())?;
        let sides: u32 = sides_text.parse().map_err(|_| invalid())?;
        let keep_highest = match keep_text {
            Some(value) => value.parse().map_err(|_| invalid())?,
            None => count,
        };

        let expr = Self {
            count,
            sides,
            keep_highest,
        };
        if !expr.is_within_limits() {
            return Err(invalid());
        }
        Ok(expr)
    }

    fn is_within_limits(&self) -> bool {
        (1..=MAX_DICE).contains(&self.count)
            && (1..=MAX_SIDES).contains(&self.sides)
            && (1..=self.count).contains(&self.keep_highest)
    }

    /// Rolls the expression and returns the kept sum.
    ///
    /// A hand-built expression outside the dice limits is rejected before any
    /// face is drawn.
    pub fn roll(&self, source: &mut dyn RandomSource) -> Result<u32, DiceError> {
        if !self.is_within_limits() {
            return Err(DiceError::InvalidExpression(self.to_string()));
        }

        let mut faces = Vec::with_capacity(self.count as usize);
        for _ in 0..self.count {
            faces.push(source.face(self.sides)?);
        }
        faces.sort_unstable_by(|a, b| b.cmp(a));
        faces
            .iter()
            .take(self.keep_highest as usize)
            .try_fold(0u32, |sum, face| sum.checked_add(*face))
            .ok_or_else(|| DiceError::InvalidExpression(self.to_string()))
    }
}
