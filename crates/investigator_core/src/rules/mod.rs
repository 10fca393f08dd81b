//! Character creation rules.
//!
//! # Responsibility
//! - Validate info fields, point-buy attribute distributions and skill budgets.
//! - Derive the resource pools from finalized attributes.
//! - Provide the injected dice capability used by derivation.
//!
//! # Invariants
//! - Validators are pure; they never touch storage.
//! - Derivation draws randomness only through `RandomSource`.

pub mod attributes;
pub mod derive;
pub mod dice;
pub mod info;
pub mod skills;
pub mod validation;
