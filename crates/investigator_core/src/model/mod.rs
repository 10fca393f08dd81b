//! Character aggregate domain model.
//!
//! # Responsibility
//! - Define the character aggregate root and every record it owns.
//! - Keep the closed enumerations (stat kinds, custom skill categories)
//!   next to the data they describe.
//!
//! # Invariants
//! - A `Character` always carries exactly one info, attribute and stat record.
//! - Stat maxima are fixed at creation; only current values change.
//! - Item counts are never below 1.

pub mod character;
pub mod skill;
pub mod stat;
