//! Point-buy attribute distribution checks.
//!
//! # Invariants
//! - The eight pool attributes must equal the configured pool as a multiset.
//! - Validation is order-independent.

use crate::config::CreationRules;
use crate::model::character::AttributeSet;
use crate::rules::validation::ValidationErrors;

pub const INVALID_DISTRIBUTION_MESSAGE: &str = "invalid attribute distribution";
pub const INVALID_ATTRIBUTE_VALUE_MESSAGE: &str = "attribute value is not permitted";

/// Returns whether `values` consumes `pool` exactly once, as a bag.
///
/// Each value removes one matching occurrence from a working copy of the
/// pool. A value without a remaining occurrence, or any leftover in the pool,
/// makes the distribution invalid.
pub fn is_valid_distribution(values: &[i64], pool: &[i64]) -> bool {
    let mut remaining = pool.to_vec();
    for value in values {
        match remaining.iter().position(|candidate| candidate == value) {
            Some(index) => {
                remaining.swap_remove(index);
            }
            None => return false,
        }
    }
    remaining.is_empty()
}

/// Runs every attribute check and records failures into `errors`.
///
/// Adds one field error per attribute outside the permitted value set and
/// one generic error when the distribution does not match the pool.
pub fn check_attributes(
    attributes: &AttributeSet,
    rules: &CreationRules,
    errors: &mut ValidationErrors,
) {
    let pool_values = attributes.pool_values();
    for (key, value) in pool_values {
        errors.check_field(
            rules.permitted_attribute_values.contains(&value),
            key,
            INVALID_ATTRIBUTE_VALUE_MESSAGE,
        );
    }

    let values: Vec<i64> = pool_values.iter().map(|(_, value)| *value).collect();
    if !is_valid_distribution(&values, &rules.attribute_pool) {
        errors.add_generic(INVALID_DISTRIBUTION_MESSAGE);
    }
}
