//! Derived resource pools computed once at creation.

use crate::model::character::AttributeSet;
use crate::model::stat::{StatBlock, StatPool};
use crate::rules::dice::{DiceExpr, RandomSource};
use log::warn;

/// Dice rolled for luck.
const LUCK_ROLL: &str = "3d6kh3";
/// Luck is the kept dice sum scaled by this factor.
const LUCK_MULTIPLIER: i64 = 5;

/// Computes the four pools from finalized attributes and one luck roll.
///
/// - `TP = (KO + GR) / 10`
/// - `STA = MA`
/// - `MP = MA / 5`
/// - `LUCK = 5 * 3d6kh3`
///
/// Every pool starts full. When the random source fails, the whole block
/// falls back to zeros and a warning is logged; the character is still
/// created.
pub fn derive_stats(attributes: &AttributeSet, source: &mut dyn RandomSource) -> StatBlock {
    let luck_roll = match DiceExpr::parse(LUCK_ROLL).and_then(|expr| expr.roll(source)) {
        Ok(sum) => i64::from(sum),
        Err(err) => {
            warn!(
                "event=derive_stats module=rules status=error error_code=random_source_failed error={}",
                err
            );
            return StatBlock::default();
        }
    };

    StatBlock {
        tp: StatPool::full((attributes.ko + attributes.gr) / 10),
        sta: StatPool::full(attributes.ma),
        mp: StatPool::full(attributes.ma / 5),
        luck: StatPool::full(luck_roll * LUCK_MULTIPLIER),
    }
}
