// crates/tracker-logic/src/keys.rs
// ============================================================================
// Module: Small-Key Solver
// Description: Minimum dungeon small-key count for a location.
// Purpose: Answer "how many small keys does this chest need" independently
//          of every other item.
// Dependencies: crate::{expression, item}
// ============================================================================

//! ## Overview
//! The solver evaluates a location's non-flattened requirement tree once per
//! candidate key count, from zero up to the dungeon maximum. Small-key leaves
//! for the dungeon hold when the candidate count covers them; every other
//! leaf is judged by the caller's non-key oracle (all true when asking for
//! the plain key count). Because AND/OR trees are monotone in each leaf, the
//! first passing count also passes at every higher count.

use crate::expression::Expression;
use crate::expression::ItemOracle;
use crate::item::ItemRequirement;

/// Returns true when `requirements` hold with `num_small_keys` keys.
#[must_use]
pub fn is_available_with_small_keys<O>(
    requirements: &Expression,
    small_key_name: &str,
    num_small_keys: u32,
    non_key_requirement_met: &O,
) -> bool
where
    O: ItemOracle + ?Sized,
{
    let oracle = |leaf: &str| {
        let requirement = ItemRequirement::parse_with_default(leaf);
        if requirement.item_name == small_key_name {
            num_small_keys >= requirement.count_required
        } else {
            non_key_requirement_met.is_item_true(leaf)
        }
    };
    requirements.evaluate(&oracle)
}

/// Returns the smallest key count in `0 ..= max_small_keys` that satisfies
/// `requirements` when every non-key requirement holds, or `None`.
#[must_use]
pub fn minimum_small_keys(
    requirements: &Expression,
    small_key_name: &str,
    max_small_keys: u32,
) -> Option<u32> {
    let every_item = |_: &str| true;
    (0 ..= max_small_keys).find(|&num_small_keys| {
        is_available_with_small_keys(requirements, small_key_name, num_small_keys, &every_item)
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::is_available_with_small_keys;
    use super::minimum_small_keys;
    use crate::expression::Expression;

    #[test]
    fn picks_the_cheapest_branch() {
        let requirements = Expression::or(vec![
            Expression::leaf("DRC Small Key x2"),
            Expression::and(vec![
                Expression::leaf("DRC Small Key x1"),
                Expression::leaf("Grappling Hook"),
            ]),
        ]);
        assert_eq!(minimum_small_keys(&requirements, "DRC Small Key", 4), Some(1));
    }

    #[test]
    fn other_dungeons_keys_count_as_items() {
        let requirements = Expression::leaf("FW Small Key x1");
        assert_eq!(minimum_small_keys(&requirements, "DRC Small Key", 4), Some(0));
    }

    #[test]
    fn unsatisfiable_within_maximum() {
        let requirements = Expression::leaf("DRC Small Key x5");
        assert_eq!(minimum_small_keys(&requirements, "DRC Small Key", 4), None);
        assert_eq!(minimum_small_keys(&Expression::impossible(), "DRC Small Key", 4), None);
    }

    #[test]
    fn non_key_oracle_is_consulted() {
        let requirements = Expression::and(vec![
            Expression::leaf("DRC Small Key"),
            Expression::leaf("Grappling Hook"),
        ]);
        let no_items = |_: &str| false;
        assert!(!is_available_with_small_keys(&requirements, "DRC Small Key", 4, &no_items));
        let hook = |leaf: &str| leaf == "Grappling Hook";
        assert!(is_available_with_small_keys(&requirements, "DRC Small Key", 1, &hook));
    }
}
