// crates/tracker-logic/tests/properties.rs
// ============================================================================
// Test Module: Expression Properties
// Coverage: Simplification idempotence and soundness, implication soundness,
//           and small-key monotonicity over generated trees.
// ============================================================================
//! ## Overview
//! Property-based tests with proptest. Generated trees use a small item
//! vocabulary with counted keys so implication between leaves is common.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::collections::BTreeMap;

use proptest::prelude::*;
use tracker_logic::Expression;
use tracker_logic::ItemRequirement;
use tracker_logic::RequirementImplication;
use tracker_logic::keys::is_available_with_small_keys;

/// Leaf vocabulary for generated trees.
const LEAVES: [&str; 9] = [
    "Nothing",
    "Impossible",
    "Bombs",
    "Deku Leaf",
    "Grappling Hook",
    "DRC Small Key",
    "DRC Small Key x2",
    "DRC Small Key x3",
    "Progressive Sword x2",
];

/// Generated requirement trees up to four levels deep.
fn expression() -> impl Strategy<Value = Expression> {
    let leaf = proptest::sample::select(LEAVES.to_vec()).prop_map(Expression::leaf);
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0 ..= 4).prop_map(Expression::and),
            prop::collection::vec(inner, 0 ..= 4).prop_map(Expression::or),
        ]
    })
}

/// Generated item state: held count per item name.
fn item_state() -> impl Strategy<Value = BTreeMap<String, u32>> {
    (0 ..= 1u32, 0 ..= 1u32, 0 ..= 1u32, 0 ..= 4u32, 0 ..= 4u32).prop_map(
        |(bombs, leaf, hook, keys, swords)| {
            BTreeMap::from([
                ("Bombs".to_string(), bombs),
                ("Deku Leaf".to_string(), leaf),
                ("Grappling Hook".to_string(), hook),
                ("DRC Small Key".to_string(), keys),
                ("Progressive Sword".to_string(), swords),
            ])
        },
    )
}

/// Count-based oracle consistent with the implication rules.
fn holds(state: &BTreeMap<String, u32>, leaf: &str) -> bool {
    let requirement = ItemRequirement::parse_with_default(leaf);
    state.get(requirement.item_name).copied().unwrap_or(0) >= requirement.count_required
}

proptest! {
    #[test]
    fn simplify_is_idempotent(tree in expression()) {
        let once = tree.simplify(&RequirementImplication);
        let twice = once.simplify(&RequirementImplication);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn simplify_preserves_meaning(tree in expression(), state in item_state()) {
        let oracle = |leaf: &str| holds(&state, leaf);
        let simplified = tree.simplify(&RequirementImplication);
        prop_assert_eq!(tree.evaluate(&oracle), simplified.evaluate(&oracle));
    }

    #[test]
    fn simplify_never_grows(tree in expression()) {
        let simplified = tree.simplify(&RequirementImplication);
        prop_assert!(simplified.node_count() <= tree.node_count().max(1));
    }

    #[test]
    fn implication_is_sound(a in expression(), b in expression(), state in item_state()) {
        let oracle = |leaf: &str| holds(&state, leaf);
        if a.implies(&b, &RequirementImplication) && a.evaluate(&oracle) {
            prop_assert!(b.evaluate(&oracle));
        }
    }

    #[test]
    fn implication_is_reflexive(a in expression()) {
        prop_assert!(a.implies(&a, &RequirementImplication));
    }

    #[test]
    fn small_keys_are_monotone(tree in expression(), state in item_state(), keys in 0 ..= 3u32) {
        let non_key = |leaf: &str| holds(&state, leaf);
        if is_available_with_small_keys(&tree, "DRC Small Key", keys, &non_key) {
            prop_assert!(is_available_with_small_keys(&tree, "DRC Small Key", keys + 1, &non_key));
        }
    }
}
