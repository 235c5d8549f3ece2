// crates/tracker-logic/tests/expression.rs
// ============================================================================
// Test Module: Expression Model
// Coverage: Simplification, implication, evaluation, rendering, and JSON shape.
// ============================================================================
//! ## Overview
//! Integration tests for requirement trees and the count-aware implication
//! oracle.

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
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod support;

use std::collections::HashMap;

use support::TestResult;
use support::ensure;
use tracker_logic::Expression;
use tracker_logic::ImplicationOracle;
use tracker_logic::LiteralAtoms;
use tracker_logic::RequirementImplication;
use tracker_logic::build_expression;

/// Builds and simplifies a requirement with literal atoms.
fn simplified(requirement: &str) -> TestResult<Expression> {
    Ok(build_expression(requirement, &LiteralAtoms, false)?.simplify(&RequirementImplication))
}

/// Tests AND keeps the larger count of the same item.
#[test]
fn and_keeps_the_stronger_count() -> TestResult {
    let tree = simplified("DRC Small Key x1 & Grappling Hook & DRC Small Key x3")?;
    ensure(
        tree.to_string() == "Grappling Hook & DRC Small Key x3",
        format!("Unexpected tree: {tree}"),
    )?;
    Ok(())
}

/// Tests OR keeps the smaller count of the same item.
#[test]
fn or_keeps_the_weaker_count() -> TestResult {
    let tree = simplified("Progressive Sword x2 | Progressive Sword x1 | Skull Hammer")?;
    ensure(
        tree.to_string() == "Progressive Sword x1 | Skull Hammer",
        format!("Unexpected tree: {tree}"),
    )?;
    Ok(())
}

/// Tests a bare item counts as one copy.
#[test]
fn bare_item_counts_as_one() -> TestResult {
    let tree = simplified("Progressive Bow & Progressive Bow x2")?;
    ensure(tree.to_string() == "Progressive Bow x2", format!("Unexpected tree: {tree}"))?;
    let tree = simplified("Progressive Bow | Progressive Bow x2")?;
    ensure(tree.to_string() == "Progressive Bow", format!("Unexpected tree: {tree}"))?;
    Ok(())
}

/// Tests absorption across nesting levels.
#[test]
fn absorption_across_levels() -> TestResult {
    let tree = simplified("Deku Leaf & (Deku Leaf | Hookshot)")?;
    ensure(tree == Expression::leaf("Deku Leaf"), format!("Unexpected tree: {tree}"))?;
    let tree = simplified("Deku Leaf | (Deku Leaf & Hookshot)")?;
    ensure(tree == Expression::leaf("Deku Leaf"), format!("Unexpected tree: {tree}"))?;
    Ok(())
}

/// Tests same-connective children are flattened.
#[test]
fn same_connective_children_flatten() -> TestResult {
    let tree = simplified("Bombs & (Hookshot & (Deku Leaf & Bombs))")?;
    ensure(tree.to_string() == "Bombs & Hookshot & Deku Leaf", format!("Unexpected tree: {tree}"))?;
    Ok(())
}

/// Tests terminals act as identity and annihilator.
#[test]
fn terminals_collapse_their_parent() -> TestResult {
    ensure(simplified("Nothing & Bombs")? == Expression::leaf("Bombs"), "Nothing is AND identity")?;
    ensure(simplified("Impossible & Bombs")?.is_impossible(), "Impossible annihilates AND")?;
    ensure(simplified("Nothing | Bombs")?.is_nothing(), "Nothing annihilates OR")?;
    ensure(
        simplified("Impossible | Bombs")? == Expression::leaf("Bombs"),
        "Impossible is OR identity",
    )?;
    ensure(simplified("Nothing & Nothing")?.is_nothing(), "Only identities collapse to Nothing")?;
    ensure(simplified("Impossible | Impossible")?.is_impossible(), "Only identities collapse")?;
    Ok(())
}

/// Tests unrelated operands survive in order.
#[test]
fn unrelated_operands_survive() -> TestResult {
    let tree = simplified("Bombs | (Hookshot & Deku Leaf) | Grappling Hook")?;
    ensure(
        tree.to_string() == "Bombs | (Hookshot & Deku Leaf) | Grappling Hook",
        format!("Unexpected tree: {tree}"),
    )?;
    Ok(())
}

/// Tests structural implication rules.
#[test]
fn implication_rules() -> TestResult {
    let oracle = RequirementImplication;
    let a = Expression::leaf("Bombs");
    let b = Expression::leaf("Hookshot");
    let both = Expression::and(vec![a.clone(), b.clone()]);
    let either = Expression::or(vec![a.clone(), b.clone()]);

    ensure(both.implies(&a, &oracle), "AND implies its operands")?;
    ensure(a.implies(&either, &oracle), "An operand implies its OR")?;
    ensure(both.implies(&either, &oracle), "AND implies OR of the same operands")?;
    ensure(!either.implies(&both, &oracle), "OR does not imply AND")?;
    ensure(!a.implies(&b, &oracle), "Unrelated items do not imply each other")?;
    ensure(Expression::impossible().implies(&a, &oracle), "Impossible implies everything")?;
    ensure(a.implies(&Expression::nothing(), &oracle), "Everything implies Nothing")?;
    Ok(())
}

/// Tests the leaf oracle directly.
#[test]
fn leaf_oracle_compares_counts() -> TestResult {
    let oracle = RequirementImplication;
    ensure(oracle.implies("Triforce Shard x8", "Triforce Shard x3"), "Higher implies lower")?;
    ensure(!oracle.implies("Triforce Shard x3", "Triforce Shard x8"), "Lower does not imply")?;
    ensure(!oracle.implies("Triforce Shard x8", "Triforce Chart x3"), "Names must match")?;
    ensure(!oracle.implies("Nothing", "Bombs"), "Nothing implies nothing else")?;
    ensure(!oracle.implies("Bombs", "Impossible"), "Nothing implies Impossible")?;
    Ok(())
}

/// Tests evaluation against a map of held items.
#[test]
fn evaluates_against_item_state() -> TestResult {
    let tree = simplified("Deku Leaf & (Grappling Hook | Boomerang)")?;
    let mut state = HashMap::new();
    state.insert("Deku Leaf".to_string(), true);
    ensure(!tree.evaluate(&state), "Missing branch items should fail")?;
    state.insert("Boomerang".to_string(), true);
    ensure(tree.evaluate(&state), "One branch item should satisfy the OR")?;
    Ok(())
}

/// Tests rendering of empty connectives.
#[test]
fn empty_connectives_render_as_terminals() -> TestResult {
    ensure(Expression::and(Vec::new()).to_string() == "Nothing", "Empty AND renders Nothing")?;
    ensure(Expression::or(Vec::new()).to_string() == "Impossible", "Empty OR renders Impossible")?;
    Ok(())
}

/// Tests the JSON shape used by tooling.
#[test]
fn serializes_as_tagged_tree() -> TestResult {
    let tree = simplified("Bombs & (Hookshot | Deku Leaf)")?;
    let json = serde_json::to_value(&tree)?;
    let expected = serde_json::json!({
        "and": [
            { "leaf": "Bombs" },
            { "or": [{ "leaf": "Hookshot" }, { "leaf": "Deku Leaf" }] }
        ]
    });
    ensure(json == expected, format!("Unexpected JSON: {json}"))?;
    Ok(())
}
