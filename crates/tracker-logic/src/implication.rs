// crates/tracker-logic/src/implication.rs
// ============================================================================
// Module: Requirement Implication
// Description: Implication oracle over item-count requirement leaves.
// Purpose: Drive absorption during simplification.
// Dependencies: crate::{expression, item}
// ============================================================================

//! ## Overview
//! `a` implies `b` when the strings are equal, when `a` is [`IMPOSSIBLE`],
//! when `b` is [`NOTHING`], or when both name the same item and `a` needs at
//! least as many copies as `b`. A bare item name needs one copy.

use crate::expression::IMPOSSIBLE;
use crate::expression::ImplicationOracle;
use crate::expression::NOTHING;
use crate::item::ItemRequirement;

/// Item-count implication used for every requirement tree the engine builds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequirementImplication;

impl ImplicationOracle for RequirementImplication {
    fn implies(&self, a: &str, b: &str) -> bool {
        if a == b || a == IMPOSSIBLE || b == NOTHING {
            return true;
        }
        if a == NOTHING || b == IMPOSSIBLE {
            return false;
        }
        let stronger = ItemRequirement::parse_with_default(a);
        let weaker = ItemRequirement::parse_with_default(b);
        stronger.item_name == weaker.item_name && stronger.count_required >= weaker.count_required
    }
}
