// crates/tracker-logic/src/expression.rs
// ============================================================================
// Module: Boolean Expression Model
// Description: AND/OR trees over item-requirement leaves.
// Purpose: Evaluate requirements against live item state and normalize them
//          with implication-driven absorption.
// Dependencies: serde::{Deserialize, Serialize}, smallvec::SmallVec
// ============================================================================

//! ## Overview
//! An [`Expression`] is the resolved form of a requirement string. Leaves are
//! plain item requirements (`"Bombs x2"`, `"Deku Leaf"`) or one of the two
//! terminals, [`NOTHING`] (always satisfied) and [`IMPOSSIBLE`] (never
//! satisfied).
//!
//! Two operations run over the tree:
//! - [`Expression::evaluate`] asks an [`ItemOracle`] about each leaf and
//!   short-circuits AND on the first failure and OR on the first success.
//! - [`Expression::simplify`] rewrites the tree with an [`ImplicationOracle`]:
//!   nested same-connective nodes are flattened, terminals are folded, and
//!   operands absorbed by a sibling are dropped. The result is a fixed point:
//!   simplifying it again returns an equal tree.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt;
use std::hash::BuildHasher;

use serde::Deserialize;
use serde::Serialize;
use smallvec::SmallVec;

// ============================================================================
// SECTION: Terminals
// ============================================================================

/// Leaf text for a requirement that always holds.
pub const NOTHING: &str = "Nothing";
/// Leaf text for a requirement that can never hold.
pub const IMPOSSIBLE: &str = "Impossible";

/// Children storage for AND/OR nodes.
pub type Operands = SmallVec<[Box<Expression>; 4]>;

// ============================================================================
// SECTION: Expression Definition
// ============================================================================

/// Requirement tree with item-requirement leaves.
///
/// # Invariants
/// - Trees are immutable once built; [`Expression::simplify`] returns a new tree.
/// - An empty AND holds; an empty OR does not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expression {
    /// Every operand must hold.
    And(Operands),
    /// At least one operand must hold.
    Or(Operands),
    /// Item requirement text or a terminal.
    Leaf(String),
}

/// The two connectives, used when a helper needs to reason about either.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Connective {
    /// Conjunction.
    And,
    /// Disjunction.
    Or,
}

impl Connective {
    /// Terminal that is the identity of this connective.
    const fn identity(self) -> &'static str {
        match self {
            Self::And => NOTHING,
            Self::Or => IMPOSSIBLE,
        }
    }

    /// Terminal that dominates this connective.
    const fn annihilator(self) -> &'static str {
        match self {
            Self::And => IMPOSSIBLE,
            Self::Or => NOTHING,
        }
    }
}

impl Expression {
    /// Builds an AND node.
    #[must_use]
    pub fn and(operands: Vec<Self>) -> Self {
        Self::And(operands.into_iter().map(Box::new).collect())
    }

    /// Builds an OR node.
    #[must_use]
    pub fn or(operands: Vec<Self>) -> Self {
        Self::Or(operands.into_iter().map(Box::new).collect())
    }

    /// Builds a leaf from requirement text.
    #[must_use]
    pub fn leaf(text: impl Into<String>) -> Self {
        Self::Leaf(text.into())
    }

    /// The always-satisfied terminal.
    #[must_use]
    pub fn nothing() -> Self {
        Self::leaf(NOTHING)
    }

    /// The never-satisfied terminal.
    #[must_use]
    pub fn impossible() -> Self {
        Self::leaf(IMPOSSIBLE)
    }

    /// Returns true when this is the [`NOTHING`] leaf.
    #[must_use]
    pub fn is_nothing(&self) -> bool {
        matches!(self, Self::Leaf(text) if text == NOTHING)
    }

    /// Returns true when this is the [`IMPOSSIBLE`] leaf.
    #[must_use]
    pub fn is_impossible(&self) -> bool {
        matches!(self, Self::Leaf(text) if text == IMPOSSIBLE)
    }

    /// Number of nodes in the tree, leaves included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::And(operands) | Self::Or(operands) => {
                1 + operands.iter().map(|operand| operand.node_count()).sum::<usize>()
            }
        }
    }

    /// Visits every non-terminal leaf, left to right.
    pub fn for_each_item(&self, visit: &mut impl FnMut(&str)) {
        match self {
            Self::Leaf(text) => {
                if text != NOTHING && text != IMPOSSIBLE {
                    visit(text);
                }
            }
            Self::And(operands) | Self::Or(operands) => {
                for operand in operands {
                    operand.for_each_item(visit);
                }
            }
        }
    }

    // ============================================================================
    // SECTION: Evaluation
    // ============================================================================

    /// Evaluates the tree against current item state.
    ///
    /// [`NOTHING`] holds and [`IMPOSSIBLE`] fails without consulting the oracle.
    #[must_use]
    pub fn evaluate<O>(&self, oracle: &O) -> bool
    where
        O: ItemOracle + ?Sized,
    {
        match self {
            Self::Leaf(text) => match text.as_str() {
                NOTHING => true,
                IMPOSSIBLE => false,
                item => oracle.is_item_true(item),
            },
            Self::And(operands) => operands.iter().all(|operand| operand.evaluate(oracle)),
            Self::Or(operands) => operands.iter().any(|operand| operand.evaluate(oracle)),
        }
    }

    // ============================================================================
    // SECTION: Simplification
    // ============================================================================

    /// Returns a normalized copy of the tree.
    ///
    /// Within an AND, an operand implied by a sibling is dropped (the stronger
    /// one stays); within an OR, an operand that implies a sibling is dropped
    /// (the weaker one stays). Empty results collapse to the connective's
    /// identity terminal and single operands replace their parent.
    #[must_use]
    pub fn simplify<I>(&self, oracle: &I) -> Self
    where
        I: ImplicationOracle + ?Sized,
    {
        match self {
            Self::Leaf(text) => Self::Leaf(text.clone()),
            Self::And(operands) => simplify_node(Connective::And, operands, oracle),
            Self::Or(operands) => simplify_node(Connective::Or, operands, oracle),
        }
    }

    /// Returns true when `self` holding guarantees `other` holds.
    ///
    /// Sound but not complete: leaf pairs defer to the oracle and compound
    /// trees are decomposed structurally.
    #[must_use]
    pub fn implies<I>(&self, other: &Self, oracle: &I) -> bool
    where
        I: ImplicationOracle + ?Sized,
    {
        if self == other || self.is_impossible() || other.is_nothing() {
            return true;
        }
        match (self, other) {
            (_, Self::And(targets)) => targets.iter().all(|target| self.implies(target, oracle)),
            (Self::Or(sources), _) => sources.iter().all(|source| source.implies(other, oracle)),
            (Self::Leaf(a), Self::Leaf(b)) => oracle.implies(a, b),
            (Self::And(sources), Self::Or(targets)) => {
                sources.iter().any(|source| source.implies(other, oracle))
                    || targets.iter().any(|target| self.implies(target, oracle))
            }
            (Self::And(sources), Self::Leaf(_)) => {
                sources.iter().any(|source| source.implies(other, oracle))
            }
            (Self::Leaf(_), Self::Or(targets)) => {
                targets.iter().any(|target| self.implies(target, oracle))
            }
        }
    }
}

/// Simplifies one AND/OR node.
fn simplify_node<I>(connective: Connective, operands: &Operands, oracle: &I) -> Expression
where
    I: ImplicationOracle + ?Sized,
{
    let mut flattened: Vec<Expression> = Vec::with_capacity(operands.len());
    for operand in operands {
        match (connective, operand.simplify(oracle)) {
            (Connective::And, Expression::And(nested))
            | (Connective::Or, Expression::Or(nested)) => {
                flattened.extend(nested.into_iter().map(|boxed| *boxed));
            }
            (_, Expression::Leaf(text)) if text == connective.identity() => {}
            (_, Expression::Leaf(text)) if text == connective.annihilator() => {
                return Expression::leaf(connective.annihilator());
            }
            (_, simplified) => flattened.push(simplified),
        }
    }

    let mut kept: Vec<Expression> = Vec::with_capacity(flattened.len());
    for candidate in flattened {
        if kept.iter().any(|existing| absorbs(connective, existing, &candidate, oracle)) {
            continue;
        }
        kept.retain(|existing| !absorbs(connective, &candidate, existing, oracle));
        kept.push(candidate);
    }

    match kept.len() {
        0 => Expression::leaf(connective.identity()),
        1 => kept.pop().unwrap_or_else(|| Expression::leaf(connective.identity())),
        _ => match connective {
            Connective::And => Expression::and(kept),
            Connective::Or => Expression::or(kept),
        },
    }
}

/// Returns true when `keeper` makes `dropped` redundant under `connective`.
fn absorbs<I>(connective: Connective, keeper: &Expression, dropped: &Expression, oracle: &I) -> bool
where
    I: ImplicationOracle + ?Sized,
{
    match connective {
        Connective::And => keeper.implies(dropped, oracle),
        Connective::Or => dropped.implies(keeper, oracle),
    }
}

// ============================================================================
// SECTION: Display
// ============================================================================

impl fmt::Display for Expression {
    /// Renders the tree back into requirement syntax.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (operands, separator, empty) = match self {
            Self::Leaf(text) => return f.write_str(text),
            Self::And(operands) => (operands, " & ", NOTHING),
            Self::Or(operands) => (operands, " | ", IMPOSSIBLE),
        };
        if operands.is_empty() {
            return f.write_str(empty);
        }
        for (index, operand) in operands.iter().enumerate() {
            if index > 0 {
                f.write_str(separator)?;
            }
            match operand.as_ref() {
                Self::Leaf(text) => f.write_str(text)?,
                nested => write!(f, "({nested})")?,
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Oracles
// ============================================================================

/// Answers whether a plain item-requirement leaf currently holds.
pub trait ItemOracle {
    /// Returns true when the item requirement text is satisfied.
    fn is_item_true(&self, requirement: &str) -> bool;
}

impl<F> ItemOracle for F
where
    F: Fn(&str) -> bool,
{
    fn is_item_true(&self, requirement: &str) -> bool {
        (self)(requirement)
    }
}

impl<S: BuildHasher> ItemOracle for HashMap<String, bool, S> {
    fn is_item_true(&self, requirement: &str) -> bool {
        self.get(requirement).copied().unwrap_or(false)
    }
}

impl ItemOracle for BTreeMap<String, bool> {
    fn is_item_true(&self, requirement: &str) -> bool {
        self.get(requirement).copied().unwrap_or(false)
    }
}

/// Decides whether one leaf requirement implies another.
pub trait ImplicationOracle {
    /// Returns true when `a` holding guarantees `b` holds.
    fn implies(&self, a: &str, b: &str) -> bool;
}

impl<F> ImplicationOracle for F
where
    F: Fn(&str, &str) -> bool,
{
    fn implies(&self, a: &str, b: &str) -> bool {
        (self)(a, b)
    }
}
