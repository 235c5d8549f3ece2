// crates/tracker-logic/src/builder.rs
// ============================================================================
// Module: Expression Builder
// Description: Recursive-descent builder over the token list.
// Purpose: Turn a requirement string into an unsimplified expression tree,
//          delegating each atom to an expander.
// Dependencies: crate::{expression, token}
// ============================================================================

//! ## Overview
//! Grammar: `expr := term (connective term)*`, `term := atom | "(" expr ")"`,
//! with exactly one connective type per parenthesis scope.
//!
//! The builder walks an immutable token list with a cursor index. Each scope
//! collects operands and records its connective; on `)` or end of input it
//! becomes an OR node if `|` was seen, otherwise an AND node. A scope with a
//! single operand and no connective is a degenerate AND.
//!
//! Malformed input fails fast:
//! - `&` and `|` in the same scope
//! - unmatched `(` or `)`
//! - an operand directly after another operand with no connective between
//! - nesting deeper than [`MAX_NESTING`]

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::error::LogicError;
use crate::error::LogicResult;
use crate::expression::Expression;
use crate::token::SpannedToken;
use crate::token::Token;
use crate::token::tokenize;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum parenthesis nesting depth within one requirement string.
pub const MAX_NESTING: usize = 32;

// ============================================================================
// SECTION: Atom Expansion
// ============================================================================

/// Expands one atom into an expression operand.
pub trait AtomExpander {
    /// Returns the operand for `atom`.
    ///
    /// # Errors
    /// Returns a [`LogicError`] when the atom references missing data.
    fn expand_atom(&self, atom: &str, flattened: bool) -> LogicResult<Expression>;
}

impl<F> AtomExpander for F
where
    F: Fn(&str, bool) -> LogicResult<Expression>,
{
    fn expand_atom(&self, atom: &str, flattened: bool) -> LogicResult<Expression> {
        (self)(atom, flattened)
    }
}

/// Expander that keeps every atom as a leaf.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralAtoms;

impl AtomExpander for LiteralAtoms {
    fn expand_atom(&self, atom: &str, _flattened: bool) -> LogicResult<Expression> {
        Ok(Expression::leaf(atom))
    }
}

// ============================================================================
// SECTION: Public API
// ============================================================================

/// Builds the unsimplified tree for a requirement string.
///
/// # Errors
/// Returns [`LogicError`] for malformed requirement syntax, or whatever the
/// expander returns for an atom.
pub fn build_expression<E>(
    requirement: &str,
    expander: &E,
    flattened: bool,
) -> LogicResult<Expression>
where
    E: AtomExpander + ?Sized,
{
    let mut builder = Builder {
        requirement,
        tokens: tokenize(requirement),
        index: 0,
        nesting: 0,
        expander,
        flattened,
    };
    builder.build_scope(false)
}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Cursor over the token list of one requirement string.
struct Builder<'input, 'expander, E: ?Sized> {
    /// Requirement text, for diagnostics.
    requirement: &'input str,
    /// Tokens of the requirement text.
    tokens: Vec<SpannedToken<'input>>,
    /// Index of the next unread token.
    index: usize,
    /// Current parenthesis depth.
    nesting: usize,
    /// Atom expander.
    expander: &'expander E,
    /// Expansion mode forwarded to the expander.
    flattened: bool,
}

impl<E> Builder<'_, '_, E>
where
    E: AtomExpander + ?Sized,
{
    /// Builds one scope; `nested` scopes must end at a matching `)`.
    fn build_scope(&mut self, nested: bool) -> LogicResult<Expression> {
        let mut operands = Vec::new();
        let mut connective: Option<Token<'_>> = None;
        let mut after_operand = false;

        while let Some(SpannedToken {
            token,
            position,
        }) = self.tokens.get(self.index).copied()
        {
            self.index += 1;
            match token {
                Token::And | Token::Or => match connective {
                    Some(seen) if seen != token => {
                        return Err(LogicError::MixedConnectives {
                            requirement: self.requirement.to_string(),
                            position,
                        });
                    }
                    _ => {
                        connective = Some(token);
                        after_operand = false;
                    }
                },
                Token::Open => {
                    self.expect_connective(after_operand, position)?;
                    after_operand = true;
                    let child = self.with_nesting(|builder| builder.build_scope(true))?;
                    operands.push(child);
                }
                Token::Close => {
                    if !nested {
                        return Err(self.unbalanced(position));
                    }
                    return Ok(Self::finish(operands, connective));
                }
                Token::Atom(atom) => {
                    self.expect_connective(after_operand, position)?;
                    after_operand = true;
                    operands.push(self.expander.expand_atom(atom, self.flattened)?);
                }
            }
        }

        if nested {
            return Err(self.unbalanced(self.requirement.len()));
        }
        Ok(Self::finish(operands, connective))
    }

    /// Combines a scope's operands under its connective.
    fn finish(operands: Vec<Expression>, connective: Option<Token<'_>>) -> Expression {
        match connective {
            Some(Token::Or) => Expression::or(operands),
            _ => Expression::and(operands),
        }
    }

    /// Rejects an operand at `position` that directly follows another one.
    fn expect_connective(&self, after_operand: bool, position: usize) -> LogicResult {
        if after_operand {
            return Err(LogicError::MissingConnective {
                requirement: self.requirement.to_string(),
                position,
            });
        }
        Ok(())
    }

    /// Runs a builder step one level deeper, enforcing the nesting limit.
    fn with_nesting<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> LogicResult<T>,
    ) -> LogicResult<T> {
        let next_depth = self.nesting + 1;
        if next_depth > MAX_NESTING {
            return Err(LogicError::NestingTooDeep {
                requirement: self.requirement.to_string(),
                max_depth: MAX_NESTING,
            });
        }
        self.nesting = next_depth;
        let result = f(self);
        self.nesting = self.nesting.saturating_sub(1);
        result
    }

    /// Unbalanced-parenthesis error at `position`.
    fn unbalanced(&self, position: usize) -> LogicError {
        LogicError::UnbalancedParentheses {
            requirement: self.requirement.to_string(),
            position,
        }
    }
}
