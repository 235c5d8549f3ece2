// crates/tracker-logic/src/token.rs
// ============================================================================
// Module: Requirement Tokenizer
// Description: Splits requirement strings into atoms and structural tokens.
// Purpose: Produce an immutable, position-tagged token list for the builder.
// Dependencies: none
// ============================================================================

//! ## Overview
//! Requirement strings use four structural characters: `&`, `|`, `(` and `)`.
//! Everything between them is an atom, trimmed of surrounding whitespace;
//! empty atoms are dropped. There is no escaping, so atom text can never
//! contain a structural character.
//!
//! ```
//! use tracker_logic::token::Token;
//! use tracker_logic::token::tokenize;
//!
//! let tokens: Vec<Token<'_>> =
//!     tokenize("Grappling Hook & (Deku Leaf | Hookshot)").into_iter().map(|t| t.token).collect();
//! assert_eq!(tokens[0], Token::Atom("Grappling Hook"));
//! assert_eq!(tokens[1], Token::And);
//! assert_eq!(tokens.len(), 7);
//! ```

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

// ============================================================================
// SECTION: Token Types
// ============================================================================

/// A single requirement token borrowed from the source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token<'a> {
    /// `&` connective.
    And,
    /// `|` connective.
    Or,
    /// `(` opening a nested scope.
    Open,
    /// `)` closing a nested scope.
    Close,
    /// Trimmed, non-empty text between structural characters.
    Atom(&'a str),
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => f.write_str("&"),
            Self::Or => f.write_str("|"),
            Self::Open => f.write_str("("),
            Self::Close => f.write_str(")"),
            Self::Atom(text) => f.write_str(text),
        }
    }
}

/// Token paired with its byte offset in the requirement string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpannedToken<'a> {
    /// Token value.
    pub token: Token<'a>,
    /// Byte offset of the token's first character.
    pub position: usize,
}

// ============================================================================
// SECTION: Tokenizer
// ============================================================================

/// Splits a requirement string into tokens.
///
/// Structural characters are single ASCII bytes, so slicing at their offsets
/// always lands on character boundaries.
#[must_use]
pub fn tokenize(input: &str) -> Vec<SpannedToken<'_>> {
    let mut tokens = Vec::new();
    let mut atom_start = 0;

    for (offset, byte) in input.bytes().enumerate() {
        let structural = match byte {
            b'&' => Token::And,
            b'|' => Token::Or,
            b'(' => Token::Open,
            b')' => Token::Close,
            _ => continue,
        };
        push_atom(input, atom_start, offset, &mut tokens);
        tokens.push(SpannedToken {
            token: structural,
            position: offset,
        });
        atom_start = offset + 1;
    }
    push_atom(input, atom_start, input.len(), &mut tokens);

    tokens
}

/// Pushes the trimmed atom in `input[start .. end]`, if it is non-empty.
fn push_atom<'a>(input: &'a str, start: usize, end: usize, tokens: &mut Vec<SpannedToken<'a>>) {
    let Some(raw) = input.get(start .. end) else {
        return;
    };
    let trimmed_front = raw.trim_start();
    let text = trimmed_front.trim_end();
    if text.is_empty() {
        return;
    }
    tokens.push(SpannedToken {
        token: Token::Atom(text),
        position: start + (raw.len() - trimmed_front.len()),
    });
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::use_debug,
        reason = "Test-only assertions are permitted."
    )]

    use super::SpannedToken;
    use super::Token;
    use super::tokenize;

    #[test]
    fn atom_positions_skip_leading_whitespace() {
        let tokens = tokenize("  Bombs x2 |Deku Leaf");
        assert_eq!(
            tokens,
            vec![
                SpannedToken {
                    token: Token::Atom("Bombs x2"),
                    position: 2,
                },
                SpannedToken {
                    token: Token::Or,
                    position: 11,
                },
                SpannedToken {
                    token: Token::Atom("Deku Leaf"),
                    position: 12,
                },
            ]
        );
    }

    #[test]
    fn whitespace_only_input_yields_no_tokens() {
        assert!(tokenize(" \t ").is_empty());
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn adjacent_structural_characters_produce_no_empty_atoms() {
        let tokens: Vec<_> = tokenize("((A))").into_iter().map(|t| t.token).collect();
        assert_eq!(
            tokens,
            vec![Token::Open, Token::Open, Token::Atom("A"), Token::Close, Token::Close]
        );
    }

    #[test]
    fn multibyte_atoms_are_preserved() {
        let tokens = tokenize("Hyoi Pear & Ébène");
        assert_eq!(tokens[2].token, Token::Atom("Ébène"));
        assert_eq!(tokens[2].position, 12);
    }
}
