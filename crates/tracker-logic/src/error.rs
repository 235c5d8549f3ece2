// crates/tracker-logic/src/error.rs
// ============================================================================
// Module: Logic Error Definitions
// Description: Data-integrity diagnostics for the requirement engine.
// Purpose: Fail fast with the offending table entry or requirement text.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Every error the engine raises indicates corrupt or inconsistent static data:
//! a malformed requirement string, a dangling table reference, or a location
//! whose key requirement can never be met. None of them are retried and none
//! of them are cached; the caller sees the first failure as-is.

use thiserror::Error;

/// Errors raised while resolving, building, or solving requirements.
///
/// # Invariants
/// - Variants carry enough text to locate the bad table entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogicError {
    // ============================================================================
    // SECTION: Requirement Syntax Errors
    // ============================================================================
    /// A `(` was never closed, or a `)` had no matching `(`.
    #[error("unbalanced parentheses at {position} in requirement `{requirement}`")]
    UnbalancedParentheses {
        /// Requirement text being built.
        requirement: String,
        /// Byte offset of the offending token (or input length when unclosed).
        position: usize,
    },

    /// Both `&` and `|` appeared in the same parenthesis scope.
    #[error("mixed `&` and `|` at {position} in requirement `{requirement}`")]
    MixedConnectives {
        /// Requirement text being built.
        requirement: String,
        /// Byte offset of the connective that conflicts with the first one.
        position: usize,
    },

    /// An operand directly followed another operand with no connective.
    #[error("missing connective before {position} in requirement `{requirement}`")]
    MissingConnective {
        /// Requirement text being built.
        requirement: String,
        /// Byte offset of the second operand.
        position: usize,
    },

    /// Parenthesis nesting exceeded the supported depth.
    #[error("requirement nesting exceeds {max_depth} levels in `{requirement}`")]
    NestingTooDeep {
        /// Requirement text being built.
        requirement: String,
        /// Maximum supported nesting depth.
        max_depth: usize,
    },

    // ============================================================================
    // SECTION: Table Lookup Errors
    // ============================================================================
    /// A location reference did not match any location table entry.
    #[error("unknown location: {general} - {detailed}")]
    UnknownLocation {
        /// General location (island, dungeon, or zone).
        general: String,
        /// Detailed location within the general location.
        detailed: String,
    },

    /// A location name could not be split into general and detailed parts.
    #[error("malformed location name: {0}")]
    MalformedLocationName(String),

    /// An entrance or exit name did not match any entrance table entry.
    #[error("unknown entrance: {0}")]
    UnknownEntrance(String),

    /// A macro name did not match the macro table.
    #[error("unknown macro: {0}")]
    UnknownMacro(String),

    /// An island name did not match the island table.
    #[error("unknown island: {0}")]
    UnknownIsland(String),

    /// The chart and island tables are not parallel.
    #[error("chart table has {charts} entries but island table has {islands}")]
    ChartTableMismatch {
        /// Number of charts.
        charts: usize,
        /// Number of islands.
        islands: usize,
    },

    /// A dungeon name did not match the dungeon table.
    #[error("unknown dungeon: {0}")]
    UnknownDungeon(String),

    /// No boss location could be found for a dungeon.
    #[error("no boss location for dungeon: {0}")]
    UnknownBossLocation(String),

    /// No required-boss entry exists for a dungeon.
    #[error("no required boss for dungeon: {0}")]
    UnknownRequiredBoss(String),

    /// Two table entries share a name that must be unique.
    #[error("duplicate table entry: {0}")]
    DuplicateEntry(String),

    // ============================================================================
    // SECTION: Solver Errors
    // ============================================================================
    /// No small-key count up to the dungeon maximum satisfies the location.
    #[error("could not determine keys required for location: {general} - {detailed}")]
    SmallKeysUnsatisfiable {
        /// Dungeon name.
        general: String,
        /// Detailed location within the dungeon.
        detailed: String,
    },
}

// ============================================================================
// SECTION: Result Alias
// ============================================================================

/// Convenient Result type for logic engine operations.
pub type LogicResult<T = ()> = Result<T, LogicError>;
