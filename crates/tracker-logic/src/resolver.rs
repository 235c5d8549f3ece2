// crates/tracker-logic/src/resolver.rs
// ============================================================================
// Module: Atom Resolver
// Description: Classifies requirement atoms in fixed priority order.
// Purpose: Decide whether an atom is a macro, a settings conditional, a
//          location reference, a predetermined item, a boss, or a plain item.
// Dependencies: crate::{settings, tables, item}
// ============================================================================

//! ## Overview
//! [`classify_atom`] runs an ordered list of matchers over one atom and
//! returns the first [`AtomMatch`]. Matchers only classify; expanding a
//! macro or a location reference into a sub-tree is left to the caller,
//! which owns the caches.
//!
//! Priority order:
//! 1. macro name (exact table key)
//! 2. `Option "<name>" Enabled | Disabled | Is "<v>" | Is Not "<v>" |
//!    Contains "<v>" | Does Not Contain "<v>"`
//! 3. `Can Access Item Location "<loc>"`, and in flattened mode
//!    `Has Accessed Other Location "<loc>"`
//! 4. starting or impossible item
//! 5. required-boss atom
//! 6. anything else is a plain item requirement

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use crate::error::LogicResult;
use crate::item::ItemRequirement;
use crate::settings::Predetermined;
use crate::settings::PredeterminedItems;
use crate::settings::SettingsProvider;
use crate::tables::GameData;
use crate::tables::split_location_name;

// ============================================================================
// SECTION: Atom Patterns
// ============================================================================

/// Prefix shared by every settings conditional.
const OPTION_PREFIX: &str = "Option ";
/// Location reference recognized in every mode.
const CAN_ACCESS_ITEM_LOCATION: &str = "Can Access Item Location ";
/// Location reference recognized only in flattened mode.
const HAS_ACCESSED_OTHER_LOCATION: &str = "Has Accessed Other Location ";

// ============================================================================
// SECTION: Match Results
// ============================================================================

/// How a required-boss atom resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossResolution<'a> {
    /// The boss is marked not required, so the atom always holds.
    NotRequired,
    /// Flattened mode: replace the atom with the boss location's requirements.
    Substitute {
        /// Dungeon whose boss location supplies the requirements.
        dungeon: &'a str,
    },
    /// Non-flattened mode: keep the atom as an opaque leaf.
    Opaque,
}

/// Classification of one atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtomMatch<'a> {
    /// Macro reference; carries the macro's raw requirement string.
    Macro(&'a str),
    /// Settings conditional and whether it currently holds.
    Conditional(bool),
    /// Reference to another location's requirements.
    OtherLocation {
        /// General location.
        general: &'a str,
        /// Detailed location.
        detailed: &'a str,
    },
    /// Item whose outcome is fixed by starting or impossible items.
    PredeterminedItem(Predetermined),
    /// Required-boss atom.
    Boss(BossResolution<'a>),
    /// Plain item requirement left for evaluation.
    PlainItem,
}

// ============================================================================
// SECTION: Resolution Context
// ============================================================================

/// State an atom is classified against.
pub struct ResolutionContext<'a> {
    /// Static tables.
    pub game_data: &'a GameData,
    /// Current settings snapshot.
    pub settings: &'a dyn SettingsProvider,
    /// Starting and impossible items derived from the settings.
    pub predetermined: &'a PredeterminedItems,
    /// Dungeons whose boss is currently marked not required.
    pub non_required_boss_dungeons: &'a BTreeSet<String>,
    /// Whether location and boss references expand into full sub-trees.
    pub flattened: bool,
}

/// Signature shared by every matcher.
type Matcher =
    for<'a> fn(&ResolutionContext<'a>, &'a str) -> LogicResult<Option<AtomMatch<'a>>>;

/// Matchers in priority order.
const MATCHERS: [Matcher; 5] = [
    match_macro,
    match_conditional,
    match_other_location,
    match_predetermined_item,
    match_boss,
];

/// Classifies one atom; the first matching rule wins.
///
/// # Errors
/// Returns [`crate::LogicError::MalformedLocationName`] when a location
/// reference does not name a `"General - Detailed"` location.
pub fn classify_atom<'a>(
    context: &ResolutionContext<'a>,
    atom: &'a str,
) -> LogicResult<AtomMatch<'a>> {
    for matcher in MATCHERS {
        if let Some(matched) = matcher(context, atom)? {
            return Ok(matched);
        }
    }
    Ok(AtomMatch::PlainItem)
}

// ============================================================================
// SECTION: Matchers
// ============================================================================

/// Rule 1: exact macro name.
fn match_macro<'a>(
    context: &ResolutionContext<'a>,
    atom: &'a str,
) -> LogicResult<Option<AtomMatch<'a>>> {
    Ok(context.game_data.macro_requirement(atom).map(AtomMatch::Macro))
}

/// Rule 2: settings conditional.
fn match_conditional<'a>(
    context: &ResolutionContext<'a>,
    atom: &'a str,
) -> LogicResult<Option<AtomMatch<'a>>> {
    Ok(parse_conditional(atom).map(|condition| {
        AtomMatch::Conditional(condition.holds(context.settings))
    }))
}

/// Rule 3: reference to another location.
fn match_other_location<'a>(
    context: &ResolutionContext<'a>,
    atom: &'a str,
) -> LogicResult<Option<AtomMatch<'a>>> {
    let reference = atom
        .strip_prefix(CAN_ACCESS_ITEM_LOCATION)
        .and_then(quoted)
        .or_else(|| {
            if context.flattened {
                atom.strip_prefix(HAS_ACCESSED_OTHER_LOCATION).and_then(quoted)
            } else {
                None
            }
        });
    let Some(location) = reference else {
        return Ok(None);
    };
    let (general, detailed) = split_location_name(location)?;
    Ok(Some(AtomMatch::OtherLocation {
        general,
        detailed,
    }))
}

/// Rule 4: starting or impossible item.
fn match_predetermined_item<'a>(
    context: &ResolutionContext<'a>,
    atom: &'a str,
) -> LogicResult<Option<AtomMatch<'a>>> {
    let requirement = ItemRequirement::parse_with_default(atom);
    Ok(context.predetermined.classify(&requirement).map(AtomMatch::PredeterminedItem))
}

/// Rule 5: required-boss atom.
fn match_boss<'a>(
    context: &ResolutionContext<'a>,
    atom: &'a str,
) -> LogicResult<Option<AtomMatch<'a>>> {
    let Some(boss) = context.game_data.required_boss_for_requirement(atom) else {
        return Ok(None);
    };
    let dungeon = boss.dungeon_name.as_str();
    let resolution = if context.non_required_boss_dungeons.contains(dungeon) {
        BossResolution::NotRequired
    } else if context.flattened {
        BossResolution::Substitute {
            dungeon,
        }
    } else {
        BossResolution::Opaque
    };
    Ok(Some(AtomMatch::Boss(resolution)))
}

// ============================================================================
// SECTION: Settings Conditionals
// ============================================================================

/// Comparison a settings conditional performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comparison<'a> {
    /// Option is truthy.
    Enabled,
    /// Option is unset or falsy.
    Disabled,
    /// Option equals the value.
    Is(&'a str),
    /// Option does not equal the value.
    IsNot(&'a str),
    /// Option contains the value.
    Contains(&'a str),
    /// Option does not contain the value.
    DoesNotContain(&'a str),
}

/// Parsed `Option "<name>" ...` atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Conditional<'a> {
    /// Option name.
    option: &'a str,
    /// Comparison against the option's value.
    comparison: Comparison<'a>,
}

impl Conditional<'_> {
    /// Evaluates the conditional against current settings.
    fn holds(&self, settings: &dyn SettingsProvider) -> bool {
        let value = settings.option_value(self.option);
        match self.comparison {
            Comparison::Enabled => value.is_some_and(|value| value.is_truthy()),
            Comparison::Disabled => !value.is_some_and(|value| value.is_truthy()),
            Comparison::Is(expected) => value.is_some_and(|value| value.is(expected)),
            Comparison::IsNot(expected) => !value.is_some_and(|value| value.is(expected)),
            Comparison::Contains(entry) => value.is_some_and(|value| value.contains(entry)),
            Comparison::DoesNotContain(entry) => {
                !value.is_some_and(|value| value.contains(entry))
            }
        }
    }
}

/// Parses one of the six conditional forms, or returns `None`.
fn parse_conditional(atom: &str) -> Option<Conditional<'_>> {
    let rest = atom.strip_prefix(OPTION_PREFIX)?.strip_prefix('"')?;
    let (option, tail) = rest.split_once('"')?;
    if option.is_empty() {
        return None;
    }
    let comparison = match tail {
        " Enabled" => Comparison::Enabled,
        " Disabled" => Comparison::Disabled,
        _ => {
            if let Some(value) = tail.strip_prefix(" Is ").and_then(quoted) {
                Comparison::Is(value)
            } else if let Some(value) = tail.strip_prefix(" Is Not ").and_then(quoted) {
                Comparison::IsNot(value)
            } else if let Some(value) = tail.strip_prefix(" Contains ").and_then(quoted) {
                Comparison::Contains(value)
            } else {
                let value = tail.strip_prefix(" Does Not Contain ").and_then(quoted)?;
                Comparison::DoesNotContain(value)
            }
        }
    };
    Some(Conditional {
        option,
        comparison,
    })
}

/// Returns the text between a leading and trailing `"`, if it is non-empty
/// and contains no other quote.
fn quoted(text: &str) -> Option<&str> {
    let inner = text.strip_prefix('"')?.strip_suffix('"')?;
    if inner.is_empty() || inner.contains('"') { None } else { Some(inner) }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
