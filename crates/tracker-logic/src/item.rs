// crates/tracker-logic/src/item.rs
// ============================================================================
// Module: Item Requirements
// Description: Parsing of `<item> x<count>` requirement atoms.
// Purpose: Give atoms a structured item name and required count.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Item atoms are either `"<name> x<digits>"` (an explicit count) or a bare
//! item name, which counts as one copy of the item.

use std::fmt;

use serde::Serialize;

// ============================================================================
// SECTION: Item Requirement
// ============================================================================

/// A requirement on holding at least `count_required` copies of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ItemRequirement<'a> {
    /// Item name without the count suffix.
    pub item_name: &'a str,
    /// Minimum number of copies required.
    pub count_required: u32,
}

impl<'a> ItemRequirement<'a> {
    /// Parses an explicit `"<name> x<digits>"` requirement.
    ///
    /// Returns `None` when the text has no count suffix, the name is empty,
    /// or the count does not fit in a `u32`.
    #[must_use]
    pub fn parse(text: &'a str) -> Option<Self> {
        let (name, digits) = text.rsplit_once(" x")?;
        if name.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let count_required = digits.parse().ok()?;
        Some(Self {
            item_name: name,
            count_required,
        })
    }

    /// Parses a requirement, treating a bare item name as one copy.
    #[must_use]
    pub fn parse_with_default(text: &'a str) -> Self {
        Self::parse(text).unwrap_or(Self {
            item_name: text,
            count_required: 1,
        })
    }
}

impl fmt::Display for ItemRequirement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x{}", self.item_name, self.count_required)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::ItemRequirement;

    #[test]
    fn parses_count_suffix() {
        let parsed = ItemRequirement::parse("Progressive Sword x3");
        assert_eq!(
            parsed,
            Some(ItemRequirement {
                item_name: "Progressive Sword",
                count_required: 3,
            })
        );
    }

    #[test]
    fn rejects_text_without_digits() {
        assert_eq!(ItemRequirement::parse("Boss Key x"), None);
        assert_eq!(ItemRequirement::parse(" x2"), None);
        assert_eq!(ItemRequirement::parse("Hookshot"), None);
        assert_eq!(ItemRequirement::parse("Bombs x1a"), None);
    }

    #[test]
    fn bare_item_counts_as_one() {
        let parsed = ItemRequirement::parse_with_default("Deku Leaf");
        assert_eq!(parsed.item_name, "Deku Leaf");
        assert_eq!(parsed.count_required, 1);
    }
}
