// crates/tracker-logic/src/settings.rs
// ============================================================================
// Module: Settings Provider
// Description: Read-only view of randomizer options, flags, and starting gear.
// Purpose: Define the collaborator contract the engine consults, plus the
//          starting/impossible item state derived from it.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The engine never decodes settings itself. It reads them through
//! [`SettingsProvider`], which [`Settings`] implements for the common case of
//! a snapshot loaded from a file. Option values are loosely typed, mirroring
//! the tracker's settings format: booleans, integers, text, lists, and
//! string-keyed boolean maps.
//!
//! [`PredeterminedItems`] derives which items the player is guaranteed to
//! start with and which items can never be obtained under the snapshot.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use crate::item::ItemRequirement;

// ============================================================================
// SECTION: Well-Known Names
// ============================================================================

/// Option names the engine reads directly.
pub mod options {
    /// Randomize dungeon entrances.
    pub const RANDOMIZE_DUNGEON_ENTRANCES: &str = "randomize_dungeon_entrances";
    /// Randomize boss entrances.
    pub const RANDOMIZE_BOSS_ENTRANCES: &str = "randomize_boss_entrances";
    /// Randomize miniboss entrances.
    pub const RANDOMIZE_MINIBOSS_ENTRANCES: &str = "randomize_miniboss_entrances";
    /// Randomize secret cave entrances.
    pub const RANDOMIZE_SECRET_CAVE_ENTRANCES: &str = "randomize_secret_cave_entrances";
    /// Randomize inner secret cave entrances.
    pub const RANDOMIZE_SECRET_CAVE_INNER_ENTRANCES: &str =
        "randomize_secret_cave_inner_entrances";
    /// Randomize fairy fountain entrances.
    pub const RANDOMIZE_FAIRY_FOUNTAIN_ENTRANCES: &str = "randomize_fairy_fountain_entrances";
    /// Entrance mixing mode.
    pub const MIX_ENTRANCES: &str = "mix_entrances";
    /// `mix_entrances` value that merges the dungeon and island pools.
    pub const MIX_DUNGEONS_AND_CAVES_AND_FOUNTAINS: &str = "Mix Dungeons & Caves & Fountains";
    /// Sword mode.
    pub const SWORD_MODE: &str = "sword_mode";
    /// `sword_mode` value that grants the Hero's Sword at the start.
    pub const START_WITH_HEROS_SWORD: &str = "Start with Hero's Sword";
    /// `sword_mode` value that removes swords from the item pool.
    pub const SWORDLESS: &str = "Swordless";
    /// Number of Triforce Shards the player starts with.
    pub const NUM_STARTING_TRIFORCE_SHARDS: &str = "num_starting_triforce_shards";
    /// Number of bosses required to finish the seed.
    pub const NUM_REQUIRED_BOSSES: &str = "num_required_bosses";
    /// Shuffle which island each chart leads to.
    pub const RANDOMIZE_CHARTS: &str = "randomize_charts";
    /// Treasure Chart locations may hold progress items.
    pub const PROGRESSION_TREASURE_CHARTS: &str = "progression_treasure_charts";
    /// Triforce Chart locations may hold progress items.
    pub const PROGRESSION_TRIFORCE_CHARTS: &str = "progression_triforce_charts";
}

/// Location type flags the engine reads directly.
pub mod flags {
    /// Dungeon locations.
    pub const DUNGEON: &str = "Dungeon";
    /// Boss locations.
    pub const BOSS: &str = "Boss";
    /// Miniboss rooms that move with miniboss entrance randomization.
    pub const RANDOMIZABLE_MINIBOSS_ROOM: &str = "Randomizable Miniboss Room";

    /// Name of the progression setting that enables `flag`.
    ///
    /// Several flags share one setting (platforms and rafts, for instance).
    /// Flags without a setting of their own return `None`.
    #[must_use]
    pub fn setting_for_flag(flag: &str) -> Option<&'static str> {
        Some(match flag {
            DUNGEON => "Dungeons",
            "Dungeon Secret" => "Dungeon Secrets",
            "Great Fairy" => "Great Fairies",
            "Puzzle Secret Cave" => "Puzzle Secret Caves",
            "Combat Secret Cave" => "Combat Secret Caves",
            "Short Sidequest" => "Short Sidequests",
            "Long Sidequest" => "Long Sidequests",
            "Spoils Trading" => "Spoils Trading",
            "Minigame" => "Minigames",
            "Free Gift" => "Free Gifts",
            "Mail" => "Mail",
            "Platform" | "Raft" => "Lookout Platforms and Rafts",
            "Submarine" => "Submarines",
            "Eye Reef Chest" => "Eye Reef Chests",
            "Big Octo" | "Gunboat" => "Big Octos and Gunboats",
            "Expensive Purchase" => "Expensive Purchases",
            "Other Chest" | "Misc" => "Miscellaneous",
            "Tingle Chest" => "Tingle Chests",
            "Battlesquid" => "Battlesquid Minigame",
            "Savage Labyrinth" => "Savage Labyrinth",
            "Island Puzzle" => "Island Puzzles",
            _ => return None,
        })
    }
}

/// Item names with fixed starting or impossible state.
pub mod items {
    /// Wind Waker.
    pub const WIND_WAKER: &str = "Wind Waker";
    /// Boat's Sail.
    pub const BOATS_SAIL: &str = "Boat's Sail";
    /// Wind's Requiem.
    pub const WINDS_REQUIEM: &str = "Wind's Requiem";
    /// Triforce Shard.
    pub const TRIFORCE_SHARD: &str = "Triforce Shard";
    /// Progressive Sword.
    pub const PROGRESSIVE_SWORD: &str = "Progressive Sword";
    /// Hurricane Spin.
    pub const HURRICANE_SPIN: &str = "Hurricane Spin";
}

// ============================================================================
// SECTION: Option Values
// ============================================================================

/// A single option value as stored in a settings snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// Checkbox option.
    Bool(bool),
    /// Numeric option.
    Integer(i64),
    /// Dropdown option.
    Text(String),
    /// Multi-select option.
    List(BTreeSet<String>),
    /// Per-entry toggles.
    Map(BTreeMap<String, bool>),
}

impl OptionValue {
    /// Returns true when the option counts as enabled.
    ///
    /// Zero and the empty string are disabled; lists and maps are always enabled.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(value) => *value,
            Self::Integer(value) => *value != 0,
            Self::Text(value) => !value.is_empty(),
            Self::List(_) | Self::Map(_) => true,
        }
    }

    /// Returns true when the option equals `expected`.
    ///
    /// Integers compare by their decimal rendering; lists, maps, and booleans
    /// never equal a quoted value.
    #[must_use]
    pub fn is(&self, expected: &str) -> bool {
        match self {
            Self::Text(value) => value == expected,
            Self::Integer(value) => value.to_string() == expected,
            Self::Bool(_) | Self::List(_) | Self::Map(_) => false,
        }
    }

    /// Returns true when the option contains `entry`.
    #[must_use]
    pub fn contains(&self, entry: &str) -> bool {
        match self {
            Self::List(values) => values.contains(entry),
            Self::Map(values) => values.get(entry).copied().unwrap_or(false),
            Self::Bool(_) | Self::Integer(_) | Self::Text(_) => false,
        }
    }

    /// Returns the integer value, if this is a numeric option.
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the text value, if this is a dropdown option.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }
}

// ============================================================================
// SECTION: Provider Contract
// ============================================================================

/// Settings collaborator consulted by the engine.
///
/// Implementations must present a stable view between engine invalidations;
/// the engine caches results derived from it.
pub trait SettingsProvider {
    /// Returns the raw value of an option, if set.
    fn option_value(&self, name: &str) -> Option<&OptionValue>;

    /// Returns true when a location type flag is active.
    fn is_flag_active(&self, flag: &str) -> bool;

    /// Returns true when a location type flag is known to be active for certain.
    fn is_certain_flag_active(&self, flag: &str) -> bool;

    /// Returns the starting gear selected by the player.
    fn starting_gear(&self) -> &BTreeMap<String, u32>;

    /// Returns true when an option is set and truthy.
    fn option_enabled(&self, name: &str) -> bool {
        self.option_value(name).is_some_and(OptionValue::is_truthy)
    }

    /// Returns a numeric option, or zero when unset or non-numeric.
    fn option_integer(&self, name: &str) -> i64 {
        self.option_value(name).and_then(OptionValue::as_integer).unwrap_or(0)
    }

    /// Returns true when a dropdown option equals `expected`.
    fn option_is(&self, name: &str, expected: &str) -> bool {
        self.option_value(name).is_some_and(|value| value.is(expected))
    }
}

// ============================================================================
// SECTION: Settings Snapshot
// ============================================================================

/// Settings snapshot loaded from a file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Active location type flags.
    #[serde(default)]
    pub flags: BTreeSet<String>,
    /// Location type flags known to be active regardless of hidden settings.
    #[serde(default)]
    pub certain_flags: BTreeSet<String>,
    /// Option values keyed by option name.
    #[serde(default)]
    pub options: BTreeMap<String, OptionValue>,
    /// Starting gear counts keyed by item name.
    #[serde(default)]
    pub starting_gear: BTreeMap<String, u32>,
    /// Randomizer version the settings were produced for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl SettingsProvider for Settings {
    fn option_value(&self, name: &str) -> Option<&OptionValue> {
        self.options.get(name)
    }

    fn is_flag_active(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    fn is_certain_flag_active(&self, flag: &str) -> bool {
        self.certain_flags.contains(flag)
    }

    fn starting_gear(&self) -> &BTreeMap<String, u32> {
        &self.starting_gear
    }
}

// ============================================================================
// SECTION: Predetermined Items
// ============================================================================

/// Outcome of checking an item requirement against predetermined state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predetermined {
    /// The player starts with enough copies.
    Satisfied,
    /// The item can never be collected in the required quantity.
    Unsatisfiable,
}

/// Items fixed by the settings snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PredeterminedItems {
    /// Copies of each item held at the start of the seed.
    pub starting: BTreeMap<String, u32>,
    /// Item counts that can never be reached.
    pub impossible: BTreeMap<String, u32>,
}

impl PredeterminedItems {
    /// Derives starting and impossible items from a settings snapshot.
    #[must_use]
    pub fn derive<S>(settings: &S) -> Self
    where
        S: SettingsProvider + ?Sized,
    {
        let shards = settings.option_integer(options::NUM_STARTING_TRIFORCE_SHARDS);
        let mut starting = BTreeMap::from([
            (items::WIND_WAKER.to_string(), 1),
            (items::BOATS_SAIL.to_string(), 1),
            (items::WINDS_REQUIEM.to_string(), 1),
            (items::TRIFORCE_SHARD.to_string(), u32::try_from(shards).unwrap_or(0)),
        ]);
        for (item, count) in settings.starting_gear() {
            starting.insert(item.clone(), *count);
        }

        let mut impossible = BTreeMap::new();
        if settings.option_is(options::SWORD_MODE, options::START_WITH_HEROS_SWORD) {
            let swords = starting.entry(items::PROGRESSIVE_SWORD.to_string()).or_insert(0);
            *swords = swords.saturating_add(1);
        } else if settings.option_is(options::SWORD_MODE, options::SWORDLESS) {
            impossible.insert(items::PROGRESSIVE_SWORD.to_string(), 1);
            impossible.insert(items::HURRICANE_SPIN.to_string(), 1);
        }

        Self {
            starting,
            impossible,
        }
    }

    /// Copies of an item held at the start, zero when absent.
    #[must_use]
    pub fn starting_count(&self, item: &str) -> u32 {
        self.starting.get(item).copied().unwrap_or(0)
    }

    /// Checks a requirement against predetermined state.
    ///
    /// Starting items win over impossible items.
    #[must_use]
    pub fn classify(&self, requirement: &ItemRequirement<'_>) -> Option<Predetermined> {
        if self
            .starting
            .get(requirement.item_name)
            .is_some_and(|held| *held >= requirement.count_required)
        {
            return Some(Predetermined::Satisfied);
        }
        if self
            .impossible
            .get(requirement.item_name)
            .is_some_and(|limit| *limit <= requirement.count_required)
        {
            return Some(Predetermined::Unsatisfiable);
        }
        None
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
