// crates/tracker-logic/src/tables.rs
// ============================================================================
// Module: Static Game Data Tables
// Description: Macros, locations, entrances, dungeons, and item limits.
// Purpose: Provide the immutable data the engine resolves requirements against.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! [`GameData`] is loaded once per process and never mutated. Lookups are
//! by exact name. [`GameData::validate`] checks cross-table references up
//! front so a broken table fails at load time rather than mid-session.
//!
//! Location maps are ordered by name, so "first matching location" queries
//! are deterministic. The chart and island tables are parallel lists: the
//! chart at index `i` is found by default on the island at index `i`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use crate::error::LogicError;
use crate::error::LogicResult;
use crate::settings::options;

// ============================================================================
// SECTION: Locations
// ============================================================================

/// Separator between the general and detailed halves of a location name.
pub const LOCATION_NAME_SEPARATOR: &str = " - ";
/// Separator between location type flags.
pub const LOCATION_TYPE_SEPARATOR: &str = ", ";
/// Prefix joined to an entrance's macro suffix to name its requirement macro.
pub const ENTRANCE_MACRO_PREFIX: &str = "Can Access ";
/// Number of Triforce Charts; the rest of the chart table are Treasure Charts.
pub const NUM_TRIFORCE_CHARTS: usize = 8;

/// One item location within a general location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocationEntry {
    /// Raw requirement string.
    pub need: String,
    /// Comma-separated location type flags; empty for untyped locations.
    #[serde(default)]
    pub types: String,
}

impl LocationEntry {
    /// Iterates the location's type flags.
    pub fn type_flags(&self) -> impl Iterator<Item = &str> {
        self.types.split(LOCATION_TYPE_SEPARATOR).filter(|flag| !flag.is_empty())
    }

    /// Returns true when the location carries `flag`.
    #[must_use]
    pub fn has_type(&self, flag: &str) -> bool {
        self.type_flags().any(|candidate| candidate == flag)
    }
}

/// Field selector for [`LocationDirectory::location_field`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationField {
    /// Raw requirement string.
    Need,
    /// Comma-separated type flags.
    Types,
}

/// Read-only lookup over the location table.
pub trait LocationDirectory {
    /// Detailed locations inside a general location; [`GameData`] yields them
    /// in name order.
    fn detailed_locations_for_general_location(&self, general: &str) -> Vec<&str>;

    /// Returns one field of a location, or `None` when the location is unknown.
    fn location_field(&self, general: &str, detailed: &str, field: LocationField) -> Option<&str>;
}

/// Splits `"General - Detailed"` at the first separator.
///
/// # Errors
/// Returns [`LogicError::MalformedLocationName`] when either half is missing.
pub fn split_location_name(name: &str) -> LogicResult<(&str, &str)> {
    match name.split_once(LOCATION_NAME_SEPARATOR) {
        Some((general, detailed)) if !general.is_empty() && !detailed.is_empty() => {
            Ok((general, detailed))
        }
        _ => Err(LogicError::MalformedLocationName(name.to_string())),
    }
}

// ============================================================================
// SECTION: Entrances
// ============================================================================

/// Entrance category, which selects the randomization option and pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntranceCategory {
    /// Dungeon entrance.
    Dungeon,
    /// Boss room entrance.
    Boss,
    /// Miniboss room entrance.
    Miniboss,
    /// Secret cave entrance.
    Cave,
    /// Entrance nested inside a secret cave.
    InnerCave,
    /// Fairy fountain entrance.
    FairyFountain,
}

/// The two randomization pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntrancePool {
    /// Dungeon, boss, and miniboss entrances.
    Dungeon,
    /// Cave, inner cave, and fairy fountain entrances.
    Island,
}

impl EntranceCategory {
    /// Every category, dungeon pool first.
    pub const ALL: [Self; 6] = [
        Self::Dungeon,
        Self::Boss,
        Self::Miniboss,
        Self::Cave,
        Self::InnerCave,
        Self::FairyFountain,
    ];

    /// Pool the category belongs to.
    #[must_use]
    pub const fn pool(self) -> EntrancePool {
        match self {
            Self::Dungeon | Self::Boss | Self::Miniboss => EntrancePool::Dungeon,
            Self::Cave | Self::InnerCave | Self::FairyFountain => EntrancePool::Island,
        }
    }

    /// Option that enables randomization for the category.
    #[must_use]
    pub const fn randomization_option(self) -> &'static str {
        match self {
            Self::Dungeon => options::RANDOMIZE_DUNGEON_ENTRANCES,
            Self::Boss => options::RANDOMIZE_BOSS_ENTRANCES,
            Self::Miniboss => options::RANDOMIZE_MINIBOSS_ENTRANCES,
            Self::Cave => options::RANDOMIZE_SECRET_CAVE_ENTRANCES,
            Self::InnerCave => options::RANDOMIZE_SECRET_CAVE_INNER_ENTRANCES,
            Self::FairyFountain => options::RANDOMIZE_FAIRY_FOUNTAIN_ENTRANCES,
        }
    }
}

/// One randomizable entrance and the exit it normally leads to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntranceEntry {
    /// Unique name used for both the entrance and its exit.
    pub internal_name: String,
    /// Zone containing the entrance.
    pub entrance_zone_name: String,
    /// Zone the exit leads into.
    pub exit_zone_name: String,
    /// Randomization category.
    pub category: EntranceCategory,
    /// Short display name for the entrance.
    pub entrance_name: String,
    /// Short display name for the exit.
    pub exit_name: String,
    /// Name of the area entered through the exit.
    pub entry_name: String,
    /// Macro suffix; the entrance requirement is `Can Access <suffix>`.
    pub entrance_macro_name: String,
}

impl EntranceEntry {
    /// Name of the macro holding this entrance's requirements.
    #[must_use]
    pub fn macro_name(&self) -> String {
        format!("{ENTRANCE_MACRO_PREFIX}{}", self.entrance_macro_name)
    }
}

// ============================================================================
// SECTION: Dungeons and Bosses
// ============================================================================

/// Dungeon name and its abbreviation used in key names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DungeonEntry {
    /// Full dungeon name (general location name).
    pub name: String,
    /// Abbreviation used for key, map, and compass names.
    pub short_name: String,
}

/// A dungeon whose boss can be marked as not required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequiredBoss {
    /// Dungeon containing the boss.
    pub dungeon_name: String,
    /// Atom that stands for defeating the boss.
    pub requirement: String,
}

// ============================================================================
// SECTION: Charts and Banned Locations
// ============================================================================

/// Kind of sea chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    /// Leads to a sunken treasure.
    Treasure,
    /// Leads to a sunken Triforce Shard.
    Triforce,
}

/// Chart found on an island when charts are not randomized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VanillaChart {
    /// Chart name, e.g. `Treasure Chart 25`.
    pub chart_name: String,
    /// Chart kind, taken from the name.
    pub chart_type: ChartType,
}

/// A location excluded from progression together with its zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BannedLocation {
    /// General location.
    pub general_location: String,
    /// Detailed location.
    pub detailed_location: String,
}

// ============================================================================
// SECTION: Game Data
// ============================================================================

/// Every static table the engine reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GameData {
    /// Macro name to raw requirement string.
    #[serde(default)]
    pub macros: BTreeMap<String, String>,
    /// General location to detailed location entries.
    #[serde(default)]
    pub locations: BTreeMap<String, BTreeMap<String, LocationEntry>>,
    /// Randomizable entrances across both pools.
    #[serde(default)]
    pub entrances: Vec<EntranceEntry>,
    /// Exit name to the entrances reachable only through that exit.
    #[serde(default)]
    pub nested_entrances: BTreeMap<String, Vec<String>>,
    /// Bosses that can be toggled as not required.
    #[serde(default)]
    pub required_bosses: Vec<RequiredBoss>,
    /// Dungeons in canonical order.
    #[serde(default)]
    pub dungeons: Vec<DungeonEntry>,
    /// Dungeons that have no small keys or dungeon items of their own.
    #[serde(default)]
    pub non_main_dungeons: BTreeSet<String>,
    /// Dungeons whose boss location is not typed `Boss`.
    #[serde(default)]
    pub boss_location_overrides: BTreeMap<String, String>,
    /// Maximum obtainable count per item.
    #[serde(default)]
    pub items: BTreeMap<String, u32>,
    /// Maximum obtainable count per dungeon key item.
    #[serde(default)]
    pub keys: BTreeMap<String, u32>,
    /// Chart names, parallel to `islands`.
    #[serde(default)]
    pub charts: Vec<String>,
    /// Island names, parallel to `charts`.
    #[serde(default)]
    pub islands: Vec<String>,
    /// Display-name overrides per item and count.
    #[serde(default)]
    pub pretty_item_names: BTreeMap<String, BTreeMap<u32, String>>,
    /// Locations outside a zone that are banned along with it.
    #[serde(default)]
    pub additional_banned_locations: BTreeMap<String, Vec<BannedLocation>>,
}

impl GameData {
    /// Raw requirement string for a macro.
    #[must_use]
    pub fn macro_requirement(&self, name: &str) -> Option<&str> {
        self.macros.get(name).map(String::as_str)
    }

    /// Location entry for a general/detailed pair.
    #[must_use]
    pub fn location(&self, general: &str, detailed: &str) -> Option<&LocationEntry> {
        self.locations.get(general).and_then(|detailed_map| detailed_map.get(detailed))
    }

    /// Entrance entry by internal name.
    #[must_use]
    pub fn entrance(&self, internal_name: &str) -> Option<&EntranceEntry> {
        self.entrances.iter().find(|entrance| entrance.internal_name == internal_name)
    }

    /// Dungeon entry by name.
    #[must_use]
    pub fn dungeon(&self, name: &str) -> Option<&DungeonEntry> {
        self.dungeons.iter().find(|dungeon| dungeon.name == name)
    }

    /// Required-boss entry for a dungeon.
    #[must_use]
    pub fn required_boss_for_dungeon(&self, dungeon: &str) -> Option<&RequiredBoss> {
        self.required_bosses.iter().find(|boss| boss.dungeon_name == dungeon)
    }

    /// Required-boss entry whose atom equals `requirement`.
    #[must_use]
    pub fn required_boss_for_requirement(&self, requirement: &str) -> Option<&RequiredBoss> {
        self.required_bosses.iter().find(|boss| boss.requirement == requirement)
    }

    /// Island whose vanilla chart is `chart`.
    #[must_use]
    pub fn island_for_chart(&self, chart: &str) -> Option<&str> {
        let index = self.charts.iter().position(|candidate| candidate == chart)?;
        self.islands.get(index).map(String::as_str)
    }

    /// Vanilla chart name for `island`.
    #[must_use]
    pub fn chart_for_island(&self, island: &str) -> Option<&str> {
        let index = self.islands.iter().position(|candidate| candidate == island)?;
        self.charts.get(index).map(String::as_str)
    }

    /// Display-name override for `count` copies of `item`.
    #[must_use]
    pub fn pretty_item_name(&self, item: &str, count: u32) -> Option<&str> {
        self.pretty_item_names.get(item)?.get(&count).map(String::as_str)
    }

    /// Exit that nests `entrance`, if any.
    #[must_use]
    pub fn parent_exit(&self, entrance: &str) -> Option<&str> {
        self.nested_entrances
            .iter()
            .find(|(_, nested)| nested.iter().any(|name| name == entrance))
            .map(|(exit, _)| exit.as_str())
    }

    /// Checks cross-table references and uniqueness.
    ///
    /// # Errors
    /// Returns the first [`LogicError`] describing a duplicate or dangling entry.
    pub fn validate(&self) -> LogicResult {
        let mut entrance_names = BTreeSet::new();
        for entrance in &self.entrances {
            if !entrance_names.insert(entrance.internal_name.as_str()) {
                return Err(LogicError::DuplicateEntry(format!(
                    "entrance {}",
                    entrance.internal_name
                )));
            }
            let macro_name = entrance.macro_name();
            if self.macro_requirement(&macro_name).is_none() {
                return Err(LogicError::UnknownMacro(macro_name));
            }
        }

        let mut dungeon_names = BTreeSet::new();
        for dungeon in &self.dungeons {
            if !dungeon_names.insert(dungeon.name.as_str()) {
                return Err(LogicError::DuplicateEntry(format!("dungeon {}", dungeon.name)));
            }
        }

        for (exit, nested) in &self.nested_entrances {
            if !entrance_names.contains(exit.as_str()) {
                return Err(LogicError::UnknownEntrance(exit.clone()));
            }
            let mut unknown = nested.iter().filter(|name| !entrance_names.contains(name.as_str()));
            if let Some(missing) = unknown.next() {
                return Err(LogicError::UnknownEntrance(missing.clone()));
            }
        }

        let mut boss_requirements = BTreeSet::new();
        for boss in &self.required_bosses {
            if !dungeon_names.contains(boss.dungeon_name.as_str()) {
                return Err(LogicError::UnknownDungeon(boss.dungeon_name.clone()));
            }
            if !boss_requirements.insert(boss.requirement.as_str()) {
                return Err(LogicError::DuplicateEntry(format!(
                    "required boss {}",
                    boss.requirement
                )));
            }
        }

        for dungeon in self.non_main_dungeons.iter().chain(self.boss_location_overrides.keys()) {
            if !dungeon_names.contains(dungeon.as_str()) {
                return Err(LogicError::UnknownDungeon(dungeon.clone()));
            }
        }

        if self.charts.len() != self.islands.len() {
            return Err(LogicError::ChartTableMismatch {
                charts: self.charts.len(),
                islands: self.islands.len(),
            });
        }

        Ok(())
    }
}

impl LocationDirectory for GameData {
    fn detailed_locations_for_general_location(&self, general: &str) -> Vec<&str> {
        self.locations
            .get(general)
            .map(|detailed_map| detailed_map.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    fn location_field(&self, general: &str, detailed: &str, field: LocationField) -> Option<&str> {
        let entry = self.location(general, detailed)?;
        Some(match field {
            LocationField::Need => entry.need.as_str(),
            LocationField::Types => entry.types.as_str(),
        })
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::EntranceCategory;
    use super::EntranceEntry;
    use super::GameData;
    use super::LocationEntry;
    use super::split_location_name;
    use crate::error::LogicError;

    /// Outset cave entrance; the macro table is left to each test.
    fn cave_entrance() -> EntranceEntry {
        EntranceEntry {
            internal_name: "Secret Cave Entrance on Outset Island".to_string(),
            entrance_zone_name: "Outset Island".to_string(),
            exit_zone_name: "Savage Labyrinth".to_string(),
            category: EntranceCategory::Cave,
            entrance_name: "Outset".to_string(),
            exit_name: "Savage Labyrinth".to_string(),
            entry_name: "Savage Labyrinth".to_string(),
            entrance_macro_name: "Secret Cave Entrance on Outset Island".to_string(),
        }
    }

    #[test]
    fn splits_on_first_separator() {
        assert_eq!(
            split_location_name("Dragon Roost Cavern - Big Key Chest"),
            Ok(("Dragon Roost Cavern", "Big Key Chest"))
        );
        assert_eq!(
            split_location_name("Windfall Island - Lenzo's House - Left Chest"),
            Ok(("Windfall Island", "Lenzo's House - Left Chest"))
        );
    }

    #[test]
    fn rejects_names_without_both_halves() {
        assert_eq!(
            split_location_name("Outset Island"),
            Err(LogicError::MalformedLocationName("Outset Island".to_string()))
        );
        assert!(split_location_name(" - Chest").is_err());
    }

    #[test]
    fn untyped_locations_have_no_flags() {
        let entry = LocationEntry {
            need: "Nothing".to_string(),
            types: String::new(),
        };
        assert_eq!(entry.type_flags().count(), 0);
        let boss = LocationEntry {
            need: "Nothing".to_string(),
            types: "Dungeon, Boss".to_string(),
        };
        assert!(boss.has_type("Boss"));
        assert!(!boss.has_type("Dungeon, Boss"));
    }

    #[test]
    fn entrances_without_a_macro_fail_validation() {
        let mut data = GameData {
            entrances: vec![cave_entrance()],
            ..GameData::default()
        };
        assert_eq!(
            data.validate(),
            Err(LogicError::UnknownMacro(
                "Can Access Secret Cave Entrance on Outset Island".to_string()
            ))
        );
        data.macros.insert(
            "Can Access Secret Cave Entrance on Outset Island".to_string(),
            "Power Bracelets".to_string(),
        );
        assert_eq!(data.validate(), Ok(()));
    }

    #[test]
    fn chart_and_island_tables_must_be_parallel() {
        let mut data = GameData {
            charts: vec!["Treasure Chart 1".to_string(), "Triforce Chart 1".to_string()],
            islands: vec!["Outset Island".to_string()],
            ..GameData::default()
        };
        assert_eq!(
            data.validate(),
            Err(LogicError::ChartTableMismatch {
                charts: 2,
                islands: 1,
            })
        );
        data.islands.push("Windfall Island".to_string());
        assert_eq!(data.validate(), Ok(()));
        assert_eq!(data.island_for_chart("Triforce Chart 1"), Some("Windfall Island"));
        assert_eq!(data.chart_for_island("Outset Island"), Some("Treasure Chart 1"));
        assert_eq!(data.island_for_chart("Triforce Chart 2"), None);
    }
}
