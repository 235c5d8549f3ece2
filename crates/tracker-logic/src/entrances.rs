// crates/tracker-logic/src/entrances.rs
// ============================================================================
// Module: Entrance Pool Resolver
// Description: Which entrances and exits take part in randomization.
// Purpose: Compute legal entrance/exit pairings under current settings.
// Dependencies: crate::{settings, tables}
// ============================================================================

//! ## Overview
//! Entrances fall into a dungeon pool (dungeon, boss, miniboss) and an island
//! pool (cave, inner cave, fairy fountain). A category participates only when
//! its randomization option is enabled. With the mixing option set to
//! [`options::MIX_DUNGEONS_AND_CAVES_AND_FOUNTAINS`] both pools merge.
//!
//! Every entrance shares its name with the exit it normally leads to, so one
//! table serves both directions. Lists keep dungeon-pool names first, each
//! pool in table order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::error::LogicError;
use crate::error::LogicResult;
use crate::settings::SettingsProvider;
use crate::settings::options;
use crate::tables::EntranceCategory;
use crate::tables::EntranceEntry;
use crate::tables::EntrancePool;
use crate::tables::GameData;

// ============================================================================
// SECTION: Pools
// ============================================================================

/// Borrowed view pairing entrance tables with settings.
#[derive(Clone, Copy)]
pub struct EntrancePools<'a> {
    /// Static tables.
    game_data: &'a GameData,
    /// Current settings snapshot.
    settings: &'a dyn SettingsProvider,
}

impl<'a> EntrancePools<'a> {
    /// Creates a view over the given tables and settings.
    #[must_use]
    pub const fn new(game_data: &'a GameData, settings: &'a dyn SettingsProvider) -> Self {
        Self {
            game_data,
            settings,
        }
    }

    /// Randomized entries in `pool`, in table order.
    pub fn randomized(
        &self,
        pool: EntrancePool,
    ) -> impl Iterator<Item = &'a EntranceEntry> + '_ {
        self.game_data.entrances.iter().filter(move |entrance| {
            entrance.category.pool() == pool
                && self.settings.option_enabled(entrance.category.randomization_option())
        })
    }

    /// Names of randomized entries in `pool`.
    #[must_use]
    pub fn randomized_names(&self, pool: EntrancePool) -> Vec<String> {
        self.randomized(pool).map(|entrance| entrance.internal_name.clone()).collect()
    }

    /// Every randomized entrance, dungeon pool first.
    #[must_use]
    pub fn all_random_entrances(&self) -> Vec<String> {
        let mut names = self.randomized_names(EntrancePool::Dungeon);
        names.extend(self.randomized_names(EntrancePool::Island));
        names
    }

    /// Returns true when any entrance category is randomized.
    #[must_use]
    pub fn is_random_entrances(&self) -> bool {
        EntranceCategory::ALL
            .iter()
            .any(|category| self.settings.option_enabled(category.randomization_option()))
    }

    /// Entrances or exits that may pair with `name`, before exclusions.
    ///
    /// # Errors
    /// Returns [`LogicError::UnknownEntrance`] when `name` is not in the table.
    pub fn possible_entrances_or_exits(&self, name: &str) -> LogicResult<Vec<String>> {
        let entry = self.entry(name)?;
        let mixed = options::MIX_DUNGEONS_AND_CAVES_AND_FOUNTAINS;
        if self.settings.option_is(options::MIX_ENTRANCES, mixed) {
            return Ok(self.all_random_entrances());
        }
        Ok(self.randomized_names(entry.category.pool()))
    }

    /// Randomized entrances nested inside `exit`, in nesting-table order.
    #[must_use]
    pub fn nested_entrances_for_exit(&self, exit: &str) -> Vec<String> {
        let Some(nested) = self.game_data.nested_entrances.get(exit) else {
            return Vec::new();
        };
        let random = self.all_random_entrances();
        nested.iter().filter(|name| random.contains(name)).cloned().collect()
    }

    /// Entrances that may lead into `exit`.
    ///
    /// # Errors
    /// Returns [`LogicError::UnknownEntrance`] when `exit` is not in the table.
    pub fn random_entrances_for_exit(&self, exit: &str) -> LogicResult<Vec<String>> {
        let nested = self.nested_entrances_for_exit(exit);
        let mut possible = self.possible_entrances_or_exits(exit)?;
        possible.retain(|name| !nested.contains(name));
        Ok(possible)
    }

    /// Exits that `entrance` may lead to; never the exit that nests it.
    ///
    /// # Errors
    /// Returns [`LogicError::UnknownEntrance`] when `entrance` is not in the table.
    pub fn random_exits_for_entrance(&self, entrance: &str) -> LogicResult<Vec<String>> {
        let mut possible = self.possible_entrances_or_exits(entrance)?;
        if let Some(parent) = self.game_data.parent_exit(entrance) {
            possible.retain(|name| name != parent);
        }
        Ok(possible)
    }

    // ============================================================================
    // SECTION: Zone Queries
    // ============================================================================

    /// Randomized entrances located on an island, from either pool.
    #[must_use]
    pub fn entrances_for_island(&self, island: &str) -> Vec<String> {
        self.randomized(EntrancePool::Dungeon)
            .chain(self.randomized(EntrancePool::Island))
            .filter(|entrance| entrance.entrance_zone_name == island)
            .map(|entrance| entrance.internal_name.clone())
            .collect()
    }

    /// Randomized island-pool exits leading into an island zone.
    #[must_use]
    pub fn exits_for_island(&self, island: &str) -> Vec<String> {
        self.randomized(EntrancePool::Island)
            .filter(|entrance| entrance.exit_zone_name == island)
            .map(|entrance| entrance.internal_name.clone())
            .collect()
    }

    /// Randomized dungeon-pool entrances located in a zone.
    #[must_use]
    pub fn entrances_for_dungeon(&self, zone: &str) -> Vec<String> {
        self.randomized(EntrancePool::Dungeon)
            .filter(|entrance| entrance.entrance_zone_name == zone)
            .map(|entrance| entrance.internal_name.clone())
            .collect()
    }

    /// Randomized dungeon-pool exits leading into a zone.
    #[must_use]
    pub fn exits_for_dungeon(&self, zone: &str) -> Vec<String> {
        self.randomized(EntrancePool::Dungeon)
            .filter(|entrance| entrance.exit_zone_name == zone)
            .map(|entrance| entrance.internal_name.clone())
            .collect()
    }

    /// Table entry for `name`.
    fn entry(&self, name: &str) -> LogicResult<&'a EntranceEntry> {
        self.game_data.entrance(name).ok_or_else(|| LogicError::UnknownEntrance(name.to_string()))
    }
}
