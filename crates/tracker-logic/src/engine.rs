// crates/tracker-logic/src/engine.rs
// ============================================================================
// Module: Logic Engine
// Description: Session context owning settings, tables, and caches.
// Purpose: Expose memoized requirement retrieval, key solving, boss toggles,
//          entrance pool queries, and chart and display-name lookups to the
//          tracker session.
// Dependencies: crate::{audit, builder, entrances, expression, keys, memo,
//               resolver, settings, tables}
// ============================================================================

//! ## Overview
//! [`LogicEngine`] is the explicit context object behind every query. It
//! owns the settings snapshot, the derived starting/impossible items, the set
//! of dungeons whose boss is marked not required, and one cache per entry
//! point.
//!
//! Every mutation is followed by an invalidation before it returns:
//! - [`LogicEngine::update_settings`] and [`LogicEngine::reset`] drop every
//!   cache.
//! - [`LogicEngine::set_boss_required`] and
//!   [`LogicEngine::set_boss_not_required`] drop only boss-dependent caches.
//!
//! The engine is single-threaded. Failed queries are reported to the audit
//! sink as `data_integrity_error` events and returned to the caller.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cell::Cell;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::audit::AuditSink;
use crate::audit::LogicAuditEvent;
use crate::audit::NoopAuditSink;
use crate::builder::AtomExpander;
use crate::builder::build_expression;
use crate::entrances::EntrancePools;
use crate::error::LogicError;
use crate::error::LogicResult;
use crate::expression::Expression;
use crate::expression::ItemOracle;
use crate::implication::RequirementImplication;
use crate::item::ItemRequirement;
use crate::keys;
use crate::memo::InvalidationScope;
use crate::memo::LocationKey;
use crate::memo::MemoCache;
use crate::memo::NameQuery;
use crate::memo::PoolQuery;
use crate::resolver::AtomMatch;
use crate::resolver::BossResolution;
use crate::resolver::ResolutionContext;
use crate::resolver::classify_atom;
use crate::settings::Predetermined;
use crate::settings::PredeterminedItems;
use crate::settings::Settings;
use crate::settings::SettingsProvider;
use crate::settings::flags;
use crate::settings::items;
use crate::settings::options;
use crate::tables::BannedLocation;
use crate::tables::ChartType;
use crate::tables::EntranceEntry;
use crate::tables::GameData;
use crate::tables::LocationDirectory;
use crate::tables::LocationEntry;
use crate::tables::LocationField;
use crate::tables::NUM_TRIFORCE_CHARTS;
use crate::tables::VanillaChart;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum depth of macro, location, and boss expansions within one build.
pub const MAX_EXPANSION_DEPTH: usize = 64;
/// Exit name meaning "not yet mapped".
pub const NOTHING_EXIT: &str = "Nothing";
/// Prefix of the item standing for the randomized chart that leads to an island.
pub const RANDOMIZED_CHART_PREFIX: &str = "Chart for ";
/// Name prefixes of numbered charts.
const NUMBERED_CHART_PREFIXES: [&str; 2] = ["Treasure Chart ", "Triforce Chart "];

// ============================================================================
// SECTION: Engine
// ============================================================================

/// Requirement engine for one tracker session.
pub struct LogicEngine<S = Settings> {
    /// Current settings snapshot.
    settings: S,
    /// Static tables shared with other sessions.
    game_data: Arc<GameData>,
    /// Starting and impossible items derived from `settings`.
    predetermined: PredeterminedItems,
    /// Dungeons whose boss is marked not required.
    non_required_boss_dungeons: BTreeSet<String>,
    /// Per-entry-point caches.
    cache: MemoCache,
    /// Destination for audit events.
    audit: Arc<dyn AuditSink>,
    /// Current expansion depth, guarding against cyclic tables.
    expansion_depth: Cell<usize>,
}

impl<S> LogicEngine<S>
where
    S: SettingsProvider,
{
    // ============================================================================
    // SECTION: Lifecycle
    // ============================================================================

    /// Starts a session with no audit output.
    ///
    /// # Errors
    /// Returns [`LogicError`] when the game data fails validation.
    pub fn initialize(settings: S, game_data: Arc<GameData>) -> LogicResult<Self> {
        Self::initialize_with_audit(settings, game_data, Arc::new(NoopAuditSink))
    }

    /// Starts a session that reports to `audit`.
    ///
    /// # Errors
    /// Returns [`LogicError`] when the game data fails validation.
    pub fn initialize_with_audit(
        settings: S,
        game_data: Arc<GameData>,
        audit: Arc<dyn AuditSink>,
    ) -> LogicResult<Self> {
        if let Err(err) = game_data.validate() {
            audit.record(&LogicAuditEvent::data_integrity_error("initialize", err.to_string()));
            return Err(err);
        }
        let predetermined = PredeterminedItems::derive(&settings);
        let summary = format!(
            "{} macros, {} general locations, {} entrances",
            game_data.macros.len(),
            game_data.locations.len(),
            game_data.entrances.len()
        );
        audit.record(&LogicAuditEvent::session_initialized(summary));
        Ok(Self {
            settings,
            game_data,
            predetermined,
            non_required_boss_dungeons: BTreeSet::new(),
            cache: MemoCache::new(),
            audit,
            expansion_depth: Cell::new(0),
        })
    }

    /// Replaces the settings snapshot and drops every cache.
    ///
    /// The not-required boss set is kept.
    pub fn update_settings(&mut self, settings: S) {
        self.predetermined = PredeterminedItems::derive(&settings);
        self.settings = settings;
        self.audit.record(&LogicAuditEvent::settings_updated());
        self.invalidate(InvalidationScope::All);
    }

    /// Drops every cache and marks every boss required again.
    pub fn reset(&mut self) {
        self.non_required_boss_dungeons.clear();
        self.audit.record(&LogicAuditEvent::session_reset());
        self.invalidate(InvalidationScope::All);
    }

    /// Drops cached results in `scope` and returns how many were dropped.
    pub fn invalidate(&self, scope: InvalidationScope) -> usize {
        let dropped = self.cache.invalidate(scope);
        self.audit.record(&LogicAuditEvent::cache_invalidated(scope, dropped));
        dropped
    }

    /// Current settings snapshot.
    #[must_use]
    pub const fn settings(&self) -> &S {
        &self.settings
    }

    /// Static tables.
    #[must_use]
    pub fn game_data(&self) -> &GameData {
        &self.game_data
    }

    /// Starting and impossible items derived from the settings.
    #[must_use]
    pub const fn predetermined_items(&self) -> &PredeterminedItems {
        &self.predetermined
    }

    /// Number of cached results across every entry point.
    #[must_use]
    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    // ============================================================================
    // SECTION: Requirement Retrieval
    // ============================================================================

    /// Simplified requirements for a location.
    ///
    /// # Errors
    /// Returns [`LogicError`] when the location or anything it references is
    /// missing or malformed.
    pub fn requirements_for_location(
        &self,
        general: &str,
        detailed: &str,
        flattened: bool,
    ) -> LogicResult<Arc<Expression>> {
        self.audited("requirements_for_location", self.location_tree(general, detailed, flattened))
    }

    /// Unsimplified requirements for a location.
    ///
    /// # Errors
    /// Returns [`LogicError`] when the location or anything it references is
    /// missing or malformed.
    pub fn raw_requirements_for_location(
        &self,
        general: &str,
        detailed: &str,
        flattened: bool,
    ) -> LogicResult<Arc<Expression>> {
        self.audited(
            "raw_requirements_for_location",
            self.raw_location_tree(general, detailed, flattened),
        )
    }

    /// Simplified requirements for taking an entrance.
    ///
    /// # Errors
    /// Returns [`LogicError`] when the entrance is unknown, its macro is
    /// missing, or the macro is malformed.
    pub fn requirements_for_entrance(&self, entrance: &str) -> LogicResult<Arc<Expression>> {
        let result = self.cache.entrance(entrance, || {
            let macro_name = self.macro_name_for_entrance(entrance)?;
            let raw = build_expression(&macro_name, self, false)?;
            Ok(raw.simplify(&RequirementImplication))
        });
        self.audited("requirements_for_entrance", result)
    }

    /// Builds and simplifies an arbitrary requirement string against the
    /// session state, without caching it.
    ///
    /// # Errors
    /// Returns [`LogicError`] for malformed syntax or dangling references.
    pub fn build_requirement(
        &self,
        requirement: &str,
        flattened: bool,
    ) -> LogicResult<Expression> {
        let result = build_expression(requirement, self, flattened)
            .map(|raw| raw.simplify(&RequirementImplication));
        self.audited("build_requirement", result)
    }

    /// Cached simplified location tree.
    fn location_tree(
        &self,
        general: &str,
        detailed: &str,
        flattened: bool,
    ) -> LogicResult<Arc<Expression>> {
        self.cache.location(LocationKey::new(general, detailed, flattened), || {
            let raw = self.raw_location_tree(general, detailed, flattened)?;
            Ok(raw.simplify(&RequirementImplication))
        })
    }

    /// Cached unsimplified location tree.
    fn raw_location_tree(
        &self,
        general: &str,
        detailed: &str,
        flattened: bool,
    ) -> LogicResult<Arc<Expression>> {
        self.cache.raw_location(LocationKey::new(general, detailed, flattened), || {
            let need = self
                .game_data
                .location_field(general, detailed, LocationField::Need)
                .ok_or_else(|| unknown_location(general, detailed))?;
            build_expression(need, self, flattened)
        })
    }

    /// Name of the macro holding an entrance's requirements.
    ///
    /// The macro must exist; otherwise the name would resolve as a plain item.
    fn macro_name_for_entrance(&self, entrance: &str) -> LogicResult<String> {
        let entry = self
            .game_data
            .entrance(entrance)
            .ok_or_else(|| LogicError::UnknownEntrance(entrance.to_string()))?;
        let macro_name = entry.macro_name();
        if self.game_data.macro_requirement(&macro_name).is_none() {
            return Err(LogicError::UnknownMacro(macro_name));
        }
        Ok(macro_name)
    }

    /// Resolution state for one build.
    fn resolution_context(&self, flattened: bool) -> ResolutionContext<'_> {
        ResolutionContext {
            game_data: &self.game_data,
            settings: &self.settings,
            predetermined: &self.predetermined,
            non_required_boss_dungeons: &self.non_required_boss_dungeons,
            flattened,
        }
    }

    /// Runs a nested expansion, failing once the depth limit is reached.
    fn expand_nested<T>(
        &self,
        atom: &str,
        f: impl FnOnce() -> LogicResult<T>,
    ) -> LogicResult<T> {
        let depth = self.expansion_depth.get();
        if depth >= MAX_EXPANSION_DEPTH {
            return Err(LogicError::NestingTooDeep {
                requirement: atom.to_string(),
                max_depth: MAX_EXPANSION_DEPTH,
            });
        }
        self.expansion_depth.set(depth + 1);
        let result = f();
        self.expansion_depth.set(depth);
        result
    }

    /// Records failures as data-integrity audit events.
    fn audited<T>(&self, operation: &'static str, result: LogicResult<T>) -> LogicResult<T> {
        if let Err(err) = &result {
            self.audit.record(&LogicAuditEvent::data_integrity_error(operation, err.to_string()));
        }
        result
    }

    // ============================================================================
    // SECTION: Items
    // ============================================================================

    /// Highest count of an item worth tracking.
    ///
    /// Impossible items cap one below their impossible count; otherwise the
    /// item table, then the key table, then one.
    #[must_use]
    pub fn max_item_count(&self, item: &str) -> u32 {
        if let Some(impossible) = self.predetermined.impossible.get(item) {
            return impossible.saturating_sub(1);
        }
        self.game_data
            .items
            .get(item)
            .or_else(|| self.game_data.keys.get(item))
            .copied()
            .unwrap_or(1)
    }

    /// Copies of an item held at the start of the seed.
    #[must_use]
    pub fn starting_item_count(&self, item: &str) -> u32 {
        self.predetermined.starting_count(item)
    }

    /// Returns true for items every seed starts with and the player cannot
    /// remove.
    #[must_use]
    pub fn is_locked_starting_item(item: &str) -> bool {
        item == items::WINDS_REQUIEM || item == items::BOATS_SAIL || item == items::WIND_WAKER
    }

    /// Parses an explicit `"<item> x<count>"` requirement.
    #[must_use]
    pub fn parse_item_count_requirement(requirement: &str) -> Option<ItemRequirement<'_>> {
        ItemRequirement::parse(requirement)
    }

    // ============================================================================
    // SECTION: Locations
    // ============================================================================

    /// Returns true when every type flag of the location is active.
    ///
    /// # Errors
    /// Returns [`LogicError::UnknownLocation`] for a missing location.
    pub fn is_progress_location(&self, general: &str, detailed: &str) -> LogicResult<bool> {
        let entry = self.location_entry(general, detailed)?;
        Ok(entry.type_flags().all(|flag| self.settings.is_flag_active(flag)))
    }

    /// Returns true when every type flag of the location is certainly active.
    ///
    /// # Errors
    /// Returns [`LogicError::UnknownLocation`] for a missing location.
    pub fn is_certain_location_type(&self, general: &str, detailed: &str) -> LogicResult<bool> {
        let entry = self.location_entry(general, detailed)?;
        Ok(entry.type_flags().all(|flag| self.settings.is_certain_flag_active(flag)))
    }

    /// Detailed locations of a general location, optionally only progress ones.
    ///
    /// # Errors
    /// Returns [`LogicError::UnknownLocation`] when a listed location vanishes
    /// from the table (never for consistent tables).
    pub fn filter_detailed_locations(
        &self,
        general: &str,
        only_progress_locations: bool,
    ) -> LogicResult<Vec<String>> {
        let mut detailed_locations = Vec::new();
        for detailed in self.game_data.detailed_locations_for_general_location(general) {
            if !only_progress_locations || self.is_progress_location(general, detailed)? {
                detailed_locations.push(detailed.to_string());
            }
        }
        Ok(detailed_locations)
    }

    /// Returns true for names in the dungeon table.
    #[must_use]
    pub fn is_dungeon(&self, name: &str) -> bool {
        self.game_data.dungeon(name).is_some()
    }

    /// Returns true for dungeons with their own keys and dungeon items.
    #[must_use]
    pub fn is_main_dungeon(&self, name: &str) -> bool {
        self.is_dungeon(name) && !self.game_data.non_main_dungeons.contains(name)
    }

    /// Detailed location of a dungeon's boss.
    ///
    /// An override wins; otherwise the first `Boss`-typed location of the
    /// dungeon in name order.
    ///
    /// # Errors
    /// Returns [`LogicError::UnknownBossLocation`] when the dungeon has no
    /// override and no location typed `Boss`.
    pub fn boss_location(&self, dungeon: &str) -> LogicResult<&str> {
        if let Some(location) = self.game_data.boss_location_overrides.get(dungeon) {
            return Ok(location);
        }
        self.game_data
            .locations
            .get(dungeon)
            .and_then(|detailed_map| {
                detailed_map.iter().find(|(_, entry)| entry.has_type(flags::BOSS))
            })
            .map(|(detailed, _)| detailed.as_str())
            .ok_or_else(|| LogicError::UnknownBossLocation(dungeon.to_string()))
    }

    /// `"<short name> Small Key"` for a dungeon.
    ///
    /// # Errors
    /// Returns [`LogicError::UnknownDungeon`] for names outside the dungeon table.
    pub fn small_key_name(&self, dungeon: &str) -> LogicResult<String> {
        self.dungeon_item_name(dungeon, "Small Key")
    }

    /// `"<short name> Big Key"` for a dungeon.
    ///
    /// # Errors
    /// Returns [`LogicError::UnknownDungeon`] for names outside the dungeon table.
    pub fn big_key_name(&self, dungeon: &str) -> LogicResult<String> {
        self.dungeon_item_name(dungeon, "Big Key")
    }

    /// `"<short name> Dungeon Map"` for a dungeon.
    ///
    /// # Errors
    /// Returns [`LogicError::UnknownDungeon`] for names outside the dungeon table.
    pub fn dungeon_map_name(&self, dungeon: &str) -> LogicResult<String> {
        self.dungeon_item_name(dungeon, "Dungeon Map")
    }

    /// `"<short name> Compass"` for a dungeon.
    ///
    /// # Errors
    /// Returns [`LogicError::UnknownDungeon`] for names outside the dungeon table.
    pub fn compass_name(&self, dungeon: &str) -> LogicResult<String> {
        self.dungeon_item_name(dungeon, "Compass")
    }

    /// Maximum small keys a dungeon holds.
    ///
    /// # Errors
    /// Returns [`LogicError::UnknownDungeon`] for names outside the dungeon table.
    pub fn max_small_keys_for_dungeon(&self, dungeon: &str) -> LogicResult<u32> {
        Ok(self.max_item_count(&self.small_key_name(dungeon)?))
    }

    /// Returns true when a location could hold one of its dungeon's keys.
    ///
    /// # Errors
    /// Returns [`LogicError::UnknownLocation`] for a missing location.
    pub fn is_potential_key_location(&self, general: &str, detailed: &str) -> LogicResult<bool> {
        if !self.is_main_dungeon(general) {
            return Ok(false);
        }
        let entry = self.location_entry(general, detailed)?;
        if self.settings.is_flag_active(flags::DUNGEON)
            && !self.is_progress_location(general, detailed)?
        {
            return Ok(false);
        }
        if self.settings.option_enabled(options::RANDOMIZE_MINIBOSS_ENTRANCES)
            && entry.has_type(flags::RANDOMIZABLE_MINIBOSS_ROOM)
        {
            return Ok(false);
        }
        Ok(!entry.has_type(flags::BOSS))
    }

    /// Location table entry.
    fn location_entry(&self, general: &str, detailed: &str) -> LogicResult<&LocationEntry> {
        self.game_data
            .location(general, detailed)
            .ok_or_else(|| unknown_location(general, detailed))
    }

    /// Dungeon-specific item name built from the dungeon's short name.
    fn dungeon_item_name(&self, dungeon: &str, suffix: &str) -> LogicResult<String> {
        let entry = self
            .game_data
            .dungeon(dungeon)
            .ok_or_else(|| LogicError::UnknownDungeon(dungeon.to_string()))?;
        Ok(format!("{} {suffix}", entry.short_name))
    }

    // ============================================================================
    // SECTION: Small Keys
    // ============================================================================

    /// Minimum small keys needed to reach a dungeon location, assuming every
    /// other item is held.
    ///
    /// # Errors
    /// Returns [`LogicError::SmallKeysUnsatisfiable`] when no count up to the
    /// dungeon maximum works, or any lookup error from the location tree.
    pub fn small_keys_required_for_location(
        &self,
        general: &str,
        detailed: &str,
    ) -> LogicResult<u32> {
        let result = self.cache.small_keys(general, detailed, || {
            let max_small_keys = self.max_small_keys_for_dungeon(general)?;
            let small_key_name = self.small_key_name(general)?;
            let requirements = self.location_tree(general, detailed, false)?;
            keys::minimum_small_keys(&requirements, &small_key_name, max_small_keys).ok_or_else(
                || LogicError::SmallKeysUnsatisfiable {
                    general: general.to_string(),
                    detailed: detailed.to_string(),
                },
            )
        });
        self.audited("small_keys_required_for_location", result)
    }

    /// Returns true when a location is reachable with `num_small_keys` keys
    /// and the non-key requirements `oracle` reports.
    ///
    /// # Errors
    /// Returns [`LogicError`] when the location tree cannot be built.
    pub fn is_location_available_with_small_keys<O>(
        &self,
        general: &str,
        detailed: &str,
        num_small_keys: u32,
        non_key_requirement_met: &O,
    ) -> LogicResult<bool>
    where
        O: ItemOracle + ?Sized,
    {
        let small_key_name = self.small_key_name(general)?;
        let requirements = self.requirements_for_location(general, detailed, false)?;
        Ok(keys::is_available_with_small_keys(
            &requirements,
            &small_key_name,
            num_small_keys,
            non_key_requirement_met,
        ))
    }

    // ============================================================================
    // SECTION: Bosses
    // ============================================================================

    /// Marks a dungeon's boss as required.
    ///
    /// # Errors
    /// Returns [`LogicError::UnknownRequiredBoss`] when the dungeon has no
    /// required-boss entry.
    pub fn set_boss_required(&mut self, dungeon: &str) -> LogicResult {
        self.boss_requirement_for_dungeon(dungeon)?;
        self.non_required_boss_dungeons.remove(dungeon);
        self.audit.record(&LogicAuditEvent::boss_requirement_changed(dungeon, true));
        self.invalidate(InvalidationScope::BossDependent);
        Ok(())
    }

    /// Marks a dungeon's boss as not required.
    ///
    /// # Errors
    /// Returns [`LogicError::UnknownRequiredBoss`] when the dungeon has no
    /// required-boss entry.
    pub fn set_boss_not_required(&mut self, dungeon: &str) -> LogicResult {
        self.boss_requirement_for_dungeon(dungeon)?;
        self.non_required_boss_dungeons.insert(dungeon.to_string());
        self.audit.record(&LogicAuditEvent::boss_requirement_changed(dungeon, false));
        self.invalidate(InvalidationScope::BossDependent);
        Ok(())
    }

    /// Returns true unless the dungeon's boss is marked not required.
    #[must_use]
    pub fn is_boss_required(&self, dungeon: &str) -> bool {
        !self.non_required_boss_dungeons.contains(dungeon)
    }

    /// Dungeons whose boss is marked not required.
    #[must_use]
    pub const fn non_required_boss_dungeons(&self) -> &BTreeSet<String> {
        &self.non_required_boss_dungeons
    }

    /// Atom that stands for defeating a dungeon's boss.
    ///
    /// # Errors
    /// Returns [`LogicError::UnknownRequiredBoss`] when the dungeon has no
    /// required-boss entry.
    pub fn boss_requirement_for_dungeon(&self, dungeon: &str) -> LogicResult<&str> {
        self.game_data
            .required_boss_for_dungeon(dungeon)
            .map(|boss| boss.requirement.as_str())
            .ok_or_else(|| LogicError::UnknownRequiredBoss(dungeon.to_string()))
    }

    /// Boss location (dungeon, detailed location) for a required-boss atom,
    /// or `None` when the atom is not a boss requirement.
    ///
    /// # Errors
    /// Returns [`LogicError::UnknownBossLocation`] when the dungeon has no
    /// boss location.
    pub fn boss_location_for_requirement(
        &self,
        requirement: &str,
    ) -> LogicResult<Option<(&str, &str)>> {
        let Some(boss) = self.game_data.required_boss_for_requirement(requirement) else {
            return Ok(None);
        };
        let dungeon = boss.dungeon_name.as_str();
        Ok(Some((dungeon, self.boss_location(dungeon)?)))
    }

    /// Returns true when the dungeon can be toggled as not required.
    #[must_use]
    pub fn is_required_bosses_mode_dungeon(&self, dungeon: &str) -> bool {
        self.game_data.required_boss_for_dungeon(dungeon).is_some()
    }

    /// Returns true while more bosses may still be marked not required.
    #[must_use]
    pub fn any_non_required_bosses_remaining(&self) -> bool {
        let required_bosses = self.settings.option_integer(options::NUM_REQUIRED_BOSSES);
        let toggleable = i64::try_from(self.game_data.required_bosses.len()).unwrap_or(i64::MAX);
        let marked = i64::try_from(self.non_required_boss_dungeons.len()).unwrap_or(i64::MAX);
        marked < toggleable.saturating_sub(required_bosses)
    }

    // ============================================================================
    // SECTION: Entrances
    // ============================================================================

    /// Name of the area entered through an exit.
    ///
    /// # Errors
    /// Returns [`LogicError::UnknownEntrance`] for unknown exits.
    pub fn entry_name(&self, exit: &str) -> LogicResult<&str> {
        self.entrance_entry(exit).map(|entry| entry.entry_name.as_str())
    }

    /// Short display name for an entrance.
    ///
    /// # Errors
    /// Returns [`LogicError::UnknownEntrance`] for unknown entrances.
    pub fn short_entrance_name(&self, entrance: &str) -> LogicResult<&str> {
        self.entrance_entry(entrance).map(|entry| entry.entrance_name.as_str())
    }

    /// Short display name for an exit; [`NOTHING_EXIT`] maps to itself.
    ///
    /// # Errors
    /// Returns [`LogicError::UnknownEntrance`] for unknown exits.
    pub fn short_exit_name<'a>(&'a self, exit: &'a str) -> LogicResult<&'a str> {
        if exit == NOTHING_EXIT {
            return Ok(exit);
        }
        self.entrance_entry(exit).map(|entry| entry.exit_name.as_str())
    }

    /// Returns true when any entrance category is randomized.
    #[must_use]
    pub fn is_random_entrances(&self) -> bool {
        self.pools().is_random_entrances()
    }

    /// Every randomized entrance, dungeon pool first.
    ///
    /// # Errors
    /// Never fails for validated tables; the signature matches the other pool
    /// queries.
    pub fn all_random_entrances(&self) -> LogicResult<Arc<[String]>> {
        self.cache.pool(PoolQuery::AllRandomEntrances, || Ok(self.pools().all_random_entrances()))
    }

    /// Entrances that may lead into `exit`, excluding entrances nested in it.
    ///
    /// # Errors
    /// Returns [`LogicError::UnknownEntrance`] for unknown exits.
    pub fn random_entrances_for_exit(&self, exit: &str) -> LogicResult<Arc<[String]>> {
        let result = self.cache.pool(PoolQuery::EntrancesForExit(exit.to_string()), || {
            self.pools().random_entrances_for_exit(exit)
        });
        self.audited("random_entrances_for_exit", result)
    }

    /// Exits `entrance` may lead to, excluding the exit that nests it.
    ///
    /// # Errors
    /// Returns [`LogicError::UnknownEntrance`] for unknown entrances.
    pub fn random_exits_for_entrance(&self, entrance: &str) -> LogicResult<Arc<[String]>> {
        let result = self.cache.pool(PoolQuery::ExitsForEntrance(entrance.to_string()), || {
            self.pools().random_exits_for_entrance(entrance)
        });
        self.audited("random_exits_for_entrance", result)
    }

    /// Randomized entrances nested inside `exit`.
    ///
    /// # Errors
    /// Never fails; the signature matches the other pool queries.
    pub fn nested_entrances_for_exit(&self, exit: &str) -> LogicResult<Arc<[String]>> {
        self.cache.pool(PoolQuery::NestedEntrancesForExit(exit.to_string()), || {
            Ok(self.pools().nested_entrances_for_exit(exit))
        })
    }

    /// Randomized entrances located on an island.
    #[must_use]
    pub fn entrances_for_island(&self, island: &str) -> Vec<String> {
        self.pools().entrances_for_island(island)
    }

    /// Randomized island-pool exits leading into an island.
    #[must_use]
    pub fn exits_for_island(&self, island: &str) -> Vec<String> {
        self.pools().exits_for_island(island)
    }

    /// Randomized dungeon-pool entrances located in a zone.
    #[must_use]
    pub fn entrances_for_dungeon(&self, zone: &str) -> Vec<String> {
        self.pools().entrances_for_dungeon(zone)
    }

    /// Randomized dungeon-pool exits leading into a zone.
    #[must_use]
    pub fn exits_for_dungeon(&self, zone: &str) -> Vec<String> {
        self.pools().exits_for_dungeon(zone)
    }

    /// Pool view over the current settings.
    fn pools(&self) -> EntrancePools<'_> {
        EntrancePools::new(&self.game_data, &self.settings)
    }

    /// Entrance table entry.
    fn entrance_entry(&self, name: &str) -> LogicResult<&EntranceEntry> {
        self.game_data.entrance(name).ok_or_else(|| LogicError::UnknownEntrance(name.to_string()))
    }

    // ============================================================================
    // SECTION: Charts
    // ============================================================================

    /// Island a vanilla chart leads to; `None` outside the chart table.
    #[must_use]
    pub fn island_for_chart(&self, chart: &str) -> Option<Arc<str>> {
        self.cache.chart_island(chart, || self.game_data.island_for_chart(chart).map(Arc::from))
    }

    /// Chart found on `island` when charts are not randomized.
    ///
    /// # Errors
    /// Returns [`LogicError::UnknownIsland`] for names outside the island table.
    pub fn vanilla_chart_for_island(&self, island: &str) -> LogicResult<VanillaChart> {
        let result = self.cache.vanilla_chart(island, || {
            let chart_name = self
                .game_data
                .chart_for_island(island)
                .ok_or_else(|| LogicError::UnknownIsland(island.to_string()))?;
            let chart_type = if chart_name.contains("Treasure") {
                ChartType::Treasure
            } else {
                ChartType::Triforce
            };
            Ok(VanillaChart {
                chart_name: chart_name.to_string(),
                chart_type,
            })
        });
        self.audited("vanilla_chart_for_island", result)
    }

    /// Item standing for the randomized chart that leads to `island`.
    #[must_use]
    pub fn randomized_chart_for_island(island: &str) -> String {
        format!("{RANDOMIZED_CHART_PREFIX}{island}")
    }

    /// Island named by a randomized chart item. Other names pass through.
    #[must_use]
    pub fn island_from_chart_for_island(chart: &str) -> &str {
        chart.strip_prefix(RANDOMIZED_CHART_PREFIX).unwrap_or(chart)
    }

    /// Returns true for numbered charts while charts are randomized.
    #[must_use]
    pub fn is_randomized_chart(&self, item: &str) -> bool {
        self.settings.option_enabled(options::RANDOMIZE_CHARTS) && is_numbered_chart(item)
    }

    /// Returns true when either chart kind may hold progress items.
    #[must_use]
    pub fn any_progress_item_charts(&self) -> bool {
        self.cache.any_progress_item_charts(|| {
            self.settings.option_enabled(options::PROGRESSION_TREASURE_CHARTS)
                || self.settings.option_enabled(options::PROGRESSION_TRIFORCE_CHARTS)
        })
    }

    /// Returns true when the chart leading to `island` may hold a progress
    /// item.
    ///
    /// With randomized charts any chart may lead anywhere, so this is
    /// [`LogicEngine::any_progress_item_charts`].
    ///
    /// # Errors
    /// Returns [`LogicError::UnknownIsland`] for names outside the island table
    /// when charts are not randomized.
    pub fn island_has_progress_item_chart(&self, island: &str) -> LogicResult<bool> {
        self.cache.island_has_progress_item_chart(island, || {
            if self.settings.option_enabled(options::RANDOMIZE_CHARTS) {
                return Ok(self.any_progress_item_charts());
            }
            let option = match self.vanilla_chart_for_island(island)?.chart_type {
                ChartType::Treasure => options::PROGRESSION_TREASURE_CHARTS,
                ChartType::Triforce => options::PROGRESSION_TRIFORCE_CHARTS,
            };
            Ok(self.settings.option_enabled(option))
        })
    }

    /// Every chart item, Treasure Charts first.
    ///
    /// Without `include_non_progress_charts`, only kinds that may hold
    /// progress items are listed.
    #[must_use]
    pub fn all_charts(&self, include_non_progress_charts: bool) -> Arc<[String]> {
        self.cache.chart_list(include_non_progress_charts, || {
            let include_treasure = include_non_progress_charts
                || self.settings.option_enabled(options::PROGRESSION_TREASURE_CHARTS);
            let include_triforce = include_non_progress_charts
                || self.settings.option_enabled(options::PROGRESSION_TRIFORCE_CHARTS);
            let num_treasure_charts =
                self.game_data.charts.len().saturating_sub(NUM_TRIFORCE_CHARTS);
            let mut charts = Vec::new();
            if include_treasure {
                charts.extend(
                    (1..=num_treasure_charts).map(|number| format!("Treasure Chart {number}")),
                );
            }
            if include_triforce {
                charts.extend(
                    (1..=NUM_TRIFORCE_CHARTS).map(|number| format!("Triforce Chart {number}")),
                );
            }
            charts
        })
    }

    // ============================================================================
    // SECTION: Display Names
    // ============================================================================

    /// Display name for `count` copies of `item`.
    ///
    /// A table override wins. Otherwise items with more than one copy show
    /// `"<item> (<count>/<max>)"` when a count is given.
    #[must_use]
    pub fn pretty_name_for_item(&self, item: &str, count: Option<u32>) -> Arc<str> {
        let query = NameQuery::Item {
            item: item.to_string(),
            count,
        };
        self.cache.name(query, || {
            if let Some(name) = self.game_data.pretty_item_name(item, count.unwrap_or(1)) {
                return name.to_string();
            }
            let Some(count) = count else {
                return item.to_string();
            };
            let max_count = self.max_item_count(item);
            if max_count > 1 {
                format!("{item} ({count}/{max_count})")
            } else {
                item.to_string()
            }
        })
    }

    /// Display name for a requirement atom such as `Progressive Sword x2`.
    ///
    /// Atoms without an override are returned unchanged.
    #[must_use]
    pub fn pretty_name_for_item_requirement(&self, requirement: &str) -> Arc<str> {
        self.cache.name(NameQuery::ItemRequirement(requirement.to_string()), || {
            let (item, count) = ItemRequirement::parse(requirement)
                .map_or((requirement, 1), |parsed| (parsed.item_name, parsed.count_required));
            self.game_data.pretty_item_name(item, count).unwrap_or(requirement).to_string()
        })
    }

    /// Locations banned together with `zone`: every location inside it,
    /// then its additional banned locations.
    #[must_use]
    pub fn banned_locations_for_zone(&self, zone: &str) -> Vec<BannedLocation> {
        let mut banned: Vec<BannedLocation> = self
            .game_data
            .detailed_locations_for_general_location(zone)
            .into_iter()
            .map(|detailed| BannedLocation {
                general_location: zone.to_string(),
                detailed_location: detailed.to_string(),
            })
            .collect();
        if let Some(additional) = self.game_data.additional_banned_locations.get(zone) {
            banned.extend(additional.iter().cloned());
        }
        banned
    }

    /// Progression setting names for a comma-separated list of location
    /// type flags, deduplicated in first-seen order.
    ///
    /// Flags without a setting of their own are kept as-is.
    #[must_use]
    pub fn location_type_to_setting(location_types: &str) -> String {
        let mut settings: Vec<&str> = Vec::new();
        for flag in location_types.split(',').map(str::trim) {
            let setting = flags::setting_for_flag(flag).unwrap_or(flag);
            if !settings.contains(&setting) {
                settings.push(setting);
            }
        }
        settings.join(", ")
    }
}

/// Returns true when `item` contains a numbered Treasure or Triforce Chart.
fn is_numbered_chart(item: &str) -> bool {
    NUMBERED_CHART_PREFIXES.iter().any(|prefix| {
        item.match_indices(prefix).any(|(start, _)| {
            item.get(start + prefix.len()..)
                .is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_digit()))
        })
    })
}

/// Unknown-location error for a general/detailed pair.
fn unknown_location(general: &str, detailed: &str) -> LogicError {
    LogicError::UnknownLocation {
        general: general.to_string(),
        detailed: detailed.to_string(),
    }
}

// ============================================================================
// SECTION: Atom Expansion
// ============================================================================

impl<S> AtomExpander for LogicEngine<S>
where
    S: SettingsProvider,
{
    fn expand_atom(&self, atom: &str, flattened: bool) -> LogicResult<Expression> {
        let context = self.resolution_context(flattened);
        match classify_atom(&context, atom)? {
            AtomMatch::Macro(raw) => {
                self.expand_nested(atom, || build_expression(raw, self, flattened))
            }
            AtomMatch::OtherLocation {
                general,
                detailed,
            } => self.expand_nested(atom, || {
                self.raw_location_tree(general, detailed, flattened).map(|tree| (*tree).clone())
            }),
            AtomMatch::Boss(BossResolution::Substitute {
                dungeon,
            }) => {
                let boss_location = self.boss_location(dungeon)?;
                self.expand_nested(atom, || {
                    self.raw_location_tree(dungeon, boss_location, true).map(|tree| (*tree).clone())
                })
            }
            AtomMatch::Conditional(true)
            | AtomMatch::PredeterminedItem(Predetermined::Satisfied)
            | AtomMatch::Boss(BossResolution::NotRequired) => Ok(Expression::nothing()),
            AtomMatch::Conditional(false)
            | AtomMatch::PredeterminedItem(Predetermined::Unsatisfiable) => {
                Ok(Expression::impossible())
            }
            AtomMatch::Boss(BossResolution::Opaque) | AtomMatch::PlainItem => {
                Ok(Expression::leaf(atom))
            }
        }
    }
}
