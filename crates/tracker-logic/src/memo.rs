// crates/tracker-logic/src/memo.rs
// ============================================================================
// Module: Memoization Layer
// Description: Per-entry-point caches with scoped invalidation.
// Purpose: Reuse built requirement trees, pool queries, and chart and
//          display-name lookups until the state they were derived from changes.
// Dependencies: crate::{expression, tables}, serde
// ============================================================================

//! ## Overview
//! Each engine entry point owns one cache map keyed by its argument tuple.
//! Cached values are shared through [`Arc`], so a hit hands back the very
//! same tree as the miss that produced it.
//!
//! The engine is single-threaded; maps sit behind [`RefCell`] and no borrow
//! is held while a value is being computed, so computations may re-enter
//! the cache (a location that references another location, for instance).
//! Failed computations are never stored. Lookups that cannot fail go through
//! the same maps without the error path.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cell::RefCell;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use serde::Serialize;

use crate::error::LogicResult;
use crate::expression::Expression;
use crate::tables::VanillaChart;

// ============================================================================
// SECTION: Keys
// ============================================================================

/// Which caches to drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidationScope {
    /// Every cache; required after settings or predetermined items change.
    All,
    /// Only results that depend on which bosses are required.
    BossDependent,
}

/// Cache key for location requirement lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocationKey {
    /// General location.
    pub general: String,
    /// Detailed location.
    pub detailed: String,
    /// Whether other-location and boss references were expanded.
    pub flattened: bool,
}

impl LocationKey {
    /// Builds a key from borrowed names.
    #[must_use]
    pub fn new(general: &str, detailed: &str, flattened: bool) -> Self {
        Self {
            general: general.to_string(),
            detailed: detailed.to_string(),
            flattened,
        }
    }
}

/// Cache key for entrance pool queries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PoolQuery {
    /// Every randomized entrance.
    AllRandomEntrances,
    /// Entrances that may lead into an exit.
    EntrancesForExit(String),
    /// Exits an entrance may lead to.
    ExitsForEntrance(String),
    /// Randomized entrances nested inside an exit.
    NestedEntrancesForExit(String),
}

/// Cache key for chart progress checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChartFlagQuery {
    /// Whether any chart kind is a progress location.
    AnyProgressItemCharts,
    /// Whether the chart leading to an island is a progress location.
    IslandHasProgressItemChart(String),
}

/// Cache key for display names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NameQuery {
    /// An item at an optional count.
    Item {
        /// Item name.
        item: String,
        /// Copies held, if known.
        count: Option<u32>,
    },
    /// A requirement atom, possibly with an explicit count.
    ItemRequirement(String),
}

// ============================================================================
// SECTION: Cache
// ============================================================================

/// Cache maps for every memoized entry point.
#[derive(Debug, Default)]
pub struct MemoCache {
    /// Unsimplified location trees.
    raw_locations: RefCell<HashMap<LocationKey, Arc<Expression>>>,
    /// Simplified location trees.
    locations: RefCell<HashMap<LocationKey, Arc<Expression>>>,
    /// Simplified entrance trees, keyed by entrance name.
    entrances: RefCell<HashMap<String, Arc<Expression>>>,
    /// Minimum small keys per (dungeon, detailed location).
    small_keys: RefCell<HashMap<(String, String), u32>>,
    /// Entrance and exit pool queries.
    pools: RefCell<HashMap<PoolQuery, Arc<[String]>>>,
    /// Chart lists, keyed by whether non-progress charts are included.
    chart_lists: RefCell<HashMap<bool, Arc<[String]>>>,
    /// Chart progress checks.
    chart_flags: RefCell<HashMap<ChartFlagQuery, bool>>,
    /// Island reached by each vanilla chart.
    chart_islands: RefCell<HashMap<String, Option<Arc<str>>>>,
    /// Vanilla chart per island.
    vanilla_charts: RefCell<HashMap<String, VanillaChart>>,
    /// Display names.
    names: RefCell<HashMap<NameQuery, Arc<str>>>,
}

impl MemoCache {
    /// Creates empty caches.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Memoized unsimplified location tree.
    ///
    /// # Errors
    /// Propagates the error from `compute`; nothing is cached on failure.
    pub fn raw_location(
        &self,
        key: LocationKey,
        compute: impl FnOnce() -> LogicResult<Expression>,
    ) -> LogicResult<Arc<Expression>> {
        memoize(&self.raw_locations, key, || compute().map(Arc::new))
    }

    /// Memoized simplified location tree.
    ///
    /// # Errors
    /// Propagates the error from `compute`; nothing is cached on failure.
    pub fn location(
        &self,
        key: LocationKey,
        compute: impl FnOnce() -> LogicResult<Expression>,
    ) -> LogicResult<Arc<Expression>> {
        memoize(&self.locations, key, || compute().map(Arc::new))
    }

    /// Memoized simplified entrance tree.
    ///
    /// # Errors
    /// Propagates the error from `compute`; nothing is cached on failure.
    pub fn entrance(
        &self,
        name: &str,
        compute: impl FnOnce() -> LogicResult<Expression>,
    ) -> LogicResult<Arc<Expression>> {
        memoize(&self.entrances, name.to_string(), || compute().map(Arc::new))
    }

    /// Memoized small-key count.
    ///
    /// # Errors
    /// Propagates the error from `compute`; nothing is cached on failure.
    pub fn small_keys(
        &self,
        general: &str,
        detailed: &str,
        compute: impl FnOnce() -> LogicResult<u32>,
    ) -> LogicResult<u32> {
        memoize(&self.small_keys, (general.to_string(), detailed.to_string()), compute)
    }

    /// Memoized pool query.
    ///
    /// # Errors
    /// Propagates the error from `compute`; nothing is cached on failure.
    pub fn pool(
        &self,
        query: PoolQuery,
        compute: impl FnOnce() -> LogicResult<Vec<String>>,
    ) -> LogicResult<Arc<[String]>> {
        memoize(&self.pools, query, || compute().map(Arc::from))
    }

    /// Memoized chart list.
    pub fn chart_list(
        &self,
        include_non_progress: bool,
        compute: impl FnOnce() -> Vec<String>,
    ) -> Arc<[String]> {
        remember(&self.chart_lists, include_non_progress, || Arc::from(compute()))
    }

    /// Memoized check for any progress chart kind.
    pub fn any_progress_item_charts(&self, compute: impl FnOnce() -> bool) -> bool {
        remember(&self.chart_flags, ChartFlagQuery::AnyProgressItemCharts, compute)
    }

    /// Memoized check for the chart leading to one island.
    ///
    /// # Errors
    /// Propagates the error from `compute`; nothing is cached on failure.
    pub fn island_has_progress_item_chart(
        &self,
        island: &str,
        compute: impl FnOnce() -> LogicResult<bool>,
    ) -> LogicResult<bool> {
        let query = ChartFlagQuery::IslandHasProgressItemChart(island.to_string());
        memoize(&self.chart_flags, query, compute)
    }

    /// Memoized chart-to-island lookup.
    pub fn chart_island(
        &self,
        chart: &str,
        compute: impl FnOnce() -> Option<Arc<str>>,
    ) -> Option<Arc<str>> {
        remember(&self.chart_islands, chart.to_string(), compute)
    }

    /// Memoized vanilla chart for an island.
    ///
    /// # Errors
    /// Propagates the error from `compute`; nothing is cached on failure.
    pub fn vanilla_chart(
        &self,
        island: &str,
        compute: impl FnOnce() -> LogicResult<VanillaChart>,
    ) -> LogicResult<VanillaChart> {
        memoize(&self.vanilla_charts, island.to_string(), compute)
    }

    /// Memoized display name.
    pub fn name(&self, query: NameQuery, compute: impl FnOnce() -> String) -> Arc<str> {
        remember(&self.names, query, || Arc::from(compute()))
    }

    /// Total number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw_locations.borrow().len()
            + self.locations.borrow().len()
            + self.entrances.borrow().len()
            + self.small_keys.borrow().len()
            + self.pools.borrow().len()
            + self.chart_lists.borrow().len()
            + self.chart_flags.borrow().len()
            + self.chart_islands.borrow().len()
            + self.vanilla_charts.borrow().len()
            + self.names.borrow().len()
    }

    /// Returns true when nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops cached entries in `scope` and returns how many were dropped.
    ///
    /// Boss-dependent entries are every requirement tree and every small-key
    /// count derived from one. Pool queries, chart lookups, and display names
    /// only depend on settings and tables.
    pub fn invalidate(&self, scope: InvalidationScope) -> usize {
        let mut dropped = clear(&self.raw_locations)
            + clear(&self.locations)
            + clear(&self.entrances)
            + clear(&self.small_keys);
        if scope == InvalidationScope::All {
            dropped += clear(&self.pools)
                + clear(&self.chart_lists)
                + clear(&self.chart_flags)
                + clear(&self.chart_islands)
                + clear(&self.vanilla_charts)
                + clear(&self.names);
        }
        dropped
    }
}

/// Returns the cached value for `key`, computing and storing it on a miss.
fn memoize<K, V>(
    table: &RefCell<HashMap<K, V>>,
    key: K,
    compute: impl FnOnce() -> LogicResult<V>,
) -> LogicResult<V>
where
    K: Eq + Hash,
    V: Clone,
{
    let cached = table.borrow().get(&key).cloned();
    if let Some(hit) = cached {
        return Ok(hit);
    }
    let value = compute()?;
    table.borrow_mut().insert(key, value.clone());
    Ok(value)
}

/// Infallible form of [`memoize`].
fn remember<K, V>(table: &RefCell<HashMap<K, V>>, key: K, compute: impl FnOnce() -> V) -> V
where
    K: Eq + Hash,
    V: Clone,
{
    let cached = table.borrow().get(&key).cloned();
    if let Some(hit) = cached {
        return hit;
    }
    let value = compute();
    table.borrow_mut().insert(key, value.clone());
    value
}

/// Empties one cache map and returns its former size.
fn clear<K, V>(table: &RefCell<HashMap<K, V>>) -> usize {
    let mut map = table.borrow_mut();
    let dropped = map.len();
    map.clear();
    dropped
}

// ============================================================================
// SECTION: Tests
// ============================================================================
