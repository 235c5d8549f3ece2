// crates/tracker-logic/tests/entrances.rs
// ============================================================================
// Test Module: Entrance Pools
// Coverage: Pool membership, nesting exclusions, mixing, zone queries, and
//           display names.
// ============================================================================
//! ## Overview
//! Integration tests for entrance randomization pools over the fixture tables.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod support;

use support::TestResult;
use support::engine;
use support::ensure;
use support::fail;
use support::settings;
use tracker_logic::LogicEngine;
use tracker_logic::LogicError;
use tracker_logic::OptionValue;
use tracker_logic::Settings;
use tracker_logic::settings::options;

/// Dragon Roost Cavern dungeon entrance.
const DRC: &str = "Dungeon Entrance on Dragon Roost Island";
/// Forbidden Woods dungeon entrance.
const FW: &str = "Dungeon Entrance in Forest Haven Sector";
/// Dragon Roost Cavern boss entrance.
const DRC_BOSS: &str = "Boss Entrance in Dragon Roost Cavern";
/// Forbidden Woods boss entrance.
const FW_BOSS: &str = "Boss Entrance in Forbidden Woods";
/// Forbidden Woods miniboss entrance.
const FW_MINIBOSS: &str = "Miniboss Entrance in Forbidden Woods";
/// Outset Island secret cave entrance.
const OUTSET_CAVE: &str = "Secret Cave Entrance on Outset Island";
/// Outset Island fairy fountain entrance.
const OUTSET_FOUNTAIN: &str = "Fairy Fountain Entrance on Outset Island";
/// Ice Ring Isle secret cave entrance.
const ICE_RING_CAVE: &str = "Secret Cave Entrance on Ice Ring Isle";
/// Ice Ring Isle inner cave entrance.
const ICE_RING_INNER: &str = "Inner Entrance in Ice Ring Isle Secret Cave";

/// Engine with the named randomization options enabled.
fn randomized(enabled: &[&str], mixed: bool) -> TestResult<LogicEngine> {
    let mut pairs: Vec<(&str, OptionValue)> =
        enabled.iter().map(|name| (*name, OptionValue::Bool(true))).collect();
    if mixed {
        pairs.push((
            options::MIX_ENTRANCES,
            OptionValue::Text(options::MIX_DUNGEONS_AND_CAVES_AND_FOUNTAINS.to_string()),
        ));
    }
    engine(settings(&pairs, &[]))
}

/// Tests nothing is random by default.
#[test]
fn defaults_randomize_nothing() -> TestResult {
    let engine = engine(Settings::default())?;
    ensure(!engine.is_random_entrances(), "Expected no randomized entrances")?;
    ensure(engine.all_random_entrances()?.is_empty(), "Expected an empty pool")?;
    Ok(())
}

/// Tests nested entrances are excluded from their parent exit's candidates.
#[test]
fn nested_entrances_never_lead_into_their_parent() -> TestResult {
    let engine = randomized(
        &[options::RANDOMIZE_DUNGEON_ENTRANCES, options::RANDOMIZE_BOSS_ENTRANCES],
        false,
    )?;
    ensure(engine.is_random_entrances(), "Expected randomized entrances")?;
    ensure(
        *engine.all_random_entrances()? == [DRC, FW, DRC_BOSS, FW_BOSS],
        "Expected the dungeon pool in table order",
    )?;
    ensure(
        *engine.nested_entrances_for_exit(FW)? == [FW_BOSS],
        "Unrandomized nested entrances are skipped",
    )?;
    let entrances = engine.random_entrances_for_exit(FW)?;
    ensure(*entrances == [DRC, FW, DRC_BOSS], format!("Unexpected entrances: {entrances:?}"))?;
    let exits = engine.random_exits_for_entrance(FW_BOSS)?;
    ensure(*exits == [DRC, DRC_BOSS, FW_BOSS], format!("Unexpected exits: {exits:?}"))?;
    let exits = engine.random_exits_for_entrance(DRC)?;
    ensure(*exits == [DRC, FW, DRC_BOSS, FW_BOSS], format!("Unexpected exits: {exits:?}"))?;
    Ok(())
}

/// Tests pools stay separate unless mixing is enabled.
#[test]
fn mixing_merges_the_pools() -> TestResult {
    let enabled = [options::RANDOMIZE_DUNGEON_ENTRANCES, options::RANDOMIZE_SECRET_CAVE_ENTRANCES];
    let separate = randomized(&enabled, false)?;
    ensure(
        *separate.random_exits_for_entrance(OUTSET_CAVE)? == [OUTSET_CAVE, ICE_RING_CAVE],
        "Expected only the island pool",
    )?;
    let mixed = randomized(&enabled, true)?;
    ensure(
        *mixed.random_exits_for_entrance(OUTSET_CAVE)? == [DRC, FW, OUTSET_CAVE, ICE_RING_CAVE],
        "Expected the dungeon pool first, then the island pool",
    )?;
    Ok(())
}

/// Tests inner caves are excluded from their own parent cave.
#[test]
fn inner_caves_follow_their_parent() -> TestResult {
    let engine = randomized(
        &[options::RANDOMIZE_SECRET_CAVE_ENTRANCES, options::RANDOMIZE_SECRET_CAVE_INNER_ENTRANCES],
        false,
    )?;
    ensure(
        *engine.random_entrances_for_exit(ICE_RING_CAVE)? == [OUTSET_CAVE, ICE_RING_CAVE],
        "The inner entrance cannot lead back into its parent cave",
    )?;
    ensure(
        *engine.random_exits_for_entrance(ICE_RING_INNER)? == [OUTSET_CAVE, ICE_RING_INNER],
        "The inner entrance cannot exit into its parent cave",
    )?;
    Ok(())
}

/// Tests zone queries.
#[test]
fn zone_queries() -> TestResult {
    let engine = randomized(
        &[
            options::RANDOMIZE_DUNGEON_ENTRANCES,
            options::RANDOMIZE_BOSS_ENTRANCES,
            options::RANDOMIZE_MINIBOSS_ENTRANCES,
            options::RANDOMIZE_SECRET_CAVE_ENTRANCES,
            options::RANDOMIZE_FAIRY_FOUNTAIN_ENTRANCES,
        ],
        false,
    )?;
    ensure(
        engine.entrances_for_island("Outset Island") == [OUTSET_CAVE, OUTSET_FOUNTAIN],
        "Outset entrances",
    )?;
    ensure(
        engine.exits_for_island("Ice Ring Isle Secret Cave") == [ICE_RING_CAVE],
        "Ice Ring exits",
    )?;
    ensure(
        engine.entrances_for_dungeon("Forbidden Woods") == [FW_BOSS, FW_MINIBOSS],
        "Entrances inside Forbidden Woods",
    )?;
    ensure(engine.exits_for_dungeon("Forbidden Woods") == [FW], "Exits into Forbidden Woods")?;
    Ok(())
}

/// Tests display-name lookups.
#[test]
fn display_names() -> TestResult {
    let engine = engine(Settings::default())?;
    ensure(engine.entry_name(FW_BOSS)? == "Kalle Demos Boss Arena", "Entry name")?;
    ensure(engine.short_entrance_name(FW_BOSS)? == "FW Boss", "Short entrance name")?;
    ensure(engine.short_exit_name(FW_BOSS)? == "Kalle Demos", "Short exit name")?;
    ensure(engine.short_exit_name("Nothing")? == "Nothing", "Unmapped exit")?;
    let Err(err) = engine.short_exit_name("Nowhere") else {
        return fail("Expected an unknown-entrance error");
    };
    ensure(
        err == LogicError::UnknownEntrance("Nowhere".to_string()),
        format!("Unexpected error: {err}"),
    )?;
    Ok(())
}

/// Tests unknown names fail for pool queries.
#[test]
fn unknown_names_are_rejected() -> TestResult {
    let engine = randomized(&[options::RANDOMIZE_DUNGEON_ENTRANCES], false)?;
    ensure(
        engine.random_entrances_for_exit("Nowhere")
            == Err(LogicError::UnknownEntrance("Nowhere".to_string())),
        "Expected an unknown-entrance error",
    )?;
    ensure(engine.nested_entrances_for_exit("Nowhere")?.is_empty(), "No nesting for unknowns")?;
    Ok(())
}
