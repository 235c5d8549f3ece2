// crates/tracker-logic/tests/support/mod.rs
// ============================================================================
// Module: Test Support
// Description: Shared result helpers and fixtures for engine integration tests.
// ============================================================================
//! ## Overview
//! Shared test helpers for consistent Result-based assertions, plus the
//! Wind Waker fixture tables and settings builders.

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
#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use tracker_logic::GameData;
use tracker_logic::LogicEngine;
use tracker_logic::OptionValue;
use tracker_logic::Settings;

// ========================================================================
// Test Result Helpers
// ========================================================================

/// Standard result type used across engine integration tests.
pub type TestResult<T = ()> = Result<T, Box<dyn Error>>;

/// Lightweight error type for test assertions.
#[derive(Debug)]
struct TestError {
    /// Human-readable failure message.
    message: String,
}

impl TestError {
    /// Creates a new test error with the provided message.
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for TestError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.message)
    }
}

impl Error for TestError {}

/// Returns an error when a test condition fails.
///
/// # Errors
/// Returns a `TestError` when the condition is false.
pub fn ensure(condition: bool, message: impl Into<String>) -> TestResult {
    if condition { Ok(()) } else { Err(Box::new(TestError::new(message))) }
}

/// Returns a test failure.
///
/// # Errors
/// Always returns a `TestError`.
pub fn fail<T>(message: impl Into<String>) -> TestResult<T> {
    Err(Box::new(TestError::new(message)))
}

// ========================================================================
// Fixtures
// ========================================================================

/// Fixture tables shared by engine tests.
const GAME_DATA_JSON: &str = include_str!("../fixtures/game_data.json");

/// Parses the fixture tables.
///
/// # Errors
/// Returns an error when the fixture is not valid JSON for [`GameData`].
pub fn game_data() -> TestResult<GameData> {
    Ok(serde_json::from_str(GAME_DATA_JSON)?)
}

/// Builds a settings snapshot from option pairs and active flags.
pub fn settings(options: &[(&str, OptionValue)], flags: &[&str]) -> Settings {
    let mut settings = Settings::default();
    for (name, value) in options {
        settings.options.insert((*name).to_string(), value.clone());
    }
    for flag in flags {
        settings.flags.insert((*flag).to_string());
        settings.certain_flags.insert((*flag).to_string());
    }
    settings
}

/// Starts an engine over the fixture tables.
///
/// # Errors
/// Returns an error when the fixture fails to parse or validate.
pub fn engine(settings: Settings) -> TestResult<LogicEngine> {
    Ok(LogicEngine::initialize(settings, Arc::new(game_data()?))?)
}

/// Collects the plain item leaves of a tree, sorted.
pub fn sorted_items(expression: &tracker_logic::Expression) -> Vec<String> {
    let mut items = Vec::new();
    expression.for_each_item(&mut |item| items.push(item.to_string()));
    items.sort();
    items
}
