// crates/tracker-config/src/lib.rs
// ============================================================================
// Module: Tracker Config Library
// Description: Config model, validation, and file loaders.
// Purpose: Single source of truth for tracker.toml semantics.
// Dependencies: serde, serde_json, thiserror, toml, tracker-logic
// ============================================================================

//! ## Overview
//! `tracker-config` defines the `tracker.toml` model with strict, fail-closed
//! validation and the loaders that turn it into a ready
//! [`tracker_logic::LogicEngine`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod loader;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use loader::build_audit_sink;
pub use loader::build_engine;
pub use loader::load_game_data;
pub use loader::load_settings;
