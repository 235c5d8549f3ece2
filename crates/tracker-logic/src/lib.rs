// crates/tracker-logic/src/lib.rs
// ============================================================================
// Module: Tracker Logic Root
// Description: Public API surface for the requirement engine.
// Purpose: Wire together the tokenizer, builder, simplifier, resolver,
//          caches, and session engine.
// Dependencies: crate::{audit, builder, engine, entrances, error, expression,
//              implication, item, keys, memo, resolver, settings, tables, token}
// ============================================================================

//! ## Overview
//! `tracker-logic` turns the requirement strings of a randomizer's logic
//! tables into AND/OR trees, resolves macros, settings conditionals, location
//! references, and boss atoms against a settings snapshot, and simplifies the
//! result by implication-based absorption. On top of the trees it answers
//! small-key and entrance-pool questions for one tracker session.
//!
//! Start with [`LogicEngine::initialize`], which validates a [`GameData`]
//! table set and binds it to a [`SettingsProvider`].

// ============================================================================
// SECTION: Core Modules
// ============================================================================

pub mod audit;
pub mod builder;
pub mod engine;
pub mod entrances;
pub mod error;
pub mod expression;
pub mod implication;
pub mod item;
pub mod keys;
pub mod memo;
pub mod resolver;
pub mod settings;
pub mod tables;
pub mod token;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuditSink;
pub use audit::FileAuditSink;
pub use audit::LogicAuditEvent;
pub use audit::MemoryAuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use builder::AtomExpander;
pub use builder::LiteralAtoms;
pub use builder::MAX_NESTING;
pub use builder::build_expression;
pub use engine::LogicEngine;
pub use engine::MAX_EXPANSION_DEPTH;
pub use engine::NOTHING_EXIT;
pub use engine::RANDOMIZED_CHART_PREFIX;
pub use entrances::EntrancePools;
pub use error::LogicError;
pub use error::LogicResult;
pub use expression::Expression;
pub use expression::IMPOSSIBLE;
pub use expression::ImplicationOracle;
pub use expression::ItemOracle;
pub use expression::NOTHING;
pub use implication::RequirementImplication;
pub use item::ItemRequirement;
pub use memo::InvalidationScope;
pub use settings::OptionValue;
pub use settings::Predetermined;
pub use settings::PredeterminedItems;
pub use settings::Settings;
pub use settings::SettingsProvider;
pub use tables::BannedLocation;
pub use tables::ChartType;
pub use tables::DungeonEntry;
pub use tables::EntranceCategory;
pub use tables::EntranceEntry;
pub use tables::EntrancePool;
pub use tables::GameData;
pub use tables::LocationDirectory;
pub use tables::LocationEntry;
pub use tables::LocationField;
pub use tables::NUM_TRIFORCE_CHARTS;
pub use tables::RequiredBoss;
pub use tables::VanillaChart;
pub use tables::split_location_name;
pub use token::Token;
pub use token::tokenize;
