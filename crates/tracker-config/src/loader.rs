// crates/tracker-config/src/loader.rs
// ============================================================================
// Module: Tracker Loaders
// Description: File loaders for game data, settings, and audit sinks.
// Purpose: Turn a validated config into a ready logic engine.
// Dependencies: serde_json, toml, tracker-logic
// ============================================================================

//! ## Overview
//! Game data ships as JSON and is integrity-checked with
//! [`GameData::validate`] before use. Settings load from TOML or JSON chosen
//! by file extension. Every read goes through the same size and UTF-8 limits
//! as the config file itself.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::sync::Arc;

use tracker_logic::AuditSink;
use tracker_logic::FileAuditSink;
use tracker_logic::GameData;
use tracker_logic::LogicEngine;
use tracker_logic::NoopAuditSink;
use tracker_logic::Settings;
use tracker_logic::StderrAuditSink;

use crate::config::AuditSinkKind;
use crate::config::ConfigError;
use crate::config::MAX_GAME_DATA_FILE_SIZE;
use crate::config::MAX_SETTINGS_FILE_SIZE;
use crate::config::TrackerConfig;
use crate::config::read_text_file;

// ============================================================================
// SECTION: Loaders
// ============================================================================

/// Loads and validates a JSON game-data file.
///
/// # Errors
///
/// Returns [`ConfigError`] when the file cannot be read or parsed, or when the
/// tables fail integrity checks.
pub fn load_game_data(path: &Path) -> Result<GameData, ConfigError> {
    let content = read_text_file(path, MAX_GAME_DATA_FILE_SIZE, "game data")?;
    let game_data: GameData =
        serde_json::from_str(&content).map_err(|err| ConfigError::Parse(err.to_string()))?;
    game_data.validate()?;
    Ok(game_data)
}

/// Loads a settings snapshot from a `.toml` or `.json` file.
///
/// # Errors
///
/// Returns [`ConfigError`] for unreadable files, unsupported extensions, or
/// malformed content.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let format = SettingsFormat::from_path(path)?;
    let content = read_text_file(path, MAX_SETTINGS_FILE_SIZE, "settings")?;
    match format {
        SettingsFormat::Toml => {
            toml::from_str(&content).map_err(|err| ConfigError::Parse(err.to_string()))
        }
        SettingsFormat::Json => {
            serde_json::from_str(&content).map_err(|err| ConfigError::Parse(err.to_string()))
        }
    }
}

/// Builds the audit sink a config selects.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] when the audit file cannot be opened.
pub fn build_audit_sink(config: &TrackerConfig) -> Result<Arc<dyn AuditSink>, ConfigError> {
    match (config.audit.sink, config.audit_path()) {
        (AuditSinkKind::None, _) => Ok(Arc::new(NoopAuditSink)),
        (AuditSinkKind::Stderr, _) => Ok(Arc::new(StderrAuditSink)),
        (AuditSinkKind::File, Some(path)) => {
            let sink = FileAuditSink::new(&path)
                .map_err(|err| ConfigError::Io(format!("audit file {}: {err}", path.display())))?;
            Ok(Arc::new(sink))
        }
        (AuditSinkKind::File, None) => {
            Err(ConfigError::Invalid("audit.path is required for the file sink".to_string()))
        }
    }
}

/// Loads every file a config names and starts a logic engine.
///
/// # Errors
///
/// Returns [`ConfigError`] when any file fails to load or validate.
pub fn build_engine(config: &TrackerConfig) -> Result<LogicEngine, ConfigError> {
    let game_data = load_game_data(&config.game_data_path())?;
    let settings = match config.settings_path() {
        Some(path) => load_settings(&path)?,
        None => Settings::default(),
    };
    let audit = build_audit_sink(config)?;
    Ok(LogicEngine::initialize_with_audit(settings, Arc::new(game_data), audit)?)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Supported settings file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SettingsFormat {
    /// `.toml` files.
    Toml,
    /// `.json` files.
    Json,
}

impl SettingsFormat {
    /// Picks the format from a file extension.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|extension| extension.to_str()) {
            Some(extension) if extension.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            Some(extension) if extension.eq_ignore_ascii_case("json") => Ok(Self::Json),
            _ => Err(ConfigError::Invalid(format!(
                "settings file must end in .toml or .json: {}",
                path.display()
            ))),
        }
    }
}
