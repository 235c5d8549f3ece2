// crates/tracker-config/src/config.rs
// ============================================================================
// Module: Tracker Configuration
// Description: Configuration loading and validation for the logic tracker.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, thiserror, toml, tracker-logic
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Unknown fields, oversized files, and non-UTF-8 content are rejected.
//! Relative paths inside the file resolve against the file's directory.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use tracker_logic::LogicError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "tracker.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "LOGIC_TRACKER_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum game-data file size in bytes.
pub const MAX_GAME_DATA_FILE_SIZE: usize = 16 * 1024 * 1024;
/// Maximum settings file size in bytes.
pub const MAX_SETTINGS_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;

// ============================================================================
// SECTION: Config Model
// ============================================================================

/// Root configuration for the logic tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrackerConfig {
    /// Static logic tables.
    pub data: DataConfig,
    /// Settings snapshot source.
    #[serde(default)]
    pub settings: SettingsConfig,
    /// Audit sink selection.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Directory relative paths resolve against.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

/// Game-data table location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataConfig {
    /// JSON file holding macros, locations, entrances, and item tables.
    pub game_data: PathBuf,
}

/// Settings snapshot location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsConfig {
    /// TOML or JSON settings file; defaults apply when absent.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Audit sink kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// Discard audit events.
    #[default]
    None,
    /// JSON lines on stderr.
    Stderr,
    /// JSON lines appended to a file.
    File,
}

/// Audit sink selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Sink kind.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Output file; required for the `file` sink.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl TrackerConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file is missing, oversized, not UTF-8,
    /// malformed, or fails validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        let content = read_text_file(&resolved, MAX_CONFIG_FILE_SIZE, "config")?;
        let mut config = Self::parse(&content)?;
        config.base_dir = resolved.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// Parses and validates configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the text is malformed or invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_path_string("data.game_data", &self.data.game_data)?;
        if let Some(path) = &self.settings.path {
            validate_path_string("settings.path", path)?;
        }
        match (self.audit.sink, &self.audit.path) {
            (AuditSinkKind::File, Some(path)) => validate_path_string("audit.path", path),
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.path is required for the file sink".to_string()))
            }
            (_, Some(_)) => {
                Err(ConfigError::Invalid("audit.path is only valid for the file sink".to_string()))
            }
            (_, None) => Ok(()),
        }
    }

    /// Resolves a configured path against the config file's directory.
    #[must_use]
    pub fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Absolute game-data path.
    #[must_use]
    pub fn game_data_path(&self) -> PathBuf {
        self.resolve(&self.data.game_data)
    }

    /// Absolute settings path, if one is configured.
    #[must_use]
    pub fn settings_path(&self) -> Option<PathBuf> {
        self.settings.path.as_deref().map(|path| self.resolve(path))
    }

    /// Absolute audit file path, if one is configured.
    #[must_use]
    pub fn audit_path(&self) -> Option<PathBuf> {
        self.audit.path.as_deref().map(|path| self.resolve(path))
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration or data files.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML or JSON parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
    /// Game data failed integrity validation.
    #[error("invalid game data: {0}")]
    Logic(#[from] LogicError),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates a path against length limits.
pub(crate) fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a configured path field.
fn validate_path_string(field: &str, value: &Path) -> Result<(), ConfigError> {
    if value.as_os_str().is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    validate_path(value).map_err(|err| ConfigError::Invalid(format!("{field}: {err}")))
}

/// Reads a UTF-8 file no larger than `limit` bytes.
pub(crate) fn read_text_file(path: &Path, limit: usize, kind: &str) -> Result<String, ConfigError> {
    validate_path(path)?;
    let bytes = fs::read(path)
        .map_err(|err| ConfigError::Io(format!("{kind} file {}: {err}", path.display())))?;
    if bytes.len() > limit {
        return Err(ConfigError::Invalid(format!("{kind} file exceeds size limit")));
    }
    String::from_utf8(bytes).map_err(|_| ConfigError::Invalid(format!("{kind} file must be utf-8")))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
