// crates/tracker-logic/src/audit.rs
// ============================================================================
// Module: Logic Audit Logging
// Description: Structured audit events for engine lifecycle and failures.
// Purpose: Emit JSON-line records of session changes and data errors without
//          tying the engine to a logging backend.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! The engine reports lifecycle changes (initialization, settings updates,
//! boss toggles, cache invalidation) and data-integrity failures through an
//! [`AuditSink`]. Sinks are `Send + Sync` so one sink can be shared by
//! several engines. Recording never fails: serialization or I/O errors are
//! dropped on the floor.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::memo::InvalidationScope;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Audit event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogicAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Cache scope that was invalidated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<InvalidationScope>,
    /// Number of cache entries dropped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entries_dropped: Option<usize>,
    /// Dungeon affected by a boss toggle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dungeon: Option<String>,
    /// New required state for the dungeon's boss.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// Engine operation that failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<&'static str>,
    /// Human-readable detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LogicAuditEvent {
    /// Creates an event with the current timestamp and no detail fields.
    #[must_use]
    fn bare(event: &'static str) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event,
            timestamp_ms,
            scope: None,
            entries_dropped: None,
            dungeon: None,
            required: None,
            operation: None,
            message: None,
        }
    }

    /// A new session was built from settings and game data.
    #[must_use]
    pub fn session_initialized(summary: String) -> Self {
        Self {
            message: Some(summary),
            ..Self::bare("session_initialized")
        }
    }

    /// The session's settings snapshot was replaced.
    #[must_use]
    pub fn settings_updated() -> Self {
        Self::bare("settings_updated")
    }

    /// The session was reset to its initial state.
    #[must_use]
    pub fn session_reset() -> Self {
        Self::bare("session_reset")
    }

    /// Cached results were dropped.
    #[must_use]
    pub fn cache_invalidated(scope: InvalidationScope, entries_dropped: usize) -> Self {
        Self {
            scope: Some(scope),
            entries_dropped: Some(entries_dropped),
            ..Self::bare("cache_invalidated")
        }
    }

    /// A dungeon's boss was marked required or not required.
    #[must_use]
    pub fn boss_requirement_changed(dungeon: &str, required: bool) -> Self {
        Self {
            dungeon: Some(dungeon.to_string()),
            required: Some(required),
            ..Self::bare("boss_requirement_changed")
        }
    }

    /// An operation failed on corrupt or inconsistent data.
    #[must_use]
    pub fn data_integrity_error(operation: &'static str, message: String) -> Self {
        Self {
            operation: Some(operation),
            message: Some(message),
            ..Self::bare("data_integrity_error")
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for engine events.
pub trait AuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &LogicAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl AuditSink for StderrAuditSink {
    fn record(&self, event: &LogicAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl AuditSink for FileAuditSink {
    fn record(&self, event: &LogicAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// Audit sink that keeps events in memory.
#[derive(Default)]
pub struct MemoryAuditSink {
    /// Recorded events, oldest first.
    events: Mutex<Vec<LogicAuditEvent>>,
}

impl MemoryAuditSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every recorded event.
    #[must_use]
    pub fn events(&self) -> Vec<LogicAuditEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }

    /// Returns the identifiers of every recorded event.
    #[must_use]
    pub fn event_names(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .map(|events| events.iter().map(|event| event.event).collect())
            .unwrap_or_default()
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, event: &LogicAuditEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, _event: &LogicAuditEvent) {}
}
