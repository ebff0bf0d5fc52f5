//! # Simulation Logger
//!
//! This crate implements structured logging for simulation runs.
//!
//! ## Philosophy
//!
//! Logging is explicit and structured, not text-based or printf-style.
//! Components build [`LogEntry`] values and hand them to whoever owns output;
//! only the host decides whether and how an entry is printed.

use core_types::RunId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Debug information
    Debug,
    /// Informational messages
    Info,
    /// Warnings
    Warn,
    /// Errors
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        };
        f.write_str(label)
    }
}

/// A structured log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Source run (if known)
    pub source: Option<RunId>,
    /// Simulated tick the entry refers to (if any)
    pub tick: Option<u64>,
    /// Log message
    pub message: String,
    /// Structured fields
    pub fields: Vec<(String, String)>,
}

impl LogEntry {
    /// Creates a new log entry
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            source: None,
            tick: None,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    /// Sets the source run
    pub fn with_source(mut self, source: RunId) -> Self {
        self.source = Some(source);
        self
    }

    /// Sets the simulated tick
    pub fn at_tick(mut self, tick: u64) -> Self {
        self.tick = Some(tick);
        self
    }

    /// Adds a field to the log entry
    pub fn with_field(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.fields.push((key.into(), value.to_string()));
        self
    }

    /// Looks up a field value by key
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.level)?;
        if let Some(tick) = self.tick {
            write!(f, " t={}", tick)?;
        }
        write!(f, " {}", self.message)?;
        for (key, value) in &self.fields {
            write!(f, " {}={}", key, value)?;
        }
        Ok(())
    }
}

/// In-memory collector for log entries
///
/// Entries below the minimum level are dropped on push.
#[derive(Debug, Clone)]
pub struct LogBuffer {
    min_level: LogLevel,
    entries: Vec<LogEntry>,
}

impl LogBuffer {
    /// Creates a buffer that keeps entries at `min_level` or above
    pub fn new(min_level: LogLevel) -> Self {
        Self {
            min_level,
            entries: Vec::new(),
        }
    }

    /// Records an entry, returning true if it was kept
    pub fn push(&mut self, entry: LogEntry) -> bool {
        if entry.level < self.min_level {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Returns the recorded entries
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Removes and returns all recorded entries
    pub fn drain(&mut self) -> Vec<LogEntry> {
        std::mem::take(&mut self.entries)
    }

    /// Returns the minimum level kept by this buffer
    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new(LogLevel::Info)
    }
}
