//! Identifiers for simulation entities

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier for a simulated process
///
/// Process ids are stable 1-based ordinals assigned from input order, so the
/// third process in a configuration is always `P3` regardless of when it
/// arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProcessId(u32);

impl ProcessId {
    /// Creates a process id from its 1-based ordinal
    ///
    /// # Panics
    ///
    /// Panics if `ordinal` is zero.
    pub fn new(ordinal: u32) -> Self {
        assert!(ordinal > 0, "process ordinals are 1-based");
        Self(ordinal)
    }

    /// Creates a process id from a 0-based input position
    pub fn from_index(index: usize) -> Self {
        Self(index as u32 + 1)
    }

    /// Returns the 1-based ordinal
    pub fn ordinal(&self) -> u32 {
        self.0
    }

    /// Returns the 0-based input position
    pub fn index(&self) -> usize {
        (self.0 - 1) as usize
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Unique identifier for one simulation run
///
/// A run starts when a scheduler is built from a validated configuration and
/// ends when it is reset or dropped. Log entries carry the run id as their
/// source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(Uuid);

impl RunId {
    /// Creates a new random run ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a run ID from a UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Run({})", self.0)
    }
}
