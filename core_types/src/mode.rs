//! Process lifecycle modes

use serde::{Deserialize, Serialize};
use std::fmt;

/// How many CPU bursts a process may have
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BurstMode {
    /// Exactly one CPU burst per process, no I/O, no context-switch cost
    #[default]
    Single,
    /// Up to three CPU bursts separated by I/O waits
    Multiple,
}

impl BurstMode {
    /// Returns the largest number of bursts a process may declare
    pub fn max_bursts(&self) -> usize {
        match self {
            BurstMode::Single => 1,
            BurstMode::Multiple => 3,
        }
    }

    /// Returns true if processes may perform I/O between bursts
    pub fn allows_io(&self) -> bool {
        matches!(self, BurstMode::Multiple)
    }
}

impl fmt::Display for BurstMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BurstMode::Single => write!(f, "single"),
            BurstMode::Multiple => write!(f, "multiple"),
        }
    }
}
