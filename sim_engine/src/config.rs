//! Simulation configuration and validation

use crate::error::ConfigError;
use core_types::{BurstMode, ProcessId};
use serde::{Deserialize, Serialize};

/// Maximum number of processes in one simulation
pub const MAX_PROCESSES: usize = 10;

/// Largest accepted arrival time, burst, I/O duration or switch time
///
/// Keeps every reachable tick, including worst-case switch overhead, far
/// below `u64::MAX`.
pub const MAX_TIME_VALUE: u64 = 1_000_000;

/// Input for one process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSpec {
    /// Tick at which the process enters the ready queue
    #[serde(default)]
    pub arrival_time: u64,
    /// CPU burst lengths, in order
    pub bursts: Vec<u64>,
    /// I/O durations between consecutive bursts
    #[serde(default)]
    pub ios: Vec<u64>,
}

impl ProcessSpec {
    /// Creates a single-burst process
    pub fn single(arrival_time: u64, burst: u64) -> Self {
        Self {
            arrival_time,
            bursts: vec![burst],
            ios: Vec::new(),
        }
    }

    /// Creates a multi-burst process
    pub fn multi(arrival_time: u64, bursts: Vec<u64>, ios: Vec<u64>) -> Self {
        Self {
            arrival_time,
            bursts,
            ios,
        }
    }

    /// Returns the total CPU demand
    pub fn total_burst(&self) -> u64 {
        self.bursts.iter().sum()
    }
}

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Burst mode for every process
    #[serde(default)]
    pub mode: BurstMode,
    /// Number of ticks a process may run before being preempted
    pub time_quantum: u64,
    /// Ticks charged when the CPU switches between different processes
    #[serde(default)]
    pub context_switch_time: u64,
    /// Processes in input order; position `i` becomes `P{i+1}`
    pub processes: Vec<ProcessSpec>,
}

impl SimulationConfig {
    /// Creates a single-burst configuration
    pub fn single(time_quantum: u64, processes: Vec<ProcessSpec>) -> Self {
        Self {
            mode: BurstMode::Single,
            time_quantum,
            context_switch_time: 0,
            processes,
        }
    }

    /// Creates a multi-burst configuration
    pub fn multiple(
        time_quantum: u64,
        context_switch_time: u64,
        processes: Vec<ProcessSpec>,
    ) -> Self {
        Self {
            mode: BurstMode::Multiple,
            time_quantum,
            context_switch_time,
            processes,
        }
    }

    /// Context-switch cost actually charged; single-burst mode never pays one
    pub fn effective_context_switch_time(&self) -> u64 {
        match self.mode {
            BurstMode::Single => 0,
            BurstMode::Multiple => self.context_switch_time,
        }
    }

    /// Validates the configuration
    ///
    /// Checks the first failing rule only; nothing is built from an invalid
    /// configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let count = self.processes.len();
        if count == 0 || count > MAX_PROCESSES {
            return Err(ConfigError::ProcessCount {
                count,
                max: MAX_PROCESSES,
            });
        }

        if self.time_quantum == 0 {
            return Err(ConfigError::ZeroQuantum);
        }

        if self.context_switch_time > MAX_TIME_VALUE {
            return Err(ConfigError::ContextSwitchTooLarge {
                time: self.context_switch_time,
                max: MAX_TIME_VALUE,
            });
        }

        let max_bursts = self.mode.max_bursts();
        for (index, spec) in self.processes.iter().enumerate() {
            let id = ProcessId::from_index(index);

            if spec.bursts.is_empty() {
                return Err(ConfigError::NoBursts(id));
            }
            if spec.bursts.len() > max_bursts {
                return Err(ConfigError::TooManyBursts {
                    id,
                    count: spec.bursts.len(),
                    max: max_bursts,
                    mode: self.mode,
                });
            }
            if let Some(pos) = spec.bursts.iter().position(|&b| b == 0) {
                return Err(ConfigError::ZeroBurst { id, burst: pos + 1 });
            }
            if spec.arrival_time > MAX_TIME_VALUE {
                return Err(ConfigError::ArrivalTooLarge {
                    id,
                    arrival: spec.arrival_time,
                    max: MAX_TIME_VALUE,
                });
            }
            if let Some(&burst) = spec.bursts.iter().find(|&&b| b > MAX_TIME_VALUE) {
                return Err(ConfigError::BurstTooLarge {
                    id,
                    burst,
                    max: MAX_TIME_VALUE,
                });
            }
            if let Some(&io) = spec.ios.iter().find(|&&io| io > MAX_TIME_VALUE) {
                return Err(ConfigError::IoTooLarge {
                    id,
                    io,
                    max: MAX_TIME_VALUE,
                });
            }

            let expected = spec.bursts.len() - 1;
            if spec.ios.len() != expected {
                return Err(ConfigError::IoCountMismatch {
                    id,
                    expected,
                    actual: spec.ios.len(),
                });
            }
        }

        Ok(())
    }
}
