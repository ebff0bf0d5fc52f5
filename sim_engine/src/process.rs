//! Process model
//!
//! A [`Process`] is created once from a validated [`ProcessSpec`] and is then
//! mutated only by the scheduler. Once completed it never changes again.

use crate::config::ProcessSpec;
use core_types::ProcessId;
use serde::{Deserialize, Serialize};

/// Lifecycle state derived from a process's fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessState {
    /// Arrival time not reached yet
    NotArrived,
    /// Arrived and holding CPU demand (ready, running or between bursts)
    Active,
    /// Waiting for an I/O completion at the given tick
    InIo { io_end_time: u64 },
    /// All bursts finished
    Completed,
}

/// A simulated process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    pub id: ProcessId,
    pub arrival_time: u64,
    pub bursts: Vec<u64>,
    pub ios: Vec<u64>,
    pub current_burst_index: usize,
    pub remaining_time: u64,
    pub io_end_time: Option<u64>,
    pub has_arrived: bool,
    pub is_completed: bool,
    pub response_time: Option<u64>,
    pub completion_time: Option<u64>,
    total_burst: u64,
}

impl Process {
    /// Builds a process from its input position and spec
    pub fn from_spec(id: ProcessId, spec: &ProcessSpec) -> Self {
        Self {
            id,
            arrival_time: spec.arrival_time,
            bursts: spec.bursts.clone(),
            ios: spec.ios.clone(),
            current_burst_index: 0,
            remaining_time: spec.bursts.first().copied().unwrap_or(0),
            io_end_time: None,
            has_arrived: false,
            is_completed: false,
            response_time: None,
            completion_time: None,
            total_burst: spec.total_burst(),
        }
    }

    /// Total CPU demand across all bursts
    pub fn total_burst(&self) -> u64 {
        self.total_burst
    }

    /// Returns true if the active burst is the last one
    pub fn is_in_final_burst(&self) -> bool {
        self.current_burst_index + 1 == self.bursts.len()
    }

    /// Returns true if another burst follows the active one
    pub fn has_more_bursts(&self) -> bool {
        self.current_burst_index + 1 < self.bursts.len()
    }

    /// I/O duration that follows the active burst
    pub fn io_after_current_burst(&self) -> u64 {
        self.ios.get(self.current_burst_index).copied().unwrap_or(0)
    }

    /// CPU ticks consumed so far
    pub fn executed_time(&self) -> u64 {
        if self.is_completed {
            return self.total_burst;
        }
        let finished: u64 = self.bursts[..self.current_burst_index].iter().sum();
        let active = self
            .bursts
            .get(self.current_burst_index)
            .copied()
            .unwrap_or(0);
        finished + active - self.remaining_time
    }

    /// CPU demand still outstanding, including later bursts
    pub fn remaining_demand(&self) -> u64 {
        self.total_burst - self.executed_time()
    }

    /// Ticks from arrival to completion
    pub fn turnaround_time(&self) -> Option<u64> {
        self.completion_time
            .map(|completion| completion - self.arrival_time)
    }

    /// Turnaround minus CPU demand
    ///
    /// Multi-burst processes count I/O time as waiting, matching the
    /// arrival-to-completion definition.
    pub fn waiting_time(&self) -> Option<u64> {
        self.turnaround_time()
            .map(|turnaround| turnaround.saturating_sub(self.total_burst))
    }

    /// Records the first dispatch; later dispatches leave it unchanged
    pub fn mark_dispatched(&mut self, tick: u64) -> bool {
        if self.response_time.is_some() {
            return false;
        }
        self.response_time = Some(tick - self.arrival_time);
        true
    }

    /// Moves the process to its next burst after an I/O wait
    pub fn advance_burst(&mut self) {
        self.current_burst_index += 1;
        self.io_end_time = None;
        if let Some(&burst) = self.bursts.get(self.current_burst_index) {
            self.remaining_time = burst;
        }
    }

    /// Marks the process completed at `tick`
    pub fn complete(&mut self, tick: u64) {
        self.is_completed = true;
        self.completion_time = Some(tick);
        self.remaining_time = 0;
        self.io_end_time = None;
    }

    /// Returns the lifecycle state
    pub fn state(&self) -> ProcessState {
        if self.is_completed {
            ProcessState::Completed
        } else if !self.has_arrived {
            ProcessState::NotArrived
        } else if let Some(io_end_time) = self.io_end_time {
            ProcessState::InIo { io_end_time }
        } else {
            ProcessState::Active
        }
    }
}
