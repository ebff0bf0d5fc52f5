//! History / undo manager
//!
//! ## Design
//!
//! - **Value snapshots**: A [`Snapshot`] copies every field of the state
//!   explicitly. Queues are stored as id lists and re-resolved against the
//!   snapshot's own process copies on restore, so no two snapshots (and no
//!   snapshot and the live state) ever share data.
//! - **Linear undo**: Pushing while the cursor is behind the newest entry
//!   discards the entries after the cursor. There is no branching.
//! - **Replay proof**: [`Snapshot::fingerprint`] hashes the canonical JSON
//!   encoding, so a re-run tick can be compared bit-for-bit with the one it
//!   replaced.

use crate::process::Process;
use crate::queue::ProcessQueue;
use crate::state::SimulationState;
use crate::timeline::Timeline;
use crate::trace::TraceEvent;
use core_types::ProcessId;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Full copy of the simulation state at a tick boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub current_time: u64,
    pub processes: Vec<Process>,
    pub ready_queue: Vec<ProcessId>,
    pub io_queue: Vec<ProcessId>,
    pub executing: Option<ProcessId>,
    pub quantum_remaining: u64,
    pub timeline: Timeline,
    pub context_switches: u64,
    pub idle_time: u64,
    pub in_context_switch: bool,
    pub context_switch_end_time: u64,
    pub cpu_was_idle: bool,
    pub last_executed: Option<ProcessId>,
    pub trace: Vec<TraceEvent>,
}

impl Snapshot {
    /// Captures `state` field by field
    pub fn capture(state: &SimulationState) -> Self {
        Self {
            current_time: state.current_time,
            processes: state.processes.clone(),
            ready_queue: state.ready_queue.to_ids(),
            io_queue: state.io_queue.to_ids(),
            executing: state.executing,
            quantum_remaining: state.quantum_remaining,
            timeline: state.timeline.clone(),
            context_switches: state.context_switches,
            idle_time: state.idle_time,
            in_context_switch: state.in_context_switch,
            context_switch_end_time: state.context_switch_end_time,
            cpu_was_idle: state.cpu_was_idle,
            last_executed: state.last_executed,
            trace: state.trace.clone(),
        }
    }

    /// Rebuilds an independent state from this snapshot
    ///
    /// Queue and executing ids that do not name one of the snapshot's own
    /// processes are dropped.
    pub fn restore(&self) -> SimulationState {
        let processes = self.processes.clone();
        let known = |id: &ProcessId| processes.iter().any(|p| p.id == *id);
        let ready: Vec<ProcessId> = self.ready_queue.iter().copied().filter(known).collect();
        let io: Vec<ProcessId> = self.io_queue.iter().copied().filter(known).collect();
        let executing = self.executing.filter(known);

        SimulationState {
            current_time: self.current_time,
            ready_queue: ProcessQueue::from_ids(&ready),
            io_queue: ProcessQueue::from_ids(&io),
            executing,
            quantum_remaining: self.quantum_remaining,
            timeline: self.timeline.clone(),
            context_switches: self.context_switches,
            idle_time: self.idle_time,
            in_context_switch: self.in_context_switch,
            context_switch_end_time: self.context_switch_end_time,
            cpu_was_idle: self.cpu_was_idle,
            last_executed: self.last_executed,
            trace: self.trace.clone(),
            processes,
        }
    }

    /// SHA-256 of the canonical JSON encoding, hex encoded
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        let bytes = serde_json::to_vec(self)?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(hex::encode(hasher.finalize()))
    }
}

/// Linear stack of snapshots with a cursor
#[derive(Debug, Clone, Default)]
pub struct History {
    snapshots: Vec<Snapshot>,
    cursor: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a snapshot after the cursor, discarding any redo entries
    pub fn push(&mut self, snapshot: Snapshot) {
        if !self.snapshots.is_empty() {
            self.snapshots.truncate(self.cursor + 1);
        }
        self.snapshots.push(snapshot);
        self.cursor = self.snapshots.len() - 1;
    }

    /// Captures `state` and pushes it
    pub fn snapshot(&mut self, state: &SimulationState) {
        self.push(Snapshot::capture(state));
    }

    /// Moves the cursor back one entry
    ///
    /// Returns the snapshot to restore, or `None` when already at the oldest
    /// entry.
    pub fn step_back(&mut self) -> Option<&Snapshot> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.snapshots.get(self.cursor)
    }

    pub fn can_step_back(&self) -> bool {
        self.cursor > 0
    }

    /// Snapshot at the cursor
    pub fn current(&self) -> Option<&Snapshot> {
        self.snapshots.get(self.cursor)
    }

    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ProcessSpec, SimulationConfig};
    use crate::timeline::Occupant;

    fn state() -> SimulationState {
        SimulationState::initial(&SimulationConfig::single(
            2,
            vec![ProcessSpec::single(0, 3), ProcessSpec::single(1, 2)],
        ))
    }

    fn state_at(time: u64) -> SimulationState {
        let mut state = state();
        state.current_time = time;
        state
    }

    #[test]
    fn test_capture_restore_round_trip() {
        let mut original = state();
        original.ready_queue.enqueue(ProcessId::new(2));
        original.executing = Some(ProcessId::new(1));
        original.current_time = 1;
        original
            .timeline
            .record_tick(Occupant::Process(ProcessId::new(1)), 0);

        let restored = Snapshot::capture(&original).restore();
        assert_eq!(restored, original);
    }

    #[test]
    fn test_restored_state_is_independent() {
        let original = state();
        let snapshot = Snapshot::capture(&original);
        let mut restored = snapshot.restore();
        restored.processes[0].remaining_time = 0;
        assert_eq!(snapshot.processes[0].remaining_time, 3);
        assert_eq!(original.processes[0].remaining_time, 3);
    }

    #[test]
    fn test_restore_drops_unknown_ids() {
        let mut snapshot = Snapshot::capture(&state());
        snapshot.ready_queue = vec![ProcessId::new(9), ProcessId::new(2)];
        snapshot.executing = Some(ProcessId::new(7));
        let restored = snapshot.restore();
        assert_eq!(restored.ready_queue.to_ids(), vec![ProcessId::new(2)]);
        assert_eq!(restored.executing, None);
    }

    #[test]
    fn test_step_back_at_start_is_noop() {
        let mut history = History::new();
        history.snapshot(&state_at(0));
        assert!(!history.can_step_back());
        assert!(history.step_back().is_none());
        assert_eq!(history.cursor(), 0);
    }

    #[test]
    fn test_step_back_returns_previous() {
        let mut history = History::new();
        history.snapshot(&state_at(0));
        history.snapshot(&state_at(1));
        history.snapshot(&state_at(2));

        assert_eq!(history.step_back().map(|s| s.current_time), Some(1));
        assert_eq!(history.step_back().map(|s| s.current_time), Some(0));
        assert!(history.step_back().is_none());
    }

    #[test]
    fn test_push_truncates_redo_entries() {
        let mut history = History::new();
        history.snapshot(&state_at(0));
        history.snapshot(&state_at(1));
        history.snapshot(&state_at(2));
        history.step_back();
        history.step_back();

        history.snapshot(&state_at(5));
        assert_eq!(history.len(), 2);
        assert_eq!(history.cursor(), 1);
        assert_eq!(history.current().map(|s| s.current_time), Some(5));
    }

    #[test]
    fn test_fingerprint_is_deterministic() {
        let a = Snapshot::capture(&state_at(3));
        let b = Snapshot::capture(&state_at(3));
        let c = Snapshot::capture(&state_at(4));
        assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
        assert_ne!(a.fingerprint().unwrap(), c.fingerprint().unwrap());
        assert_eq!(a.fingerprint().unwrap().len(), 64);
    }
}
