//! Simulation state
//!
//! [`SimulationState`] is everything a tick may change. The scheduler owns
//! the only mutable instance; everyone else gets `&SimulationState` or a
//! [`SimulationView`](crate::view::SimulationView).

use crate::config::SimulationConfig;
use crate::error::InvariantViolation;
use crate::process::Process;
use crate::queue::ProcessQueue;
use crate::timeline::Timeline;
use crate::trace::TraceEvent;
use core_types::ProcessId;
use std::collections::HashSet;

/// Complete mutable state of one simulation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationState {
    pub(crate) current_time: u64,
    /// Processes in arrival order, ties broken by ascending id
    pub(crate) processes: Vec<Process>,
    pub(crate) ready_queue: ProcessQueue,
    pub(crate) io_queue: ProcessQueue,
    pub(crate) executing: Option<ProcessId>,
    pub(crate) quantum_remaining: u64,
    pub(crate) timeline: Timeline,
    pub(crate) context_switches: u64,
    pub(crate) idle_time: u64,
    pub(crate) in_context_switch: bool,
    pub(crate) context_switch_end_time: u64,
    pub(crate) cpu_was_idle: bool,
    pub(crate) last_executed: Option<ProcessId>,
    pub(crate) trace: Vec<TraceEvent>,
}

impl SimulationState {
    /// Builds the tick-0 state from a validated configuration
    pub(crate) fn initial(config: &SimulationConfig) -> Self {
        let mut processes: Vec<Process> = config
            .processes
            .iter()
            .enumerate()
            .map(|(index, spec)| Process::from_spec(ProcessId::from_index(index), spec))
            .collect();
        // Stable sort keeps input order for equal arrival times
        processes.sort_by_key(|p| p.arrival_time);

        Self {
            current_time: 0,
            processes,
            ready_queue: ProcessQueue::new(),
            io_queue: ProcessQueue::new(),
            executing: None,
            quantum_remaining: 0,
            timeline: Timeline::new(),
            context_switches: 0,
            idle_time: 0,
            in_context_switch: false,
            context_switch_end_time: 0,
            cpu_was_idle: true,
            last_executed: None,
            trace: Vec::new(),
        }
    }

    pub fn current_time(&self) -> u64 {
        self.current_time
    }

    /// Processes in arrival order
    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    pub fn process(&self, id: ProcessId) -> Option<&Process> {
        self.processes.iter().find(|p| p.id == id)
    }

    pub(crate) fn process_mut(&mut self, id: ProcessId) -> Option<&mut Process> {
        self.processes.iter_mut().find(|p| p.id == id)
    }

    pub fn ready_queue(&self) -> &ProcessQueue {
        &self.ready_queue
    }

    pub fn io_queue(&self) -> &ProcessQueue {
        &self.io_queue
    }

    pub fn executing(&self) -> Option<ProcessId> {
        self.executing
    }

    pub fn quantum_remaining(&self) -> u64 {
        self.quantum_remaining
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn context_switches(&self) -> u64 {
        self.context_switches
    }

    pub fn idle_time(&self) -> u64 {
        self.idle_time
    }

    pub fn in_context_switch(&self) -> bool {
        self.in_context_switch
    }

    pub fn context_switch_end_time(&self) -> u64 {
        self.context_switch_end_time
    }

    pub fn cpu_was_idle(&self) -> bool {
        self.cpu_was_idle
    }

    pub fn last_executed(&self) -> Option<ProcessId> {
        self.last_executed
    }

    pub fn trace(&self) -> &[TraceEvent] {
        &self.trace
    }

    pub fn all_completed(&self) -> bool {
        self.processes.iter().all(|p| p.is_completed)
    }

    pub fn completed_count(&self) -> usize {
        self.processes.iter().filter(|p| p.is_completed).count()
    }

    pub(crate) fn push_trace(&mut self, event: TraceEvent) {
        self.trace.push(event);
    }

    /// Checks the state-machine invariants
    ///
    /// Returns the first violation found.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let mut seen = HashSet::new();
        let scheduled = self
            .ready_queue
            .iter()
            .chain(self.io_queue.iter())
            .chain(self.executing);
        for id in scheduled {
            if !seen.insert(id) {
                return Err(InvariantViolation::DuplicateMembership(id));
            }
            let process = self
                .process(id)
                .ok_or(InvariantViolation::UnknownProcess(id))?;
            if process.is_completed {
                return Err(InvariantViolation::CompletedButScheduled(id));
            }
        }

        if let Some(gap) = self.timeline.first_gap() {
            return Err(InvariantViolation::TimelineGap(gap));
        }
        if self.timeline.span() != self.current_time {
            return Err(InvariantViolation::TimelineSpan {
                span: self.timeline.span(),
                now: self.current_time,
            });
        }

        let busy = self.timeline.busy_ticks();
        let idle = self.timeline.idle_ticks();
        let switch = self.timeline.context_switch_ticks();
        if busy + idle + switch != self.current_time || idle != self.idle_time {
            return Err(InvariantViolation::TickAccounting {
                busy,
                idle,
                switch,
                now: self.current_time,
            });
        }

        for process in &self.processes {
            let executed = self.timeline.ticks_for(process.id);
            let remaining = process.remaining_demand();
            if executed != process.executed_time() || executed + remaining != process.total_burst()
            {
                return Err(InvariantViolation::BurstAccounting {
                    id: process.id,
                    executed,
                    remaining,
                    total: process.total_burst(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProcessSpec;
    use crate::timeline::Occupant;

    fn config() -> SimulationConfig {
        SimulationConfig::single(
            2,
            vec![
                ProcessSpec::single(3, 1),
                ProcessSpec::single(0, 2),
                ProcessSpec::single(3, 4),
            ],
        )
    }

    #[test]
    fn test_initial_state_sorted_by_arrival() {
        let state = SimulationState::initial(&config());
        let ids: Vec<u32> = state.processes().iter().map(|p| p.id.ordinal()).collect();
        assert_eq!(ids, vec![2, 1, 3]);
        assert_eq!(state.current_time(), 0);
        assert!(state.cpu_was_idle());
        assert!(!state.all_completed());
    }

    #[test]
    fn test_initial_state_is_consistent() {
        let state = SimulationState::initial(&config());
        assert_eq!(state.check_invariants(), Ok(()));
    }

    #[test]
    fn test_detects_duplicate_membership() {
        let mut state = SimulationState::initial(&config());
        let id = ProcessId::new(1);
        state.ready_queue.enqueue(id);
        state.executing = Some(id);
        assert_eq!(
            state.check_invariants(),
            Err(InvariantViolation::DuplicateMembership(id))
        );
    }

    #[test]
    fn test_detects_timeline_span_mismatch() {
        let mut state = SimulationState::initial(&config());
        state.current_time = 2;
        state.timeline.record(Occupant::Idle, 0, 1);
        state.idle_time = 1;
        assert_eq!(
            state.check_invariants(),
            Err(InvariantViolation::TimelineSpan { span: 1, now: 2 })
        );
    }

    #[test]
    fn test_detects_burst_accounting_error() {
        let mut state = SimulationState::initial(&config());
        let id = ProcessId::new(2);
        state.current_time = 1;
        state.timeline.record_tick(Occupant::Process(id), 0);
        // remaining_time was not decremented
        assert!(matches!(
            state.check_invariants(),
            Err(InvariantViolation::BurstAccounting { .. })
        ));
    }
}
