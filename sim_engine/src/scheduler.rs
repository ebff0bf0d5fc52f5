//! Round-Robin Scheduler Core
//!
//! This module provides the deterministic, tick-driven round-robin state
//! machine at the heart of the simulator.
//!
//! ## Philosophy
//!
//! - **Determinism first**: Same configuration + same ticks => same schedule.
//! - **One tick, one transition**: `advance_tick()` runs to completion and
//!   snapshots only at tick boundaries.
//! - **Pull, don't push**: Drivers call `advance_tick()` and read views; the
//!   scheduler never calls out.
//!
//! ## Tick Order
//!
//! Each call evaluates, in this order:
//!
//! 1. Arrivals at the current tick join the ready queue.
//! 2. I/O completions at the current tick move to the ready queue.
//! 3. A context switch in progress consumes the tick.
//! 4. A free CPU dispatches the ready head, starts a context switch, or
//!    idles until the next arrival or I/O completion.
//! 5. The running process executes one unit.
//! 6. A finished burst goes to I/O or completes; an exhausted quantum
//!    re-enqueues the process at the tail.
//! 7. Time advances and a snapshot is pushed.

use crate::config::SimulationConfig;
use crate::error::ConfigError;
use crate::history::History;
use crate::state::SimulationState;
use crate::stats::SimulationReport;
use crate::timeline::Occupant;
use crate::trace::{DispatchKind, TraceEvent, TraceKind};
use crate::view::SimulationView;
use core_types::{BurstMode, ProcessId, RunId};
use sim_logger::LogEntry;

/// Outcome of one `advance_tick()` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickResult {
    /// Simulated time after the call
    pub time: u64,
    /// True once no further progress is possible
    pub finished: bool,
}

/// Preemptive round-robin scheduler
///
/// Owns the simulation state and its undo history.
pub struct Scheduler {
    config: SimulationConfig,
    run_id: RunId,
    state: SimulationState,
    history: History,
}

impl Scheduler {
    /// Creates a scheduler from a configuration
    ///
    /// The configuration is validated first; nothing is built on error.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = SimulationState::initial(&config);
        let mut history = History::new();
        history.snapshot(&state);
        Ok(Self {
            config,
            run_id: RunId::new(),
            state,
            history,
        })
    }

    /// Advances the simulation by one tick (or one idle-skip jump)
    pub fn advance_tick(&mut self) -> TickResult {
        if self.state.all_completed() {
            return self.result();
        }

        self.admit_arrivals();
        if self.config.mode == BurstMode::Multiple {
            self.complete_io();
        }

        if self.state.in_context_switch {
            self.context_switch_tick();
            return self.end_tick();
        }

        if self.state.executing.is_none() {
            match self.state.ready_queue.front() {
                Some(head) => {
                    if self.state.last_executed == Some(head) {
                        self.dispatch(DispatchKind::Resumed, self.state.current_time);
                    } else if self.switch_time() > 0 && !self.state.cpu_was_idle {
                        self.begin_context_switch();
                        self.context_switch_tick();
                        return self.end_tick();
                    } else {
                        self.dispatch(DispatchKind::Direct, self.state.current_time);
                    }
                }
                None => {
                    let Some(next_event) = self.next_event_time() else {
                        return TickResult {
                            time: self.state.current_time,
                            finished: true,
                        };
                    };
                    self.idle_until(next_event);
                    return self.end_tick();
                }
            }
        }

        self.execute_unit();
        self.resolve_running();
        self.state.current_time += 1;
        self.end_tick()
    }

    /// Advances until finished or `max_ticks` calls have been made
    pub fn run_until_finished(&mut self, max_ticks: Option<usize>) -> TickResult {
        let mut result = self.result();
        let mut ticks = 0;
        while !result.finished {
            if max_ticks.is_some_and(|max| ticks >= max) {
                break;
            }
            result = self.advance_tick();
            ticks += 1;
        }
        result
    }

    /// Restores the previous snapshot
    ///
    /// Returns false (and changes nothing) when there is no earlier snapshot.
    pub fn step_back(&mut self) -> bool {
        match self.history.step_back() {
            Some(snapshot) => {
                self.state = snapshot.restore();
                true
            }
            None => false,
        }
    }

    pub fn can_step_back(&self) -> bool {
        self.history.can_step_back()
    }

    /// Discards all progress and starts a new run from the same configuration
    pub fn reset(&mut self) {
        self.state = SimulationState::initial(&self.config);
        self.history.clear();
        self.history.snapshot(&self.state);
        self.run_id = RunId::new();
    }

    pub fn is_finished(&self) -> bool {
        self.state.all_completed()
    }

    pub fn current_time(&self) -> u64 {
        self.state.current_time
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn view(&self) -> SimulationView<'_> {
        SimulationView::from_state(&self.state)
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Final report, available once every process has completed
    pub fn report(&self) -> Option<SimulationReport> {
        if !self.state.all_completed() {
            return None;
        }
        Some(SimulationReport::from_state(self.run_id, &self.state))
    }

    /// Execution trace as structured log entries
    pub fn log_entries(&self) -> Vec<LogEntry> {
        self.state
            .trace
            .iter()
            .map(|event| event.to_log_entry(self.run_id))
            .collect()
    }

    fn switch_time(&self) -> u64 {
        self.config.effective_context_switch_time()
    }

    fn result(&self) -> TickResult {
        TickResult {
            time: self.state.current_time,
            finished: self.state.all_completed(),
        }
    }

    fn end_tick(&mut self) -> TickResult {
        debug_assert_eq!(self.state.check_invariants(), Ok(()));
        self.history.snapshot(&self.state);
        self.result()
    }

    fn trace(&mut self, kind: TraceKind) {
        let event = TraceEvent::new(self.state.current_time, kind);
        self.state.push_trace(event);
    }

    fn admit_arrivals(&mut self) {
        let now = self.state.current_time;
        let arrivals: Vec<ProcessId> = self
            .state
            .processes
            .iter()
            .filter(|p| !p.has_arrived && p.arrival_time == now)
            .map(|p| p.id)
            .collect();

        for id in arrivals {
            if let Some(process) = self.state.process_mut(id) {
                process.has_arrived = true;
            }
            self.state.ready_queue.enqueue(id);
            self.trace(TraceKind::Arrived { process: id });
        }
    }

    fn complete_io(&mut self) {
        let now = self.state.current_time;
        let processes = &self.state.processes;
        let finished = self.state.io_queue.drain_where(|id| {
            processes
                .iter()
                .find(|p| p.id == id)
                .and_then(|p| p.io_end_time)
                == Some(now)
        });

        for id in finished {
            let Some(process) = self.state.process_mut(id) else {
                continue;
            };
            if process.has_more_bursts() {
                process.advance_burst();
                self.state.ready_queue.enqueue(id);
                self.trace(TraceKind::IoCompleted { process: id });
            } else {
                process.complete(now);
                self.trace(TraceKind::Completed {
                    process: id,
                    completion_time: now,
                });
            }
        }
    }

    /// Loads the ready head onto the CPU with a fresh quantum
    ///
    /// `tick` is the dispatch time used for the response time.
    fn dispatch(&mut self, kind: DispatchKind, tick: u64) {
        let Some(id) = self.state.ready_queue.dequeue() else {
            self.state.cpu_was_idle = true;
            return;
        };
        if let Some(process) = self.state.process_mut(id) {
            process.mark_dispatched(tick);
        }
        self.state.executing = Some(id);
        self.state.quantum_remaining = self.config.time_quantum;
        self.state.last_executed = Some(id);
        self.state.cpu_was_idle = false;
        self.trace(TraceKind::Dispatched { process: id, kind });
    }

    fn begin_context_switch(&mut self) {
        let end_time = self.state.current_time + self.switch_time();
        self.state.in_context_switch = true;
        self.state.context_switch_end_time = end_time;
        self.state.context_switches += 1;
        self.trace(TraceKind::ContextSwitchStarted { end_time });
    }

    /// Consumes one tick of an active context switch
    ///
    /// On the switch's last tick the ready head is dispatched, effective at
    /// the next tick.
    fn context_switch_tick(&mut self) {
        let now = self.state.current_time;
        self.state.timeline.record_tick(Occupant::ContextSwitch, now);
        self.state.current_time = now + 1;

        if self.state.current_time >= self.state.context_switch_end_time {
            self.state.in_context_switch = false;
            self.trace(TraceKind::ContextSwitchCompleted);
            self.dispatch(DispatchKind::AfterSwitch, self.state.current_time);
        }
    }

    /// Earliest future arrival or I/O completion
    fn next_event_time(&self) -> Option<u64> {
        let next_arrival = self
            .state
            .processes
            .iter()
            .filter(|p| !p.has_arrived)
            .map(|p| p.arrival_time)
            .min();

        let next_io = if self.config.mode == BurstMode::Multiple {
            self.state
                .io_queue
                .iter()
                .filter_map(|id| self.state.process(id).and_then(|p| p.io_end_time))
                .min()
        } else {
            None
        };

        match (next_arrival, next_io) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Idles the CPU, skipping straight to `next_event` unless I/O is in flight
    fn idle_until(&mut self, next_event: u64) {
        let now = self.state.current_time;
        let io_in_flight =
            self.config.mode == BurstMode::Multiple && !self.state.io_queue.is_empty();
        let target = if io_in_flight {
            now + 1
        } else {
            next_event.max(now + 1)
        };

        self.state.timeline.record(Occupant::Idle, now, target);
        self.state.idle_time += target - now;
        self.state.cpu_was_idle = true;

        // Per-tick idling extends the previous idle trace entry
        let extended = match self.state.trace.last_mut() {
            Some(TraceEvent {
                kind: TraceKind::Idle { to, .. },
                ..
            }) if *to == now => {
                *to = target;
                true
            }
            _ => false,
        };
        if !extended {
            self.trace(TraceKind::Idle {
                from: now,
                to: target,
            });
        }

        self.state.current_time = target;
    }

    fn execute_unit(&mut self) {
        let Some(id) = self.state.executing else {
            return;
        };
        let now = self.state.current_time;
        let quantum_remaining = self.state.quantum_remaining;
        let Some(process) = self.state.process_mut(id) else {
            return;
        };
        if quantum_remaining == 0 || process.remaining_time == 0 {
            return;
        }

        process.remaining_time -= 1;
        self.state.quantum_remaining -= 1;
        self.state.timeline.record_tick(Occupant::Process(id), now);
        self.state.last_executed = Some(id);
        self.state.cpu_was_idle = false;
    }

    /// Sends a finished burst to I/O or completion, or preempts on quantum expiry
    fn resolve_running(&mut self) {
        let Some(id) = self.state.executing else {
            return;
        };
        let now = self.state.current_time;
        let quantum_expired = self.state.quantum_remaining == 0;
        let Some(process) = self.state.process_mut(id) else {
            return;
        };

        if process.remaining_time == 0 {
            if process.has_more_bursts() {
                let io_end_time = now + 1 + process.io_after_current_burst();
                process.io_end_time = Some(io_end_time);
                self.state.io_queue.enqueue(id);
                self.trace(TraceKind::IoStarted {
                    process: id,
                    io_end_time,
                });
            } else {
                process.complete(now + 1);
                self.trace(TraceKind::Completed {
                    process: id,
                    completion_time: now + 1,
                });
            }
            self.state.executing = None;
        } else if quantum_expired {
            // last_executed is kept so an immediate re-dispatch is a resume
            self.state.ready_queue.enqueue(id);
            self.trace(TraceKind::Preempted { process: id });
            self.state.executing = None;
        }
    }
}
