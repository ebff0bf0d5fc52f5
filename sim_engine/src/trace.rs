//! Execution trace
//!
//! Every observable transition of the state machine appends a [`TraceEvent`].
//! The trace is part of the simulation state, so stepping back also removes
//! the events recorded by the undone ticks.

use core_types::{ProcessId, RunId};
use serde::{Deserialize, Serialize};
use sim_logger::{LogEntry, LogLevel};

/// How a process reached the CPU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DispatchKind {
    /// Loaded directly, no switch cost
    Direct,
    /// Same process as the last one to execute, no switch cost
    Resumed,
    /// Loaded at the end of a context switch
    AfterSwitch,
}

/// Kind of trace event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraceKind {
    Arrived {
        process: ProcessId,
    },
    IoStarted {
        process: ProcessId,
        io_end_time: u64,
    },
    IoCompleted {
        process: ProcessId,
    },
    Dispatched {
        process: ProcessId,
        kind: DispatchKind,
    },
    ContextSwitchStarted {
        end_time: u64,
    },
    ContextSwitchCompleted,
    Preempted {
        process: ProcessId,
    },
    Completed {
        process: ProcessId,
        completion_time: u64,
    },
    /// CPU idle over `[from, to)`
    Idle {
        from: u64,
        to: u64,
    },
}

/// A trace event stamped with the tick it happened at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEvent {
    pub time: u64,
    pub kind: TraceKind,
}

impl TraceEvent {
    pub fn new(time: u64, kind: TraceKind) -> Self {
        Self { time, kind }
    }

    /// Process the event is about, if any
    pub fn process(&self) -> Option<ProcessId> {
        match self.kind {
            TraceKind::Arrived { process }
            | TraceKind::IoStarted { process, .. }
            | TraceKind::IoCompleted { process }
            | TraceKind::Dispatched { process, .. }
            | TraceKind::Preempted { process }
            | TraceKind::Completed { process, .. } => Some(process),
            TraceKind::ContextSwitchStarted { .. }
            | TraceKind::ContextSwitchCompleted
            | TraceKind::Idle { .. } => None,
        }
    }

    /// Human-readable description
    pub fn describe(&self) -> String {
        match &self.kind {
            TraceKind::Arrived { process } => format!("{} arrived", process),
            TraceKind::IoStarted {
                process,
                io_end_time,
            } => format!("{} sent to I/O (ends t={})", process, io_end_time),
            TraceKind::IoCompleted { process } => {
                format!("{} completed I/O, back to ready", process)
            }
            TraceKind::Dispatched { process, kind } => match kind {
                DispatchKind::Direct => format!("{} started execution", process),
                DispatchKind::Resumed => {
                    format!("{} resumed without context switch", process)
                }
                DispatchKind::AfterSwitch => format!("{} loaded onto CPU", process),
            },
            TraceKind::ContextSwitchStarted { end_time } => {
                format!("Context switch started (ends at t={})", end_time)
            }
            TraceKind::ContextSwitchCompleted => "Context switch completed".to_string(),
            TraceKind::Preempted { process } => {
                format!("{} preempted (quantum expired)", process)
            }
            TraceKind::Completed {
                process,
                completion_time,
            } => format!("{} completed at t={}", process, completion_time),
            TraceKind::Idle { from, to } => format!("CPU idle from t={} to t={}", from, to),
        }
    }

    /// Converts the event to a structured log entry
    pub fn to_log_entry(&self, run_id: RunId) -> LogEntry {
        let level = match self.kind {
            TraceKind::Idle { .. } => LogLevel::Debug,
            _ => LogLevel::Info,
        };
        let mut entry = LogEntry::new(level, self.describe())
            .with_source(run_id)
            .at_tick(self.time);
        if let Some(process) = self.process() {
            entry = entry.with_field("process", process);
        }
        match &self.kind {
            TraceKind::IoStarted { io_end_time, .. } => {
                entry = entry.with_field("io_end_time", io_end_time);
            }
            TraceKind::Dispatched { kind, .. } => {
                entry = entry.with_field("dispatch", format!("{:?}", kind));
            }
            TraceKind::ContextSwitchStarted { end_time } => {
                entry = entry.with_field("end_time", end_time);
            }
            TraceKind::Completed {
                completion_time, ..
            } => {
                entry = entry.with_field("completion_time", completion_time);
            }
            TraceKind::Idle { from, to } => {
                entry = entry.with_field("from", from).with_field("to", to);
            }
            _ => {}
        }
        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_dispatch_kinds() {
        let id = ProcessId::new(2);
        let resumed = TraceEvent::new(
            4,
            TraceKind::Dispatched {
                process: id,
                kind: DispatchKind::Resumed,
            },
        );
        assert_eq!(resumed.describe(), "P2 resumed without context switch");
        assert_eq!(resumed.process(), Some(id));
    }

    #[test]
    fn test_log_entry_fields() {
        let run_id = RunId::new();
        let event = TraceEvent::new(
            3,
            TraceKind::IoStarted {
                process: ProcessId::new(1),
                io_end_time: 7,
            },
        );
        let entry = event.to_log_entry(run_id);
        assert_eq!(entry.level, LogLevel::Info);
        assert_eq!(entry.source, Some(run_id));
        assert_eq!(entry.tick, Some(3));
        assert_eq!(entry.field("process"), Some("P1"));
        assert_eq!(entry.field("io_end_time"), Some("7"));
    }

    #[test]
    fn test_idle_logs_at_debug() {
        let event = TraceEvent::new(0, TraceKind::Idle { from: 0, to: 5 });
        let entry = event.to_log_entry(RunId::new());
        assert_eq!(entry.level, LogLevel::Debug);
        assert_eq!(entry.message, "CPU idle from t=0 to t=5");
        assert_eq!(event.process(), None);
    }
}
