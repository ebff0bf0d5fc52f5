//! Read-only views for renderers and drivers

use crate::state::SimulationState;
use crate::timeline::Timeline;
use crate::trace::TraceEvent;
use core_types::ProcessId;
use serde::Serialize;

/// A ready-queue member with its outstanding burst time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReadyEntry {
    pub id: ProcessId,
    pub remaining_time: u64,
}

/// An I/O-queue member with the tick its I/O completes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IoEntry {
    pub id: ProcessId,
    pub io_end_time: u64,
}

/// What the CPU is doing right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CpuView {
    Idle,
    Executing {
        id: ProcessId,
        remaining_time: u64,
        quantum_remaining: u64,
    },
    ContextSwitch {
        end_time: u64,
    },
}

/// Render-ready view of the simulation at a tick boundary
#[derive(Debug, Clone, Serialize)]
pub struct SimulationView<'a> {
    pub time: u64,
    pub ready: Vec<ReadyEntry>,
    pub io: Vec<IoEntry>,
    pub cpu: CpuView,
    pub timeline: &'a Timeline,
    pub trace: &'a [TraceEvent],
    pub finished: bool,
}

impl<'a> SimulationView<'a> {
    pub fn from_state(state: &'a SimulationState) -> Self {
        let ready = state
            .ready_queue()
            .iter()
            .filter_map(|id| state.process(id))
            .map(|p| ReadyEntry {
                id: p.id,
                remaining_time: p.remaining_time,
            })
            .collect();

        let io = state
            .io_queue()
            .iter()
            .filter_map(|id| state.process(id))
            .map(|p| IoEntry {
                id: p.id,
                io_end_time: p.io_end_time.unwrap_or(0),
            })
            .collect();

        let cpu = if state.in_context_switch() {
            CpuView::ContextSwitch {
                end_time: state.context_switch_end_time(),
            }
        } else {
            match state.executing().and_then(|id| state.process(id)) {
                Some(p) => CpuView::Executing {
                    id: p.id,
                    remaining_time: p.remaining_time,
                    quantum_remaining: state.quantum_remaining(),
                },
                None => CpuView::Idle,
            }
        };

        Self {
            time: state.current_time(),
            ready,
            io,
            cpu,
            timeline: state.timeline(),
            trace: state.trace(),
            finished: state.all_completed(),
        }
    }
}
