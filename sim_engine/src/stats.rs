//! Statistics reporter

use crate::process::Process;
use crate::state::SimulationState;
use core_types::{ProcessId, RunId};
use serde::{Deserialize, Serialize};

/// Result row for one completed process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessReport {
    pub id: ProcessId,
    pub arrival_time: u64,
    pub total_burst: u64,
    pub completion_time: u64,
    pub turnaround_time: u64,
    pub waiting_time: u64,
    pub response_time: Option<u64>,
}

impl ProcessReport {
    /// Builds the row, or `None` if the process has not completed
    pub fn from_process(process: &Process) -> Option<Self> {
        let completion_time = process.completion_time?;
        let turnaround_time = process.turnaround_time()?;
        let waiting_time = process.waiting_time()?;
        Some(Self {
            id: process.id,
            arrival_time: process.arrival_time,
            total_burst: process.total_burst(),
            completion_time,
            turnaround_time,
            waiting_time,
            response_time: process.response_time,
        })
    }
}

/// Aggregate metrics for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_time: u64,
    pub completed: usize,
    pub average_waiting_time: f64,
    pub average_turnaround_time: f64,
    pub average_response_time: f64,
    pub cpu_utilization: f64,
    pub throughput: f64,
    pub context_switches: u64,
    pub idle_time: u64,
}

impl Statistics {
    /// Aggregates over the given rows
    ///
    /// A total time of zero is treated as one tick for the ratios.
    pub fn compute(
        rows: &[ProcessReport],
        total_time: u64,
        idle_time: u64,
        context_switches: u64,
    ) -> Self {
        let completed = rows.len();
        let waiting: u64 = rows.iter().map(|r| r.waiting_time).sum();
        let turnaround: u64 = rows.iter().map(|r| r.turnaround_time).sum();
        let response: u64 = rows.iter().filter_map(|r| r.response_time).sum();
        let ratio_base = total_time.max(1) as f64;

        Self {
            total_time,
            completed,
            average_waiting_time: mean(waiting, completed),
            average_turnaround_time: mean(turnaround, completed),
            average_response_time: mean(response, completed),
            cpu_utilization: total_time.saturating_sub(idle_time) as f64 / ratio_base,
            throughput: completed as f64 / ratio_base,
            context_switches,
            idle_time,
        }
    }
}

fn mean(total: u64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64
    }
}

/// Per-process table plus aggregates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub run_id: RunId,
    pub processes: Vec<ProcessReport>,
    pub statistics: Statistics,
}

impl SimulationReport {
    /// Builds a report from the completed processes of `state`
    ///
    /// Rows are ordered by process id.
    pub fn from_state(run_id: RunId, state: &SimulationState) -> Self {
        let mut processes: Vec<ProcessReport> = state
            .processes()
            .iter()
            .filter_map(ProcessReport::from_process)
            .collect();
        processes.sort_by_key(|row| row.id);

        let statistics = Statistics::compute(
            &processes,
            state.current_time(),
            state.idle_time(),
            state.context_switches(),
        );

        Self {
            run_id,
            processes,
            statistics,
        }
    }

    pub fn row(&self, id: ProcessId) -> Option<&ProcessReport> {
        self.processes.iter().find(|row| row.id == id)
    }
}
