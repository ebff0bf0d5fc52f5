//! Scenario Test Utilities
//!
//! This crate provides shared fixtures for cross-crate scheduling tests.
//!
//! ## Test Philosophy
//!
//! - **Invariants every tick**: Helpers check the state after each advance,
//!   not just at the end
//! - **Deterministic workloads**: Generated configurations come from a
//!   seeded generator, so every failure is reproducible by seed
//! - **Readable expectations**: Timelines are compared as rendered strings

use core_types::BurstMode;
use sim_engine::{ProcessSpec, Scheduler, SimulationConfig};

/// Upper bound on advance calls for any fixture
pub const TICK_LIMIT: usize = 10_000;

/// Single-burst, quantum 2, staggered arrivals
pub fn staggered_single_burst() -> SimulationConfig {
    SimulationConfig::single(
        2,
        vec![
            ProcessSpec::single(0, 4),
            ProcessSpec::single(1, 2),
            ProcessSpec::single(2, 6),
        ],
    )
}

/// Two multi-burst processes whose I/O waits overlap
pub fn overlapping_io() -> SimulationConfig {
    SimulationConfig::multiple(
        4,
        0,
        vec![
            ProcessSpec::multi(0, vec![2, 2], vec![3]),
            ProcessSpec::multi(0, vec![2, 1], vec![1]),
        ],
    )
}

/// One late arrival
pub fn late_arrival() -> SimulationConfig {
    SimulationConfig::single(2, vec![ProcessSpec::single(5, 3)])
}

/// Two processes alternating with a two-tick switch cost
pub fn alternating_with_switch() -> SimulationConfig {
    SimulationConfig::multiple(
        2,
        2,
        vec![
            ProcessSpec::multi(0, vec![2, 1], vec![3]),
            ProcessSpec::single(0, 4),
        ],
    )
}

/// Builds a scheduler and advances it to completion
///
/// Panics if an invariant breaks, time goes backwards, a completed process
/// reverts, or the tick limit is hit.
pub fn run_checked(config: SimulationConfig) -> Scheduler {
    let mut scheduler = Scheduler::new(config).expect("valid configuration");
    let mut completed = 0;

    for _ in 0..TICK_LIMIT {
        let before = scheduler.current_time();
        let result = scheduler.advance_tick();
        let state = scheduler.state();

        if let Err(violation) = state.check_invariants() {
            panic!("invariant violated at t={}: {}", before, violation);
        }
        assert!(result.time >= before, "time went backwards at t={}", before);
        assert!(
            state.completed_count() >= completed,
            "completion reverted at t={}",
            before
        );
        completed = state.completed_count();

        if result.finished {
            return scheduler;
        }
    }
    panic!("simulation did not finish within {} ticks", TICK_LIMIT);
}

/// Rendered timeline segments, e.g. `["P1[0,2)", "CS[2,4)"]`
pub fn segments(scheduler: &Scheduler) -> Vec<String> {
    scheduler
        .state()
        .timeline()
        .segments()
        .iter()
        .map(|segment| segment.to_string())
        .collect()
}

/// Deterministic xorshift generator for workload fixtures
#[derive(Debug, Clone)]
pub struct WorkloadGenerator {
    state: u64,
}

impl WorkloadGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed.max(1),
        }
    }

    fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform value in `[low, high]`
    pub fn range(&mut self, low: u64, high: u64) -> u64 {
        low + self.next() % (high - low + 1)
    }

    /// Random valid configuration for the given mode
    pub fn config(&mut self, mode: BurstMode) -> SimulationConfig {
        let count = self.range(1, sim_engine::MAX_PROCESSES as u64) as usize;
        let processes = (0..count)
            .map(|_| {
                let arrival = self.range(0, 12);
                let bursts: Vec<u64> = (0..self.range(1, mode.max_bursts() as u64))
                    .map(|_| self.range(1, 6))
                    .collect();
                let ios = (1..bursts.len()).map(|_| self.range(0, 5)).collect();
                ProcessSpec::multi(arrival, bursts, ios)
            })
            .collect();

        let quantum = self.range(1, 4);
        match mode {
            BurstMode::Single => SimulationConfig::single(quantum, processes),
            BurstMode::Multiple => {
                let switch = self.range(0, 3);
                SimulationConfig::multiple(quantum, switch, processes)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_is_deterministic() {
        let a = WorkloadGenerator::new(7).config(BurstMode::Multiple);
        let b = WorkloadGenerator::new(7).config(BurstMode::Multiple);
        assert_eq!(a, b);
    }

    #[test]
    fn test_generated_configs_validate() {
        let mut generator = WorkloadGenerator::new(42);
        for mode in [BurstMode::Single, BurstMode::Multiple] {
            for _ in 0..50 {
                assert_eq!(generator.config(mode).validate(), Ok(()));
            }
        }
    }
}
