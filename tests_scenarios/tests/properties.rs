//! Scheduling Property Tests
//!
//! Generated workloads checked against whole-run properties:
//! - CPU time handed out equals CPU time demanded
//! - Every tick is accounted to exactly one occupant
//! - Reported metrics agree with the timeline

use core_types::BurstMode;
use sim_engine::{Occupant, ProcessSpec, SimulationConfig};
use tests_scenarios::{run_checked, WorkloadGenerator};

const SEEDS: std::ops::Range<u64> = 1..40;

fn workloads() -> Vec<SimulationConfig> {
    let mut configs = Vec::new();
    for seed in SEEDS {
        let mut generator = WorkloadGenerator::new(seed);
        configs.push(generator.config(BurstMode::Single));
        configs.push(generator.config(BurstMode::Multiple));
    }
    configs
}

#[test]
fn test_busy_ticks_equal_total_demand() {
    for config in workloads() {
        let demand: u64 = config.processes.iter().map(ProcessSpec::total_burst).sum();
        let scheduler = run_checked(config.clone());
        assert_eq!(
            scheduler.state().timeline().busy_ticks(),
            demand,
            "config: {:?}",
            config
        );
    }
}

#[test]
fn test_every_process_completes_with_full_service() {
    for config in workloads() {
        let scheduler = run_checked(config.clone());
        let state = scheduler.state();
        assert!(state.all_completed());

        for process in state.processes() {
            assert_eq!(
                state.timeline().ticks_for(process.id),
                process.total_burst(),
                "config: {:?}",
                config
            );
            let completion = process.completion_time.unwrap();
            assert!(completion >= process.arrival_time + process.total_burst());
            assert!(process.response_time.is_some());
        }
    }
}

#[test]
fn test_timeline_partitions_the_run() {
    for config in workloads() {
        let scheduler = run_checked(config);
        let state = scheduler.state();
        let timeline = state.timeline();

        assert_eq!(timeline.first_gap(), None);
        assert_eq!(timeline.span(), state.current_time());
        assert_eq!(
            timeline.busy_ticks() + timeline.idle_ticks() + timeline.context_switch_ticks(),
            state.current_time()
        );
        assert_eq!(timeline.idle_ticks(), state.idle_time());
    }
}

#[test]
fn test_single_mode_never_switches() {
    let mut generator = WorkloadGenerator::new(99);
    for _ in 0..30 {
        let mut config = generator.config(BurstMode::Single);
        config.context_switch_time = 3;
        let scheduler = run_checked(config);
        assert_eq!(scheduler.state().context_switches(), 0);
        assert_eq!(scheduler.state().timeline().context_switch_ticks(), 0);
    }
}

#[test]
fn test_switch_segments_separate_different_processes() {
    for config in workloads() {
        let switch_time = config.effective_context_switch_time();
        let scheduler = run_checked(config);
        let segments = scheduler.state().timeline().segments();

        for window in segments.windows(3) {
            if window[1].occupant == Occupant::ContextSwitch {
                assert_eq!(window[1].len(), switch_time);
                assert!(matches!(window[0].occupant, Occupant::Process(_)));
                assert!(matches!(window[2].occupant, Occupant::Process(_)));
                assert_ne!(window[0].occupant, window[2].occupant);
            }
        }
        assert_eq!(
            scheduler.state().timeline().context_switch_ticks(),
            scheduler.state().context_switches() * switch_time
        );
    }
}

#[test]
fn test_report_matches_process_metrics() {
    for config in workloads() {
        let scheduler = run_checked(config);
        let report = scheduler.report().unwrap();
        let stats = &report.statistics;

        assert_eq!(report.processes.len(), scheduler.state().processes().len());
        assert!(report.processes.windows(2).all(|w| w[0].id < w[1].id));
        for row in &report.processes {
            assert_eq!(row.turnaround_time, row.completion_time - row.arrival_time);
            assert_eq!(row.waiting_time, row.turnaround_time - row.total_burst);
        }

        assert_eq!(stats.total_time, scheduler.current_time());
        assert!(stats.cpu_utilization > 0.0 && stats.cpu_utilization <= 1.0);
    }
}
