//! # Host Runtime
//!
//! The driver loop that ties the engine, the command script, and output
//! together.

use crate::command_script::{CommandScript, CommandScriptError};
use crate::commands::DriverCommand;
use sim_engine::{
    ConfigError, CpuView, Scheduler, SimulationConfig, SimulationReport, SimulationView,
    TraceEvent,
};
use sim_logger::{LogBuffer, LogLevel};
use std::thread;
use std::time::Duration;
use thiserror::Error;

/// Delay between played ticks at speed 1.0
pub const BASE_STEP_DELAY: Duration = Duration::from_millis(800);

/// Lower bound on the delay between played ticks
pub const MIN_STEP_DELAY: Duration = Duration::from_millis(20);

/// Host runtime error types
#[derive(Debug, Error)]
pub enum HostRuntimeError {
    #[error("Script error: {0}")]
    ScriptError(#[from] CommandScriptError),

    #[error("Config error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("Render error: {0}")]
    RenderError(#[from] serde_json::Error),

    #[error("Invalid playback speed: {0}")]
    InvalidSpeed(f64),
}

/// Play-mode pacing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playback {
    speed: f64,
}

impl Playback {
    /// Creates a pacing policy; `speed` must be finite and positive
    pub fn new(speed: f64) -> Result<Self, HostRuntimeError> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(HostRuntimeError::InvalidSpeed(speed));
        }
        Ok(Self { speed })
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Wall-clock delay between played ticks
    pub fn step_delay(&self) -> Duration {
        let millis = (BASE_STEP_DELAY.as_millis() as f64 / self.speed).round() as u64;
        Duration::from_millis(millis).max(MIN_STEP_DELAY)
    }
}

/// Host runtime configuration
#[derive(Debug, Clone)]
pub struct HostRuntimeConfig {
    /// Optional command script; without one the runtime runs to completion
    pub script: Option<String>,
    /// Maximum ticks to advance (0 = unlimited)
    pub max_steps: usize,
    /// Play-mode speed multiplier
    pub speed: f64,
    /// Whether play mode sleeps between ticks
    pub realtime: bool,
    /// Whether trace events are printed
    pub trace: bool,
    /// Whether views and reports are printed as JSON
    pub json: bool,
}

impl Default for HostRuntimeConfig {
    fn default() -> Self {
        Self {
            script: None,
            max_steps: 0,
            speed: 1.0,
            realtime: false,
            trace: false,
            json: false,
        }
    }
}

/// Host runtime state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HostState {
    /// Executing script commands
    Running,
    /// Advancing one tick per step
    Playing { remaining: Option<usize> },
    /// Shutting down
    Shutdown,
}

/// Host runtime
pub struct HostRuntime {
    /// Configuration
    config: HostRuntimeConfig,
    /// Simulation engine
    scheduler: Scheduler,
    /// Commands still to execute
    script: CommandScript,
    /// Play-mode pacing
    playback: Playback,
    /// Current state
    state: HostState,
    /// Loop step counter
    steps: usize,
    /// Ticks advanced, counted against `max_steps`
    ticks: usize,
    /// Trace entries awaiting output
    log: LogBuffer,
    /// Number of trace events already forwarded to `log`
    trace_cursor: usize,
    /// Last event forwarded, as it was when forwarded
    last_forwarded: Option<TraceEvent>,
    /// Rendered output lines not yet taken by the caller
    output: Vec<String>,
}

impl HostRuntime {
    /// Creates a new host runtime
    pub fn new(
        config: HostRuntimeConfig,
        simulation: SimulationConfig,
    ) -> Result<Self, HostRuntimeError> {
        let scheduler = Scheduler::new(simulation)?;
        let playback = Playback::new(config.speed)?;

        let script = match &config.script {
            Some(text) => CommandScript::from_text(text)?,
            None => CommandScript::from_commands([DriverCommand::Run, DriverCommand::Stats]),
        };

        Ok(Self {
            config,
            scheduler,
            script,
            playback,
            state: HostState::Running,
            steps: 0,
            ticks: 0,
            log: LogBuffer::new(LogLevel::Debug),
            trace_cursor: 0,
            last_forwarded: None,
            output: Vec::new(),
        })
    }

    /// Returns true while there is work left
    ///
    /// Stops after `quit`, once the tick limit is hit, or when the script
    /// is exhausted and no playback is pending.
    pub fn is_running(&self) -> bool {
        match self.state {
            HostState::Shutdown => false,
            HostState::Playing { .. } => true,
            HostState::Running => self.script.has_more(),
        }
    }

    /// Runs the driver loop to the end
    pub fn run(&mut self) -> Result<(), HostRuntimeError> {
        while self.is_running() {
            self.step()?;
        }
        Ok(())
    }

    /// Executes one step of the driver loop
    ///
    /// A step is either one played tick or one script command.
    pub fn step(&mut self) -> Result<(), HostRuntimeError> {
        match self.state {
            HostState::Playing { remaining } => self.play_tick(remaining)?,
            HostState::Running => {
                if let Some(command) = self.script.next_command() {
                    self.execute_command(command)?;
                }
            }
            HostState::Shutdown => {}
        }
        self.steps += 1;
        Ok(())
    }

    /// Executes a single driver command
    pub fn execute_command(&mut self, command: DriverCommand) -> Result<(), HostRuntimeError> {
        match command {
            DriverCommand::Step { count } => {
                self.advance(count);
                self.render_status(true)?;
            }
            DriverCommand::Back { count } => {
                for _ in 0..count {
                    if !self.scheduler.step_back() {
                        self.emit("Already at the beginning");
                        break;
                    }
                }
                let trace = self.scheduler.state().trace();
                self.trace_cursor = self.trace_cursor.min(trace.len());
                self.last_forwarded = self
                    .trace_cursor
                    .checked_sub(1)
                    .and_then(|i| trace.get(i))
                    .cloned();
                self.render_status(true)?;
            }
            DriverCommand::Play { count } => {
                if self.scheduler.is_finished() {
                    self.emit("Simulation finished");
                } else {
                    self.state = HostState::Playing { remaining: count };
                }
            }
            DriverCommand::Run => {
                self.advance(usize::MAX);
                self.render_status(true)?;
            }
            DriverCommand::Reset => {
                self.scheduler.reset();
                self.trace_cursor = 0;
                self.last_forwarded = None;
                self.emit(format!("Reset ({})", self.scheduler.run_id()));
                self.render_status(true)?;
            }
            DriverCommand::Status => self.render_status(true)?,
            DriverCommand::Stats => match self.scheduler.report() {
                Some(report) => self.render_report(&report)?,
                None => {
                    let state = self.scheduler.state();
                    let message = format!(
                        "Simulation not finished (t={}, {}/{} completed)",
                        state.current_time(),
                        state.completed_count(),
                        state.processes().len()
                    );
                    self.emit(message);
                }
            },
            DriverCommand::Quit => self.state = HostState::Shutdown,
        }
        Ok(())
    }

    fn play_tick(&mut self, remaining: Option<usize>) -> Result<(), HostRuntimeError> {
        if self.config.realtime {
            thread::sleep(self.playback.step_delay());
        }

        self.advance(1);
        self.render_status(false)?;

        if self.state == HostState::Shutdown {
            return Ok(());
        }
        let remaining = remaining.map(|n| n.saturating_sub(1));
        self.state = if self.scheduler.is_finished() || remaining == Some(0) {
            HostState::Running
        } else {
            HostState::Playing { remaining }
        };
        Ok(())
    }

    /// Advances up to `count` ticks, honouring the tick limit
    fn advance(&mut self, count: usize) -> usize {
        let mut advanced = 0;
        while advanced < count && !self.scheduler.is_finished() {
            if self.config.max_steps > 0 && self.ticks >= self.config.max_steps {
                self.emit(format!(
                    "Tick limit reached at t={}",
                    self.scheduler.current_time()
                ));
                self.state = HostState::Shutdown;
                break;
            }
            let result = self.scheduler.advance_tick();
            advanced += 1;
            self.ticks += 1;
            if result.finished {
                break;
            }
        }
        self.forward_trace();
        advanced
    }

    /// Moves new trace events into the log buffer and out as lines
    ///
    /// An already forwarded event that has since been extended (a growing
    /// idle period) is forwarded again with its new bounds.
    fn forward_trace(&mut self) {
        let trace = self.scheduler.state().trace();
        let start = self.trace_cursor.min(trace.len());
        let changed = start
            .checked_sub(1)
            .and_then(|i| trace.get(i))
            .filter(|event| self.last_forwarded.as_ref() != Some(*event));

        if self.config.trace {
            let run_id = self.scheduler.run_id();
            for event in changed.into_iter().chain(&trace[start..]) {
                self.log.push(event.to_log_entry(run_id));
            }
        }
        self.trace_cursor = trace.len();
        self.last_forwarded = trace.last().cloned();

        for entry in self.log.drain() {
            let line = if self.config.json {
                serde_json::to_string(&entry).unwrap_or_else(|_| entry.to_string())
            } else {
                entry.to_string()
            };
            self.output.push(line);
        }
    }

    fn render_status(&mut self, with_timeline: bool) -> Result<(), HostRuntimeError> {
        let view = self.scheduler.view();
        if self.config.json {
            let line = serde_json::to_string(&view)?;
            self.emit(line);
            return Ok(());
        }

        let status = format_status(&view);
        let timeline = format!("Timeline: {}", view.timeline);
        self.emit(status);
        if with_timeline {
            self.emit(timeline);
        }
        Ok(())
    }

    fn render_report(&mut self, report: &SimulationReport) -> Result<(), HostRuntimeError> {
        if self.config.json {
            let line = serde_json::to_string(report)?;
            self.emit(line);
            return Ok(());
        }
        for line in format_report(report) {
            self.emit(line);
        }
        Ok(())
    }

    fn emit(&mut self, line: impl Into<String>) {
        self.output.push(line.into());
    }

    /// Takes the output produced since the last call
    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    /// Output produced and not yet taken
    pub fn output(&self) -> &[String] {
        &self.output
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn playback(&self) -> Playback {
        self.playback
    }

    pub fn step_count(&self) -> usize {
        self.steps
    }

    /// Ticks advanced since the runtime started, including undone ones
    pub fn tick_count(&self) -> usize {
        self.ticks
    }
}

/// One-line summary of a view
pub fn format_status(view: &SimulationView<'_>) -> String {
    let cpu = match view.cpu {
        CpuView::Idle => "idle".to_string(),
        CpuView::Executing {
            id,
            remaining_time,
            quantum_remaining,
        } => format!(
            "{} (remaining {}, quantum {})",
            id, remaining_time, quantum_remaining
        ),
        CpuView::ContextSwitch { end_time } => format!("context switch (until t={})", end_time),
    };

    let ready = if view.ready.is_empty() {
        "-".to_string()
    } else {
        view.ready
            .iter()
            .map(|entry| format!("{}({})", entry.id, entry.remaining_time))
            .collect::<Vec<_>>()
            .join(" ")
    };

    let io = if view.io.is_empty() {
        "-".to_string()
    } else {
        view.io
            .iter()
            .map(|entry| format!("{}(until t={})", entry.id, entry.io_end_time))
            .collect::<Vec<_>>()
            .join(" ")
    };

    let mut line = format!("t={} | CPU: {} | Ready: {} | I/O: {}", view.time, cpu, ready, io);
    if view.finished {
        line.push_str(" | finished");
    }
    line
}

/// Per-process table followed by the aggregate statistics
pub fn format_report(report: &SimulationReport) -> Vec<String> {
    let stats = &report.statistics;
    let mut lines = vec![
        format!("{} finished at t={}", report.run_id, stats.total_time),
        format!(
            "{:<4} {:>7} {:>6} {:>10} {:>10} {:>7} {:>8}",
            "PID", "Arrival", "Burst", "Completion", "Turnaround", "Waiting", "Response"
        ),
    ];

    for row in &report.processes {
        let response = row
            .response_time
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".to_string());
        lines.push(format!(
            "{:<4} {:>7} {:>6} {:>10} {:>10} {:>7} {:>8}",
            row.id.to_string(),
            row.arrival_time,
            row.total_burst,
            row.completion_time,
            row.turnaround_time,
            row.waiting_time,
            response
        ));
    }

    lines.push(format!(
        "Average waiting time:    {:.2}",
        stats.average_waiting_time
    ));
    lines.push(format!(
        "Average turnaround time: {:.2}",
        stats.average_turnaround_time
    ));
    lines.push(format!(
        "Average response time:   {:.2}",
        stats.average_response_time
    ));
    lines.push(format!(
        "CPU utilization:         {:.2}%",
        stats.cpu_utilization * 100.0
    ));
    lines.push(format!(
        "Throughput:              {:.3} processes/tick",
        stats.throughput
    ));
    lines.push(format!("Context switches:        {}", stats.context_switches));
    lines.push(format!("Idle time:               {}", stats.idle_time));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_engine::ProcessSpec;

    fn simulation() -> SimulationConfig {
        SimulationConfig::single(
            2,
            vec![
                ProcessSpec::single(0, 4),
                ProcessSpec::single(1, 2),
                ProcessSpec::single(2, 6),
            ],
        )
    }

    fn runtime(script: &str) -> HostRuntime {
        let config = HostRuntimeConfig {
            script: Some(script.to_string()),
            ..HostRuntimeConfig::default()
        };
        HostRuntime::new(config, simulation()).unwrap()
    }

    #[test]
    fn test_step_delay_scales_with_speed() {
        assert_eq!(
            Playback::new(1.0).unwrap().step_delay(),
            Duration::from_millis(800)
        );
        assert_eq!(
            Playback::new(3.0).unwrap().step_delay(),
            Duration::from_millis(267)
        );
        assert_eq!(
            Playback::new(100.0).unwrap().step_delay(),
            MIN_STEP_DELAY
        );
    }

    #[test]
    fn test_invalid_speed_rejected() {
        assert!(matches!(
            Playback::new(0.0),
            Err(HostRuntimeError::InvalidSpeed(_))
        ));
        assert!(Playback::new(-2.0).is_err());
        assert!(Playback::new(f64::NAN).is_err());
    }

    #[test]
    fn test_default_runs_to_completion() {
        let mut runtime = HostRuntime::new(HostRuntimeConfig::default(), simulation()).unwrap();
        runtime.run().unwrap();
        assert!(runtime.scheduler().is_finished());
        assert_eq!(runtime.scheduler().current_time(), 12);
        let output = runtime.take_output();
        assert!(output.iter().any(|l| l.starts_with("Average waiting time:    2.33")));
    }

    #[test]
    fn test_step_and_back() {
        let mut runtime = runtime("step 3\nback 2");
        runtime.run().unwrap();
        assert_eq!(runtime.scheduler().current_time(), 1);
        assert_eq!(runtime.tick_count(), 3);
    }

    #[test]
    fn test_back_at_start() {
        let mut runtime = runtime("back");
        runtime.run().unwrap();
        assert_eq!(runtime.output()[0], "Already at the beginning");
    }

    #[test]
    fn test_play_advances_one_tick_per_step() {
        let mut runtime = runtime("play 3\nstatus");
        runtime.step().unwrap();
        assert_eq!(runtime.scheduler().current_time(), 0);
        runtime.step().unwrap();
        runtime.step().unwrap();
        runtime.step().unwrap();
        assert_eq!(runtime.scheduler().current_time(), 3);
        assert!(runtime.is_running());
        runtime.step().unwrap();
        assert!(!runtime.is_running());
    }

    #[test]
    fn test_stats_before_finish() {
        let mut runtime = runtime("stats");
        runtime.run().unwrap();
        assert_eq!(
            runtime.output()[0],
            "Simulation not finished (t=0, 0/3 completed)"
        );
    }

    #[test]
    fn test_quit_stops_script() {
        let mut runtime = runtime("quit\nrun");
        runtime.run().unwrap();
        assert_eq!(runtime.scheduler().current_time(), 0);
        assert_eq!(runtime.step_count(), 1);
    }

    #[test]
    fn test_tick_limit() {
        let config = HostRuntimeConfig {
            max_steps: 4,
            ..HostRuntimeConfig::default()
        };
        let mut runtime = HostRuntime::new(config, simulation()).unwrap();
        runtime.run().unwrap();
        assert_eq!(runtime.scheduler().current_time(), 4);
        assert!(!runtime.scheduler().is_finished());
        assert!(runtime
            .output()
            .iter()
            .any(|l| l == "Tick limit reached at t=4"));
    }

    #[test]
    fn test_format_status_line() {
        let mut runtime = runtime("step 1");
        runtime.run().unwrap();
        assert_eq!(
            runtime.output()[0],
            "t=1 | CPU: P1 (remaining 3, quantum 1) | Ready: - | I/O: -"
        );
        assert_eq!(runtime.output()[1], "Timeline: P1[0,1)");
    }
}
