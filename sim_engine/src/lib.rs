//! # Simulation Engine
//!
//! This crate provides the round-robin CPU scheduling engine.
//!
//! ## Purpose
//!
//! The engine answers "what does the CPU do at every tick?" for a small set
//! of processes:
//! - Preemptive round-robin with a fixed time quantum
//! - Optional multi-burst processes with I/O waits between bursts
//! - Optional context-switch cost between different processes
//! - Idle periods that skip straight to the next event
//! - Undo history at tick granularity
//!
//! ## Philosophy
//!
//! **The engine is a pure state machine.**
//!
//! It never sleeps, prints, or reads files. Drivers own pacing and I/O and
//! consume [`SimulationView`] and [`SimulationReport`] values. Given the same
//! [`SimulationConfig`], two engines produce identical timelines, traces, and
//! statistics.

pub mod config;
pub mod error;
pub mod history;
pub mod process;
pub mod queue;
pub mod scheduler;
pub mod state;
pub mod stats;
pub mod timeline;
pub mod trace;
pub mod view;

pub use config::{ProcessSpec, SimulationConfig, MAX_PROCESSES, MAX_TIME_VALUE};
pub use error::{ConfigError, InvariantViolation};
pub use history::{History, Snapshot};
pub use process::{Process, ProcessState};
pub use queue::ProcessQueue;
pub use scheduler::{Scheduler, TickResult};
pub use state::SimulationState;
pub use stats::{ProcessReport, SimulationReport, Statistics};
pub use timeline::{Occupant, Segment, Timeline};
pub use trace::{DispatchKind, TraceEvent, TraceKind};
pub use view::{CpuView, IoEntry, ReadyEntry, SimulationView};
