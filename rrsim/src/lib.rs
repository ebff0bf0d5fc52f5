//! # RRSim Host Runtime
//!
//! This crate provides the host driver for the round-robin simulator.
//!
//! ## Philosophy
//!
//! - **Host owns I/O**: The engine never prints or sleeps
//! - **Output is view rendering**: Status lines are built from engine views
//! - **Input is explicit commands**: Scripts, not terminal state
//! - **Deterministic mode is first-class**: Wall-clock pacing is opt-in
//!
//! ## Responsibilities
//!
//! The host runtime:
//! - Loads and validates a JSON simulation configuration
//! - Runs a driver loop (command → advance → render)
//! - Paces play mode against the wall clock when asked
//! - Forwards the execution trace as structured log entries
//!
//! ## Non-Responsibilities
//!
//! The host does NOT:
//! - Make scheduling decisions
//! - Keep its own copy of simulation state

pub mod command_script;
pub mod commands;
pub mod config_file;
pub mod runtime;

pub use command_script::{CommandScript, CommandScriptError};
pub use commands::{CommandError, DriverCommand, DriverCommandParser};
pub use config_file::{ConfigLoadError, ConfigLoader};
pub use runtime::{
    format_report, format_status, HostRuntime, HostRuntimeConfig, HostRuntimeError, Playback,
};
