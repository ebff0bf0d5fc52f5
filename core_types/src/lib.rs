//! # Core Types
//!
//! This crate defines the fundamental types shared across the RRSim crates.
//!
//! ## Philosophy
//!
//! - **Explicit over implicit**: Processes and runs have distinct id types that
//!   cannot be confused.
//! - **Stable labels**: A process id is its input ordinal, so traces and
//!   reports read the same across runs.
//!
//! ## Key Types
//!
//! - [`ProcessId`]: 1-based identifier for a simulated process
//! - [`RunId`]: Unique identifier for one simulation run
//! - [`BurstMode`]: Single-burst or multi-burst process lifecycles

pub mod ids;
pub mod mode;

pub use ids::{ProcessId, RunId};
pub use mode::BurstMode;
