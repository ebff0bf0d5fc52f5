//! Engine error types

use core_types::ProcessId;
use thiserror::Error;

/// Errors reported while validating a simulation configuration
///
/// Validation happens before any simulation state is built, so a
/// configuration error always means nothing was started.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Process count outside the supported range
    #[error("Process count must be between 1 and {max}, got {count}")]
    ProcessCount { count: usize, max: usize },

    /// Time quantum of zero
    #[error("Time quantum must be at least 1")]
    ZeroQuantum,

    /// Process declared no CPU bursts
    #[error("{0} has no CPU bursts")]
    NoBursts(ProcessId),

    /// Process declared more bursts than the mode allows
    #[error("{id} has {count} bursts, at most {max} allowed in {mode} mode")]
    TooManyBursts {
        id: ProcessId,
        count: usize,
        max: usize,
        mode: core_types::BurstMode,
    },

    /// Burst of length zero
    #[error("{id} burst {burst} must be positive")]
    ZeroBurst { id: ProcessId, burst: usize },

    /// Arrival time above the supported bound
    #[error("{id} arrival time {arrival} exceeds {max}")]
    ArrivalTooLarge { id: ProcessId, arrival: u64, max: u64 },

    /// Burst length above the supported bound
    #[error("{id} burst of {burst} ticks exceeds {max}")]
    BurstTooLarge { id: ProcessId, burst: u64, max: u64 },

    /// I/O duration above the supported bound
    #[error("{id} I/O duration {io} exceeds {max}")]
    IoTooLarge { id: ProcessId, io: u64, max: u64 },

    /// Context-switch time above the supported bound
    #[error("Context switch time {time} exceeds {max}")]
    ContextSwitchTooLarge { time: u64, max: u64 },

    /// I/O list does not have exactly one entry between each pair of bursts
    #[error("{id} needs {expected} I/O durations, got {actual}")]
    IoCountMismatch {
        id: ProcessId,
        expected: usize,
        actual: usize,
    },
}

/// A broken state-machine invariant
///
/// These are programming errors, never caller errors. The scheduler asserts
/// on them in debug builds and tests check them explicitly.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("{0} appears in more than one of ready, I/O and executing")]
    DuplicateMembership(ProcessId),

    #[error("Completed process {0} is still scheduled")]
    CompletedButScheduled(ProcessId),

    #[error("Timeline spans {span} ticks but current time is {now}")]
    TimelineSpan { span: u64, now: u64 },

    #[error("Timeline segments are not contiguous at tick {0}")]
    TimelineGap(u64),

    #[error("Busy {busy} + idle {idle} + switch {switch} ticks do not add up to {now}")]
    TickAccounting {
        busy: u64,
        idle: u64,
        switch: u64,
        now: u64,
    },

    #[error("{id} executed {executed} ticks, remaining demand {remaining}, total {total}")]
    BurstAccounting {
        id: ProcessId,
        executed: u64,
        remaining: u64,
        total: u64,
    },

    #[error("Unknown process {0} referenced by a queue")]
    UnknownProcess(ProcessId),
}
