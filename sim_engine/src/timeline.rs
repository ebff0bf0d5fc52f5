//! Timeline recorder
//!
//! Run-length encoded record of what occupied the CPU over time. Consecutive
//! ticks with the same occupant collapse into a single [`Segment`], so the
//! timeline has one entry per contiguous activity rather than one per tick.

use core_types::ProcessId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What occupied the CPU during a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Occupant {
    /// A process executing its burst
    Process(ProcessId),
    /// Nothing to run
    Idle,
    /// Switching between two different processes
    ContextSwitch,
}

impl fmt::Display for Occupant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Occupant::Process(id) => write!(f, "{}", id),
            Occupant::Idle => f.write_str("IDLE"),
            Occupant::ContextSwitch => f.write_str("CS"),
        }
    }
}

/// A half-open interval `[start, end)` with a single occupant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub occupant: Occupant,
    pub start: u64,
    pub end: u64,
}

impl Segment {
    pub fn new(occupant: Occupant, start: u64, end: u64) -> Self {
        Self {
            occupant,
            start,
            end,
        }
    }

    /// Number of ticks covered
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{},{})", self.occupant, self.start, self.end)
    }
}

/// Ordered, merged list of CPU segments
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    segments: Vec<Segment>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `[start, end)` for `occupant`
    ///
    /// Extends the last segment when it has the same occupant and ends at
    /// `start`; otherwise appends a new segment. Empty intervals are ignored.
    pub fn record(&mut self, occupant: Occupant, start: u64, end: u64) {
        if end <= start {
            return;
        }
        if let Some(last) = self.segments.last_mut() {
            if last.occupant == occupant && last.end == start {
                last.end = end;
                return;
            }
        }
        self.segments.push(Segment::new(occupant, start, end));
    }

    /// Records a single tick starting at `start`
    pub fn record_tick(&mut self, occupant: Occupant, start: u64) {
        self.record(occupant, start, start + 1);
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// End of the last segment, or 0 when empty
    pub fn span(&self) -> u64 {
        self.segments.last().map(|s| s.end).unwrap_or(0)
    }

    /// Ticks spent executing processes
    pub fn busy_ticks(&self) -> u64 {
        self.ticks_where(|o| matches!(o, Occupant::Process(_)))
    }

    pub fn idle_ticks(&self) -> u64 {
        self.ticks_where(|o| *o == Occupant::Idle)
    }

    pub fn context_switch_ticks(&self) -> u64 {
        self.ticks_where(|o| *o == Occupant::ContextSwitch)
    }

    /// Ticks executed by one process
    pub fn ticks_for(&self, id: ProcessId) -> u64 {
        self.ticks_where(|o| *o == Occupant::Process(id))
    }

    /// Returns the first tick where segments are not contiguous from zero
    pub fn first_gap(&self) -> Option<u64> {
        let mut expected = 0;
        for segment in &self.segments {
            if segment.start != expected || segment.is_empty() {
                return Some(expected);
            }
            expected = segment.end;
        }
        None
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    fn ticks_where<F>(&self, predicate: F) -> u64
    where
        F: Fn(&Occupant) -> bool,
    {
        self.segments
            .iter()
            .filter(|s| predicate(&s.occupant))
            .map(Segment::len)
            .sum()
    }
}

impl fmt::Display for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.segments {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{}", segment)?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(n: u32) -> Occupant {
        Occupant::Process(ProcessId::new(n))
    }

    #[test]
    fn test_consecutive_ticks_merge() {
        let mut timeline = Timeline::new();
        timeline.record_tick(p(1), 0);
        timeline.record_tick(p(1), 1);
        timeline.record_tick(p(1), 2);
        assert_eq!(timeline.segments(), &[Segment::new(p(1), 0, 3)]);
    }

    #[test]
    fn test_occupant_change_starts_new_segment() {
        let mut timeline = Timeline::new();
        timeline.record_tick(p(1), 0);
        timeline.record_tick(p(2), 1);
        timeline.record_tick(p(1), 2);
        assert_eq!(timeline.len(), 3);
        assert_eq!(timeline.to_string(), "P1[0,1) P2[1,2) P1[2,3)");
    }

    #[test]
    fn test_idle_range_is_one_segment() {
        let mut timeline = Timeline::new();
        timeline.record(Occupant::Idle, 0, 5);
        timeline.record_tick(Occupant::Idle, 5);
        assert_eq!(timeline.segments(), &[Segment::new(Occupant::Idle, 0, 6)]);
        assert_eq!(timeline.idle_ticks(), 6);
    }

    #[test]
    fn test_same_occupant_with_gap_does_not_merge() {
        let mut timeline = Timeline::new();
        timeline.record_tick(p(1), 0);
        timeline.record_tick(p(1), 2);
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline.first_gap(), Some(1));
    }

    #[test]
    fn test_empty_interval_ignored() {
        let mut timeline = Timeline::new();
        timeline.record(Occupant::Idle, 3, 3);
        assert!(timeline.is_empty());
        assert_eq!(timeline.span(), 0);
    }

    #[test]
    fn test_tick_accounting() {
        let mut timeline = Timeline::new();
        timeline.record(p(1), 0, 2);
        timeline.record(Occupant::ContextSwitch, 2, 4);
        timeline.record(p(2), 4, 5);
        timeline.record(Occupant::Idle, 5, 7);
        timeline.record(p(1), 7, 8);
        assert_eq!(timeline.busy_ticks(), 4);
        assert_eq!(timeline.context_switch_ticks(), 2);
        assert_eq!(timeline.idle_ticks(), 2);
        assert_eq!(timeline.ticks_for(ProcessId::new(1)), 3);
        assert_eq!(timeline.span(), 8);
        assert_eq!(timeline.first_gap(), None);
    }
}
