//! FIFO process queues
//!
//! Queues hold process ids, never process values. Membership is resolved
//! against the owning state's process table, which keeps snapshots
//! self-contained.

use core_types::ProcessId;
use std::collections::VecDeque;

/// FIFO queue of process ids
///
/// Ids are enqueued at the back and dequeued from the front.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessQueue {
    queue: VecDeque<ProcessId>,
}

impl ProcessQueue {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Rebuilds a queue from an ordered id list
    pub fn from_ids(ids: &[ProcessId]) -> Self {
        Self {
            queue: ids.iter().copied().collect(),
        }
    }

    pub fn enqueue(&mut self, id: ProcessId) {
        self.queue.push_back(id);
    }

    pub fn dequeue(&mut self) -> Option<ProcessId> {
        self.queue.pop_front()
    }

    pub fn front(&self) -> Option<ProcessId> {
        self.queue.front().copied()
    }

    pub fn contains(&self, id: ProcessId) -> bool {
        self.queue.contains(&id)
    }

    /// Removes every id matching the predicate, preserving order of the rest
    ///
    /// Returns the removed ids in queue order.
    pub fn drain_where<F>(&mut self, mut predicate: F) -> Vec<ProcessId>
    where
        F: FnMut(ProcessId) -> bool,
    {
        let mut removed = Vec::new();
        self.queue.retain(|&id| {
            if predicate(id) {
                removed.push(id);
                false
            } else {
                true
            }
        });
        removed
    }

    pub fn iter(&self) -> impl Iterator<Item = ProcessId> + '_ {
        self.queue.iter().copied()
    }

    /// Returns the ids in queue order
    pub fn to_ids(&self) -> Vec<ProcessId> {
        self.queue.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
