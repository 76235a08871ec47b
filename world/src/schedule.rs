//! Deferred work keyed on the simulated clock.
//!
//! Tasks carry the epoch of the entity they touch; the world discards a task
//! whose entity disappeared or moved on to a later epoch.

use std::{cmp::Ordering, collections::BinaryHeap, time::Duration};

use zombie_survival_core::{TargetId, ZombieId};

/// Work scheduled to run once the clock reaches its due time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DeferredTask {
    /// Releases a zombie after its death animation.
    RemoveZombie { zombie: ZombieId, epoch: u64 },
    /// Restores the base material of a flashed target.
    RevertFlash { target: TargetId, epoch: u64 },
}

#[derive(Debug)]
struct Entry {
    due: Duration,
    sequence: u64,
    task: DeferredTask,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.sequence == other.sequence
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Min-ordered queue of deferred tasks. Ties run in scheduling order.
#[derive(Debug, Default)]
pub(crate) struct TaskQueue {
    entries: BinaryHeap<Entry>,
    next_sequence: u64,
}

impl TaskQueue {
    pub(crate) fn schedule(&mut self, due: Duration, task: DeferredTask) {
        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.wrapping_add(1);
        self.entries.push(Entry {
            due,
            sequence,
            task,
        });
    }

    /// Removes and returns every task due at or before `now`, earliest first.
    pub(crate) fn drain_due(&mut self, now: Duration) -> Vec<DeferredTask> {
        let mut due = Vec::new();
        while self.entries.peek().is_some_and(|entry| entry.due <= now) {
            if let Some(entry) = self.entries.pop() {
                due.push(entry.task);
            }
        }
        due
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_only_due_tasks_in_order() {
        let mut queue = TaskQueue::default();
        let late = DeferredTask::RemoveZombie {
            zombie: ZombieId::new(1),
            epoch: 1,
        };
        let early = DeferredTask::RevertFlash {
            target: TargetId::new(3),
            epoch: 0,
        };
        let tied = DeferredTask::RevertFlash {
            target: TargetId::new(4),
            epoch: 0,
        };
        queue.schedule(Duration::from_millis(200), late);
        queue.schedule(Duration::from_millis(100), early);
        queue.schedule(Duration::from_millis(100), tied);

        assert!(queue.drain_due(Duration::from_millis(50)).is_empty());
        assert_eq!(
            queue.drain_due(Duration::from_millis(150)),
            vec![early, tied]
        );
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.drain_due(Duration::from_secs(1)), vec![late]);
    }
}
