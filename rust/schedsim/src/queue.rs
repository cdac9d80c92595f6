//! Run queue simulation.
//!
//! A [`RunQueue`] is either FIFO or keyed. The mode is fixed when the
//! queue is created and every insertion must go through the matching
//! ordering; a queue never mixes the two.
//!
//! Keyed queues order by `(key, arrival, insertion order)`: lower key
//! wins, ties go to the earlier arrival, and remaining ties go to the
//! process that was inserted first. A key is captured at insertion time.
//! A queued process's key cannot change while it waits (only the running
//! process consumes CPU, and virtual finish time only advances on
//! requeue), so re-inserting on every requeue keeps the order current.

use std::collections::{BTreeMap, VecDeque};

use crate::types::{Pid, Tick};

/// Ordering discipline of a [`RunQueue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueOrder {
    /// Insertion order.
    Fifo,
    /// Smallest [`QueueKey`] first.
    Keyed,
}

/// Priority of a queued process under a keyed ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct QueueKey {
    /// Primary key: remaining time, total burst, or virtual finish time.
    pub key: u64,
    /// First tie-breaker.
    pub arrival: Tick,
}

#[derive(Debug)]
enum Entries {
    Fifo(VecDeque<Pid>),
    /// (key, insertion_order) -> pid. The insertion order is the final
    /// tie-breaker.
    Keyed(BTreeMap<(QueueKey, u64), Pid>),
}

/// A queue of process identifiers.
#[derive(Debug)]
pub struct RunQueue {
    entries: Entries,
    /// Monotonic counter for insertion ordering.
    insertion_counter: u64,
}

impl RunQueue {
    pub fn new(order: QueueOrder) -> Self {
        let entries = match order {
            QueueOrder::Fifo => Entries::Fifo(VecDeque::new()),
            QueueOrder::Keyed => Entries::Keyed(BTreeMap::new()),
        };
        RunQueue {
            entries,
            insertion_counter: 0,
        }
    }

    pub fn fifo() -> Self {
        Self::new(QueueOrder::Fifo)
    }

    pub fn keyed() -> Self {
        Self::new(QueueOrder::Keyed)
    }

    pub fn order(&self) -> QueueOrder {
        match self.entries {
            Entries::Fifo(_) => QueueOrder::Fifo,
            Entries::Keyed(_) => QueueOrder::Keyed,
        }
    }

    /// Insert a process. FIFO queues ignore `key`.
    pub fn push(&mut self, pid: Pid, key: QueueKey) {
        let order = self.insertion_counter;
        self.insertion_counter += 1;
        match &mut self.entries {
            Entries::Fifo(q) => q.push_back(pid),
            Entries::Keyed(map) => {
                map.insert((key, order), pid);
            }
        }
    }

    /// Remove and return the highest-priority process.
    ///
    /// For keyed queues this is the smallest key; for FIFO queues the head.
    pub fn pop(&mut self) -> Option<Pid> {
        match &mut self.entries {
            Entries::Fifo(q) => q.pop_front(),
            Entries::Keyed(map) => map.pop_first().map(|(_, pid)| pid),
        }
    }

    /// The process `pop` would return, with its key if the queue is keyed.
    pub fn peek_min(&self) -> Option<(Pid, Option<QueueKey>)> {
        match &self.entries {
            Entries::Fifo(q) => q.front().map(|&pid| (pid, None)),
            Entries::Keyed(map) => map
                .first_key_value()
                .map(|(&(key, _), &pid)| (pid, Some(key))),
        }
    }

    pub fn len(&self) -> usize {
        match &self.entries {
            Entries::Fifo(q) => q.len(),
            Entries::Keyed(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All queued processes in pop order, without consuming.
    pub fn ordered_pids(&self) -> Vec<Pid> {
        match &self.entries {
            Entries::Fifo(q) => q.iter().copied().collect(),
            Entries::Keyed(map) => map.values().copied().collect(),
        }
    }

    pub fn contains(&self, pid: Pid) -> bool {
        match &self.entries {
            Entries::Fifo(q) => q.contains(&pid),
            Entries::Keyed(map) => map.values().any(|&p| p == pid),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: u64, arrival: Tick) -> QueueKey {
        QueueKey { key, arrival }
    }

    #[test]
    fn test_fifo_ignores_keys() {
        let mut q = RunQueue::fifo();
        q.push(Pid(3), key(9, 0));
        q.push(Pid(1), key(1, 0));
        q.push(Pid(2), key(5, 0));
        assert_eq!(q.ordered_pids(), vec![Pid(3), Pid(1), Pid(2)]);
        assert_eq!(q.pop(), Some(Pid(3)));
        assert_eq!(q.pop(), Some(Pid(1)));
        assert_eq!(q.pop(), Some(Pid(2)));
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn test_keyed_lower_key_wins() {
        let mut q = RunQueue::keyed();
        q.push(Pid(0), key(10, 0));
        q.push(Pid(1), key(3, 5));
        q.push(Pid(2), key(7, 1));
        assert_eq!(q.peek_min(), Some((Pid(1), Some(key(3, 5)))));
        assert_eq!(q.ordered_pids(), vec![Pid(1), Pid(2), Pid(0)]);
    }

    #[test]
    fn test_keyed_tie_breaks_on_arrival_then_insertion() {
        let mut q = RunQueue::keyed();
        q.push(Pid(0), key(4, 6));
        q.push(Pid(1), key(4, 2));
        q.push(Pid(2), key(4, 2));
        q.push(Pid(3), key(4, 0));
        assert_eq!(q.pop(), Some(Pid(3)));
        assert_eq!(q.pop(), Some(Pid(1)));
        assert_eq!(q.pop(), Some(Pid(2)));
        assert_eq!(q.pop(), Some(Pid(0)));
        assert!(q.is_empty());
    }

    #[test]
    fn test_reinsert_uses_fresh_key() {
        let mut q = RunQueue::keyed();
        q.push(Pid(0), key(8, 0));
        q.push(Pid(1), key(6, 0));
        assert_eq!(q.pop(), Some(Pid(1)));
        // Pid 1 ran and shrank; on requeue its new key applies.
        q.push(Pid(1), key(2, 0));
        assert_eq!(q.peek_min().map(|(pid, _)| pid), Some(Pid(1)));
        assert!(q.contains(Pid(0)));
        assert_eq!(q.len(), 2);
    }
}
