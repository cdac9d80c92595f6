//! Newtype wrappers and type aliases for domain concepts.
//!
//! Process identifiers are newtypes so an index into the process table
//! cannot be confused with a tick count or a sort key. Plain quantities
//! (ticks) use a type alias.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of a process within one simulation run.
///
/// This is the index of the process in the engine's process table, in
/// workload order. Queues and the I/O device hold `Pid`s, never copies of
/// the process record, so a state change is visible wherever it is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pid(pub u32);

impl Pid {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Simulated time, in whole ticks.
pub type Tick = u64;

/// Virtual finish time used by Virtual Round Robin.
///
/// Opaque ordering key measured in ticks; smaller means "runs sooner".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
pub struct Vtime(pub u64);

impl Vtime {
    pub fn advance(self, quantum: Tick) -> Vtime {
        Vtime(self.0.saturating_add(quantum))
    }
}
