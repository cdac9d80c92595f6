//! Scheduling policies.
//!
//! A policy never touches the queues or the clock. The engine asks it how
//! to order the ready queue, what key a process carries, whether a
//! process may hold the CPU past a quantum, and whether a waiting process
//! should preempt the running one. Everything else (arrival, dispatch,
//! I/O, metrics) is shared by all policies and lives in the engine.

use std::fmt;
use std::str::FromStr;

use crate::queue::{QueueKey, QueueOrder};
use crate::task::SimProcess;
use crate::types::Tick;

/// Why a process is being (re-)inserted into the ready queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyReason {
    /// First time ready, at its arrival tick.
    Arrival,
    /// Ran for a full quantum without finishing or blocking.
    QuantumExpired,
    /// Displaced by a better process before its slice ended.
    Preempted,
    /// Finished an I/O episode.
    IoComplete,
}

/// Decision rules that distinguish one scheduling policy from another.
pub trait Policy {
    /// Short display name.
    fn name(&self) -> &'static str;

    /// How the ready queue is ordered.
    fn queue_order(&self) -> QueueOrder;

    /// Time slice granted per dispatch, or `None` to run until the
    /// process completes, blocks, or is preempted.
    fn quantum(&self) -> Option<Tick> {
        None
    }

    /// Whether processes' I/O fields are honored by default.
    fn handles_io(&self) -> bool {
        false
    }

    /// Update per-policy bookkeeping before a process is queued.
    fn on_ready(&self, _proc: &mut SimProcess, _reason: ReadyReason) {}

    /// Ordering key for a process. Ignored by FIFO queues.
    fn key(&self, proc: &SimProcess) -> QueueKey;

    /// Whether the best waiting process (with key `best`) should take the
    /// CPU from `running` at the start of a tick.
    fn should_preempt(&self, _running: &SimProcess, _best: QueueKey) -> bool {
        false
    }
}

impl<P: Policy + ?Sized> Policy for Box<P> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn queue_order(&self) -> QueueOrder {
        (**self).queue_order()
    }

    fn quantum(&self) -> Option<Tick> {
        (**self).quantum()
    }

    fn handles_io(&self) -> bool {
        (**self).handles_io()
    }

    fn on_ready(&self, proc: &mut SimProcess, reason: ReadyReason) {
        (**self).on_ready(proc, reason)
    }

    fn key(&self, proc: &SimProcess) -> QueueKey {
        (**self).key(proc)
    }

    fn should_preempt(&self, running: &SimProcess, best: QueueKey) -> bool {
        (**self).should_preempt(running, best)
    }
}

fn fifo_key(proc: &SimProcess) -> QueueKey {
    QueueKey {
        key: 0,
        arrival: proc.arrival,
    }
}

/// First-come first-served with a fixed quantum. A process that uses up
/// its quantum goes to the tail of the ready queue.
#[derive(Debug, Clone, Copy)]
pub struct RoundRobin {
    quantum: Tick,
}

impl RoundRobin {
    pub fn new(quantum: Tick) -> Self {
        RoundRobin { quantum }
    }
}

impl Policy for RoundRobin {
    fn name(&self) -> &'static str {
        "RR"
    }

    fn queue_order(&self) -> QueueOrder {
        QueueOrder::Fifo
    }

    fn quantum(&self) -> Option<Tick> {
        Some(self.quantum)
    }

    fn key(&self, proc: &SimProcess) -> QueueKey {
        fifo_key(proc)
    }
}

/// Round robin ordered by virtual finish time.
///
/// A process's virtual finish time starts at `arrival + quantum` and
/// advances by one quantum every time the process uses up a slice. The
/// ready process with the smallest virtual finish time runs next. An I/O
/// episode leaves the virtual finish time untouched, so a process that
/// blocked early is favored when it comes back.
#[derive(Debug, Clone, Copy)]
pub struct VirtualRoundRobin {
    quantum: Tick,
}

impl VirtualRoundRobin {
    pub fn new(quantum: Tick) -> Self {
        VirtualRoundRobin { quantum }
    }
}

impl Policy for VirtualRoundRobin {
    fn name(&self) -> &'static str {
        "VRR"
    }

    fn queue_order(&self) -> QueueOrder {
        QueueOrder::Keyed
    }

    fn quantum(&self) -> Option<Tick> {
        Some(self.quantum)
    }

    fn on_ready(&self, proc: &mut SimProcess, reason: ReadyReason) {
        match reason {
            ReadyReason::Arrival => {
                proc.vfinish = crate::types::Vtime(proc.arrival).advance(self.quantum);
            }
            ReadyReason::QuantumExpired => {
                proc.vfinish = proc.vfinish.advance(self.quantum);
            }
            ReadyReason::Preempted | ReadyReason::IoComplete => {}
        }
    }

    fn key(&self, proc: &SimProcess) -> QueueKey {
        QueueKey {
            key: proc.vfinish.0,
            arrival: proc.arrival,
        }
    }
}

/// Shortest job first, non-preemptive. The key is the total CPU burst,
/// so a process returning from I/O competes with its full burst.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortestJobFirst;

impl ShortestJobFirst {
    pub fn new() -> Self {
        ShortestJobFirst
    }
}

impl Policy for ShortestJobFirst {
    fn name(&self) -> &'static str {
        "SJF"
    }

    fn queue_order(&self) -> QueueOrder {
        QueueOrder::Keyed
    }

    fn handles_io(&self) -> bool {
        true
    }

    fn key(&self, proc: &SimProcess) -> QueueKey {
        QueueKey {
            key: proc.cpu_burst,
            arrival: proc.arrival,
        }
    }
}

/// Shortest remaining time first, preemptive, re-evaluated every tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortestRemainingTime {
    io: bool,
}

impl ShortestRemainingTime {
    /// CPU-only variant: I/O fields are ignored.
    pub fn new() -> Self {
        ShortestRemainingTime { io: false }
    }

    /// Variant that honors periodic I/O.
    pub fn with_io() -> Self {
        ShortestRemainingTime { io: true }
    }
}

impl Policy for ShortestRemainingTime {
    fn name(&self) -> &'static str {
        if self.io {
            "SRTF-IO"
        } else {
            "SRTF"
        }
    }

    fn queue_order(&self) -> QueueOrder {
        QueueOrder::Keyed
    }

    fn handles_io(&self) -> bool {
        self.io
    }

    fn key(&self, proc: &SimProcess) -> QueueKey {
        QueueKey {
            key: proc.remaining,
            arrival: proc.arrival,
        }
    }

    // The running process keeps the CPU on a full tie.
    fn should_preempt(&self, running: &SimProcess, best: QueueKey) -> bool {
        best < self.key(running)
    }
}

/// Policy selector used by the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    RoundRobin,
    VirtualRoundRobin,
    ShortestJobFirst,
    ShortestRemainingTime,
    ShortestRemainingTimeIo,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 5] = [
        PolicyKind::RoundRobin,
        PolicyKind::VirtualRoundRobin,
        PolicyKind::ShortestJobFirst,
        PolicyKind::ShortestRemainingTime,
        PolicyKind::ShortestRemainingTimeIo,
    ];

    /// Construct the policy. `quantum` is ignored by policies without one.
    pub fn build(self, quantum: Tick) -> Box<dyn Policy> {
        match self {
            PolicyKind::RoundRobin => Box::new(RoundRobin::new(quantum)),
            PolicyKind::VirtualRoundRobin => Box::new(VirtualRoundRobin::new(quantum)),
            PolicyKind::ShortestJobFirst => Box::new(ShortestJobFirst::new()),
            PolicyKind::ShortestRemainingTime => Box::new(ShortestRemainingTime::new()),
            PolicyKind::ShortestRemainingTimeIo => Box::new(ShortestRemainingTime::with_io()),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            PolicyKind::RoundRobin => "rr",
            PolicyKind::VirtualRoundRobin => "vrr",
            PolicyKind::ShortestJobFirst => "sjf",
            PolicyKind::ShortestRemainingTime => "srtf",
            PolicyKind::ShortestRemainingTimeIo => "srtf-io",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for PolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        PolicyKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = PolicyKind::ALL.iter().map(|k| k.as_str()).collect();
                format!("unknown policy {s:?}; expected one of {}", names.join(", "))
            })
    }
}
