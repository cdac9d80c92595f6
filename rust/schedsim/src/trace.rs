//! Trace recording for the simulator.
//!
//! Two streams are recorded. [`TraceEvent`]s are state transitions
//! (arrived, dispatched, blocked, ...). [`TickRecord`]s are one row per
//! simulated tick describing what occupied the CPU and the I/O device.
//! Ticks elided by an idle fast-forward produce a single
//! [`TraceKind::Idle`] event and no tick records.

use serde::Serialize;

use crate::types::{Pid, Tick};

/// A single transition produced by the simulator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceEvent {
    /// Tick during which the transition happened.
    pub tick: Tick,
    pub kind: TraceKind,
}

/// The type of transition recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceKind {
    /// The process reached its arrival time and joined the ready queue.
    Arrived { pid: Pid },
    /// The process was given the CPU.
    Dispatched { pid: Pid },
    /// A better process took the CPU away.
    Preempted { pid: Pid },
    /// The process used up its quantum and was requeued.
    QuantumExpired { pid: Pid },
    /// The I/O trigger fired; the process left the CPU for the I/O queue.
    Blocked { pid: Pid },
    /// The process was admitted onto the I/O device.
    IoStarted { pid: Pid },
    /// The I/O episode finished; the process rejoined the ready queue.
    IoCompleted { pid: Pid },
    /// The process consumed its last CPU unit.
    Completed { pid: Pid },
    /// Nothing to do until `until`; ticks `[event.tick, until)` were skipped.
    Idle { until: Tick },
}

/// What happened during one simulated tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickRecord {
    pub tick: Tick,
    /// CPU occupant and its remaining CPU demand at the start of the tick.
    pub cpu: Option<(Pid, Tick)>,
    /// I/O occupant that consumed a unit this tick, with its progress
    /// after that unit.
    pub io: Option<(Pid, Tick)>,
    /// Ready queue at the end of the tick, in pop order.
    pub ready: Vec<Pid>,
    /// I/O queue at the end of the tick (excluding the device occupant).
    pub io_queue: Vec<Pid>,
}

/// Receives trace output while a simulation runs.
///
/// The engine calls the reporter after recording each event and each
/// tick; both are also kept in the returned [`Trace`].
pub trait Reporter {
    fn on_event(&mut self, _event: &TraceEvent) {}

    fn on_tick(&mut self, _record: &TickRecord) {}
}

/// A reporter that discards everything.
#[derive(Debug, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {}

/// A complete simulation trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trace {
    names: Vec<String>,
    events: Vec<TraceEvent>,
    ticks: Vec<TickRecord>,
}

impl Trace {
    pub(crate) fn new(names: Vec<String>) -> Self {
        Self {
            names,
            events: Vec::new(),
            ticks: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, tick: Tick, kind: TraceKind) -> &TraceEvent {
        self.events.push(TraceEvent { tick, kind });
        &self.events[self.events.len() - 1]
    }

    pub(crate) fn record_tick(&mut self, record: TickRecord) -> &TickRecord {
        self.ticks.push(record);
        &self.ticks[self.ticks.len() - 1]
    }

    /// Resolve a PID to a process name, or `"???"` if unknown.
    pub fn name(&self, pid: Pid) -> &str {
        self.names
            .get(pid.index())
            .map(String::as_str)
            .unwrap_or("???")
    }

    /// Find a PID by process name.
    pub fn pid(&self, name: &str) -> Option<Pid> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| Pid(i as u32))
    }

    /// All transitions in chronological order.
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// All recorded ticks in chronological order.
    pub fn ticks(&self) -> &[TickRecord] {
        &self.ticks
    }

    /// Number of ticks the process occupied the CPU.
    pub fn cpu_time(&self, pid: Pid) -> Tick {
        self.ticks
            .iter()
            .filter(|t| matches!(t.cpu, Some((p, _)) if p == pid))
            .count() as Tick
    }

    /// Number of ticks the process consumed on the I/O device.
    pub fn io_time(&self, pid: Pid) -> Tick {
        self.ticks
            .iter()
            .filter(|t| matches!(t.io, Some((p, _)) if p == pid))
            .count() as Tick
    }

    /// Total CPU-busy ticks across all processes.
    pub fn busy_ticks(&self) -> Tick {
        self.ticks.iter().filter(|t| t.cpu.is_some()).count() as Tick
    }

    /// CPU-idle ticks, including ticks skipped by fast-forward.
    pub fn idle_ticks(&self) -> Tick {
        let recorded = self.ticks.iter().filter(|t| t.cpu.is_none()).count() as Tick;
        let skipped: Tick = self
            .events
            .iter()
            .map(|e| match e.kind {
                TraceKind::Idle { until } => until - e.tick,
                _ => 0,
            })
            .sum();
        recorded + skipped
    }

    /// Count the number of times a process was dispatched.
    pub fn dispatch_count(&self, pid: Pid) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e.kind, TraceKind::Dispatched { pid: p } if p == pid))
            .count()
    }

    /// Ticks at which the process was dispatched.
    pub fn dispatch_ticks(&self, pid: Pid) -> Vec<Tick> {
        self.events
            .iter()
            .filter(|e| matches!(e.kind, TraceKind::Dispatched { pid: p } if p == pid))
            .map(|e| e.tick)
            .collect()
    }

    /// Human-readable one-line description of an event.
    pub fn describe(&self, event: &TraceEvent) -> String {
        match &event.kind {
            TraceKind::Arrived { pid } => format!("ARRIVE   {}", self.name(*pid)),
            TraceKind::Dispatched { pid } => format!("SCHED    {}", self.name(*pid)),
            TraceKind::Preempted { pid } => format!("PREEMPT  {}", self.name(*pid)),
            TraceKind::QuantumExpired { pid } => format!("EXPIRED  {}", self.name(*pid)),
            TraceKind::Blocked { pid } => format!("BLOCK    {}", self.name(*pid)),
            TraceKind::IoStarted { pid } => format!("IO-START {}", self.name(*pid)),
            TraceKind::IoCompleted { pid } => format!("IO-DONE  {}", self.name(*pid)),
            TraceKind::Completed { pid } => format!("COMPLETE {}", self.name(*pid)),
            TraceKind::Idle { until } => format!("IDLE     until {until}"),
        }
    }

    /// Pretty-print the transitions for debugging.
    pub fn dump(&self) {
        for event in &self.events {
            eprintln!("[{:>8}] {}", event.tick, self.describe(event));
        }
    }
}
