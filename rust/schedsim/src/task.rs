//! Process model for the simulator.
//!
//! A [`ProcessDef`] is the static description handed in by a workload
//! loader. At run time the engine turns each definition into a
//! [`SimProcess`], which carries the dynamic state and the transition
//! rules. A `SimProcess` has no scheduling logic of its own; the engine
//! decides when each transition happens.

use serde::{Deserialize, Serialize};

use crate::types::{Pid, Tick, Vtime};

/// The state a simulated process can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProcState {
    /// Arrival time has not been reached yet.
    Unarrived,
    /// Waiting in the ready queue.
    Ready,
    /// Occupying the CPU.
    Running,
    /// Waiting for, or using, the I/O device.
    Blocked,
    /// All CPU demand served.
    Terminated,
}

/// Periodic I/O behavior: after `interval` CPU units the process blocks
/// for `duration` I/O units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IoBehavior {
    pub interval: Tick,
    pub duration: Tick,
}

/// Static definition of a process, as produced by a workload loader.
///
/// `io_interval == 0` or `io_duration == 0` means the process never
/// performs I/O.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessDef {
    pub name: String,
    pub arrival: Tick,
    pub cpu_burst: Tick,
    #[serde(default)]
    pub io_interval: Tick,
    #[serde(default)]
    pub io_duration: Tick,
}

impl ProcessDef {
    /// A CPU-only process.
    pub fn new(name: impl Into<String>, arrival: Tick, cpu_burst: Tick) -> Self {
        ProcessDef {
            name: name.into(),
            arrival,
            cpu_burst,
            io_interval: 0,
            io_duration: 0,
        }
    }

    /// Attach periodic I/O to this process.
    pub fn with_io(mut self, interval: Tick, duration: Tick) -> Self {
        self.io_interval = interval;
        self.io_duration = duration;
        self
    }

    /// The I/O behavior, or `None` if either field is zero.
    pub fn io(&self) -> Option<IoBehavior> {
        if self.io_interval == 0 || self.io_duration == 0 {
            return None;
        }
        Some(IoBehavior {
            interval: self.io_interval,
            duration: self.io_duration,
        })
    }
}

/// Result of running a process for one CPU tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecOutcome {
    /// Remaining CPU demand reached zero.
    Completed,
    /// The I/O trigger fired; the process must go to the I/O queue.
    Blocked,
    /// Neither of the above.
    Continue,
}

/// A simulated process at runtime.
#[derive(Debug, Clone)]
pub struct SimProcess {
    pub pid: Pid,
    pub name: String,
    pub arrival: Tick,
    pub cpu_burst: Tick,
    /// Effective I/O behavior for this run (`None` when the policy or
    /// scenario disables I/O).
    pub io: Option<IoBehavior>,
    /// CPU units still required. Starts at `cpu_burst`, never negative.
    pub remaining: Tick,
    /// CPU units consumed since the last I/O episode (the I/O trigger counter).
    pub burst_since_io: Tick,
    /// I/O units consumed in the current I/O episode.
    pub io_elapsed: Tick,
    /// CPU units consumed since the last dispatch (quantum accounting).
    pub slice_used: Tick,
    pub state: ProcState,
    /// Tick of first CPU occupancy. Set exactly once.
    pub first_dispatch: Option<Tick>,
    /// End of the tick in which `remaining` hit zero. Set exactly once.
    pub completion: Option<Tick>,
    /// Virtual finish time, only meaningful under Virtual Round Robin.
    pub vfinish: Vtime,
}

impl SimProcess {
    pub fn new(pid: Pid, def: &ProcessDef, io_enabled: bool) -> Self {
        SimProcess {
            pid,
            name: def.name.clone(),
            arrival: def.arrival,
            cpu_burst: def.cpu_burst,
            io: if io_enabled { def.io() } else { None },
            remaining: def.cpu_burst,
            burst_since_io: 0,
            io_elapsed: 0,
            slice_used: 0,
            state: ProcState::Unarrived,
            first_dispatch: None,
            completion: None,
            vfinish: Vtime::default(),
        }
    }

    /// Unarrived -> Ready when the clock reaches the arrival time.
    /// Returns true if the transition happened.
    pub fn arrive(&mut self, clock: Tick) -> bool {
        if self.state == ProcState::Unarrived && self.arrival == clock {
            self.state = ProcState::Ready;
            return true;
        }
        false
    }

    /// Ready -> Running. Records the response-time anchor on the first
    /// dispatch only.
    pub fn dispatch(&mut self, tick: Tick) {
        debug_assert_eq!(self.state, ProcState::Ready, "dispatching {}", self.name);
        self.state = ProcState::Running;
        self.slice_used = 0;
        self.first_dispatch.get_or_insert(tick);
    }

    /// Running -> Ready without consuming anything.
    pub fn preempt(&mut self) {
        debug_assert_eq!(self.state, ProcState::Running);
        self.state = ProcState::Ready;
    }

    /// Consume one CPU unit during `tick`.
    ///
    /// Completion takes precedence over the I/O trigger: a process whose
    /// last CPU unit coincides with an I/O boundary terminates.
    pub fn tick_execute(&mut self, tick: Tick) -> ExecOutcome {
        debug_assert_eq!(self.state, ProcState::Running, "executing {}", self.name);
        debug_assert!(self.remaining > 0);

        self.remaining -= 1;
        self.slice_used += 1;
        self.burst_since_io += 1;

        if self.remaining == 0 {
            self.state = ProcState::Terminated;
            self.completion = Some(tick + 1);
            return ExecOutcome::Completed;
        }

        match self.io {
            Some(io) if self.burst_since_io >= io.interval => {
                self.burst_since_io = 0;
                self.io_elapsed = 0;
                self.state = ProcState::Blocked;
                ExecOutcome::Blocked
            }
            _ => ExecOutcome::Continue,
        }
    }

    /// Consume one I/O unit on the device. Returns true when the I/O
    /// episode is finished and the process is ready again.
    pub fn tick_io(&mut self) -> bool {
        debug_assert_eq!(self.state, ProcState::Blocked);
        self.io_elapsed += 1;
        let duration = self.io.map_or(0, |io| io.duration);
        if self.io_elapsed >= duration {
            self.io_elapsed = 0;
            self.state = ProcState::Ready;
            return true;
        }
        false
    }

    pub fn is_terminated(&self) -> bool {
        self.state == ProcState::Terminated
    }

    /// CPU units consumed so far.
    pub fn cpu_consumed(&self) -> Tick {
        self.cpu_burst - self.remaining
    }
}
