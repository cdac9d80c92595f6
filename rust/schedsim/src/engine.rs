//! Tick-driven simulation engine.
//!
//! This is the core of the simulator. It owns the process table, the
//! ready queue, the I/O device, and the clock, and drives the policy one
//! tick at a time. Every tick runs the same fixed sequence:
//!
//! 1. admit processes whose arrival time equals the clock
//! 2. let the policy preempt the running process, then dispatch if the
//!    CPU is free
//! 3. run the CPU occupant for one unit and handle completion, blocking,
//!    or quantum expiry
//! 4. advance the I/O device (progress, then admission)
//! 5. advance the clock
//!
//! When the CPU, the ready queue, and the I/O subsystem are all empty the
//! clock jumps straight to the next arrival.

use std::cell::Cell;
use std::fmt;

use tracing::{debug, info, warn};

use crate::io::IoDevice;
use crate::policy::{Policy, ReadyReason};
use crate::queue::RunQueue;
use crate::scenario::Scenario;
use crate::stats::{ProcessMetrics, Summary};
use crate::task::{ExecOutcome, ProcState, SimProcess};
use crate::trace::{NullReporter, Reporter, TickRecord, Trace, TraceKind};
use crate::types::{Pid, Tick};

thread_local! {
    static SIM_CLOCK: Cell<Tick> = const { Cell::new(0) };
}

/// The simulated clock of the run in progress on this thread.
///
/// Read by the log formatter so log lines carry simulated time.
pub fn sim_clock() -> Tick {
    SIM_CLOCK.with(|c| c.get())
}

fn set_sim_clock(tick: Tick) {
    SIM_CLOCK.with(|c| c.set(tick));
}

/// Errors that abort a simulation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// The workload contains no processes.
    EmptyWorkload,
    /// Two processes share a name.
    DuplicateName { name: String },
    /// A process requires no CPU time.
    ZeroBurst { name: String },
    /// A quantum-based policy was configured with a zero quantum.
    ZeroQuantum,
    /// Live processes remain but none can ever make progress.
    Stalled { tick: Tick },
    /// The clock reached the configured watchdog limit.
    Watchdog { tick: Tick, limit: Tick },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::EmptyWorkload => write!(f, "workload has no processes"),
            SimError::DuplicateName { name } => write!(f, "duplicate process name {name:?}"),
            SimError::ZeroBurst { name } => {
                write!(f, "process {name:?} has a CPU burst of 0")
            }
            SimError::ZeroQuantum => write!(f, "quantum must be at least 1 tick"),
            SimError::Stalled { tick } => {
                write!(f, "simulation stalled at tick {tick}: no process can make progress")
            }
            SimError::Watchdog { tick, limit } => {
                write!(f, "watchdog fired at tick {tick} (limit {limit})")
            }
        }
    }
}

impl std::error::Error for SimError {}

/// Output of a completed run.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub trace: Trace,
    pub summary: Summary,
}

/// Mutable state of one run.
struct SimState<'r> {
    clock: Tick,
    procs: Vec<SimProcess>,
    ready: RunQueue,
    io: IoDevice,
    running: Option<Pid>,
    terminated: usize,
    trace: Trace,
    reporter: &'r mut dyn Reporter,
}

impl SimState<'_> {
    fn emit(&mut self, kind: TraceKind) {
        let event = self.trace.record(self.clock, kind);
        self.reporter.on_event(event);
    }

    fn proc(&self, pid: Pid) -> &SimProcess {
        &self.procs[pid.index()]
    }

    /// Tick of the earliest arrival not yet admitted.
    fn next_arrival(&self) -> Option<Tick> {
        self.procs
            .iter()
            .filter(|p| p.state == ProcState::Unarrived)
            .map(|p| p.arrival)
            .min()
    }

    fn cpu_idle(&self) -> bool {
        self.running.is_none() && self.ready.is_empty() && self.io.is_idle()
    }
}

/// The main simulator.
pub struct Simulator<P: Policy> {
    policy: P,
}

impl<P: Policy> Simulator<P> {
    pub fn new(policy: P) -> Self {
        Simulator { policy }
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Run a scenario and return the trace and metrics.
    pub fn run(&self, scenario: Scenario) -> Result<SimulationResult, SimError> {
        self.run_with_reporter(scenario, &mut NullReporter)
    }

    /// Run a scenario, streaming trace output to `reporter` as it is
    /// produced.
    pub fn run_with_reporter(
        &self,
        scenario: Scenario,
        reporter: &mut dyn Reporter,
    ) -> Result<SimulationResult, SimError> {
        scenario.validate()?;
        if self.policy.quantum() == Some(0) {
            return Err(SimError::ZeroQuantum);
        }

        let io_enabled = scenario.io.unwrap_or_else(|| self.policy.handles_io());
        let procs: Vec<SimProcess> = scenario
            .processes
            .iter()
            .enumerate()
            .map(|(i, def)| SimProcess::new(Pid(i as u32), def, io_enabled))
            .collect();
        let names = procs.iter().map(|p| p.name.clone()).collect();

        let mut state = SimState {
            clock: 0,
            procs,
            ready: RunQueue::new(self.policy.queue_order()),
            io: IoDevice::new(),
            running: None,
            terminated: 0,
            trace: Trace::new(names),
            reporter,
        };

        set_sim_clock(0);
        info!(
            policy = self.policy.name(),
            processes = state.procs.len(),
            io = io_enabled,
            "simulation start"
        );

        while state.terminated < state.procs.len() {
            if state.cpu_idle() {
                self.fast_forward(&mut state)?;
            }
            set_sim_clock(state.clock);

            if let Some(limit) = scenario.max_ticks {
                if state.clock >= limit {
                    warn!(limit, "watchdog fired");
                    return Err(SimError::Watchdog {
                        tick: state.clock,
                        limit,
                    });
                }
            }

            self.admit_arrivals(&mut state);
            self.preempt_and_dispatch(&mut state);
            let cpu = self.execute(&mut state);
            let io = self.advance_io(&mut state);

            let record = TickRecord {
                tick: state.clock,
                cpu,
                io,
                ready: state.ready.ordered_pids(),
                io_queue: state.io.queued(),
            };
            let record = state.trace.record_tick(record);
            state.reporter.on_tick(record);

            state.clock += 1;
        }

        set_sim_clock(state.clock);
        let metrics: Vec<ProcessMetrics> = state
            .procs
            .iter()
            .filter_map(ProcessMetrics::from_process)
            .collect();
        let summary = Summary::new(metrics, state.clock);
        info!(
            ticks = state.clock,
            avg_waiting = summary.avg_waiting,
            avg_turnaround = summary.avg_turnaround,
            "simulation complete"
        );

        Ok(SimulationResult {
            trace: state.trace,
            summary,
        })
    }

    /// Jump the clock to the next arrival when nothing can run.
    fn fast_forward(&self, state: &mut SimState) -> Result<(), SimError> {
        let Some(next) = state.next_arrival() else {
            warn!(terminated = state.terminated, "no runnable, blocked, or pending process");
            return Err(SimError::Stalled { tick: state.clock });
        };
        if next > state.clock {
            debug!(from = state.clock, until = next, "idle fast-forward");
            state.emit(TraceKind::Idle { until: next });
            state.clock = next;
        }
        Ok(())
    }

    /// Insert a process into the ready queue under the policy's key.
    fn make_ready(&self, state: &mut SimState, pid: Pid, reason: ReadyReason) {
        let proc = &mut state.procs[pid.index()];
        self.policy.on_ready(proc, reason);
        let key = self.policy.key(proc);
        state.ready.push(pid, key);
    }

    fn admit_arrivals(&self, state: &mut SimState) {
        for i in 0..state.procs.len() {
            if state.procs[i].arrive(state.clock) {
                let pid = Pid(i as u32);
                debug!(process = state.procs[i].name.as_str(), "arrived");
                state.emit(TraceKind::Arrived { pid });
                self.make_ready(state, pid, ReadyReason::Arrival);
            }
        }
    }

    fn preempt_and_dispatch(&self, state: &mut SimState) {
        if let Some(pid) = state.running {
            let best = state.ready.peek_min().and_then(|(_, key)| key);
            if let Some(best) = best {
                if self.policy.should_preempt(state.proc(pid), best) {
                    info!(
                        process = state.proc(pid).name.as_str(),
                        remaining = state.proc(pid).remaining,
                        "PREEMPTED"
                    );
                    state.procs[pid.index()].preempt();
                    state.running = None;
                    state.emit(TraceKind::Preempted { pid });
                    self.make_ready(state, pid, ReadyReason::Preempted);
                }
            }
        }

        if state.running.is_none() {
            if let Some(pid) = state.ready.pop() {
                let clock = state.clock;
                let proc = &mut state.procs[pid.index()];
                proc.dispatch(clock);
                debug!(
                    process = proc.name.as_str(),
                    remaining = proc.remaining,
                    "dispatch"
                );
                state.running = Some(pid);
                state.emit(TraceKind::Dispatched { pid });
            }
        }
    }

    /// Run the CPU occupant for one unit. Returns the occupant and its
    /// remaining demand before the unit.
    fn execute(&self, state: &mut SimState) -> Option<(Pid, Tick)> {
        let pid = state.running?;
        let clock = state.clock;
        let proc = &mut state.procs[pid.index()];
        let before = proc.remaining;

        match proc.tick_execute(clock) {
            ExecOutcome::Completed => {
                info!(process = proc.name.as_str(), completion = clock + 1, "COMPLETED");
                state.running = None;
                state.terminated += 1;
                state.emit(TraceKind::Completed { pid });
            }
            ExecOutcome::Blocked => {
                debug!(
                    process = proc.name.as_str(),
                    remaining = proc.remaining,
                    "blocked on I/O"
                );
                state.running = None;
                state.io.enqueue(&state.procs[pid.index()]);
                state.emit(TraceKind::Blocked { pid });
            }
            ExecOutcome::Continue => {
                let expired = self
                    .policy
                    .quantum()
                    .is_some_and(|q| proc.slice_used >= q);
                if expired {
                    debug!(
                        process = proc.name.as_str(),
                        remaining = proc.remaining,
                        "quantum expired"
                    );
                    proc.preempt();
                    state.running = None;
                    state.emit(TraceKind::QuantumExpired { pid });
                    self.make_ready(state, pid, ReadyReason::QuantumExpired);
                }
            }
        }

        Some((pid, before))
    }

    fn advance_io(&self, state: &mut SimState) -> Option<(Pid, Tick)> {
        let step = state.io.step(&mut state.procs);

        if let Some(pid) = step.completed {
            debug!(process = state.proc(pid).name.as_str(), "I/O complete");
            state.emit(TraceKind::IoCompleted { pid });
            self.make_ready(state, pid, ReadyReason::IoComplete);
        }
        if let Some(pid) = step.admitted {
            debug!(process = state.proc(pid).name.as_str(), "I/O start");
            state.emit(TraceKind::IoStarted { pid });
        }

        step.served
    }
}
