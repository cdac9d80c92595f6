//! schedsim - Deterministic tick-driven simulator for CPU scheduling policies.
//!
//! The simulator models one CPU and one I/O device. Processes alternate
//! between CPU bursts and I/O episodes; a pluggable policy decides who
//! holds the CPU at every tick. The run produces a per-tick trace and
//! per-process response, waiting, and turnaround metrics.
//!
//! # Architecture
//!
//! - **Engine**: tick loop that drives arrivals, dispatch, execution, and I/O
//! - **Tasks**: process records and their state transitions
//! - **Queues**: FIFO and keyed run queues holding process identifiers
//! - **I/O**: single-server device with its own FIFO queue
//! - **Policies**: RR, Virtual RR, SJF, SRTF, and SRTF with I/O
//!
//! # Usage
//!
//! ```rust
//! use schedsim::*;
//!
//! let scenario = Scenario::builder()
//!     .add_process("P0", 0, 8)
//!     .process(ProcessDef::new("P1", 2, 4).with_io(2, 3))
//!     .build()
//!     .unwrap();
//!
//! let result = Simulator::new(RoundRobin::new(3)).run(scenario).unwrap();
//! assert_eq!(result.summary.processes.len(), 2);
//! ```

pub mod engine;
pub mod fmt;
pub mod io;
pub mod policy;
pub mod queue;
pub mod report;
pub mod scenario;
pub mod stats;
pub mod task;
pub mod trace;
pub mod types;
pub mod workload;

// Re-export the main public types for convenience.
pub use engine::{sim_clock, SimError, SimulationResult, Simulator};
pub use fmt::{init_tracing, FmtTick, SimFormat};
pub use io::{IoDevice, IoStep};
pub use policy::{
    Policy, PolicyKind, ReadyReason, RoundRobin, ShortestJobFirst, ShortestRemainingTime,
    VirtualRoundRobin,
};
pub use queue::{QueueKey, QueueOrder, RunQueue};
pub use report::{write_json, write_metrics_table, TextReporter};
pub use scenario::{Scenario, ScenarioBuilder, DEFAULT_MAX_TICKS};
pub use stats::{ProcessMetrics, Summary};
pub use task::{ExecOutcome, IoBehavior, ProcState, ProcessDef, SimProcess};
pub use trace::{NullReporter, Reporter, TickRecord, Trace, TraceEvent, TraceKind};
pub use types::{Pid, Tick, Vtime};
pub use workload::{
    parse_json, parse_text, FileLoader, WorkloadError, WorkloadErrorKind, WorkloadFormat,
    WorkloadLoader,
};
