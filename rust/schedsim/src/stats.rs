//! Per-process timing metrics and run-wide aggregates.
//!
//! All metrics are derived from the timestamps a process carries at the
//! end of the run (arrival, first dispatch, completion). Nothing is
//! accumulated tick by tick.
//!
//! - **Turnaround**: completion - arrival
//! - **Waiting**: turnaround - CPU burst
//! - **Response**: first dispatch - arrival

use serde::Serialize;

use crate::task::SimProcess;
use crate::types::{Pid, Tick};

/// Timing metrics of one completed process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessMetrics {
    pub pid: Pid,
    pub name: String,
    pub arrival: Tick,
    pub cpu_burst: Tick,
    pub completion: Tick,
    pub turnaround: Tick,
    pub waiting: Tick,
    pub response: Tick,
}

impl ProcessMetrics {
    /// Derive metrics from a terminated process. Returns `None` if the
    /// process has not completed.
    pub fn from_process(proc: &SimProcess) -> Option<Self> {
        let completion = proc.completion?;
        let first = proc.first_dispatch?;
        let turnaround = completion - proc.arrival;
        Some(ProcessMetrics {
            pid: proc.pid,
            name: proc.name.clone(),
            arrival: proc.arrival,
            cpu_burst: proc.cpu_burst,
            completion,
            turnaround,
            waiting: turnaround - proc.cpu_burst,
            response: first - proc.arrival,
        })
    }
}

/// Metrics for a whole run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// One entry per process, in workload order.
    pub processes: Vec<ProcessMetrics>,
    /// Elapsed ticks from 0 until the last completion.
    pub total_ticks: Tick,
    pub avg_turnaround: f64,
    pub avg_waiting: f64,
    pub avg_response: f64,
    /// Processes completed per tick.
    pub throughput: f64,
}

impl Summary {
    pub fn new(processes: Vec<ProcessMetrics>, total_ticks: Tick) -> Self {
        let n = processes.len();
        let mean = |f: fn(&ProcessMetrics) -> Tick| -> f64 {
            if n == 0 {
                0.0
            } else {
                processes.iter().map(f).sum::<Tick>() as f64 / n as f64
            }
        };
        let avg_turnaround = mean(|m| m.turnaround);
        let avg_waiting = mean(|m| m.waiting);
        let avg_response = mean(|m| m.response);
        let throughput = if total_ticks == 0 {
            0.0
        } else {
            n as f64 / total_ticks as f64
        };
        Summary {
            processes,
            total_ticks,
            avg_turnaround,
            avg_waiting,
            avg_response,
            throughput,
        }
    }

    /// Look up a process's metrics by name.
    pub fn get(&self, name: &str) -> Option<&ProcessMetrics> {
        self.processes.iter().find(|m| m.name == name)
    }
}
