//! Reporters: human-readable tables and JSON export.

use std::io::{self, Write};

use serde::Serialize;

use crate::engine::SimulationResult;
use crate::stats::Summary;
use crate::trace::{Reporter, TickRecord, Trace, TraceEvent, TraceKind};
use crate::types::Pid;

/// Streams one table row per simulated tick.
///
/// ```text
///   Tick | CPU              | I/O              | Ready
///      0 | P0 (24)          | -                | P1
/// ```
///
/// Write errors are remembered and returned by [`TextReporter::finish`];
/// after the first error nothing more is written.
pub struct TextReporter<W: Write> {
    out: W,
    names: Vec<String>,
    header_written: bool,
    error: Option<io::Error>,
}

impl<W: Write> TextReporter<W> {
    /// `names` are the process names in workload order.
    pub fn new(out: W, names: Vec<String>) -> Self {
        TextReporter {
            out,
            names,
            header_written: false,
            error: None,
        }
    }

    /// Flush and hand back the writer, or the first write error.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn name(&self, pid: Pid) -> &str {
        self.names
            .get(pid.index())
            .map(String::as_str)
            .unwrap_or("???")
    }

    fn list(&self, pids: &[Pid]) -> String {
        if pids.is_empty() {
            return "-".to_string();
        }
        pids.iter()
            .map(|&p| self.name(p))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn write_row(&mut self, record: &TickRecord) -> io::Result<()> {
        if !self.header_written {
            writeln!(
                self.out,
                "{:>6} | {:<16} | {:<16} | {:<20} | I/O queue",
                "Tick", "CPU", "I/O", "Ready"
            )?;
            writeln!(self.out, "{}", "-".repeat(80))?;
            self.header_written = true;
        }
        let cpu = match record.cpu {
            Some((pid, remaining)) => format!("{} ({remaining})", self.name(pid)),
            None => "IDLE".to_string(),
        };
        let io = match record.io {
            Some((pid, progress)) => format!("{} ({progress})", self.name(pid)),
            None => "-".to_string(),
        };
        let ready = self.list(&record.ready);
        let io_queue = self.list(&record.io_queue);
        writeln!(
            self.out,
            "{:>6} | {:<16} | {:<16} | {:<20} | {}",
            record.tick, cpu, io, ready, io_queue
        )
    }

    fn write_idle(&mut self, from: u64, until: u64) -> io::Result<()> {
        writeln!(self.out, "{from:>6} | IDLE until {until}")
    }
}

impl<W: Write> Reporter for TextReporter<W> {
    fn on_event(&mut self, event: &TraceEvent) {
        if self.error.is_some() {
            return;
        }
        if let TraceKind::Idle { until } = event.kind {
            if let Err(e) = self.write_idle(event.tick, until) {
                self.error = Some(e);
            }
        }
    }

    fn on_tick(&mut self, record: &TickRecord) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.write_row(record) {
            self.error = Some(e);
        }
    }
}

/// Write the per-process metrics table followed by averages and throughput.
pub fn write_metrics_table(out: &mut impl Write, summary: &Summary) -> io::Result<()> {
    writeln!(
        out,
        "{:<10} {:>8} {:>6} {:>11} {:>11} {:>8} {:>9}",
        "Process", "Arrival", "Burst", "Completion", "Turnaround", "Waiting", "Response"
    )?;
    writeln!(out, "{}", "-".repeat(69))?;
    for m in &summary.processes {
        writeln!(
            out,
            "{:<10} {:>8} {:>6} {:>11} {:>11} {:>8} {:>9}",
            m.name, m.arrival, m.cpu_burst, m.completion, m.turnaround, m.waiting, m.response
        )?;
    }
    writeln!(out)?;
    writeln!(out, "Average turnaround time: {:.2}", summary.avg_turnaround)?;
    writeln!(out, "Average waiting time:    {:.2}", summary.avg_waiting)?;
    writeln!(out, "Average response time:   {:.2}", summary.avg_response)?;
    writeln!(
        out,
        "Throughput:              {:.4} processes/tick ({} ticks)",
        summary.throughput, summary.total_ticks
    )
}

#[derive(Serialize)]
struct JsonReport<'a> {
    policy: &'a str,
    summary: &'a Summary,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<&'a Trace>,
}

/// Write the run as pretty-printed JSON. The trace is included only when
/// `with_trace` is set.
pub fn write_json(
    out: &mut impl Write,
    policy: &str,
    result: &SimulationResult,
    with_trace: bool,
) -> io::Result<()> {
    let report = JsonReport {
        policy,
        summary: &result.summary,
        trace: with_trace.then_some(&result.trace),
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)
}
