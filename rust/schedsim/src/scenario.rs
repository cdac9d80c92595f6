//! Scenario definition and builder API.

use std::collections::HashSet;

use crate::engine::SimError;
use crate::task::ProcessDef;
use crate::types::Tick;

/// Default watchdog limit: the run is aborted if the clock reaches this.
pub const DEFAULT_MAX_TICKS: Tick = 10_000_000;

/// A complete simulation input: the workload plus run knobs.
#[derive(Debug, Clone)]
pub struct Scenario {
    /// Processes in workload order. The position is the process's `Pid`.
    pub processes: Vec<ProcessDef>,
    /// Overrides the policy's default I/O handling when set.
    pub io: Option<bool>,
    /// Watchdog limit on the simulated clock. `None` disables it.
    pub max_ticks: Option<Tick>,
}

/// Builder for constructing scenarios.
pub struct ScenarioBuilder {
    processes: Vec<ProcessDef>,
    io: Option<bool>,
    max_ticks: Option<Tick>,
}

impl Scenario {
    pub fn builder() -> ScenarioBuilder {
        ScenarioBuilder {
            processes: Vec::new(),
            io: None,
            max_ticks: Some(DEFAULT_MAX_TICKS),
        }
    }

    /// Check the workload parameters.
    ///
    /// Rejects an empty workload, zero CPU bursts, and duplicate names.
    /// Negative arrival times cannot be represented and are rejected by
    /// the workload loader.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.processes.is_empty() {
            return Err(SimError::EmptyWorkload);
        }
        let mut seen = HashSet::new();
        for def in &self.processes {
            if def.cpu_burst == 0 {
                return Err(SimError::ZeroBurst {
                    name: def.name.clone(),
                });
            }
            if !seen.insert(def.name.as_str()) {
                return Err(SimError::DuplicateName {
                    name: def.name.clone(),
                });
            }
        }
        Ok(())
    }
}

impl ScenarioBuilder {
    /// Add a process with a full definition.
    pub fn process(mut self, def: ProcessDef) -> Self {
        self.processes.push(def);
        self
    }

    /// Add several processes, keeping their order.
    pub fn processes(mut self, defs: impl IntoIterator<Item = ProcessDef>) -> Self {
        self.processes.extend(defs);
        self
    }

    /// Convenience: add a CPU-only process.
    pub fn add_process(self, name: &str, arrival: Tick, cpu_burst: Tick) -> Self {
        self.process(ProcessDef::new(name, arrival, cpu_burst))
    }

    /// Force I/O handling on or off regardless of the policy's default.
    pub fn io(mut self, enabled: bool) -> Self {
        self.io = Some(enabled);
        self
    }

    /// Set the watchdog limit.
    ///
    /// - `Some(t)`: the run fails with [`SimError::Watchdog`] if the clock
    ///   reaches `t` before every process has terminated.
    /// - `None`: watchdog disabled.
    pub fn max_ticks(mut self, limit: Option<Tick>) -> Self {
        self.max_ticks = limit;
        self
    }

    /// Shorthand for `.max_ticks(None)`.
    pub fn no_watchdog(self) -> Self {
        self.max_ticks(None)
    }

    /// Build and validate the scenario.
    pub fn build(self) -> Result<Scenario, SimError> {
        let scenario = Scenario {
            processes: self.processes,
            io: self.io,
            max_ticks: self.max_ticks,
        };
        scenario.validate()?;
        Ok(scenario)
    }
}
