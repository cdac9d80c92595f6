//! Simulated I/O device.
//!
//! A single server with its own FIFO queue. At most one process occupies
//! the device per tick. A process that finishes its I/O episode is handed
//! back to the caller, which puts it into ready-queue contention; it
//! never resumes the CPU directly.

use crate::queue::{QueueKey, RunQueue};
use crate::task::SimProcess;
use crate::types::{Pid, Tick};

/// What the device did during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IoStep {
    /// Process that consumed an I/O unit this tick, with its progress
    /// after that unit.
    pub served: Option<(Pid, Tick)>,
    /// Process whose I/O episode finished this tick.
    pub completed: Option<Pid>,
    /// Process moved from the I/O queue onto the idle device this tick.
    pub admitted: Option<Pid>,
}

#[derive(Debug)]
pub struct IoDevice {
    queue: RunQueue,
    occupant: Option<Pid>,
}

impl IoDevice {
    pub fn new() -> Self {
        IoDevice {
            queue: RunQueue::fifo(),
            occupant: None,
        }
    }

    /// Queue a blocked process for the device.
    pub fn enqueue(&mut self, proc: &SimProcess) {
        self.queue.push(
            proc.pid,
            QueueKey {
                key: 0,
                arrival: proc.arrival,
            },
        );
    }

    /// Advance the device by one tick: progress the occupant, then admit
    /// the queue head if the device is free.
    pub fn step(&mut self, procs: &mut [SimProcess]) -> IoStep {
        let mut step = IoStep::default();

        if let Some(pid) = self.occupant {
            let proc = &mut procs[pid.index()];
            let done = proc.tick_io();
            let progress = if done {
                proc.io.map_or(0, |io| io.duration)
            } else {
                proc.io_elapsed
            };
            step.served = Some((pid, progress));
            if done {
                self.occupant = None;
                step.completed = Some(pid);
            }
        }

        if self.occupant.is_none() {
            if let Some(pid) = self.queue.pop() {
                procs[pid.index()].io_elapsed = 0;
                self.occupant = Some(pid);
                step.admitted = Some(pid);
            }
        }

        step
    }

    pub fn occupant(&self) -> Option<Pid> {
        self.occupant
    }

    /// Processes waiting for the device, in admission order.
    pub fn queued(&self) -> Vec<Pid> {
        self.queue.ordered_pids()
    }

    /// No process on the device and none waiting for it.
    pub fn is_idle(&self) -> bool {
        self.occupant.is_none() && self.queue.is_empty()
    }
}

impl Default for IoDevice {
    fn default() -> Self {
        Self::new()
    }
}
