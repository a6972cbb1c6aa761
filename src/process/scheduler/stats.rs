/*!
 * Scheduler Statistics
 * Track and report scheduler activity counters
 */

use super::{QueueKind, Schedule};
use serde::{Deserialize, Serialize};

/// Running totals kept by the schedule
#[derive(Debug, Default, Clone, Copy)]
pub(super) struct Counters {
    pub admitted: u64,
    pub dispatched: u64,
    pub promoted: u64,
    pub exited: u64,
    pub killed: u64,
    pub reaped: u64,
}

/// Scheduler statistics snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SchedulerStats {
    pub admitted: u64,
    pub dispatched: u64,
    pub promoted: u64,
    pub exited: u64,
    pub killed: u64,
    pub reaped: u64,
    pub ready_high: usize,
    pub ready_normal: usize,
    pub defunct: usize,
}

impl Schedule {
    /// Get scheduler statistics
    pub fn stats(&self) -> SchedulerStats {
        let c = self.counters;
        SchedulerStats {
            admitted: c.admitted,
            dispatched: c.dispatched,
            promoted: c.promoted,
            exited: c.exited,
            killed: c.killed,
            reaped: c.reaped,
            ready_high: self.queue_length(QueueKind::ReadyHigh),
            ready_normal: self.queue_length(QueueKind::ReadyNormal),
            defunct: self.queue_length(QueueKind::Defunct),
        }
    }
}
