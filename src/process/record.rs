/*!
 * Process Record
 * The unit of work tracked by the scheduler
 */

use super::core::types::{PriorityFlags, ProcessStatus, StateWord};
use crate::core::errors::SchedulerResult;
use crate::core::types::{Age, ExitCode, Pid};
use tracing::debug;

/// A tracked job
///
/// Records are moved, never shared: a record lives inside exactly one queue,
/// or is held by whoever dispatched it. Dropping the record releases its label.
#[derive(Debug, PartialEq, Eq)]
pub struct Record {
    pid: Pid,
    label: String,
    status: ProcessStatus,
    flags: PriorityFlags,
    exit_code: ExitCode,
    age: Age,
}

impl Record {
    /// Create a ready, unqueued record with its own copy of `label`
    ///
    /// Requesting critical also sets high. Fails with `OutOfMemory` if the label
    /// copy cannot be allocated; nothing is left allocated in that case.
    pub fn invoke(pid: Pid, high: bool, critical: bool, label: &str) -> SchedulerResult<Self> {
        let mut owned = String::new();
        owned.try_reserve_exact(label.len())?;
        owned.push_str(label);

        let record = Self {
            pid,
            label: owned,
            status: ProcessStatus::Ready,
            flags: PriorityFlags::new(high, critical),
            exit_code: 0,
            age: 0,
        };

        debug!(
            pid = pid,
            high = record.flags.is_high(),
            critical = record.flags.is_critical(),
            "Record created"
        );
        Ok(record)
    }

    #[inline(always)]
    pub fn pid(&self) -> Pid {
        self.pid
    }

    #[inline(always)]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[inline(always)]
    pub fn status(&self) -> ProcessStatus {
        self.status
    }

    #[inline(always)]
    pub fn flags(&self) -> PriorityFlags {
        self.flags
    }

    #[inline(always)]
    pub fn is_high(&self) -> bool {
        self.flags.is_high()
    }

    #[inline(always)]
    pub fn is_critical(&self) -> bool {
        self.flags.is_critical()
    }

    #[inline(always)]
    pub fn age(&self) -> Age {
        self.age
    }

    /// Exit code, present only once the record is defunct
    #[inline]
    pub fn exit_code(&self) -> Option<ExitCode> {
        match self.status {
            ProcessStatus::Defunct => Some(self.exit_code),
            _ => None,
        }
    }

    /// Packed 16-bit state word
    #[inline]
    pub fn state_word(&self) -> StateWord {
        StateWord::pack(self.status, self.flags, self.exit_code)
    }

    pub(crate) fn mark_ready(&mut self) {
        self.status = ProcessStatus::Ready;
    }

    pub(crate) fn mark_running(&mut self) {
        self.status = ProcessStatus::Running;
        self.age = 0;
    }

    pub(crate) fn mark_defunct(&mut self, exit_code: ExitCode) {
        self.status = ProcessStatus::Defunct;
        self.exit_code = exit_code;
    }

    /// One aging sweep; returns the new age
    pub(crate) fn grow_older(&mut self) -> Age {
        self.age = self.age.saturating_add(1);
        self.age
    }
}
