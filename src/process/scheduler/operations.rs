/*!
 * Scheduler Core Operations
 * Admission, dispatch, aging, termination, and reclamation
 */

use super::{QueueKind, Schedule};
use crate::core::errors::{SchedulerError, SchedulerResult};
use crate::core::types::{exit_code_of, ExitCode, Pid, OLDEST_DEFUNCT};
use crate::process::core::types::ProcessStatus;
use crate::process::record::Record;
use tracing::{debug, info, warn};

impl Schedule {
    /// Admit a record into the ready queue matching its priority
    ///
    /// Whatever its previous status, the record becomes Ready. High or
    /// critical records go to the tail of ready-high, everything else to
    /// the tail of ready-normal.
    pub fn enqueue(&mut self, mut record: Record) -> SchedulerResult<()> {
        record.mark_ready();

        let kind = if record.is_high() || record.is_critical() {
            QueueKind::ReadyHigh
        } else {
            QueueKind::ReadyNormal
        };

        debug!(pid = record.pid(), queue = %kind, "Record admitted");
        self.queue_mut(kind).push_back(record);
        self.counters.admitted += 1;
        Ok(())
    }

    /// Remove and return the next record to run
    ///
    /// Order: first critical record in ready-high, then the head of
    /// ready-high, then the head of ready-normal. `None` means idle.
    /// The returned record is Running with age 0 and no longer belongs to
    /// any queue.
    pub fn select_next(&mut self) -> Option<Record> {
        let mut record = self
            .ready_high
            .remove_first(Record::is_critical)
            .or_else(|| self.ready_high.pop_front())
            .or_else(|| self.ready_normal.pop_front())?;

        record.mark_running();
        self.counters.dispatched += 1;

        debug!(
            pid = record.pid(),
            critical = record.is_critical(),
            high = record.is_high(),
            "Record dispatched"
        );
        Some(record)
    }

    /// Age every normal-priority record and promote the starving ones
    ///
    /// A record whose age reaches the configured starving age moves to the
    /// tail of ready-high with its status and flags untouched; its age is
    /// not reset. Returns how many records were promoted.
    pub fn promote(&mut self) -> SchedulerResult<usize> {
        let threshold = self.config.starving_age;
        let mut promoted = 0;

        // Rotate through once: survivors go back to the tail, so relative
        // order is kept in both queues.
        for _ in 0..self.ready_normal.len() {
            let Some(mut record) = self.ready_normal.pop_front() else {
                break;
            };

            if record.grow_older() >= threshold {
                debug!(pid = record.pid(), age = record.age(), "Record promoted");
                self.ready_high.push_back(record);
                promoted += 1;
            } else {
                self.ready_normal.push_back(record);
            }
        }

        if promoted > 0 {
            self.counters.promoted += promoted as u64;
            info!(promoted, threshold, "Starving records promoted to high priority");
        }
        Ok(promoted)
    }

    /// Retire a record that was running and exited on its own
    ///
    /// Only the low byte of `exit_code` is kept.
    pub fn mark_exited(&mut self, mut record: Record, exit_code: i32) -> SchedulerResult<()> {
        if record.status() != ProcessStatus::Running {
            debug!(
                pid = record.pid(),
                status = ?record.status(),
                "Exited record was not marked running"
            );
        }

        record.mark_defunct(exit_code_of(exit_code));
        info!(pid = record.pid(), exit_code = exit_code_of(exit_code), "Record exited");
        self.defunct.push_back(record);
        self.counters.exited += 1;
        Ok(())
    }

    /// Kill a queued record by pid
    ///
    /// Searches ready-high, then ready-normal. A record currently on CPU is
    /// not found here; the caller handles that case.
    pub fn mark_killed(&mut self, pid: Pid, exit_code: i32) -> SchedulerResult<()> {
        let mut record = self
            .ready_high
            .remove_pid(pid)
            .or_else(|| self.ready_normal.remove_pid(pid))
            .ok_or_else(|| {
                warn!(pid, "Kill requested for record not in a ready queue");
                SchedulerError::NotFound(pid)
            })?;

        record.mark_defunct(exit_code_of(exit_code));
        info!(pid, exit_code = exit_code_of(exit_code), "Record killed");
        self.defunct.push_back(record);
        self.counters.killed += 1;
        Ok(())
    }

    /// Reclaim a defunct record and return its exit code
    ///
    /// `pid == 0` reaps the oldest defunct record. The record is dropped
    /// here, releasing its label.
    pub fn reap(&mut self, pid: Pid) -> SchedulerResult<ExitCode> {
        let record = if pid == OLDEST_DEFUNCT {
            self.defunct.pop_front()
        } else {
            self.defunct.remove_pid(pid)
        };

        let record = record.ok_or_else(|| {
            warn!(pid, "Nothing to reap");
            SchedulerError::NotFound(pid)
        })?;

        // Status is Defunct for everything in this queue.
        let code = record.exit_code().unwrap_or_default();
        info!(pid = record.pid(), exit_code = code, "Record reaped");
        self.counters.reaped += 1;
        Ok(code)
    }

    /// Reap the oldest defunct record
    #[inline]
    pub fn reap_oldest(&mut self) -> SchedulerResult<ExitCode> {
        self.reap(OLDEST_DEFUNCT)
    }
}
