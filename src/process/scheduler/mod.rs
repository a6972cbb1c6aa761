/*!
 * Job Scheduler
 * Three-queue admission, dispatch, aging, and reclamation
 */

use crate::core::config::ScheduleConfig;
use crate::core::errors::SchedulerResult;
use tracing::{error, info};

mod operations;
mod queue;
mod report;
mod shared;
mod stats;

pub use queue::{Queue, QueueKind};
pub use report::{debug_report, RecordView, ScheduleReport};
pub use shared::SharedSchedule;
pub use stats::SchedulerStats;

use stats::Counters;

/// The schedule: two ready queues and the defunct queue
///
/// Owns every record reachable from its queues. A record handed out by
/// [`Schedule::select_next`] belongs to the caller until it comes back
/// through [`Schedule::enqueue`] or [`Schedule::mark_exited`].
///
/// Not internally synchronized; wrap it in a [`SharedSchedule`] when more
/// than one thread drives it.
#[derive(Debug)]
pub struct Schedule {
    ready_high: Queue,
    ready_normal: Queue,
    defunct: Queue,
    config: ScheduleConfig,
    counters: Counters,
}

impl Schedule {
    /// Create a schedule with default configuration
    pub fn new() -> SchedulerResult<Self> {
        Self::with_config(ScheduleConfig::default())
    }

    /// Create a schedule and its three empty queues as one unit
    ///
    /// If any queue cannot reserve its slots, the queues already built are
    /// dropped on the way out and `OutOfMemory` is returned.
    pub fn with_config(config: ScheduleConfig) -> SchedulerResult<Self> {
        let capacity = config.queue_capacity;
        let build = || -> SchedulerResult<Self> {
            let ready_high = Queue::try_with_capacity(capacity)?;
            let ready_normal = Queue::try_with_capacity(capacity)?;
            let defunct = Queue::try_with_capacity(capacity)?;
            Ok(Self {
                ready_high,
                ready_normal,
                defunct,
                config: config.clone(),
                counters: Counters::default(),
            })
        };

        match build() {
            Ok(schedule) => {
                info!(
                    starving_age = config.starving_age,
                    queue_capacity = capacity,
                    debug = config.debug,
                    "Schedule initialized"
                );
                Ok(schedule)
            }
            Err(e) => {
                error!(error = %e, queue_capacity = capacity, "Schedule initialization failed");
                Err(e)
            }
        }
    }

    /// Release every queued record, then the queues, then the schedule
    ///
    /// # Preconditions
    /// No record should be checked out by dispatch. Such a record is not
    /// reachable from here and stays with its holder, who drops it.
    pub fn destroy(self) {
        let released = self.total_len();
        drop(self);
        info!(released, "Schedule destroyed");
    }

    /// Read-only access to one queue, for reporting
    #[inline]
    pub fn queue(&self, kind: QueueKind) -> &Queue {
        match kind {
            QueueKind::ReadyHigh => &self.ready_high,
            QueueKind::ReadyNormal => &self.ready_normal,
            QueueKind::Defunct => &self.defunct,
        }
    }

    #[inline]
    pub(crate) fn queue_mut(&mut self, kind: QueueKind) -> &mut Queue {
        match kind {
            QueueKind::ReadyHigh => &mut self.ready_high,
            QueueKind::ReadyNormal => &mut self.ready_normal,
            QueueKind::Defunct => &mut self.defunct,
        }
    }

    /// Number of records in one queue
    #[inline]
    pub fn queue_length(&self, kind: QueueKind) -> usize {
        self.queue(kind).len()
    }

    /// Records across all three queues
    pub fn total_len(&self) -> usize {
        QueueKind::ALL.iter().map(|&k| self.queue_length(k)).sum()
    }

    /// Runnable records (both ready queues)
    pub fn ready_len(&self) -> usize {
        self.ready_high.len() + self.ready_normal.len()
    }

    #[inline]
    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_schedule_is_empty() {
        let schedule = Schedule::new().unwrap();
        for kind in QueueKind::ALL {
            assert_eq!(schedule.queue_length(kind), 0);
            assert!(schedule.queue(kind).front().is_none());
        }
        assert_eq!(schedule.total_len(), 0);
    }

    #[test]
    fn test_create_rejects_capacity_overflow() {
        let config = ScheduleConfig::default().with_queue_capacity(usize::MAX);
        let err = Schedule::with_config(config).unwrap_err();
        assert!(matches!(err, crate::core::SchedulerError::OutOfMemory(_)));
    }

    #[test]
    fn test_destroy_with_records_in_every_queue() {
        use crate::process::Record;

        let mut schedule = Schedule::new().unwrap();
        schedule.enqueue(Record::invoke(1, true, false, "a").unwrap()).unwrap();
        schedule.enqueue(Record::invoke(2, false, false, "b").unwrap()).unwrap();
        schedule.enqueue(Record::invoke(3, false, false, "c").unwrap()).unwrap();
        let running = schedule.select_next().unwrap();
        schedule.mark_exited(running, 0).unwrap();

        assert_eq!(schedule.total_len(), 3);
        schedule.destroy();
    }
}
