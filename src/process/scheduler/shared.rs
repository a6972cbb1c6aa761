/*!
 * Shared Schedule
 * One lock around the schedule for callers on more than one thread
 */

use super::{QueueKind, Schedule, ScheduleReport, SchedulerStats};
use crate::core::config::ScheduleConfig;
use crate::core::errors::{SchedulerError, SchedulerResult};
use crate::core::types::{ExitCode, Pid};
use crate::process::record::Record;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::info;

/// Cloneable handle serializing every schedule operation
///
/// Each call holds the lock for its whole duration. After [`destroy`]
/// the schedule is absent and every call fails with `InvalidArgument`.
///
/// [`destroy`]: SharedSchedule::destroy
#[derive(Debug, Clone)]
pub struct SharedSchedule {
    inner: Arc<Mutex<Option<Schedule>>>,
}

impl SharedSchedule {
    pub fn new() -> SchedulerResult<Self> {
        Self::with_config(ScheduleConfig::default())
    }

    pub fn with_config(config: ScheduleConfig) -> SchedulerResult<Self> {
        Ok(Self::from(Schedule::with_config(config)?))
    }

    /// Run `f` against the schedule under the lock
    pub fn with<R>(&self, f: impl FnOnce(&Schedule) -> R) -> SchedulerResult<R> {
        let guard = self.inner.lock();
        let schedule = guard.as_ref().ok_or_else(SchedulerError::schedule_absent)?;
        Ok(f(schedule))
    }

    /// Run `f` against the schedule mutably under the lock
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut Schedule) -> R) -> SchedulerResult<R> {
        let mut guard = self.inner.lock();
        let schedule = guard.as_mut().ok_or_else(SchedulerError::schedule_absent)?;
        Ok(f(schedule))
    }

    pub fn enqueue(&self, record: Record) -> SchedulerResult<()> {
        self.with_mut(|s| s.enqueue(record))?
    }

    pub fn queue_length(&self, kind: QueueKind) -> SchedulerResult<usize> {
        self.with(|s| s.queue_length(kind))
    }

    pub fn select_next(&self) -> SchedulerResult<Option<Record>> {
        self.with_mut(Schedule::select_next)
    }

    pub fn promote(&self) -> SchedulerResult<usize> {
        self.with_mut(Schedule::promote)?
    }

    pub fn mark_exited(&self, record: Record, exit_code: i32) -> SchedulerResult<()> {
        self.with_mut(|s| s.mark_exited(record, exit_code))?
    }

    pub fn mark_killed(&self, pid: Pid, exit_code: i32) -> SchedulerResult<()> {
        self.with_mut(|s| s.mark_killed(pid, exit_code))?
    }

    pub fn reap(&self, pid: Pid) -> SchedulerResult<ExitCode> {
        self.with_mut(|s| s.reap(pid))?
    }

    pub fn stats(&self) -> SchedulerResult<SchedulerStats> {
        self.with(Schedule::stats)
    }

    pub fn report(&self, on_cpu: Option<&Record>) -> SchedulerResult<ScheduleReport> {
        self.with(|s| ScheduleReport::capture(s, on_cpu))
    }

    /// Take the schedule out and destroy it
    ///
    /// # Preconditions
    /// No other thread is mid-cycle with a dispatched record. Returns
    /// `InvalidArgument` if already destroyed.
    pub fn destroy(&self) -> SchedulerResult<()> {
        let schedule = self
            .inner
            .lock()
            .take()
            .ok_or_else(SchedulerError::schedule_absent)?;
        schedule.destroy();
        info!("Shared schedule released");
        Ok(())
    }

    pub fn is_destroyed(&self) -> bool {
        self.inner.lock().is_none()
    }
}

impl From<Schedule> for SharedSchedule {
    fn from(schedule: Schedule) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(schedule))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operations_through_handle() {
        let shared = SharedSchedule::new().unwrap();
        shared.enqueue(Record::invoke(1, false, false, "a").unwrap()).unwrap();
        assert_eq!(shared.queue_length(QueueKind::ReadyNormal).unwrap(), 1);

        let record = shared.select_next().unwrap().unwrap();
        shared.mark_exited(record, 4).unwrap();
        assert_eq!(shared.reap(0).unwrap(), 4);
    }

    #[test]
    fn test_absent_after_destroy() {
        let shared = SharedSchedule::new().unwrap();
        let other = shared.clone();
        shared.destroy().unwrap();

        assert!(other.is_destroyed());
        assert!(matches!(
            other.select_next(),
            Err(SchedulerError::InvalidArgument(_))
        ));
        assert!(matches!(
            other.promote(),
            Err(SchedulerError::InvalidArgument(_))
        ));
        assert!(matches!(
            other.enqueue(Record::invoke(1, false, false, "a").unwrap()),
            Err(SchedulerError::InvalidArgument(_))
        ));
        assert!(matches!(
            other.destroy(),
            Err(SchedulerError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_debug_shows_schedule_state() {
        let shared = SharedSchedule::new().unwrap();
        shared.enqueue(Record::invoke(3, false, false, "a").unwrap()).unwrap();
        let live = format!("{:?}", shared);
        assert!(live.starts_with("SharedSchedule"));
        assert!(live.contains("Some(Schedule"));

        shared.destroy().unwrap();
        assert!(format!("{:?}", shared).contains("None"));
    }
}
