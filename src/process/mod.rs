/*!
 * Process Module
 * Job records and the scheduler that moves them between queues
 */

pub mod core;
pub mod record;
pub mod scheduler;

// Re-export for convenience
pub use self::core::{PriorityFlags, ProcessStatus, StateWord};
pub use record::Record;
pub use scheduler::{
    debug_report, Queue, QueueKind, RecordView, Schedule, ScheduleReport, SchedulerStats,
    SharedSchedule,
};
