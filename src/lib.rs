/*!
 * Job-Control Scheduler Library
 * Process records, three-queue scheduling, aging, and reclamation
 */

pub mod core;
pub mod monitoring;
pub mod process;

// Re-exports
pub use crate::core::{
    ConfigError, ExitCode, Pid, ScheduleConfig, SchedulerError, SchedulerResult, OLDEST_DEFUNCT,
};
pub use monitoring::init_tracing;
pub use process::{
    debug_report, PriorityFlags, ProcessStatus, QueueKind, Record, RecordView, Schedule,
    ScheduleReport, SchedulerStats, SharedSchedule, StateWord,
};
