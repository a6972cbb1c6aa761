/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use super::types::{Pid, OLDEST_DEFUNCT};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Scheduler operation result
///
/// # Must Use
/// A failed admission or termination leaves the record with the caller; ignoring it leaks the job
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Scheduler errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum SchedulerError {
    #[error("Out of memory while allocating {0}")]
    #[diagnostic(
        code(scheduler::out_of_memory),
        help("Nothing was left half-built. Free some jobs (reap defunct ones) and retry.")
    )]
    OutOfMemory(String),

    #[error("Invalid argument: {0}")]
    #[diagnostic(
        code(scheduler::invalid_argument),
        help("A required input was missing or malformed, or the schedule was already destroyed.")
    )]
    InvalidArgument(String),

    #[error("{}", not_found_message(.0))]
    #[diagnostic(
        code(scheduler::not_found),
        help("The job may already have exited, been reaped, or never been admitted.")
    )]
    NotFound(Pid),
}

fn not_found_message(pid: &Pid) -> String {
    if *pid == OLDEST_DEFUNCT {
        "No defunct process to reap".to_string()
    } else {
        format!("Process {} not found", pid)
    }
}

impl SchedulerError {
    /// Schedule was destroyed (or never created) behind a shared handle
    #[cold]
    pub(crate) fn schedule_absent() -> Self {
        SchedulerError::InvalidArgument("schedule is absent".to_string())
    }

    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, SchedulerError::NotFound(_))
    }
}

impl From<std::collections::TryReserveError> for SchedulerError {
    fn from(err: std::collections::TryReserveError) -> Self {
        SchedulerError::OutOfMemory(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_messages() {
        assert_eq!(
            SchedulerError::NotFound(42).to_string(),
            "Process 42 not found"
        );
        assert_eq!(
            SchedulerError::NotFound(OLDEST_DEFUNCT).to_string(),
            "No defunct process to reap"
        );
    }

    #[test]
    fn test_error_serialization_is_tagged() {
        let json = serde_json::to_string(&SchedulerError::NotFound(7)).unwrap();
        assert_eq!(json, r#"{"error_type":"not_found","details":7}"#);

        let back: SchedulerError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SchedulerError::NotFound(7));
    }

    #[test]
    fn test_try_reserve_maps_to_out_of_memory() {
        let mut v: Vec<u8> = Vec::new();
        let err = v.try_reserve(usize::MAX).unwrap_err();
        assert!(matches!(
            SchedulerError::from(err),
            SchedulerError::OutOfMemory(_)
        ));
    }
}
