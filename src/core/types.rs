/*!
 * Core Types
 * Common types used across the scheduler
 */

/// Process (job) identifier type
///
/// Opaque to the scheduler: only ever compared for lookups.
pub type Pid = u32;

/// Age counter type (aging sweeps spent waiting in the normal ready queue)
pub type Age = u32;

/// Exit code as stored in a defunct record (low byte of the termination status)
pub type ExitCode = u8;

/// Reap sentinel: target the oldest defunct record instead of a specific pid
pub const OLDEST_DEFUNCT: Pid = 0;

/// Truncate a raw termination status to the stored exit code
///
/// Only the low 8 bits survive, matching what a waiting parent observes.
#[inline(always)]
#[must_use]
pub const fn exit_code_of(status: i32) -> ExitCode {
    (status & 0xFF) as ExitCode
}
