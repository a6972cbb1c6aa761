/*!
 * Scheduler Limits and Constants
 *
 * Centralized location for thresholds, bit masks, and environment keys.
 */

use super::types::Age;

// =============================================================================
// AGING
// =============================================================================

/// Sweeps a normal-priority job may wait before promotion to the high queue
/// Worst-case wait is bounded by this times the caller's aging interval
pub const DEFAULT_STARVING_AGE: Age = 5;

// =============================================================================
// QUEUE SIZING
// =============================================================================

/// Slots reserved up front in each queue
/// The roster is a few dozen jobs, so admissions normally never reallocate
pub const DEFAULT_QUEUE_CAPACITY: usize = 32;

/// Upper bound accepted for the reserved queue capacity
pub const MAX_QUEUE_CAPACITY: usize = 4096;

// =============================================================================
// STATE WORD LAYOUT
// =============================================================================

/// Eligible for the high-priority queue
pub const STATE_HIGH: u16 = 1 << 15;

/// Currently dispatched
pub const STATE_RUNNING: u16 = 1 << 14;

/// Queued and runnable
pub const STATE_READY: u16 = 1 << 13;

/// Terminated, awaiting reap
pub const STATE_DEFUNCT: u16 = 1 << 12;

/// Serviced ahead of ordinary high-priority jobs
pub const STATE_CRITICAL: u16 = 1 << 11;

/// Reserved bits 10-8, always zero
pub const STATE_RESERVED_MASK: u16 = 0x0700;

/// Exit code occupies the low byte
pub const STATE_EXIT_CODE_MASK: u16 = 0x00FF;

// =============================================================================
// ENVIRONMENT
// =============================================================================

/// Overrides [`DEFAULT_STARVING_AGE`]
pub const ENV_STARVING_AGE: &str = "SCHED_STARVING_AGE";

/// Overrides [`DEFAULT_QUEUE_CAPACITY`]
pub const ENV_QUEUE_CAPACITY: &str = "SCHED_QUEUE_CAPACITY";

/// Enables debug schedule reports ("1" or "true")
pub const ENV_DEBUG: &str = "SCHED_DEBUG";

/// Switches tracing output to JSON ("1" or "true")
pub const ENV_TRACE_JSON: &str = "SCHED_TRACE_JSON";
