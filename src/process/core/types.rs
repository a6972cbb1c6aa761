/*!
 * Process Types
 * Lifecycle status, priority flags, and the packed state word
 */

use crate::core::limits::{
    STATE_CRITICAL, STATE_DEFUNCT, STATE_EXIT_CODE_MASK, STATE_HIGH, STATE_READY,
    STATE_RUNNING,
};
use crate::core::types::ExitCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Process lifecycle status
///
/// Exactly one is current at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessStatus {
    /// Queued in a ready queue
    Ready,
    /// Handed out by dispatch, owned by the caller
    Running,
    /// Terminated, waiting in the defunct queue to be reaped
    Defunct,
}

impl ProcessStatus {
    #[inline(always)]
    pub const fn bit(self) -> u16 {
        match self {
            Self::Ready => STATE_READY,
            Self::Running => STATE_RUNNING,
            Self::Defunct => STATE_DEFUNCT,
        }
    }
}

/// Priority flags carried by a record
///
/// Critical implies High; the constructor is the only way in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PriorityFlags {
    high: bool,
    critical: bool,
}

impl PriorityFlags {
    #[inline]
    #[must_use]
    pub const fn new(high: bool, critical: bool) -> Self {
        Self {
            high: high || critical,
            critical,
        }
    }

    #[inline(always)]
    #[must_use]
    pub const fn is_high(&self) -> bool {
        self.high
    }

    #[inline(always)]
    #[must_use]
    pub const fn is_critical(&self) -> bool {
        self.critical
    }
}

/// 16-bit packed view of a record's state
///
/// ```text
/// 15 High | 14 Running | 13 Ready | 12 Defunct | 11 Critical | 10-8 reserved | 7-0 exit code
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct StateWord(u16);

impl StateWord {
    /// Pack status, flags, and exit code; the exit code is only kept when defunct
    #[must_use]
    pub const fn pack(status: ProcessStatus, flags: PriorityFlags, exit_code: ExitCode) -> Self {
        let mut word = status.bit();
        if flags.is_high() {
            word |= STATE_HIGH;
        }
        if flags.is_critical() {
            word |= STATE_CRITICAL;
        }
        if matches!(status, ProcessStatus::Defunct) {
            word |= exit_code as u16 & STATE_EXIT_CODE_MASK;
        }
        Self(word)
    }

    #[inline(always)]
    pub const fn bits(self) -> u16 {
        self.0
    }

    #[inline(always)]
    pub const fn is_high(self) -> bool {
        self.0 & STATE_HIGH != 0
    }

    #[inline(always)]
    pub const fn is_running(self) -> bool {
        self.0 & STATE_RUNNING != 0
    }

    #[inline(always)]
    pub const fn is_ready(self) -> bool {
        self.0 & STATE_READY != 0
    }

    #[inline(always)]
    pub const fn is_defunct(self) -> bool {
        self.0 & STATE_DEFUNCT != 0
    }

    #[inline(always)]
    pub const fn is_critical(self) -> bool {
        self.0 & STATE_CRITICAL != 0
    }

    #[inline(always)]
    pub const fn exit_code(self) -> ExitCode {
        (self.0 & STATE_EXIT_CODE_MASK) as ExitCode
    }

    /// Five-column flag string in `HURDC` order, blank where unset
    pub fn flags(self) -> String {
        [
            (self.is_high(), 'H'),
            (self.is_running(), 'U'),
            (self.is_ready(), 'R'),
            (self.is_defunct(), 'D'),
            (self.is_critical(), 'C'),
        ]
        .iter()
        .map(|&(set, c)| if set { c } else { ' ' })
        .collect()
    }
}

impl From<StateWord> for u16 {
    fn from(word: StateWord) -> Self {
        word.0
    }
}

impl fmt::Debug for StateWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StateWord({:#06x} [{}])", self.0, self.flags())
    }
}
