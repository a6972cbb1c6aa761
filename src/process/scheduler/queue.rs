/*!
 * Scheduler Queues
 * FIFO containers that own the records queued in them
 */

use crate::core::errors::{SchedulerError, SchedulerResult};
use crate::core::types::Pid;
use crate::process::record::Record;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

/// Which of the three schedule queues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueKind {
    ReadyHigh,
    ReadyNormal,
    Defunct,
}

impl QueueKind {
    pub const ALL: [QueueKind; 3] = [Self::ReadyHigh, Self::ReadyNormal, Self::Defunct];

    #[inline(always)]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ReadyHigh => "ready_high",
            Self::ReadyNormal => "ready_normal",
            Self::Defunct => "defunct",
        }
    }
}

impl FromStr for QueueKind {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ready_high" | "high" | "rqh" => Ok(Self::ReadyHigh),
            "ready_normal" | "normal" | "rqn" => Ok(Self::ReadyNormal),
            "defunct" | "dq" => Ok(Self::Defunct),
            _ => Err(SchedulerError::InvalidArgument(format!(
                "unknown queue '{}'. Valid: ready_high, ready_normal, defunct",
                s
            ))),
        }
    }
}

impl fmt::Display for QueueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// FIFO queue of records
///
/// # Performance
/// - O(1) tail append and head removal
/// - O(n) order-preserving removal by pid
#[derive(Debug, Default)]
pub struct Queue {
    records: VecDeque<Record>,
}

impl Queue {
    /// Empty queue with `capacity` slots reserved, failing instead of aborting
    pub(crate) fn try_with_capacity(capacity: usize) -> SchedulerResult<Self> {
        let mut records = VecDeque::new();
        records.try_reserve_exact(capacity)?;
        Ok(Self { records })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Oldest record
    #[inline]
    pub fn front(&self) -> Option<&Record> {
        self.records.front()
    }

    /// Walk records head to tail without mutating
    pub fn iter(&self) -> impl Iterator<Item = &Record> + '_ {
        self.records.iter()
    }

    pub fn contains(&self, pid: Pid) -> bool {
        self.records.iter().any(|r| r.pid() == pid)
    }

    #[inline]
    pub(crate) fn push_back(&mut self, record: Record) {
        self.records.push_back(record);
    }

    #[inline]
    pub(crate) fn pop_front(&mut self) -> Option<Record> {
        self.records.pop_front()
    }

    /// Remove the first record matching `pred`, keeping the order of the rest
    pub(crate) fn remove_first<F>(&mut self, pred: F) -> Option<Record>
    where
        F: FnMut(&Record) -> bool,
    {
        let pos = self.records.iter().position(pred)?;
        self.records.remove(pos)
    }

    #[inline]
    pub(crate) fn remove_pid(&mut self, pid: Pid) -> Option<Record> {
        self.remove_first(|r| r.pid() == pid)
    }
}

impl<'a> IntoIterator for &'a Queue {
    type Item = &'a Record;
    type IntoIter = std::collections::vec_deque::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
