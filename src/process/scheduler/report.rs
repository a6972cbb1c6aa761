/*!
 * Schedule Report
 * Read-only snapshot of every queue for status display
 */

use super::{QueueKind, Schedule};
use crate::core::config::ScheduleConfig;
use crate::core::types::{Age, ExitCode, Pid};
use crate::process::record::Record;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One record as seen by a status display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RecordView {
    pub pid: Pid,
    pub label: String,
    /// `HURDC` columns, blank where unset
    pub flags: String,
    pub age: Age,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<ExitCode>,
    pub state_word: u16,
}

impl From<&Record> for RecordView {
    fn from(record: &Record) -> Self {
        let word = record.state_word();
        Self {
            pid: record.pid(),
            label: record.label().to_string(),
            flags: word.flags(),
            age: record.age(),
            exit_code: record.exit_code(),
            state_word: word.bits(),
        }
    }
}

impl fmt::Display for RecordView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "     [PID: {:>7}] {:<26} ... Flags: [{}], Age: {:>2}",
            self.pid, self.label, self.flags, self.age
        )?;
        if let Some(code) = self.exit_code {
            write!(f, ", Exit Code: {}", code)?;
        }
        Ok(())
    }
}

/// Snapshot of the schedule plus the record currently on CPU
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ScheduleReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_cpu: Option<RecordView>,
    pub ready_high: Vec<RecordView>,
    pub ready_normal: Vec<RecordView>,
    pub defunct: Vec<RecordView>,
}

impl ScheduleReport {
    /// Capture the schedule without mutating it
    pub fn capture(schedule: &Schedule, on_cpu: Option<&Record>) -> Self {
        let views = |kind| {
            schedule
                .queue(kind)
                .iter()
                .map(RecordView::from)
                .collect::<Vec<_>>()
        };

        Self {
            on_cpu: on_cpu.map(RecordView::from),
            ready_high: views(QueueKind::ReadyHigh),
            ready_normal: views(QueueKind::ReadyNormal),
            defunct: views(QueueKind::Defunct),
        }
    }

    /// Records across all three queues (the on-CPU record is not counted)
    pub fn total_scheduled(&self) -> usize {
        self.ready_high.len() + self.ready_normal.len() + self.defunct.len()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "es"
    }
}

fn write_section(f: &mut fmt::Formatter<'_>, title: &str, views: &[RecordView]) -> fmt::Result {
    let n = views.len();
    writeln!(f, "...[{} - {:>2} Process{}]", title, n, plural(n))?;
    for view in views {
        writeln!(f, "{}", view)?;
    }
    Ok(())
}

impl fmt::Display for ScheduleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Running Process")?;
        let on_cpu: Vec<RecordView> = self.on_cpu.iter().cloned().collect();
        write_section(f, "CPU Execution   ", &on_cpu)?;

        writeln!(
            f,
            "Schedule - {} Processes across all Queues",
            self.total_scheduled()
        )?;
        write_section(f, "Ready Queue - High  ", &self.ready_high)?;
        write_section(f, "Ready Queue - Normal", &self.ready_normal)?;
        write_section(f, "Defunct Queue       ", &self.defunct)
    }
}

/// Report only when debug reporting is configured on
pub fn debug_report(
    schedule: &Schedule,
    on_cpu: Option<&Record>,
    config: &ScheduleConfig,
) -> Option<ScheduleReport> {
    config
        .debug
        .then(|| ScheduleReport::capture(schedule, on_cpu))
}
