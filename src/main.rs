/*!
 * Scheduler Driver - Main Entry Point
 *
 * Small stand-in for the timing engine:
 * - Admits the jobs named on the command line
 * - Dispatches one slice per tick and ages the normal queue
 * - Prints the schedule and reaps every finished job
 *
 * Usage: sched-driver [--config FILE] JOB...
 *   JOB is a label; prefix with '+' for high priority or '!' for critical.
 */

use anyhow::{bail, Context, Result};
use jobctl_sched::{
    debug_report, init_tracing, monitoring::span_tick, Pid, Record, ScheduleConfig,
    ScheduleReport, SharedSchedule, OLDEST_DEFUNCT,
};
use std::collections::HashMap;
use tracing::{info, warn};

/// Upper bound on ticks so a bad job list cannot spin forever
const MAX_TICKS: u64 = 10_000;

struct JobSpec {
    label: String,
    high: bool,
    critical: bool,
}

impl JobSpec {
    fn parse(arg: &str) -> Self {
        if let Some(label) = arg.strip_prefix('!') {
            Self {
                label: label.to_string(),
                high: false,
                critical: true,
            }
        } else if let Some(label) = arg.strip_prefix('+') {
            Self {
                label: label.to_string(),
                high: true,
                critical: false,
            }
        } else {
            Self {
                label: arg.to_string(),
                high: false,
                critical: false,
            }
        }
    }

    /// Slices this job needs before it exits
    fn slices(&self) -> u32 {
        (self.label.split_whitespace().count() as u32).max(1)
    }
}

fn parse_args() -> Result<(ScheduleConfig, Vec<JobSpec>)> {
    let mut args = std::env::args().skip(1);
    let mut config = None;
    let mut jobs = Vec::new();

    while let Some(arg) = args.next() {
        if arg == "--config" {
            let path = args.next().context("--config needs a file path")?;
            config = Some(
                ScheduleConfig::from_file(&path)
                    .with_context(|| format!("loading config from {}", path))?,
            );
        } else {
            jobs.push(JobSpec::parse(&arg));
        }
    }

    let config = match config {
        Some(config) => config,
        None => ScheduleConfig::from_env().context("reading config from environment")?,
    };

    if jobs.is_empty() {
        bail!("usage: sched-driver [--config FILE] JOB...");
    }
    Ok((config, jobs))
}

/// Dispatch one slice per tick until nothing is runnable or `max_ticks` pass
///
/// Returns the number of ticks used. A job exits once its slices run out.
fn run_ticks(
    schedule: &SharedSchedule,
    remaining: &mut HashMap<Pid, u32>,
    config: &ScheduleConfig,
    max_ticks: u64,
) -> Result<u64> {
    let mut tick = 0;
    while tick < max_ticks {
        tick += 1;
        let span = span_tick(tick);
        let _entered = span.enter();

        schedule.promote()?;
        let Some(record) = schedule.select_next()? else {
            break;
        };

        if let Some(report) = schedule.with(|s| debug_report(s, Some(&record), config))? {
            println!("{}", report);
        }

        let left = remaining.entry(record.pid()).or_insert(1);
        *left = left.saturating_sub(1);
        if *left == 0 {
            let code = (record.pid() % 256) as i32;
            schedule.mark_exited(record, code)?;
        } else {
            schedule.enqueue(record)?;
        }
    }
    Ok(tick)
}

fn main() -> Result<()> {
    init_tracing();

    let (config, jobs) = parse_args()?;
    info!(jobs = jobs.len(), starving_age = config.starving_age, "Scheduler driver starting");

    let schedule = SharedSchedule::with_config(config.clone())?;
    let mut remaining: HashMap<Pid, u32> = HashMap::new();

    for (pid, job) in (1..).zip(jobs.iter()) {
        let record = Record::invoke(pid, job.high, job.critical, &job.label)?;
        remaining.insert(pid, job.slices());
        schedule.enqueue(record)?;
    }

    let tick = run_ticks(&schedule, &mut remaining, &config, MAX_TICKS)?;
    let runnable = schedule.with(|s| s.ready_len())?;
    if runnable > 0 {
        warn!(tick, runnable, "Tick limit reached with jobs still runnable");
    }

    let report: ScheduleReport = schedule.report(None)?;
    println!("{}", report);

    loop {
        match schedule.reap(OLDEST_DEFUNCT) {
            Ok(code) => println!("reaped job with exit code {}", code),
            Err(e) if e.is_not_found() => break,
            Err(e) => return Err(e.into()),
        }
    }

    let stats = schedule.stats()?;
    info!(
        ticks = tick,
        dispatched = stats.dispatched,
        promoted = stats.promoted,
        reaped = stats.reaped,
        "Scheduler driver finished"
    );
    schedule.destroy()?;
    Ok(())
}
