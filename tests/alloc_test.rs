/*!
 * Allocation Tests
 * Destroying a schedule releases every record and label it holds, and a
 * failed allocation midway through a build unwinds everything built so far
 */

use jobctl_sched::{Record, Schedule, ScheduleConfig, SchedulerError, SharedSchedule};
use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use std::ptr;

/// Counts live heap bytes allocated by the current thread
struct CountingAlloc;

thread_local! {
    static LIVE_BYTES: Cell<isize> = const { Cell::new(0) };
    /// Countdown to the allocation that fails; 0 means never
    static FAIL_AT: Cell<usize> = const { Cell::new(0) };
}

/// True exactly once, on the armed allocation
fn should_fail() -> bool {
    FAIL_AT
        .try_with(|n| match n.get() {
            0 => false,
            1 => {
                n.set(0);
                true
            }
            left => {
                n.set(left - 1);
                false
            }
        })
        .unwrap_or(false)
}

fn track(delta: isize) {
    // Thread-local may be gone during thread teardown
    let _ = LIVE_BYTES.try_with(|live| live.set(live.get() + delta));
}

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if should_fail() {
            return ptr::null_mut();
        }
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            track(layout.size() as isize);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        track(-(layout.size() as isize));
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = System.realloc(ptr, layout, new_size);
        if !new_ptr.is_null() {
            track(new_size as isize - layout.size() as isize);
        }
        new_ptr
    }
}

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

fn live_bytes() -> isize {
    LIVE_BYTES.with(Cell::get)
}

/// Net bytes still allocated by this thread after running `f`
///
/// `f` runs once unmeasured so one-time lazy statics (log callsite
/// registration and the like) are not counted.
fn leaked_by(mut f: impl FnMut()) -> isize {
    f();
    let before = live_bytes();
    f();
    live_bytes() - before
}

/// Run `f` with the `nth` heap allocation on this thread failing
///
/// Only fallible reservations may be the armed one; an infallible
/// allocation failing aborts the test binary.
fn with_failing_allocation<R>(nth: usize, f: impl FnOnce() -> R) -> R {
    FAIL_AT.with(|n| n.set(nth));
    let result = f();
    FAIL_AT.with(|n| n.set(0));
    result
}

#[test]
fn test_destroy_releases_everything() {
    let leaked = leaked_by(|| {
        let mut schedule = Schedule::with_config(ScheduleConfig::default().with_queue_capacity(2))
            .unwrap();
        for pid in 1..=10 {
            let label = format!("job number {} with a longer label", pid);
            let record = Record::invoke(pid, pid % 3 == 0, pid % 5 == 0, &label).unwrap();
            schedule.enqueue(record).unwrap();
        }
        schedule.promote().unwrap();
        for code in 0..4 {
            let record = schedule.select_next().unwrap();
            schedule.mark_exited(record, code).unwrap();
        }
        schedule.mark_killed(9, 9).unwrap_or(());
        schedule.reap(0).unwrap();
        let running = schedule.select_next().unwrap();
        schedule.enqueue(running).unwrap();

        schedule.destroy();
    });
    assert_eq!(leaked, 0);
}

#[test]
fn test_reap_releases_record() {
    let mut schedule = Schedule::new().unwrap();
    let leaked = leaked_by(|| {
        let record = Record::invoke(1, false, false, "a label that needs the heap").unwrap();
        schedule.enqueue(record).unwrap();
        let record = schedule.select_next().unwrap();
        schedule.mark_exited(record, 3).unwrap();
        assert_eq!(schedule.reap(1).unwrap(), 3);
    });
    assert_eq!(leaked, 0);
    schedule.destroy();
}

#[test]
fn test_failed_create_leaves_nothing() {
    let leaked = leaked_by(|| {
        let config = ScheduleConfig::default().with_queue_capacity(usize::MAX);
        assert!(matches!(
            Schedule::with_config(config),
            Err(SchedulerError::OutOfMemory(_))
        ));
    });
    assert_eq!(leaked, 0);
}

#[test]
fn test_create_unwinds_when_second_queue_fails() {
    let leaked = leaked_by(|| {
        let result = with_failing_allocation(2, Schedule::new);
        assert!(matches!(result, Err(SchedulerError::OutOfMemory(_))));
    });
    assert_eq!(leaked, 0);
}

#[test]
fn test_create_unwinds_when_third_queue_fails() {
    let leaked = leaked_by(|| {
        let result = with_failing_allocation(3, Schedule::new);
        assert!(matches!(result, Err(SchedulerError::OutOfMemory(_))));
    });
    assert_eq!(leaked, 0);
}

#[test]
fn test_create_succeeds_after_failure() {
    let result = with_failing_allocation(1, Schedule::new);
    assert!(matches!(result, Err(SchedulerError::OutOfMemory(_))));

    let schedule = Schedule::new().unwrap();
    assert_eq!(schedule.total_len(), 0);
    schedule.destroy();
}

#[test]
fn test_failed_label_copy_leaves_nothing() {
    let leaked = leaked_by(|| {
        let result = with_failing_allocation(1, || {
            Record::invoke(7, true, false, "label that must be copied")
        });
        assert!(matches!(result, Err(SchedulerError::OutOfMemory(_))));
    });
    assert_eq!(leaked, 0);
}

#[test]
fn test_shared_destroy_releases_everything() {
    let leaked = leaked_by(|| {
        let shared = SharedSchedule::new().unwrap();
        for pid in 1..=5 {
            shared
                .enqueue(Record::invoke(pid, false, false, "shared job").unwrap())
                .unwrap();
        }
        shared.destroy().unwrap();
        drop(shared);
    });
    assert_eq!(leaked, 0);
}
